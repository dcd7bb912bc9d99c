/// Text seeded into a fresh editor buffer. The buffer starts with this text
/// fully selected so the first keystroke replaces it.
pub const PLACEHOLDER_TEXT: &str = "// code";

/// Script handed to the host when a session finishes with an empty or
/// untouched buffer. The host must never receive an empty code string.
pub const FALLBACK_SCRIPT: &str = "alert('No JavaScript code entered.');";

/// 擴充功能被呼叫當下擷取的頁面資訊。 / Page details captured at invocation time.
///
/// Captured once per invocation and immutable afterwards. Missing host data
/// degrades to empty fields; a session can always open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    title: String,
    url: String,
}

impl PageContext {
    /// 建立含標題與網址的頁面資訊。 / Creates a context with the given title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// 建立空白頁面資訊（主機資料缺漏時使用）。 / Empty context used when host data is absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
