//! The two-call hand-off contract with the host browser.
//!
//! The host calls "run" before the editor is shown, supplying page context,
//! and "finalize" after the session ends, receiving the finished code string
//! for execution against the page. Both directions are plain functions over
//! explicit JSON structures; this crate's responsibility ends at well-formed
//! payloads. Context extraction is total: absent or wrong-typed host data
//! degrades to empty fields so the session can always open.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use injectpad_core::{PageContext, FALLBACK_SCRIPT};

/// Key the run payload stores the preprocessing results under.
pub const PREPROCESSING_RESULTS_KEY: &str = "preprocessingResults";

/// Field holding the page title inside the preprocessing results.
pub const TITLE_FIELD: &str = "title";

/// Field holding the page URL inside the preprocessing results. The capital
/// spelling is part of the wire contract.
pub const URL_FIELD: &str = "URL";

/// Key the finalize payload wraps its argument structure under.
pub const FINALIZE_ARGUMENT_KEY: &str = "finalizeArguments";

/// Field holding the code string inside the finalize arguments.
pub const CODE_FIELD: &str = "code";

/// The finalize argument structure delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeArguments {
    pub code: String,
}

/// Host-side response once the editor session has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeResponse {
    /// Execute the wrapped payload against the page.
    Execute(Value),
    /// The user cancelled; there is nothing to execute. An explicit signal,
    /// never an empty code string.
    NoResult,
}

/// Builds the run payload the way a host-side preprocessing script would,
/// from the page the extension was invoked on.
pub fn run_payload(title: &str, url: &str) -> Value {
    serde_json::json!({
        (PREPROCESSING_RESULTS_KEY): {
            (TITLE_FIELD): title,
            (URL_FIELD): url,
        }
    })
}

/// Extracts the page context from a run payload.
///
/// Never fails: a missing results key, a non-object payload, or wrong-typed
/// fields all default to empty strings. Downstream consumers that would show
/// the title simply show nothing.
pub fn extract_context(payload: &Value) -> PageContext {
    let results = payload.get(PREPROCESSING_RESULTS_KEY);
    let field = |name: &str| {
        results
            .and_then(|r| r.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default()
    };
    PageContext::new(field(TITLE_FIELD), field(URL_FIELD))
}

/// Builds the finalize payload for a finished session.
///
/// `None` means the user cancelled and maps to [`FinalizeResponse::NoResult`].
/// An empty code string is substituted with the fallback script; the host
/// never receives empty input to execute.
pub fn finalize_response(code: Option<&str>) -> FinalizeResponse {
    match code {
        Some(code) => {
            let code = if code.is_empty() { FALLBACK_SCRIPT } else { code };
            FinalizeResponse::Execute(serde_json::json!({
                (FINALIZE_ARGUMENT_KEY): FinalizeArguments {
                    code: code.to_string(),
                }
            }))
        }
        None => FinalizeResponse::NoResult,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn context_round_trips_through_the_run_payload() {
        let payload = run_payload("Example Domain", "https://example.com/");
        let context = extract_context(&payload);
        assert_eq!(context.title(), "Example Domain");
        assert_eq!(context.url(), "https://example.com/");
    }

    #[test]
    fn absent_results_degrade_to_empty_context() {
        assert_eq!(extract_context(&json!({})), PageContext::empty());
        assert_eq!(extract_context(&json!(null)), PageContext::empty());
        assert_eq!(extract_context(&json!("bogus")), PageContext::empty());
    }

    #[test]
    fn wrong_typed_fields_degrade_to_empty_strings() {
        let payload = json!({
            (PREPROCESSING_RESULTS_KEY): { (TITLE_FIELD): 42, (URL_FIELD): ["x"] }
        });
        assert_eq!(extract_context(&payload), PageContext::empty());
    }

    #[test]
    fn partial_results_keep_the_valid_field() {
        let payload = json!({ (PREPROCESSING_RESULTS_KEY): { (URL_FIELD): "https://a.example/" } });
        let context = extract_context(&payload);
        assert_eq!(context.title(), "");
        assert_eq!(context.url(), "https://a.example/");
    }

    #[test]
    fn finalize_wraps_code_under_the_argument_key() {
        let response = finalize_response(Some("x"));
        let FinalizeResponse::Execute(payload) = response else {
            panic!("expected an execute payload");
        };
        assert_eq!(
            payload,
            json!({ (FINALIZE_ARGUMENT_KEY): { (CODE_FIELD): "x" } })
        );
    }

    #[test]
    fn empty_code_is_replaced_with_the_fallback_script() {
        let FinalizeResponse::Execute(payload) = finalize_response(Some("")) else {
            panic!("expected an execute payload");
        };
        assert_eq!(
            payload[FINALIZE_ARGUMENT_KEY][CODE_FIELD],
            json!(FALLBACK_SCRIPT)
        );
    }

    #[test]
    fn cancellation_yields_an_explicit_no_result() {
        assert_eq!(finalize_response(None), FinalizeResponse::NoResult);
    }
}
