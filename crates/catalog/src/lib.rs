//! Built-in snippet catalog for the script editor.
//! （腳本編輯器的內建程式碼片段目錄。）
//!
//! The catalog is parsed from a plain-text resource: segments are delimited by
//! a literal `\n\n// MARK: ` marker, the first segment is a header, and each
//! remaining segment splits on the first `.\n` into a snippet name and body.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod loader;

pub use loader::load_in_background;

/// Marker separating catalog segments.
pub const SNIPPET_DELIMITER: &str = "\n\n// MARK: ";

/// Sequence separating a snippet's name from its body within a segment.
const NAME_TERMINATOR: &str = ".\n";

/// Errors raised while loading a snippet catalog resource.
/// （載入程式碼片段目錄資源時可能發生的錯誤。）
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read snippet catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single reusable script fragment offered for insertion.
/// （提供插入使用的單一可重複利用腳本片段。）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub code: String,
}

impl Snippet {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Read-only, source-ordered collection of snippets.
/// （唯讀且保留來源順序的片段集合。）
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    snippets: Vec<Snippet>,
}

impl Catalog {
    /// Parses catalog text into snippets.
    ///
    /// The first segment is discarded as a header. A segment without the
    /// `.\n` name terminator is malformed and skipped with a warning; a bad
    /// segment never fails the whole catalog.
    pub fn parse(contents: &str) -> Self {
        let mut snippets = Vec::new();
        for (index, segment) in contents.split(SNIPPET_DELIMITER).enumerate() {
            if index == 0 {
                continue;
            }
            match segment.split_once(NAME_TERMINATOR) {
                Some((name, code)) => snippets.push(Snippet::new(name, code)),
                None => {
                    log::warn!(
                        "skipping malformed snippet segment (no name terminator): {:?}",
                        segment.lines().next().unwrap_or("")
                    );
                }
            }
        }
        Self { snippets }
    }

    /// Loads and parses a catalog file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&contents))
    }

    /// Returns the bundled default snippet set.
    /// （回傳隨附的預設片段集合。）
    pub fn builtin() -> Self {
        Self::parse(include_str!("../resources/snippets.js"))
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn into_snippets(self) -> Vec<Snippet> {
        self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
