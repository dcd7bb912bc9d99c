pub mod editor;
pub mod page;

pub use editor::{Caret, EditorBuffer, EditorError, Selection};
pub use page::{PageContext, FALLBACK_SCRIPT, PLACEHOLDER_TEXT};
