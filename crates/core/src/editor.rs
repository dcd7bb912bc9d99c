use thiserror::Error;

use crate::page::PLACEHOLDER_TEXT;

/// 編輯器緩衝區錯誤。 / Error conditions exposed by the editing buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("caret index {index} is out of bounds for buffer of length {len}")]
    CaretOutOfBounds { index: usize, len: usize },
    #[error("caret index {index} is not on a character boundary")]
    CaretNotOnCharBoundary { index: usize },
}

/// 定義一段已排序（start <= end）的文字範圍。 / Represents an ordered selection range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// 建立新的選取範圍，會自動將 start/end 排序。 / Creates a selection with automatically ordered bounds.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// 範圍起點。 / Returns the start of the selection.
    pub fn start(&self) -> usize {
        self.start
    }

    /// 範圍終點。 / Returns the end of the selection.
    pub fn end(&self) -> usize {
        self.end
    }

    /// 選取長度。 / Returns the length of the selection.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 描述緩衝區中的插入點。 / Represents the caret within the editor buffer (optional selection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caret {
    position: usize,
    selection: Option<Selection>,
}

impl Caret {
    /// 建立指定位置的游標。 / Creates a caret at the given position.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            selection: None,
        }
    }

    /// 建立帶有選取範圍的游標。 / Creates a caret with the provided selection range.
    pub fn with_selection(position: usize, selection: Selection) -> Self {
        Self {
            position,
            selection: Some(selection),
        }
    }

    /// 取得游標所在位置。 / Returns the caret position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// 取得選取範圍（若有）。 / Returns the active selection if present.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn edit_range(&self) -> (usize, usize) {
        if let Some(selection) = &self.selection {
            (selection.start, selection.end)
        } else {
            (self.position, self.position)
        }
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
        self.selection = None;
    }
}

/// 單一游標的可編輯文字緩衝。 / Single-caret editable text buffer.
///
/// Exactly one buffer exists per session. Insertions land at the caret and
/// replace the active selection if one is present; the caret ends up
/// immediately after the inserted text.
#[derive(Debug, Clone)]
pub struct EditorBuffer {
    contents: String,
    caret: Caret,
}

impl EditorBuffer {
    /// 從給定文字建立緩衝區，游標位於開頭。 / Creates a buffer with the caret at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            contents: text.into(),
            caret: Caret::new(0),
        }
    }

    /// 建立已填入佔位文字且全選的緩衝區。 / Creates a buffer seeded with the placeholder, fully selected.
    ///
    /// Mirrors the invocation-time editor state: the first insertion replaces
    /// the placeholder wholesale.
    pub fn with_placeholder() -> Self {
        let len = PLACEHOLDER_TEXT.len();
        Self {
            contents: PLACEHOLDER_TEXT.to_string(),
            caret: Caret::with_selection(len, Selection::new(0, len)),
        }
    }

    /// 取得目前的內容。 / Returns the current buffer contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// 取得游標。 / Returns the caret.
    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    /// 移動游標至指定位置並清除選取。 / Moves the caret, clearing any selection.
    pub fn set_caret(&mut self, position: usize) -> Result<(), EditorError> {
        self.validate_index(position)?;
        self.caret.set_position(position);
        Ok(())
    }

    /// 選取指定範圍。 / Selects the given range, caret at its end.
    pub fn select(&mut self, a: usize, b: usize) -> Result<(), EditorError> {
        self.validate_index(a)?;
        self.validate_index(b)?;
        let selection = Selection::new(a, b);
        self.caret = Caret::with_selection(selection.end(), selection);
        Ok(())
    }

    /// 選取整份內容。 / Selects the entire buffer.
    pub fn select_all(&mut self) {
        let len = self.contents.len();
        self.caret = Caret::with_selection(len, Selection::new(0, len));
    }

    /// 在游標處插入文字（取代現有選取）。 / Inserts text at the caret, replacing the selection.
    pub fn insert(&mut self, text: &str) -> Result<(), EditorError> {
        let (start, end) = self.caret.edit_range();
        self.validate_index(start)?;
        self.validate_index(end)?;
        self.contents.replace_range(start..end, text);
        self.caret.set_position(start + text.len());
        Ok(())
    }

    /// 以新文字取代整份內容，游標移至結尾。 / Replaces the whole contents, caret to the end.
    pub fn replace_contents(&mut self, text: impl Into<String>) {
        self.contents = text.into();
        self.caret = Caret::new(self.contents.len());
    }

    /// 內容為空或仍為佔位文字時回傳 `true`。 / True when empty or still the untouched placeholder.
    pub fn is_blank(&self) -> bool {
        self.contents.trim().is_empty() || self.contents == PLACEHOLDER_TEXT
    }

    fn validate_index(&self, index: usize) -> Result<(), EditorError> {
        if index > self.contents.len() {
            return Err(EditorError::CaretOutOfBounds {
                index,
                len: self.contents.len(),
            });
        }
        if !self.contents.is_char_boundary(index) {
            return Err(EditorError::CaretNotOnCharBoundary { index });
        }
        Ok(())
    }
}
