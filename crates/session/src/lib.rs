//! One editing session per invocation: from page context in to code string out.
//! 每次呼叫對應一個編輯工作階段：輸入頁面資訊，輸出程式碼字串。
//!
//! The session is a small state machine. It opens in `Editing` with a
//! placeholder-seeded buffer, offers catalog snippets for insertion and saved
//! entries for loading, and ends either discarded (`Cancelled`, no payload) or
//! finalized (`Finalized`, a guaranteed non-empty code string), optionally
//! saving the buffer under a user-chosen name on the way out.

use std::fmt;

use thiserror::Error;

use injectpad_catalog::Snippet;
use injectpad_core::{EditorBuffer, EditorError, PageContext, FALLBACK_SCRIPT};
use injectpad_storage::{SavedCodeStore, StorageError};

/// Lifecycle states of an editing session.
/// 編輯工作階段的生命週期狀態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Buffer is mutable; snippets and saved code are available.
    Editing,
    /// The user chose save-then-run and is entering a name.
    NamingForSave,
    /// Terminal: code was handed off for execution.
    Finalized,
    /// Terminal: the user aborted; no code payload exists.
    Cancelled,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Editing => "editing",
            SessionState::NamingForSave => "naming-for-save",
            SessionState::Finalized => "finalized",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Whether the user confirmed overwriting an existing saved entry.
/// 使用者是否已確認覆寫既有的已儲存項目。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    Deny,
    Allow,
}

/// Errors surfaced by session actions. All of them are recoverable from the
/// user's standpoint; the session stays in a usable state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("action is not available in the {state} state")]
    InvalidState { state: SessionState },
    #[error("no name was entered")]
    EmptyName,
    #[error("a piece of code named {name:?} already exists")]
    NameTaken { name: String },
    #[error("no saved code named {name:?}")]
    UnknownName { name: String },
    #[error("snippet index {index} is out of bounds ({available} available)")]
    SnippetOutOfRange { index: usize, available: usize },
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(StorageError),
}

/// Confirmation token for loading a saved entry.
/// 載入已儲存項目前的確認憑證。
///
/// Loading replaces the whole buffer and discards unsaved edits, so it is a
/// two-step action: [`EditorSession::request_load`] hands out this token, the
/// caller shows its confirmation prompt, then passes the token to
/// [`EditorSession::confirm_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPrompt {
    name: String,
}

impl LoadPrompt {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The finished code string produced by a finalized session.
/// 工作階段完成時產出的程式碼字串。
///
/// Guaranteed non-empty: a blank or untouched-placeholder buffer yields the
/// fallback script instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    code: String,
}

impl SessionResult {
    fn from_buffer(buffer: &EditorBuffer) -> Self {
        let code = if buffer.is_blank() {
            FALLBACK_SCRIPT.to_string()
        } else {
            buffer.contents().to_string()
        };
        Self { code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

/// Orchestrates one invocation of the script editor.
/// 協調一次腳本編輯器的呼叫流程。
pub struct EditorSession {
    context: PageContext,
    buffer: EditorBuffer,
    store: SavedCodeStore,
    snippets: Vec<Snippet>,
    state: SessionState,
}

impl EditorSession {
    /// Opens a session in the `Editing` state with a placeholder-seeded buffer.
    ///
    /// The snippet catalog arrives separately via [`attach_catalog`]; until it
    /// does, [`snippets`] is empty and insertion is simply unavailable.
    ///
    /// [`attach_catalog`]: EditorSession::attach_catalog
    /// [`snippets`]: EditorSession::snippets
    pub fn new(context: PageContext, store: SavedCodeStore) -> Self {
        Self {
            context,
            buffer: EditorBuffer::with_placeholder(),
            store,
            snippets: Vec::new(),
            state: SessionState::Editing,
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    /// Publishes the asynchronously loaded catalog into the session.
    ///
    /// A publish that arrives after the session ended is dropped; the loader
    /// cannot be cancelled, it can only complete too late to matter.
    pub fn attach_catalog(&mut self, snippets: Vec<Snippet>) {
        if self.is_terminal() {
            return;
        }
        self.snippets = snippets;
    }

    /// Catalog entries available for insertion (empty until the catalog loads).
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Saved entry names, sorted for display.
    pub fn saved_names(&self) -> Vec<&String> {
        self.store.names()
    }

    /// Types text at the caret (replacing the selection, caret advances).
    pub fn insert_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_state(SessionState::Editing)?;
        self.buffer.insert(text)?;
        Ok(())
    }

    /// Moves the caret within the buffer.
    pub fn set_caret(&mut self, position: usize) -> Result<(), SessionError> {
        self.require_state(SessionState::Editing)?;
        self.buffer.set_caret(position)?;
        Ok(())
    }

    /// Inserts the catalog snippet at `index` at the caret position.
    pub fn insert_snippet(&mut self, index: usize) -> Result<(), SessionError> {
        self.require_state(SessionState::Editing)?;
        let snippet = self
            .snippets
            .get(index)
            .ok_or(SessionError::SnippetOutOfRange {
                index,
                available: self.snippets.len(),
            })?;
        let code = snippet.code.clone();
        self.buffer.insert(&code)?;
        Ok(())
    }

    /// First step of loading a saved entry: validates the name and returns a
    /// confirmation token. Loading discards unsaved edits, so the caller must
    /// confirm before [`confirm_load`] replaces the buffer.
    ///
    /// [`confirm_load`]: EditorSession::confirm_load
    pub fn request_load(&self, name: &str) -> Result<LoadPrompt, SessionError> {
        self.require_state(SessionState::Editing)?;
        if !self.store.contains(name) {
            return Err(SessionError::UnknownName {
                name: name.to_string(),
            });
        }
        Ok(LoadPrompt {
            name: name.to_string(),
        })
    }

    /// Second step of loading: replaces the entire buffer with the saved code.
    pub fn confirm_load(&mut self, prompt: LoadPrompt) -> Result<(), SessionError> {
        self.require_state(SessionState::Editing)?;
        let code = self
            .store
            .get(prompt.name())
            .ok_or(SessionError::UnknownName { name: prompt.name })?
            .to_string();
        self.buffer.replace_contents(code);
        Ok(())
    }

    /// Deletes a saved entry; an absent name is a quiet no-op.
    pub fn delete_saved(&mut self, name: &str) -> Result<bool, SessionError> {
        self.require_state(SessionState::Editing)?;
        self.store.delete(name).map_err(SessionError::Storage)
    }

    /// Discard-and-run: ends the session with the buffer as-is.
    pub fn finish_without_saving(&mut self) -> Result<SessionResult, SessionError> {
        self.require_state(SessionState::Editing)?;
        self.state = SessionState::Finalized;
        Ok(SessionResult::from_buffer(&self.buffer))
    }

    /// Save-then-run: moves to the naming step.
    pub fn begin_save(&mut self) -> Result<(), SessionError> {
        self.require_state(SessionState::Editing)?;
        self.state = SessionState::NamingForSave;
        Ok(())
    }

    /// Validates the supplied name, persists the buffer under it, and ends the
    /// session.
    ///
    /// Validation order: an empty name is rejected first; then a collision
    /// with an existing entry requires `Overwrite::Allow`. On either error the
    /// session stays in `NamingForSave` with the mapping untouched, so the
    /// caller can re-prompt.
    pub fn submit_name(
        &mut self,
        name: &str,
        overwrite: Overwrite,
    ) -> Result<SessionResult, SessionError> {
        self.require_state(SessionState::NamingForSave)?;
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        // Pick up entries persisted outside this session before the collision
        // check; overwrite detection must see the latest mapping.
        self.store.reload();
        if self.store.contains(name) && overwrite == Overwrite::Deny {
            return Err(SessionError::NameTaken {
                name: name.to_string(),
            });
        }
        self.store
            .save(name, self.buffer.contents())
            .map_err(SessionError::Storage)?;
        self.state = SessionState::Finalized;
        Ok(SessionResult::from_buffer(&self.buffer))
    }

    /// Returns to editing from the naming step without saving.
    pub fn cancel_naming(&mut self) -> Result<(), SessionError> {
        self.require_state(SessionState::NamingForSave)?;
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Aborts the session. No code payload is ever produced from a cancelled
    /// session. Cancelling an already-terminal session is a no-op.
    pub fn cancel(&mut self) {
        if !self.is_terminal() {
            self.state = SessionState::Cancelled;
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::Finalized | SessionState::Cancelled
        )
    }

    fn require_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState { state: self.state })
        }
    }
}
