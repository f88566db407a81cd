//! Session payload carried in the signed cookie.
//!
//! # Design
//! The payload holds everything that is per-visitor: who is signed in, a
//! one-shot flash error, the favorite color and which todo this visitor is
//! editing. Keeping the edit cursor here means two visitors never see each
//! other's edit mode. Expiry is stored in the payload as well, so a replayed
//! cookie past its lifetime still reads as anonymous.

use serde::{Deserialize, Serialize};

use crate::intent::NO_TARGET;
use crate::types::TodoId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_id: Option<TodoId>,
    /// Unix seconds. `0` means "not yet committed".
    #[serde(default)]
    pub expires_at: i64,
}

impl SessionData {
    /// The signed-in user, or `""` when anonymous.
    pub fn current_user(&self) -> &str {
        &self.username
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }

    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at != 0 && now_secs >= self.expires_at
    }

    pub fn sign_in(&mut self, username: String) {
        self.username = username;
        self.error = None;
    }

    /// Forget the user and anything they were editing.
    pub fn sign_out(&mut self) {
        self.username.clear();
        self.edit_id = None;
    }

    /// Read and clear the flash error.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    pub fn start_edit(&mut self, id: TodoId) {
        self.edit_id = Some(id);
    }

    pub fn stop_edit(&mut self) {
        self.edit_id = None;
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.edit_id == Some(id)
    }

    /// Edit cursor in the packed encoding, `-1` for none.
    pub fn edit_cursor(&self) -> TodoId {
        self.edit_id.unwrap_or(NO_TARGET)
    }
}
