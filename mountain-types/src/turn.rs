//! The per-request conversation input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error text carried by the chunk emitted for an incomplete turn.
pub const MISSING_PARAMETERS: &str = "ERR! Missing required parameters.";

/// A turn failed validation before any provider call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One of user input, thread id or assistant id was empty.
    #[error("{}", MISSING_PARAMETERS)]
    MissingParameters,
}

/// One conversational turn: what the caller said, on which thread, to which
/// assistant.
///
/// Built per request and dropped once the response is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Opaque conversation-session identifier.
    pub thread_id: String,
    /// Opaque identifier of the assistant persona to use.
    pub assistant_id: String,
    /// Text submitted by the caller.
    pub user_input: String,
}

impl ConversationTurn {
    /// Create a new turn.
    pub fn new(
        user_input: impl Into<String>,
        thread_id: impl Into<String>,
        assistant_id: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            assistant_id: assistant_id.into(),
            user_input: user_input.into(),
        }
    }

    /// Check that every required field is non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_input.is_empty() || self.thread_id.is_empty() || self.assistant_id.is_empty()
        {
            return Err(ValidationError::MissingParameters);
        }
        Ok(())
    }
}
