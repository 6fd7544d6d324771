//! `POST /chatbot/`.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use mountain_stream::drain;
use mountain_types::{ConversationTurn, StreamChunk};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::form::FormFields;
use crate::state::AppState;

/// One drained chunk as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Response text.
    pub assistant_response: String,
    /// Thread to continue on.
    pub thread_id: String,
    /// When the chunk was produced.
    pub message_time: DateTime<Utc>,
}

impl ChatReply {
    fn from_chunk(chunk: StreamChunk) -> Self {
        Self {
            assistant_response: chunk.text_content().unwrap_or_default().to_string(),
            thread_id: chunk.thread_id.unwrap_or_default(),
            message_time: chunk.timestamp,
        }
    }
}

/// Run one chat turn and return every chunk it produced.
pub async fn chatbot(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Json<Vec<ChatReply>>, ApiError> {
    let turn = ConversationTurn::new(
        fields.text(&["userinput", "userInput", "user_input"]),
        fields.text(&["thread_id", "threadId"]),
        fields.text(&["assistant_id", "assistantId"]),
    );
    let username = fields.text(&["username"]);
    tracing::info!(
        thread_id = %turn.thread_id,
        assistant_id = %turn.assistant_id,
        username = %username,
        chars = turn.user_input.len(),
        "mountain.chat.received"
    );

    let marker = &state.settings.flagged_input_marker;
    if !marker.is_empty() && turn.user_input.contains(marker.as_str()) {
        return Err(ApiError::BadRequest("Error".into()));
    }

    let chunks = state.responder.respond(turn);
    let drained = match state.settings.chat_timeout {
        Some(limit) => tokio::time::timeout(limit, drain(chunks))
            .await
            .map_err(|_| ApiError::Timeout("Chat response timed out".into()))?,
        None => drain(chunks).await,
    };
    let chunks = drained.map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(chunks.into_iter().map(ChatReply::from_chunk).collect()))
}
