//! `POST /tts/` and `POST /stt/`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use mountain_types::SpeechError;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::form::FormFields;
use crate::state::AppState;

/// Reply when the upload holds no audio at all.
pub const NO_AUDIO_REPLY: &str =
    "No audio data received, please check the microphone and try again. ERR!";

/// Body of `POST /tts/`.
#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    /// Text to speak.
    #[serde(default)]
    pub user_input: Option<String>,
}

/// Body returned by `POST /stt/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttReply {
    /// Transcript, or a description of why there is none.
    pub stt_response: String,
}

/// Synthesize the posted text into a WAV file.
pub async fn tts(
    State(state): State<AppState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let text = body
        .ok()
        .and_then(|Json(request)| request.user_input)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No text provided for TTS".into()))?;

    tracing::info!(chars = text.len(), "mountain.tts.received");
    let audio = state
        .tts
        .synthesize(&text)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], audio))
}

/// Transcribe an uploaded recording.
///
/// Always answers 200; failures are described in `stt_response`.
pub async fn stt(State(state): State<AppState>, mut fields: FormFields) -> Json<SttReply> {
    let audio = fields
        .take_file("audio_file")
        .map(|upload| upload.bytes)
        .unwrap_or_default();
    tracing::info!(
        thread_id = %fields.text(&["thread_id", "threadId"]),
        bytes = audio.len(),
        "mountain.stt.received"
    );

    let stt_response = if audio.is_empty() {
        NO_AUDIO_REPLY.to_string()
    } else {
        match state.stt.transcribe(&audio).await {
            Ok(transcript) => transcript,
            Err(SpeechError::NoAudio) => NO_AUDIO_REPLY.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "mountain.stt.failed");
                format!("Sound data received but: {e}")
            }
        }
    };

    Json(SttReply { stt_response })
}
