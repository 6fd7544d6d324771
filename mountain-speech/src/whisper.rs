//! Transcription over an OpenAI-compatible `/v1/audio/transcriptions` endpoint.

use async_trait::async_trait;
use mountain_types::{SpeechError, SpeechToText};
use serde::Deserialize;

use crate::container::AudioContainer;
use crate::wav;

const DEFAULT_MODEL: &str = "whisper-1";

/// Speech-to-text client for Whisper-style HTTP servers.
///
/// WAV uploads are inspected first: silent or empty recordings are rejected
/// as [`SpeechError::Unrecognized`] without a network call. Other containers
/// are forwarded unchanged, labelled with the format their magic bytes name;
/// unrecognized bytes go out as WebM, the Chromium recorder default.
pub struct WhisperHttp {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) model: String,
    pub(crate) client: reqwest::Client,
}

#[derive(Deserialize)]
struct Transcription {
    text: String,
}

impl WhisperHttp {
    /// Client for the server at `base_url`, using model `whisper-1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Send `Authorization: Bearer <key>`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the transcription model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn transcriptions_url(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.base_url)
    }
}

impl std::fmt::Debug for WhisperHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperHttp")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl SpeechToText for WhisperHttp {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::NoAudio);
        }

        let container = AudioContainer::sniff(audio).unwrap_or_else(|| {
            tracing::debug!(bytes = audio.len(), "mountain.stt.unknown_container");
            AudioContainer::Webm
        });
        if container == AudioContainer::Wav {
            let summary = wav::inspect(audio)?;
            tracing::debug!(
                duration_ms = summary.duration_ms,
                peak = summary.peak,
                "mountain.stt.inspected"
            );
            if summary.is_silent() {
                return Err(SpeechError::Unrecognized("no speech detected".into()));
            }
        }

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(container.file_name())
            .mime_str(container.mime())
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let url = self.transcriptions_url();
        tracing::debug!(url = %url, bytes = audio.len(), "mountain.stt.request");

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "mountain.stt.rejected");
            return Err(SpeechError::Request(format!("HTTP {status}: {body}")));
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| SpeechError::Request(format!("invalid transcription response: {e}")))?;

        let text = transcription.text.trim();
        if text.is_empty() {
            return Err(SpeechError::Unrecognized("empty transcript".into()));
        }
        Ok(text.to_string())
    }
}

/// Transcription stand-in used when no engine is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledStt;

#[async_trait]
impl SpeechToText for DisabledStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
        Err(SpeechError::Unavailable(
            "speech-to-text is not configured".into(),
        ))
    }
}
