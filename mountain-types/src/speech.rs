//! Speech collaborators: transcription and synthesis.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from speech engines.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No audio bytes were supplied.
    #[error("no audio data received")]
    NoAudio,

    /// The audio was readable but held nothing the engine could transcribe.
    #[error("speech could not be recognized: {0}")]
    Unrecognized(String),

    /// The audio container could not be parsed.
    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    /// No engine is configured for this operation.
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but failed.
    #[error("speech engine failed: {0}")]
    Engine(String),

    /// A remote engine could not be reached or answered with an error.
    #[error("speech request failed: {0}")]
    Request(String),
}

/// Speech-to-text engine.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe raw audio bytes.
    ///
    /// Fails with [`SpeechError::Unrecognized`] when the audio holds no
    /// recognizable speech (silence, noise).
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError>;
}

/// Text-to-speech engine.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text` into a complete WAV file.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}
