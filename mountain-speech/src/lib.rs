#![deny(missing_docs)]
//! Speech collaborators for the Mountain API service.
//!
//! | Engine | Trait | Backend |
//! |--------|-------|---------|
//! | [`WhisperHttp`] | [`SpeechToText`](mountain_types::SpeechToText) | `POST /v1/audio/transcriptions` |
//! | [`DisabledStt`] | [`SpeechToText`](mountain_types::SpeechToText) | none, always unavailable |
//! | [`Espeak`] | [`TextToSpeech`](mountain_types::TextToSpeech) | `espeak-ng` child process |
//!
//! [`wav`] holds the RIFF/WAVE helpers both directions use;
//! [`AudioContainer`] labels uploads by their magic bytes.

mod container;
mod espeak;
pub mod wav;
mod whisper;

pub use container::AudioContainer;
pub use espeak::{DEFAULT_AMPLITUDE, DEFAULT_RATE, Espeak};
pub use whisper::{DisabledStt, WhisperHttp};
