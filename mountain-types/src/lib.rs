#![deny(missing_docs)]
//! Protocol types for the Mountain API service.
//!
//! | Concern | Items |
//! |---------|-------|
//! | Conversation input | [`ConversationTurn`], [`ValidationError`] |
//! | Adapter output | [`StreamChunk`], [`ChunkPayload`], [`ChunkClock`] |
//! | Chat backends | [`ChatProvider`], [`ProviderEvent`], [`ProviderStream`], [`ProviderError`] |
//! | Object-safe boundary | [`Responder`], [`ChunkStream`] |
//! | Speech | [`SpeechToText`], [`TextToSpeech`], [`SpeechError`] |
//! | Vision | [`VisionProvider`], [`VisionRequest`], [`VisionOutput`], [`VisionError`] |
//!
//! [`ChatProvider`] uses RPITIT and is generic-only. Anything that has to
//! live behind an `Arc<dyn _>` (the HTTP state) goes through [`Responder`],
//! which the adapter crate implements for every provider.

pub mod chunk;
pub mod provider;
pub mod responder;
pub mod speech;
pub mod turn;
pub mod vision;

pub use chunk::{ChunkClock, ChunkPayload, StreamChunk};
pub use provider::{ChatProvider, ProviderError, ProviderEvent, ProviderStream};
pub use responder::{ChunkStream, Responder};
pub use speech::{SpeechError, SpeechToText, TextToSpeech};
pub use turn::{ConversationTurn, MISSING_PARAMETERS, ValidationError};
pub use vision::{VisionError, VisionOutput, VisionProvider, VisionRequest};
