#![deny(missing_docs)]
//! OpenAI-compatible Chat Completions provider.
//!
//! Implements [`mountain_types::ChatProvider`] against any server speaking the
//! `/v1/chat/completions` wire format with `stream: true` (OpenAI, vLLM,
//! llama.cpp server, Ollama's compatibility layer).
//!
//! Each turn is sent as a single user message, preceded by the assistant
//! profile's instructions when the turn's `assistant_id` names a configured
//! [`Assistant`]. No conversation history is kept between turns.

mod client;
pub(crate) mod error;
mod mapping;
pub(crate) mod streaming;

pub use client::OpenAi;
pub use mapping::{Assistant, NEW_THREAD};
