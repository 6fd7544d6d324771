#![deny(missing_docs)]
//! Streaming response adapter.
//!
//! Bridges a [`ChatProvider`](mountain_types::ChatProvider) and a caller that
//! wants the whole turn at once. [`respond`] opens one provider session and
//! exposes it as a lazy sequence of [`StreamChunk`](mountain_types::StreamChunk)s;
//! [`drain`] consumes such a sequence into an ordered list, aborting on the
//! first error chunk.
//!
//! ```text
//! turn ──► respond ──► [chunk, ...] ──► drain ──► Ok(list) | Err(TurnError)
//! ```
//!
//! A sequence always ends with exactly one chunk: the full response text, or
//! the description of whatever went wrong (validation, opening the session, or
//! a broken stream).

mod adapter;
mod drain;

pub use adapter::{ChatAdapter, respond};
pub use drain::{TurnError, drain};
