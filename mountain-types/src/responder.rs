//! Object-safe boundary between HTTP handlers and chat backends.

use std::pin::Pin;

use futures::Stream;

use crate::chunk::StreamChunk;
use crate::turn::ConversationTurn;

/// Lazy, finite, ordered sequence of chunks for one turn.
pub type ChunkStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// Turns a conversation turn into a chunk sequence.
///
/// Every call builds an independent sequence; sequences are not restartable.
/// Dropping a sequence before it ends releases whatever it holds open.
pub trait Responder: Send + Sync {
    /// Start responding to `turn`. Nothing happens until the stream is polled.
    fn respond(&self, turn: ConversationTurn) -> ChunkStream;
}
