//! Consumer side: chunk sequence -> complete list or failure.

use futures::{Stream, StreamExt};
use mountain_types::StreamChunk;
use thiserror::Error;

/// A drained sequence reported a failure.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// A chunk carried this error text.
    #[error("{0}")]
    Failed(String),
}

/// Drain a chunk sequence into an ordered list.
///
/// Stops at the first error chunk and returns its text instead of the chunks
/// collected so far; the remainder of the sequence is dropped unread. A caller
/// therefore sees either every chunk in emission order or an explicit failure.
pub async fn drain<S>(chunks: S) -> Result<Vec<StreamChunk>, TurnError>
where
    S: Stream<Item = StreamChunk>,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut drained = Vec::new();

    while let Some(chunk) = chunks.next().await {
        if let Some(error) = chunk.error_message() {
            return Err(TurnError::Failed(error.to_string()));
        }
        drained.push(chunk);
    }

    Ok(drained)
}
