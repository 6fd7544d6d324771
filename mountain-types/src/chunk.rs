//! Chunks emitted by the streaming response adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a chunk carries. A chunk is either text or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkPayload {
    /// Response text.
    Text(String),
    /// Description of the fault that ended the sequence.
    Error(String),
}

/// One unit of a streamed conversational response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Text or error.
    pub payload: ChunkPayload,
    /// Thread the text belongs to. Absent on error chunks.
    pub thread_id: Option<String>,
    /// When the chunk was produced.
    pub timestamp: DateTime<Utc>,
}

impl StreamChunk {
    /// A successful chunk.
    pub fn text(
        text: impl Into<String>,
        thread_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            payload: ChunkPayload::Text(text.into()),
            thread_id: Some(thread_id.into()),
            timestamp,
        }
    }

    /// A terminal error chunk.
    pub fn error(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            payload: ChunkPayload::Error(error.into()),
            thread_id: None,
            timestamp,
        }
    }

    /// The response text, if this is a text chunk.
    pub fn text_content(&self) -> Option<&str> {
        match &self.payload {
            ChunkPayload::Text(text) => Some(text),
            ChunkPayload::Error(_) => None,
        }
    }

    /// The error description, if this is an error chunk.
    pub fn error_message(&self) -> Option<&str> {
        match &self.payload {
            ChunkPayload::Error(error) => Some(error),
            ChunkPayload::Text(_) => None,
        }
    }
}

/// Timestamp source for one chunk sequence.
///
/// Wall-clock readings can step backwards; the clock clamps each reading to
/// the last one it handed out so timestamps never decrease within a sequence.
#[derive(Debug, Default)]
pub struct ChunkClock {
    last: Option<DateTime<Utc>>,
}

impl ChunkClock {
    /// Create a clock with no readings yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, never earlier than the previous call's result.
    pub fn now(&mut self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    /// Clamp an externally supplied reading.
    pub fn observe(&mut self, reading: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last {
            Some(last) if last > reading => last,
            _ => reading,
        };
        self.last = Some(stamp);
        stamp
    }
}
