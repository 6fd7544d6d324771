#![deny(missing_docs)]
//! Placeholder providers with canned replies.
//!
//! [`StaticProvider`] answers every turn with the same text on the same
//! thread. [`PlaceholderVision`] accepts every image. Both stand in for real
//! integrations and are what the server runs with when nothing else is
//! configured.

use async_trait::async_trait;
use mountain_types::{
    ChatProvider, ConversationTurn, ProviderError, ProviderEvent, ProviderStream, VisionError,
    VisionOutput, VisionProvider, VisionRequest,
};

/// Reply sent by [`StaticProvider::default`].
pub const DEFAULT_REPLY: &str =
    "Hello, I am a GPT-1 chatbot. I am here to assist you. How can I help you today?";

/// Thread assigned by [`StaticProvider::default`].
pub const DEFAULT_THREAD: &str = "thrd_123456";

/// Verdict returned by [`PlaceholderVision`].
pub const VISION_VERDICT: &str = "This file is okay.";

/// Chat provider that always answers with the same reply.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    reply: String,
    thread_id: String,
}

impl StaticProvider {
    /// Create a provider with a custom reply and thread id.
    pub fn new(reply: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            thread_id: thread_id.into(),
        }
    }
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY, DEFAULT_THREAD)
    }
}

impl ChatProvider for StaticProvider {
    fn open_turn(
        &self,
        turn: &ConversationTurn,
    ) -> impl std::future::Future<Output = Result<ProviderStream, ProviderError>> + Send {
        tracing::debug!(
            thread_id = %turn.thread_id,
            assistant_id = %turn.assistant_id,
            "mountain.static.open_turn"
        );
        let events = vec![
            Ok(ProviderEvent::Thread(self.thread_id.clone())),
            Ok(ProviderEvent::TextDelta(self.reply.clone())),
        ];
        async move { Ok(ProviderStream::from_events(events)) }
    }
}

/// Vision provider that accepts every image and keeps the thread.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderVision;

#[async_trait]
impl VisionProvider for PlaceholderVision {
    async fn describe(&self, request: VisionRequest) -> Result<VisionOutput, VisionError> {
        tracing::debug!(
            file = %request.file_name,
            bytes = request.image.len(),
            "mountain.vision.placeholder"
        );
        Ok(VisionOutput {
            content: VISION_VERDICT.to_string(),
            thread_id: request.thread_id,
        })
    }
}
