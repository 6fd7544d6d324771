//! Chat provider trait for completion backends.
//!
//! The [`ChatProvider`] trait uses RPITIT (return-position `impl Trait` in
//! traits) and is NOT object-safe. The object-safe boundary is
//! [`crate::Responder`], which `mountain_stream::ChatAdapter<P>` implements.

use std::future::Future;
use std::pin::Pin;

use futures::Stream;
use thiserror::Error;

use crate::turn::ConversationTurn;

/// Errors from chat providers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP or network request failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider rate-limited the request.
    #[error("rate limited")]
    RateLimited,

    /// Authentication/authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// The provider rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Provider is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Could not parse the provider's response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The stream broke after it was opened.
    #[error("stream error: {0}")]
    Stream(String),

    /// The provider finished without producing any text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether retrying this request might succeed.
    ///
    /// Informational only: nothing in the service retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited
                | ProviderError::RequestFailed(_)
                | ProviderError::ServiceUnavailable(_)
        )
    }
}

/// One increment of provider output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The provider (re)assigned the conversation thread.
    Thread(String),
    /// A piece of response text, in order.
    TextDelta(String),
}

/// Handle to an open provider session.
///
/// Dropping the handle closes the underlying connection.
pub struct ProviderStream {
    /// The events. Consume with `StreamExt::next()`; the stream ends when the
    /// provider signals completion.
    pub receiver: Pin<Box<dyn Stream<Item = Result<ProviderEvent, ProviderError>> + Send>>,
}

impl ProviderStream {
    /// Wrap any compatible stream.
    pub fn new(
        stream: impl Stream<Item = Result<ProviderEvent, ProviderError>> + Send + 'static,
    ) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }

    /// A finished stream that yields the given events in order.
    pub fn from_events(events: Vec<Result<ProviderEvent, ProviderError>>) -> Self {
        Self::new(futures::stream::iter(events))
    }
}

impl std::fmt::Debug for ProviderStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderStream").finish_non_exhaustive()
    }
}

/// Chat-completion backend.
///
/// Each call opens a fresh session for one conversation turn. Providers never
/// retry; the adapter turns any error into a terminal chunk.
pub trait ChatProvider: Send + Sync {
    /// Open a streaming session for the turn.
    fn open_turn(
        &self,
        turn: &ConversationTurn,
    ) -> impl Future<Output = Result<ProviderStream, ProviderError>> + Send;
}
