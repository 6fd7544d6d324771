//! Producer side: provider session -> chunk sequence.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use mountain_types::{
    ChatProvider, ChunkClock, ChunkStream, ConversationTurn, ProviderError, ProviderEvent,
    ProviderStream, Responder, StreamChunk,
};

/// Open provider session, closed when dropped.
///
/// The generator in [`respond`] owns this for as long as it reads from the
/// provider, so every exit path releases the connection: normal completion,
/// an error chunk, or the consumer dropping the sequence mid-read.
struct Session {
    events: ProviderStream,
    thread_id: String,
    finished: bool,
}

impl Session {
    fn new(events: ProviderStream, thread_id: &str) -> Self {
        tracing::debug!(thread_id, "mountain.provider.opened");
        Self {
            events,
            thread_id: thread_id.to_string(),
            finished: false,
        }
    }

    async fn next(&mut self) -> Option<Result<ProviderEvent, ProviderError>> {
        let event = self.events.receiver.next().await;
        if event.is_none() {
            self.finished = true;
        }
        event
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.finished {
            tracing::debug!(thread_id = %self.thread_id, "mountain.provider.closed");
        } else {
            tracing::debug!(thread_id = %self.thread_id, "mountain.provider.released");
        }
    }
}

/// Respond to one turn with a lazy chunk sequence.
///
/// Nothing happens until the returned stream is polled. The sequence yields
/// exactly one chunk:
///
/// - an error chunk carrying [`MISSING_PARAMETERS`](mountain_types::MISSING_PARAMETERS)
///   when any field of `turn` is empty (the provider is never called);
/// - an error chunk with the provider's fault description when opening the
///   session or reading from it fails, or when it ends without text;
/// - otherwise a text chunk with the concatenated deltas and the last thread
///   id the provider assigned (the caller's thread id if it assigned none).
pub fn respond<P>(
    provider: Arc<P>,
    turn: ConversationTurn,
) -> impl Stream<Item = StreamChunk> + Send + 'static
where
    P: ChatProvider + 'static,
{
    async_stream::stream! {
        let mut clock = ChunkClock::new();

        if let Err(e) = turn.validate() {
            tracing::debug!(thread_id = %turn.thread_id, error = %e, "mountain.turn.rejected");
            yield StreamChunk::error(e.to_string(), clock.now());
            return;
        }

        let events = match provider.open_turn(&turn).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(thread_id = %turn.thread_id, error = %e, "mountain.provider.open_failed");
                yield StreamChunk::error(e.to_string(), clock.now());
                return;
            }
        };

        let mut session = Session::new(events, &turn.thread_id);
        let mut thread_id = turn.thread_id.clone();
        let mut text = String::new();

        while let Some(event) = session.next().await {
            match event {
                Ok(ProviderEvent::Thread(id)) => thread_id = id,
                Ok(ProviderEvent::TextDelta(delta)) => text.push_str(&delta),
                Err(e) => {
                    tracing::warn!(thread_id = %thread_id, error = %e, "mountain.provider.stream_failed");
                    yield StreamChunk::error(e.to_string(), clock.now());
                    return;
                }
            }
        }
        drop(session);

        if text.is_empty() {
            yield StreamChunk::error(ProviderError::EmptyResponse.to_string(), clock.now());
            return;
        }

        tracing::debug!(thread_id = %thread_id, chars = text.len(), "mountain.turn.completed");
        yield StreamChunk::text(text, thread_id, clock.now());
    }
}

/// A [`Responder`] over any [`ChatProvider`].
///
/// Generic over `P: ChatProvider` (not object-safe). The object-safe boundary
/// is [`Responder`], which `ChatAdapter<P>` implements so handlers can hold an
/// `Arc<dyn Responder>`.
pub struct ChatAdapter<P: ChatProvider> {
    provider: Arc<P>,
}

impl<P: ChatProvider> ChatAdapter<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ChatProvider + 'static> Responder for ChatAdapter<P> {
    fn respond(&self, turn: ConversationTurn) -> ChunkStream {
        Box::pin(respond(Arc::clone(&self.provider), turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountain_types::MISSING_PARAMETERS;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    // -- Mock providers --

    struct ScriptedProvider {
        events: Vec<ProviderEvent>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(events: Vec<ProviderEvent>) -> Self {
            Self {
                events,
                calls: AtomicUsize::new(0),
            }
        }

        fn greeting() -> Self {
            Self::new(vec![
                ProviderEvent::Thread("thrd_123456".into()),
                ProviderEvent::TextDelta("Hello, ".into()),
                ProviderEvent::TextDelta("world".into()),
            ])
        }
    }

    impl ChatProvider for ScriptedProvider {
        fn open_turn(
            &self,
            _turn: &ConversationTurn,
        ) -> impl std::future::Future<Output = Result<ProviderStream, ProviderError>> + Send
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let events = self.events.iter().cloned().map(Ok).collect();
            async move { Ok(ProviderStream::from_events(events)) }
        }
    }

    struct FailingProvider;

    impl ChatProvider for FailingProvider {
        fn open_turn(
            &self,
            _turn: &ConversationTurn,
        ) -> impl std::future::Future<Output = Result<ProviderStream, ProviderError>> + Send
        {
            async { Err(ProviderError::AuthFailed("bad key".into())) }
        }
    }

    /// Emits a delta, then fails mid-stream.
    struct BrokenStreamProvider;

    impl ChatProvider for BrokenStreamProvider {
        fn open_turn(
            &self,
            _turn: &ConversationTurn,
        ) -> impl std::future::Future<Output = Result<ProviderStream, ProviderError>> + Send
        {
            async {
                Ok(ProviderStream::from_events(vec![
                    Ok(ProviderEvent::TextDelta("partial".into())),
                    Err(ProviderError::Stream("connection reset".into())),
                    Ok(ProviderEvent::TextDelta("never seen".into())),
                ]))
            }
        }
    }

    /// Emits one delta and then never finishes. Flags when its stream drops.
    struct HangingProvider {
        dropped: Arc<AtomicBool>,
        stream: Mutex<Option<ProviderStream>>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl HangingProvider {
        fn new() -> Self {
            let dropped = Arc::new(AtomicBool::new(false));
            let flag = DropFlag(Arc::clone(&dropped));
            let stream = async_stream::stream! {
                let _flag = flag;
                yield Ok::<_, ProviderError>(ProviderEvent::TextDelta("partial".into()));
                futures::future::pending::<()>().await;
            };
            Self {
                dropped,
                stream: Mutex::new(Some(ProviderStream::new(stream))),
            }
        }
    }

    impl ChatProvider for HangingProvider {
        fn open_turn(
            &self,
            _turn: &ConversationTurn,
        ) -> impl std::future::Future<Output = Result<ProviderStream, ProviderError>> + Send
        {
            let stream = self
                .stream
                .lock()
                .unwrap()
                .take()
                .expect("HangingProvider: opened twice");
            async move { Ok(stream) }
        }
    }

    async fn collect(stream: impl Stream<Item = StreamChunk>) -> Vec<StreamChunk> {
        stream.collect().await
    }

    // -- Tests --

    #[tokio::test]
    async fn success_yields_one_text_chunk() {
        let provider = Arc::new(ScriptedProvider::greeting());
        let chunks = collect(respond(provider, ConversationTurn::new("Hi", "123", "456"))).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text_content(), Some("Hello, world"));
        assert_eq!(chunks[0].thread_id.as_deref(), Some("thrd_123456"));
        assert!(chunks[0].error_message().is_none());
    }

    #[tokio::test]
    async fn caller_thread_kept_when_provider_assigns_none() {
        let provider = Arc::new(ScriptedProvider::new(vec![ProviderEvent::TextDelta(
            "ok".into(),
        )]));
        let chunks = collect(respond(provider, ConversationTurn::new("Hi", "t-1", "a"))).await;
        assert_eq!(chunks[0].thread_id.as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn last_thread_assignment_wins() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ProviderEvent::Thread("first".into()),
            ProviderEvent::TextDelta("ok".into()),
            ProviderEvent::Thread("second".into()),
        ]));
        let chunks = collect(respond(provider, ConversationTurn::new("Hi", "t", "a"))).await;
        assert_eq!(chunks[0].thread_id.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn empty_fields_short_circuit_without_provider_call() {
        for turn in [
            ConversationTurn::new("", "123", "456"),
            ConversationTurn::new("Hi", "", "456"),
            ConversationTurn::new("Hi", "123", ""),
        ] {
            let provider = Arc::new(ScriptedProvider::greeting());
            let chunks = collect(respond(Arc::clone(&provider), turn)).await;

            assert_eq!(chunks.len(), 1);
            assert_eq!(chunks[0].error_message(), Some(MISSING_PARAMETERS));
            assert!(chunks[0].text_content().is_none());
            assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn open_failure_yields_one_error_chunk() {
        let chunks = collect(respond(
            Arc::new(FailingProvider),
            ConversationTurn::new("Hi", "1", "2"),
        ))
        .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].error_message(), Some("auth failed: bad key"));
        assert!(chunks[0].text_content().is_none());
    }

    #[tokio::test]
    async fn mid_stream_failure_yields_one_error_chunk() {
        let chunks = collect(respond(
            Arc::new(BrokenStreamProvider),
            ConversationTurn::new("Hi", "1", "2"),
        ))
        .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].error_message(),
            Some("stream error: connection reset")
        );
    }

    #[tokio::test]
    async fn provider_without_text_is_an_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![ProviderEvent::Thread(
            "t".into(),
        )]));
        let chunks = collect(respond(provider, ConversationTurn::new("Hi", "1", "2"))).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].error_message(),
            Some("provider returned an empty response")
        );
    }

    #[tokio::test]
    async fn each_response_is_a_fresh_provider_call() {
        let adapter = ChatAdapter::new(ScriptedProvider::greeting());
        for _ in 0..3 {
            let chunks = collect(adapter.respond(ConversationTurn::new("Hi", "1", "2"))).await;
            assert_eq!(chunks.len(), 1);
        }
        assert_eq!(adapter.provider().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn sequence_is_lazy() {
        let adapter = ChatAdapter::new(ScriptedProvider::greeting());
        let stream = adapter.respond(ConversationTurn::new("Hi", "1", "2"));
        assert_eq!(adapter.provider().calls.load(Ordering::SeqCst), 0);
        drop(stream);
        assert_eq!(adapter.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn abandoning_the_sequence_releases_the_provider_stream() {
        let provider = Arc::new(HangingProvider::new());
        let dropped = Arc::clone(&provider.dropped);
        let mut chunks = Box::pin(respond(provider, ConversationTurn::new("Hi", "1", "2")));

        let waited = tokio::time::timeout(Duration::from_millis(50), chunks.next()).await;
        assert!(waited.is_err(), "hanging provider must not complete");
        assert!(!dropped.load(Ordering::SeqCst));

        drop(chunks);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn adapter_as_arc_dyn_responder() {
        let responder: Arc<dyn Responder> =
            Arc::new(ChatAdapter::new(ScriptedProvider::greeting()));
        let chunks = collect(responder.respond(ConversationTurn::new("Hi", "1", "2"))).await;
        assert_eq!(chunks[0].text_content(), Some("Hello, world"));
    }
}
