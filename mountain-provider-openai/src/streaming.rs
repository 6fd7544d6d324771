//! SSE streaming support for the Chat Completions API.
//!
//! Reference: <https://platform.openai.com/docs/api-reference/chat/streaming>

use futures::{Stream, StreamExt};
use mountain_types::{ProviderError, ProviderEvent, ProviderStream};
use reqwest::Response;

/// Wrap an HTTP response body into a [`ProviderStream`].
///
/// `thread` is reported as the first event when `minted` is set, so callers
/// learn the id of a conversation that started with this turn.
pub(crate) fn stream_completion(response: Response, thread: String, minted: bool) -> ProviderStream {
    ProviderStream::new(parse_sse_stream(response.bytes_stream(), thread, minted))
}

/// Parse a raw byte stream into provider events.
///
/// ```text
/// data: {"choices":[{"delta":{"content":"Hel"}}]}
///
/// data: {"choices":[{"delta":{"content":"lo"}}]}
///
/// data: [DONE]
/// ```
pub(crate) fn parse_sse_stream<E>(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
    thread: String,
    minted: bool,
) -> impl Stream<Item = Result<ProviderEvent, ProviderError>> + Send + 'static
where
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        if minted {
            yield Ok(ProviderEvent::Thread(thread));
        }

        let mut parser = SseParser::default();
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut buf: Vec<u8> = Vec::new();

        while let Some(chunk) = bytes_stream.next().await {
            let chunk = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield Err(ProviderError::Stream(format!("stream read error: {e}")));
                    return;
                }
            };
            buf.extend_from_slice(&chunk);

            // Split on raw bytes so a multi-byte character cut across chunks survives.
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = buf.drain(..=pos).collect();
                let line = match std::str::from_utf8(&raw) {
                    Ok(s) => s.trim_end_matches(['\n', '\r']),
                    Err(e) => {
                        yield Err(ProviderError::Stream(format!("UTF-8 decode error: {e}")));
                        return;
                    }
                };
                for event in parser.process_line(line) {
                    let failed = event.is_err();
                    yield event;
                    if failed {
                        return;
                    }
                }
                if parser.done {
                    return;
                }
            }
        }

        let tail = String::from_utf8_lossy(&buf).trim().to_string();
        if !tail.is_empty() {
            for event in parser.process_line(&tail) {
                yield event;
            }
        }
        for event in parser.process_line("") {
            yield event;
        }
    }
}

/// Accumulates `data:` lines until a blank line dispatches them.
#[derive(Default)]
struct SseParser {
    data: String,
    done: bool,
}

impl SseParser {
    fn process_line(&mut self, line: &str) -> Vec<Result<ProviderEvent, ProviderError>> {
        if self.done {
            return vec![];
        }
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(data) = line.strip_prefix("data:") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(data.strip_prefix(' ').unwrap_or(data));
        }
        // event:, id:, and ':' comment lines carry nothing we use.
        vec![]
    }

    fn dispatch(&mut self) -> Vec<Result<ProviderEvent, ProviderError>> {
        let data = std::mem::take(&mut self.data);
        if data.is_empty() {
            return vec![];
        }
        if data == "[DONE]" {
            self.done = true;
            return vec![];
        }

        let json: serde_json::Value = match serde_json::from_str(&data) {
            Ok(v) => v,
            Err(e) => {
                return vec![Err(ProviderError::InvalidResponse(format!(
                    "invalid SSE payload: {e}"
                )))];
            }
        };

        if let Some(error) = json.get("error") {
            let message = error["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return vec![Err(ProviderError::Stream(message))];
        }

        json["choices"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|choice| choice["delta"]["content"].as_str())
            .filter(|text| !text.is_empty())
            .map(|text| Ok(ProviderEvent::TextDelta(text.to_string())))
            .collect()
    }
}
