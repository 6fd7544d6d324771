//! Chat Completions client struct and builder.

use std::collections::HashMap;
use std::future::Future;

use mountain_types::{ChatProvider, ConversationTurn, ProviderError, ProviderStream};

use crate::error::{map_http_status, map_reqwest_error};
use crate::mapping::{Assistant, assign_thread, to_api_request};
use crate::streaming::stream_completion;

/// Default model used when the turn's assistant does not name one.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for an OpenAI-compatible Chat Completions endpoint.
///
/// # Example
///
/// ```no_run
/// use mountain_provider_openai::{Assistant, OpenAi};
///
/// let provider = OpenAi::new()
///     .api_key("sk-...")
///     .model("gpt-4o-mini")
///     .assistant(Assistant {
///         id: "asst_recruiter".into(),
///         model: None,
///         instructions: "You screen job applicants.".into(),
///     });
/// ```
pub struct OpenAi {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) assistants: HashMap<String, Assistant>,
    pub(crate) client: reqwest::Client,
}

impl OpenAi {
    /// Create a client with no key, the public base URL, and `gpt-4o-mini`.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            assistants: HashMap::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base URL. A trailing slash is ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the default model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Register an assistant profile, replacing one with the same id.
    pub fn assistant(mut self, assistant: Assistant) -> Self {
        self.assistants.insert(assistant.id.clone(), assistant);
        self
    }

    /// Register several assistant profiles.
    pub fn assistants(self, assistants: impl IntoIterator<Item = Assistant>) -> Self {
        assistants.into_iter().fold(self, Self::assistant)
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl Default for OpenAi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAi")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("assistants", &self.assistants.len())
            .finish()
    }
}

impl ChatProvider for OpenAi {
    fn open_turn(
        &self,
        turn: &ConversationTurn,
    ) -> impl Future<Output = Result<ProviderStream, ProviderError>> + Send {
        let url = self.completions_url();
        let assistant = self.assistants.get(&turn.assistant_id);
        if assistant.is_none() {
            tracing::debug!(assistant_id = %turn.assistant_id, "mountain.openai.unknown_assistant");
        }
        let body = to_api_request(turn, assistant, &self.model);
        let (thread, minted) = assign_thread(&turn.thread_id);
        let api_key = self.api_key.clone();
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body["model"], thread_id = %thread, "mountain.openai.request");

            let mut request = http_client
                .post(&url)
                .header("content-type", "application/json")
                .header("accept", "text/event-stream")
                .json(&body);
            if let Some(key) = api_key {
                request = request.bearer_auth(key);
            }

            let response = request.send().await.map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response.text().await.map_err(map_reqwest_error)?;
                tracing::warn!(status = status.as_u16(), "mountain.openai.rejected");
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_completion(response, thread, minted))
        }
    }
}
