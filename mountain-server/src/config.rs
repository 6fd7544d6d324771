//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use mountain_provider_openai::{Assistant, OpenAi};
use mountain_provider_static::StaticProvider;
use mountain_speech::{DisabledStt, Espeak, WhisperHttp};
use mountain_stream::ChatAdapter;
use mountain_types::{Responder, SpeechToText};

use crate::state::{AppState, RecruiterPage, Settings};

/// Chat backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Canned greeting on a fixed thread.
    Static,
    /// OpenAI-compatible Chat Completions endpoint.
    Openai,
}

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "mountain-server", version, about = "Mountain API service")]
pub struct Args {
    /// Address to listen on.
    #[arg(long, env = "MOUNTAIN_HTTP_ADDR", default_value = "0.0.0.0:8000")]
    pub http_addr: String,

    /// Directory served under `/static`; holds `recruiter/recruiter.html`.
    #[arg(long, env = "MOUNTAIN_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Chat backend.
    #[arg(long, env = "MOUNTAIN_PROVIDER", value_enum, default_value_t = ProviderKind::Static)]
    pub provider: ProviderKind,

    /// Base URL of the OpenAI-compatible server.
    #[arg(long, env = "MOUNTAIN_OPENAI_BASE_URL", default_value = "https://api.openai.com")]
    pub openai_base_url: String,

    /// Bearer token for the chat server.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model for assistants that do not name one.
    #[arg(long, env = "MOUNTAIN_OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    /// JSON file with a list of `{id, model, instructions}` assistant profiles.
    #[arg(long, env = "MOUNTAIN_ASSISTANTS")]
    pub assistants: Option<PathBuf>,

    /// Give up on a chat turn after this many seconds (504).
    #[arg(long, env = "MOUNTAIN_CHAT_TIMEOUT_SECS")]
    pub chat_timeout_secs: Option<u64>,

    /// Chat input containing this marker is refused with 400; empty disables.
    #[arg(long, env = "MOUNTAIN_FLAGGED_INPUT_MARKER", default_value = "ERR!")]
    pub flagged_input_marker: String,

    /// Whisper-compatible transcription server; transcription is off without it.
    #[arg(long, env = "MOUNTAIN_STT_BASE_URL")]
    pub stt_base_url: Option<String>,

    /// Bearer token for the transcription server.
    #[arg(long, env = "MOUNTAIN_STT_API_KEY", hide_env_values = true)]
    pub stt_api_key: Option<String>,

    /// Transcription model.
    #[arg(long, env = "MOUNTAIN_STT_MODEL", default_value = "whisper-1")]
    pub stt_model: String,

    /// espeak-ng executable.
    #[arg(long, env = "MOUNTAIN_ESPEAK_BIN", default_value = "espeak-ng")]
    pub espeak_bin: String,

    /// Synthesis speed, words per minute.
    #[arg(long, env = "MOUNTAIN_TTS_RATE", default_value_t = mountain_speech::DEFAULT_RATE)]
    pub tts_rate: u32,

    /// Synthesis volume, 0..=200.
    #[arg(long, env = "MOUNTAIN_TTS_AMPLITUDE", default_value_t = mountain_speech::DEFAULT_AMPLITUDE)]
    pub tts_amplitude: u32,

    /// espeak-ng voice, e.g. `en-us`; the engine default when unset.
    #[arg(long, env = "MOUNTAIN_TTS_VOICE")]
    pub tts_voice: Option<String>,

    /// User name shown on the recruiter page.
    #[arg(long, env = "MOUNTAIN_HR_USERNAME", default_value = "Guest")]
    pub hr_username: String,

    /// Assistant the recruiter page chats with.
    #[arg(long, env = "MOUNTAIN_HR_ASSISTANT_ID", default_value = "asst_recruiter")]
    pub hr_assistant_id: String,

    /// Interview countdown shown on the recruiter page, in seconds.
    #[arg(long, env = "MOUNTAIN_HR_COUNTDOWN", default_value_t = 600)]
    pub hr_countdown: u32,
}

/// Configuration that parses but cannot be used.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The assistants file could not be read.
    #[error("failed to read assistants file {path}: {source}")]
    ReadAssistants {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The assistants file is not a JSON list of profiles.
    #[error("failed to parse assistants file {path}: {source}")]
    ParseAssistants {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl Args {
    /// Handler settings.
    pub fn settings(&self) -> Settings {
        Settings {
            chat_timeout: self.chat_timeout_secs.map(Duration::from_secs),
            flagged_input_marker: self.flagged_input_marker.clone(),
            static_dir: self.static_dir.clone(),
            recruiter: RecruiterPage {
                username: self.hr_username.clone(),
                assistant_id: self.hr_assistant_id.clone(),
                countdown: self.hr_countdown,
            },
        }
    }

    /// Assistant profiles from `--assistants`, or none.
    pub fn load_assistants(&self) -> Result<Vec<Assistant>, ConfigError> {
        let Some(path) = &self.assistants else {
            return Ok(Vec::new());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadAssistants {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseAssistants {
            path: path.clone(),
            source,
        })
    }

    /// The synthesis engine described by the `--espeak-bin` and `--tts-*` flags.
    pub fn espeak(&self) -> Espeak {
        let espeak = Espeak::new()
            .binary(&self.espeak_bin)
            .rate(self.tts_rate)
            .amplitude(self.tts_amplitude);
        match &self.tts_voice {
            Some(voice) => espeak.voice(voice),
            None => espeak,
        }
    }

    /// Build every collaborator and the shared state.
    pub fn build_state(&self) -> Result<AppState, ConfigError> {
        let responder: Arc<dyn Responder> = match self.provider {
            ProviderKind::Static => Arc::new(ChatAdapter::new(StaticProvider::default())),
            ProviderKind::Openai => {
                let assistants = self.load_assistants()?;
                tracing::info!(
                    base_url = %self.openai_base_url,
                    model = %self.openai_model,
                    assistants = assistants.len(),
                    "mountain.config.openai"
                );
                let mut provider = OpenAi::new()
                    .base_url(&self.openai_base_url)
                    .model(&self.openai_model)
                    .assistants(assistants);
                if let Some(key) = &self.openai_api_key {
                    provider = provider.api_key(key);
                }
                Arc::new(ChatAdapter::new(provider))
            }
        };

        let stt: Arc<dyn SpeechToText> = match &self.stt_base_url {
            Some(base_url) => {
                let mut stt = WhisperHttp::new(base_url).model(&self.stt_model);
                if let Some(key) = &self.stt_api_key {
                    stt = stt.api_key(key);
                }
                Arc::new(stt)
            }
            None => {
                tracing::info!("mountain.config.stt_disabled");
                Arc::new(DisabledStt)
            }
        };

        Ok(AppState::new(responder)
            .with_stt(stt)
            .with_tts(Arc::new(self.espeak()))
            .with_settings(self.settings()))
    }
}
