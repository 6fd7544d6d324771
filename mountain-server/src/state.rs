//! Shared handler state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mountain_provider_static::PlaceholderVision;
use mountain_speech::{DisabledStt, Espeak};
use mountain_types::{Responder, SpeechToText, TextToSpeech, VisionProvider};

/// Input marker that the chat endpoint refuses with 400.
pub const DEFAULT_FLAGGED_INPUT_MARKER: &str = "ERR!";

/// Values substituted into the recruiter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruiterPage {
    /// Shown as the signed-in user.
    pub username: String,
    /// Assistant the page chats with.
    pub assistant_id: String,
    /// Interview countdown, in seconds.
    pub countdown: u32,
}

impl Default for RecruiterPage {
    fn default() -> Self {
        Self {
            username: "Guest".into(),
            assistant_id: "asst_recruiter".into(),
            countdown: 600,
        }
    }
}

/// Request-handling knobs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Upper bound on one chat turn; unbounded when `None`.
    pub chat_timeout: Option<Duration>,
    /// Chat input containing this is rejected with 400. Empty disables the check.
    pub flagged_input_marker: String,
    /// Root of `/static` and the recruiter page template.
    pub static_dir: PathBuf,
    /// Recruiter page values.
    pub recruiter: RecruiterPage,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat_timeout: None,
            flagged_input_marker: DEFAULT_FLAGGED_INPUT_MARKER.into(),
            static_dir: PathBuf::from("static"),
            recruiter: RecruiterPage::default(),
        }
    }
}

/// Collaborators and settings every handler sees.
///
/// Built once in `main` and cloned into each request; the collaborators are
/// shared behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Chat turn responder.
    pub responder: Arc<dyn Responder>,
    /// Speech-to-text engine.
    pub stt: Arc<dyn SpeechToText>,
    /// Text-to-speech engine.
    pub tts: Arc<dyn TextToSpeech>,
    /// Image analysis.
    pub vision: Arc<dyn VisionProvider>,
    /// Request-handling knobs.
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State around `responder` with no transcription, espeak-ng synthesis,
    /// the placeholder vision verdict and default settings.
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            stt: Arc::new(DisabledStt),
            tts: Arc::new(Espeak::new()),
            vision: Arc::new(PlaceholderVision),
            settings: Arc::new(Settings::default()),
        }
    }

    /// Replace the speech-to-text engine.
    pub fn with_stt(mut self, stt: Arc<dyn SpeechToText>) -> Self {
        self.stt = stt;
        self
    }

    /// Replace the text-to-speech engine.
    pub fn with_tts(mut self, tts: Arc<dyn TextToSpeech>) -> Self {
        self.tts = tts;
        self
    }

    /// Replace the vision collaborator.
    pub fn with_vision(mut self, vision: Arc<dyn VisionProvider>) -> Self {
        self.vision = vision;
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
