//! Synthesis through the `espeak-ng` command-line engine.

use std::process::Stdio;

use async_trait::async_trait;
use mountain_types::{SpeechError, TextToSpeech};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::wav;

/// Words per minute.
pub const DEFAULT_RATE: u32 = 150;

/// espeak-ng amplitude scale is 0..=200; 100 is the engine's normal volume.
pub const DEFAULT_AMPLITUDE: u32 = 100;

/// Text-to-speech via an `espeak-ng` child process.
///
/// Text goes in on stdin, WAV comes back on stdout. The child is killed if the
/// synthesis future is dropped.
#[derive(Debug, Clone)]
pub struct Espeak {
    binary: String,
    rate: u32,
    amplitude: u32,
    voice: Option<String>,
}

impl Espeak {
    /// Run `espeak-ng` from `PATH` at 150 wpm and normal volume.
    pub fn new() -> Self {
        Self {
            binary: "espeak-ng".into(),
            rate: DEFAULT_RATE,
            amplitude: DEFAULT_AMPLITUDE,
            voice: None,
        }
    }

    /// Override the executable (name on `PATH` or absolute path).
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Speech rate in words per minute.
    pub fn rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Amplitude, 0..=200.
    pub fn amplitude(mut self, amplitude: u32) -> Self {
        self.amplitude = amplitude.min(200);
        self
    }

    /// Voice name, e.g. `en-us`.
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--stdout")
            .arg("-s")
            .arg(self.rate.to_string())
            .arg("-a")
            .arg(self.amplitude.to_string());
        if let Some(voice) = &self.voice {
            command.arg("-v").arg(voice);
        }
        command
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for Espeak {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextToSpeech for Espeak {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Engine("no text to synthesize".into()));
        }

        let mut child = self.command().spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::Engine(format!("{} not found", self.binary))
            } else {
                SpeechError::Engine(format!("failed to start {}: {e}", self.binary))
            }
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpeechError::Engine("stdin not captured".into()))?;
        let input = text.to_string();
        let feed = async move {
            let written = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            written
        };

        // Feed stdin while draining stdout so neither pipe fills up.
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| SpeechError::Engine(e.to_string()))?;
        if let Err(e) = written {
            // A broken pipe just means the engine exited early; its status says why.
            tracing::debug!(error = %e, "mountain.tts.stdin_closed");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Engine(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        wav::header(&output.stdout)
            .map_err(|e| SpeechError::Engine(format!("engine produced unusable audio: {e}")))?;

        tracing::debug!(chars = text.len(), bytes = output.stdout.len(), "mountain.tts.synthesized");
        Ok(output.stdout)
    }
}
