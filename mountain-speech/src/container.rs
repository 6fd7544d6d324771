//! Audio container detection from leading magic bytes.

use crate::wav;

/// Audio container formats a transcription server can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContainer {
    /// RIFF/WAVE.
    Wav,
    /// Ogg (Firefox's recorder output).
    Ogg,
    /// ISO base media / MP4 (Safari's recorder output).
    Mp4,
    /// Matroska/WebM (Chromium's recorder output).
    Webm,
    /// MPEG audio layer III.
    Mp3,
    /// Free Lossless Audio Codec.
    Flac,
}

impl AudioContainer {
    /// Identify the container from its first bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if wav::looks_like_wav(bytes) {
            Some(Self::Wav)
        } else if bytes.starts_with(b"OggS") {
            Some(Self::Ogg)
        } else if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
            Some(Self::Mp4)
        } else if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            Some(Self::Webm)
        } else if bytes.starts_with(b"fLaC") {
            Some(Self::Flac)
        } else if bytes.starts_with(b"ID3")
            || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
        {
            Some(Self::Mp3)
        } else {
            None
        }
    }

    /// Upload file name; servers pick the decoder from its extension.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Wav => "audio.wav",
            Self::Ogg => "audio.ogg",
            Self::Mp4 => "audio.mp4",
            Self::Webm => "audio.webm",
            Self::Mp3 => "audio.mp3",
            Self::Flac => "audio.flac",
        }
    }

    /// MIME type of the upload part.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Mp4 => "audio/mp4",
            Self::Webm => "audio/webm",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
        }
    }
}
