//! RIFF/WAVE inspection.

use std::io::Cursor;

use mountain_types::SpeechError;

/// Peak amplitude (normalized to 0.0..=1.0) below which audio counts as silent.
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// What a WAV file holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WavSummary {
    /// Interleaved channel count.
    pub channels: u16,
    /// Samples per second, per channel.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Sample frames (one sample per channel).
    pub frames: u32,
    /// Playback length.
    pub duration_ms: u64,
    /// Largest absolute sample, normalized to 0.0..=1.0.
    pub peak: f32,
}

impl WavSummary {
    /// No samples, or nothing louder than [`SILENCE_THRESHOLD`].
    pub fn is_silent(&self) -> bool {
        self.frames == 0 || self.peak < SILENCE_THRESHOLD
    }
}

/// Whether `bytes` start with a RIFF/WAVE header.
pub fn looks_like_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Parse the format header only, without reading samples.
///
/// Streams written to a pipe carry placeholder chunk sizes, so their sample
/// data cannot be fully read back; the header is still authoritative.
pub fn header(bytes: &[u8]) -> Result<hound::WavSpec, SpeechError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;
    Ok(reader.spec())
}

/// Decode every sample and summarize the file.
pub fn inspect(bytes: &[u8]) -> Result<WavSummary, SpeechError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;
    let spec = reader.spec();
    let frames = reader.duration();

    let peak = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader.samples::<i32>().try_fold(0.0_f32, |peak, s| {
                s.map(|s| peak.max(s.unsigned_abs() as f32 / max_value))
            })
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .try_fold(0.0_f32, |peak, s| s.map(|s| peak.max(s.abs()))),
    }
    .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;

    let duration_ms = if spec.sample_rate == 0 {
        0
    } else {
        u64::from(frames) * 1000 / u64::from(spec.sample_rate)
    };

    Ok(WavSummary {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        frames,
        duration_ms,
        peak: peak.min(1.0),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::tone;

    #[test]
    fn summarizes_tone() {
        let summary = inspect(&tone(16_000, 8_000, 0.5)).unwrap();
        assert_eq!(summary.channels, 1);
        assert_eq!(summary.sample_rate, 16_000);
        assert_eq!(summary.bits_per_sample, 16);
        assert_eq!(summary.frames, 8_000);
        assert_eq!(summary.duration_ms, 500);
        assert!((summary.peak - 0.5).abs() < 0.01);
        assert!(!summary.is_silent());
    }

    #[test]
    fn zero_amplitude_is_silent() {
        assert!(inspect(&tone(16_000, 1_600, 0.0)).unwrap().is_silent());
    }

    #[test]
    fn no_samples_is_silent() {
        let summary = inspect(&tone(16_000, 0, 0.8)).unwrap();
        assert_eq!(summary.duration_ms, 0);
        assert!(summary.is_silent());
    }

    #[test]
    fn float_samples_are_supported() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..800 {
                writer.write_sample(0.25_f32).unwrap();
                writer.write_sample(-0.75_f32).unwrap();
            }
            writer.finalize().unwrap();
        }
        let summary = inspect(&cursor.into_inner()).unwrap();
        assert_eq!(summary.channels, 2);
        assert_eq!(summary.frames, 800);
        assert_eq!(summary.duration_ms, 100);
        assert!((summary.peak - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn garbage_is_invalid_audio() {
        let err = inspect(b"definitely not audio").unwrap_err();
        assert!(matches!(err, SpeechError::InvalidAudio(_)));
    }

    #[test]
    fn sniffs_riff_header() {
        assert!(looks_like_wav(&tone(8_000, 10, 0.1)));
        assert!(!looks_like_wav(b"\x1aE\xdf\xa3webm"));
        assert!(!looks_like_wav(b"RIFF"));
    }

    #[test]
    fn header_reads_format_only() {
        let spec = header(&tone(22_050, 100, 0.3)).unwrap();
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.channels, 1);
    }
}
