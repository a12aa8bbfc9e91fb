/// In-memory WAV encoding using hound
use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use vox_core::AudioSignal;

/// PCM encoding used for the WAV payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavSampleFormat {
    /// 32-bit IEEE float, bit-exact for every finite sample
    #[default]
    Float32,
    /// 16-bit signed integer, clamped to [-1.0, 1.0]
    Pcm16,
}

impl WavSampleFormat {
    /// Bits per sample written to the header
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Float32 => 32,
            Self::Pcm16 => 16,
        }
    }

    /// Parse from string (for CLI/config values)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "float32" | "f32" | "float" => Some(Self::Float32),
            "pcm16" | "s16" | "i16" => Some(Self::Pcm16),
            _ => None,
        }
    }

    fn hound_format(self) -> hound::SampleFormat {
        match self {
            Self::Float32 => hound::SampleFormat::Float,
            Self::Pcm16 => hound::SampleFormat::Int,
        }
    }
}

/// Encode a mono signal into a WAV container held in memory
///
/// The header sample rate always equals `signal.sample_rate()`. NaN and
/// infinite samples are rejected rather than written.
pub fn encode_wav(signal: &AudioSignal, format: WavSampleFormat) -> Result<Vec<u8>> {
    let sample_rate = signal.sample_rate().as_hz();
    if sample_rate == 0 {
        return Err(AudioError::EncodeError(
            "Sample rate must be positive".to_string(),
        ));
    }

    if let Some(index) = signal.samples().iter().position(|s| !s.is_finite()) {
        return Err(AudioError::EncodeError(format!(
            "Non-finite sample {} at index {}",
            signal.samples()[index],
            index
        )));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: format.bits_per_sample(),
        sample_format: format.hound_format(),
    };

    let mut cursor = Cursor::new(Vec::with_capacity(
        44 + signal.len() * usize::from(format.bits_per_sample() / 8),
    ));

    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        match format {
            WavSampleFormat::Float32 => {
                for &sample in signal.samples() {
                    writer.write_sample(sample)?;
                }
            }
            WavSampleFormat::Pcm16 => {
                for &sample in signal.samples() {
                    let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round();
                    writer.write_sample(scaled as i16)?;
                }
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
