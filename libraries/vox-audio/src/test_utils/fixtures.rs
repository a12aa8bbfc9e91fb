//! WAV fixture helpers
//!
//! Writes mono test files with hound and reads engine payloads back.

use std::io::Cursor;
use std::path::Path;

/// Write a mono 32-bit float WAV file
pub fn write_float_wav(path: &Path, samples: &[f32], sample_rate: u32) -> hound::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Write an interleaved 16-bit PCM WAV file with `channels` channels
pub fn write_pcm16_wav(
    path: &Path,
    interleaved: &[f32],
    channels: u16,
    sample_rate: u32,
) -> hound::Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in interleaved {
        writer.write_sample((sample.clamp(-1.0, 1.0) * 32767.0).round() as i16)?;
    }
    writer.finalize()
}

/// Read a mono float WAV payload back into its sample rate and samples
pub fn read_float_wav(bytes: &[u8]) -> hound::Result<(u32, Vec<f32>)> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let sample_rate = reader.spec().sample_rate;
    let samples = reader
        .into_samples::<f32>()
        .collect::<hound::Result<Vec<f32>>>()?;
    Ok((sample_rate, samples))
}
