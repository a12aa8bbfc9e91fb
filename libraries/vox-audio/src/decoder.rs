/// Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use vox_core::{AudioSignal, EngineObserver, SampleRate};

const ENGINE: &str = "decoder";

/// Audio decoder using Symphonia
///
/// Supports: WAV, MP3, FLAC, OGG/Vorbis, M4A/AAC
///
/// Always decodes the whole default track into memory and downmixes it
/// to mono by averaging channels. The native sample rate is preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Check if the decoder recognises the file extension
    pub fn supports_format(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(
                ext.to_lowercase().as_str(),
                "mp3" | "flac" | "ogg" | "wav" | "m4a" | "aac"
            )
        } else {
            false
        }
    }

    /// Decode an audio file into a mono signal
    ///
    /// Corrupt packets are skipped and reported through `observer`;
    /// any other read failure aborts the decode.
    pub fn decode<O: EngineObserver>(&self, path: &Path, observer: &O) -> Result<AudioSignal> {
        // Check if file exists
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Symphonia(format!("Failed to probe file: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| AudioError::DecodeError("Unknown sample rate".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(AudioError::DecodeError(format!(
                        "Error reading packet: {}",
                        e
                    )));
                }
            };

            // Skip packets that are not for the default track
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::append_mono(decoded, &mut samples),
                Err(SymphoniaError::DecodeError(msg)) => {
                    skipped_packets += 1;
                    observer.warn(ENGINE, &format!("Skipping corrupt packet: {}", msg));
                }
                Err(e) => {
                    return Err(AudioError::DecodeError(format!("Decode error: {}", e)));
                }
            }
        }

        if skipped_packets > 0 {
            observer.warn(
                ENGINE,
                &format!(
                    "{} corrupt packet(s) skipped while decoding {}",
                    skipped_packets,
                    path.display()
                ),
            );
        }

        Ok(AudioSignal::new(samples, SampleRate::new(sample_rate)))
    }

    /// Convert a Symphonia buffer to mono f32 and append it
    ///
    /// Signed integers use symmetric scaling (divide by 2^(N-1)); float
    /// data passes through untouched.
    fn append_mono(decoded: AudioBufferRef, out: &mut Vec<f32>) {
        match decoded {
            AudioBufferRef::F32(buf) => Self::downmix(&buf, |s| s, out),
            AudioBufferRef::F64(buf) => Self::downmix(&buf, |s| s as f32, out),
            AudioBufferRef::S32(buf) => Self::downmix(&buf, |s| s as f32 / 2147483648.0, out),
            AudioBufferRef::S24(buf) => {
                Self::downmix(&buf, |s| s.inner() as f32 / 8388608.0, out);
            }
            AudioBufferRef::S16(buf) => Self::downmix(&buf, |s| s as f32 / 32768.0, out),
            AudioBufferRef::S8(buf) => Self::downmix(&buf, |s| s as f32 / 128.0, out),
            AudioBufferRef::U32(buf) => {
                Self::downmix(&buf, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0, out);
            }
            AudioBufferRef::U24(buf) => {
                Self::downmix(&buf, |s| (s.inner() as f32 / 16777215.0) * 2.0 - 1.0, out);
            }
            AudioBufferRef::U16(buf) => {
                Self::downmix(&buf, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0, out);
            }
            AudioBufferRef::U8(buf) => {
                Self::downmix(&buf, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0, out);
            }
        }
    }

    /// Average all channels of each frame into one sample
    fn downmix<T, F>(buf: &symphonia::core::audio::AudioBuffer<T>, normalize: F, out: &mut Vec<f32>)
    where
        T: symphonia::core::sample::Sample + Copy,
        F: Fn(T) -> f32,
    {
        let frames = buf.frames();
        let channels = buf.spec().channels.count();
        out.reserve(frames);

        match channels {
            0 => out.resize(out.len() + frames, 0.0),
            1 => out.extend(buf.chan(0).iter().map(|&s| normalize(s))),
            _ => {
                let scale = 1.0 / channels as f32;
                for i in 0..frames {
                    let sum: f32 = (0..channels).map(|ch| normalize(buf.chan(ch)[i])).sum();
                    out.push(sum * scale);
                }
            }
        }
    }
}

/// Decode `path` with a default decoder
pub fn decode<O: EngineObserver>(path: &Path, observer: &O) -> Result<AudioSignal> {
    SymphoniaDecoder::new().decode(path, observer)
}
