//! End-to-end tests for the codec adapter
//!
//! Fixtures are written with hound into a temp directory, decoded with
//! Symphonia and re-encoded into memory.

use std::f32::consts::PI;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use vox_audio::{decode, encode_wav, AudioError, WavSampleFormat};
use vox_core::{AudioSignal, NullObserver, ProcessingError};

// ========== Helper Functions ==========

fn sine(frequency: f32, sample_rate: u32, frames: usize, amplitude: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn write_wav(path: &Path, spec: hound::WavSpec, interleaved: &[f32]) {
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in interleaved {
        match spec.sample_format {
            hound::SampleFormat::Float => writer.write_sample(s).unwrap(),
            hound::SampleFormat::Int => writer.write_sample((s * 32767.0).round() as i16).unwrap(),
        }
    }
    writer.finalize().unwrap();
}

fn float_spec(channels: u16, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

// ========== Decode ==========

#[test]
fn float_mono_wav_decodes_bit_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mono.wav");
    let samples = sine(440.0, 44_100, 10_000, 0.5);
    write_wav(&path, float_spec(1, 44_100), &samples);

    let signal = decode(&path, &NullObserver).unwrap();

    assert_eq!(signal.sample_rate().as_hz(), 44_100);
    assert_eq!(signal.samples(), samples.as_slice());
}

#[test]
fn native_sample_rate_is_preserved() {
    let dir = TempDir::new().unwrap();
    for rate in [8_000, 22_050, 48_000, 96_000] {
        let path = dir.path().join(format!("rate_{}.wav", rate));
        write_wav(&path, float_spec(1, rate), &sine(100.0, rate, 1_000, 0.3));

        let signal = decode(&path, &NullObserver).unwrap();
        assert_eq!(signal.sample_rate().as_hz(), rate);
        assert_eq!(signal.len(), 1_000);
    }
}

#[test]
fn stereo_is_averaged_to_mono() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.wav");

    // Left carries 0.5, right carries -0.25
    let interleaved: Vec<f32> = (0..2_000)
        .flat_map(|_| [0.5_f32, -0.25_f32])
        .collect();
    write_wav(&path, float_spec(2, 48_000), &interleaved);

    let signal = decode(&path, &NullObserver).unwrap();
    assert_eq!(signal.len(), 2_000);
    assert!(signal.samples().iter().all(|&s| (s - 0.125).abs() < 1e-6));
}

#[test]
fn pcm16_is_scaled_into_unit_range() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pcm16.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    write_wav(&path, spec, &[1.0, -1.0, 0.5, 0.0]);

    let signal = decode(&path, &NullObserver).unwrap();
    let s = signal.samples();
    assert!((s[0] - 32767.0 / 32768.0).abs() < 1e-6);
    assert!((s[1] + 32767.0 / 32768.0).abs() < 1e-6);
    assert!((s[2] - 0.5).abs() < 1e-3);
    assert_eq!(s[3], 0.0);
    assert!(s.iter().all(|v| v.abs() <= 1.0));
}

#[test]
fn missing_file_maps_to_input_not_found() {
    let err = decode(Path::new("/does/not/exist.wav"), &NullObserver).unwrap_err();
    assert!(matches!(err, AudioError::FileNotFound(_)));

    let err: ProcessingError = err.into();
    assert!(err.to_string().contains("/does/not/exist.wav"));
}

#[test]
fn truncated_header_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.wav");
    std::fs::write(&path, b"RIFF\x24\x00\x00\x00WAVEfmt ").unwrap();

    let err = decode(&path, &NullObserver).unwrap_err();
    let err: ProcessingError = err.into();
    assert_eq!(err.kind(), vox_core::ErrorKind::DecodeError);
}

// ========== Encode ==========

#[test]
fn decode_encode_roundtrip_is_lossless_for_float() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("source.wav");
    let samples = sine(1_000.0, 48_000, 4_801, 0.8);
    write_wav(&path, float_spec(1, 48_000), &samples);

    let signal = decode(&path, &NullObserver).unwrap();
    let bytes = encode_wav(&signal, WavSampleFormat::Float32).unwrap();

    let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 48_000);
    let reread: Vec<f32> = reader.into_samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(reread, samples);
}

#[test]
fn encoding_is_deterministic() {
    let signal = AudioSignal::new(sine(300.0, 44_100, 3_000, 0.2), vox_core::SampleRate::CD_QUALITY);
    let a = encode_wav(&signal, WavSampleFormat::Float32).unwrap();
    let b = encode_wav(&signal, WavSampleFormat::Float32).unwrap();
    assert_eq!(a, b);
}

// ========== Properties ==========

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn pcm16_output_stays_in_range(samples in prop::collection::vec(-4.0f32..4.0, 0..512)) {
            let signal = AudioSignal::new(samples.clone(), vox_core::SampleRate::DVD_QUALITY);
            let bytes = encode_wav(&signal, WavSampleFormat::Pcm16).unwrap();

            let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
            prop_assert_eq!(reader.len() as usize, samples.len());
            for (written, original) in reader.into_samples::<i16>().zip(&samples) {
                let expected = (original.clamp(-1.0, 1.0) * 32767.0).round() as i16;
                prop_assert!((i32::from(written.unwrap()) - i32::from(expected)).abs() <= 1);
            }
        }
    }
}
