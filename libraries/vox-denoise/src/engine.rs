//! Adaptive spectral noise reduction engine
//!
//! Estimates the noise spectrum from the opening of the recording and
//! subtracts it from every frame of the full signal.
//!
//! ```text
//! ┌────────────┐   ┌─────────────────┐   ┌───────────────┐
//! │ Decode     │──►│ Noise window    │──►│ NoiseProfile  │
//! └────────────┘   │ (first 0.5 s)   │   │ (median/bin)  │
//!       │          └─────────────────┘   └───────┬───────┘
//!       ▼                                        ▼
//! ┌────────────┐   ┌─────────────────┐   ┌───────────────┐
//! │ STFT       │──►│ magnitude/phase │──►│ subtract+clamp│──► ISTFT ──► WAV
//! └────────────┘   └─────────────────┘   └───────────────┘
//! ```

use crate::spectral::{subtract_noise, NoiseProfile, SpectralFrame};
use crate::stft::{Stft, StftConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vox_audio::{encode_wav, peak, WavSampleFormat};
use vox_core::{
    AudioSignal, EngineObserver, ProcessingError, ProcessingResult, Result, SILENCE_THRESHOLD,
};

const ENGINE: &str = "noise_reduction";

/// Default length of the leading noise-profile window in seconds
pub const DEFAULT_NOISE_DURATION_SEC: f64 = 0.5;

/// Default over-subtraction margin applied to the noise profile
pub const DEFAULT_NOISE_FLOOR: f32 = 0.02;

/// Message returned when the profile window is silent
pub const SILENT_PROFILE_MESSAGE: &str = "Noise profile silent, returning original.";

/// Message returned after a completed subtraction
pub const COMPLETE_MESSAGE: &str = "Noise reduction complete!";

/// Parameters for one noise-reduction run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseReductionConfig {
    /// Seconds at the start of the signal used as the noise sample
    pub noise_duration_sec: f64,
    /// Fractional margin added to the noise magnitude before subtraction
    pub noise_floor: f32,
    /// Transform sizes shared by the forward and inverse passes
    pub stft: StftConfig,
    /// Encoding of the output payload
    pub output_format: WavSampleFormat,
}

impl Default for NoiseReductionConfig {
    fn default() -> Self {
        Self {
            noise_duration_sec: DEFAULT_NOISE_DURATION_SEC,
            noise_floor: DEFAULT_NOISE_FLOOR,
            stft: StftConfig::default(),
            output_format: WavSampleFormat::Float32,
        }
    }
}

impl NoiseReductionConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.noise_duration_sec.is_finite() || self.noise_duration_sec <= 0.0 {
            return Err(ProcessingError::invalid_config(format!(
                "noise_duration_sec {} must be a positive number of seconds",
                self.noise_duration_sec
            )));
        }
        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(ProcessingError::invalid_config(format!(
                "noise_floor {} must be finite and non-negative",
                self.noise_floor
            )));
        }
        self.stft.validate()
    }
}

/// Outcome of denoising an in-memory signal
#[derive(Debug, Clone, PartialEq)]
pub enum Denoised {
    /// The profile window was silent; the input should be returned as-is
    SilentProfile,
    /// Reconstructed signal, same length and rate as the input
    Cleaned(AudioSignal),
}

/// Denoise an in-memory signal
pub fn denoise_signal<O: EngineObserver>(
    signal: &AudioSignal,
    config: &NoiseReductionConfig,
    observer: &O,
) -> Result<Denoised> {
    config.validate()?;

    let window_len = signal.sample_rate().samples_for(config.noise_duration_sec);
    if signal.len() < window_len {
        observer.warn(ENGINE, "Audio too short for noise profile, using entire clip.");
    }
    let noise_window = signal.head(config.noise_duration_sec);

    let window_peak = peak(noise_window);
    if window_peak < SILENCE_THRESHOLD {
        observer.warn(
            ENGINE,
            "Noise profile seems silent. Noise reduction might be ineffective.",
        );
        return Ok(Denoised::SilentProfile);
    }

    let stft = Stft::new(config.stft)?;
    let profile = NoiseProfile::estimate(noise_window, &stft);

    let frame = SpectralFrame::from_spectrogram(&stft.forward(signal.samples()));
    let cleaned = subtract_noise(&frame, &profile, config.noise_floor);
    let spectrogram = frame.recompose(&cleaned)?;
    let samples = stft.inverse(&spectrogram, signal.len())?;

    Ok(Denoised::Cleaned(signal.with_samples(samples)))
}

/// Run noise reduction on an audio file and return encoded WAV bytes
///
/// Never fails past this boundary: every error becomes an unsuccessful
/// `ProcessingResult` without a payload.
pub fn reduce_noise<O: EngineObserver>(
    input: &Path,
    config: &NoiseReductionConfig,
    observer: &O,
) -> ProcessingResult {
    observer.info(
        ENGINE,
        &format!("Applying adaptive noise reduction on {}...", input.display()),
    );

    match run(input, config, observer) {
        Ok(result) => result,
        Err(err) => {
            let result = ProcessingResult::from_error("Noise reduction", &err);
            observer.error(ENGINE, &result.message);
            result
        }
    }
}

fn run<O: EngineObserver>(
    input: &Path,
    config: &NoiseReductionConfig,
    observer: &O,
) -> Result<ProcessingResult> {
    if !input.exists() {
        return Err(ProcessingError::InputNotFound(input.to_path_buf()));
    }

    let signal = vox_audio::decode(input, observer)?;

    match denoise_signal(&signal, config, observer)? {
        Denoised::SilentProfile => {
            let bytes = encode_wav(&signal, config.output_format)?;
            Ok(ProcessingResult::audio(SILENT_PROFILE_MESSAGE, bytes))
        }
        Denoised::Cleaned(cleaned) => {
            let bytes = encode_wav(&cleaned, config.output_format)?;
            observer.info(
                ENGINE,
                &format!("Adaptive noise reduction complete for {}.", input.display()),
            );
            Ok(ProcessingResult::audio(COMPLETE_MESSAGE, bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_core::{NullObserver, SampleRate};

    fn fast_config() -> NoiseReductionConfig {
        NoiseReductionConfig {
            stft: StftConfig {
                n_fft: 256,
                hop_length: 64,
            },
            ..NoiseReductionConfig::default()
        }
    }

    #[test]
    fn defaults_match_engine_contract() {
        let config = NoiseReductionConfig::default();
        assert_eq!(config.noise_duration_sec, 0.5);
        assert_eq!(config.noise_floor, 0.02);
        assert_eq!(config.stft.n_fft, 2048);
        assert_eq!(config.stft.hop_length, 512);
        assert_eq!(config.output_format, WavSampleFormat::Float32);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut config = NoiseReductionConfig::default();
        config.noise_duration_sec = 0.0;
        assert!(config.validate().is_err());

        let mut config = NoiseReductionConfig::default();
        config.noise_floor = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = NoiseReductionConfig::default();
        config.noise_floor = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_signal_is_treated_as_silent() {
        let signal = AudioSignal::new(Vec::new(), SampleRate::DVD_QUALITY);
        let outcome = denoise_signal(&signal, &fast_config(), &NullObserver).unwrap();
        assert_eq!(outcome, Denoised::SilentProfile);
    }

    #[test]
    fn quiet_profile_below_threshold_is_silent() {
        let mut samples = vec![5e-6_f32; 8_000];
        samples.extend(vec![0.5_f32; 8_000]);
        let signal = AudioSignal::new(samples, SampleRate::new(16_000));

        let outcome = denoise_signal(&signal, &fast_config(), &NullObserver).unwrap();
        assert_eq!(outcome, Denoised::SilentProfile);
    }

    #[test]
    fn short_signal_uses_entire_clip() {
        let samples: Vec<f32> = (0..1_000).map(|i| (i as f32 * 0.2).sin() * 0.1).collect();
        let signal = AudioSignal::new(samples, SampleRate::new(16_000));

        match denoise_signal(&signal, &fast_config(), &NullObserver).unwrap() {
            Denoised::Cleaned(cleaned) => assert_eq!(cleaned.len(), 1_000),
            Denoised::SilentProfile => panic!("profile is not silent"),
        }
    }

    #[test]
    fn stationary_tone_is_removed_by_its_own_profile() {
        // The whole signal is the "noise", so subtraction should remove most of it
        let samples: Vec<f32> = (0..32_000)
            .map(|i| (2.0 * std::f32::consts::PI * 500.0 * i as f32 / 16_000.0).sin() * 0.2)
            .collect();
        let signal = AudioSignal::new(samples, SampleRate::new(16_000));

        let Denoised::Cleaned(cleaned) =
            denoise_signal(&signal, &fast_config(), &NullObserver).unwrap()
        else {
            panic!("expected a cleaned signal");
        };

        let energy = |s: &[f32]| s.iter().map(|v| v * v).sum::<f32>();
        // Ignore the edges where centered padding shortens the frames
        let inner = 1_000..31_000;
        assert!(energy(&cleaned.samples()[inner.clone()]) < 0.05 * energy(&signal.samples()[inner]));
    }
}
