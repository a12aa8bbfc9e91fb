//! Loudness normalization engine
//!
//! Measures the integrated loudness of a file and applies one linear gain
//! so it reads at the target level. No limiter runs after the gain.

use crate::meter::{analyze, linear_to_db, LoudnessMeasurement};
use crate::EBU_R128_BROADCAST_LUFS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vox_audio::{encode_wav, WavSampleFormat};
use vox_core::{
    AudioSignal, EngineObserver, ProcessingError, ProcessingResult, Result, SILENCE_THRESHOLD,
};

const ENGINE: &str = "loudness_normalization";

/// Message returned when the input peak is below the silence threshold
pub const SILENT_INPUT_MESSAGE: &str = "Input silent, saved original.";

/// Message returned when the meter cannot produce a finite loudness
pub const UNMEASURABLE_MESSAGE: &str = "Could not measure loudness (silence?), saved original.";

/// Message returned after a completed normalization
pub const COMPLETE_MESSAGE: &str = "Loudness normalization complete!";

/// Parameters for one normalization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Target integrated loudness in LUFS
    pub target_lufs: f64,
    /// Encoding of the output payload
    pub output_format: WavSampleFormat,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            target_lufs: EBU_R128_BROADCAST_LUFS,
            output_format: WavSampleFormat::Float32,
        }
    }
}

impl NormalizationConfig {
    /// Config with the given target and the default output format
    pub fn with_target(target_lufs: f64) -> Self {
        Self {
            target_lufs,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    ///
    /// Any finite target is accepted here; range limits belong to callers.
    pub fn validate(&self) -> Result<()> {
        if !self.target_lufs.is_finite() {
            return Err(ProcessingError::invalid_config(format!(
                "target_lufs {} must be finite",
                self.target_lufs
            )));
        }
        Ok(())
    }
}

/// Outcome of normalizing an in-memory signal
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Peak below the silence threshold; the input should be kept
    Silent,
    /// Loudness could not be measured; the input should be kept
    Unmeasurable,
    /// Gain applied
    Adjusted {
        /// Normalized signal
        signal: AudioSignal,
        /// Loudness measured before the gain
        measured_lufs: f64,
        /// Linear gain that was applied
        gain: f64,
    },
}

/// Linear gain that moves `measured_lufs` to `target_lufs`
pub fn gain_for(measured_lufs: f64, target_lufs: f64) -> f64 {
    10f64.powf((target_lufs - measured_lufs) / 20.0)
}

/// Multiply every sample by `gain`, computed in f64
pub fn apply_gain(samples: &[f32], gain: f64) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| (f64::from(s) * gain) as f32)
        .collect()
}

/// Normalize an in-memory signal to `target_lufs`
pub fn normalize_signal<O: EngineObserver>(
    signal: &AudioSignal,
    target_lufs: f64,
    observer: &O,
) -> Result<Normalized> {
    if signal.peak() < SILENCE_THRESHOLD {
        observer.warn(ENGINE, "Input audio is silent, skipping normalization.");
        return Ok(Normalized::Silent);
    }

    let report = analyze(signal)?;
    observer.info(ENGINE, &report.to_string());

    let LoudnessMeasurement::Integrated(measured_lufs) = report.integrated else {
        observer.warn(
            ENGINE,
            "Could not measure loudness (audio may be too short or silent).",
        );
        return Ok(Normalized::Unmeasurable);
    };

    let gain = gain_for(measured_lufs, target_lufs);
    let gain_db = linear_to_db(gain);
    observer.info(
        ENGINE,
        &format!(
            "Measured {:.2} LUFS, applying {:+.2} dB to reach {:.2} LUFS.",
            measured_lufs, gain_db, target_lufs
        ),
    );

    if report.will_clip_at_gain(gain_db) {
        observer.warn(
            ENGINE,
            &format!(
                "Normalized peak reaches {:+.2} dBFS; output exceeds full scale.",
                report.sample_peak_dbfs + gain_db
            ),
        );
    }

    Ok(Normalized::Adjusted {
        signal: signal.with_samples(apply_gain(signal.samples(), gain)),
        measured_lufs,
        gain,
    })
}

/// Normalize the loudness of an audio file and return encoded WAV bytes
///
/// Never fails past this boundary: every error becomes an unsuccessful
/// `ProcessingResult` without a payload.
pub fn normalize_loudness<O: EngineObserver>(
    input: &Path,
    config: &NormalizationConfig,
    observer: &O,
) -> ProcessingResult {
    observer.info(
        ENGINE,
        &format!(
            "Normalizing loudness of {} to {} LUFS...",
            input.display(),
            config.target_lufs
        ),
    );

    match run(input, config, observer) {
        Ok(result) => result,
        Err(err) => {
            let result = ProcessingResult::from_error("Loudness normalization", &err);
            observer.error(ENGINE, &result.message);
            result
        }
    }
}

fn run<O: EngineObserver>(
    input: &Path,
    config: &NormalizationConfig,
    observer: &O,
) -> Result<ProcessingResult> {
    config.validate()?;
    if !input.exists() {
        return Err(ProcessingError::InputNotFound(input.to_path_buf()));
    }

    let signal = vox_audio::decode(input, observer)?;

    let (output, message) = match normalize_signal(&signal, config.target_lufs, observer)? {
        Normalized::Silent => (signal, SILENT_INPUT_MESSAGE),
        Normalized::Unmeasurable => (signal, UNMEASURABLE_MESSAGE),
        Normalized::Adjusted { signal, .. } => (signal, COMPLETE_MESSAGE),
    };

    let bytes = encode_wav(&output, config.output_format)?;
    Ok(ProcessingResult::audio(message, bytes))
}
