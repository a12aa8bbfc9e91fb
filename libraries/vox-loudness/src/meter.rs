//! EBU R128 loudness measurement
//!
//! Integrated loudness follows ITU-R BS.1770-4: K-weighting, 400 ms blocks
//! with 75% overlap, an absolute gate at -70 LUFS and a relative gate 10 LU
//! below the ungated level. The `ebur128` crate does the filtering and gating.

use crate::error::{LoudnessError, Result};
use ebur128::{EbuR128, Mode};
use std::fmt;
use vox_core::AudioSignal;

/// Outcome of an integrated loudness measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoudnessMeasurement {
    /// Gated integrated loudness in LUFS
    Integrated(f64),
    /// Empty, silent, shorter than one gating block, or non-finite
    Unmeasurable,
}

impl LoudnessMeasurement {
    /// Integrated loudness, if measurable
    pub fn lufs(&self) -> Option<f64> {
        match self {
            Self::Integrated(lufs) => Some(*lufs),
            Self::Unmeasurable => None,
        }
    }

    fn from_global(value: f64) -> Self {
        if value.is_finite() {
            Self::Integrated(value)
        } else {
            Self::Unmeasurable
        }
    }
}

impl fmt::Display for LoudnessMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrated(lufs) => write!(f, "{:.1} LUFS", lufs),
            Self::Unmeasurable => write!(f, "unmeasurable"),
        }
    }
}

/// Loudness plus peak levels of a mono signal
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessReport {
    /// Integrated loudness
    pub integrated: LoudnessMeasurement,

    /// Maximum sample value in dBFS (`-inf` for silence)
    pub sample_peak_dbfs: f64,

    /// Inter-sample peak in dBTP (4x oversampled by ebur128)
    pub true_peak_dbtp: f64,

    /// Duration of the analyzed audio in seconds
    pub duration_seconds: f64,
}

impl LoudnessReport {
    /// Check if the audio would exceed full scale after applying gain
    pub fn will_clip_at_gain(&self, gain_db: f64) -> bool {
        self.sample_peak_dbfs + gain_db > 0.0
    }
}

impl fmt::Display for LoudnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loudness: {}, Sample Peak: {:.1} dBFS, True Peak: {:.1} dBTP",
            self.integrated, self.sample_peak_dbfs, self.true_peak_dbtp
        )
    }
}

/// Measure the integrated loudness of a mono signal
///
/// # Errors
/// Returns an error only when ebur128 cannot build a meter for the
/// sample rate or rejects the input.
pub fn measure(signal: &AudioSignal) -> Result<LoudnessMeasurement> {
    if signal.is_empty() {
        return Ok(LoudnessMeasurement::Unmeasurable);
    }

    let meter = run_meter(signal, Mode::I)?;
    Ok(LoudnessMeasurement::from_global(meter.loudness_global()?))
}

/// Measure integrated loudness together with sample and true peak
pub fn analyze(signal: &AudioSignal) -> Result<LoudnessReport> {
    if signal.is_empty() {
        return Ok(LoudnessReport {
            integrated: LoudnessMeasurement::Unmeasurable,
            sample_peak_dbfs: f64::NEG_INFINITY,
            true_peak_dbtp: f64::NEG_INFINITY,
            duration_seconds: 0.0,
        });
    }

    let meter = run_meter(signal, Mode::I | Mode::SAMPLE_PEAK | Mode::TRUE_PEAK)?;

    Ok(LoudnessReport {
        integrated: LoudnessMeasurement::from_global(meter.loudness_global()?),
        sample_peak_dbfs: linear_to_db(meter.sample_peak(0)?),
        true_peak_dbtp: linear_to_db(meter.true_peak(0)?),
        duration_seconds: signal.duration_secs(),
    })
}

/// Convert a linear amplitude to decibels (`-inf` for zero)
pub fn linear_to_db(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

fn run_meter(signal: &AudioSignal, mode: Mode) -> Result<EbuR128> {
    let rate = signal.sample_rate().as_hz();
    let mut meter =
        EbuR128::new(1, rate, mode).map_err(|_| LoudnessError::UnsupportedSampleRate(rate))?;
    meter.add_frames_f32(signal.samples())?;
    Ok(meter)
}
