/// Audio-related types
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// CD quality (44.1 kHz)
    pub const CD_QUALITY: Self = Self(44_100);
    /// DVD / broadcast quality (48 kHz)
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// Number of whole samples covering `seconds` (truncated toward zero)
    pub fn samples_for(&self, seconds: f64) -> usize {
        if seconds <= 0.0 || !seconds.is_finite() {
            return 0;
        }
        (seconds * f64::from(self.0)) as usize
    }
}

/// Maximum absolute value of `samples`, `0.0` when empty
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}

/// A complete mono signal held in memory
///
/// Samples are f32 and normally lie in [-1.0, 1.0], but transforms may
/// push them outside that range; nothing here clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: SampleRate,
}

impl AudioSignal {
    /// Create a new signal
    pub fn new(samples: Vec<f32>, sample_rate: SampleRate) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sample slice
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the signal is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate.0 == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate.0)
    }

    /// Maximum absolute sample value, `0.0` when empty
    pub fn peak(&self) -> f32 {
        peak(&self.samples)
    }

    /// Leading slice of at most `seconds`; the whole signal when shorter
    pub fn head(&self, seconds: f64) -> &[f32] {
        let count = self.sample_rate.samples_for(seconds);
        &self.samples[..count.min(self.samples.len())]
    }

    /// Build a new signal at the same rate from replacement samples
    #[must_use]
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self::new(samples, self.sample_rate)
    }

    /// Consume the signal, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_common_values() {
        assert_eq!(SampleRate::CD_QUALITY.as_hz(), 44_100);
        assert_eq!(SampleRate::DVD_QUALITY.as_hz(), 48_000);
    }

    #[test]
    fn samples_for_truncates() {
        let rate = SampleRate::new(44_100);
        assert_eq!(rate.samples_for(0.5), 22_050);
        assert_eq!(SampleRate::new(11_025).samples_for(0.1), 1_102);
        assert_eq!(rate.samples_for(-1.0), 0);
        assert_eq!(rate.samples_for(f64::NAN), 0);
    }

    #[test]
    fn signal_duration() {
        let signal = AudioSignal::new(vec![0.0; 88_200], SampleRate::CD_QUALITY);
        assert!((signal.duration_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn peak_uses_absolute_value() {
        let signal = AudioSignal::new(vec![0.1, -0.7, 0.3], SampleRate::DVD_QUALITY);
        assert_eq!(signal.peak(), 0.7);
        assert_eq!(AudioSignal::new(Vec::new(), SampleRate::DVD_QUALITY).peak(), 0.0);
        assert_eq!(peak(&[0.1, -0.25, 0.2]), 0.25);
    }

    #[test]
    fn head_clamps_to_length() {
        let signal = AudioSignal::new(vec![1.0; 100], SampleRate::new(1_000));
        assert_eq!(signal.head(0.05).len(), 50);
        assert_eq!(signal.head(0.5).len(), 100);
    }
}
