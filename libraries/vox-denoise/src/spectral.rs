//! Magnitude/phase decomposition and noise-profile subtraction

use crate::stft::{Spectrogram, Stft};
use rustfft::num_complex::Complex32;
use vox_core::Result;

/// Polar decomposition of a spectrogram
///
/// `magnitude[i] * phase[i]` reproduces the original complex value. A
/// zero-magnitude bin carries phase `1 + 0i` so every phase has unit modulus.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    bins: usize,
    frames: usize,
    magnitude: Vec<f32>,
    phase: Vec<Complex32>,
}

impl SpectralFrame {
    /// Split a spectrogram into magnitude and unit phase
    pub fn from_spectrogram(spectrogram: &Spectrogram) -> Self {
        let (magnitude, phase) = spectrogram
            .as_slice()
            .iter()
            .map(|&value| {
                let mag = value.norm();
                let phase = if mag == 0.0 {
                    Complex32::new(1.0, 0.0)
                } else {
                    value / mag
                };
                (mag, phase)
            })
            .unzip();

        Self {
            bins: spectrogram.bins(),
            frames: spectrogram.frames(),
            magnitude,
            phase,
        }
    }

    /// Frequency bins per frame
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of time frames
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frame-major magnitudes
    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    /// Frame-major unit phases
    pub fn phase(&self) -> &[Complex32] {
        &self.phase
    }

    /// Recombine replacement magnitudes with this frame's phase
    pub fn recompose(&self, magnitude: &[f32]) -> Result<Spectrogram> {
        let data = magnitude
            .iter()
            .zip(&self.phase)
            .map(|(&mag, &phase)| phase * mag)
            .collect::<Vec<_>>();
        Spectrogram::from_frames(self.bins, self.frames, data)
    }
}

/// Per-bin noise magnitude estimated from a leading slice of a signal
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseProfile {
    magnitude: Vec<f32>,
}

impl NoiseProfile {
    /// Median magnitude of each frequency bin across the frames of `window`
    ///
    /// The median keeps short transients in the profile window from
    /// inflating the estimate.
    pub fn estimate(window: &[f32], stft: &Stft) -> Self {
        let spectrogram = stft.forward(window);
        let bins = spectrogram.bins();
        let frames = spectrogram.frames();

        let mut column = Vec::with_capacity(frames);
        let magnitude = (0..bins)
            .map(|bin| {
                column.clear();
                column.extend((0..frames).map(|frame| spectrogram.get(bin, frame).norm()));
                median(&mut column)
            })
            .collect();

        Self { magnitude }
    }

    /// Build a profile from explicit per-bin magnitudes
    pub fn from_magnitudes(magnitude: Vec<f32>) -> Self {
        Self { magnitude }
    }

    /// Per-bin magnitudes
    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// Check if the profile has no bins
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }
}

/// Median of `values`; the mean of the two middle values for even counts
pub fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Subtract the inflated noise profile from every frame, clamping at zero
///
/// `cleaned[f, t] = max(0, magnitude[f, t] - noise[f] * (1 + noise_floor))`
pub fn subtract_noise(frame: &SpectralFrame, profile: &NoiseProfile, noise_floor: f32) -> Vec<f32> {
    let scale = 1.0 + noise_floor;
    let bins = frame.bins();

    frame
        .magnitude()
        .iter()
        .enumerate()
        .map(|(i, &mag)| {
            let noise = profile.magnitude().get(i % bins).copied().unwrap_or(0.0);
            (mag - noise * scale).max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stft::StftConfig;

    fn small_stft() -> Stft {
        Stft::new(StftConfig {
            n_fft: 32,
            hop_length: 8,
        })
        .unwrap()
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut [7.0]), 7.0);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn median_ignores_single_spike() {
        let mut values = [0.1, 0.1, 0.1, 50.0, 0.1];
        assert_eq!(median(&mut values), 0.1);
    }

    #[test]
    fn phase_has_unit_modulus_and_recomposes() {
        let stft = small_stft();
        let signal: Vec<f32> = (0..200).map(|i| (i as f32 * 0.4).sin()).collect();
        let spec = stft.forward(&signal);
        let frame = SpectralFrame::from_spectrogram(&spec);

        for p in frame.phase() {
            assert!((p.norm() - 1.0).abs() < 1e-5);
        }

        let rebuilt = frame.recompose(frame.magnitude()).unwrap();
        for (a, b) in spec.as_slice().iter().zip(rebuilt.as_slice()) {
            assert!((a - b).norm() < 1e-4);
        }
    }

    #[test]
    fn zero_bins_get_unit_real_phase() {
        let stft = small_stft();
        let spec = stft.forward(&[0.0; 64]);
        let frame = SpectralFrame::from_spectrogram(&spec);
        assert!(frame.magnitude().iter().all(|&m| m == 0.0));
        assert!(frame.phase().iter().all(|&p| p == Complex32::new(1.0, 0.0)));
    }

    #[test]
    fn profile_has_one_value_per_bin() {
        let stft = small_stft();
        let profile = NoiseProfile::estimate(&[0.01; 100], &stft);
        assert_eq!(profile.len(), 17);
        assert!(profile.magnitude().iter().all(|m| m.is_finite() && *m >= 0.0));
    }

    #[test]
    fn subtraction_applies_floor_and_clamps() {
        let spec = Spectrogram::from_frames(
            2,
            2,
            vec![
                Complex32::new(1.0, 0.0),
                Complex32::new(0.0, 0.5),
                Complex32::new(0.2, 0.0),
                Complex32::new(0.0, -2.0),
            ],
        )
        .unwrap();
        let frame = SpectralFrame::from_spectrogram(&spec);
        let profile = NoiseProfile::from_magnitudes(vec![0.5, 1.0]);

        let cleaned = subtract_noise(&frame, &profile, 0.02);

        assert!((cleaned[0] - (1.0 - 0.51)).abs() < 1e-6);
        assert_eq!(cleaned[1], 0.0);
        assert_eq!(cleaned[2], 0.0);
        assert!((cleaned[3] - (2.0 - 1.02)).abs() < 1e-6);
    }

    #[test]
    fn zero_profile_leaves_magnitude_unchanged() {
        let stft = small_stft();
        let spec = stft.forward(&[0.3; 50]);
        let frame = SpectralFrame::from_spectrogram(&spec);
        let profile = NoiseProfile::from_magnitudes(vec![0.0; frame.bins()]);
        assert_eq!(subtract_noise(&frame, &profile, 0.02), frame.magnitude());
    }
}
