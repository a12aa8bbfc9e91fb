//! Short-time Fourier transform and its inverse
//!
//! The transform parameters are part of the engine contract: output bytes
//! only reproduce when the forward and inverse passes share the same
//! `StftConfig`.
//!
//! - Periodic Hann window of length `n_fft`
//! - Centered framing: `n_fft / 2` zeros padded on both sides, giving
//!   `1 + len / hop_length` frames
//! - One-sided spectrum with `n_fft / 2 + 1` bins
//! - Inverse by windowed overlap-add normalised by the summed squared window

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;
use vox_core::{ProcessingError, Result};

/// Default FFT size
pub const DEFAULT_N_FFT: usize = 2048;

/// Default hop between successive frames
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// Smallest accepted FFT size
pub const MIN_N_FFT: usize = 16;

/// STFT window and hop sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StftConfig {
    /// FFT size and window length (even)
    pub n_fft: usize,
    /// Samples between successive frames
    pub hop_length: usize,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            n_fft: DEFAULT_N_FFT,
            hop_length: DEFAULT_HOP_LENGTH,
        }
    }
}

impl StftConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.n_fft < MIN_N_FFT || self.n_fft % 2 != 0 {
            return Err(ProcessingError::invalid_config(format!(
                "n_fft {} must be even and at least {}",
                self.n_fft, MIN_N_FFT
            )));
        }
        if self.hop_length == 0 || self.hop_length > self.n_fft {
            return Err(ProcessingError::invalid_config(format!(
                "hop_length {} must be in 1..={}",
                self.hop_length, self.n_fft
            )));
        }
        Ok(())
    }

    /// Number of one-sided frequency bins
    pub fn bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of frames produced for a signal of `len` samples
    pub fn frames_for(&self, len: usize) -> usize {
        1 + len / self.hop_length
    }
}

/// Complex one-sided spectrogram, stored frame-major
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    bins: usize,
    frames: usize,
    data: Vec<Complex32>,
}

impl Spectrogram {
    /// Build a spectrogram from frame-major data
    pub fn from_frames(bins: usize, frames: usize, data: Vec<Complex32>) -> Result<Self> {
        if data.len() != bins * frames {
            return Err(ProcessingError::invalid_config(format!(
                "spectrogram data has {} values, expected {} x {}",
                data.len(),
                bins,
                frames
            )));
        }
        Ok(Self { bins, frames, data })
    }

    /// Frequency bins per frame
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of time frames
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Value at `(bin, frame)`
    pub fn get(&self, bin: usize, frame: usize) -> Complex32 {
        self.data[frame * self.bins + bin]
    }

    /// All bins of one frame
    pub fn frame(&self, frame: usize) -> &[Complex32] {
        let start = frame * self.bins;
        &self.data[start..start + self.bins]
    }

    /// Raw frame-major values
    pub fn as_slice(&self) -> &[Complex32] {
        &self.data
    }
}

/// Periodic Hann window (the DFT-even form)
pub fn hann_window(len: usize) -> Vec<f32> {
    if len == 0 {
        return Vec::new();
    }
    (0..len)
        .map(|i| {
            let x = (i as f64) / (len as f64);
            (0.5 - 0.5 * (2.0 * std::f64::consts::PI * x).cos()) as f32
        })
        .collect()
}

/// Planned forward/inverse transforms for one `StftConfig`
pub struct Stft {
    config: StftConfig,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft").field("config", &self.config).finish()
    }
}

impl Stft {
    /// Plan the transforms for `config`
    pub fn new(config: StftConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(config.n_fft);
        let inverse = planner.plan_fft_inverse(config.n_fft);

        Ok(Self {
            config,
            window: hann_window(config.n_fft),
            forward,
            inverse,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> StftConfig {
        self.config
    }

    /// Forward transform of a whole signal
    pub fn forward(&self, signal: &[f32]) -> Spectrogram {
        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let pad = n_fft / 2;
        let bins = self.config.bins();
        let frames = self.config.frames_for(signal.len());

        let mut data = Vec::with_capacity(bins * frames);
        let mut buffer = vec![Complex32::new(0.0, 0.0); n_fft];
        let mut scratch = vec![Complex32::new(0.0, 0.0); self.forward.get_inplace_scratch_len()];

        for frame in 0..frames {
            let start = frame * hop;
            for (i, (slot, &w)) in buffer.iter_mut().zip(&self.window).enumerate() {
                // Position in the zero-padded signal
                let sample = (start + i)
                    .checked_sub(pad)
                    .and_then(|idx| signal.get(idx))
                    .copied()
                    .unwrap_or(0.0);
                *slot = Complex32::new(sample * w, 0.0);
            }

            self.forward.process_with_scratch(&mut buffer, &mut scratch);
            data.extend_from_slice(&buffer[..bins]);
        }

        Spectrogram { bins, frames, data }
    }

    /// Inverse transform fitted to exactly `length` samples
    ///
    /// Overlap-add output is trimmed by `n_fft / 2` at the start, then
    /// truncated or zero-padded to `length`.
    pub fn inverse(&self, spectrogram: &Spectrogram, length: usize) -> Result<Vec<f32>> {
        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let bins = self.config.bins();

        if spectrogram.bins() != bins {
            return Err(ProcessingError::invalid_config(format!(
                "spectrogram has {} bins, transform expects {}",
                spectrogram.bins(),
                bins
            )));
        }

        let frames = spectrogram.frames();
        let expected_len = if frames == 0 {
            0
        } else {
            n_fft + hop * (frames - 1)
        };

        let mut output = vec![0.0_f32; expected_len];
        let mut window_sum = vec![0.0_f32; expected_len];
        let mut buffer = vec![Complex32::new(0.0, 0.0); n_fft];
        let mut scratch = vec![Complex32::new(0.0, 0.0); self.inverse.get_inplace_scratch_len()];
        let scale = 1.0 / n_fft as f32;

        for frame in 0..frames {
            let half = spectrogram.frame(frame);

            // Rebuild the Hermitian-symmetric full spectrum
            buffer[..bins].copy_from_slice(half);
            for (k, value) in half.iter().enumerate().take(n_fft - bins + 1).skip(1) {
                buffer[n_fft - k] = value.conj();
            }

            self.inverse.process_with_scratch(&mut buffer, &mut scratch);

            let start = frame * hop;
            for (i, (value, &w)) in buffer.iter().zip(&self.window).enumerate() {
                output[start + i] += value.re * scale * w;
                window_sum[start + i] += w * w;
            }
        }

        for (sample, &norm) in output.iter_mut().zip(&window_sum) {
            if norm > f32::MIN_POSITIVE {
                *sample /= norm;
            }
        }

        let start = (n_fft / 2).min(output.len());
        let mut signal: Vec<f32> = output.drain(start..).collect();
        signal.resize(length, 0.0);
        Ok(signal)
    }
}
