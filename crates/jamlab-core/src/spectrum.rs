//! Magnitude spectrum of a real-valued waveform, for presentation layers.
//!
//! Returns only the non-negative half of the frequency axis paired with the
//! modulus of the FFT bins, matching what a frequency-domain plot consumes.
//!
//! ## Example
//!
//! ```rust
//! use jamlab_core::spectrum::SpectrumAnalyzer;
//!
//! let fs = 1000.0;
//! let tone: Vec<f64> = (0..1000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 100.0 * i as f64 / fs).sin())
//!     .collect();
//! let mut analyzer = SpectrumAnalyzer::new();
//! let spec = analyzer.analyze(&tone, fs);
//! assert_eq!(spec.freqs.len(), 500);
//! ```

use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

/// Non-negative half of a magnitude spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin center frequencies in Hz, `freqs[k] = k * fs / n`
    pub freqs: Vec<f64>,
    /// FFT bin magnitudes
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Frequency of the strongest bin, or `None` for an empty spectrum.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| self.freqs[i])
    }
}

/// FFT-backed spectrum analyzer.
///
/// Caches the planned FFT and scratch buffer; re-plans only when the input
/// length changes.
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f64>,
    fft: Option<Arc<dyn Fft<f64>>>,
    size: usize,
    scratch: Vec<Complex64>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    /// Create an analyzer. The FFT plan is created lazily on first use.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            fft: None,
            size: 0,
            scratch: Vec::new(),
        }
    }

    /// Compute the non-negative half of the magnitude spectrum.
    pub fn analyze(&mut self, waveform: &[f64], sample_rate_hz: f64) -> Spectrum {
        let n = waveform.len();
        if n == 0 {
            return Spectrum {
                freqs: Vec::new(),
                magnitudes: Vec::new(),
            };
        }

        let fft = self.ensure_plan(n);

        let mut buffer: Vec<Complex64> =
            waveform.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        fft.process_with_scratch(&mut buffer, &mut self.scratch);

        let half = n / 2;
        let freqs = (0..half).map(|k| k as f64 * sample_rate_hz / n as f64).collect();
        let magnitudes = buffer[..half].iter().map(|c| c.norm()).collect();

        Spectrum { freqs, magnitudes }
    }

    fn ensure_plan(&mut self, n: usize) -> Arc<dyn Fft<f64>> {
        match &self.fft {
            Some(fft) if self.size == n => Arc::clone(fft),
            _ => {
                let fft = self.planner.plan_fft_forward(n);
                self.scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];
                self.fft = Some(Arc::clone(&fft));
                self.size = n;
                fft
            }
        }
    }
}
