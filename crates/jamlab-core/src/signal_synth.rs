//! Signal synthesizer: clean baseband signal plus one interference waveform
//! per jammer mode.
//!
//! The clean signal is always a unit sine at the center frequency; the
//! interference waveform depends on the jammer mode and scales with the
//! jammer strength. Both are real-valued and sampled on the parameter
//! block's time grid.
//!
//! ## Example
//!
//! ```rust
//! use jamlab_core::params::{JammerMode, SimulationParams};
//! use jamlab_core::signal_synth::SignalSynthesizer;
//!
//! let mut params = SimulationParams::default();
//! params.mode = JammerMode::Tone;
//! let mut synth = SignalSynthesizer::new(42);
//! let out = synth.synthesize(&params);
//! assert_eq!(out.clean.len(), out.interference.len());
//! ```

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::params::{JammerMode, SimulationParams};

/// Stride between spikes of the pulsed jammer, in samples.
const PULSE_STRIDE: usize = 50;

/// Sweep rate of the chirp jammer in Hz per second.
const SWEEP_RATE_HZ_PER_S: f64 = 30.0;

/// Relative weight of each tone in the repeater signature.
const REPEATER_WEIGHT: f64 = 0.7;

/// One synthesis window: clean signal and interference on the same grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub clean: Vec<f64>,
    pub interference: Vec<f64>,
}

/// Waveform generator for the simulated link.
///
/// Holds the noise RNG so runs are reproducible under a fixed seed; every
/// other mode is a pure function of the parameters and time grid.
#[derive(Debug)]
pub struct SignalSynthesizer {
    rng: StdRng,
}

impl SignalSynthesizer {
    /// Create a synthesizer with a seeded noise source.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the clean and interference waveforms for the current
    /// parameters. Returns empty waveforms when the time grid is empty.
    pub fn synthesize(&mut self, params: &SimulationParams) -> Synthesis {
        let t = params.time_grid();
        let fc = params.center_freq_hz;
        let strength = params.strength();

        let clean: Vec<f64> = t.iter().map(|&ti| (2.0 * PI * fc * ti).sin()).collect();

        let interference: Vec<f64> = match params.mode {
            JammerMode::None => vec![0.0; t.len()],
            JammerMode::Noise => {
                let normal = Normal::new(0.0, 1.0).unwrap();
                t.iter()
                    .map(|_| strength * normal.sample(&mut self.rng))
                    .collect()
            }
            JammerMode::Tone => t
                .iter()
                .map(|&ti| strength * (2.0 * PI * fc * ti).sin())
                .collect(),
            JammerMode::Pulsed => {
                let mut pulse = vec![0.0; t.len()];
                for spike in pulse.iter_mut().step_by(PULSE_STRIDE) {
                    *spike = 2.0 * strength;
                }
                pulse
            }
            JammerMode::Sweep => t
                .iter()
                .map(|&ti| {
                    // Linear chirp: instantaneous frequency fc + rate * t
                    let f = fc + SWEEP_RATE_HZ_PER_S * ti;
                    strength * (2.0 * PI * f * ti).sin()
                })
                .collect(),
            JammerMode::Repeater => t
                .iter()
                .map(|&ti| {
                    let lo = (2.0 * PI * 0.5 * fc * ti).sin();
                    let hi = (2.0 * PI * 1.5 * fc * ti).sin();
                    REPEATER_WEIGHT * strength * (lo + hi)
                })
                .collect(),
        };

        Synthesis {
            clean,
            interference,
        }
    }
}
