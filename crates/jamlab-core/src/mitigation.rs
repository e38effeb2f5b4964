//! Mitigation controller: detects link degradation and applies one
//! countermeasure per evaluation.
//!
//! Two-state machine. Every evaluation where the windowed success rate falls
//! below the threshold moves to (or stays in) `Degraded` and applies the
//! configured strategy once; an evaluation at or above the threshold returns
//! to `Stable`. Repeated degraded evaluations compound — three consecutive
//! adaptive-filter detections multiply the strength by 0.7 three times.
//!
//! ## Example
//!
//! ```rust
//! use jamlab_core::mitigation::{MitigationController, MitigationStrategy};
//! use jamlab_core::params::SimulationParams;
//!
//! let mut params = SimulationParams::default();
//! let mut ctl = MitigationController::new(MitigationStrategy::ChannelHop, 70.0, 42);
//! let before = params.channel();
//! let action = ctl.evaluate(30.0, &mut params);
//! assert!(action.is_some());
//! assert_ne!(params.channel(), before);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::params::{SimulationParams, CHANNEL_MAX, CHANNEL_MIN, SPREAD_CANDIDATES_HZ};

/// Multiplier applied to the jammer strength by the adaptive filter.
const STRENGTH_DECAY: f64 = 0.7;

/// Countermeasure applied when the link degrades. Fixed per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStrategy {
    /// Hop to a random channel different from the current one
    ChannelHop,
    /// Move the center frequency to a random candidate
    SpreadSpectrum,
    /// Reduce the effective jammer strength by a fixed decay factor
    AdaptiveFilter,
}

/// Detection state of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Stable,
    Degraded,
}

/// What a mitigation evaluation changed, for the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MitigationAction {
    ChannelHopped { from: u8, to: u8 },
    Respread { from_hz: f64, to_hz: f64 },
    StrengthDecayed { from: f64, to: f64 },
}

/// Threshold-based detector plus countermeasure applier.
#[derive(Debug)]
pub struct MitigationController {
    strategy: MitigationStrategy,
    threshold: f64,
    state: LinkState,
    applied: u32,
    rng: StdRng,
}

impl MitigationController {
    /// Create a controller with a success-rate threshold in percent.
    pub fn new(strategy: MitigationStrategy, threshold: f64, seed: u64) -> Self {
        Self {
            strategy,
            threshold,
            state: LinkState::Stable,
            applied: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Compare the windowed success rate against the threshold. Below it,
    /// apply the strategy and report the action; otherwise return to Stable.
    pub fn evaluate(
        &mut self,
        success_rate: f64,
        params: &mut SimulationParams,
    ) -> Option<MitigationAction> {
        if success_rate < self.threshold {
            self.state = LinkState::Degraded;
            Some(self.apply(params))
        } else {
            self.state = LinkState::Stable;
            None
        }
    }

    /// Apply the configured countermeasure unconditionally (manual trigger).
    pub fn apply(&mut self, params: &mut SimulationParams) -> MitigationAction {
        self.applied += 1;
        match self.strategy {
            MitigationStrategy::ChannelHop => {
                let from = params.channel();
                let candidates: Vec<u8> =
                    (CHANNEL_MIN..=CHANNEL_MAX).filter(|&c| c != from).collect();
                // Never empty: only the current channel is excluded
                let to = *candidates.choose(&mut self.rng).unwrap();
                params.set_channel(to).expect("hop candidates are valid channels");
                MitigationAction::ChannelHopped { from, to }
            }
            MitigationStrategy::SpreadSpectrum => {
                let from_hz = params.center_freq_hz;
                let to_hz = *SPREAD_CANDIDATES_HZ.choose(&mut self.rng).unwrap();
                params.center_freq_hz = to_hz;
                MitigationAction::Respread { from_hz, to_hz }
            }
            MitigationStrategy::AdaptiveFilter => {
                let from = params.strength();
                let to = params.set_strength(from * STRENGTH_DECAY);
                MitigationAction::StrengthDecayed { from, to }
            }
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy(&self) -> MitigationStrategy {
        self.strategy
    }

    /// Number of countermeasures applied so far.
    pub fn applied_count(&self) -> u32 {
        self.applied
    }
}
