//! Engine configuration.
//!
//! One configurable engine replaces the three near-identical source
//! variants: the outcome policy, mitigation strategy, detection threshold
//! and tick cadence are all explicit here instead of being baked in.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use jamlab_core::outcome::OutcomePolicy;
use jamlab_core::mitigation::MitigationStrategy;
use jamlab_core::params::SimulationParams;
use jamlab_core::success_tracker::DEFAULT_HISTORY_CAPACITY;

/// How long the worker suspends between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickCadence {
    /// Fixed interval per tick
    Fixed(Duration),
    /// Uniform random interval in `[min, max]` per tick
    Jittered { min: Duration, max: Duration },
}

impl TickCadence {
    /// Draw the next inter-tick interval.
    pub fn next_interval(&self, rng: &mut StdRng) -> Duration {
        match *self {
            TickCadence::Fixed(d) => d,
            TickCadence::Jittered { min, max } => {
                let lo = min.as_secs_f64();
                let hi = max.as_secs_f64().max(lo);
                Duration::from_secs_f64(rng.gen_range(lo..=hi))
            }
        }
    }

    /// Upper bound on the interval; the stop latency is at most one of these.
    pub fn max_interval(&self) -> Duration {
        match *self {
            TickCadence::Fixed(d) => d,
            TickCadence::Jittered { min, max } => max.max(min),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial simulation parameters
    pub params: SimulationParams,
    /// How packet outcomes are decided
    pub outcome_policy: OutcomePolicy,
    /// Countermeasure applied on degradation, fixed for the run
    pub mitigation_strategy: MitigationStrategy,
    /// Success-rate threshold in percent below which the link is degraded
    pub threshold: f64,
    /// Evaluate mitigation every this many packets (discrete policies).
    /// The continuous policy evaluates every tick. Minimum 1.
    pub check_interval: u32,
    /// Worker suspension between ticks
    pub cadence: TickCadence,
    /// Success-rate history capacity (FIFO eviction past this)
    pub history_capacity: usize,
    /// RNG seed for reproducible runs
    pub seed: u64,
    /// Attach the synthesized waveforms to each tick event
    pub emit_waveforms: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            params: SimulationParams::default(),
            outcome_policy: OutcomePolicy::default(),
            mitigation_strategy: MitigationStrategy::ChannelHop,
            threshold: 70.0,
            check_interval: 10,
            cadence: TickCadence::Fixed(Duration::from_millis(400)),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            seed: 42,
            emit_waveforms: false,
        }
    }
}
