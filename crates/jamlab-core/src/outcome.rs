//! Transmission outcome models.
//!
//! The three source variants of this simulator disagreed on how a packet is
//! judged against the jammer, so all three policies are selectable:
//!
//! - `ProbabilityTable` — each jammer mode carries a fixed block probability.
//! - `StrengthScaled` — the jammer strength itself is the block probability,
//!   gated by the jammer-active flag.
//! - `SnrContinuous` — no discrete draw; an SNR proxy computed from the
//!   synthesized waveforms maps to an instantaneous success percentage.
//!
//! ## Example
//!
//! ```rust
//! use jamlab_core::outcome::{OutcomeModel, OutcomePolicy, TickOutcome};
//! use jamlab_core::params::{JammerMode, SimulationParams};
//! use jamlab_core::signal_synth::SignalSynthesizer;
//!
//! let params = SimulationParams::default(); // mode None
//! let waves = SignalSynthesizer::new(1).synthesize(&params);
//! let mut model = OutcomeModel::new(OutcomePolicy::default(), 1);
//! match model.evaluate(&params, &waves, 0.0) {
//!     TickOutcome::Packet(pkt) => assert!(!pkt.blocked), // block prob 0.0
//!     TickOutcome::Rate(_) => unreachable!(),
//! }
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::params::{JammerMode, SimulationParams};
use crate::signal_synth::Synthesis;

/// Epsilon added to the interference power so a silent jammer never divides
/// by zero.
const SNR_EPSILON: f64 = 1e-6;

/// SNR value at which the continuous policy saturates to 100% success.
const SNR_FULL_SCALE: f64 = 10.0;

/// Per-mode block probabilities for the table policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockProbTable {
    pub none: f64,
    pub noise: f64,
    pub tone: f64,
    pub pulsed: f64,
    pub sweep: f64,
    pub repeater: f64,
}

impl Default for BlockProbTable {
    fn default() -> Self {
        Self {
            none: 0.0,
            noise: 0.6,
            tone: 0.7,
            pulsed: 0.5,
            sweep: 0.5,
            repeater: 0.4,
        }
    }
}

impl BlockProbTable {
    /// Block probability for a jammer mode.
    pub fn probability(&self, mode: JammerMode) -> f64 {
        match mode {
            JammerMode::None => self.none,
            JammerMode::Noise => self.noise,
            JammerMode::Tone => self.tone,
            JammerMode::Pulsed => self.pulsed,
            JammerMode::Sweep => self.sweep,
            JammerMode::Repeater => self.repeater,
        }
    }
}

/// How packet outcomes are decided each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OutcomePolicy {
    /// Fixed per-mode block probability
    ProbabilityTable(BlockProbTable),
    /// Block probability = clamp(strength, 0, 1), gated by the active flag
    StrengthScaled,
    /// Continuous success percentage derived from the waveform SNR
    SnrContinuous,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        OutcomePolicy::ProbabilityTable(BlockProbTable::default())
    }
}

impl OutcomePolicy {
    /// Whether this policy yields discrete per-packet outcomes.
    pub fn is_discrete(&self) -> bool {
        !matches!(self, OutcomePolicy::SnrContinuous)
    }
}

/// Result of one simulated packet under a discrete policy.
///
/// Identifiers are for display only; collisions are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacketOutcome {
    pub id: u32,
    pub blocked: bool,
    /// Simulation time offset at which the packet was sent, in seconds
    pub elapsed_s: f64,
}

/// Instantaneous reading under the continuous policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnrReading {
    /// Mean signal power over mean interference power
    pub snr: f64,
    /// `100 * clamp(snr / 10, 0, 1)`
    pub success_rate: f64,
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    Packet(PacketOutcome),
    Rate(SnrReading),
}

/// Outcome model with its own seeded RNG for packet draws and identifiers.
#[derive(Debug)]
pub struct OutcomeModel {
    policy: OutcomePolicy,
    rng: StdRng,
}

impl OutcomeModel {
    pub fn new(policy: OutcomePolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn policy(&self) -> &OutcomePolicy {
        &self.policy
    }

    /// Judge one tick's transmission.
    pub fn evaluate(
        &mut self,
        params: &SimulationParams,
        waves: &Synthesis,
        elapsed_s: f64,
    ) -> TickOutcome {
        match self.policy {
            OutcomePolicy::ProbabilityTable(table) => {
                let p = table.probability(params.mode);
                TickOutcome::Packet(self.draw_packet(p, elapsed_s))
            }
            OutcomePolicy::StrengthScaled => {
                let p = if params.jammer_active {
                    params.strength().clamp(0.0, 1.0)
                } else {
                    0.0
                };
                TickOutcome::Packet(self.draw_packet(p, elapsed_s))
            }
            OutcomePolicy::SnrContinuous => TickOutcome::Rate(snr_reading(waves)),
        }
    }

    fn draw_packet(&mut self, block_prob: f64, elapsed_s: f64) -> PacketOutcome {
        PacketOutcome {
            id: self.rng.gen_range(1000..=9999),
            blocked: self.rng.gen_range(0.0..1.0) < block_prob,
            elapsed_s,
        }
    }
}

/// SNR proxy from the synthesized waveforms:
/// `mean(clean^2) / (mean(interference^2) + eps)`.
pub fn snr_reading(waves: &Synthesis) -> SnrReading {
    let signal_power = mean_power(&waves.clean);
    let interference_power = mean_power(&waves.interference);
    let snr = signal_power / (interference_power + SNR_EPSILON);
    let success_rate = 100.0 * (snr / SNR_FULL_SCALE).clamp(0.0, 1.0);
    SnrReading { snr, success_rate }
}

fn mean_power(waveform: &[f64]) -> f64 {
    if waveform.is_empty() {
        return 0.0;
    }
    waveform.iter().map(|x| x * x).sum::<f64>() / waveform.len() as f64
}
