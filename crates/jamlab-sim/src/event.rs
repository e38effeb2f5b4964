//! Command/event interface between the engine and presentation layers.
//!
//! Commands flow presentation → engine and are applied before the next tick
//! consumes the parameters. Events flow engine → presentation, one `Tick`
//! per cycle plus mitigation, rejection and error notifications.

use serde::{Deserialize, Serialize};

use jamlab_core::mitigation::MitigationAction;
use jamlab_core::outcome::TickOutcome;
use jamlab_core::params::JammerMode;
use jamlab_core::signal_synth::Synthesis;

/// Inbound commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Switch the jammer mode
    SetMode { mode: JammerMode },
    /// Set the jammer strength; clamped to the configured bounds
    SetStrength { strength: f64 },
    /// Gate whether the jammer blocks packets at all
    SetJammerActive { active: bool },
    /// Move to an explicit channel; rejected outside 1..=11
    SetChannel { channel: u8 },
    /// Apply the configured countermeasure without waiting for detection
    ApplyMitigationNow,
    /// Stop the worker; observed within one tick
    Stop,
}

/// Outbound events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// One completed simulation cycle
    Tick {
        seq: u64,
        /// Simulation time offset in seconds
        elapsed_s: f64,
        outcome: TickOutcome,
        /// Windowed success rate in percent after this tick
        success_rate: f64,
        channel: u8,
        mode: JammerMode,
        strength: f64,
        /// Synthesized waveforms, when the engine is configured to emit them
        waveforms: Option<Synthesis>,
    },
    /// A countermeasure was applied (detection-driven or manual)
    Mitigation {
        seq: u64,
        action: MitigationAction,
    },
    /// A command carried an invalid value and was refused
    CommandRejected { message: String },
    /// A tick failed; the loop continues
    TickError { seq: u64, message: String },
    /// The worker exited
    Stopped,
}
