//! # jamlab-core
//!
//! Core logic for an educational RF jamming / anti-jamming simulator:
//! waveform synthesis for several jammer signatures, a magnitude-spectrum
//! view for presentation layers, per-packet transmission outcome models,
//! windowed success-rate tracking, and a threshold-driven mitigation
//! controller (channel hopping, spread spectrum, adaptive filtering).
//!
//! This crate is purely computational — no threads, no timers, no I/O. The
//! `jamlab-sim` crate drives it from a background worker and exposes a
//! command/event interface for presentation layers.
//!
//! ## Signal flow
//!
//! ```text
//! SimulationParams ──► SignalSynthesizer ──► (SpectrumAnalyzer, display)
//!        ▲                     │
//!        │                     ▼
//!        │              OutcomeModel ──► SuccessRateTracker
//!        │                                      │
//!        └────────── MitigationController ◄─────┘
//! ```

pub mod error;
pub mod mitigation;
pub mod outcome;
pub mod params;
pub mod signal_synth;
pub mod spectrum;
pub mod success_tracker;

pub use error::{CoreError, CoreResult};
pub use mitigation::{LinkState, MitigationAction, MitigationController, MitigationStrategy};
pub use outcome::{
    BlockProbTable, OutcomeModel, OutcomePolicy, PacketOutcome, SnrReading, TickOutcome,
};
pub use params::{JammerMode, SimulationParams};
pub use signal_synth::{SignalSynthesizer, Synthesis};
pub use spectrum::{Spectrum, SpectrumAnalyzer};
pub use success_tracker::{SuccessRateSample, SuccessRateTracker};
