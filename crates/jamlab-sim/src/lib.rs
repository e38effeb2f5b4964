//! # jamlab-sim
//!
//! Background simulation engine for the jamlab RF jamming / anti-jamming
//! simulator. Wraps the computational core from `jamlab-core` in a worker
//! thread with a command/event interface: presentation layers subscribe to
//! tick events (packet outcomes, success rate, waveforms) and steer the
//! simulation through commands (jammer mode, strength, channel, stop).
//!
//! See [`engine::SimulationEngine`] for the threaded entry point and
//! [`engine::SimulationCore`] for the synchronous per-tick unit.

pub mod config;
pub mod engine;
pub mod event;

pub use config::{EngineConfig, TickCadence};
pub use engine::{SimulationCore, SimulationEngine};
pub use event::{EngineCommand, EngineEvent};
