//! Simulation engine: a synchronous per-tick core plus the background
//! worker that drives it.
//!
//! The worker thread owns all simulation state privately. Presentation
//! layers talk to it over two mpsc channels — commands in, events out — so
//! no lock guards the parameter block; ordering of the success-rate history
//! follows from the single writer. A shared stop flag bounds cancellation
//! latency to one tick interval.
//!
//! A failed tick is isolated: the worker reports it as a `TickError` event
//! and keeps running, so the operator can keep observing and intervening.
//! Only a stop request or a disconnected event receiver ends the loop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jamlab_sim::config::EngineConfig;
//! use jamlab_sim::engine::SimulationEngine;
//! use jamlab_sim::event::EngineEvent;
//!
//! let mut engine = SimulationEngine::start(EngineConfig::default());
//! for event in engine.events().iter().take(10) {
//!     if let EngineEvent::Tick { success_rate, channel, .. } = event {
//!         println!("success {success_rate:.1}% on channel {channel}");
//!     }
//! }
//! engine.stop();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use jamlab_core::error::{CoreError, CoreResult};
use jamlab_core::mitigation::MitigationController;
use jamlab_core::outcome::{OutcomeModel, TickOutcome};
use jamlab_core::params::SimulationParams;
use jamlab_core::signal_synth::SignalSynthesizer;
use jamlab_core::success_tracker::SuccessRateTracker;

use crate::config::{EngineConfig, TickCadence};
use crate::event::{EngineCommand, EngineEvent};

/// One tick of the simulation, runnable without threads.
///
/// `tick()` performs synthesize → decide → track → (on cadence) mitigate and
/// returns the events the cycle produced. The worker loop is a thin shell
/// around this; tests drive it directly.
pub struct SimulationCore {
    params: SimulationParams,
    synth: SignalSynthesizer,
    outcome: OutcomeModel,
    tracker: SuccessRateTracker,
    controller: MitigationController,
    check_interval: u64,
    emit_waveforms: bool,
    seq: u64,
    elapsed_s: f64,
}

impl SimulationCore {
    pub fn new(config: &EngineConfig) -> Self {
        // Independent RNG streams derived from the one configured seed
        let seed = config.seed;
        Self {
            params: config.params.clone(),
            synth: SignalSynthesizer::new(seed),
            outcome: OutcomeModel::new(config.outcome_policy, seed.wrapping_add(1)),
            tracker: SuccessRateTracker::new(config.history_capacity),
            controller: MitigationController::new(
                config.mitigation_strategy,
                config.threshold,
                seed.wrapping_add(2),
            ),
            check_interval: config.check_interval.max(1) as u64,
            emit_waveforms: config.emit_waveforms,
            seq: 0,
            elapsed_s: 0.0,
        }
    }

    /// Current simulation parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Success-rate tracker (counters and trend history).
    pub fn tracker(&self) -> &SuccessRateTracker {
        &self.tracker
    }

    /// Sequence number of the last tick.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Simulation time elapsed so far, in seconds.
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Apply one external command. `Stop` is handled by the worker loop and
    /// is a no-op here.
    pub fn apply_command(&mut self, cmd: EngineCommand) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        match cmd {
            EngineCommand::SetMode { mode } => {
                debug!(?mode, "jammer mode changed");
                self.params.mode = mode;
            }
            EngineCommand::SetStrength { strength } => {
                let stored = self.params.set_strength(strength);
                debug!(requested = strength, stored, "jammer strength changed");
            }
            EngineCommand::SetJammerActive { active } => {
                debug!(active, "jammer toggled");
                self.params.jammer_active = active;
            }
            EngineCommand::SetChannel { channel } => match self.params.set_channel(channel) {
                Ok(()) => debug!(channel, "channel changed"),
                Err(e) => {
                    warn!(channel, error = %e, "channel command rejected");
                    events.push(EngineEvent::CommandRejected {
                        message: e.to_string(),
                    });
                }
            },
            EngineCommand::ApplyMitigationNow => {
                let action = self.controller.apply(&mut self.params);
                info!(?action, "manual mitigation applied");
                events.push(EngineEvent::Mitigation {
                    seq: self.seq,
                    action,
                });
            }
            EngineCommand::Stop => {}
        }
        events
    }

    /// Run one simulation cycle.
    pub fn tick(&mut self, dt_s: f64) -> CoreResult<Vec<EngineEvent>> {
        self.seq += 1;
        self.elapsed_s += dt_s;

        if self.params.n_samples() == 0 {
            return Err(CoreError::EmptyTimeGrid {
                sample_rate_hz: self.params.sample_rate_hz,
                duration_s: self.params.duration_s,
            });
        }

        let waves = self.synth.synthesize(&self.params);
        let outcome = self.outcome.evaluate(&self.params, &waves, self.elapsed_s);

        let success_rate = match outcome {
            TickOutcome::Packet(pkt) => {
                debug!(id = pkt.id, blocked = pkt.blocked, "packet");
                self.tracker.record_packet(&pkt)
            }
            TickOutcome::Rate(r) => self.tracker.record_rate(self.elapsed_s, r.success_rate),
        };

        let mut events = vec![EngineEvent::Tick {
            seq: self.seq,
            elapsed_s: self.elapsed_s,
            outcome,
            success_rate,
            channel: self.params.channel(),
            mode: self.params.mode,
            strength: self.params.strength(),
            waveforms: self.emit_waveforms.then(|| waves.clone()),
        }];

        // Detection cadence: every K packets for discrete policies (window
        // reset after each evaluation), every tick for the continuous one.
        let action = if self.outcome.policy().is_discrete() {
            if self.tracker.window_total() >= self.check_interval {
                let rate = self.tracker.success_rate();
                let action = self.controller.evaluate(rate, &mut self.params);
                self.tracker.reset_window();
                action
            } else {
                None
            }
        } else {
            self.controller.evaluate(success_rate, &mut self.params)
        };

        if let Some(action) = action {
            info!(?action, success_rate, "mitigation applied");
            events.push(EngineEvent::Mitigation {
                seq: self.seq,
                action,
            });
        }

        Ok(events)
    }
}

/// Handle to a running background simulation.
///
/// Dropping the handle stops the worker.
pub struct SimulationEngine {
    commands: Sender<EngineCommand>,
    events: Receiver<EngineEvent>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimulationEngine {
    /// Spawn the worker thread and start ticking.
    pub fn start(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));

        let core = SimulationCore::new(&config);
        let cadence = config.cadence;
        let jitter_seed = config.seed.wrapping_add(3);
        let flag = Arc::clone(&running);

        let worker = thread::Builder::new()
            .name("jamlab-sim".to_string())
            .spawn(move || worker_loop(core, cadence, jitter_seed, flag, cmd_rx, event_tx))
            .expect("failed to spawn simulation worker");

        Self {
            commands: cmd_tx,
            events: event_rx,
            running,
            worker: Some(worker),
        }
    }

    /// Send a command. Returns false once the worker has exited.
    pub fn send(&self, cmd: EngineCommand) -> bool {
        self.commands.send(cmd).is_ok()
    }

    pub fn set_mode(&self, mode: jamlab_core::params::JammerMode) -> bool {
        self.send(EngineCommand::SetMode { mode })
    }

    pub fn set_strength(&self, strength: f64) -> bool {
        self.send(EngineCommand::SetStrength { strength })
    }

    pub fn set_jammer_active(&self, active: bool) -> bool {
        self.send(EngineCommand::SetJammerActive { active })
    }

    pub fn set_channel(&self, channel: u8) -> bool {
        self.send(EngineCommand::SetChannel { channel })
    }

    pub fn apply_mitigation(&self) -> bool {
        self.send(EngineCommand::ApplyMitigationNow)
    }

    /// Event stream, one `Tick` per cycle plus notifications.
    pub fn events(&self) -> &Receiver<EngineEvent> {
        &self.events
    }

    /// Whether the worker is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a stop and join the worker. Latency is bounded by one tick
    /// interval. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.commands.send(EngineCommand::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    mut core: SimulationCore,
    cadence: TickCadence,
    jitter_seed: u64,
    running: Arc<AtomicBool>,
    commands: Receiver<EngineCommand>,
    events: Sender<EngineEvent>,
) {
    let mut jitter_rng = StdRng::seed_from_u64(jitter_seed);
    info!("simulation worker started");

    'run: while running.load(Ordering::SeqCst) {
        // Apply pending commands before this tick consumes the parameters
        loop {
            match commands.try_recv() {
                Ok(EngineCommand::Stop) => {
                    running.store(false, Ordering::SeqCst);
                    break 'run;
                }
                Ok(cmd) => {
                    for event in core.apply_command(cmd) {
                        if events.send(event).is_err() {
                            break 'run;
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'run,
            }
        }

        let interval = cadence.next_interval(&mut jitter_rng);
        match core.tick(interval.as_secs_f64()) {
            Ok(tick_events) => {
                for event in tick_events {
                    if events.send(event).is_err() {
                        break 'run;
                    }
                }
            }
            Err(e) => {
                warn!(seq = core.seq(), error = %e, "tick failed, continuing");
                let report = EngineEvent::TickError {
                    seq: core.seq(),
                    message: e.to_string(),
                };
                if events.send(report).is_err() {
                    break 'run;
                }
            }
        }

        // The only blocking point; the stop flag is re-checked right after
        thread::sleep(interval);
    }

    running.store(false, Ordering::SeqCst);
    let _ = events.send(EngineEvent::Stopped);
    info!("simulation worker stopped");
}
