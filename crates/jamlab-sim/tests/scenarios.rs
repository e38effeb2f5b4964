//! End-to-end scenarios driving the simulation core and the threaded engine.

use std::time::{Duration, Instant};

use jamlab_core::mitigation::{MitigationAction, MitigationStrategy};
use jamlab_core::outcome::{BlockProbTable, OutcomePolicy};
use jamlab_core::params::JammerMode;
use jamlab_sim::config::{EngineConfig, TickCadence};
use jamlab_sim::engine::{SimulationCore, SimulationEngine};
use jamlab_sim::event::EngineEvent;

const DT: f64 = 0.4;

/// Scenario A: no jamming for 50 ticks keeps the success rate pinned at 100
/// and never triggers mitigation.
#[test]
fn clean_channel_stays_stable() {
    let mut config = EngineConfig::default();
    config.params.mode = JammerMode::None;
    config.threshold = 50.0;
    let mut core = SimulationCore::new(&config);

    for _ in 0..50 {
        let events = core.tick(DT).unwrap();
        for event in &events {
            match event {
                EngineEvent::Tick { success_rate, .. } => assert_eq!(*success_rate, 100.0),
                EngineEvent::Mitigation { .. } => panic!("mitigation on a clean channel"),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }
    assert_eq!(core.params().channel(), 6, "channel untouched");
}

/// Scenario B: tone jamming at block probability 0.7 against a 50% threshold
/// with a 10-packet window degrades the link and hops the channel.
#[test]
fn tone_jamming_triggers_channel_hop() {
    let mut config = EngineConfig::default();
    config.params.mode = JammerMode::Tone;
    config.outcome_policy = OutcomePolicy::ProbabilityTable(BlockProbTable::default());
    config.mitigation_strategy = MitigationStrategy::ChannelHop;
    config.threshold = 50.0;
    config.check_interval = 10;
    config.seed = 42;
    let mut core = SimulationCore::new(&config);

    let start_channel = core.params().channel();
    let mut hops = Vec::new();
    // 200 ticks = 20 detection windows; at ~30% expected success essentially
    // every window lands below the threshold
    for _ in 0..200 {
        for event in core.tick(DT).unwrap() {
            if let EngineEvent::Mitigation { action, .. } = event {
                hops.push(action);
            }
        }
    }

    assert!(!hops.is_empty(), "tone jamming at 0.7 must trip detection");
    for action in &hops {
        match action {
            MitigationAction::ChannelHopped { from, to } => {
                assert_ne!(to, from);
                assert!((1..=11).contains(to));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }
    assert_ne!(core.params().channel(), start_channel);

    // Success-rate samples stay within bounds throughout
    for sample in core.tracker().history() {
        assert!((0.0..=100.0).contains(&sample.success_rate));
    }
}

/// Scenario C: three consecutive degraded detections under the adaptive
/// filter reduce the strength to 5.0 * 0.7^3 = 1.715, above the 0.1 floor.
#[test]
fn adaptive_filter_compounds_decay() {
    let mut config = EngineConfig::default();
    config.params.mode = JammerMode::Tone;
    config.params.set_strength(5.0);
    // Every tone packet blocked, so every window evaluates at 0%
    config.outcome_policy = OutcomePolicy::ProbabilityTable(BlockProbTable {
        tone: 1.0,
        ..Default::default()
    });
    config.mitigation_strategy = MitigationStrategy::AdaptiveFilter;
    config.threshold = 70.0;
    config.check_interval = 10;
    let mut core = SimulationCore::new(&config);

    let mut decays = 0;
    for _ in 0..30 {
        for event in core.tick(DT).unwrap() {
            if let EngineEvent::Mitigation {
                action: MitigationAction::StrengthDecayed { .. },
                ..
            } = event
            {
                decays += 1;
            }
        }
    }

    assert_eq!(decays, 3, "one decay per 10-packet window");
    assert!((core.params().strength() - 1.715).abs() < 1e-9);
    assert!(core.params().strength() > 0.1);
}

/// History capacity is honored across a long run.
#[test]
fn history_stays_bounded() {
    let mut config = EngineConfig::default();
    config.params.mode = JammerMode::Noise;
    config.history_capacity = 10;
    let mut core = SimulationCore::new(&config);

    for _ in 0..25 {
        core.tick(DT).unwrap();
    }
    assert_eq!(core.tracker().history().len(), 10);
    // Oldest evicted first: the retained window covers the last 10 ticks
    let first = core.tracker().history().front().unwrap();
    assert!((first.elapsed_s - 16.0 * DT).abs() < 1e-9);
}

/// The threaded engine ticks, accepts commands and stops within a bounded
/// interval.
#[test]
fn threaded_engine_runs_and_stops_promptly() {
    let mut config = EngineConfig::default();
    config.params.mode = JammerMode::Noise;
    config.cadence = TickCadence::Fixed(Duration::from_millis(2));
    let mut engine = SimulationEngine::start(config);

    engine.set_strength(8.0);
    engine.set_mode(JammerMode::Tone);

    let mut ticks = 0;
    while ticks < 5 {
        match engine.events().recv_timeout(Duration::from_secs(5)) {
            Ok(EngineEvent::Tick { .. }) => ticks += 1,
            Ok(_) => {}
            Err(e) => panic!("no tick within timeout: {e}"),
        }
    }

    let stop_started = Instant::now();
    engine.stop();
    assert!(
        stop_started.elapsed() < Duration::from_secs(1),
        "stop must be observed within one tick"
    );
    assert!(!engine.is_running());

    // The worker signs off with a Stopped event
    let mut saw_stopped = false;
    while let Ok(event) = engine.events().try_recv() {
        if matches!(event, EngineEvent::Stopped) {
            saw_stopped = true;
        }
    }
    assert!(saw_stopped);
}

/// An invalid channel command is refused over the event channel and the
/// simulation keeps running.
#[test]
fn threaded_engine_rejects_bad_channel() {
    let mut config = EngineConfig::default();
    config.cadence = TickCadence::Fixed(Duration::from_millis(2));
    let mut engine = SimulationEngine::start(config);

    engine.set_channel(0);

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut rejected = false;
    let mut ticked_after = false;
    while Instant::now() < deadline && !(rejected && ticked_after) {
        match engine.events().recv_timeout(Duration::from_millis(500)) {
            Ok(EngineEvent::CommandRejected { .. }) => rejected = true,
            Ok(EngineEvent::Tick { .. }) if rejected => ticked_after = true,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    assert!(rejected, "invalid channel must be refused");
    assert!(ticked_after, "loop must continue after a rejected command");
    engine.stop();
}

/// Dropping the handle stops the worker without an explicit stop().
#[test]
fn dropping_handle_stops_worker() {
    let mut config = EngineConfig::default();
    config.cadence = TickCadence::Fixed(Duration::from_millis(2));
    let engine = SimulationEngine::start(config);
    let started = Instant::now();
    drop(engine);
    assert!(started.elapsed() < Duration::from_secs(1));
}
