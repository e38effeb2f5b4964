//! Rolling success-rate tracker.
//!
//! Keeps windowed sent/blocked counters (reset after each mitigation
//! evaluation) plus a capacity-bounded, time-ordered history of success-rate
//! samples for trend display. Only the simulation worker writes here, so
//! history entries are always appended in increasing time order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::outcome::PacketOutcome;

/// Default number of history samples retained for trend display.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One point on the success-rate trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateSample {
    /// Simulation time offset in seconds
    pub elapsed_s: f64,
    /// Success rate in percent, within [0, 100]
    pub success_rate: f64,
}

/// Windowed packet counters plus bounded trend history.
#[derive(Debug, Clone)]
pub struct SuccessRateTracker {
    sent: u64,
    blocked: u64,
    history: VecDeque<SuccessRateSample>,
    capacity: usize,
}

impl Default for SuccessRateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SuccessRateTracker {
    /// Create a tracker retaining at most `capacity` history samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            sent: 0,
            blocked: 0,
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a discrete packet outcome and return the current windowed
    /// success rate.
    pub fn record_packet(&mut self, outcome: &PacketOutcome) -> f64 {
        if outcome.blocked {
            self.blocked += 1;
        } else {
            self.sent += 1;
        }
        let rate = self.success_rate();
        self.push_sample(outcome.elapsed_s, rate);
        rate
    }

    /// Record an instantaneous rate from the continuous policy.
    pub fn record_rate(&mut self, elapsed_s: f64, success_rate: f64) -> f64 {
        let rate = success_rate.clamp(0.0, 100.0);
        self.push_sample(elapsed_s, rate);
        rate
    }

    /// Windowed success rate in percent. 100 when no packets were observed,
    /// so a fresh window never reads as degraded.
    pub fn success_rate(&self) -> f64 {
        let total = self.sent + self.blocked;
        if total == 0 {
            100.0
        } else {
            100.0 * self.sent as f64 / total as f64
        }
    }

    /// Packets observed in the current window.
    pub fn window_total(&self) -> u64 {
        self.sent + self.blocked
    }

    /// Packets delivered in the current window.
    pub fn window_sent(&self) -> u64 {
        self.sent
    }

    /// Packets blocked in the current window.
    pub fn window_blocked(&self) -> u64 {
        self.blocked
    }

    /// Reset the windowed counters. History is untouched.
    pub fn reset_window(&mut self) {
        self.sent = 0;
        self.blocked = 0;
    }

    /// Trend history, oldest first.
    pub fn history(&self) -> &VecDeque<SuccessRateSample> {
        &self.history
    }

    /// Maximum retained history length.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_sample(&mut self, elapsed_s: f64, success_rate: f64) {
        // FIFO eviction once the capacity is exceeded
        while self.history.len() >= self.capacity.max(1) {
            self.history.pop_front();
        }
        if self.capacity > 0 {
            self.history.push_back(SuccessRateSample {
                elapsed_s,
                success_rate,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(blocked: bool, elapsed_s: f64) -> PacketOutcome {
        PacketOutcome {
            id: 1234,
            blocked,
            elapsed_s,
        }
    }

    #[test]
    fn test_empty_window_reads_100() {
        let tracker = SuccessRateTracker::default();
        assert_eq!(tracker.success_rate(), 100.0);
    }

    #[test]
    fn test_rate_from_counters() {
        let mut tracker = SuccessRateTracker::default();
        tracker.record_packet(&packet(false, 0.0));
        tracker.record_packet(&packet(false, 0.4));
        tracker.record_packet(&packet(true, 0.8));
        tracker.record_packet(&packet(true, 1.2));
        assert_eq!(tracker.success_rate(), 50.0);
        assert_eq!(tracker.window_total(), 4);
        assert_eq!(tracker.window_blocked(), 2);
    }

    #[test]
    fn test_rate_always_bounded() {
        let mut tracker = SuccessRateTracker::default();
        for i in 0..250 {
            let rate = tracker.record_packet(&packet(i % 3 == 0, i as f64 * 0.4));
            assert!((0.0..=100.0).contains(&rate));
        }
        for sample in tracker.history() {
            assert!((0.0..=100.0).contains(&sample.success_rate));
        }
    }

    #[test]
    fn test_reset_window_keeps_history() {
        let mut tracker = SuccessRateTracker::default();
        for i in 0..10 {
            tracker.record_packet(&packet(true, i as f64));
        }
        assert_eq!(tracker.success_rate(), 0.0);
        tracker.reset_window();
        assert_eq!(tracker.success_rate(), 100.0);
        assert_eq!(tracker.history().len(), 10);
    }

    #[test]
    fn test_history_fifo_eviction() {
        let capacity = 20;
        let mut tracker = SuccessRateTracker::new(capacity);
        // Push capacity + 5 samples; the retained window must equal the
        // last `capacity` samples in order.
        for i in 0..(capacity + 5) {
            tracker.record_rate(i as f64, 50.0);
        }
        assert_eq!(tracker.history().len(), capacity);
        let times: Vec<f64> = tracker.history().iter().map(|s| s.elapsed_s).collect();
        let expected: Vec<f64> = (5..capacity + 5).map(|i| i as f64).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut tracker = SuccessRateTracker::new(7);
        for i in 0..100 {
            tracker.record_rate(i as f64, 80.0);
            assert!(tracker.history().len() <= 7);
        }
    }

    #[test]
    fn test_history_time_ordered() {
        let mut tracker = SuccessRateTracker::default();
        for i in 0..150 {
            tracker.record_packet(&packet(false, i as f64 * 0.5));
        }
        let samples: Vec<_> = tracker.history().iter().collect();
        for pair in samples.windows(2) {
            assert!(pair[0].elapsed_s < pair[1].elapsed_s);
        }
    }

    #[test]
    fn test_record_rate_clamps() {
        let mut tracker = SuccessRateTracker::default();
        assert_eq!(tracker.record_rate(0.0, 150.0), 100.0);
        assert_eq!(tracker.record_rate(1.0, -5.0), 0.0);
    }

    #[test]
    fn test_zero_capacity_keeps_no_history() {
        let mut tracker = SuccessRateTracker::new(0);
        tracker.record_rate(0.0, 50.0);
        assert!(tracker.history().is_empty());
    }
}
