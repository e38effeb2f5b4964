//! Simulation parameters shared by the synthesizer, outcome models and
//! mitigation controller.
//!
//! The parameter block is owned by the simulation engine; presentation
//! layers never hold a mutable reference to it. External changes (a strength
//! slider, a mode selector) arrive as engine commands and are applied through
//! the clamping setters here.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Smallest channel in the hop set (WiFi-style 1..=11).
pub const CHANNEL_MIN: u8 = 1;
/// Largest channel in the hop set.
pub const CHANNEL_MAX: u8 = 11;

/// Candidate center frequencies for the spread-spectrum countermeasure (Hz).
pub const SPREAD_CANDIDATES_HZ: [f64; 5] = [40.0, 45.0, 50.0, 55.0, 60.0];

/// Jammer waveform mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JammerMode {
    /// No interference; the channel carries the clean signal only
    None,
    /// Broadband white Gaussian noise
    Noise,
    /// Single tone at the signal's center frequency
    Tone,
    /// Periodic spikes (one high-amplitude sample per stride)
    Pulsed,
    /// Linear chirp sweeping across the band
    Sweep,
    /// Two-tone signature mimicking a relayed transmission
    Repeater,
}

impl JammerMode {
    /// All jammer modes, in menu order.
    pub const ALL: [JammerMode; 6] = [
        JammerMode::None,
        JammerMode::Noise,
        JammerMode::Tone,
        JammerMode::Pulsed,
        JammerMode::Sweep,
        JammerMode::Repeater,
    ];
}

/// Mutable simulation parameter block.
///
/// Mutated only by the mitigation controller and by explicit engine commands;
/// `strength` and `channel` go through the clamping setters so the block can
/// never hold an out-of-range value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Active jammer mode
    pub mode: JammerMode,
    /// Whether the jammer contributes to packet loss at all
    pub jammer_active: bool,
    /// Signal center frequency in Hz
    pub center_freq_hz: f64,
    /// Sample rate in Hz
    pub sample_rate_hz: f64,
    /// Synthesis window duration in seconds
    pub duration_s: f64,
    /// Jammer strength, kept within `strength_bounds`
    strength: f64,
    /// Inclusive strength bounds (min, max)
    strength_bounds: (f64, f64),
    /// Active channel, kept within 1..=11
    channel: u8,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            mode: JammerMode::None,
            jammer_active: true,
            center_freq_hz: 50.0,
            sample_rate_hz: 1000.0,
            duration_s: 1.0,
            strength: 5.0,
            strength_bounds: (0.1, 10.0),
            channel: 6,
        }
    }
}

impl SimulationParams {
    /// Replace the strength bounds, re-clamping the current strength.
    ///
    /// The strength-scaled outcome policy interprets strength as a blocking
    /// probability, so variants using it configure bounds like (0.1, 0.9).
    pub fn with_strength_bounds(mut self, min: f64, max: f64) -> CoreResult<Self> {
        if min > max {
            return Err(CoreError::InvalidStrengthBounds { min, max });
        }
        self.strength_bounds = (min, max);
        self.strength = self.strength.clamp(min, max);
        Ok(self)
    }

    /// Current jammer strength.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Inclusive strength bounds (min, max).
    pub fn strength_bounds(&self) -> (f64, f64) {
        self.strength_bounds
    }

    /// Set the jammer strength, clamping to the configured bounds.
    /// Returns the value actually stored.
    pub fn set_strength(&mut self, strength: f64) -> f64 {
        let (min, max) = self.strength_bounds;
        self.strength = strength.clamp(min, max);
        self.strength
    }

    /// Current channel.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the active channel. Rejects values outside 1..=11.
    pub fn set_channel(&mut self, channel: u8) -> CoreResult<()> {
        if !(CHANNEL_MIN..=CHANNEL_MAX).contains(&channel) {
            return Err(CoreError::InvalidChannel(channel));
        }
        self.channel = channel;
        Ok(())
    }

    /// Number of samples in one synthesis window.
    pub fn n_samples(&self) -> usize {
        (self.sample_rate_hz * self.duration_s) as usize
    }

    /// Sample instants over `[0, duration)`, endpoint excluded.
    pub fn time_grid(&self) -> Vec<f64> {
        let n = self.n_samples();
        if n == 0 {
            return Vec::new();
        }
        let dt = self.duration_s / n as f64;
        (0..n).map(|i| i as f64 * dt).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_range() {
        let p = SimulationParams::default();
        assert!(p.channel() >= CHANNEL_MIN && p.channel() <= CHANNEL_MAX);
        let (min, max) = p.strength_bounds();
        assert!(p.strength() >= min && p.strength() <= max);
        assert_eq!(p.n_samples(), 1000);
    }

    #[test]
    fn test_strength_clamped() {
        let mut p = SimulationParams::default();
        assert_eq!(p.set_strength(42.0), 10.0);
        assert_eq!(p.set_strength(-3.0), 0.1);
        assert_eq!(p.set_strength(7.5), 7.5);
    }

    #[test]
    fn test_invalid_channel_rejected() {
        let mut p = SimulationParams::default();
        assert!(p.set_channel(0).is_err());
        assert!(p.set_channel(12).is_err());
        assert!(p.set_channel(11).is_ok());
        assert_eq!(p.channel(), 11);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let res = SimulationParams::default().with_strength_bounds(5.0, 1.0);
        assert!(res.is_err());
    }

    #[test]
    fn test_bounds_reclamp_strength() {
        let p = SimulationParams::default()
            .with_strength_bounds(0.1, 0.9)
            .unwrap();
        assert_eq!(p.strength(), 0.9);
    }

    #[test]
    fn test_time_grid_excludes_endpoint() {
        let p = SimulationParams::default();
        let t = p.time_grid();
        assert_eq!(t.len(), 1000);
        assert_eq!(t[0], 0.0);
        assert!(*t.last().unwrap() < p.duration_s);
        // Uniform spacing
        let dt = t[1] - t[0];
        assert!((t[2] - t[1] - dt).abs() < 1e-12);
    }

    #[test]
    fn test_empty_time_grid() {
        let mut p = SimulationParams::default();
        p.duration_s = 0.0;
        assert!(p.time_grid().is_empty());
    }
}
