//! Error types for the core simulation library.

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while configuring or running the simulation core
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("Channel {0} is outside the valid set 1..=11")]
    InvalidChannel(u8),

    #[error("Strength bounds are inverted: min {min} > max {max}")]
    InvalidStrengthBounds { min: f64, max: f64 },

    #[error("Time grid is empty (sample_rate {sample_rate_hz} Hz x duration {duration_s} s)")]
    EmptyTimeGrid { sample_rate_hz: f64, duration_s: f64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
