//! Errors raised when a camera session cannot start.

use thiserror::Error;

/// The camera settings, or the view a session was asked to start from, are unusable.
///
/// This is only ever returned at session start. Once a session is running, every numeric edge
/// case is clamped instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A smoothing time constant was zero.
    #[error("{channel} smoothing time must be greater than zero")]
    ZeroSmoothing {
        /// Which smoothing channel.
        channel: &'static str,
    },

    /// The minimum orbit distance was not a positive finite number.
    #[error("minimum distance must be positive and finite, got {0}")]
    NonPositiveMinDistance(f32),

    /// The distance limits were inverted or the maximum was not finite.
    #[error("distance limits are invalid: min {min} must not exceed max {max}")]
    InvalidDistanceLimits {
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },

    /// The pitch limit was outside `(0, π/2)`.
    #[error("pitch limit must lie strictly between 0 and π/2 radians, got {0}")]
    InvalidPitchLimit(f32),

    /// A sensitivity was negative or not finite.
    #[error("{channel} sensitivity must be finite and non-negative, got {value}")]
    InvalidSensitivity {
        /// Which sensitivity channel.
        channel: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The fallback focus distance was not a positive finite number.
    #[error("fallback focus distance must be positive and finite, got {0}")]
    InvalidFallbackDistance(f32),

    /// The settling tolerance was not a positive finite number.
    #[error("settle epsilon must be positive and finite, got {0}")]
    InvalidSettleEpsilon(f32),

    /// The initial view transform contained NaN or infinite values.
    #[error("initial view transform is not finite")]
    NonFiniteView,
}
