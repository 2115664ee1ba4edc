//! Provides [`GlideCamSettings`], the options a host loads and hands to each camera session.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::{error::ConfigError, smoothing::Smoothing, zoom::DistanceLimits};

/// Tuning of a glide camera. Validated once when a session starts, see [`Self::validate`].
#[derive(Debug, Clone, PartialEq, Reflect)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlideCamSettings {
    /// Smoothing time constants of orbit, pan, and zoom motion.
    pub smoothing: Smoothing,
    /// How far the camera moves per pixel of pointer motion.
    pub sensitivity: Sensitivity,
    /// Bounds on the orbit radius.
    pub limits: DistanceLimits,
    /// Largest elevation above or below the horizon, in radians.
    pub max_pitch: f32,
    /// How far in front of the camera to focus when a press hits nothing. When unset, a miss
    /// keeps the current focus point.
    pub fallback_distance: Option<f32>,
    /// How many pixels the pointer must travel from the press before it counts as a drag
    /// instead of a focus click.
    pub drag_threshold_pixels: u32,
    /// Also write the camera transform to a bound scene camera every frame.
    pub lock_camera_to_view: bool,
    /// Flip horizontal orbit and pan direction.
    pub invert_horizontal: bool,
    /// Flip vertical orbit and pan direction. Zoom direction is never inverted.
    pub invert_vertical: bool,
    /// The world's up direction. Yaw spins about this axis.
    pub up: Dir3,
    /// Tolerance below which a smoothed value is considered to have reached its target.
    pub settle_epsilon: f32,
}

impl Default for GlideCamSettings {
    fn default() -> Self {
        Self {
            smoothing: Smoothing::default(),
            sensitivity: Sensitivity::default(),
            limits: DistanceLimits::default(),
            max_pitch: 85f32.to_radians(),
            fallback_distance: None,
            drag_threshold_pixels: 3,
            lock_camera_to_view: false,
            invert_horizontal: false,
            invert_vertical: false,
            up: Dir3::Y,
            settle_epsilon: 1e-4,
        }
    }
}

impl GlideCamSettings {
    /// Check the settings can drive a camera session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (channel, time) in [
            ("orbit", self.smoothing.orbit),
            ("pan", self.smoothing.pan),
            ("zoom", self.smoothing.zoom),
        ] {
            if time.is_zero() {
                return Err(ConfigError::ZeroSmoothing { channel });
            }
        }

        let DistanceLimits { min, max } = self.limits;
        if !min.is_finite() || min <= 0.0 {
            return Err(ConfigError::NonPositiveMinDistance(min));
        }
        if !max.is_finite() || min > max {
            return Err(ConfigError::InvalidDistanceLimits { min, max });
        }

        if !self.max_pitch.is_finite()
            || self.max_pitch <= 0.0
            || self.max_pitch >= std::f32::consts::FRAC_PI_2
        {
            return Err(ConfigError::InvalidPitchLimit(self.max_pitch));
        }

        for (channel, value) in [
            ("orbit", self.sensitivity.orbit),
            ("pan", self.sensitivity.pan),
            ("zoom", self.sensitivity.zoom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSensitivity { channel, value });
            }
        }

        if let Some(distance) = self.fallback_distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(ConfigError::InvalidFallbackDistance(distance));
            }
        }

        if !self.settle_epsilon.is_finite() || self.settle_epsilon <= 0.0 {
            return Err(ConfigError::InvalidSettleEpsilon(self.settle_epsilon));
        }
        Ok(())
    }
}

/// The sensitivity of the camera controller to pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sensitivity {
    /// Radians of yaw or pitch per pixel.
    pub orbit: f32,
    /// World units per pixel, per unit of orbit distance.
    pub pan: f32,
    /// Zoom per pixel, scaled by [`zoom_distance_factor`](super::zoom::zoom_distance_factor).
    pub zoom: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            orbit: 0.004,
            pan: 0.001,
            zoom: 0.04,
        }
    }
}
