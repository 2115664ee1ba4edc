//! Provides [`DistanceLimits`] settings and the distance-compensated zoom step.

use bevy_reflect::Reflect;

/// Bounds on the orbit radius, the distance between the camera and its focus point.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceLimits {
    /// The closest the camera can get to the focus point. Must be greater than zero, which also
    /// guarantees the camera always has a well defined look direction.
    pub min: f32,
    /// The farthest the camera can get from the focus point.
    pub max: f32,
}

impl Default for DistanceLimits {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 200.0,
        }
    }
}

impl DistanceLimits {
    /// Clamp a distance into the limits. NaN is treated as the closest allowed distance.
    pub fn clamp(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return self.min;
        }
        distance.clamp(self.min, self.max)
    }

    /// Is the distance within the limits?
    pub fn contains(&self, distance: f32) -> bool {
        (self.min..=self.max).contains(&distance)
    }
}

/// Scale applied to a pixel of zoom input at the given orbit distance.
///
/// Roughly a tenth of the distance when far away, easing down to 0.01 when very close, so zoom
/// is fine grained near the subject without stalling.
pub fn zoom_distance_factor(distance: f32) -> f32 {
    let distance = distance.max(0.0);
    let base = distance * 0.1;
    let eased = 0.01 + (base - 0.01) * (distance / (distance + 0.5));
    eased.max(0.01)
}

/// The new orbit distance after `delta_pixels` of vertical pointer motion. Moving up (negative
/// screen space y) zooms in.
pub fn zoom_step(distance: f32, delta_pixels: f32, sensitivity: f32, limits: &DistanceLimits) -> f32 {
    if !delta_pixels.is_finite() || delta_pixels == 0.0 {
        return limits.clamp(distance);
    }
    let change = delta_pixels * sensitivity * zoom_distance_factor(distance);
    limits.clamp(distance + change)
}
