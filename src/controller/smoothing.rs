//! Critically damped smoothing of camera motion, see [`Smoothing`] and [`SmoothDamp`].

use std::{
    ops::{Add, Mul, Sub},
    time::Duration,
};

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// How long each kind of camera motion takes to catch up with its input.
///
/// Each value is the smoothing time constant τ of a critically damped approach; motion has
/// effectively converged after about 5τ. Orbiting usually feels best with a shorter time than
/// panning and zooming.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Smoothing {
    /// Smoothing time of yaw and pitch.
    pub orbit: Duration,
    /// Smoothing time of the focus point and pan offset.
    pub pan: Duration,
    /// Smoothing time of the orbit distance.
    pub zoom: Duration,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing {
            orbit: Duration::from_millis(60),
            pan: Duration::from_millis(90),
            zoom: Duration::from_millis(90),
        }
    }
}

/// A value that can be smoothed: scalars and vectors.
pub trait Damped: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {
    /// The additive identity.
    const ZERO: Self;

    /// Length used for the settling test.
    fn magnitude(self) -> f32;
}

impl Damped for f32 {
    const ZERO: Self = 0.0;

    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl Damped for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// Advances `current` toward `target` over `dt` seconds, returning the new value and velocity.
///
/// This is the closed-form solution of a critically damped spring with angular frequency
/// `2 / smoothing_time`, so it never overshoots when starting at rest, and a single large step
/// lands on the same state as many small steps covering the same time. A non-positive or
/// non-finite `dt` leaves the state untouched. A non-positive `smoothing_time` jumps straight to
/// the target.
pub fn advance<T: Damped>(current: T, target: T, velocity: T, dt: f32, smoothing_time: f32) -> (T, T) {
    if !dt.is_finite() || dt <= 0.0 {
        return (current, velocity);
    }
    if smoothing_time.is_nan() || smoothing_time <= 0.0 {
        return (target, T::ZERO);
    }
    let omega = 2.0 / smoothing_time;
    let offset = current - target;
    let slope = velocity + offset * omega;
    let decay = (-omega * dt).exp();
    let next = target + (offset + slope * dt) * decay;
    let next_velocity = (velocity - slope * (omega * dt)) * decay;
    (next, next_velocity)
}

/// One smoothed channel: the live value, where it is heading, and how fast it is moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothDamp<T> {
    /// The live value.
    pub current: T,
    /// The value being approached.
    pub target: T,
    /// Rate of change of `current`, in units per second.
    pub velocity: T,
}

impl<T: Damped> SmoothDamp<T> {
    /// A channel at rest at `value`.
    pub fn at_rest(value: T) -> Self {
        Self {
            current: value,
            target: value,
            velocity: T::ZERO,
        }
    }

    /// Has the channel come to rest on its target, within `epsilon`?
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.current - self.target).magnitude() < epsilon && self.velocity.magnitude() < epsilon
    }

    /// Moves the channel forward by `dt` seconds, snapping onto the target once settled so the
    /// value doesn't creep forever. Returns true if the channel is settled.
    pub fn step(&mut self, dt: f32, smoothing_time: Duration, epsilon: f32) -> bool {
        if self.is_settled(epsilon) {
            self.snap();
            return true;
        }
        let (current, velocity) = advance(
            self.current,
            self.target,
            self.velocity,
            dt,
            smoothing_time.as_secs_f32(),
        );
        self.current = current;
        self.velocity = velocity;
        if self.is_settled(epsilon) {
            self.snap();
            return true;
        }
        false
    }

    /// Puts the channel at rest on its target.
    pub fn snap(&mut self) {
        self.current = self.target;
        self.velocity = T::ZERO;
    }
}
