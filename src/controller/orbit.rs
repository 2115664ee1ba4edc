//! Spherical orbit coordinates and the look-at orientation derived from them.
//!
//! Angles are measured in a Y-up reference frame which is rotated onto the configured up axis.
//! Yaw rotates about up, with zero yaw placing the camera on the +Z side of the focus point, and
//! pitch is the elevation above the horizontal plane.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

/// The closest pitch may get to either pole, in radians.
pub const GIMBAL_LOCK_EPSILON: f32 = 1e-3;

/// Position of a point relative to a focus point, in orbit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Spherical {
    /// Rotation about the up axis, in `[0, 2π)` when produced by [`cartesian_to_spherical`].
    pub yaw: f32,
    /// Elevation above the horizontal plane.
    pub pitch: f32,
    /// Radius of the orbit.
    pub distance: f32,
}

fn reference_frame(up: Dir3) -> Quat {
    Quat::from_rotation_arc(Vec3::Y, *up)
}

/// Offset from the focus point to a camera orbiting at the given angles and radius.
pub fn spherical_to_cartesian(yaw: f32, pitch: f32, distance: f32, up: Dir3) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let local = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
    reference_frame(up) * (local * distance)
}

/// Inverse of [`spherical_to_cartesian`]. Returns `None` for a zero-length or non-finite offset,
/// which has no defined direction.
pub fn cartesian_to_spherical(offset: Vec3, up: Dir3) -> Option<Spherical> {
    let local = reference_frame(up).inverse() * offset;
    let distance = local.length();
    if !distance.is_finite() || distance <= f32::EPSILON {
        return None;
    }
    Some(Spherical {
        yaw: wrap_angle(local.x.atan2(local.z)),
        pitch: (local.y / distance).clamp(-1.0, 1.0).asin(),
        distance,
    })
}

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `[-π, π)`.
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from + PI) - PI
}

/// The largest pitch magnitude allowed for a configured limit.
pub fn pitch_limit(max_pitch: f32) -> f32 {
    max_pitch.clamp(0.0, FRAC_PI_2 - GIMBAL_LOCK_EPSILON)
}

/// Clamps pitch symmetrically so the camera never reaches a pole. Non-finite input becomes level.
pub fn clamp_pitch(pitch: f32, max_pitch: f32) -> f32 {
    if !pitch.is_finite() {
        return 0.0;
    }
    let limit = pitch_limit(max_pitch);
    pitch.clamp(-limit, limit)
}

/// Orientation of a camera at `position` looking at `focus`, right handed, keeping `up` upright.
pub fn look_at(position: Vec3, focus: Vec3, up: Dir3) -> Quat {
    Transform::from_translation(position)
        .looking_at(focus, up)
        .rotation
}

/// Orientation of a camera orbiting at the given angles, looking back at its focus point.
pub fn orbit_rotation(yaw: f32, pitch: f32, up: Dir3) -> Quat {
    look_at(spherical_to_cartesian(yaw, pitch, 1.0, up), Vec3::ZERO, up)
}

/// The full camera transform for an orbit about `focus`.
pub fn orbit_transform(focus: Vec3, orbit: Spherical, up: Dir3) -> Transform {
    let translation = focus + spherical_to_cartesian(orbit.yaw, orbit.pitch, orbit.distance, up);
    Transform::from_translation(translation).with_rotation(look_at(translation, focus, up))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn zero_angles_sit_behind_focus() {
        let offset = spherical_to_cartesian(0.0, 0.0, 5.0, Dir3::Y);
        assert!((offset - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);

        let orbit = Spherical {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
        };
        let transform = orbit_transform(Vec3::ZERO, orbit, Dir3::Y);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn positive_pitch_raises_camera() {
        let offset = spherical_to_cartesian(0.3, 0.5, 2.0, Dir3::Y);
        assert!(offset.y > 0.0);
        assert!((offset.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn round_trip_recovers_angles() {
        let mut rng = StdRng::seed_from_u64(7);
        let limit = pitch_limit(FRAC_PI_2);
        for up in [Dir3::Y, Dir3::Z, Dir3::NEG_X] {
            for _ in 0..500 {
                let yaw = rng.gen_range(-20.0..20.0);
                let pitch = rng.gen_range(-limit..limit);
                let distance = rng.gen_range(0.01..500.0);

                let offset = spherical_to_cartesian(yaw, pitch, distance, up);
                let back = cartesian_to_spherical(offset, up).unwrap();

                assert!(shortest_angle(wrap_angle(yaw), back.yaw).abs() < 1e-3);
                assert!((back.pitch - pitch).abs() < 1e-3);
                assert!((back.distance - distance).abs() < 1e-3 * distance.max(1.0));
                assert!((0.0..TAU).contains(&back.yaw));
            }
        }
    }

    #[test]
    fn degenerate_offset_has_no_direction() {
        assert!(cartesian_to_spherical(Vec3::ZERO, Dir3::Y).is_none());
        assert!(cartesian_to_spherical(Vec3::NAN, Dir3::Y).is_none());
    }

    #[test]
    fn pitch_never_reaches_pole() {
        let limit = FRAC_PI_2 - GIMBAL_LOCK_EPSILON;
        assert_eq!(clamp_pitch(10.0, FRAC_PI_2), limit);
        assert_eq!(clamp_pitch(-10.0, FRAC_PI_2), -limit);
        assert_eq!(clamp_pitch(0.2, 0.1), 0.1);
        assert_eq!(clamp_pitch(f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn wrapping_stays_in_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
        assert!((shortest_angle(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
    }

    #[test]
    fn orbit_rotation_faces_focus_near_poles() {
        let pitch = pitch_limit(FRAC_PI_2);
        let rotation = orbit_rotation(1.0, pitch, Dir3::Y);
        assert!(rotation.is_finite());
        let forward = rotation * Vec3::NEG_Z;
        let expected = -spherical_to_cartesian(1.0, pitch, 1.0, Dir3::Y);
        assert!((forward - expected).length() < 1e-3);
    }
}
