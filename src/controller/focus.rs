//! Picks the point the camera should orbit around from what is under the pointer.

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// The host's scene query: the nearest visible surface under a screen position.
///
/// Implemented for closures, which is convenient in tests:
///
/// ```
/// # use bevy_glide_cam::prelude::*;
/// # use bevy_math::prelude::*;
/// let mut floor = |_screen: Vec2| Some(Vec3::ZERO);
/// assert_eq!(floor.raycast(Vec2::ZERO), Some(Vec3::ZERO));
/// ```
pub trait SceneQuery {
    /// Cast a ray through `screen_position` and return the nearest hit point in world space.
    fn raycast(&mut self, screen_position: Vec2) -> Option<Vec3>;
}

impl<F> SceneQuery for F
where
    F: FnMut(Vec2) -> Option<Vec3>,
{
    fn raycast(&mut self, screen_position: Vec2) -> Option<Vec3> {
        self(screen_position)
    }
}

/// A resolved focus point.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FocusResult {
    /// The world space point to orbit around.
    pub point: Vec3,
    /// Did the raycast hit a surface? If not, `point` is a fallback along the view direction.
    pub hit: bool,
}

/// Query the scene once and choose a focus point.
///
/// A hit that is not finite, or that coincides with the camera, is treated as a miss, because
/// it has no usable orbit direction. On a miss, the fallback is the point `fallback_distance`
/// along the view direction from the camera. Passing the current orbit distance makes the
/// fallback the current focus point, so the orbit doesn't move.
pub fn resolve_focus(
    scene: &mut impl SceneQuery,
    screen_position: Vec2,
    camera_position: Vec3,
    forward: Dir3,
    fallback_distance: f32,
) -> FocusResult {
    let hit = scene
        .raycast(screen_position)
        .filter(|point| point.is_finite())
        .filter(|point| point.distance(camera_position) > f32::EPSILON);

    match hit {
        Some(point) => {
            debug!("Focus hit at {point} under {screen_position}");
            FocusResult { point, hit: true }
        }
        None => {
            let point = camera_position + forward * fallback_distance;
            debug!("Nothing under {screen_position}, falling back to {point}");
            FocusResult { point, hit: false }
        }
    }
}
