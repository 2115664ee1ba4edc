//! Translates Bevy keyboard, mouse, and picking data into [`CameraInput`] events.

use bevy_ecs::prelude::*;
use bevy_input::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_picking::{hover::HoverMap, pointer::PointerId};
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::{PrimaryWindow, Window};

use crate::controller::{
    component::GlideCam,
    focus::SceneQuery,
    mode::{CameraInput, Modifiers},
};

/// Which keys act as the three camera modifiers, and which button starts a gesture.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct InputBindings {
    /// Any of these held counts as the primary modifier.
    pub primary: Vec<KeyCode>,
    /// Any of these held counts as the secondary modifier.
    pub secondary: Vec<KeyCode>,
    /// Any of these held counts as the tertiary modifier.
    pub tertiary: Vec<KeyCode>,
    /// The pointer button that starts a gesture.
    pub button: MouseButton,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            primary: vec![KeyCode::AltLeft, KeyCode::AltRight],
            secondary: vec![KeyCode::ControlLeft, KeyCode::ControlRight],
            tertiary: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
            button: MouseButton::Left,
        }
    }
}

impl InputBindings {
    /// The modifiers currently held.
    pub fn modifiers(&self, keys: &ButtonInput<KeyCode>) -> Modifiers {
        Modifiers {
            primary: keys.any_pressed(self.primary.iter().copied()),
            secondary: keys.any_pressed(self.secondary.iter().copied()),
            tertiary: keys.any_pressed(self.tertiary.iter().copied()),
        }
    }
}

/// A [`SceneQuery`] answered from the picking hover map.
///
/// The hover map already holds the hits under the mouse pointer this frame, so the screen
/// position is not needed to query it. Only hits reported for `camera` that carry a position are
/// considered, and the one nearest the camera wins.
pub struct HoverQuery<'a> {
    hover_map: Option<&'a HoverMap>,
    camera: Entity,
}

impl<'a> HoverQuery<'a> {
    /// Query hits seen through `camera`.
    pub fn new(hover_map: Option<&'a HoverMap>, camera: Entity) -> Self {
        Self { hover_map, camera }
    }
}

impl SceneQuery for HoverQuery<'_> {
    fn raycast(&mut self, _screen_position: Vec2) -> Option<Vec3> {
        self.hover_map?
            .get(&PointerId::Mouse)?
            .values()
            .filter(|hit| hit.camera == self.camera)
            .filter_map(|hit| Some((hit.depth, hit.position?)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, position)| position)
    }
}

/// Starts sessions on a qualifying press, and forwards modifier and pointer changes to every
/// live session.
pub fn glide_cam_inputs(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    hover_map: Option<Res<HoverMap>>,
    mut cameras: Query<(Entity, &Camera, &mut GlideCam, &Transform)>,
) {
    let cursor = windows.single().ok().and_then(Window::cursor_position);

    for (entity, camera, mut glide_cam, transform) in cameras.iter_mut() {
        if !camera.is_active {
            continue;
        }
        let bindings = glide_cam.bindings.clone();
        let modifiers = bindings.modifiers(&keys);
        let just_pressed = buttons.just_pressed(bindings.button);

        if glide_cam.session().is_none() {
            if !(just_pressed && modifiers.primary && cursor.is_some()) {
                continue;
            }
            if let Err(error) = glide_cam.start_session(transform) {
                error_once!("Glide camera {entity} could not start: {error}");
                continue;
            }
        }
        let Some(session) = glide_cam.session_mut() else {
            continue;
        };
        let mut scene = HoverQuery::new(hover_map.as_deref(), entity);

        if modifiers != session.modifiers() {
            session.handle_event(CameraInput::Modifiers(modifiers), &mut scene);
        }
        if let Some(position) = cursor {
            if just_pressed {
                session.handle_event(CameraInput::Press { position }, &mut scene);
            } else if buttons.pressed(bindings.button) {
                session.handle_event(CameraInput::Move { position }, &mut scene);
            }
        }
        if buttons.just_released(bindings.button) {
            let position = cursor.unwrap_or_default();
            session.handle_event(CameraInput::Release { position }, &mut scene);
        }
    }
}
