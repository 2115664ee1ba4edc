//! A "point-and-glide" camera controller for Bevy.
//!
//! Hold Alt and click to glide the view onto whatever is under the pointer. Hold Alt and drag to
//! orbit around it and zoom, add Ctrl to orbit at a fixed distance, or Ctrl+Shift to pan. All
//! motion is critically damped, so it keeps gliding smoothly after inputs stop.
//!
//! The motion logic in [`controller::session::CameraSession`] has no dependency on the ECS and can
//! be driven directly with synthetic events; [`GlideCamPlugin`] wires it to Bevy input and
//! picking.

pub mod controller;
pub mod input;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_transform::TransformSystem;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            component::GlideCam,
            error::ConfigError,
            focus::{FocusResult, SceneQuery},
            mode::{Action, CameraInput, CameraMode, DragMode, Modifiers},
            session::{CameraSession, ViewTarget},
            settings::{GlideCamSettings, Sensitivity},
            smoothing::Smoothing,
            zoom::DistanceLimits,
        },
        input::InputBindings,
        GlideCamPlugin,
    };
}

/// Adds input handling and per-frame updates for every [`GlideCam`](prelude::GlideCam).
///
/// Hits under the pointer come from `bevy_picking`, so add a picking backend (for example mesh
/// picking) for clicks to focus on objects. Without one, every press falls back to the current
/// focus distance.
pub struct GlideCamPlugin;

impl Plugin for GlideCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            input::glide_cam_inputs.after(bevy_picking::PickSet::Last),
        )
        .add_systems(
            PostUpdate,
            controller::component::GlideCam::update_camera_positions
                .before(TransformSystem::TransformPropagate),
        )
        .register_type::<controller::component::GlideCam>()
        .register_type::<controller::settings::GlideCamSettings>()
        .register_type::<input::InputBindings>();
    }
}
