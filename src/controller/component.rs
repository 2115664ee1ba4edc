//! The primary [`Component`] of the controller, [`GlideCam`].

use std::time::Duration;

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_reflect::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    error::ConfigError,
    session::{CameraSession, ViewTarget},
    settings::GlideCamSettings,
};
use crate::input::InputBindings;

/// Tracks the settings and live session of a glide camera.
///
/// # Moving the Camera
///
/// The [`GlideCamPlugin`](crate::GlideCamPlugin) feeds keyboard and mouse input to every active
/// camera with this component, using [`bevy_picking`] hover data to find what is under the
/// pointer. Any picking backend works, as long as it reports hit positions.
///
/// To drive the camera manually:
///
/// 1. Start a session with [`GlideCam::start_session`].
/// 2. Send events with [`CameraSession::handle_event`] through [`GlideCam::session_mut`].
/// 3. [`GlideCam::update_camera_positions`] ticks the session every frame, and ends it once it
///    is finished.
#[derive(Debug, Clone, Reflect, Component)]
pub struct GlideCam {
    /// Tuning of the camera, copied into each new session.
    pub settings: GlideCamSettings,
    /// Which keys and button drive the camera.
    pub bindings: InputBindings,
    /// The scene camera to keep in sync when [`GlideCamSettings::lock_camera_to_view`] is set.
    pub bound_camera: Option<Entity>,
    /// Managed by the camera controller, though you may want to change this when spawning or
    /// manually moving the camera.
    ///
    /// A new session orbits a point this far in front of the camera until something is clicked.
    /// Updated with the final orbit distance whenever a session ends, so the pivot doesn't
    /// change suddenly between sessions.
    pub last_focus_distance: f32,
    #[reflect(ignore)]
    session: Option<CameraSession>,
}

impl Default for GlideCam {
    fn default() -> Self {
        GlideCam {
            settings: Default::default(),
            bindings: Default::default(),
            bound_camera: None,
            last_focus_distance: 10.0,
            session: None,
        }
    }
}

impl GlideCam {
    /// Create a new glide camera component.
    pub fn new(settings: GlideCamSettings, initial_focus_distance: f32) -> Self {
        Self {
            settings,
            last_focus_distance: initial_focus_distance.abs(),
            ..Default::default()
        }
    }

    /// Keep `camera` in sync with this view.
    pub fn with_bound_camera(self, camera: Entity) -> Self {
        Self {
            bound_camera: Some(camera),
            settings: GlideCamSettings {
                lock_camera_to_view: true,
                ..self.settings
            },
            ..self
        }
    }

    /// The live session, if the camera is being controlled or is still settling.
    pub fn session(&self) -> Option<&CameraSession> {
        self.session.as_ref()
    }

    /// Mutable access to the live session.
    pub fn session_mut(&mut self) -> Option<&mut CameraSession> {
        self.session.as_mut()
    }

    /// Start a session from `view`, replacing any session in progress. Fails, leaving the camera
    /// untouched, if the settings are invalid.
    pub fn start_session(&mut self, view: &Transform) -> Result<&mut CameraSession, ConfigError> {
        let session = CameraSession::new(self.settings.clone(), view, self.last_focus_distance)?;
        Ok(self.session.insert(session))
    }

    /// End the session, remembering its orbit distance for the next one.
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.last_focus_distance = session.distance();
            info!("Camera session ended at distance {:.3}", self.last_focus_distance);
        }
    }

    /// Tick every live session and write the resulting transforms. Called once per frame.
    pub fn update_camera_positions(
        mut cameras: Query<(&mut GlideCam, &mut Transform)>,
        mut bound_cameras: Query<&mut Transform, Without<GlideCam>>,
        mut redraw: EventWriter<RequestRedraw>,
        time: Res<Time>,
    ) {
        for (mut glide_cam, transform) in cameras.iter_mut() {
            glide_cam.update(transform, &mut bound_cameras, &mut redraw, time.delta());
        }
    }

    fn update(
        &mut self,
        transform: Mut<Transform>,
        bound_cameras: &mut Query<&mut Transform, Without<GlideCam>>,
        redraw: &mut EventWriter<RequestRedraw>,
        delta_time: Duration,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mut view = EcsView {
            view: transform,
            bound_camera: self.bound_camera,
            bound_cameras,
        };
        session.tick(delta_time, &mut view);

        if session.is_finished() {
            self.end_session();
        } else if !session.is_settled() {
            redraw.write(RequestRedraw);
        }
    }
}

/// Writes session output into the ECS.
struct EcsView<'a, 'w, 's, 't> {
    view: Mut<'a, Transform>,
    bound_camera: Option<Entity>,
    bound_cameras: &'a mut Query<'w, 's, &'t mut Transform, Without<GlideCam>>,
}

impl ViewTarget for EcsView<'_, '_, '_, '_> {
    fn set_view_transform(&mut self, transform: &Transform) {
        // Keep the camera's own scale
        self.view.translation = transform.translation;
        self.view.rotation = transform.rotation;
    }

    fn set_bound_camera_transform(&mut self, transform: &Transform) {
        let Some(entity) = self.bound_camera else {
            warn_once!("lock_camera_to_view is set but no bound camera was given");
            return;
        };
        match self.bound_cameras.get_mut(entity) {
            Ok(mut bound) => {
                bound.translation = transform.translation;
                bound.rotation = transform.rotation;
            }
            Err(_) => warn_once!("Bound camera {entity} has no Transform"),
        }
    }
}
