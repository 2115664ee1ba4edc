//! The camera motion controller, [`CameraSession`].

use std::time::Duration;

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

use super::{
    error::ConfigError,
    focus::{resolve_focus, FocusResult, SceneQuery},
    mode::{Action, CameraInput, CameraMode, DragMode, ModeClassifier, Modifiers},
    orbit::{
        cartesian_to_spherical, clamp_pitch, orbit_rotation, orbit_transform,
        shortest_angle, spherical_to_cartesian, wrap_angle, Spherical,
    },
    settings::GlideCamSettings,
    smoothing::{SmoothDamp, Smoothing},
    zoom::zoom_step,
};

/// Receives the transforms produced by [`CameraSession::tick`].
pub trait ViewTarget {
    /// Move the interactive viewpoint.
    fn set_view_transform(&mut self, transform: &Transform);

    /// Move the scene camera bound to the view. Only called when
    /// [`GlideCamSettings::lock_camera_to_view`] is set.
    fn set_bound_camera_transform(&mut self, transform: &Transform);
}

/// State of one interactive camera session, from the first qualifying press until every input is
/// released and motion has settled.
///
/// The orbit parameters (focus point, yaw, pitch, distance) are the source of truth. Each of
/// them is a smoothed channel with a live value chasing a target, and the camera position is
/// recomputed from the live values every tick, so it can never drift away from the orbit.
///
/// # Driving a session
///
/// 1. Create it with [`CameraSession::new`] from the current view.
/// 2. Forward every modifier change and pointer event to [`CameraSession::handle_event`].
/// 3. Call [`CameraSession::tick`] once per frame until [`CameraSession::is_settled`].
/// 4. Drop it once [`CameraSession::is_finished`].
///
/// A new press while motion is still settling re-anchors from wherever the camera is at that
/// moment, carrying over the live velocities, so the camera never jumps.
///
/// Focusing on a new point holds the camera where it is and glides only the focus point, so
/// the view turns toward the point without the camera swinging around it. A drag releases the
/// hold.
#[derive(Debug, Clone)]
pub struct CameraSession {
    settings: GlideCamSettings,
    classifier: ModeClassifier,
    yaw: SmoothDamp<f32>,
    pitch: SmoothDamp<f32>,
    distance: SmoothDamp<f32>,
    /// Focus point as of the last re-anchor. The effective focus point adds the pan offset.
    anchor: SmoothDamp<Vec3>,
    /// Pan accumulated since the last re-anchor.
    pan_offset: SmoothDamp<Vec3>,
    pending_focus: Option<FocusResult>,
    pending_delta: Vec2,
    /// Camera position kept fixed while the focus point glides onto a new point.
    held_position: Option<Vec3>,
    transform: Transform,
}

impl CameraSession {
    /// Start a session from the current view, orbiting a focus point `focus_distance` in front of
    /// the camera.
    ///
    /// The view is re-derived from orbit coordinates, so it only moves if it was outside the
    /// pitch or distance limits, or had roll.
    pub fn new(
        settings: GlideCamSettings,
        view: &Transform,
        focus_distance: f32,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        if !view.translation.is_finite() || !view.rotation.is_finite() {
            return Err(ConfigError::NonFiniteView);
        }

        let distance = settings.limits.clamp(focus_distance);
        let focus = view.translation + view.forward() * distance;
        let orbit = cartesian_to_spherical(view.translation - focus, settings.up).unwrap_or(
            Spherical {
                yaw: 0.0,
                pitch: 0.0,
                distance,
            },
        );
        let pitch = clamp_pitch(orbit.pitch, settings.max_pitch);
        if (pitch - orbit.pitch).abs() > 1e-6 {
            warn!(
                "Initial view pitch {:.3} exceeds the limit, clamping to {:.3}",
                orbit.pitch, pitch
            );
        }

        let mut session = Self {
            classifier: ModeClassifier::new(settings.drag_threshold_pixels),
            yaw: SmoothDamp::at_rest(orbit.yaw),
            pitch: SmoothDamp::at_rest(pitch),
            distance: SmoothDamp::at_rest(distance),
            anchor: SmoothDamp::at_rest(focus),
            pan_offset: SmoothDamp::at_rest(Vec3::ZERO),
            pending_focus: None,
            pending_delta: Vec2::ZERO,
            held_position: None,
            transform: *view,
            settings,
        };
        session.transform = session.compose();
        info!(
            "Camera session started at {} orbiting {} at distance {distance:.3}",
            session.transform.translation, focus
        );
        Ok(session)
    }

    /// Feed one host input event through the mode classifier, and act on the result.
    ///
    /// A qualifying press queries the scene exactly once. The resolved focus point is applied
    /// when the gesture turns out to be a click or a drag, and discarded if it is cancelled.
    pub fn handle_event(&mut self, input: CameraInput, scene: &mut impl SceneQuery) -> Action {
        let before = self.classifier.mode();
        let action = self.classifier.handle(input);

        match action {
            Action::None => (),
            Action::FocusPending { position } => {
                let fallback_distance = match self.settings.fallback_distance {
                    Some(distance) => self.settings.limits.clamp(distance),
                    None => self.distance.current,
                };
                self.pending_focus = Some(resolve_focus(
                    scene,
                    position,
                    self.transform.translation,
                    self.transform.forward(),
                    fallback_distance,
                ));
            }
            Action::DragStarted { delta, .. } => {
                if let Some(focus) = self.pending_focus.take() {
                    self.refocus(focus);
                }
                self.pending_delta += delta;
            }
            Action::Dragged { delta, .. } => self.pending_delta += delta,
            // Input gathered under the old drag kind must not be applied under the new one.
            Action::ModeSwitched { from: mode, .. } | Action::DragEnded { mode } => {
                self.flush_input(mode)
            }
            Action::FocusClick { .. } => {
                if let Some(focus) = self.pending_focus.take() {
                    self.refocus(focus);
                }
            }
            Action::Cancelled => self.pending_focus = None,
        }

        let after = self.classifier.mode();
        if before != after {
            debug!("Camera mode {before:?} -> {after:?}");
        }
        action
    }

    /// Advance the camera by `dt`, write the new transform to `view`, and return it.
    ///
    /// Pointer motion gathered since the last tick is applied to the targets first, according to
    /// the current mode. Once [`Self::is_settled`], this is a no-op that returns the last
    /// transform without touching `view`.
    pub fn tick(&mut self, dt: Duration, view: &mut impl ViewTarget) -> Transform {
        if self.is_settled() {
            return self.transform;
        }

        match self.classifier.mode().drag_mode() {
            Some(mode) => self.flush_input(mode),
            None => self.pending_delta = Vec2::ZERO,
        }

        let dt = dt.as_secs_f32();
        let Smoothing { orbit, pan, zoom } = self.settings.smoothing;
        let epsilon = self.settings.settle_epsilon;

        self.anchor.step(dt, pan, epsilon);
        self.pan_offset.step(dt, pan, epsilon);
        match self.held_position {
            Some(held) => self.follow_held(held),
            None => {
                if self.yaw.step(dt, orbit, epsilon) {
                    let wrapped = wrap_angle(self.yaw.current);
                    self.yaw = SmoothDamp::at_rest(wrapped);
                }
                self.pitch.step(dt, orbit, epsilon);
                self.distance.step(dt, zoom, epsilon);
            }
        }
        // A reversed target can carry momentum past a limit
        self.pitch.current = clamp_pitch(self.pitch.current, self.settings.max_pitch);
        self.distance.current = self.settings.limits.clamp(self.distance.current);

        let transform = self.compose();
        view.set_view_transform(&transform);
        if self.settings.lock_camera_to_view {
            view.set_bound_camera_transform(&transform);
        }
        self.transform = transform;
        transform
    }

    /// Is the camera at rest, with no gesture in progress? Hosts can stop scheduling frames.
    pub fn is_settled(&self) -> bool {
        let epsilon = self.settings.settle_epsilon;
        self.classifier.mode() == CameraMode::Idle
            && self.pending_delta == Vec2::ZERO
            && self.held_position.is_none()
            && self.yaw.is_settled(epsilon)
            && self.pitch.is_settled(epsilon)
            && self.distance.is_settled(epsilon)
            && self.anchor.is_settled(epsilon)
            && self.pan_offset.is_settled(epsilon)
    }

    /// Is the session over: settled, and with every modifier released?
    pub fn is_finished(&self) -> bool {
        !self.classifier.modifiers().any() && self.is_settled()
    }

    /// The current mode.
    pub fn mode(&self) -> CameraMode {
        self.classifier.mode()
    }

    /// The modifiers last reported by the host.
    pub fn modifiers(&self) -> Modifiers {
        self.classifier.modifiers()
    }

    /// The settings this session was started with.
    pub fn settings(&self) -> &GlideCamSettings {
        &self.settings
    }

    /// The focus resolved for a press that is still waiting to become a click or drag.
    pub fn pending_focus(&self) -> Option<FocusResult> {
        self.pending_focus
    }

    /// The last transform produced.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Live camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// The position the camera is heading toward.
    pub fn target_position(&self) -> Vec3 {
        let pitch = clamp_pitch(self.pitch.target, self.settings.max_pitch);
        self.target_focus_point()
            + spherical_to_cartesian(
                self.yaw.target,
                pitch,
                self.distance.target,
                self.settings.up,
            )
    }

    /// Live view direction.
    pub fn forward(&self) -> Dir3 {
        self.transform.forward()
    }

    /// Live focus point, including pan.
    pub fn focus_point(&self) -> Vec3 {
        self.anchor.current + self.pan_offset.current
    }

    /// The focus point being approached, including pan.
    pub fn target_focus_point(&self) -> Vec3 {
        self.anchor.target + self.pan_offset.target
    }

    /// Live yaw. Not wrapped while moving, so it stays continuous across a full turn.
    pub fn yaw(&self) -> f32 {
        self.yaw.current
    }

    /// Target yaw. Not wrapped while moving, see [`Self::yaw`].
    pub fn target_yaw(&self) -> f32 {
        self.yaw.target
    }

    /// Live pitch.
    pub fn pitch(&self) -> f32 {
        self.pitch.current
    }

    /// Target pitch.
    pub fn target_pitch(&self) -> f32 {
        self.pitch.target
    }

    /// Live orbit distance.
    pub fn distance(&self) -> f32 {
        self.distance.current
    }

    /// Target orbit distance.
    pub fn target_distance(&self) -> f32 {
        self.distance.target
    }

    /// Live pan offset accumulated since the focus point was last re-anchored.
    pub fn pan_offset(&self) -> Vec3 {
        self.pan_offset.current
    }

    /// Target pan offset accumulated since the focus point was last re-anchored.
    pub fn target_pan_offset(&self) -> Vec3 {
        self.pan_offset.target
    }

    fn flush_input(&mut self, mode: DragMode) {
        let delta = std::mem::take(&mut self.pending_delta);
        self.apply_drag(mode, delta);
    }

    fn apply_drag(&mut self, mode: DragMode, delta: Vec2) {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return;
        }
        self.release_hold();
        let sensitivity = self.settings.sensitivity;
        let horizontal = if self.settings.invert_horizontal {
            -delta.x
        } else {
            delta.x
        };
        let vertical = if self.settings.invert_vertical {
            -delta.y
        } else {
            delta.y
        };

        match mode {
            DragMode::OrbitZoom => {
                self.orbit_by(horizontal, vertical);
                self.distance.target = zoom_step(
                    self.distance.target,
                    delta.y,
                    sensitivity.zoom,
                    &self.settings.limits,
                );
            }
            DragMode::OrbitOnly => self.orbit_by(horizontal, vertical),
            DragMode::Pan => {
                // Grab the scene: the view moves opposite to the pointer in the camera's plane.
                let rotation =
                    orbit_rotation(self.yaw.target, self.pitch.target, self.settings.up);
                let right = rotation * Vec3::X;
                let up = rotation * Vec3::Y;
                let scale = sensitivity.pan * self.distance.target.max(0.01);
                self.pan_offset.target += (right * -horizontal + up * vertical) * scale;
            }
        }
    }

    fn orbit_by(&mut self, horizontal: f32, vertical: f32) {
        let sensitivity = self.settings.sensitivity.orbit;
        self.yaw.target += horizontal * sensitivity;
        self.pitch.target = clamp_pitch(
            self.pitch.target + vertical * sensitivity,
            self.settings.max_pitch,
        );
    }

    /// Re-anchor the orbit on a resolved focus point.
    ///
    /// On a hit the camera holds its position and turns to face the point, so distance and
    /// angles are re-derived from the live position. A miss does the same when a fixed fallback
    /// distance is configured. Otherwise the fallback is the current focus and only the pivot
    /// moves.
    fn refocus(&mut self, focus: FocusResult) {
        self.release_hold();
        self.anchor.current += self.pan_offset.current;
        self.anchor.velocity += self.pan_offset.velocity;
        self.pan_offset = SmoothDamp::at_rest(Vec3::ZERO);
        self.anchor.target = focus.point;

        if !focus.hit && self.settings.fallback_distance.is_none() {
            return;
        }
        let position = self.transform.translation;
        let Some(orbit) = cartesian_to_spherical(position - focus.point, self.settings.up) else {
            return;
        };
        self.yaw.target = self.yaw.current + shortest_angle(self.yaw.current, orbit.yaw);
        self.pitch.target = clamp_pitch(orbit.pitch, self.settings.max_pitch);
        self.distance.target = self.settings.limits.clamp(orbit.distance);
        self.held_position = Some(position);
        debug!(
            "Re-anchored on {} at distance {:.3}",
            focus.point, self.distance.target
        );
    }

    /// Re-derive the orbit from the held camera position and the gliding focus point. Once the
    /// focus point arrives, the orbit comes to rest on its targets.
    fn follow_held(&mut self, held: Vec3) {
        let epsilon = self.settings.settle_epsilon;
        if self.anchor.is_settled(epsilon) && self.pan_offset.is_settled(epsilon) {
            self.held_position = None;
            self.yaw = SmoothDamp::at_rest(wrap_angle(self.yaw.target));
            self.pitch = SmoothDamp::at_rest(self.pitch.target);
            self.distance = SmoothDamp::at_rest(self.distance.target);
            return;
        }
        let Some(orbit) = cartesian_to_spherical(held - self.focus_point(), self.settings.up) else {
            return;
        };
        self.yaw.current += shortest_angle(self.yaw.current, orbit.yaw);
        self.yaw.velocity = 0.0;
        self.pitch.current = orbit.pitch;
        self.pitch.velocity = 0.0;
        self.distance.current = orbit.distance;
        self.distance.velocity = 0.0;
    }

    /// Stop holding the camera in place. The orbit glides on from wherever the hold left it.
    fn release_hold(&mut self) {
        self.held_position = None;
    }

    fn compose(&self) -> Transform {
        let orbit = Spherical {
            yaw: self.yaw.current,
            pitch: clamp_pitch(self.pitch.current, self.settings.max_pitch),
            distance: self.settings.limits.clamp(self.distance.current),
        };
        orbit_transform(self.focus_point(), orbit, self.settings.up)
    }
}
