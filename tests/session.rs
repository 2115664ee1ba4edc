//! Drives camera sessions with scripted input, the way a host would.

use std::time::Duration;

use bevy_glide_cam::prelude::*;
use bevy_math::prelude::*;
use bevy_transform::prelude::*;

const ALT: Modifiers = Modifiers::new(true, false, false);
const ALT_CTRL: Modifiers = Modifiers::new(true, true, false);
const ALT_CTRL_SHIFT: Modifiers = Modifiers::new(true, true, true);
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Default)]
struct RecordingView {
    views: Vec<Transform>,
    bound: Vec<Transform>,
}

impl ViewTarget for RecordingView {
    fn set_view_transform(&mut self, transform: &Transform) {
        self.views.push(*transform);
    }

    fn set_bound_camera_transform(&mut self, transform: &Transform) {
        self.bound.push(*transform);
    }
}

fn start_view() -> Transform {
    Transform::from_xyz(0.0, 2.0, 10.0).looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
}

fn new_session(settings: GlideCamSettings) -> CameraSession {
    CameraSession::new(settings, &start_view(), 10.0).unwrap()
}

fn miss(_: Vec2) -> Option<Vec3> {
    None
}

fn press(session: &mut CameraSession, modifiers: Modifiers, scene: &mut impl SceneQuery) {
    session.handle_event(CameraInput::Modifiers(modifiers), scene);
    session.handle_event(
        CameraInput::Press {
            position: Vec2::new(400.0, 300.0),
        },
        scene,
    );
}

fn move_to(session: &mut CameraSession, x: f32, y: f32) -> Action {
    session.handle_event(
        CameraInput::Move {
            position: Vec2::new(x, y),
        },
        &mut miss,
    )
}

fn settle(session: &mut CameraSession, view: &mut RecordingView) -> usize {
    for frame in 0..10_000 {
        if session.is_settled() {
            return frame;
        }
        session.tick(FRAME, view);
    }
    panic!("camera never settled");
}

#[test]
fn click_focuses_on_hit() {
    let mut session = new_session(GlideCamSettings::default());
    let old_position = session.position();
    let hit = Vec3::new(1.0, 0.0, -2.0);
    let mut modes = vec![session.mode()];

    press(&mut session, ALT, &mut |_: Vec2| Some(hit));
    modes.push(session.mode());
    let action = session.handle_event(
        CameraInput::Release {
            position: Vec2::new(401.0, 300.0),
        },
        &mut miss,
    );
    modes.push(session.mode());

    assert_eq!(
        action,
        Action::FocusClick {
            position: Vec2::new(400.0, 300.0)
        }
    );
    assert_eq!(
        modes,
        vec![CameraMode::Idle, CameraMode::FocusPending, CameraMode::Idle]
    );
    assert!((session.target_focus_point() - hit).length() < 1e-5);
    assert!((session.target_distance() - old_position.distance(hit)).abs() < 1e-4);

    // The camera stays where it was and turns to face the hit.
    let mut view = RecordingView::default();
    settle(&mut session, &mut view);
    assert!(session.position().distance(old_position) < 1e-2);
    let facing = (hit - old_position).normalize();
    assert!(session.forward().as_vec3().dot(facing) > 0.9999);
    assert!(!view.views.is_empty());
}

#[test]
fn click_distance_is_clamped() {
    let settings = GlideCamSettings {
        limits: DistanceLimits { min: 0.5, max: 4.0 },
        ..Default::default()
    };
    let mut session = CameraSession::new(settings, &start_view(), 3.0).unwrap();
    press(&mut session, ALT, &mut |_: Vec2| Some(Vec3::new(0.0, 2.0, -50.0)));
    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(400.0, 300.0),
        },
        &mut miss,
    );
    assert_eq!(session.target_distance(), 4.0);
}

#[test]
fn plain_drag_orbits_and_zooms() {
    let mut session = new_session(GlideCamSettings::default());
    let focus = session.focus_point();
    press(&mut session, ALT, &mut |_: Vec2| Some(focus));

    let action = move_to(&mut session, 450.0, 300.0);
    assert!(matches!(
        action,
        Action::DragStarted {
            mode: DragMode::OrbitZoom,
            ..
        }
    ));
    assert_eq!(session.mode(), CameraMode::OrbitZoom);

    let mut view = RecordingView::default();
    let mut last_yaw = session.target_yaw();
    session.tick(Duration::ZERO, &mut view);
    assert!(session.target_yaw() > last_yaw);
    for step in 1..=10 {
        last_yaw = session.target_yaw();
        move_to(&mut session, 450.0 + step as f32 * 5.0, 300.0);
        session.tick(FRAME, &mut view);
        assert!(session.target_yaw() > last_yaw);
    }

    let distance = session.target_distance();
    move_to(&mut session, 500.0, 250.0);
    session.tick(FRAME, &mut view);
    assert!(session.target_distance() < distance);

    let distance = session.target_distance();
    move_to(&mut session, 500.0, 320.0);
    session.tick(FRAME, &mut view);
    assert!(session.target_distance() > distance);
}

#[test]
fn secondary_modifier_orbits_without_zoom() {
    let mut session = new_session(GlideCamSettings::default());
    let distance = session.target_distance();
    press(&mut session, ALT_CTRL, &mut miss);

    move_to(&mut session, 400.0, 200.0);
    assert_eq!(session.mode(), CameraMode::OrbitOnly);

    let mut view = RecordingView::default();
    let pitch = session.target_pitch();
    session.tick(FRAME, &mut view);
    assert!(session.target_pitch() != pitch);
    for y in [100.0, 600.0, -400.0, 900.0] {
        move_to(&mut session, 420.0, y);
        session.tick(FRAME, &mut view);
        assert_eq!(session.target_distance(), distance);
    }
}

#[test]
fn pan_moves_focus_and_camera_together() {
    let mut session = new_session(GlideCamSettings::default());
    press(&mut session, ALT_CTRL_SHIFT, &mut miss);
    move_to(&mut session, 410.0, 300.0);
    assert_eq!(session.mode(), CameraMode::Pan);

    let mut view = RecordingView::default();
    session.tick(FRAME, &mut view);
    let focus = session.target_focus_point();
    let pan = session.target_pan_offset();
    let look = session.target_focus_point() - session.target_position();

    move_to(&mut session, 480.0, 260.0);
    session.tick(FRAME, &mut view);
    move_to(&mut session, 300.0, 330.0);
    session.tick(FRAME, &mut view);

    let focus_moved = session.target_focus_point() - focus;
    let pan_moved = session.target_pan_offset() - pan;
    assert!(focus_moved.length() > 1e-3);
    assert!((focus_moved - pan_moved).length() < 1e-5);

    let new_look = session.target_focus_point() - session.target_position();
    assert!((new_look - look).length() < 1e-4);

    settle_after_release(&mut session, &mut view);
    let settled_look = session.focus_point() - session.position();
    assert!((settled_look - look).length() < 1e-3);
}

#[test]
fn miss_falls_back_along_view() {
    let mut session = new_session(GlideCamSettings::default());
    let position = session.position();
    let forward = session.forward();
    let distance = session.distance();

    press(&mut session, ALT, &mut miss);
    assert_eq!(session.mode(), CameraMode::FocusPending);

    let focus = session.pending_focus().unwrap();
    assert!(!focus.hit);
    let offset = focus.point - position;
    assert!((offset.length() - distance).abs() < 1e-4);
    assert!(offset.normalize().dot(forward.as_vec3()) > 0.9999);

    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(400.0, 300.0),
        },
        &mut miss,
    );
    assert!((session.target_focus_point() - focus.point).length() < 1e-5);
    assert_eq!(session.target_distance(), distance);
}

#[test]
fn cancelled_press_discards_focus() {
    let mut session = new_session(GlideCamSettings::default());
    let focus = session.target_focus_point();
    press(&mut session, ALT, &mut |_: Vec2| Some(Vec3::new(5.0, 0.0, 0.0)));

    let action = session.handle_event(CameraInput::Modifiers(Modifiers::NONE), &mut miss);
    assert_eq!(action, Action::Cancelled);
    assert_eq!(session.mode(), CameraMode::Idle);
    assert!(session.pending_focus().is_none());
    assert_eq!(session.target_focus_point(), focus);
    assert!(session.is_finished());
}

#[test]
fn settles_and_stops_changing() {
    let settings = GlideCamSettings {
        lock_camera_to_view: true,
        ..Default::default()
    };
    let mut session = new_session(settings);
    press(&mut session, ALT, &mut miss);
    move_to(&mut session, 480.0, 250.0);

    let mut view = RecordingView::default();
    session.tick(FRAME, &mut view);
    assert!(!session.is_settled());

    settle_after_release(&mut session, &mut view);
    assert!(session.is_settled());
    assert!(session.is_finished());
    assert_eq!(view.views, view.bound);

    let transform = session.transform();
    let writes = view.views.len();
    for _ in 0..10 {
        assert_eq!(session.tick(FRAME, &mut view), transform);
    }
    assert_eq!(view.views.len(), writes);
    assert!(session.yaw() >= 0.0 && session.yaw() < std::f32::consts::TAU);
}

#[test]
fn release_keeps_gliding() {
    let mut session = new_session(GlideCamSettings::default());
    press(&mut session, ALT_CTRL, &mut miss);
    move_to(&mut session, 600.0, 300.0);

    let mut view = RecordingView::default();
    session.tick(FRAME, &mut view);
    let action = session.handle_event(
        CameraInput::Release {
            position: Vec2::new(600.0, 300.0),
        },
        &mut miss,
    );
    assert_eq!(
        action,
        Action::DragEnded {
            mode: DragMode::OrbitOnly
        }
    );
    assert_eq!(session.mode(), CameraMode::Idle);

    let yaw = session.yaw();
    session.tick(FRAME, &mut view);
    assert!(session.yaw() > yaw);
}

#[test]
fn repress_while_gliding_does_not_jump() {
    let mut session = new_session(GlideCamSettings::default());
    press(&mut session, ALT_CTRL_SHIFT, &mut miss);
    move_to(&mut session, 600.0, 200.0);

    let mut view = RecordingView::default();
    session.tick(FRAME, &mut view);
    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(600.0, 200.0),
        },
        &mut miss,
    );
    session.tick(FRAME, &mut view);
    assert!(!session.is_settled());

    let position = session.position();
    let hit = Vec3::new(-3.0, 0.0, 0.0);
    session.handle_event(
        CameraInput::Press {
            position: Vec2::new(400.0, 300.0),
        },
        &mut |_: Vec2| Some(hit),
    );
    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(400.0, 300.0),
        },
        &mut miss,
    );
    session.tick(Duration::ZERO, &mut view);

    assert!(session.position().distance(position) < 1e-4);
    assert!((session.target_focus_point() - hit).length() < 1e-5);
    assert_eq!(session.target_pan_offset(), Vec3::ZERO);
}

fn settle_after_release(session: &mut CameraSession, view: &mut RecordingView) {
    let position = Vec2::new(0.0, 0.0);
    session.handle_event(CameraInput::Release { position }, &mut miss);
    session.handle_event(CameraInput::Modifiers(Modifiers::NONE), &mut miss);
    settle(session, view);
}

#[test]
fn focus_glide_holds_camera_in_place() {
    let mut session = new_session(GlideCamSettings::default());
    let start = session.position();
    let hit = Vec3::new(8.0, 0.0, 9.0);
    press(&mut session, ALT, &mut |_: Vec2| Some(hit));
    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(400.0, 300.0),
        },
        &mut miss,
    );
    assert!(session.target_position().distance(start) < 1e-3);

    let mut view = RecordingView::default();
    for _ in 0..200 {
        session.tick(FRAME, &mut view);
        assert!(session.position().distance(start) < 1e-3);
        let facing = (session.focus_point() - session.position()).normalize();
        assert!(session.forward().as_vec3().dot(facing) > 0.9999);
    }

    assert!(session.is_settled());
    assert!((session.focus_point() - hit).length() < 1e-3);
    assert!((session.distance() - start.distance(hit)).abs() < 1e-3);
    assert!(view.views.iter().all(|t| t.translation.distance(start) < 1e-3));
}

#[test]
fn dragging_releases_focus_hold() {
    let mut session = new_session(GlideCamSettings::default());
    let start = session.position();
    press(&mut session, ALT_CTRL, &mut |_: Vec2| Some(Vec3::new(8.0, 0.0, 9.0)));
    move_to(&mut session, 600.0, 300.0);

    let mut view = RecordingView::default();
    settle_after_release(&mut session, &mut view);
    assert!(session.position().distance(start) > 0.1);
}

#[test]
fn fixed_fallback_distance_moves_focus_along_view() {
    let settings = GlideCamSettings {
        fallback_distance: Some(4.0),
        ..Default::default()
    };
    let mut session = new_session(settings);
    let start = session.position();
    let forward = session.forward();

    press(&mut session, ALT, &mut miss);
    let focus = session.pending_focus().unwrap();
    assert!(!focus.hit);
    assert!((focus.point - (start + forward * 4.0)).length() < 1e-4);

    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(400.0, 300.0),
        },
        &mut miss,
    );
    assert!((session.target_distance() - 4.0).abs() < 1e-4);

    let mut view = RecordingView::default();
    settle(&mut session, &mut view);
    assert!(session.position().distance(start) < 1e-3);
    assert!((session.focus_point() - focus.point).length() < 1e-3);
    assert!((session.distance() - 4.0).abs() < 1e-3);
}

#[test]
fn inversion_flips_orbit_but_not_zoom() {
    fn drag(settings: GlideCamSettings) -> (f32, f32, f32) {
        let mut session = new_session(settings);
        press(&mut session, ALT, &mut miss);
        move_to(&mut session, 460.0, 260.0);
        session.tick(Duration::ZERO, &mut RecordingView::default());
        (
            session.target_yaw(),
            session.target_pitch(),
            session.target_distance(),
        )
    }

    let idle = new_session(GlideCamSettings::default());
    let (yaw, pitch) = (idle.target_yaw(), idle.target_pitch());
    let (plain_yaw, plain_pitch, plain_distance) = drag(GlideCamSettings::default());
    let (inverted_yaw, inverted_pitch, inverted_distance) = drag(GlideCamSettings {
        invert_horizontal: true,
        invert_vertical: true,
        ..Default::default()
    });

    assert!((plain_yaw - yaw).abs() > 0.1);
    assert!(((plain_yaw - yaw) + (inverted_yaw - yaw)).abs() < 1e-5);
    assert!((plain_pitch - pitch).abs() > 0.1);
    assert!(((plain_pitch - pitch) + (inverted_pitch - pitch)).abs() < 1e-5);
    assert!(plain_distance < idle.target_distance());
    assert_eq!(plain_distance, inverted_distance);
}

#[test]
fn mode_switch_applies_motion_under_old_mode() {
    let mut session = new_session(GlideCamSettings::default());
    let distance = session.target_distance();
    press(&mut session, ALT, &mut miss);
    move_to(&mut session, 400.0, 360.0);

    let action = session.handle_event(CameraInput::Modifiers(ALT_CTRL), &mut miss);
    assert_eq!(
        action,
        Action::ModeSwitched {
            from: DragMode::OrbitZoom,
            to: DragMode::OrbitOnly
        }
    );
    assert_eq!(session.mode(), CameraMode::OrbitOnly);

    let mut view = RecordingView::default();
    session.tick(FRAME, &mut view);
    let zoomed = session.target_distance();
    assert!(zoomed > distance);

    move_to(&mut session, 400.0, 420.0);
    session.tick(FRAME, &mut view);
    assert_eq!(session.target_distance(), zoomed);
}

#[test]
fn z_up_orbits_and_pans_about_z() {
    let settings = GlideCamSettings {
        up: Dir3::Z,
        ..Default::default()
    };
    let start = Transform::from_xyz(0.0, -10.0, 2.0).looking_at(Vec3::new(0.0, 0.0, 2.0), Vec3::Z);
    let mut session = CameraSession::new(settings, &start, 10.0).unwrap();
    assert!(session.position().distance(start.translation) < 1e-4);
    assert!((session.focus_point() - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);

    // Horizontal orbit circles the focus point at constant height.
    press(&mut session, ALT_CTRL, &mut miss);
    move_to(&mut session, 700.0, 300.0);
    let mut view = RecordingView::default();
    session.tick(Duration::ZERO, &mut view);
    let target = session.target_position();
    assert!((target.z - 2.0).abs() < 1e-4);
    assert!((target.distance(session.target_focus_point()) - 10.0).abs() < 1e-3);
    assert!(target.distance(start.translation) > 1.0);
    session.handle_event(
        CameraInput::Release {
            position: Vec2::new(700.0, 300.0),
        },
        &mut miss,
    );

    // Vertical pan follows the up axis, horizontal pan stays level.
    press(&mut session, ALT_CTRL_SHIFT, &mut miss);
    move_to(&mut session, 400.0, 360.0);
    session.tick(Duration::ZERO, &mut view);
    let raised = session.target_pan_offset();
    assert!(raised.z > 0.5);
    assert!(raised.truncate().length() < 1e-4);

    move_to(&mut session, 500.0, 360.0);
    session.tick(Duration::ZERO, &mut view);
    let sideways = session.target_pan_offset() - raised;
    assert!(sideways.length() > 0.5);
    assert!(sideways.z.abs() < 1e-4);

    settle_after_release(&mut session, &mut view);
    assert!(view.views.iter().all(|t| t.is_finite()));
    let up = session.transform().up().as_vec3();
    assert!(up.dot(Vec3::Z) > 0.99);
}
