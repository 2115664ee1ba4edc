//! Classifies modifier keys and pointer events into camera modes.
//!
//! A press with the primary modifier held latches the pointer and waits. If the pointer then
//! travels past the drag threshold, the gesture becomes a drag whose kind is read from the
//! modifiers held at that moment, and may change while the button stays down. If the button is
//! released first, the gesture was a focus click.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// Which of the three bindable modifier keys are held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct Modifiers {
    /// Gates every camera gesture. Alt by default.
    pub primary: bool,
    /// Holds the distance fixed while orbiting. Ctrl by default.
    pub secondary: bool,
    /// Together with `secondary`, pans instead of orbiting. Shift by default.
    pub tertiary: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
        tertiary: false,
    };

    /// Construct from individual flags.
    pub const fn new(primary: bool, secondary: bool, tertiary: bool) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    /// Is any modifier held?
    pub fn any(self) -> bool {
        self.primary || self.secondary || self.tertiary
    }
}

/// The kind of motion a drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DragMode {
    /// Horizontal motion orbits, vertical motion tilts and zooms.
    OrbitZoom,
    /// Orbit at a fixed distance.
    OrbitOnly,
    /// Translate the camera and its focus point together.
    Pan,
}

impl DragMode {
    /// The drag produced by a modifier combination, or `None` if the combination does not
    /// qualify for camera control.
    pub fn from_modifiers(modifiers: Modifiers) -> Option<Self> {
        match (modifiers.primary, modifiers.secondary, modifiers.tertiary) {
            (false, _, _) => None,
            (true, false, _) => Some(DragMode::OrbitZoom),
            (true, true, false) => Some(DragMode::OrbitOnly),
            (true, true, true) => Some(DragMode::Pan),
        }
    }
}

/// The operating mode of a camera session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum CameraMode {
    /// No gesture in progress. Motion may still be settling.
    #[default]
    Idle,
    /// The button was pressed, and it is not yet known whether this is a click or a drag.
    FocusPending,
    /// Dragging with [`DragMode::OrbitZoom`].
    OrbitZoom,
    /// Dragging with [`DragMode::OrbitOnly`].
    OrbitOnly,
    /// Dragging with [`DragMode::Pan`].
    Pan,
}

impl CameraMode {
    /// The drag in progress, if any.
    pub fn drag_mode(self) -> Option<DragMode> {
        match self {
            CameraMode::Idle | CameraMode::FocusPending => None,
            CameraMode::OrbitZoom => Some(DragMode::OrbitZoom),
            CameraMode::OrbitOnly => Some(DragMode::OrbitOnly),
            CameraMode::Pan => Some(DragMode::Pan),
        }
    }

    /// Is a drag in progress?
    pub fn is_dragging(self) -> bool {
        self.drag_mode().is_some()
    }

    /// A hint for the host's status bar describing what the gesture will do.
    pub fn status_text(self) -> Option<&'static str> {
        match self {
            CameraMode::Idle => None,
            CameraMode::FocusPending => {
                Some("Release to focus | Drag to orbit and zoom | Hold Ctrl to orbit only | Hold Ctrl+Shift to pan")
            }
            CameraMode::OrbitZoom => {
                Some("Orbit and zoom | Hold Ctrl to orbit only | Hold Ctrl+Shift to pan")
            }
            CameraMode::OrbitOnly => {
                Some("Orbit at fixed distance | Release Ctrl to zoom | Hold Shift to pan")
            }
            CameraMode::Pan => {
                Some("Pan | Release Shift to orbit | Release Ctrl+Shift to orbit and zoom")
            }
        }
    }
}

impl From<DragMode> for CameraMode {
    fn from(mode: DragMode) -> Self {
        match mode {
            DragMode::OrbitZoom => CameraMode::OrbitZoom,
            DragMode::OrbitOnly => CameraMode::OrbitOnly,
            DragMode::Pan => CameraMode::Pan,
        }
    }
}

/// An input event from the host. Screen positions are in logical pixels, origin at the top
/// left, with y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum CameraInput {
    /// The set of held modifiers changed.
    Modifiers(Modifiers),
    /// The camera button was pressed.
    Press {
        /// Pointer position.
        position: Vec2,
    },
    /// The pointer moved.
    Move {
        /// Pointer position.
        position: Vec2,
    },
    /// The camera button was released.
    Release {
        /// Pointer position.
        position: Vec2,
    },
}

/// What an input event did to the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum Action {
    /// Nothing to do.
    None,
    /// A qualifying press was latched at `position`. The focus under it should be resolved.
    FocusPending {
        /// Where the press happened.
        position: Vec2,
    },
    /// The pointer crossed the drag threshold.
    DragStarted {
        /// The drag kind selected by the modifiers held at the crossing.
        mode: DragMode,
        /// Pointer motion since the press.
        delta: Vec2,
    },
    /// The pointer moved during a drag.
    Dragged {
        /// The current drag kind.
        mode: DragMode,
        /// Pointer motion since the last sample.
        delta: Vec2,
    },
    /// The modifiers changed mid-drag, switching the drag kind.
    ModeSwitched {
        /// Previous drag kind.
        from: DragMode,
        /// New drag kind.
        to: DragMode,
    },
    /// The button was released before the drag threshold was crossed.
    FocusClick {
        /// Where the press happened.
        position: Vec2,
    },
    /// A drag ended, by releasing the button or the primary modifier.
    DragEnded {
        /// The drag kind that ended.
        mode: DragMode,
    },
    /// A pending press was abandoned because the primary modifier was released.
    Cancelled,
}

/// The finite state machine turning [`CameraInput`]s into [`CameraMode`]s and [`Action`]s.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ModeClassifier {
    mode: CameraMode,
    modifiers: Modifiers,
    press_position: Option<Vec2>,
    last_position: Option<Vec2>,
    drag_threshold: f32,
}

impl ModeClassifier {
    /// A classifier in [`CameraMode::Idle`], with nothing held.
    pub fn new(drag_threshold_pixels: u32) -> Self {
        Self {
            mode: CameraMode::Idle,
            modifiers: Modifiers::NONE,
            press_position: None,
            last_position: None,
            drag_threshold: drag_threshold_pixels as f32,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The modifiers last reported.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Where the current gesture's press happened.
    pub fn press_position(&self) -> Option<Vec2> {
        self.press_position
    }

    /// The last known pointer position.
    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, input: CameraInput) -> Action {
        match input {
            CameraInput::Modifiers(modifiers) => self.modifiers_changed(modifiers),
            CameraInput::Press { position } => self.pressed(position),
            CameraInput::Move { position } => self.moved(position),
            CameraInput::Release { position } => self.released(position),
        }
    }

    fn modifiers_changed(&mut self, modifiers: Modifiers) -> Action {
        self.modifiers = modifiers;
        match self.mode {
            CameraMode::Idle => Action::None,
            CameraMode::FocusPending if !modifiers.primary => {
                self.end_gesture();
                Action::Cancelled
            }
            CameraMode::FocusPending => Action::None,
            CameraMode::OrbitZoom | CameraMode::OrbitOnly | CameraMode::Pan => {
                let Some(from) = self.mode.drag_mode() else {
                    return Action::None;
                };
                match DragMode::from_modifiers(modifiers) {
                    None => {
                        self.end_gesture();
                        Action::DragEnded { mode: from }
                    }
                    Some(to) if to != from => {
                        self.mode = to.into();
                        Action::ModeSwitched { from, to }
                    }
                    Some(_) => Action::None,
                }
            }
        }
    }

    fn pressed(&mut self, position: Vec2) -> Action {
        if self.mode != CameraMode::Idle || !self.modifiers.primary {
            self.last_position = Some(position);
            return Action::None;
        }
        self.mode = CameraMode::FocusPending;
        self.press_position = Some(position);
        self.last_position = Some(position);
        Action::FocusPending { position }
    }

    fn moved(&mut self, position: Vec2) -> Action {
        match self.mode {
            CameraMode::Idle => {
                self.last_position = Some(position);
                Action::None
            }
            CameraMode::FocusPending => {
                let press = self.press_position.unwrap_or(position);
                if position.distance(press) <= self.drag_threshold {
                    return Action::None;
                }
                let Some(mode) = DragMode::from_modifiers(self.modifiers) else {
                    self.end_gesture();
                    return Action::Cancelled;
                };
                self.mode = mode.into();
                self.last_position = Some(position);
                Action::DragStarted {
                    mode,
                    delta: position - press,
                }
            }
            CameraMode::OrbitZoom | CameraMode::OrbitOnly | CameraMode::Pan => {
                let delta = position - self.last_position.unwrap_or(position);
                self.last_position = Some(position);
                match self.mode.drag_mode() {
                    Some(mode) if delta != Vec2::ZERO => Action::Dragged { mode, delta },
                    _ => Action::None,
                }
            }
        }
    }

    fn released(&mut self, position: Vec2) -> Action {
        self.last_position = Some(position);
        match self.mode {
            CameraMode::Idle => Action::None,
            CameraMode::FocusPending => {
                let position = self.press_position.unwrap_or(position);
                self.end_gesture();
                Action::FocusClick { position }
            }
            CameraMode::OrbitZoom | CameraMode::OrbitOnly | CameraMode::Pan => {
                let Some(mode) = self.mode.drag_mode() else {
                    return Action::None;
                };
                self.end_gesture();
                Action::DragEnded { mode }
            }
        }
    }

    fn end_gesture(&mut self) {
        self.mode = CameraMode::Idle;
        self.press_position = None;
    }
}
