//! Translating key presses into viewer actions.

use std::collections::HashMap;

use anim3d_core::{CameraMovement, MotionRequest};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::options::KeyBinding;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Quit,
    Camera(CameraMovement),
    Motion(MotionRequest),
}

/// Lookup from key to the motion request it queues.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    motions: HashMap<char, MotionRequest>,
}

impl KeyBindings {
    pub fn new(bindings: &[KeyBinding]) -> Self {
        let motions = bindings
            .iter()
            .map(|b| (b.key.to_ascii_lowercase(), b.motion.to_request()))
            .collect();
        Self { motions }
    }

    /// The motion bound to `key`, ignoring case.
    pub fn lookup(&self, key: char) -> Option<&MotionRequest> {
        self.motions.get(&key.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    /// Map a key event to an action.
    ///
    /// Only the press edge counts; repeats and releases are ignored so a held
    /// key queues its motion once.
    pub fn action_for(&self, event: &KeyEvent) -> Option<InputAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        match event.code {
            KeyCode::Esc => Some(InputAction::Quit),
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputAction::Quit)
            }
            KeyCode::Up => Some(InputAction::Camera(CameraMovement::Forward)),
            KeyCode::Down => Some(InputAction::Camera(CameraMovement::Backward)),
            KeyCode::Left => Some(InputAction::Camera(CameraMovement::Left)),
            KeyCode::Right => Some(InputAction::Camera(CameraMovement::Right)),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => Some(InputAction::Quit),
                'w' => Some(InputAction::Camera(CameraMovement::Forward)),
                's' => Some(InputAction::Camera(CameraMovement::Backward)),
                'a' => Some(InputAction::Camera(CameraMovement::Left)),
                'd' => Some(InputAction::Camera(CameraMovement::Right)),
                other => self.lookup(other).cloned().map(InputAction::Motion),
            },
            _ => None,
        }
    }
}
