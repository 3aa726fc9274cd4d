//! Input Capture
//!
//! Key and pointer events arrive asynchronously and mutate a [`HeldKeys`]
//! set. Each tick reads that set exactly once into an [`InputSnapshot`],
//! so the simulation never observes a half-updated key state.

use serde::{Deserialize, Serialize};

/// Logical game actions a key or on-screen button can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move left
    Left,
    /// Move right
    Right,
    /// Jump
    Jump,
}

impl Action {
    /// Map a browser `KeyboardEvent.key` value to an action.
    ///
    /// Arrow keys, WASD-style letters and space are recognised;
    /// anything else returns `None`.
    pub fn from_key(key: &str) -> Option<Action> {
        match key {
            "ArrowLeft" | "a" => Some(Action::Left),
            "ArrowRight" | "d" => Some(Action::Right),
            " " | "ArrowUp" | "w" => Some(Action::Jump),
            _ => None,
        }
    }
}

/// Input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Jump held
    pub jump: bool,
}

impl InputSnapshot {
    /// No keys held.
    pub const IDLE: Self = Self { left: false, right: false, jump: false };

    /// Only left held.
    pub const fn left() -> Self {
        Self { left: true, right: false, jump: false }
    }

    /// Only right held.
    pub const fn right() -> Self {
        Self { left: false, right: true, jump: false }
    }

    /// Only jump held.
    pub const fn jump() -> Self {
        Self { left: false, right: false, jump: true }
    }

    /// Builder: add jump to this snapshot.
    pub const fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Horizontal direction: -1, 0 or +1.
    ///
    /// Right is evaluated after left, so it wins when both are held.
    #[inline]
    pub fn horizontal(&self) -> f64 {
        let mut dir = 0.0;
        if self.left {
            dir = -1.0;
        }
        if self.right {
            dir = 1.0;
        }
        dir
    }
}

/// Set of currently held actions, mutated by input callbacks.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    left: bool,
    right: bool,
    jump: bool,
}

impl HeldKeys {
    /// Create with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action as held (pointer down).
    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    /// Mark an action as released (pointer up/cancel/leave).
    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    /// Handle a key-down event. Returns the action it mapped to, if any.
    pub fn key_down(&mut self, key: &str) -> Option<Action> {
        let action = Action::from_key(key)?;
        self.press(action);
        Some(action)
    }

    /// Handle a key-up event. Returns the action it mapped to, if any.
    pub fn key_up(&mut self, key: &str) -> Option<Action> {
        let action = Action::from_key(key)?;
        self.release(action);
        Some(action)
    }

    /// Capture the held set for the next tick.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }

    fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Jump => self.jump = held,
        }
    }
}
