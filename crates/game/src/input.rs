//! Player input handling.
//!
//! This module turns raw key states into the per-tick input the movement
//! motor consumes.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slidemove_physics::movement::{InputSource, TickInput};

/// Raw player input for a single frame.
///
/// Key states only; edge detection happens in [`ScriptedInput`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Action buttons pressed.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
}

impl PlayerInput {
    /// Input with only the given movement keys held.
    pub fn moving(forward: bool, backward: bool, left: bool, right: bool) -> Self {
        Self {
            movement: MovementInput {
                forward,
                backward,
                left,
                right,
            },
            ..Default::default()
        }
    }

    /// Wish direction (x = right, y = forward) with diagonals normalized.
    pub fn wish(&self) -> Vec2 {
        let mut wish = Vec2::ZERO;

        if self.movement.forward {
            wish.y += 1.0;
        }
        if self.movement.backward {
            wish.y -= 1.0;
        }
        if self.movement.right {
            wish.x += 1.0;
        }
        if self.movement.left {
            wish.x -= 1.0;
        }

        // Normalize diagonal movement
        let magnitude = wish.length();
        if magnitude > 1.0 {
            wish /= magnitude;
        }
        wish
    }

    /// Convert to tick input. `jump_was_down` is the jump key state of the
    /// previous frame; jumping only triggers on the press edge.
    pub fn to_tick_input(&self, jump_was_down: bool) -> TickInput {
        TickInput {
            wish: self.wish(),
            jump_pressed: self.actions.jump && !jump_was_down,
            crouch_held: self.actions.crouch,
        }
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }
}

/// Input source fed from a queue of frames.
///
/// Each poll consumes one frame. Once the queue runs dry the last frame is
/// held, like a keyboard that nobody touches.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<PlayerInput>,
    current: PlayerInput,
    jump_was_down: bool,
}

impl ScriptedInput {
    /// Source that never presses anything.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Source that replays `frames` in order.
    pub fn new(frames: impl IntoIterator<Item = PlayerInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Queue `count` copies of a frame.
    pub fn push_repeated(&mut self, frame: PlayerInput, count: usize) {
        self.frames.extend(std::iter::repeat(frame).take(count));
    }

    /// Queue one frame.
    pub fn push(&mut self, frame: PlayerInput) {
        self.frames.push_back(frame);
    }

    /// Frames still queued.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        if let Some(frame) = self.frames.pop_front() {
            self.current = frame;
        }

        let input = self.current.to_tick_input(self.jump_was_down);
        self.jump_was_down = self.current.actions.jump;
        input
    }
}
