//! Crouch/stand state machine gated by headroom.
//!
//! The discrete state decides which hull height collision uses. A separate
//! progress value eases between the two heights for presentation and never
//! feeds back into collision.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionQuery;

use super::state::Body;

/// The two crouch states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CrouchState {
    #[default]
    Standing,
    Crouching,
}

/// Crouch state plus the eased height blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrouchController {
    state: CrouchState,
    /// 0 = fully crouched, 1 = fully standing.
    progress: f32,
}

impl Default for CrouchController {
    fn default() -> Self {
        Self {
            state: CrouchState::Standing,
            progress: 1.0,
        }
    }
}

impl CrouchController {
    /// Create a controller already settled in the given state.
    pub fn new(state: CrouchState) -> Self {
        let progress = match state {
            CrouchState::Standing => 1.0,
            CrouchState::Crouching => 0.0,
        };
        Self { state, progress }
    }

    /// Apply this tick's crouch input.
    ///
    /// Crouching always succeeds. Standing up only happens when
    /// `has_headroom` reports the standing hull is clear; it is not called
    /// otherwise.
    pub fn update(&mut self, crouch_held: bool, has_headroom: impl FnOnce() -> bool) -> CrouchState {
        match (self.state, crouch_held) {
            (CrouchState::Standing, true) => {
                self.state = CrouchState::Crouching;
                log::debug!("crouch: standing -> crouching");
            }
            (CrouchState::Crouching, false) => {
                if has_headroom() {
                    self.state = CrouchState::Standing;
                    log::debug!("crouch: crouching -> standing");
                }
            }
            _ => {}
        }
        self.state
    }

    /// Move `progress` toward the current state's target at `rate` per second.
    pub fn ease(&mut self, rate: f32, delta_time: f32) {
        let direction = match self.state {
            CrouchState::Standing => 1.0,
            CrouchState::Crouching => -1.0,
        };
        self.progress = (self.progress + direction * rate * delta_time).clamp(0.0, 1.0);
    }

    pub fn is_crouching(&self) -> bool {
        self.state == CrouchState::Crouching
    }

    /// Eased blend, 0 = crouched and 1 = standing.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Hull height collision should use right now.
    pub fn collider_height(&self, body: &Body) -> f32 {
        match self.state {
            CrouchState::Standing => body.standing_height,
            CrouchState::Crouching => body.crouching_height,
        }
    }

    /// Height blended by `progress`, for cameras and animation.
    pub fn blended_height(&self, body: &Body) -> f32 {
        body.blended_height(self.progress)
    }
}

/// Whether a standing hull at the body's position overlaps nothing.
pub fn has_standing_headroom(query: &CollisionQuery<'_>, body: &Body) -> bool {
    let hull = body.hull(body.standing_height);
    !query.overlaps(hull.center(body.position), hull.half_extents)
}
