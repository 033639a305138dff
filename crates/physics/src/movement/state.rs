//! Body, per-tick movement state and the published snapshot.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::Hull;

use super::config::ConfigError;
use super::crouch::CrouchController;

/// The moving body.
///
/// Only the motor writes to a body. Everything else reads it through a
/// [`MotorSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Position in world space (bottom-center of the hull).
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Half-width of the hull on the X and Z axes (meters).
    pub horizontal_radius: f32,

    /// Hull height while standing (meters).
    pub standing_height: f32,

    /// Hull height while crouching (meters).
    pub crouching_height: f32,

    /// Distance from the top of the hull down to eye level (meters).
    pub forehead_margin: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            horizontal_radius: 0.5,
            standing_height: 2.0,
            crouching_height: 1.2,
            forehead_margin: 0.2,
        }
    }
}

impl Body {
    /// Create a body with default dimensions at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Check the dimensions describe a usable hull.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("horizontal_radius", self.horizontal_radius),
            ("standing_height", self.standing_height),
            ("crouching_height", self.crouching_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.forehead_margin.is_finite() && self.forehead_margin >= 0.0) {
            return Err(ConfigError::Negative {
                field: "forehead_margin",
                value: self.forehead_margin,
            });
        }
        if self.crouching_height > self.standing_height {
            return Err(ConfigError::CrouchTallerThanStanding {
                crouching: self.crouching_height,
                standing: self.standing_height,
            });
        }
        Ok(())
    }

    /// Collision hull for the given height.
    pub fn hull(&self, height: f32) -> Hull {
        Hull::new(self.horizontal_radius, height)
    }

    /// Height blended between crouching (`progress = 0`) and standing (`1`).
    pub fn blended_height(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        self.crouching_height + (self.standing_height - self.crouching_height) * t
    }
}

/// Movement modes.
///
/// Only [`MovementMode::Standard`] moves the body; the others are reserved
/// and reported as unimplemented when ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Standard,
    Interacting,
    Climbing,
    Noclip,
}

/// Mutable per-tick movement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Body is resting on walkable ground.
    pub is_grounded: bool,

    /// Crouch state and eased height blend.
    pub crouch: CrouchController,

    /// Active movement mode.
    pub mode: MovementMode,

    /// Movement is processed only while enabled.
    pub enabled: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: false,
            crouch: CrouchController::default(),
            mode: MovementMode::Standard,
            enabled: true,
        }
    }
}

/// Read-only copy of the motor's state, written once at the end of a tick.
///
/// Presentation code (cameras, animation, HUD) reads this between ticks and
/// never touches the live body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSnapshot {
    /// Tick counter at which the snapshot was taken.
    pub tick: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Height of the hull used for collision.
    pub collider_height: f32,
    /// Eased height for presentation.
    pub blended_height: f32,
    /// Eye height above the feet.
    pub eye_height: f32,
    pub is_crouching: bool,
    pub crouch_progress: f32,
    pub is_grounded: bool,
    pub mode: MovementMode,
}

impl MotorSnapshot {
    /// Eye position in world space.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.eye_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_body_is_valid() {
        assert!(Body::default().validate().is_ok());
    }

    #[test]
    fn test_crouch_taller_than_standing_rejected() {
        let body = Body {
            crouching_height: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            body.validate(),
            Err(ConfigError::CrouchTallerThanStanding { .. })
        ));
    }

    #[test]
    fn test_blended_height() {
        let body = Body::default();
        assert!((body.blended_height(0.0) - 1.2).abs() < 1e-6);
        assert!((body.blended_height(1.0) - 2.0).abs() < 1e-6);
        assert!((body.blended_height(0.5) - 1.6).abs() < 1e-6);
        assert!((body.blended_height(7.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_eye_position() {
        let snapshot = MotorSnapshot {
            tick: 3,
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::ZERO,
            collider_height: 2.0,
            blended_height: 2.0,
            eye_height: 1.8,
            is_crouching: false,
            crouch_progress: 1.0,
            is_grounded: true,
            mode: MovementMode::Standard,
        };
        assert!(snapshot.eye_position().abs_diff_eq(Vec3::new(1.0, 3.8, 3.0), 1e-5));
    }
}
