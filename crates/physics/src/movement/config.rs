//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. Values are in
//! meters and seconds. Friction and acceleration are linear rates: friction
//! removes `friction * dt` of speed per tick, acceleration adds
//! `acceleration * dt`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::ContentFlags;

/// Errors produced while loading or validating a [`MovementConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read movement config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse movement config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be finite and not negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be at least 1")]
    ZeroBound { field: &'static str },

    #[error("max walkable angle must lie strictly between 0 and 90 degrees, got {0}")]
    WalkableAngle(f32),

    #[error("crouching height {crouching} exceeds standing height {standing}")]
    CrouchTallerThanStanding { crouching: f32, standing: f32 },
}

/// Configuration for character movement physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Walking
    // ========================================================================
    /// Maximum walking speed (m/s).
    pub walking_speed: f32,

    /// Speed removed per second while walking on ground (m/s²).
    pub friction: f32,

    /// Ground acceleration while walking (m/s²).
    pub acceleration: f32,

    // ========================================================================
    // Crouching
    // ========================================================================
    /// Maximum crouching speed (m/s).
    pub crouching_speed: f32,

    /// Ground friction while crouched (m/s²).
    pub crouching_friction: f32,

    /// Ground acceleration while crouched (m/s²).
    pub crouching_acceleration: f32,

    /// How fast the crouch blend moves between 0 and 1 (per second).
    pub crouch_rate: f32,

    // ========================================================================
    // Ground
    // ========================================================================
    /// Vertical velocity added by a jump (m/s).
    pub jump_impulse: f32,

    /// Upward speed above which ground contact is forcibly broken (m/s).
    pub knock_up_threshold: f32,

    /// Tallest ledge the body climbs without jumping (m).
    pub step_height: f32,

    /// Steepest slope still counted as ground (degrees).
    pub max_walkable_angle: f32,

    // ========================================================================
    // Air
    // ========================================================================
    /// Speed cap along the wish direction while airborne (m/s).
    pub air_speed: f32,

    /// Air acceleration (m/s²).
    pub air_acceleration: f32,

    /// Gravity acceleration (m/s²).
    pub gravity: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Geometry the body collides with.
    pub collision_mask: ContentFlags,

    /// Distance kept between the hull and surfaces it is swept into (m).
    pub hit_epsilon: f32,

    /// Length of the downward ground probe (m).
    pub ground_check_distance: f32,

    /// Speed at or below which the resolver treats the body as stopped (m/s).
    pub stop_epsilon: f32,

    /// Maximum sweep iterations per resolve call.
    pub max_bumps: usize,

    /// Maximum simultaneous contact planes per resolve call.
    pub max_planes: usize,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walking_speed: 5.5,
            friction: 50.0,
            acceleration: 120.0,

            crouching_speed: 2.5,
            crouching_friction: 15.0,
            crouching_acceleration: 30.0,
            crouch_rate: 3.0,

            jump_impulse: 6.0,
            knock_up_threshold: 2.0,
            step_height: 0.7,
            max_walkable_angle: 55.0,

            air_speed: 1.0,
            air_acceleration: 40.0,
            gravity: 16.0,

            collision_mask: ContentFlags::MASK_MOVEMENT,
            hit_epsilon: 0.015,
            ground_check_distance: 0.03,
            stop_epsilon: 0.001,
            max_bumps: 8,
            max_planes: 5,
        }
    }
}

impl MovementConfig {
    /// Parse a config from JSON. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every tunable for values the solver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walking_speed", self.walking_speed),
            ("acceleration", self.acceleration),
            ("crouching_speed", self.crouching_speed),
            ("crouching_acceleration", self.crouching_acceleration),
            ("crouch_rate", self.crouch_rate),
            ("knock_up_threshold", self.knock_up_threshold),
            ("air_acceleration", self.air_acceleration),
            ("hit_epsilon", self.hit_epsilon),
            ("ground_check_distance", self.ground_check_distance),
            ("stop_epsilon", self.stop_epsilon),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("friction", self.friction),
            ("crouching_friction", self.crouching_friction),
            ("jump_impulse", self.jump_impulse),
            ("step_height", self.step_height),
            ("air_speed", self.air_speed),
            ("gravity", self.gravity),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.max_bumps == 0 {
            return Err(ConfigError::ZeroBound { field: "max_bumps" });
        }
        if self.max_planes == 0 {
            return Err(ConfigError::ZeroBound { field: "max_planes" });
        }

        if !(self.max_walkable_angle > 0.0 && self.max_walkable_angle < 90.0) {
            return Err(ConfigError::WalkableAngle(self.max_walkable_angle));
        }

        Ok(())
    }

    /// Smallest hit-normal Y component that still counts as walkable ground.
    pub fn min_ground_normal_y(&self) -> f32 {
        self.max_walkable_angle.to_radians().cos()
    }

    /// Ground speed cap, friction and acceleration for the current stance.
    pub fn ground_params(&self, is_crouching: bool) -> (f32, f32, f32) {
        if is_crouching {
            (self.crouching_speed, self.crouching_friction, self.crouching_acceleration)
        } else {
            (self.walking_speed, self.friction, self.acceleration)
        }
    }
}
