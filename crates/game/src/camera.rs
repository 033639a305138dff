//! First-person camera state on the host side.
//!
//! The camera owns yaw and pitch, turns move intent into world directions
//! for the motor, and smooths out the vertical snaps the motor reports when
//! it climbs a step.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use slidemove_physics::movement::{CameraLink, MotorSnapshot};

/// Camera tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees of yaw per unit of horizontal look input.
    pub yaw_sensitivity: f32,
    /// Degrees of pitch per unit of vertical look input.
    pub pitch_sensitivity: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    /// How fast the step offset decays back to zero.
    pub step_smoothing: f32,
    /// Largest step offset kept, in meters.
    pub max_step_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw_sensitivity: 0.1,
            pitch_sensitivity: 0.1,
            pitch_min: -85.0,
            pitch_max: 85.0,
            step_smoothing: 5.0,
            max_step_offset: 0.6,
        }
    }
}

/// Yaw/pitch camera linked to a character motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YawCamera {
    pub config: CameraConfig,
    /// Degrees, turning right is positive.
    yaw: f32,
    /// Degrees, looking down is positive.
    pitch: f32,
    /// Vertical offset still to be smoothed away after a step.
    step_offset: f32,
    /// Offset applied in the last presentation update.
    applied_offset: f32,
}

impl Default for YawCamera {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl YawCamera {
    pub fn new(yaw_degrees: f32) -> Self {
        Self {
            config: CameraConfig::default(),
            yaw: yaw_degrees,
            pitch: 0.0,
            step_offset: 0.0,
            applied_offset: 0.0,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw_degrees: f32) {
        self.yaw = yaw_degrees;
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Apply a look delta (e.g. mouse movement).
    pub fn look(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.config.yaw_sensitivity;
        self.pitch = (self.pitch - delta.y * self.config.pitch_sensitivity)
            .clamp(self.config.pitch_min, self.config.pitch_max);
    }

    /// Offset still pending from earlier steps.
    pub fn step_offset(&self) -> f32 {
        self.step_offset
    }

    /// Decay the step offset for one tick and return the offset to draw with.
    ///
    /// Half the decay happens before the clamp and half after, so the value
    /// drawn sits between the two.
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        let decay = 0.5 * delta_time * self.config.step_smoothing;
        let limit = self.config.max_step_offset;

        self.step_offset -= self.step_offset * decay;
        self.step_offset = self.step_offset.clamp(-limit, limit);
        self.applied_offset = self.step_offset;
        self.step_offset -= self.step_offset * decay;

        self.applied_offset
    }

    /// World-space eye position for a motor snapshot.
    pub fn eye_position(&self, snapshot: &MotorSnapshot) -> Vec3 {
        snapshot.eye_position() + Vec3::Y * self.applied_offset
    }
}

impl CameraLink for YawCamera {
    fn rotate_by_yaw(&self, wish: Vec2) -> Vec3 {
        let (s, c) = self.yaw.to_radians().sin_cos();
        Vec3::new(c * wish.x + s * wish.y, 0.0, -s * wish.x + c * wish.y)
    }

    fn notify_step(&mut self, height_delta: f32) {
        // The body already moved; start the eye back where it was.
        self.step_offset -= height_delta;
    }
}
