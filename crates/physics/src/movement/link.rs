//! Interfaces the motor uses to talk to input and camera code.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Input sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired move direction (x = right, y = forward), length at most 1.
    pub wish: Vec2,
    /// Jump was pressed since the previous tick.
    pub jump_pressed: bool,
    /// Crouch is held down.
    pub crouch_held: bool,
}

/// Supplies [`TickInput`] to the motor.
pub trait InputSource {
    /// Sample input for the coming tick.
    fn poll(&mut self) -> TickInput;
}

/// The motor's view of the camera.
///
/// The camera never writes to the motor; it only answers direction
/// questions and receives step notifications.
pub trait CameraLink {
    /// Turn a local 2D move intent into a horizontal world direction using
    /// the camera's yaw.
    fn rotate_by_yaw(&self, wish: Vec2) -> Vec3;

    /// The body just snapped vertically by `height_delta` while stepping.
    fn notify_step(&mut self, height_delta: f32);
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self) -> TickInput {
        (**self).poll()
    }
}

impl<T: CameraLink + ?Sized> CameraLink for Box<T> {
    fn rotate_by_yaw(&self, wish: Vec2) -> Vec3 {
        (**self).rotate_by_yaw(wish)
    }

    fn notify_step(&mut self, height_delta: f32) {
        (**self).notify_step(height_delta)
    }
}
