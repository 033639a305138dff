//! Friction and acceleration.
//!
//! Both operate on a velocity vector and a tick duration only; they know
//! nothing about collision or ground state.

use glam::Vec3;

/// Remove `friction * dt` of speed, keeping the direction.
///
/// Speed never drops below zero and a zero vector stays zero.
pub fn apply_friction(velocity: Vec3, friction: f32, delta_time: f32) -> Vec3 {
    let speed = velocity.length();
    if speed == 0.0 {
        return velocity;
    }

    let new_speed = (speed - friction * delta_time).max(0.0);
    velocity * (new_speed / speed)
}

/// Add `acceleration * dt` along `direction`.
///
/// Only the velocity component along `direction` is capped at `max_speed`;
/// components orthogonal to it are left alone. Repeated diagonal input can
/// therefore build speed beyond `max_speed` (strafe gain).
pub fn accelerate(velocity: Vec3, direction: Vec3, acceleration: f32, max_speed: f32, delta_time: f32) -> Vec3 {
    let mut add = acceleration * delta_time;

    // Current speed in the wish direction
    let current_speed = direction.dot(velocity);
    if current_speed + add > max_speed {
        add = (max_speed - current_speed).max(0.0);
    }

    velocity + direction * add
}
