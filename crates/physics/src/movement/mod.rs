//! Kinematic character movement.
//!
//! This module moves a box-hulled body through a collision world one fixed
//! tick at a time:
//!
//! - Friction and direction-clamped acceleration
//! - Collide-and-slide against multiple contact planes
//! - Stair stepping
//! - Ground classification with a knock-up override
//! - Recovery from overlapping geometry
//! - Crouching gated by headroom
//!
//! # Design
//!
//! Movement is driven by the [`CharacterMotor`], which owns the [`Body`] and
//! its [`MovementState`]. Input arrives through an [`InputSource`] and the
//! camera is reached through a [`CameraLink`]; both are injected when the
//! motor is built. Everything outside the motor reads a [`MotorSnapshot`].
//!
//! Movement never fails at runtime. Numeric trouble is reported through the
//! `log` facade and through [`SlideReport`] / [`TickOutcome`] values.

mod config;
mod controller;
mod crouch;
mod ground;
mod link;
mod shaper;
mod slide_move;
mod state;
mod stuck;

pub use config::{ConfigError, MovementConfig};
pub use controller::{CharacterMotor, MoveSummary, TickOutcome};
pub use crouch::{has_standing_headroom, CrouchController, CrouchState};
pub use ground::{classify_ground, GroundContact};
pub use link::{CameraLink, InputSource, TickInput};
pub use shaper::{accelerate, apply_friction};
pub use slide_move::{
    clip_velocity, collide_and_slide, step_slide_move, ContactPlanes, SlideReport, SlideTermination,
    StepOutcome, StepReport,
};
pub use state::{Body, MotorSnapshot, MovementMode, MovementState};
pub use stuck::resolve_stuck;
