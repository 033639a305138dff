//! Slidemove Physics
//!
//! A kinematic character-movement solver. The body is never pushed around by
//! a dynamics engine; each tick it is swept through the world and slid along
//! whatever it touches.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: Box sweeps, overlaps and penetration queries against a
//!   world of brushes
//! - **Movement**: Uses those queries to implement character movement
//!
//! Positions handed to movement code are at the bottom-center of the body
//! hull. The crate does no I/O apart from reading config files on request.

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    ColliderHandle, CollisionBackend, CollisionQuery, CollisionWorld, ContentFlags, Hull, SweepResult,
    WorldError,
};
pub use movement::{
    Body, CameraLink, CharacterMotor, ConfigError, InputSource, MotorSnapshot, MovementConfig, MovementMode,
    TickInput, TickOutcome,
};
