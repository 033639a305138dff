//! Slidemove Game Host
//!
//! This crate wires the movement solver into something that runs:
//!
//! - Keyboard-style input and scripted input sources
//! - A yaw/pitch camera with step smoothing
//! - Levels built from collision brushes
//! - A fixed-step simulation loop
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       Simulation                          │
//! │  ┌───────────┐   ┌─────────────────┐   ┌───────────────┐  │
//! │  │ Scripted  │──►│ CharacterMotor  │──►│ MotorSnapshot │  │
//! │  │ Input     │   │ (physics crate) │   └───────────────┘  │
//! │  └───────────┘   └──┬──────────▲───┘                      │
//! │                     │          │                          │
//! │               ┌─────▼────┐ ┌───┴─────┐                    │
//! │               │ Level    │ │ YawCam  │                    │
//! │               │ collision│ │ (steps) │                    │
//! │               └──────────┘ └─────────┘                    │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod input;
pub mod level;
pub mod simulation;

// Re-export main types
pub use camera::{CameraConfig, YawCamera};
pub use input::{PlayerInput, ScriptedInput};
pub use level::{Level, SpawnPoint};
pub use simulation::{Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use slidemove_physics::{
    Body, CollisionWorld, ConfigError, ContentFlags, MotorSnapshot, MovementConfig, MovementMode, TickOutcome,
};
