//! Collision detection for character movement.
//!
//! This module provides box-hull queries against world geometry.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The collision environment containing all geometry
//! - [`CollisionBackend`]: Raw cast/overlap/penetration queries a world answers
//! - [`CollisionQuery`]: The narrow, mask- and epsilon-fixed view movement uses
//! - [`SweepResult`]: Output from a hull sweep
//!
//! # Sweeps
//!
//! A sweep moves a box hull from its center along a unit direction and
//! reports how far it can travel before touching something, backed off by a
//! small epsilon so bodies never rest exactly on a surface.

mod flags;
mod query;
mod sweep;
mod world;

pub use flags::ContentFlags;
pub use query::{CollisionBackend, CollisionQuery};
pub use sweep::{ColliderHandle, Hull, Penetration, ShapeHit, SweepResult};
pub use world::{CollisionBrush, CollisionWorld, WorldError};
