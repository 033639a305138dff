//! Sweep results and hull shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle to a collider stored in a collision backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderHandle(pub u32);

/// Raw hit reported by a backend shape cast, before any epsilon correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Distance travelled along the cast direction until first contact.
    pub distance: f32,
    /// Surface normal at the contact, pointing away from the hit geometry.
    pub normal: Vec3,
    /// Collider that was hit.
    pub collider: ColliderHandle,
}

/// Result of a hull sweep through the world.
///
/// Sweeps move an axis-aligned hull from an origin along a direction and
/// report the first surface in the way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// How far the hull can travel before touching something.
    ///
    /// When something was hit this is already backed off by the hit epsilon
    /// and is never negative. When nothing was hit it equals the requested
    /// maximum distance.
    pub distance: f32,

    /// Surface normal at the impact point.
    ///
    /// Points away from the surface that was hit. `None` if no collision
    /// occurred.
    pub normal: Option<Vec3>,
}

impl SweepResult {
    /// Create a sweep result indicating no collision occurred.
    pub fn miss(max_distance: f32) -> Self {
        Self {
            distance: max_distance,
            normal: None,
        }
    }

    /// Create a sweep result indicating a collision occurred.
    pub fn hit(distance: f32, normal: Vec3) -> Self {
        Self {
            distance: distance.max(0.0),
            normal: Some(normal),
        }
    }

    /// Check if this sweep hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.normal.is_some()
    }
}

/// Minimum translation that separates two overlapping shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penetration {
    /// Unit direction to move the first shape along.
    pub direction: Vec3,
    /// How far it has to move.
    pub depth: f32,
}

/// Axis-aligned box hull used for the character body.
///
/// Positions handed to movement code are at the bottom-center of the hull
/// (the feet); collision queries take the hull center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    /// Half-size in each axis (x, y, z).
    pub half_extents: Vec3,
}

impl Hull {
    /// Create a hull for a body of the given horizontal radius and height.
    pub fn new(horizontal_radius: f32, height: f32) -> Self {
        Self {
            half_extents: Vec3::new(horizontal_radius, height * 0.5, horizontal_radius),
        }
    }

    /// Total height of the hull.
    #[inline]
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    /// Hull center for a body whose feet are at `position`.
    #[inline]
    pub fn center(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.half_extents.y
    }
}
