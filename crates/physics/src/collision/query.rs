//! Narrow query interface used by movement code.
//!
//! Movement never talks to geometry directly. It goes through a
//! [`CollisionQuery`], which fixes the collision mask and the hit epsilon and
//! forwards to whatever [`CollisionBackend`] holds the world.

use glam::Vec3;

use super::flags::ContentFlags;
use super::sweep::{ColliderHandle, Penetration, ShapeHit, SweepResult};

/// Raw geometric queries against world geometry.
///
/// Implemented by [`CollisionWorld`](super::CollisionWorld). All shapes are
/// axis-aligned boxes given by their center and half-extents. Geometry whose
/// contents do not block `mask` must be ignored.
pub trait CollisionBackend {
    /// Cast a box along `direction` (unit length) and return the closest hit
    /// within `max_distance`.
    fn cast_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<ShapeHit>;

    /// All colliders overlapping a box, in storage order.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, mask: ContentFlags) -> Vec<ColliderHandle>;

    /// Whether anything overlaps a box.
    fn any_overlap(&self, center: Vec3, half_extents: Vec3, mask: ContentFlags) -> bool {
        !self.overlap_box(center, half_extents, mask).is_empty()
    }

    /// Separation needed to push a box out of one collider, if they overlap.
    fn penetration(
        &self,
        center: Vec3,
        half_extents: Vec3,
        collider: ColliderHandle,
    ) -> Option<Penetration>;
}

/// Collision queries with a fixed mask and hit epsilon.
#[derive(Clone, Copy)]
pub struct CollisionQuery<'w> {
    backend: &'w dyn CollisionBackend,
    mask: ContentFlags,
    hit_epsilon: f32,
}

impl<'w> CollisionQuery<'w> {
    /// Wrap a backend.
    pub fn new(backend: &'w dyn CollisionBackend, mask: ContentFlags, hit_epsilon: f32) -> Self {
        Self {
            backend,
            mask,
            hit_epsilon,
        }
    }

    /// Distance kept between the hull and any surface it is swept into.
    pub fn hit_epsilon(&self) -> f32 {
        self.hit_epsilon
    }

    /// Sweep a box from `origin` (hull center) along `direction`.
    ///
    /// The raw hit distance is backed off by `hit_epsilon` measured along the
    /// surface normal, so the hull comes to rest slightly short of the
    /// surface instead of exactly on it. The result is clamped to zero.
    pub fn sweep(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> SweepResult {
        let Some(hit) = self
            .backend
            .cast_box(origin, half_extents, direction, max_distance, self.mask)
        else {
            return SweepResult::miss(max_distance);
        };

        // Grazing or separating contacts blow the back-off up and clamp to zero.
        let approach = (-direction.dot(hit.normal)).max(f32::EPSILON);
        let distance = hit.distance - self.hit_epsilon / approach;

        SweepResult::hit(distance, hit.normal)
    }

    /// Whether a box at `origin` overlaps any blocking geometry.
    pub fn overlaps(&self, origin: Vec3, half_extents: Vec3) -> bool {
        self.backend.any_overlap(origin, half_extents, self.mask)
    }

    /// Colliders overlapping a box at `origin`.
    pub fn overlapping_bodies(&self, origin: Vec3, half_extents: Vec3) -> Vec<ColliderHandle> {
        self.backend.overlap_box(origin, half_extents, self.mask)
    }

    /// Minimum translation moving a box at `origin` out of `collider`.
    pub fn penetration(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        collider: ColliderHandle,
    ) -> Option<Penetration> {
        self.backend.penetration(origin, half_extents, collider)
    }
}

impl std::fmt::Debug for CollisionQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionQuery")
            .field("mask", &self.mask)
            .field("hit_epsilon", &self.hit_epsilon)
            .finish_non_exhaustive()
    }
}
