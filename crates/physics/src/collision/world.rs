//! Collision world containing all static and dynamic geometry.
//!
//! The collision world stores every collidable brush and answers the box
//! casts, overlap tests and penetration queries movement is built on.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, ShapeCastOptions};
use parry3d::shape::{Cuboid, SharedShape};
use thiserror::Error;

use super::flags::ContentFlags;
use super::query::CollisionBackend;
use super::sweep::{ColliderHandle, Penetration, ShapeHit};

/// Errors raised while building a collision world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("convex hull needs at least four non-coplanar points, got {0}")]
    DegenerateHull(usize),

    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("invalid triangle mesh: {0}")]
    InvalidMesh(String),
}

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Handle of this brush.
    pub handle: ColliderHandle,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, clip, trigger, ...).
    pub contents: ContentFlags,
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes
/// - Convex hull brushes
/// - Triangle mesh collision
///
/// Brushes can be added and removed between ticks, which is how doors and
/// other dynamic obstructions are modelled. The world is never mutated while
/// a tick is running.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    fn next_handle(&mut self) -> ColliderHandle {
        let handle = ColliderHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> ColliderHandle {
        let handle = self.next_handle();
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);

        self.brushes.push(CollisionBrush {
            handle,
            shape,
            transform,
            contents,
        });

        handle
    }

    /// Add a convex hull to the world.
    ///
    /// Useful for ramps and other sloped brushes.
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        contents: ContentFlags,
    ) -> Result<ColliderHandle, WorldError> {
        if points.len() < 4 {
            return Err(WorldError::DegenerateHull(points.len()));
        }

        let parry_points: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let shape = SharedShape::convex_hull(&parry_points).ok_or(WorldError::DegenerateHull(points.len()))?;

        let handle = self.next_handle();
        self.brushes.push(CollisionBrush {
            handle,
            shape,
            transform: Isometry::identity(),
            contents,
        });

        Ok(handle)
    }

    /// Add a triangle mesh to the world.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Mesh vertex positions
    /// * `indices` - Triangle indices (3 per triangle)
    /// * `contents` - Content flags for collision filtering
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        contents: ContentFlags,
    ) -> Result<ColliderHandle, WorldError> {
        if let Some(&index) = indices.iter().flatten().find(|&&i| i as usize >= vertices.len()) {
            return Err(WorldError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let parry_vertices: Vec<Point<Real>> = vertices.iter().map(|v| Point::new(v.x, v.y, v.z)).collect();

        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec())
            .map_err(|err| WorldError::InvalidMesh(format!("{err:?}")))?;

        let handle = self.next_handle();
        self.brushes.push(CollisionBrush {
            handle,
            shape,
            transform: Isometry::identity(),
            contents,
        });

        Ok(handle)
    }

    /// Remove a brush. Returns whether it existed.
    pub fn remove(&mut self, handle: ColliderHandle) -> bool {
        let before = self.brushes.len();
        self.brushes.retain(|brush| brush.handle != handle);
        self.brushes.len() != before
    }

    /// Look up a brush by handle.
    pub fn get(&self, handle: ColliderHandle) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|brush| brush.handle == handle)
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Perform a raycast through the world.
    ///
    /// Returns the closest hit as a [`ShapeHit`]; handy for debugging level
    /// geometry and spawn placement.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<ShapeHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(Point::new(origin.x, origin.y, origin.z), Vector::new(dir.x, dir.y, dir.z));

        let mut closest: Option<ShapeHit> = None;
        for brush in self.blocking(mask) {
            let Some(hit) = brush
                .shape
                .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            else {
                continue;
            };

            if closest.map_or(true, |c| hit.time_of_impact < c.distance) {
                closest = Some(ShapeHit {
                    distance: hit.time_of_impact,
                    normal: Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z),
                    collider: brush.handle,
                });
            }
        }

        closest
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn blocking(&self, mask: ContentFlags) -> impl Iterator<Item = &CollisionBrush> {
        self.brushes.iter().filter(move |brush| brush.contents.blocks(mask))
    }

    fn box_shape(half_extents: Vec3) -> Cuboid {
        Cuboid::new(Vector::new(half_extents.x, half_extents.y, half_extents.z))
    }

    fn box_transform(center: Vec3) -> Isometry<Real> {
        Isometry::translation(center.x, center.y, center.z)
    }
}

impl CollisionBackend for CollisionWorld {
    fn cast_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<ShapeHit> {
        let shape = Self::box_shape(half_extents);
        let transform = Self::box_transform(center);
        let velocity = Vector::new(direction.x, direction.y, direction.z);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            // Touching or overlapping geometry we are moving away from is ignored.
            stop_at_penetration: false,
            ..ShapeCastOptions::default()
        };

        let mut closest: Option<ShapeHit> = None;
        for brush in self.blocking(mask) {
            let Ok(Some(hit)) = query::cast_shapes(
                &transform,
                &velocity,
                &shape,
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) else {
                continue;
            };

            if closest.map_or(true, |c| hit.time_of_impact < c.distance) {
                // normal2 is the outward normal of the brush in its local frame.
                let normal = brush.transform.rotation * hit.normal2.into_inner();
                closest = Some(ShapeHit {
                    distance: hit.time_of_impact,
                    normal: Vec3::new(normal.x, normal.y, normal.z).normalize_or_zero(),
                    collider: brush.handle,
                });
            }
        }

        closest
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, mask: ContentFlags) -> Vec<ColliderHandle> {
        let shape = Self::box_shape(half_extents);
        let transform = Self::box_transform(center);

        self.blocking(mask)
            .filter(|brush| {
                matches!(
                    query::intersection_test(&transform, &shape, &brush.transform, brush.shape.as_ref()),
                    Ok(true)
                )
            })
            .map(|brush| brush.handle)
            .collect()
    }

    fn penetration(&self, center: Vec3, half_extents: Vec3, collider: ColliderHandle) -> Option<Penetration> {
        let brush = self.get(collider)?;
        let shape = Self::box_shape(half_extents);
        let transform = Self::box_transform(center);

        let contact = query::contact(&transform, &shape, &brush.transform, brush.shape.as_ref(), 0.0).ok()??;

        // Negative distance means penetration.
        let depth = -contact.dist;
        if depth <= 0.0 {
            return None;
        }

        // normal1 points from the box toward the brush; push the other way.
        let normal = contact.normal1.into_inner();
        Some(Penetration {
            direction: -Vec3::new(normal.x, normal.y, normal.z),
            depth,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
