//! Push a body out of geometry it has ended up inside.

use glam::Vec3;

use crate::collision::{CollisionQuery, Hull};

/// Extra clearance on top of the penetration depth, in units of hit epsilon.
const CLEARANCE_SCALE: f32 = 1.5;

/// Resolve overlap with the first overlapping collider.
///
/// Returns the translation applied, or `None` when the hull was clear (or
/// the backend could not compute a penetration). Only one collider is
/// handled per call; the next tick picks up any remaining overlap.
pub fn resolve_stuck(query: &CollisionQuery<'_>, position: &mut Vec3, hull: Hull) -> Option<Vec3> {
    let center = hull.center(*position);
    let first = *query.overlapping_bodies(center, hull.half_extents).first()?;
    let penetration = query.penetration(center, hull.half_extents, first)?;

    let correction = penetration.direction * (penetration.depth + query.hit_epsilon() * CLEARANCE_SCALE);
    *position += correction;

    log::debug!(
        "stuck in {:?}: pushed out by {:?} (depth {:.4})",
        first,
        correction,
        penetration.depth
    );
    Some(correction)
}
