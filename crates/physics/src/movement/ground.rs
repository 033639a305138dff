//! Ground classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionQuery, Hull};

use super::config::MovementConfig;

/// Result of probing below the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    /// Body rests on walkable ground.
    pub is_grounded: bool,

    /// Normal of whatever the probe touched, walkable or not.
    pub normal: Option<Vec3>,
}

impl GroundContact {
    /// No ground contact at all.
    pub fn airborne() -> Self {
        Self {
            is_grounded: false,
            normal: None,
        }
    }
}

/// Classify the ground under a body.
///
/// Upward speed above the knock-up threshold always breaks ground contact,
/// even if the floor is still touching. Otherwise a short downward sweep
/// decides: the body is grounded if it hits a surface whose normal is
/// within the walkable angle.
pub fn classify_ground(
    query: &CollisionQuery<'_>,
    position: Vec3,
    velocity: Vec3,
    hull: Hull,
    config: &MovementConfig,
) -> GroundContact {
    if velocity.y > config.knock_up_threshold {
        return GroundContact::airborne();
    }

    let sweep = query.sweep(
        hull.center(position),
        hull.half_extents,
        Vec3::NEG_Y,
        config.ground_check_distance,
    );

    let Some(normal) = sweep.normal else {
        return GroundContact::airborne();
    };

    GroundContact {
        is_grounded: normal.y > config.min_ground_normal_y(),
        normal: Some(normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        ColliderHandle, CollisionBackend, CollisionWorld, ContentFlags, Penetration, ShapeHit,
    };

    fn floor_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            ContentFlags::SOLID,
        );
        world
    }

    fn classify(world: &CollisionWorld, position: Vec3, velocity: Vec3) -> GroundContact {
        let config = MovementConfig::default();
        let query = CollisionQuery::new(world, config.collision_mask, config.hit_epsilon);
        classify_ground(&query, position, velocity, Hull::new(0.5, 2.0), &config)
    }

    #[test]
    fn test_resting_on_floor_is_grounded() {
        let world = floor_world();
        let contact = classify(&world, Vec3::new(0.0, 0.015, 0.0), Vec3::ZERO);

        assert!(contact.is_grounded);
        let normal = contact.normal.expect("floor normal");
        assert!(normal.abs_diff_eq(Vec3::Y, 1e-4));
    }

    #[test]
    fn test_above_probe_range_is_airborne() {
        let world = floor_world();
        let contact = classify(&world, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
        assert_eq!(contact, GroundContact::airborne());
    }

    #[test]
    fn test_knock_up_overrides_contact() {
        let world = floor_world();
        let contact = classify(&world, Vec3::new(0.0, 0.015, 0.0), Vec3::new(0.0, 2.5, 0.0));
        assert!(!contact.is_grounded);

        // At or below the threshold the floor still counts.
        let contact = classify(&world, Vec3::new(0.0, 0.015, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert!(contact.is_grounded);
    }

    /// Backend whose every cast touches a surface right away.
    struct Touching(Vec3);

    impl CollisionBackend for Touching {
        fn cast_box(&self, _: Vec3, _: Vec3, _: Vec3, _: f32, _: ContentFlags) -> Option<ShapeHit> {
            Some(ShapeHit {
                distance: 0.0,
                normal: self.0,
                collider: ColliderHandle(7),
            })
        }

        fn overlap_box(&self, _: Vec3, _: Vec3, _: ContentFlags) -> Vec<ColliderHandle> {
            Vec::new()
        }

        fn penetration(&self, _: Vec3, _: Vec3, _: ColliderHandle) -> Option<Penetration> {
            None
        }
    }

    #[test]
    fn test_walkable_angle_threshold() {
        let config = MovementConfig::default();
        let hull = Hull::new(0.5, 2.0);
        let slope = |degrees: f32| {
            let (sin, cos) = degrees.to_radians().sin_cos();
            Touching(Vec3::new(-sin, cos, 0.0))
        };

        let gentle = slope(40.0);
        let query = CollisionQuery::new(&gentle, config.collision_mask, config.hit_epsilon);
        let contact = classify_ground(&query, Vec3::ZERO, Vec3::ZERO, hull, &config);
        assert!(contact.is_grounded);

        let steep = slope(60.0);
        let query = CollisionQuery::new(&steep, config.collision_mask, config.hit_epsilon);
        let contact = classify_ground(&query, Vec3::ZERO, Vec3::ZERO, hull, &config);
        assert!(!contact.is_grounded);
        assert!(contact.normal.is_some());
    }
}
