//! Level construction and management.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slidemove_physics::{CollisionWorld, ContentFlags};

/// A level: collision geometry plus spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for movement.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A player spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space (feet).
    pub position: Vec3,

    /// Initial camera yaw in degrees.
    pub yaw: f32,
}

/// Rise of each stair in [`Level::stair_course`].
pub const STAIR_RISE: f32 = 0.3;

/// Number of stairs in [`Level::stair_course`].
pub const STAIR_COUNT: usize = 5;

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// A large flat floor with its top at y = 0 and one spawn at the origin.
    pub fn flat_ground() -> Self {
        let mut level = Self::new("flat_ground", "Flat Ground");
        level.add_floor(50.0);
        level.spawn_points.push(SpawnPoint {
            position: Vec3::ZERO,
            yaw: 0.0,
        });
        level
    }

    /// Stairs up to a platform, a wall too tall to step and a pass-through
    /// trigger volume.
    ///
    /// Layout along +Z from the spawn at the origin:
    /// - z = 2..: [`STAIR_COUNT`] stairs, each [`STAIR_RISE`] high and 1 m deep
    /// - z = 7..14: platform at the height of the last stair
    /// - z = 14..15: wall rising 1.2 m above the platform
    /// - a trigger volume over the third stair
    pub fn stair_course() -> Self {
        let mut level = Self::new("stair_course", "Stair Course");
        level.add_floor(50.0);

        let platform_end = 14.0;
        for i in 0..STAIR_COUNT {
            let top = STAIR_RISE * (i + 1) as f32;
            let start = 2.0 + i as f32;
            level.collision.add_box(
                Vec3::new(0.0, top * 0.5, (start + platform_end) * 0.5),
                Vec3::new(3.0, top * 0.5, (platform_end - start) * 0.5),
                ContentFlags::SOLID,
            );
        }

        let platform_top = STAIR_RISE * STAIR_COUNT as f32;
        let wall_top = platform_top + 1.2;
        level.collision.add_box(
            Vec3::new(0.0, wall_top * 0.5, platform_end + 0.5),
            Vec3::new(3.0, wall_top * 0.5, 0.5),
            ContentFlags::SOLID,
        );

        level.collision.add_box(
            Vec3::new(0.0, 1.5, 4.5),
            Vec3::new(3.0, 1.5, 0.5),
            ContentFlags::TRIGGER,
        );

        level.spawn_points.push(SpawnPoint {
            position: Vec3::ZERO,
            yaw: 0.0,
        });
        level
    }

    /// Get a player spawn point.
    pub fn player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }

    fn add_floor(&mut self, half_size: f32) {
        self.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(half_size, 0.5, half_size),
            ContentFlags::SOLID,
        );
    }
}
