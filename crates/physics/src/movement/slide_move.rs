//! Collide-and-slide collision response and stair stepping.
//!
//! The resolver sweeps the body hull along its velocity, stops at the first
//! surface, removes the into-surface part of the velocity and tries again
//! with whatever time is left. Surfaces touched without moving in between
//! are remembered as contact planes so the body can slide along creases
//! and give up in corners.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionQuery, Hull};

use super::config::MovementConfig;
use super::ground::{classify_ground, GroundContact};

/// A clipped velocity must point at least this far out of every other
/// contact plane to be accepted.
const PLANE_CONFLICT_EPSILON: f32 = 0.002;

/// Project `velocity` onto the plane with unit normal `normal`.
///
/// Removes the component along the normal in either direction.
#[inline]
pub fn clip_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - normal * velocity.dot(normal)
}

/// Surface normals touched since the body last moved.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPlanes {
    normals: Vec<Vec3>,
    max_planes: usize,
}

impl ContactPlanes {
    pub fn new(max_planes: usize) -> Self {
        Self {
            normals: Vec::with_capacity(max_planes),
            max_planes,
        }
    }

    /// Record a plane. Returns `false` (and records nothing) when full.
    pub fn push(&mut self, normal: Vec3) -> bool {
        if self.normals.len() >= self.max_planes {
            return false;
        }
        self.normals.push(normal);
        true
    }

    pub fn clear(&mut self) {
        self.normals.clear();
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Velocity that slides along every recorded plane, if one exists.
    ///
    /// Planes are tried in the order they were recorded and the first
    /// projection of `velocity` that does not push into any other plane
    /// wins. If none works and exactly two planes are recorded, the body
    /// follows the crease between them. Anything else is a corner.
    pub fn slide(&self, velocity: Vec3) -> Option<Vec3> {
        for (i, &plane) in self.normals.iter().enumerate() {
            let candidate = clip_velocity(velocity, plane);
            let conflicts = self
                .normals
                .iter()
                .enumerate()
                .any(|(j, &other)| i != j && candidate.dot(other) < PLANE_CONFLICT_EPSILON);
            if !conflicts {
                return Some(candidate);
            }
        }

        match self.normals.as_slice() {
            [first, second] => {
                let crease = first.cross(*second).normalize_or_zero();
                Some(crease * crease.dot(velocity))
            }
            _ => None,
        }
    }
}

/// Why a [`collide_and_slide`] call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideTermination {
    /// Speed dropped to the stop epsilon.
    Converged,
    /// The last sweep hit nothing and used up the remaining time.
    Unobstructed,
    /// More simultaneous contact planes than allowed; velocity zeroed.
    TooManyPlanes,
    /// Three or more planes with no common slide direction; velocity zeroed.
    Cornered,
    /// Clipping turned the velocity against its original direction; zeroed.
    Reversed,
    /// The tick's time ran out after a hit.
    TimeExhausted,
    /// The iteration limit was reached with time left.
    BumpBudgetExceeded,
}

/// Summary of one [`collide_and_slide`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideReport {
    /// Sweep iterations used.
    pub bumps: usize,
    pub termination: SlideTermination,
}

impl SlideReport {
    /// Whether the call ended by zeroing the velocity after a collision.
    pub fn blocked(&self) -> bool {
        matches!(
            self.termination,
            SlideTermination::TooManyPlanes | SlideTermination::Cornered | SlideTermination::Reversed
        )
    }
}

/// Move a hull through the world for one tick, sliding along what it hits.
///
/// `position` is the bottom-center of the hull. Every clip projects the
/// velocity the call started with, so repeated hits never amplify speed.
/// The returned velocity is always finite.
pub fn collide_and_slide(
    query: &CollisionQuery<'_>,
    position: &mut Vec3,
    velocity: &mut Vec3,
    hull: Hull,
    delta_time: f32,
    config: &MovementConfig,
) -> SlideReport {
    let original_velocity = *velocity;
    let mut planes = ContactPlanes::new(config.max_planes);
    let mut time_remaining = delta_time;

    let report = |bumps, termination| SlideReport { bumps, termination };

    for bump in 1..=config.max_bumps {
        let speed = velocity.length();
        if speed <= config.stop_epsilon {
            *velocity = Vec3::ZERO;
            return report(bump, SlideTermination::Converged);
        }

        let direction = *velocity / speed;
        let full_distance = speed * time_remaining;
        let sweep = query.sweep(hull.center(*position), hull.half_extents, direction, full_distance);

        let Some(normal) = sweep.normal else {
            *position += direction * full_distance;
            return report(bump, SlideTermination::Unobstructed);
        };

        if sweep.distance > 0.0 {
            *position += direction * sweep.distance;

            let mut fraction = sweep.distance / full_distance;
            if fraction > 1.0 {
                log::warn!("sweep fraction {fraction} above 1, clamping");
                fraction = 1.0;
            }
            time_remaining -= fraction * delta_time;

            // Moving invalidates the creases found so far.
            planes.clear();
        }

        if !planes.push(normal) {
            log::warn!("colliding with more than {} planes at once", config.max_planes);
            *velocity = Vec3::ZERO;
            return report(bump, SlideTermination::TooManyPlanes);
        }

        match planes.slide(original_velocity) {
            Some(slid) => *velocity = slid,
            None => {
                *velocity = Vec3::ZERO;
                return report(bump, SlideTermination::Cornered);
            }
        }

        if velocity.dot(original_velocity) <= 0.0 {
            *velocity = Vec3::ZERO;
            return report(bump, SlideTermination::Reversed);
        }

        if time_remaining <= 0.0 {
            log::debug!("slide ran out of time after {bump} bumps");
            return report(bump, SlideTermination::TimeExhausted);
        }
    }

    log::warn!("slide exceeded {} bumps", config.max_bumps);
    report(config.max_bumps, SlideTermination::BumpBudgetExceeded)
}

/// Which path a [`step_slide_move`] kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The body stayed at floor height.
    Low,
    /// The body climbed (or dropped) by `height_delta`.
    Stepped { height_delta: f32 },
}

/// Result of a [`step_slide_move`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Path that was kept.
    pub outcome: StepOutcome,
    /// Ground under the stepped path after its down probe.
    ///
    /// Reported whichever path was kept; a rejected step that found no
    /// ground means the body walked off an edge.
    pub ground: GroundContact,
}

/// Collide-and-slide with stair stepping.
///
/// Runs the resolver twice from the same start: once at the current height
/// and once after lifting the hull by up to `step_height`, followed by a
/// probe down of twice that. The stepped result is only used if it ends on
/// walkable ground and got further horizontally than the low one.
pub fn step_slide_move(
    query: &CollisionQuery<'_>,
    position: &mut Vec3,
    velocity: &mut Vec3,
    hull: Hull,
    delta_time: f32,
    config: &MovementConfig,
) -> StepReport {
    let start_position = *position;
    let start_velocity = *velocity;

    // Low path
    collide_and_slide(query, position, velocity, hull, delta_time, config);
    let low_position = *position;
    let low_velocity = *velocity;

    // Stepped path: up, across, back down.
    *position = start_position;
    *velocity = start_velocity;

    let up = query.sweep(hull.center(*position), hull.half_extents, Vec3::Y, config.step_height);
    position.y += up.distance;

    collide_and_slide(query, position, velocity, hull, delta_time, config);

    let down = query.sweep(
        hull.center(*position),
        hull.half_extents,
        Vec3::NEG_Y,
        config.step_height * 2.0,
    );
    position.y -= down.distance;

    let ground = classify_ground(query, *position, *velocity, hull, config);
    let stepped_further = horizontal_distance(start_position, *position)
        > horizontal_distance(start_position, low_position);

    let outcome = if ground.is_grounded && stepped_further {
        StepOutcome::Stepped {
            height_delta: position.y - start_position.y,
        }
    } else {
        *position = low_position;
        *velocity = low_velocity;
        StepOutcome::Low
    };

    StepReport { outcome, ground }
}

#[inline]
fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let delta = b - a;
    (delta.x * delta.x + delta.z * delta.z).sqrt()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::collision::{
        ColliderHandle, CollisionBackend, CollisionWorld, ContentFlags, Penetration, ShapeHit,
    };

    const DT: f32 = 0.02;

    /// Backend that answers casts from a queue of scripted hits.
    ///
    /// Each cast pops one entry; `None` (or an empty queue) is a miss.
    struct Scripted {
        hits: RefCell<VecDeque<Option<(f32, Vec3)>>>,
    }

    impl Scripted {
        fn new(hits: impl IntoIterator<Item = Option<(f32, Vec3)>>) -> Self {
            Self {
                hits: RefCell::new(hits.into_iter().collect()),
            }
        }
    }

    impl CollisionBackend for Scripted {
        fn cast_box(&self, _: Vec3, _: Vec3, _: Vec3, _: f32, _: ContentFlags) -> Option<ShapeHit> {
            let (distance, normal) = self.hits.borrow_mut().pop_front().flatten()?;
            Some(ShapeHit {
                distance,
                normal,
                collider: ColliderHandle(0),
            })
        }

        fn overlap_box(&self, _: Vec3, _: Vec3, _: ContentFlags) -> Vec<ColliderHandle> {
            Vec::new()
        }

        fn penetration(&self, _: Vec3, _: Vec3, _: ColliderHandle) -> Option<Penetration> {
            None
        }
    }

    fn resolve(
        backend: &dyn CollisionBackend,
        velocity: Vec3,
        delta_time: f32,
        config: &MovementConfig,
    ) -> (Vec3, Vec3, SlideReport) {
        let query = CollisionQuery::new(backend, config.collision_mask, config.hit_epsilon);
        let mut position = Vec3::ZERO;
        let mut velocity = velocity;
        let hull = Hull::new(0.5, 2.0);
        let report = collide_and_slide(&query, &mut position, &mut velocity, hull, delta_time, config);
        (position, velocity, report)
    }

    #[test]
    fn test_clip_velocity_wall() {
        let clipped = clip_velocity(Vec3::new(10.0, 0.0, 5.0), Vec3::NEG_X);
        assert_eq!(clipped, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_clip_velocity_slope() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let clipped = clip_velocity(Vec3::new(0.0, -10.0, 0.0), normal);

        assert!(clipped.dot(normal).abs() < 1e-5);
        assert!(clipped.y < 0.0 && clipped.z > 0.0);
    }

    #[test]
    fn test_contact_planes_capacity() {
        let mut planes = ContactPlanes::new(2);
        assert!(planes.push(Vec3::X));
        assert!(planes.push(Vec3::Y));
        assert!(!planes.push(Vec3::Z));
        assert_eq!(planes.len(), 2);

        planes.clear();
        assert!(planes.is_empty());
    }

    #[test]
    fn test_free_move() {
        let backend = Scripted::new(std::iter::empty());
        let config = MovementConfig::default();
        let (position, velocity, report) = resolve(&backend, Vec3::new(5.0, 0.0, 0.0), 1.0, &config);

        assert_eq!(report, SlideReport { bumps: 1, termination: SlideTermination::Unobstructed });
        assert!((position.x - 5.0).abs() < 1e-5);
        assert_eq!(velocity, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_stopped_body_converges() {
        let backend = Scripted::new(std::iter::empty());
        let config = MovementConfig::default();
        let (position, velocity, report) = resolve(&backend, Vec3::new(0.0005, 0.0, 0.0), DT, &config);

        assert_eq!(report.termination, SlideTermination::Converged);
        assert_eq!(position, Vec3::ZERO);
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_single_plane_slides() {
        // Wall ahead on +X, then nothing.
        let backend = Scripted::new([Some((0.05, Vec3::NEG_X)), None]);
        let config = MovementConfig::default();
        let (_, velocity, report) = resolve(&backend, Vec3::new(3.0, 0.0, 4.0), DT, &config);

        assert_eq!(report, SlideReport { bumps: 2, termination: SlideTermination::Unobstructed });
        assert_eq!(velocity, Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_two_conflicting_planes_follow_crease() {
        let backend = Scripted::new([Some((0.0, Vec3::Y)), Some((0.0, Vec3::X)), None]);
        let config = MovementConfig::default();
        let (_, velocity, report) = resolve(&backend, Vec3::new(-1.0, -1.0, -1.0), DT, &config);

        assert_eq!(report.termination, SlideTermination::Unobstructed);
        assert_eq!(report.bumps, 3);
        assert_eq!(velocity, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_three_conflicting_planes_stop_dead() {
        let backend = Scripted::new([
            Some((0.0, Vec3::X)),
            Some((0.0, Vec3::Y)),
            Some((0.0, Vec3::Z)),
        ]);
        let config = MovementConfig::default();
        let (position, velocity, report) = resolve(&backend, Vec3::new(-1.0, -1.0, -1.0), DT, &config);

        assert_eq!(report, SlideReport { bumps: 3, termination: SlideTermination::Cornered });
        assert!(report.blocked());
        assert_eq!(velocity, Vec3::ZERO);
        assert_eq!(position, Vec3::ZERO);
    }

    #[test]
    fn test_head_on_hit_reverses_to_zero() {
        let backend = Scripted::new([Some((0.5, Vec3::NEG_X))]);
        let config = MovementConfig::default();
        let (position, velocity, report) = resolve(&backend, Vec3::new(2.0, 0.0, 0.0), 1.0, &config);

        assert_eq!(report.termination, SlideTermination::Reversed);
        assert_eq!(velocity, Vec3::ZERO);
        assert!((position.x - 0.485).abs() < 1e-5);
    }

    #[test]
    fn test_too_many_planes() {
        let backend = Scripted::new([Some((0.0, Vec3::X)), Some((0.0, Vec3::Y))]);
        let config = MovementConfig {
            max_planes: 1,
            ..Default::default()
        };
        let (_, velocity, report) = resolve(&backend, Vec3::new(-1.0, -1.0, 0.0), DT, &config);

        assert_eq!(report, SlideReport { bumps: 2, termination: SlideTermination::TooManyPlanes });
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_positive_move_clears_planes() {
        // The second hit moves the body, so the first plane is forgotten and
        // the slide only has to respect the floor.
        let backend = Scripted::new([Some((0.0, Vec3::X)), Some((0.5, Vec3::Y)), None]);
        let config = MovementConfig::default();
        let (_, velocity, report) = resolve(&backend, Vec3::new(-1.0, -1.0, 0.0), 1.0, &config);

        assert_eq!(report.termination, SlideTermination::Unobstructed);
        assert_eq!(velocity, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_time_exhausted_clamps_fraction() {
        // Reported distance exceeds the requested one: the fraction is
        // clamped and the call ends with the remaining time used up.
        let normal = Vec3::new(-0.6, 0.8, 0.0);
        let backend = Scripted::new([Some((2.0, normal))]);
        let config = MovementConfig::default();
        let (position, velocity, report) = resolve(&backend, Vec3::X, 1.0, &config);

        assert_eq!(report, SlideReport { bumps: 1, termination: SlideTermination::TimeExhausted });
        assert!((position.x - (2.0 - 0.015 / 0.6)).abs() < 1e-4);
        assert!(velocity.abs_diff_eq(Vec3::new(0.64, 0.48, 0.0), 1e-5));
    }

    #[test]
    fn test_bump_budget_keeps_reached_state() {
        let backend = Scripted::new([Some((0.0, Vec3::X))]);
        let config = MovementConfig {
            max_bumps: 1,
            ..Default::default()
        };
        let (position, velocity, report) = resolve(&backend, Vec3::new(-1.0, -1.0, 0.0), DT, &config);

        assert_eq!(report, SlideReport { bumps: 1, termination: SlideTermination::BumpBudgetExceeded });
        assert_eq!(velocity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(position, Vec3::ZERO);
    }

    #[test]
    fn test_parallel_crease_is_finite() {
        // The same plane twice: the crease direction degenerates to zero.
        let backend = Scripted::new([Some((0.0, Vec3::NEG_X)), Some((0.0, Vec3::NEG_X))]);
        let config = MovementConfig::default();
        let (_, velocity, _) = resolve(&backend, Vec3::new(1.0, 0.0, 1.0), DT, &config);

        assert!(velocity.is_finite());
    }

    #[test]
    fn test_step_slide_move_climbs_low_ledge() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), ContentFlags::SOLID);
        // Ledge 0.4 high, starting at x = 1.
        world.add_box(Vec3::new(6.0, 0.2, 0.0), Vec3::new(5.0, 0.2, 20.0), ContentFlags::SOLID);

        let config = MovementConfig::default();
        let query = CollisionQuery::new(&world, config.collision_mask, config.hit_epsilon);
        let hull = Hull::new(0.5, 2.0);

        // Right against the ledge face, moving into it.
        let mut position = Vec3::new(0.48, 0.015, 0.0);
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);
        let report = step_slide_move(&query, &mut position, &mut velocity, hull, DT, &config);

        let StepOutcome::Stepped { height_delta } = report.outcome else {
            panic!("expected a step, got {report:?} at {position:?}");
        };
        assert!(report.ground.is_grounded);
        assert!((height_delta - 0.4).abs() < 0.02, "delta={height_delta}");
        assert!(position.x > 0.55);
    }

    #[test]
    fn test_step_slide_move_stays_low_in_open_space() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), ContentFlags::SOLID);

        let config = MovementConfig::default();
        let query = CollisionQuery::new(&world, config.collision_mask, config.hit_epsilon);

        let mut position = Vec3::new(0.0, 0.015, 0.0);
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);
        let report = step_slide_move(&query, &mut position, &mut velocity, Hull::new(0.5, 2.0), DT, &config);

        assert_eq!(report.outcome, StepOutcome::Low);
        assert!(report.ground.is_grounded);
        assert!((position.x - 0.1).abs() < 1e-4);
        assert!((position.y - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_step_slide_move_off_an_edge_reports_airborne() {
        let mut world = CollisionWorld::new();
        // Floor ends at x = 0 with nothing below.
        world.add_box(Vec3::new(-10.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0), ContentFlags::SOLID);

        let config = MovementConfig::default();
        let query = CollisionQuery::new(&world, config.collision_mask, config.hit_epsilon);

        let mut position = Vec3::new(0.45, 0.015, 0.0);
        let mut velocity = Vec3::new(5.5, 0.0, 0.0);
        let report = step_slide_move(&query, &mut position, &mut velocity, Hull::new(0.5, 2.0), DT, &config);

        assert_eq!(report.outcome, StepOutcome::Low);
        assert!(!report.ground.is_grounded);
        assert!((position.x - 0.56).abs() < 1e-4, "x={}", position.x);
        assert!((position.y - 0.015).abs() < 1e-6);
    }
}
