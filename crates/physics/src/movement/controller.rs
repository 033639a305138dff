//! Character motor.
//!
//! This is the per-tick entry point for character movement. It pulls input
//! from an [`InputSource`], moves the [`Body`] through the collision world
//! and publishes a [`MotorSnapshot`] for presentation code.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionBackend, CollisionQuery, Hull};

use super::config::{ConfigError, MovementConfig};
use super::crouch::has_standing_headroom;
use super::ground::{classify_ground, GroundContact};
use super::link::{CameraLink, InputSource, TickInput};
use super::shaper::{accelerate, apply_friction};
use super::slide_move::{collide_and_slide, step_slide_move, SlideReport, StepOutcome, StepReport};
use super::state::{Body, MotorSnapshot, MovementMode, MovementState};
use super::stuck::resolve_stuck;

/// Spawn probes start this far above the requested point.
const SPAWN_PROBE_ABOVE: f32 = 1.0;

/// ... and search this far below it.
const SPAWN_PROBE_BELOW: f32 = 2.0;

/// What happened during one [`CharacterMotor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Movement is switched off; nothing moved.
    Disabled,
    /// The active mode has no movement behavior; nothing moved.
    Unimplemented(MovementMode),
    /// Standard movement ran.
    Moved(MoveSummary),
}

/// Details of a standard movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveSummary {
    /// Ground classification at the start of the move.
    pub ground: GroundContact,
    /// Translation applied to get out of overlapping geometry.
    pub unstuck: Option<Vec3>,
    /// Jump impulse was applied this tick.
    pub jumped: bool,
    /// Step result of a ground move that actually moved.
    pub step: Option<StepReport>,
    /// Resolver report of an air move.
    pub air_slide: Option<SlideReport>,
}

/// Kinematic character motor.
///
/// Owns the body and its movement state. Input and camera are injected at
/// construction; the collision world is passed to every tick so it can be
/// edited between ticks.
///
/// # Example
///
/// ```ignore
/// let mut motor = CharacterMotor::new(MovementConfig::default(), Body::default(), input, camera)?;
/// motor.spawn_at(&world, spawn_point);
///
/// // Each fixed tick:
/// motor.tick(&world, 1.0 / 50.0);
/// let snapshot = motor.snapshot();
/// ```
#[derive(Debug)]
pub struct CharacterMotor<I, C> {
    config: MovementConfig,
    body: Body,
    state: MovementState,
    input: I,
    camera: C,
    tick: u64,
    snapshot: MotorSnapshot,
}

impl<I: InputSource, C: CameraLink> CharacterMotor<I, C> {
    /// Create a motor after validating the config and body dimensions.
    pub fn new(config: MovementConfig, body: Body, input: I, camera: C) -> Result<Self, ConfigError> {
        config.validate()?;
        body.validate()?;

        let state = MovementState::default();
        let snapshot = Self::capture(0, &body, &state);
        Ok(Self {
            config,
            body,
            state,
            input,
            camera,
            tick: 0,
            snapshot,
        })
    }

    /// Place the body at a spawn point, dropping it onto any floor just
    /// below. Velocity is reset.
    pub fn spawn_at(&mut self, world: &dyn CollisionBackend, spawn: Vec3) {
        let query = self.query(world);
        let hull = self.collision_hull();

        let probe_start = spawn + Vec3::Y * SPAWN_PROBE_ABOVE;
        let sweep = query.sweep(
            hull.center(probe_start),
            hull.half_extents,
            Vec3::NEG_Y,
            SPAWN_PROBE_ABOVE + SPAWN_PROBE_BELOW,
        );

        self.body.position = if sweep.hit_something() {
            probe_start - Vec3::Y * sweep.distance
        } else {
            spawn
        };
        self.body.velocity = Vec3::ZERO;

        let ground = classify_ground(&query, self.body.position, self.body.velocity, hull, &self.config);
        self.state.is_grounded = ground.is_grounded;

        log::debug!(
            "spawned at {:?} (requested {:?}, grounded={})",
            self.body.position,
            spawn,
            ground.is_grounded
        );
        self.publish();
    }

    /// Advance movement by one fixed tick.
    pub fn tick(&mut self, world: &dyn CollisionBackend, delta_time: f32) -> TickOutcome {
        self.tick += 1;

        let outcome = if !self.state.enabled {
            TickOutcome::Disabled
        } else {
            match self.state.mode {
                MovementMode::Standard => {
                    let input = self.input.poll();
                    TickOutcome::Moved(self.standard_move(world, input, delta_time))
                }
                mode => TickOutcome::Unimplemented(mode),
            }
        };

        self.publish();
        outcome
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Hull height collision currently uses.
    pub fn current_collider_height(&self) -> f32 {
        self.state.crouch.collider_height(&self.body)
    }

    /// Eased height for presentation.
    pub fn blended_height(&self) -> f32 {
        self.state.crouch.blended_height(&self.body)
    }

    pub fn is_crouching(&self) -> bool {
        self.state.crouch.is_crouching()
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    pub fn movement_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Switch movement mode. Modes other than standard do not move the body.
    pub fn set_mode(&mut self, mode: MovementMode) {
        if mode == self.state.mode {
            return;
        }
        if mode != MovementMode::Standard {
            log::warn!("movement mode {mode:?} has no behavior; the body will not move");
        }
        self.state.mode = mode;
    }

    pub fn mode(&self) -> MovementMode {
        self.state.mode
    }

    /// State published at the end of the last tick.
    pub fn snapshot(&self) -> MotorSnapshot {
        self.snapshot
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    // ========================================================================
    // Standard movement
    // ========================================================================

    fn standard_move(&mut self, world: &dyn CollisionBackend, input: TickInput, delta_time: f32) -> MoveSummary {
        let jumped = input.jump_pressed && self.state.is_grounded;
        if jumped {
            self.body.velocity.y += self.config.jump_impulse;
            self.state.is_grounded = false;
            log::debug!("jump: vy={:.3}", self.body.velocity.y);
        }

        let query = self.query(world);

        let hull = self.collision_hull();
        let unstuck = resolve_stuck(&query, &mut self.body.position, hull);

        let ground = classify_ground(&query, self.body.position, self.body.velocity, hull, &self.config);
        self.state.is_grounded = ground.is_grounded;

        let wish = self.camera.rotate_by_yaw(input.wish);

        let body = &self.body;
        self.state
            .crouch
            .update(input.crouch_held, || has_standing_headroom(&query, body));
        self.state.crouch.ease(self.config.crouch_rate, delta_time);

        // Crouching may have changed the hull.
        let hull = self.collision_hull();

        let (step, air_slide) = if self.state.is_grounded {
            (self.ground_move(&query, wish, hull, delta_time), None)
        } else {
            (None, Some(self.air_move(&query, wish, hull, delta_time)))
        };

        MoveSummary {
            ground,
            unstuck,
            jumped,
            step,
            air_slide,
        }
    }

    fn ground_move(
        &mut self,
        query: &CollisionQuery<'_>,
        wish: Vec3,
        hull: Hull,
        delta_time: f32,
    ) -> Option<StepReport> {
        let (move_speed, friction, acceleration) = self.config.ground_params(self.is_crouching());

        let mut velocity = self.body.velocity;
        velocity.y = 0.0;
        velocity = apply_friction(velocity, friction, delta_time);
        velocity = accelerate(velocity, wish, acceleration, move_speed, delta_time);

        let speed = velocity.length();
        if speed > move_speed {
            velocity *= move_speed / speed;
        }
        self.body.velocity = velocity;

        if speed <= 0.0 {
            return None;
        }

        let report = step_slide_move(
            query,
            &mut self.body.position,
            &mut self.body.velocity,
            hull,
            delta_time,
            &self.config,
        );

        // Grounded from here on only if the stepped path found ground.
        self.state.is_grounded = report.ground.is_grounded;

        if let StepOutcome::Stepped { height_delta } = report.outcome {
            self.camera.notify_step(height_delta);
        }
        Some(report)
    }

    fn air_move(&mut self, query: &CollisionQuery<'_>, wish: Vec3, hull: Hull, delta_time: f32) -> SlideReport {
        let half_gravity = self.config.gravity * delta_time * 0.5;

        let mut velocity = accelerate(
            self.body.velocity,
            wish,
            self.config.air_acceleration,
            self.config.air_speed,
            delta_time,
        );

        // Gravity is split around the resolve for a leapfrog-style step.
        velocity.y -= half_gravity;
        let report = collide_and_slide(
            query,
            &mut self.body.position,
            &mut velocity,
            hull,
            delta_time,
            &self.config,
        );
        velocity.y -= half_gravity;

        self.body.velocity = velocity;
        report
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn query<'w>(&self, world: &'w dyn CollisionBackend) -> CollisionQuery<'w> {
        CollisionQuery::new(world, self.config.collision_mask, self.config.hit_epsilon)
    }

    fn collision_hull(&self) -> Hull {
        self.body.hull(self.current_collider_height())
    }

    fn publish(&mut self) {
        self.snapshot = Self::capture(self.tick, &self.body, &self.state);
    }

    fn capture(tick: u64, body: &Body, state: &MovementState) -> MotorSnapshot {
        let blended_height = state.crouch.blended_height(body);
        MotorSnapshot {
            tick,
            position: body.position,
            velocity: body.velocity,
            collider_height: state.crouch.collider_height(body),
            blended_height,
            eye_height: blended_height - body.forehead_margin,
            is_crouching: state.crouch.is_crouching(),
            crouch_progress: state.crouch.progress(),
            is_grounded: state.is_grounded,
            mode: state.mode,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
