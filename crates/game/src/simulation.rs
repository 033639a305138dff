//! Fixed-step simulation loop.
//!
//! The host hands the simulation real frame times; the simulation turns
//! them into a whole number of fixed movement ticks and carries the
//! remainder over to the next frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slidemove_physics::movement::{
    Body, CharacterMotor, ConfigError, InputSource, MotorSnapshot, MovementConfig, TickOutcome,
};

use crate::camera::{CameraConfig, YawCamera};
use crate::input::ScriptedInput;
use crate::level::Level;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Most ticks a single [`Simulation::advance`] call may run. Time past
    /// this is dropped.
    pub max_ticks_per_advance: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Body dimensions.
    pub body: Body,

    /// Camera tunables.
    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            max_ticks_per_advance: 5,
            movement: MovementConfig::default(),
            body: Body::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// The motor type the simulation drives.
pub type Motor<I> = CharacterMotor<I, YawCamera>;

/// A level, one character and a fixed-step clock.
///
/// Generic over where input comes from; [`ScriptedInput`] is the default.
#[derive(Debug)]
pub struct Simulation<I = ScriptedInput> {
    /// Number of ticks run.
    pub frame: u64,

    /// Simulation configuration.
    config: SimulationConfig,

    /// Current level.
    level: Level,

    /// The character.
    motor: Motor<I>,

    /// Frame time not yet consumed by ticks.
    accumulator: f32,
}

impl<I: InputSource> Simulation<I> {
    /// Create a simulation and spawn the character at the level's first
    /// spawn point (or the origin).
    pub fn new(config: SimulationConfig, level: Level, input: I) -> Result<Self, ConfigError> {
        if config.tick_rate == 0 {
            return Err(ConfigError::ZeroBound { field: "tick_rate" });
        }
        if config.max_ticks_per_advance == 0 {
            return Err(ConfigError::ZeroBound {
                field: "max_ticks_per_advance",
            });
        }

        let spawn = level.player_spawn(0).copied();
        let mut camera = YawCamera::new(spawn.map_or(0.0, |s| s.yaw));
        camera.config = config.camera;

        let mut motor = CharacterMotor::new(config.movement.clone(), config.body.clone(), input, camera)?;
        motor.spawn_at(&level.collision, spawn.map_or(Vec3::ZERO, |s| s.position));

        log::info!(
            "simulation ready: level '{}', {} Hz, spawn {:?}",
            level.name,
            config.tick_rate,
            motor.body().position
        );

        Ok(Self {
            frame: 0,
            config,
            level,
            motor,
            accumulator: 0.0,
        })
    }

    /// Feed a frame's worth of real time and run the ticks it covers.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_seconds: f32) -> u32 {
        let delta_time = self.config.delta_time();
        self.accumulator += frame_seconds.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= delta_time {
            if ticks == self.config.max_ticks_per_advance {
                log::warn!(
                    "simulation fell behind, dropping {:.3}s",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.tick();
            self.accumulator -= delta_time;
            ticks += 1;
        }
        ticks
    }

    /// Run exactly one tick.
    pub fn tick(&mut self) -> TickOutcome {
        let delta_time = self.config.delta_time();
        let outcome = self.motor.tick(&self.level.collision, delta_time);
        self.motor.camera_mut().advance(delta_time);
        self.frame += 1;

        log::trace!("tick {}: {:?}", self.frame, outcome);
        outcome
    }

    /// How far the clock is between the last tick and the next, in 0..1.
    pub fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / self.config.delta_time()).clamp(0.0, 1.0)
    }

    /// State published by the last tick.
    pub fn snapshot(&self) -> MotorSnapshot {
        self.motor.snapshot()
    }

    /// Eye position including step smoothing.
    pub fn eye_position(&self) -> Vec3 {
        self.motor.camera().eye_position(&self.motor.snapshot())
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Mutable level access, for editing geometry between ticks.
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn motor(&self) -> &Motor<I> {
        &self.motor
    }

    pub fn motor_mut(&mut self) -> &mut Motor<I> {
        &mut self.motor
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use slidemove_physics::movement::{MovementMode, TickInput};

    use super::*;
    use crate::input::PlayerInput;

    fn simulation(level: Level, input: ScriptedInput) -> Simulation {
        Simulation::new(SimulationConfig::default(), level, input).expect("valid config")
    }

    #[test]
    fn test_simulation_creation() {
        let sim = simulation(Level::flat_ground(), ScriptedInput::idle());
        assert_eq!(sim.frame, 0);
        assert!(sim.motor().is_grounded());
        assert!((sim.snapshot().position.y - 0.015).abs() < 1e-3);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let config = SimulationConfig {
            tick_rate: 0,
            ..Default::default()
        };
        let result = Simulation::new(config, Level::flat_ground(), ScriptedInput::idle());
        assert!(matches!(result, Err(ConfigError::ZeroBound { field: "tick_rate" })));
    }

    #[test]
    fn test_accumulator_runs_whole_ticks() {
        let mut sim = simulation(Level::flat_ground(), ScriptedInput::idle());

        assert_eq!(sim.advance(0.05), 2);
        assert_eq!(sim.frame, 2);
        assert!((sim.interpolation_alpha() - 0.5).abs() < 1e-3);

        // The leftover 10 ms plus 15 ms covers one more tick.
        assert_eq!(sim.advance(0.015), 1);
        assert_eq!(sim.frame, 3);

        assert_eq!(sim.advance(0.001), 0);
        assert_eq!(sim.frame, 3);
    }

    #[test]
    fn test_spiral_guard_drops_excess_time() {
        let mut sim = simulation(Level::flat_ground(), ScriptedInput::idle());

        assert_eq!(sim.advance(1.0), 5);
        assert_eq!(sim.interpolation_alpha(), 0.0);
        assert_eq!(sim.advance(0.0), 0);
    }

    #[test]
    fn test_movement_input() {
        let forward = PlayerInput::moving(true, false, false, false);
        let mut sim = simulation(Level::flat_ground(), ScriptedInput::new([forward]));
        let start = sim.snapshot().position;

        for _ in 0..60 {
            sim.tick();
        }

        let distance = (sim.snapshot().position - start).length();
        assert!(distance > 1.0, "Player should have moved, distance={}", distance);
    }

    #[test]
    fn test_climbs_the_stair_course() {
        let forward = PlayerInput::moving(true, false, false, false);
        let mut sim = simulation(Level::stair_course(), ScriptedInput::new([forward]));

        for _ in 0..250 {
            sim.tick();
        }

        let snapshot = sim.snapshot();
        // On the platform, stopped by the wall.
        assert!((snapshot.position.y - (1.5 + 0.015)).abs() < 0.02, "y={}", snapshot.position.y);
        assert!(snapshot.position.z > 12.0 && snapshot.position.z + 0.5 <= 14.0 + 1e-3);
        assert!(snapshot.is_grounded);
    }

    #[test]
    fn test_eye_follows_crouch() {
        let crouch = PlayerInput {
            actions: crate::input::ActionInput {
                jump: false,
                crouch: true,
            },
            ..Default::default()
        };
        let mut sim = simulation(Level::flat_ground(), ScriptedInput::new([crouch]));
        let standing_eye = sim.eye_position().y;

        for _ in 0..50 {
            sim.tick();
        }

        let snapshot = sim.snapshot();
        assert!(snapshot.is_crouching);
        assert_eq!(snapshot.crouch_progress, 0.0);
        assert!((standing_eye - sim.eye_position().y - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_unimplemented_mode_is_reported() {
        let mut sim = simulation(Level::flat_ground(), ScriptedInput::idle());
        sim.motor_mut().set_mode(MovementMode::Climbing);

        assert_eq!(sim.tick(), TickOutcome::Unimplemented(MovementMode::Climbing));
        assert_eq!(sim.frame, 1);
    }

    /// Input source that strafes right every tick.
    struct Strafe;

    impl InputSource for Strafe {
        fn poll(&mut self) -> TickInput {
            TickInput {
                wish: Vec2::X,
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_custom_input_source() {
        let mut sim =
            Simulation::new(SimulationConfig::default(), Level::flat_ground(), Strafe).expect("valid config");

        for _ in 0..25 {
            sim.tick();
        }

        let position = sim.snapshot().position;
        assert!(position.x > 1.0, "x={}", position.x);
        assert!(position.z.abs() < 1e-4);
        assert_eq!(sim.motor().tick_count(), 25);
    }

    #[test]
    fn test_determinism() {
        // Run simulation twice with same inputs - should get same results
        let frames: Vec<_> = (0..100)
            .map(|i| {
                let mut input = PlayerInput::moving(i % 2 == 0, false, false, i % 3 == 0);
                input.actions.jump = i % 10 == 0;
                input
            })
            .collect();

        let run = || {
            let mut sim = simulation(Level::stair_course(), ScriptedInput::new(frames.clone()));
            for _ in 0..frames.len() {
                sim.tick();
            }
            sim.snapshot()
        };

        assert_eq!(run(), run());
    }
}
