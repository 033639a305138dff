//! Slidemove - headless demo host
//!
//! Walks a scripted character up the stair course, jumps, crouches and logs
//! what the motor reports. Pass a movement config JSON file as the first
//! argument to try different tunings.
//!
//! ```text
//! RUST_LOG=debug cargo run -- tuning.json
//! ```

use anyhow::Context;
use slidemove_game::input::ActionInput;
use slidemove_game::{Level, MovementConfig, PlayerInput, ScriptedInput, Simulation, SimulationConfig};

/// Host frame time; deliberately not a multiple of the tick length.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Frames to run.
const FRAME_COUNT: u32 = 900;

/// Log a status line every this many frames.
const REPORT_EVERY: u32 = 60;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let movement = match std::env::args().nth(1) {
        Some(path) => MovementConfig::from_json_file(&path)
            .with_context(|| format!("loading movement config from {path}"))?,
        None => MovementConfig::default(),
    };

    let config = SimulationConfig {
        movement,
        ..Default::default()
    };

    let mut simulation = Simulation::new(config, Level::stair_course(), demo_script())
        .context("building simulation")?;

    let mut ticks = 0;
    for frame in 1..=FRAME_COUNT {
        ticks += simulation.advance(FRAME_SECONDS);

        if frame % REPORT_EVERY == 0 {
            let snapshot = simulation.snapshot();
            let eye = simulation.eye_position();
            log::info!(
                "frame {frame:4} tick {:4}: pos=({:6.2}, {:5.2}, {:6.2}) speed={:5.2} grounded={} crouching={} eye_y={:.3}",
                snapshot.tick,
                snapshot.position.x,
                snapshot.position.y,
                snapshot.position.z,
                snapshot.velocity.length(),
                snapshot.is_grounded,
                snapshot.is_crouching,
                eye.y,
            );
        }
    }

    let snapshot = simulation.snapshot();
    log::info!(
        "done: {FRAME_COUNT} frames, {ticks} ticks, final position {:?}",
        snapshot.position
    );
    Ok(())
}

/// Idle, walk up the stairs, jump on the platform, crouch, stand.
fn demo_script() -> ScriptedInput {
    let forward = PlayerInput::moving(true, false, false, false);
    let forward_jump = PlayerInput {
        actions: ActionInput {
            jump: true,
            crouch: false,
        },
        ..forward
    };
    let crouch = PlayerInput {
        actions: ActionInput {
            jump: false,
            crouch: true,
        },
        ..Default::default()
    };
    let strafe = PlayerInput::moving(false, false, false, true);

    let mut script = ScriptedInput::idle();
    script.push_repeated(PlayerInput::default(), 25);
    script.push_repeated(forward, 200);
    script.push(forward_jump);
    script.push_repeated(forward, 40);
    script.push_repeated(crouch, 60);
    script.push_repeated(strafe, 50);
    script.push_repeated(PlayerInput::default(), 1);
    script
}
