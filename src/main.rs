//! Ripple Harbor headless runner
//!
//! Drives the simulation with a seeded autopilot that taps behind the boat to
//! push it through the course, then prints a JSON summary.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use ripple_harbor::sim::{FixedStepper, GateEvent, HarborState, default_course};
use ripple_harbor::{HarborConfig, SeaState, to_plane};

/// How far behind the boat the autopilot taps
const TAP_DISTANCE: f32 = 1.5;
/// Random scatter added to each tap
const TAP_JITTER: f32 = 0.3;
/// Lead-in distance before and after a gate
const GATE_LEAD: f32 = 2.5;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON tuning file (sea state defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "moderate")]
    sea_state: String,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Rendered frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Frames between autopilot taps
    #[arg(long, default_value_t = 60)]
    tap_every: u32,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    sea_state: &'static str,
    ticks: u64,
    sim_time: f32,
    /// Taps that started a ripple
    taps: u32,
    /// Taps dropped by the ripple cooldown
    taps_rejected: u32,
    passed_correct: u32,
    passed_wrong: u32,
    gates_passed: usize,
    gates_total: usize,
    all_gates_passed: bool,
    final_position: [f32; 3],
}

/// Pick a tap point behind the boat, relative to the next gate still to pass
fn autopilot_tap(state: &HarborState, rng: &mut Pcg32) -> Option<Vec2> {
    let gate = state.gates.iter().find(|g| !g.detector.has_passed())?;
    let geometry = gate.detector.geometry();
    let boat = state.player().state.position;

    // Line up on the approach side first, then drive through
    let target = if geometry.projection(boat) < 0.0 {
        geometry.center + geometry.forward * GATE_LEAD
    } else {
        geometry.center - geometry.forward * GATE_LEAD
    };

    let heading = to_plane(target - boat).normalize_or_zero();
    let jitter = Vec2::new(
        rng.random_range(-TAP_JITTER..TAP_JITTER),
        rng.random_range(-TAP_JITTER..TAP_JITTER),
    );
    Some(to_plane(boat) - heading * TAP_DISTANCE + jitter)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !(args.fps > 0.0) {
        eprintln!("Error: fps must be positive, got {}", args.fps);
        std::process::exit(1);
    }

    let Some(preset) = SeaState::from_str(&args.sea_state) else {
        eprintln!("Error: unknown sea state '{}' (calm, moderate, rough)", args.sea_state);
        std::process::exit(1);
    };

    let config = match &args.config {
        Some(path) => match HarborConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: could not load {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => HarborConfig::from_sea_state(preset),
    };

    let mut state = match HarborState::new(config, &default_course()) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Error: invalid harbor configuration: {err}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Ripple Harbor starting: seed {}, {} frames at {} fps",
        args.seed,
        args.frames,
        args.fps
    );

    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut stepper = FixedStepper::new();
    let frame_dt = 1.0 / args.fps;
    let mut summary = RunSummary {
        seed: args.seed,
        sea_state: preset.as_str(),
        gates_total: state.gates.len(),
        ..Default::default()
    };

    for frame in 0..args.frames {
        let tap = if args.tap_every > 0 && frame % args.tap_every == 0 {
            autopilot_tap(&state, &mut rng)
        } else {
            None
        };
        let outcome = stepper.advance(&mut state, tap, frame_dt);
        if outcome.ripple_spawned {
            summary.taps += 1;
        } else if tap.is_some() {
            summary.taps_rejected += 1;
        }

        for event in outcome.events {
            match event {
                GateEvent::PassedCorrect(_) => summary.passed_correct += 1,
                GateEvent::PassedWrong(_) => summary.passed_wrong += 1,
                GateEvent::Reset(_) => {}
            }
        }

        if state.all_gates_passed() {
            log::info!("All gates passed after {:.1}s", state.time);
            break;
        }
    }

    summary.ticks = state.time_ticks;
    summary.sim_time = state.time;
    summary.gates_passed = state.passed_count();
    summary.all_gates_passed = state.all_gates_passed();
    summary.final_position = state.player().state.position.to_array();

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize run summary: {err}"),
    }
}
