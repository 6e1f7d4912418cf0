//! Fixed timestep simulation tick
//!
//! Per body, each step: accumulate buoyancy, ripple push and gravity; apply
//! the boundary clamp and yaw lock as overwrites; then integrate with
//! semi-implicit Euler. Gates are evaluated last, against the player's new
//! position.

use glam::{Quat, Vec2};

use super::body::{BodyForces, BodyKind, BodyState, FloatingBody};
use super::buoyancy::BuoyancySolver;
use super::gate::GateEvent;
use super::state::HarborState;
use crate::consts::{GRAVITY, MAX_SUBSTEPS, SIM_DT};
use crate::{from_plane, to_plane};

/// Longest frame the stepper will catch up on
const MAX_FRAME_DT: f32 = 0.1;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Water-plane position tapped this step
    pub tap: Option<Vec2>,
}

/// What one tick (or one stepped frame) produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// A tap started a ripple. False when no tap came in or the cooldown rejected it.
    pub ripple_spawned: bool,
    pub events: Vec<GateEvent>,
}

impl TickOutcome {
    fn merge(&mut self, other: TickOutcome) {
        self.ripple_spawned |= other.ripple_spawned;
        self.events.extend(other.events);
    }
}

/// Advance the harbor by one fixed timestep
pub fn tick(state: &mut HarborState, input: &TickInput, dt: f32) -> TickOutcome {
    let now = state.time;

    let ripple_spawned = match input.tap {
        Some(tap) => state.surface.ripples.spawn(tap, now),
        None => false,
    };

    let surface = &state.surface;
    let solver = &state.solver;
    let play_area = &state.play_area;

    for floater in &mut state.bodies {
        let body = &floater.body;
        let body_state = &mut floater.state;

        let mut forces = solver.solve(body, body_state, |p| surface.height(p, now));
        let push = surface.ripples.push_force(to_plane(body_state.position), now);
        forces.force += from_plane(push, 0.0);
        forces.force.y -= GRAVITY * body.mass;

        if body.kind == BodyKind::Vessel {
            let result = play_area.constrain(body_state.position);
            if result.clamped {
                body_state.position = result.position;
                body_state.linear_velocity += result.impulse / body.mass;
                log::debug!(
                    "Body {} bounced off boundary at ({:.2}, {:.2})",
                    floater.id,
                    result.position.x,
                    result.position.z
                );
            }
        }
        BuoyancySolver::apply_axis_lock(body, body_state, &mut forces);

        integrate(body, body_state, &forces, dt);
    }

    state.time += dt;
    state.time_ticks += 1;

    let player = state.player().state.position;
    let mut events = Vec::new();
    for gate in &mut state.gates {
        if let Some(event) = gate.detector.update(player) {
            log::info!("{:?} at t={:.2}", event, state.time);
            events.push(event);
        }
    }

    TickOutcome {
        ripple_spawned,
        events,
    }
}

/// Semi-implicit Euler: velocities first, then the pose from the new velocities
fn integrate(body: &FloatingBody, state: &mut BodyState, forces: &BodyForces, dt: f32) {
    state.linear_velocity += forces.force / body.mass * dt;
    state.angular_velocity += forces.torque / body.inertia * dt;

    state.position += state.linear_velocity * dt;
    let spin = Quat::from_scaled_axis(state.angular_velocity * dt);
    state.rotation = (spin * state.rotation).normalize();
}

/// Runs whole `SIM_DT` ticks out of variable-length frames
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
    /// Tap waiting for the next tick
    pending_tap: Option<Vec2>,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame. A tap is consumed by the first tick that runs.
    pub fn advance(
        &mut self,
        state: &mut HarborState,
        tap: Option<Vec2>,
        frame_dt: f32,
    ) -> TickOutcome {
        if tap.is_some() {
            self.pending_tap = tap;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut outcome = TickOutcome::default();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                tap: self.pending_tap.take(),
            };
            outcome.merge(tick(state, &input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        outcome
    }

    /// Drop any partial step (after a reset or resume)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.pending_tap = None;
    }
}
