//! Harbor state and course layout
//!
//! Everything the fixed-step tick reads or writes lives here. Bodies are kept
//! in a Vec in creation order; the player vessel is always first.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

use super::body::{BodyKind, BodyState, FloatingBody};
use super::boundary::PlayArea;
use super::buoyancy::BuoyancySolver;
use super::gate::{GateDetector, GateEvent, GateId};
use super::surface::WaterSurface;
use crate::config::HarborConfig;
use crate::error::HarborError;

/// Where a gate sits in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatePlacement {
    pub center: Vec3,
    pub rotation: Quat,
}

impl GatePlacement {
    pub fn new(center: Vec3, rotation: Quat) -> Self {
        Self { center, rotation }
    }

    /// Upright gate facing `yaw` radians left of -Z
    pub fn facing(center: Vec3, yaw: f32) -> Self {
        Self::new(center, Quat::from_rotation_y(yaw))
    }
}

/// Three-gate slalom that fits the default play area
pub fn default_course() -> Vec<GatePlacement> {
    vec![
        GatePlacement::facing(Vec3::new(0.0, 0.0, -3.0), 0.0),
        GatePlacement::facing(Vec3::new(2.5, 0.0, -6.0), -FRAC_PI_4),
        GatePlacement::facing(Vec3::new(-1.5, 0.0, -6.5), FRAC_PI_4),
    ]
}

/// A body and its integrator state
#[derive(Debug, Clone)]
pub struct Floater {
    pub id: u32,
    pub body: FloatingBody,
    pub state: BodyState,
}

/// A gate plus the two marker floats flanking it
#[derive(Debug, Clone)]
pub struct Gate {
    pub detector: GateDetector,
    /// Indices into `HarborState::bodies` for the line_start and line_end markers
    pub markers: [usize; 2],
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct HarborState {
    pub config: HarborConfig,
    pub surface: WaterSurface,
    pub solver: BuoyancySolver,
    pub play_area: PlayArea,
    /// Sorted by id; index 0 is the player
    pub bodies: Vec<Floater>,
    pub gates: Vec<Gate>,
    pub player_start: BodyState,
    /// Simulation clock in seconds
    pub time: f32,
    pub time_ticks: u64,
    next_id: u32,
}

impl HarborState {
    /// Build a harbor with the player at the origin and one gate per placement
    pub fn new(config: HarborConfig, course: &[GatePlacement]) -> Result<Self, HarborError> {
        config.validate()?;
        let surface = WaterSurface::new(&config)?;
        let solver = BuoyancySolver::new(config.buoyancy.clone())?;
        let play_area = PlayArea::new(config.boundary.clone())?;
        let player_start = BodyState::at(Vec3::new(0.0, surface.waves.base_level(), 0.0));

        let mut state = Self {
            config,
            surface,
            solver,
            play_area,
            bodies: Vec::new(),
            gates: Vec::with_capacity(course.len()),
            player_start,
            time: 0.0,
            time_ticks: 0,
            next_id: 1,
        };

        state.spawn_body(FloatingBody::vessel(), player_start);
        for (i, placement) in course.iter().enumerate() {
            state.add_gate(GateId(i as u32), *placement)?;
        }

        log::info!(
            "Harbor ready: {} bodies, {} gates",
            state.bodies.len(),
            state.gates.len()
        );
        Ok(state)
    }

    /// Allocate a new body ID
    fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body at rest and return its index
    pub fn spawn_body(&mut self, body: FloatingBody, state: BodyState) -> usize {
        let id = self.next_body_id();
        self.bodies.push(Floater { id, body, state });
        self.bodies.len() - 1
    }

    /// Add a decorative buoy anchored where it is dropped
    pub fn spawn_buoy(&mut self, position: Vec3) -> usize {
        self.spawn_body(FloatingBody::buoy(position), BodyState::at(position))
    }

    fn add_gate(&mut self, id: GateId, placement: GatePlacement) -> Result<(), HarborError> {
        let detector =
            GateDetector::new(id, placement.center, placement.rotation, &self.config.gates)?;
        let level = self.surface.waves.base_level();
        let geometry = *detector.geometry();
        let markers = [geometry.line_start, geometry.line_end].map(|end| {
            let rest = Vec3::new(end.x, level, end.z);
            self.spawn_body(FloatingBody::marker(rest), BodyState::at(rest))
        });
        self.gates.push(Gate { detector, markers });
        Ok(())
    }

    pub fn player(&self) -> &Floater {
        &self.bodies[0]
    }

    pub fn player_mut(&mut self) -> &mut Floater {
        &mut self.bodies[0]
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.detector.id() == id)
    }

    /// Relocate a gate and re-anchor its markers to the new line endpoints
    pub fn move_gate(&mut self, id: GateId, placement: GatePlacement) -> bool {
        let level = self.surface.waves.base_level();
        let Some(gate) = self.gates.iter_mut().find(|g| g.detector.id() == id) else {
            return false;
        };
        gate.detector.set_transform(placement.center, placement.rotation);
        let geometry = *gate.detector.geometry();
        for (index, end) in gate.markers.into_iter().zip([geometry.line_start, geometry.line_end]) {
            self.bodies[index].body.anchor = Some(Vec3::new(end.x, level, end.z));
        }
        true
    }

    pub fn all_gates_passed(&self) -> bool {
        self.gates.iter().all(|g| g.detector.has_passed())
    }

    pub fn passed_count(&self) -> usize {
        self.gates.iter().filter(|g| g.detector.has_passed()).count()
    }

    /// Level retry: clear ripples and gate latches, return floats to their rests
    pub fn reset(&mut self) -> Vec<GateEvent> {
        self.surface.ripples.clear();
        self.time = 0.0;
        self.time_ticks = 0;

        let player_start = self.player_start;
        for floater in &mut self.bodies {
            floater.state = match (floater.body.kind, floater.body.anchor) {
                (BodyKind::Vessel, _) => player_start,
                (_, Some(anchor)) => BodyState::at(anchor),
                (_, None) => BodyState::at(floater.state.position),
            };
        }

        let events: Vec<GateEvent> = self.gates.iter_mut().map(|g| g.detector.reset()).collect();
        log::info!("Harbor reset ({} gates)", events.len());
        events
    }
}
