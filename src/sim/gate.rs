//! Directional gate crossing detection
//!
//! Each gate watches the player's position and reports when it passes through
//! the gate line. The side the player entered the detection zone from decides
//! whether the pass counts.
//!
//! Classification needs |projection| > 1.0 but a crossing commits at 0.5, so a
//! body that enters inside the ±1.0 band and leaves within one zone visit is
//! never judged. That band is kept as is.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::consts::{GATE_CLASSIFY_DISTANCE, GATE_CROSS_DISTANCE};
use crate::error::HarborError;

/// Stable handle for a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

/// World-space layout of a gate, derived from its transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateGeometry {
    pub center: Vec3,
    pub half_width: f32,
    /// Direction a correct pass travels
    pub forward: Vec3,
    pub line_start: Vec3,
    pub line_end: Vec3,
}

impl GateGeometry {
    pub fn from_transform(center: Vec3, rotation: Quat, half_width: f32) -> Self {
        let forward = (rotation * Vec3::NEG_Z).normalize_or(Vec3::NEG_Z);
        let perp = forward.cross(Vec3::Y).normalize_or(Vec3::X) * half_width;
        Self {
            center,
            half_width,
            forward,
            line_start: center - perp,
            line_end: center + perp,
        }
    }

    /// Signed distance along the forward axis. Negative is the approach side.
    #[inline]
    pub fn projection(&self, position: Vec3) -> f32 {
        (position - self.center).dot(self.forward)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproachSide {
    #[default]
    Unknown,
    Correct,
    Wrong,
}

impl ApproachSide {
    fn classify(projection: f32) -> Self {
        if projection < -GATE_CLASSIFY_DISTANCE {
            ApproachSide::Correct
        } else if projection > GATE_CLASSIFY_DISTANCE {
            ApproachSide::Wrong
        } else {
            ApproachSide::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    pub in_zone: bool,
    pub approach_side: ApproachSide,
    /// Latched for the current zone visit
    pub crossed: bool,
    /// Latched until reset
    pub has_passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEvent {
    PassedCorrect(GateId),
    PassedWrong(GateId),
    Reset(GateId),
}

impl GateEvent {
    pub fn gate(&self) -> GateId {
        match *self {
            GateEvent::PassedCorrect(id) | GateEvent::PassedWrong(id) | GateEvent::Reset(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GateDetector {
    id: GateId,
    geometry: GateGeometry,
    detection_radius: f32,
    state: GateState,
}

impl GateDetector {
    pub fn new(
        id: GateId,
        center: Vec3,
        rotation: Quat,
        config: &GateConfig,
    ) -> Result<Self, HarborError> {
        config.validate()?;
        Ok(Self {
            id,
            geometry: GateGeometry::from_transform(center, rotation, config.half_width),
            detection_radius: config.detection_radius,
            state: GateState::default(),
        })
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn geometry(&self) -> &GateGeometry {
        &self.geometry
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn has_passed(&self) -> bool {
        self.state.has_passed
    }

    /// Move the gate. Zone tracking carries over; the next update re-evaluates it.
    pub fn set_transform(&mut self, center: Vec3, rotation: Quat) {
        self.geometry = GateGeometry::from_transform(center, rotation, self.geometry.half_width);
        log::debug!(
            "Gate {:?} moved to {:?}, forward {:?}",
            self.id,
            self.geometry.center,
            self.geometry.forward
        );
    }

    /// Advance the state machine with the tracked body's position
    pub fn update(&mut self, position: Vec3) -> Option<GateEvent> {
        let distance = position.distance(self.geometry.center);
        let projection = self.geometry.projection(position);

        if distance > self.detection_radius {
            if self.state.in_zone {
                self.state.in_zone = false;
                self.state.approach_side = ApproachSide::Unknown;
                self.state.crossed = false;
            }
            return None;
        }

        if !self.state.in_zone {
            self.state.in_zone = true;
            self.state.crossed = false;
            self.state.approach_side = ApproachSide::classify(projection);
            log::trace!(
                "Gate {:?} entered, projection {:.2}, side {:?}",
                self.id,
                projection,
                self.state.approach_side
            );
        }

        if self.state.crossed {
            return None;
        }

        match self.state.approach_side {
            ApproachSide::Correct if projection > GATE_CROSS_DISTANCE => {
                self.state.crossed = true;
                self.state.has_passed = true;
                Some(GateEvent::PassedCorrect(self.id))
            }
            ApproachSide::Wrong if projection < -GATE_CROSS_DISTANCE => {
                self.state.crossed = true;
                Some(GateEvent::PassedWrong(self.id))
            }
            _ => None,
        }
    }

    /// Clear every latch (level retry)
    pub fn reset(&mut self) -> GateEvent {
        self.state = GateState::default();
        GateEvent::Reset(self.id)
    }
}
