//! Floating bodies and their hull probes
//!
//! Body frame convention: forward is -Z, starboard is +X, up is +Y.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::error::HarborError;

/// Probes closer than this to a section axis belong to neither side
const SECTION_EPS: f32 = 1e-3;

/// Vessel hull probe depth below the centre of mass
const HULL_KEEL: f32 = -0.2;
const HULL_HALF_LENGTH: f32 = 1.2;
const HULL_HALF_BEAM: f32 = 0.5;

/// What a body is, which decides the forces it gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The player's boat: multi-probe, wave-following, bounded
    Vessel,
    /// Decorative float held near an anchor
    Buoy,
    /// Gate flag: anchored, cannot yaw
    Marker,
}

/// Which part of the hull a probe samples
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeSection {
    pub front: bool,
    pub rear: bool,
    pub starboard: bool,
    pub port: bool,
}

impl ProbeSection {
    pub fn of(offset: Vec3) -> Self {
        Self {
            front: offset.z < -SECTION_EPS,
            rear: offset.z > SECTION_EPS,
            starboard: offset.x > SECTION_EPS,
            port: offset.x < -SECTION_EPS,
        }
    }
}

/// Static description of a floating body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingBody {
    pub kind: BodyKind,
    /// Local-frame sample points, in a fixed order
    probes: Vec<Vec3>,
    pub mass: f32,
    /// Scalar moment of inertia (bodies are treated as roughly spherical)
    pub inertia: f32,
    /// Horizontal rest point for anchored bodies
    pub anchor: Option<Vec3>,
    /// Zero yaw velocity after forces are computed
    pub lock_yaw: bool,
}

impl FloatingBody {
    pub fn new(
        kind: BodyKind,
        probes: Vec<Vec3>,
        mass: f32,
        inertia: f32,
    ) -> Result<Self, HarborError> {
        if probes.is_empty() {
            return Err(HarborError::EmptyProbeSet);
        }
        if !(mass > 0.0) {
            return Err(HarborError::InvalidMass(mass));
        }
        if !(inertia > 0.0) {
            return Err(HarborError::InvalidInertia(inertia));
        }
        Ok(Self {
            kind,
            probes,
            mass,
            inertia,
            anchor: None,
            lock_yaw: kind == BodyKind::Marker,
        })
    }

    /// Player boat with eight hull probes (bow, quarters, beams, stern)
    pub fn vessel() -> Self {
        let (l, b, k) = (HULL_HALF_LENGTH, HULL_HALF_BEAM, HULL_KEEL);
        let q = l * 2.0 / 3.0;
        let probes = vec![
            Vec3::new(0.0, k, -l),          // bow
            Vec3::new(-b * 0.7, k, -q),     // port bow quarter
            Vec3::new(b * 0.7, k, -q),      // starboard bow quarter
            Vec3::new(-b, k, 0.0),          // port beam
            Vec3::new(b, k, 0.0),           // starboard beam
            Vec3::new(-b * 0.7, k, q),      // port stern quarter
            Vec3::new(b * 0.7, k, q),       // starboard stern quarter
            Vec3::new(0.0, k, l),           // stern
        ];
        Self {
            kind: BodyKind::Vessel,
            probes,
            mass: 2.0,
            inertia: 1.0,
            anchor: None,
            lock_yaw: false,
        }
    }

    /// Single-probe float anchored at a world position
    pub fn buoy(anchor: Vec3) -> Self {
        Self {
            kind: BodyKind::Buoy,
            probes: vec![Vec3::ZERO],
            mass: 0.5,
            inertia: 0.2,
            anchor: Some(anchor),
            lock_yaw: false,
        }
    }

    /// Gate flag anchored at one end of the gate line
    pub fn marker(anchor: Vec3) -> Self {
        Self {
            kind: BodyKind::Marker,
            probes: vec![Vec3::ZERO],
            mass: 0.5,
            inertia: 0.2,
            anchor: Some(anchor),
            lock_yaw: true,
        }
    }

    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn probes(&self) -> &[Vec3] {
        &self.probes
    }

    pub fn is_multi_probe(&self) -> bool {
        self.probes.len() > 1
    }
}

/// Dynamic state owned by the integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl BodyState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Starboard axis in world space
    #[inline]
    pub fn lateral(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Stern-pointing axis in world space
    #[inline]
    pub fn longitudinal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Probe offset rotated into world space, relative to the centre of mass
    #[inline]
    pub fn probe_offset(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

/// Force and torque accumulated for one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyForces {
    pub force: Vec3,
    pub torque: Vec3,
}

impl BodyForces {
    pub const ZERO: Self = Self {
        force: Vec3::ZERO,
        torque: Vec3::ZERO,
    };

    /// Apply a force at an offset from the centre of mass
    #[inline]
    pub fn add_at(&mut self, force: Vec3, offset: Vec3) {
        self.force += force;
        self.torque += offset.cross(force);
    }
}

impl Add for BodyForces {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
        }
    }
}

impl AddAssign for BodyForces {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_vessel_probe_sections() {
        let vessel = FloatingBody::vessel();
        assert_eq!(vessel.probes().len(), 8);
        let sections: Vec<_> = vessel.probes().iter().map(|p| ProbeSection::of(*p)).collect();
        assert_eq!(sections.iter().filter(|s| s.front).count(), 3);
        assert_eq!(sections.iter().filter(|s| s.rear).count(), 3);
        assert_eq!(sections.iter().filter(|s| s.starboard).count(), 3);
        assert_eq!(sections.iter().filter(|s| s.port).count(), 3);
        // Bow is dead ahead
        assert!(sections[0].front && !sections[0].port && !sections[0].starboard);
    }

    #[test]
    fn test_empty_probe_set_rejected() {
        let err = FloatingBody::new(BodyKind::Buoy, Vec::new(), 1.0, 1.0);
        assert!(matches!(err, Err(HarborError::EmptyProbeSet)));
        let err = FloatingBody::new(BodyKind::Buoy, vec![Vec3::ZERO], 0.0, 1.0);
        assert!(matches!(err, Err(HarborError::InvalidMass(_))));
    }

    #[test]
    fn test_bad_inertia_is_not_blamed_on_mass() {
        let err = FloatingBody::new(BodyKind::Buoy, vec![Vec3::ZERO], 1.0, -0.5);
        assert!(matches!(err, Err(HarborError::InvalidInertia(i)) if i == -0.5));
    }

    #[test]
    fn test_marker_locks_yaw() {
        let marker = FloatingBody::new(BodyKind::Marker, vec![Vec3::ZERO], 1.0, 1.0).unwrap();
        assert!(marker.lock_yaw);
        assert!(FloatingBody::marker(Vec3::X).lock_yaw);
        assert!(!FloatingBody::buoy(Vec3::X).lock_yaw);
    }

    #[test]
    fn test_state_axes_follow_rotation() {
        let state = BodyState::at(Vec3::ZERO).with_rotation(Quat::from_rotation_y(FRAC_PI_2));
        // Quarter turn left: forward (-Z) swings to -X
        assert!((state.forward() - Vec3::NEG_X).length() < 1e-5);
        assert!((state.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_force_at_offset_makes_torque() {
        let mut forces = BodyForces::ZERO;
        forces.add_at(Vec3::Y, Vec3::X);
        assert_eq!(forces.force, Vec3::Y);
        // Lifting the starboard side rolls toward port (+Z torque)
        assert_eq!(forces.torque, Vec3::Z);
    }
}
