//! Probe-based buoyancy and stability
//!
//! The solver never integrates. It samples the water under each hull probe,
//! sums forces and torques, and leaves applying them to the integrator.
//!
//! Per body:
//! - submersion lift at each probe, plus a weak pull-down for probes just above water
//! - anti-capsize torque once the hull leans past ~18°
//! - wave-following pitch/roll from paired probe sections (multi-probe hulls)
//! - a hard tilt limit on top of the soft alignment
//! - depth-scaled linear and angular drag
//! - a deadzoned spring back to the anchor for anchored floats

use glam::{Vec2, Vec3};

use super::body::{BodyForces, BodyState, FloatingBody, ProbeSection};
use crate::config::BuoyancyConfig;
use crate::consts::{ABOVE_WATER_CUTOFF, ANCHOR_DEADZONE, STABILITY_DOT_THRESHOLD};
use crate::error::HarborError;
use crate::to_plane;

/// Section averages of probe depth for a multi-probe hull
#[derive(Debug, Clone, Copy, Default)]
struct SectionDepths {
    front: (f32, u32),
    rear: (f32, u32),
    starboard: (f32, u32),
    port: (f32, u32),
}

impl SectionDepths {
    fn record(&mut self, section: ProbeSection, depth: f32) {
        let slots = [
            (section.front, &mut self.front),
            (section.rear, &mut self.rear),
            (section.starboard, &mut self.starboard),
            (section.port, &mut self.port),
        ];
        for (member, (sum, count)) in slots {
            if member {
                *sum += depth;
                *count += 1;
            }
        }
    }

    fn average((sum, count): (f32, u32)) -> f32 {
        if count == 0 { 0.0 } else { sum / count as f32 }
    }

    /// Positive when the bow sits deeper than the stern
    fn pitch_error(&self) -> f32 {
        Self::average(self.front) - Self::average(self.rear)
    }

    /// Positive when the starboard side sits deeper than port
    fn roll_error(&self) -> f32 {
        Self::average(self.starboard) - Self::average(self.port)
    }
}

#[derive(Debug, Clone)]
pub struct BuoyancySolver {
    config: BuoyancyConfig,
    max_tilt: f32,
}

impl BuoyancySolver {
    pub fn new(config: BuoyancyConfig) -> Result<Self, HarborError> {
        config.validate()?;
        let max_tilt = config.max_tilt_degrees.to_radians();
        Ok(Self { config, max_tilt })
    }

    pub fn config(&self) -> &BuoyancyConfig {
        &self.config
    }

    /// Forces and torques for one body this step.
    ///
    /// `water_height` maps a water-plane position to the surface height.
    pub fn solve<F>(&self, body: &FloatingBody, state: &BodyState, water_height: F) -> BodyForces
    where
        F: Fn(Vec2) -> f32,
    {
        let cfg = &self.config;
        let multi = body.is_multi_probe();
        let per_probe = if multi {
            cfg.buoyancy_force * 0.5
        } else {
            cfg.buoyancy_force
        };

        let mut out = BodyForces::ZERO;
        let mut sections = SectionDepths::default();
        let mut submerged_sum = 0.0;

        for &local in body.probes() {
            let offset = state.probe_offset(local);
            let world = state.position + offset;
            let depth = water_height(to_plane(world)) - world.y;

            if depth > 0.0 {
                out.add_at(Vec3::Y * depth * per_probe, offset);
                submerged_sum += depth;
            } else if depth < 0.0 && -depth < ABOVE_WATER_CUTOFF {
                // depth is negative, so this points down
                out.add_at(Vec3::Y * depth * cfg.above_water_force, offset);
            }

            if multi {
                sections.record(ProbeSection::of(local), depth);
            }
        }

        out.torque += self.stability_torque(state);

        if multi {
            out.torque += state.lateral() * sections.pitch_error() * cfg.alignment_force;
            out.torque += state.longitudinal() * sections.roll_error() * cfg.alignment_force;
        }

        let drag_scale = if multi {
            submerged_sum / body.probes().len() as f32
        } else {
            1.0
        };
        out.force -= state.linear_velocity * cfg.linear_drag * drag_scale;
        out.torque -= state.angular_velocity * cfg.angular_drag * drag_scale;

        if !multi {
            if let Some(anchor) = body.anchor {
                out.force += self.anchor_force(state.position, anchor);
            }
        }

        out
    }

    /// Anti-capsize torque plus the hard tilt clamp
    fn stability_torque(&self, state: &BodyState) -> Vec3 {
        let up = state.up();
        let dot = up.dot(Vec3::Y).clamp(-1.0, 1.0);
        // Fully inverted hulls have no unique axis; roll about the beam
        let axis = up.cross(Vec3::Y).normalize_or(state.longitudinal());

        let mut torque = Vec3::ZERO;
        if dot < STABILITY_DOT_THRESHOLD {
            torque += axis * self.config.stability_force * (1.0 - dot);
        }

        let tilt = dot.acos();
        if tilt > self.max_tilt {
            torque += axis * self.config.tilt_limit_force * (tilt - self.max_tilt);
        }
        torque
    }

    /// Horizontal spring toward the anchor outside a small deadzone
    fn anchor_force(&self, position: Vec3, anchor: Vec3) -> Vec3 {
        let displacement = Vec3::new(position.x - anchor.x, 0.0, position.z - anchor.z);
        if displacement.length() <= ANCHOR_DEADZONE {
            return Vec3::ZERO;
        }
        -displacement * self.config.anchor_strength
    }

    /// Zero yaw velocity and yaw torque on bodies that must not spin.
    /// Pitch and roll stay free.
    pub fn apply_axis_lock(body: &FloatingBody, state: &mut BodyState, forces: &mut BodyForces) {
        if body.lock_yaw {
            state.angular_velocity.y = 0.0;
            forces.torque.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    fn solver() -> BuoyancySolver {
        BuoyancySolver::new(BuoyancyConfig::default()).unwrap()
    }

    fn flat(level: f32) -> impl Fn(Vec2) -> f32 {
        move |_| level
    }

    #[test]
    fn test_surface_probe_gives_no_lift() {
        let body = FloatingBody::buoy(Vec3::ZERO);
        let state = BodyState::at(Vec3::ZERO);
        let out = solver().solve(&body, &state, flat(0.0));
        assert_eq!(out.force.y, 0.0);
    }

    #[test]
    fn test_single_probe_lift_is_full_strength() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::ZERO);
        let state = BodyState::at(Vec3::new(0.0, -0.5, 0.0));
        let out = s.solve(&body, &state, flat(0.0));
        assert!((out.force.y - 0.5 * s.config().buoyancy_force).abs() < 1e-5);
        assert_eq!(out.torque, Vec3::ZERO);
    }

    #[test]
    fn test_multi_probe_lift_is_halved() {
        let s = solver();
        let body = FloatingBody::vessel();
        // Keel probes at y = -0.2; sink them 0.3 below the surface
        let state = BodyState::at(Vec3::new(0.0, -0.1, 0.0));
        let out = s.solve(&body, &state, flat(0.0));
        let expected = 8.0 * 0.3 * s.config().buoyancy_force * 0.5;
        assert!((out.force.y - expected).abs() < 1e-3);
        // Level hull on flat water: symmetric, no torque
        assert!(out.torque.length() < 1e-4);
    }

    #[test]
    fn test_above_water_pull_has_cutoff() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::ZERO);

        let near = s.solve(&body, &BodyState::at(Vec3::new(0.0, 1.0, 0.0)), flat(0.0));
        assert!((near.force.y + 1.0 * s.config().above_water_force).abs() < 1e-5);

        let far = s.solve(&body, &BodyState::at(Vec3::new(0.0, 2.0, 0.0)), flat(0.0));
        assert_eq!(far.force.y, 0.0);
    }

    #[test]
    fn test_tilted_body_gets_righting_torque() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::ZERO);
        // Roll 45° about +Z: up leans toward -X
        let state = BodyState::at(Vec3::ZERO).with_rotation(Quat::from_rotation_z(FRAC_PI_4));
        let out = s.solve(&body, &state, flat(0.0));
        // Correction rotates back around -Z
        assert!(out.torque.z < 0.0);
        assert!(out.torque.x.abs() < 1e-5);
    }

    #[test]
    fn test_hard_tilt_limit_adds_torque() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::ZERO);
        let soft = s.solve(
            &body,
            &BodyState::at(Vec3::ZERO).with_rotation(Quat::from_rotation_x(25f32.to_radians())),
            flat(0.0),
        );
        let hard = s.solve(
            &body,
            &BodyState::at(Vec3::ZERO).with_rotation(Quat::from_rotation_x(40f32.to_radians())),
            flat(0.0),
        );

        let dot25 = 25f32.to_radians().cos();
        let soft_expected = s.config().stability_force * (1.0 - dot25);
        assert!((soft.torque.length() - soft_expected).abs() < 1e-4);

        let dot40 = 40f32.to_radians().cos();
        let hard_expected = s.config().stability_force * (1.0 - dot40)
            + s.config().tilt_limit_force * 10f32.to_radians();
        assert!((hard.torque.length() - hard_expected).abs() < 1e-3);
    }

    #[test]
    fn test_small_tilt_has_no_stability_torque() {
        let body = FloatingBody::buoy(Vec3::ZERO);
        let state = BodyState::at(Vec3::ZERO).with_rotation(Quat::from_rotation_x(0.1));
        let out = solver().solve(&body, &state, flat(0.0));
        assert_eq!(out.torque, Vec3::ZERO);
    }

    #[test]
    fn test_vessel_pitches_with_wave_slope() {
        let s = solver();
        let body = FloatingBody::vessel();
        let state = BodyState::at(Vec3::new(0.0, -0.1, 0.0));
        // Water rises toward the bow (-Z)
        let out = s.solve(&body, &state, |p: Vec2| -0.1 * p.y);
        // Bow deeper: both lift and alignment raise it, positive torque about +X
        assert!(out.torque.x > 0.0);
        assert!(out.torque.z.abs() < 1e-4);
    }

    #[test]
    fn test_vessel_rolls_with_wave_slope() {
        let body = FloatingBody::vessel();
        let state = BodyState::at(Vec3::new(0.0, -0.1, 0.0));
        // Water higher on starboard (+X)
        let out = solver().solve(&body, &state, |p: Vec2| 0.1 * p.x);
        assert!(out.torque.z > 0.0);
        assert!(out.torque.x.abs() < 1e-4);
    }

    #[test]
    fn test_drag_opposes_motion() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::ZERO).with_anchor(Vec3::ZERO);
        let mut state = BodyState::at(Vec3::ZERO);
        state.linear_velocity = Vec3::new(2.0, 0.0, 0.0);
        state.angular_velocity = Vec3::new(0.0, 1.0, 0.0);
        let out = s.solve(&body, &state, flat(0.0));
        assert!((out.force.x + 2.0 * s.config().linear_drag).abs() < 1e-5);
        assert!((out.torque.y + s.config().angular_drag).abs() < 1e-5);
    }

    #[test]
    fn test_vessel_drag_scales_with_submersion() {
        let s = solver();
        let body = FloatingBody::vessel();
        let mut dry = BodyState::at(Vec3::new(0.0, 0.5, 0.0));
        dry.linear_velocity = Vec3::X;
        let out = s.solve(&body, &dry, flat(0.0));
        assert_eq!(out.force.x, 0.0);

        let mut wet = BodyState::at(Vec3::new(0.0, -0.3, 0.0));
        wet.linear_velocity = Vec3::X;
        let out = s.solve(&body, &wet, flat(0.0));
        assert!((out.force.x + s.config().linear_drag * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_anchor_deadzone() {
        let s = solver();
        let body = FloatingBody::buoy(Vec3::new(5.0, 0.0, 5.0));

        let inside = s.solve(&body, &BodyState::at(Vec3::new(5.05, 0.0, 5.0)), flat(0.0));
        assert_eq!(inside.force.x, 0.0);

        let outside = s.solve(&body, &BodyState::at(Vec3::new(6.0, 0.0, 5.0)), flat(0.0));
        assert!((outside.force.x + s.config().anchor_strength).abs() < 1e-5);
        assert_eq!(outside.force.z, 0.0);
    }

    #[test]
    fn test_axis_lock_only_clears_yaw() {
        let marker = FloatingBody::marker(Vec3::ZERO);
        let mut state = BodyState::at(Vec3::ZERO);
        state.angular_velocity = Vec3::new(0.3, 2.0, -0.4);
        let mut forces = BodyForces {
            force: Vec3::ZERO,
            torque: Vec3::new(1.0, -4.0, 1.0),
        };
        BuoyancySolver::apply_axis_lock(&marker, &mut state, &mut forces);
        assert_eq!(state.angular_velocity, Vec3::new(0.3, 0.0, -0.4));
        assert_eq!(forces.torque, Vec3::new(1.0, 0.0, 1.0));

        let buoy = FloatingBody::buoy(Vec3::ZERO);
        state.angular_velocity = Vec3::new(0.0, 2.0, 0.0);
        forces.torque = Vec3::Y;
        BuoyancySolver::apply_axis_lock(&buoy, &mut state, &mut forces);
        assert_eq!(state.angular_velocity.y, 2.0);
        assert_eq!(forces.torque, Vec3::Y);
    }

    #[test]
    fn test_invalid_max_tilt_rejected() {
        let config = BuoyancyConfig {
            max_tilt_degrees: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            BuoyancySolver::new(config),
            Err(HarborError::InvalidMaxTilt(_))
        ));
    }
}
