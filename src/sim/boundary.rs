//! Play-area containment
//!
//! The play rectangle is aligned with the camera, which looks at the water at
//! 45°. Positions are rotated into that iso frame, clamped per axis, and
//! rotated back. A clamped body gets both a hard position correction and a
//! bounce impulse; the impulse alone lets fast bodies tunnel out.

use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_4;

use crate::config::BoundaryConfig;
use crate::error::HarborError;
use crate::{from_plane, to_plane};

/// Result of constraining one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryResult {
    /// Position after clamping (height untouched)
    pub position: Vec3,
    /// Inward impulse, zero when nothing was clamped
    pub impulse: Vec3,
    pub clamped: bool,
}

#[derive(Debug, Clone)]
pub struct PlayArea {
    config: BoundaryConfig,
    /// World plane → iso
    to_iso: Vec2,
    /// Iso → world plane
    from_iso: Vec2,
}

impl PlayArea {
    pub fn new(config: BoundaryConfig) -> Result<Self, HarborError> {
        config.validate()?;
        Ok(Self {
            config,
            to_iso: Vec2::from_angle(-FRAC_PI_4),
            from_iso: Vec2::from_angle(FRAC_PI_4),
        })
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Water-plane point expressed in iso coordinates
    #[inline]
    pub fn world_to_iso(&self, p: Vec2) -> Vec2 {
        self.to_iso.rotate(p)
    }

    #[inline]
    pub fn iso_to_world(&self, p: Vec2) -> Vec2 {
        self.from_iso.rotate(p)
    }

    pub fn contains(&self, position: Vec3) -> bool {
        let iso = self.world_to_iso(to_plane(position));
        iso.x.abs() <= self.config.half_width && iso.y.abs() <= self.config.half_depth
    }

    /// Clamp a world position into the play area
    pub fn constrain(&self, position: Vec3) -> BoundaryResult {
        let iso = self.world_to_iso(to_plane(position));
        let limits = Vec2::new(self.config.half_width, self.config.half_depth);
        let clamped_iso = iso.clamp(-limits, limits);

        let mut impulse_iso = Vec2::ZERO;
        if clamped_iso.x != iso.x {
            impulse_iso.x = -iso.x.signum() * self.config.bounce;
        }
        if clamped_iso.y != iso.y {
            impulse_iso.y = -iso.y.signum() * self.config.bounce;
        }

        if impulse_iso == Vec2::ZERO {
            return BoundaryResult {
                position,
                impulse: Vec3::ZERO,
                clamped: false,
            };
        }

        BoundaryResult {
            position: from_plane(self.iso_to_world(clamped_iso), position.y),
            impulse: from_plane(self.iso_to_world(impulse_iso), 0.0),
            clamped: true,
        }
    }
}
