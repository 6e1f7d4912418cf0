//! Combined water surface
//!
//! Ambient waves plus tap ripples. This is what bodies float on and what a
//! renderer should displace its mesh with.

use glam::{Vec2, Vec3};

use super::ripple::RippleField;
use super::wave::WaveField;
use crate::config::HarborConfig;
use crate::error::HarborError;

/// Central-difference step for surface normals
const NORMAL_EPS: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct WaterSurface {
    pub waves: WaveField,
    pub ripples: RippleField,
}

impl WaterSurface {
    pub fn new(config: &HarborConfig) -> Result<Self, HarborError> {
        Ok(Self {
            waves: WaveField::new(&config.waves)?,
            ripples: RippleField::new(config.ripples.clone())?,
        })
    }

    /// Total height at a water-plane position
    #[inline]
    pub fn height(&self, position: Vec2, time: f32) -> f32 {
        self.waves.height(position, time) + self.ripples.height_contribution(position, time)
    }

    /// Surface normal from central differences of the combined height
    pub fn normal(&self, position: Vec2, time: f32) -> Vec3 {
        let dx = self.height(position + Vec2::new(NORMAL_EPS, 0.0), time)
            - self.height(position - Vec2::new(NORMAL_EPS, 0.0), time);
        let dz = self.height(position + Vec2::new(0.0, NORMAL_EPS), time)
            - self.height(position - Vec2::new(0.0, NORMAL_EPS), time);
        Vec3::new(-dx, 2.0 * NORMAL_EPS, -dz).normalize_or(Vec3::Y)
    }

    /// Heights for a batch of points (mesh rows, hull probes)
    pub fn sample_heights_batch(&self, points: &[Vec2], time: f32, heights: &mut [f32]) {
        debug_assert_eq!(points.len(), heights.len());

        for (h, &p) in heights.iter_mut().zip(points) {
            *h = self.height(p, time);
        }
    }

    /// Depth of a world point below the surface (negative when above)
    #[inline]
    pub fn depth_at(&self, point: Vec3, time: f32) -> f32 {
        self.height(crate::to_plane(point), time) - point.y
    }
}
