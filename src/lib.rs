//! Ripple Harbor - water physics core for a tap-to-steer boat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (waves, ripples, buoyancy, boundary, gates)
//! - `config`: Strongly-typed tuning loaded from JSON
//! - `gpu`: Packed water-surface snapshot for a renderer
//! - `error`: Construction-time configuration errors

pub mod config;
pub mod error;
pub mod gpu;
pub mod sim;

pub use config::{HarborConfig, SeaState};
pub use error::HarborError;

use glam::{Vec2, Vec3};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity used by the wave dispersion relation and the integrator (m/s²)
    pub const GRAVITY: f32 = 9.8;

    /// Number of ripple slots kept alive at once
    pub const RIPPLE_CAPACITY: usize = 10;
    /// Age after which a ripple stops contributing height
    pub const RIPPLE_HEIGHT_LIFETIME: f32 = 8.0;
    /// Age after which a ripple stops pushing bodies
    pub const RIPPLE_FORCE_LIFETIME: f32 = 4.0;

    /// Probes above water further than this are ignored
    pub const ABOVE_WATER_CUTOFF: f32 = 1.5;
    /// Up-axis alignment below which the anti-capsize torque engages (~18°)
    pub const STABILITY_DOT_THRESHOLD: f32 = 0.95;
    /// Horizontal drift tolerated around an anchor before it pulls back
    pub const ANCHOR_DEADZONE: f32 = 0.1;

    /// Projection beyond which an approach side is classified
    pub const GATE_CLASSIFY_DISTANCE: f32 = 1.0;
    /// Projection beyond which a classified approach commits a crossing
    pub const GATE_CROSS_DISTANCE: f32 = 0.5;
}

/// Project a world position onto the water plane (x, z)
#[inline]
pub fn to_plane(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Lift a water-plane point back into world space at the given height
#[inline]
pub fn from_plane(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}

/// Hermite smoothstep between two edges
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
