//! Harbor tuning and presets
//!
//! One strongly-typed struct carries every numeric knob the core reads. It is
//! built from a preset or parsed from JSON, validated once, and handed to the
//! components at construction.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::RIPPLE_HEIGHT_LIFETIME;
use crate::error::HarborError;
use crate::sim::wave::WaveLayer;

/// Height left at the end of a ripple's lifetime, as a fraction of amplitude
const RIPPLE_RESIDUAL: f32 = 0.01;

/// Sea state presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeaState {
    Calm,
    #[default]
    Moderate,
    Rough,
}

impl SeaState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeaState::Calm => "Calm",
            SeaState::Moderate => "Moderate",
            SeaState::Rough => "Rough",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" => Some(SeaState::Calm),
            "moderate" | "mod" => Some(SeaState::Moderate),
            "rough" | "storm" => Some(SeaState::Rough),
            _ => None,
        }
    }

    /// Amplitude multiplier applied to the base chop/swell table
    fn amplitude_scale(&self) -> f32 {
        match self {
            SeaState::Calm => 0.4,
            SeaState::Moderate => 1.0,
            SeaState::Rough => 1.8,
        }
    }

    /// Two chop layers plus one swell
    pub fn wave_layers(&self) -> Vec<WaveLayer> {
        let s = self.amplitude_scale();
        vec![
            // Primary chop
            WaveLayer::new(0.15 * s, 6.0, Vec2::new(1.0, 0.0), 1.0, 0.25),
            // Cross chop
            WaveLayer::new(0.10 * s, 4.0, Vec2::new(0.6, 0.8), 1.2, 0.2),
            // Swell - long and slow
            WaveLayer::new(0.30 * s, 20.0, Vec2::new(-0.3, 1.0), 0.6, 0.1),
        ]
    }
}

/// Ambient wave field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Resting water level (world Y)
    pub base_level: f32,
    /// Summed wave layers
    pub layers: Vec<WaveLayer>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_level: 0.0,
            layers: SeaState::default().wave_layers(),
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), HarborError> {
        for (index, layer) in self.layers.iter().enumerate() {
            layer.validate(index)?;
        }
        Ok(())
    }
}

/// Tap ripple parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Minimum seconds between two accepted spawns (global)
    pub cooldown: f32,
    /// Wavefront expansion speed (units/s)
    pub speed: f32,
    /// Distance between ripple crests
    pub wavelength: f32,
    /// Exponential time decay rate
    pub decay: f32,
    /// Peak height contribution
    pub amplitude: f32,
    /// Radial push from the wavefront band
    pub wavefront_force: f32,
    /// Omnipresent drift away from the tap point
    pub drift_force: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            speed: 3.0,
            wavelength: 2.0,
            decay: 1.5,
            amplitude: 0.4,
            wavefront_force: 6.0,
            drift_force: 3.0,
        }
    }
}

impl RippleConfig {
    pub fn validate(&self) -> Result<(), HarborError> {
        let positive = [
            ("cooldown", self.cooldown),
            ("speed", self.speed),
            ("wavelength", self.wavelength),
            ("decay", self.decay),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(HarborError::InvalidRipple { field, value });
            }
        }
        // Height must fade out before the slot is dropped
        if self.residual_at_lifetime() > RIPPLE_RESIDUAL {
            return Err(HarborError::RippleDecayTooSlow(self.decay));
        }
        Ok(())
    }

    /// Time decay envelope left at the end of the height lifetime
    pub fn residual_at_lifetime(&self) -> f32 {
        (-RIPPLE_HEIGHT_LIFETIME * self.decay * 0.5).exp()
    }
}

/// Buoyancy, stability and drag coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuoyancyConfig {
    /// Upward force per unit of probe depth (halved per probe on multi-probe hulls)
    pub buoyancy_force: f32,
    /// Downward pull per unit height for probes just above the surface
    pub above_water_force: f32,
    /// Anti-capsize torque once the hull tilts past ~18°
    pub stability_force: f32,
    /// Wave-following pitch/roll torque for multi-probe hulls
    pub alignment_force: f32,
    /// Hard tilt limit (degrees)
    pub max_tilt_degrees: f32,
    /// Torque per radian past the hard tilt limit
    pub tilt_limit_force: f32,
    pub linear_drag: f32,
    pub angular_drag: f32,
    /// Restoring force per unit displacement for anchored floats
    pub anchor_strength: f32,
}

impl Default for BuoyancyConfig {
    fn default() -> Self {
        Self {
            buoyancy_force: 20.0,
            above_water_force: 2.0,
            stability_force: 8.0,
            alignment_force: 3.0,
            max_tilt_degrees: 30.0,
            tilt_limit_force: 25.0,
            linear_drag: 1.5,
            angular_drag: 2.0,
            anchor_strength: 4.0,
        }
    }
}

impl BuoyancyConfig {
    pub fn validate(&self) -> Result<(), HarborError> {
        if !(self.max_tilt_degrees > 0.0 && self.max_tilt_degrees < 180.0) {
            return Err(HarborError::InvalidMaxTilt(self.max_tilt_degrees));
        }
        Ok(())
    }
}

/// Play area expressed in iso space (45° to the world axes)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Half extent along the iso horizontal axis
    pub half_width: f32,
    /// Half extent along the iso vertical axis
    pub half_depth: f32,
    /// Impulse magnitude pushed back inward per clamped axis
    pub bounce: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            half_width: 12.0,
            half_depth: 8.0,
            bounce: 4.0,
        }
    }
}

impl BoundaryConfig {
    pub fn validate(&self) -> Result<(), HarborError> {
        for (field, value) in [("half_width", self.half_width), ("half_depth", self.half_depth)] {
            if !(value > 0.0) {
                return Err(HarborError::InvalidPlayArea { field, value });
            }
        }
        Ok(())
    }
}

/// Gate detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub detection_radius: f32,
    /// Half the distance between the two marker anchors
    pub half_width: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            detection_radius: 1.75,
            half_width: 1.5,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), HarborError> {
        if !(self.detection_radius > 0.0) {
            return Err(HarborError::InvalidDetectionRadius(self.detection_radius));
        }
        if !(self.half_width > 0.0) {
            return Err(HarborError::InvalidGateWidth(self.half_width));
        }
        Ok(())
    }
}

/// Complete harbor tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarborConfig {
    pub waves: WaveConfig,
    pub ripples: RippleConfig,
    pub buoyancy: BuoyancyConfig,
    pub boundary: BoundaryConfig,
    pub gates: GateConfig,
}

impl HarborConfig {
    /// Defaults with the wave table of a sea state preset
    pub fn from_sea_state(preset: SeaState) -> Self {
        let mut config = Self::default();
        config.waves.layers = preset.wave_layers();
        config
    }

    /// Check every section, stopping at the first violation
    pub fn validate(&self) -> Result<(), HarborError> {
        self.waves.validate()?;
        self.ripples.validate()?;
        self.buoyancy.validate()?;
        self.boundary.validate()?;
        self.gates.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, HarborError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, HarborError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarborError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded harbor config from {}", path.display());
        Ok(config)
    }
}
