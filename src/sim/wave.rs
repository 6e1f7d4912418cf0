//! Analytic ambient wave field
//!
//! Height is a sum of cosine layers travelling at their deep-water phase
//! speed. Only the vertical term is evaluated; steepness is carried so a
//! renderer can add Gerstner horizontal displacement on its own.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config::WaveConfig;
use crate::consts::GRAVITY;
use crate::error::HarborError;

/// One configured wave layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayer {
    /// Peak height of this layer
    pub amplitude: f32,
    /// Crest-to-crest distance in world units
    pub wavelength: f32,
    /// Travel direction on the water plane (normalised by the field)
    pub direction: Vec2,
    /// Multiplier on the dispersion phase speed
    pub angular_speed: f32,
    /// Gerstner steepness (0 = sine, 1 = sharp crest)
    pub steepness: f32,
}

impl WaveLayer {
    pub const fn new(
        amplitude: f32,
        wavelength: f32,
        direction: Vec2,
        angular_speed: f32,
        steepness: f32,
    ) -> Self {
        Self {
            amplitude,
            wavelength,
            direction,
            angular_speed,
            steepness,
        }
    }

    /// Wave number k = 2π / wavelength
    #[inline]
    pub fn wave_number(&self) -> f32 {
        TAU / self.wavelength
    }

    /// Deep-water phase speed sqrt(g / k), scaled by the layer's angular speed
    #[inline]
    pub fn phase_speed(&self) -> f32 {
        (GRAVITY / self.wave_number()).sqrt() * self.angular_speed
    }

    /// Reject layers the height formula can't evaluate
    pub fn validate(&self, index: usize) -> Result<(), HarborError> {
        if !(self.wavelength > 0.0) {
            return Err(HarborError::InvalidWavelength {
                index,
                wavelength: self.wavelength,
            });
        }
        if !(self.amplitude > 0.0) {
            return Err(HarborError::InvalidAmplitude {
                index,
                amplitude: self.amplitude,
            });
        }
        if self.direction.length_squared() < 1e-12 {
            return Err(HarborError::ZeroDirection { index });
        }
        if !(0.0..=1.0).contains(&self.steepness) {
            return Err(HarborError::InvalidSteepness {
                index,
                steepness: self.steepness,
            });
        }
        Ok(())
    }
}

/// Precomputed per-layer constants
#[derive(Debug, Clone, Copy)]
struct LayerConstants {
    k: f32,
    /// sqrt(g / k) * angular_speed
    phase_speed: f32,
    amplitude: f32,
    direction: Vec2,
}

/// Immutable ambient wave field
#[derive(Debug, Clone)]
pub struct WaveField {
    base_level: f32,
    layers: Vec<WaveLayer>,
    constants: Vec<LayerConstants>,
}

impl WaveField {
    /// Build a field, failing on the first invalid layer
    pub fn new(config: &WaveConfig) -> Result<Self, HarborError> {
        config.validate()?;

        let layers: Vec<WaveLayer> = config
            .layers
            .iter()
            .map(|layer| WaveLayer {
                direction: layer.direction.normalize(),
                ..*layer
            })
            .collect();

        let constants = layers
            .iter()
            .map(|layer| {
                LayerConstants {
                    k: layer.wave_number(),
                    phase_speed: layer.phase_speed(),
                    amplitude: layer.amplitude,
                    direction: layer.direction,
                }
            })
            .collect();

        Ok(Self {
            base_level: config.base_level,
            layers,
            constants,
        })
    }

    /// Flat water at the given level
    pub fn still(base_level: f32) -> Self {
        Self {
            base_level,
            layers: Vec::new(),
            constants: Vec::new(),
        }
    }

    pub fn base_level(&self) -> f32 {
        self.base_level
    }

    /// Layers with normalised directions
    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    /// Surface height at a water-plane position
    #[inline]
    pub fn height(&self, position: Vec2, time: f32) -> f32 {
        let mut height = self.base_level;
        for c in &self.constants {
            let phase = c.k * (c.direction.dot(position) - c.phase_speed * time);
            height += c.amplitude * phase.cos();
        }
        height
    }

    /// Highest height any combination of layers can reach
    pub fn max_height(&self) -> f32 {
        self.base_level + self.constants.iter().map(|c| c.amplitude).sum::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeaState;
    use proptest::prelude::*;

    fn moderate() -> WaveField {
        WaveField::new(&WaveConfig::default()).unwrap()
    }

    #[test]
    fn test_still_water_is_flat() {
        let field = WaveField::still(2.5);
        assert_eq!(field.height(Vec2::ZERO, 0.0), 2.5);
        assert_eq!(field.height(Vec2::new(100.0, -40.0), 17.0), 2.5);
    }

    #[test]
    fn test_single_layer_matches_formula() {
        let config = WaveConfig {
            base_level: 1.0,
            layers: vec![WaveLayer::new(0.5, 8.0, Vec2::new(2.0, 0.0), 1.0, 0.3)],
        };
        let field = WaveField::new(&config).unwrap();

        let k = TAU / 8.0;
        let c = (GRAVITY / k).sqrt();
        let p = Vec2::new(3.0, 9.0);
        let t = 1.25;
        let expected = 1.0 + 0.5 * (k * (p.x - c * t)).cos();
        assert!((field.height(p, t) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_direction_is_normalised() {
        let config = WaveConfig {
            base_level: 0.0,
            layers: vec![WaveLayer::new(1.0, 4.0, Vec2::new(0.0, 5.0), 1.0, 0.0)],
        };
        let field = WaveField::new(&config).unwrap();
        assert!((field.layers()[0].direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_height_varies_in_space_and_time() {
        let field = moderate();
        let h0 = field.height(Vec2::ZERO, 0.0);
        assert_ne!(h0, field.height(Vec2::ZERO, 1.0));
        assert_ne!(h0, field.height(Vec2::new(3.0, 2.0), 0.0));
    }

    #[test]
    fn test_height_bounded_by_amplitudes() {
        let field = WaveField::new(&WaveConfig {
            base_level: 0.0,
            layers: SeaState::Rough.wave_layers(),
        })
        .unwrap();
        let bound = field.max_height();
        for i in 0..200 {
            let p = Vec2::new(i as f32 * 0.37, i as f32 * -0.91);
            assert!(field.height(p, i as f32 * 0.1).abs() <= bound + 1e-5);
        }
    }

    #[test]
    fn test_invalid_layers_rejected() {
        let bad_wavelength = WaveConfig {
            base_level: 0.0,
            layers: vec![
                WaveLayer::new(0.1, 4.0, Vec2::X, 1.0, 0.2),
                WaveLayer::new(0.1, 0.0, Vec2::X, 1.0, 0.2),
            ],
        };
        assert!(matches!(
            WaveField::new(&bad_wavelength),
            Err(HarborError::InvalidWavelength { index: 1, .. })
        ));

        let zero_dir = WaveConfig {
            base_level: 0.0,
            layers: vec![WaveLayer::new(0.1, 4.0, Vec2::ZERO, 1.0, 0.2)],
        };
        assert!(matches!(
            WaveField::new(&zero_dir),
            Err(HarborError::ZeroDirection { index: 0 })
        ));

        let steep = WaveConfig {
            base_level: 0.0,
            layers: vec![WaveLayer::new(0.1, 4.0, Vec2::X, 1.0, 1.5)],
        };
        assert!(matches!(
            WaveField::new(&steep),
            Err(HarborError::InvalidSteepness { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_height_is_deterministic(x in -500.0f32..500.0, z in -500.0f32..500.0, t in 0.0f32..600.0) {
            let a = moderate();
            let b = moderate();
            let p = Vec2::new(x, z);
            // Query order must not matter
            let first = a.height(p, t);
            let _ = a.height(p + Vec2::ONE, t + 3.0);
            prop_assert_eq!(first, a.height(p, t));
            prop_assert_eq!(first, b.height(p, t));
        }

        #[test]
        fn prop_height_is_continuous(x in -100.0f32..100.0, z in -100.0f32..100.0, t in 0.0f32..100.0) {
            let field = moderate();
            let p = Vec2::new(x, z);
            let eps = 1e-3;
            let h = field.height(p, t);
            prop_assert!((h - field.height(p + Vec2::new(eps, 0.0), t)).abs() < 0.01);
            prop_assert!((h - field.height(p + Vec2::new(0.0, eps), t)).abs() < 0.01);
            prop_assert!((h - field.height(p, t + eps)).abs() < 0.01);
        }
    }
}
