//! Packed water-surface snapshot for a renderer
//!
//! Mirrors the height field in a uniform block so a vertex shader can displace
//! the water mesh with the same waves and ripples the bodies float on.

use bytemuck::{Pod, Zeroable};

use crate::consts::RIPPLE_CAPACITY;
use crate::sim::WaterSurface;

/// Wave layers a shader can sum
pub const MAX_GPU_WAVE_LAYERS: usize = 4;

/// Age written into empty ripple slots; the shader skips ages <= 0
const EMPTY_RIPPLE_AGE: f32 = -1.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader, 16-byte array stride)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuWaveLayer {
    pub direction: [f32; 2],
    pub amplitude: f32,
    pub wave_number: f32,
    pub phase_speed: f32,
    pub _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuRipple {
    pub origin: [f32; 2],
    /// Seconds since spawn, or negative for an empty slot
    pub age: f32,
    pub strength: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterUniforms {
    pub time: f32,              // offset 0
    pub base_level: f32,        // offset 4
    pub layer_count: u32,       // offset 8
    pub _pad0: u32,             // offset 12
    pub ripple_speed: f32,      // offset 16
    pub ripple_wavelength: f32, // offset 20
    pub ripple_decay: f32,      // offset 24
    pub ripple_amplitude: f32,  // offset 28
    pub layers: [GpuWaveLayer; MAX_GPU_WAVE_LAYERS], // offset 32
    pub ripples: [GpuRipple; RIPPLE_CAPACITY],        // offset 160
}

impl WaterUniforms {
    /// Snapshot the surface at `time`
    pub fn from_surface(surface: &WaterSurface, time: f32) -> Self {
        let mut uniforms = Self::zeroed();
        uniforms.time = time;
        uniforms.base_level = surface.waves.base_level();

        let layers = surface.waves.layers();
        if layers.len() > MAX_GPU_WAVE_LAYERS {
            log::warn!(
                "{} wave layers configured, only {} reach the GPU",
                layers.len(),
                MAX_GPU_WAVE_LAYERS
            );
        }
        for (slot, layer) in uniforms.layers.iter_mut().zip(layers) {
            *slot = GpuWaveLayer {
                direction: layer.direction.to_array(),
                amplitude: layer.amplitude,
                wave_number: layer.wave_number(),
                phase_speed: layer.phase_speed(),
                _pad: [0.0; 3],
            };
        }
        uniforms.layer_count = layers.len().min(MAX_GPU_WAVE_LAYERS) as u32;

        let ripples = &surface.ripples;
        let cfg = ripples.config();
        uniforms.ripple_speed = cfg.speed;
        uniforms.ripple_wavelength = cfg.wavelength;
        uniforms.ripple_decay = cfg.decay;
        uniforms.ripple_amplitude = cfg.amplitude;

        for (slot, ripple) in uniforms.ripples.iter_mut().zip(ripples.slots()) {
            let age = ripple.age(time);
            *slot = GpuRipple {
                origin: ripple.origin.to_array(),
                age: if age.is_finite() { age } else { EMPTY_RIPPLE_AGE },
                strength: ripple.strength,
            };
        }

        uniforms
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarborConfig;
    use glam::Vec2;

    fn surface() -> WaterSurface {
        WaterSurface::new(&HarborConfig::default()).unwrap()
    }

    /// What the vertex shader computes for the ambient waves
    fn shader_wave_height(u: &WaterUniforms, p: Vec2) -> f32 {
        let mut h = u.base_level;
        for layer in &u.layers[..u.layer_count as usize] {
            let dir = Vec2::from_array(layer.direction);
            h += layer.amplitude
                * (layer.wave_number * (dir.dot(p) - layer.phase_speed * u.time)).cos();
        }
        h
    }

    #[test]
    fn test_layout_is_uniform_friendly() {
        assert_eq!(std::mem::size_of::<GpuWaveLayer>(), 32);
        assert_eq!(std::mem::size_of::<GpuRipple>(), 16);
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 320);
        assert_eq!(std::mem::size_of::<WaterUniforms>() % 16, 0);
    }

    #[test]
    fn test_waves_match_cpu_height() {
        let surface = surface();
        let uniforms = WaterUniforms::from_surface(&surface, 3.25);
        assert_eq!(uniforms.layer_count, 3);
        for p in [Vec2::ZERO, Vec2::new(4.0, -1.0), Vec2::new(-7.5, 2.5)] {
            let cpu = surface.waves.height(p, 3.25);
            assert!((shader_wave_height(&uniforms, p) - cpu).abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_ripple_slots_are_finite() {
        let mut surface = surface();
        assert!(surface.ripples.spawn(Vec2::new(1.0, 2.0), 5.0));
        let uniforms = WaterUniforms::from_surface(&surface, 6.5);

        let live: Vec<_> = uniforms.ripples.iter().filter(|r| r.age > 0.0).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].origin, [1.0, 2.0]);
        assert!((live[0].age - 1.5).abs() < 1e-6);
        assert!(uniforms.ripples.iter().all(|r| r.age.is_finite()));
        assert_eq!(uniforms.as_bytes().len(), 320);
    }
}
