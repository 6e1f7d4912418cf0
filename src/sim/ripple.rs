//! Tap ripples
//!
//! A fixed arena of ripple slots. Spawning overwrites the slot with the oldest
//! timestamp; slots are never cleared when they age out, they just stop
//! contributing. Age is always derived from the query time.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::config::RippleConfig;
use crate::consts::{RIPPLE_CAPACITY, RIPPLE_FORCE_LIFETIME, RIPPLE_HEIGHT_LIFETIME};
use crate::error::HarborError;
use crate::smoothstep;

/// Crest sharpening exponent applied to the raw wave sum
const CREST_SHARPNESS: f32 = 0.7;
/// Distance decay rate away from the wavefront
const FRONT_DECAY: f32 = 0.2;
/// Height falloff reaches zero this many wavelengths from the front
const HEIGHT_BAND: f32 = 1.5;
/// Wavefront push acts within this many wavelengths of the front
const FORCE_BAND: f32 = 2.0;
/// Phase lag of the trailing crest, in wavelengths
const TRAILING_CREST_LAG: f32 = 0.3;

/// One ripple slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub origin: Vec2,
    /// Spawn time in seconds. Unused slots sit at negative infinity.
    pub spawned_at: f32,
    pub strength: f32,
}

impl Default for Ripple {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            spawned_at: f32::NEG_INFINITY,
            strength: 0.0,
        }
    }
}

impl Ripple {
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }
}

/// Fixed-capacity ripple arena
#[derive(Debug, Clone)]
pub struct RippleField {
    config: RippleConfig,
    slots: [Ripple; RIPPLE_CAPACITY],
    last_spawn: f32,
}

impl RippleField {
    pub fn new(config: RippleConfig) -> Result<Self, HarborError> {
        config.validate()?;
        Ok(Self {
            config,
            slots: [Ripple::default(); RIPPLE_CAPACITY],
            last_spawn: f32::NEG_INFINITY,
        })
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    pub fn slots(&self) -> &[Ripple; RIPPLE_CAPACITY] {
        &self.slots
    }

    /// Try to start a ripple. Returns false while the global cooldown runs.
    pub fn spawn(&mut self, position: Vec2, now: f32) -> bool {
        if now - self.last_spawn < self.config.cooldown {
            log::debug!(
                "Ripple rejected at {:.2}s (cooldown, last at {:.2}s)",
                now,
                self.last_spawn
            );
            return false;
        }

        let slot = self.oldest_slot();
        self.slots[slot] = Ripple {
            origin: position,
            spawned_at: now,
            strength: 1.0,
        };
        self.last_spawn = now;
        log::info!(
            "Ripple {} spawned at ({:.2}, {:.2}) t={:.2}",
            slot,
            position.x,
            position.y,
            now
        );
        true
    }

    /// Index of the slot with the smallest timestamp, lowest index on ties
    fn oldest_slot(&self) -> usize {
        let mut oldest = 0;
        for (i, ripple) in self.slots.iter().enumerate().skip(1) {
            if ripple.spawned_at < self.slots[oldest].spawned_at {
                oldest = i;
            }
        }
        oldest
    }

    /// Seconds until the next spawn is accepted
    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        (self.config.cooldown - (now - self.last_spawn)).max(0.0)
    }

    /// Ripples still contributing height at `now`
    pub fn active_ripples(&self, now: f32) -> impl Iterator<Item = &Ripple> {
        self.slots.iter().filter(move |r| {
            let age = r.age(now);
            age > 0.0 && age < RIPPLE_HEIGHT_LIFETIME
        })
    }

    /// Forget every ripple and the cooldown (level restart)
    pub fn clear(&mut self) {
        self.slots = [Ripple::default(); RIPPLE_CAPACITY];
        self.last_spawn = f32::NEG_INFINITY;
    }

    /// Summed height of every live wavefront at a water-plane position
    pub fn height_contribution(&self, position: Vec2, now: f32) -> f32 {
        let cfg = &self.config;
        let wavelength = cfg.wavelength;
        let mut height = 0.0;

        for ripple in &self.slots {
            let age = ripple.age(now);
            if age <= 0.0 || age >= RIPPLE_HEIGHT_LIFETIME {
                continue;
            }

            let distance = position.distance(ripple.origin);
            let front = distance - age * cfg.speed;

            let wave = (TAU * front / wavelength).sin()
                + 0.5 * (TAU * (front - TRAILING_CREST_LAG * wavelength) / wavelength).sin();
            let shaped = wave.signum() * wave.abs().powf(CREST_SHARPNESS);

            let time_decay = (-age * cfg.decay * 0.5).exp();
            let front_decay = (-FRONT_DECAY * front.abs()).exp();
            let falloff = 1.0 - smoothstep(0.0, HEIGHT_BAND * wavelength, front.abs());

            height += shaped * time_decay * front_decay * falloff * cfg.amplitude * ripple.strength;
        }

        height
    }

    /// Horizontal push on a body from every ripple younger than the force lifetime
    pub fn push_force(&self, body_position: Vec2, now: f32) -> Vec2 {
        let cfg = &self.config;
        let band = FORCE_BAND * cfg.wavelength;
        let mut force = Vec2::ZERO;

        for ripple in &self.slots {
            let age = ripple.age(now);
            if age <= 0.0 || age >= RIPPLE_FORCE_LIFETIME {
                continue;
            }

            let offset = body_position - ripple.origin;
            let away = offset.normalize_or_zero();
            let fade = 1.0 - age / RIPPLE_FORCE_LIFETIME;

            let front = (offset.length() - age * cfg.speed).abs();
            if front < band {
                let proximity = 1.0 - front / band;
                force += away * proximity * fade * cfg.amplitude * cfg.wavefront_force;
            }

            // Drift is not gated by the wavefront
            force += away * fade * cfg.drift_force;
        }

        force
    }
}
