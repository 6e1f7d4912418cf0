//! Configuration errors
//!
//! Everything here is raised at construction time. Runtime queries are total
//! and never fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarborError {
    #[error("wave layer {index}: wavelength must be positive, got {wavelength}")]
    InvalidWavelength { index: usize, wavelength: f32 },
    #[error("wave layer {index}: amplitude must be positive, got {amplitude}")]
    InvalidAmplitude { index: usize, amplitude: f32 },
    #[error("wave layer {index}: direction must be non-zero")]
    ZeroDirection { index: usize },
    #[error("wave layer {index}: steepness must be within [0, 1], got {steepness}")]
    InvalidSteepness { index: usize, steepness: f32 },
    #[error("ripple {field} must be positive, got {value}")]
    InvalidRipple { field: &'static str, value: f32 },
    #[error("ripple decay {0} leaves more than 1% of the ripple at the end of its lifetime")]
    RippleDecayTooSlow(f32),
    #[error("body has no probes")]
    EmptyProbeSet,
    #[error("body mass must be positive, got {0}")]
    InvalidMass(f32),
    #[error("body inertia must be positive, got {0}")]
    InvalidInertia(f32),
    #[error("gate detection radius must be positive, got {0}")]
    InvalidDetectionRadius(f32),
    #[error("gate half-width must be positive, got {0}")]
    InvalidGateWidth(f32),
    #[error("play area {field} must be positive, got {value}")]
    InvalidPlayArea { field: &'static str, value: f32 },
    #[error("max tilt must be within (0, 180) degrees, got {0}")]
    InvalidMaxTilt(f32),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err = HarborError::InvalidWavelength {
            index: 2,
            wavelength: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "wave layer 2: wavelength must be positive, got -1"
        );

        let err = HarborError::InvalidRipple {
            field: "cooldown",
            value: 0.0,
        };
        assert!(err.to_string().contains("cooldown"));
    }
}
