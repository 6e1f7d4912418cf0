//! Deterministic water simulation
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (bodies by id, gates by creation)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod buoyancy;
pub mod gate;
pub mod ripple;
pub mod state;
pub mod surface;
pub mod tick;
pub mod wave;

pub use body::{BodyForces, BodyKind, BodyState, FloatingBody, ProbeSection};
pub use boundary::{BoundaryResult, PlayArea};
pub use buoyancy::BuoyancySolver;
pub use gate::{ApproachSide, GateDetector, GateEvent, GateGeometry, GateId, GateState};
pub use ripple::{Ripple, RippleField};
pub use state::{Floater, Gate, GatePlacement, HarborState, default_course};
pub use surface::WaterSurface;
pub use tick::{FixedStepper, TickInput, TickOutcome, tick};
pub use wave::{WaveField, WaveLayer};
