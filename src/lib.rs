//! # Exterior Ballistics
//!
//! Exterior-ballistics core: table-driven G1/G7 drag, spin-coupled
//! point-mass flight with a lag-filtered crosswind response, fixed-step
//! midpoint integration, trajectory recording with interpolated lookups,
//! an iterative zeroing solver, and seeded shot-group dispersion.
//!
//! Everything at the library surface is SI: meters, seconds, kilograms,
//! radians. [`conversions`] holds the usual field-unit helpers.

// Re-export the main types and functions
pub use acceleration::{AccelerationEval, AccelerationModel};
pub use atmosphere::Atmosphere;
pub use drag::DragFamily;
pub use error::{BallisticsError, Result};
pub use monte_carlo::{simulate_group, DispersionConfig, GroupResult, ShotImpact};
pub use projectile::ProjectileState;
pub use simulator::Simulator;
pub use trajectory::{Trajectory, TrajectoryPoint};
pub use wind::{ConstantWind, SegmentedWind, WindSegment, WindSource};
pub use zeroing::{ZeroPhase, ZeroSolver, ZeroingResult};

// Module declarations
pub mod acceleration;
pub mod atmosphere;
pub mod constants;
pub mod conversions;
pub mod drag;
pub mod error;
pub mod integrator;
pub mod monte_carlo;
pub mod projectile;
pub mod simulator;
pub mod trajectory;
pub mod wind;
pub mod zeroing;
