//! Projectile state value type.
//!
//! One type covers both flavors of state: a static-only description of the
//! projectile (mass, geometry, ballistic coefficient, drag family) and a
//! flying state that adds position, velocity, spin, and the two carried
//! lag-filter angles. Integration never mutates a state in place; every step
//! derives a fresh value so the trajectory store can keep the old ones.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::SPIN_RADIUS_OF_GYRATION_FACTOR;
use crate::drag::DragFamily;

/// A projectile and, optionally, its in-flight state.
///
/// The static fields are fixed for the life of a shot. The lag angles are
/// filter memory, not instantaneous kinematics: deriving a new flying state
/// from an existing one copies them forward, and only the acceleration
/// model's midpoint evaluation writes new values (via the integrator).
#[derive(Debug, Clone, Copy)]
pub struct ProjectileState {
    /// Projectile mass (kg)
    pub mass_kg: f64,
    /// Projectile diameter (m)
    pub diameter_m: f64,
    /// Projectile length (m)
    pub length_m: f64,
    /// Ballistic coefficient, measured against `drag_family`
    pub ballistic_coefficient: f64,
    /// Reference drag family the BC belongs to
    pub drag_family: DragFamily,
    /// Position (m); x downrange, y crossrange, z vertical up
    pub position_m: Vector3<f64>,
    /// Velocity (m/s)
    pub velocity_mps: Vector3<f64>,
    /// Spin rate about the velocity axis (rad/s); sign encodes twist hand
    pub spin_rate_rad_s: f64,
    pub(crate) lag_right: f64,
    pub(crate) lag_up: f64,
    has_flight: bool,
}

impl ProjectileState {
    /// A static-only state: physical properties set, flight fields zeroed.
    pub fn new(
        mass_kg: f64,
        diameter_m: f64,
        length_m: f64,
        ballistic_coefficient: f64,
        drag_family: DragFamily,
    ) -> Self {
        Self {
            mass_kg,
            diameter_m,
            length_m,
            ballistic_coefficient,
            drag_family,
            position_m: Vector3::zeros(),
            velocity_mps: Vector3::zeros(),
            spin_rate_rad_s: 0.0,
            lag_right: 0.0,
            lag_up: 0.0,
            has_flight: false,
        }
    }

    /// Derive a flying state from this one: same physical properties, same
    /// carried lag angles, new kinematics.
    pub fn with_flight(
        &self,
        position_m: Vector3<f64>,
        velocity_mps: Vector3<f64>,
        spin_rate_rad_s: f64,
    ) -> Self {
        Self {
            position_m,
            velocity_mps,
            spin_rate_rad_s,
            has_flight: true,
            ..*self
        }
    }

    /// Replace the carried lag angles. Integrator-internal: the midpoint
    /// acceleration evaluation is the only producer of new lag values.
    pub(crate) fn with_lag(&self, lag_right: f64, lag_up: f64) -> Self {
        Self {
            lag_right,
            lag_up,
            ..*self
        }
    }

    /// Whether this state carries flight kinematics.
    pub fn has_flight_state(&self) -> bool {
        self.has_flight
    }

    /// The carried lag-filter angles `(right, up)` in radians.
    pub fn lag_angles(&self) -> (f64, f64) {
        (self.lag_right, self.lag_up)
    }

    /// Sectional density, mass over diameter squared (kg/m²).
    pub fn sectional_density(&self) -> f64 {
        self.mass_kg / (self.diameter_m * self.diameter_m)
    }

    /// Speed, the velocity magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity_mps.norm()
    }

    /// Kinetic energy (J).
    pub fn kinetic_energy(&self) -> f64 {
        let v = self.speed();
        0.5 * self.mass_kg * v * v
    }

    /// Elevation (pitch) angle of the velocity vector above horizontal (rad).
    pub fn elevation_angle(&self) -> f64 {
        self.velocity_mps.z.atan2(self.velocity_mps.x)
    }

    /// Azimuth (bearing) angle of the velocity vector from downrange (rad).
    pub fn azimuth_angle(&self) -> f64 {
        self.velocity_mps.y.atan2(self.velocity_mps.x)
    }

    /// Axial moment of inertia estimate from a fixed radius-of-gyration
    /// fraction of the diameter (kg·m²).
    pub fn spin_moment_of_inertia(&self) -> f64 {
        let r_eff = SPIN_RADIUS_OF_GYRATION_FACTOR * self.diameter_m;
        self.mass_kg * r_eff * r_eff
    }

    /// Spin rate from a signed twist pitch in meters per turn. Right-hand
    /// twist is positive pitch; a zero pitch means no spin.
    pub fn spin_rate_from_twist(speed_mps: f64, twist_pitch_m: f64) -> f64 {
        if twist_pitch_m == 0.0 {
            return 0.0;
        }
        let omega = 2.0 * PI * (speed_mps / twist_pitch_m.abs());
        if twist_pitch_m > 0.0 {
            omega
        } else {
            -omega
        }
    }
}
