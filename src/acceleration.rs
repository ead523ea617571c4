//! Point-mass acceleration with spin coupling.
//!
//! Total acceleration is drag along the air-relative velocity, gravity, and a
//! small spin-dependent term that produces the classic spin-drift and
//! aerodynamic-jump effects. The spin term works in a velocity-aligned frame
//! (right and in-plane-up, both perpendicular to the flight direction) and
//! keeps a low-pass estimate of the sideslip angles; the fast residual above
//! that filter is what kicks the projectile sideways when the crosswind
//! changes.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::{
    BETA_LAG_SCALE, G_ACCEL_MPS2, JUMP_STRENGTH_SCALE, LIFT_SLOPE_PER_RAD, MAX_YAW_OF_REPOSE_RAD,
    MIN_AIRSPEED_THRESHOLD, MIN_ALIGNMENT_RATE, MIN_DIVISION_THRESHOLD, MIN_VECTOR_NORM,
    MIN_VELOCITY_THRESHOLD, RESTORING_MOMENT_SLOPE_PER_RAD, YAW_OF_REPOSE_SCALE,
};
use crate::drag;
use crate::projectile::ProjectileState;

/// Normalize `v`, falling back to a fixed axis when the vector is too short
/// to carry a direction.
fn normalize_or(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > MIN_VECTOR_NORM {
        v / n
    } else {
        fallback
    }
}

/// Result of one acceleration evaluation.
///
/// The lag angles are the low-pass filter state after this evaluation; the
/// integrator decides which evaluation's angles survive into the next step.
#[derive(Debug, Clone, Copy)]
pub struct AccelerationEval {
    /// Total acceleration (m/s²)
    pub acceleration_mps2: Vector3<f64>,
    /// Updated low-pass sideslip angle, right axis (rad)
    pub lag_right: f64,
    /// Updated low-pass sideslip angle, in-plane-up axis (rad)
    pub lag_up: f64,
}

/// Forces model for a spinning projectile.
///
/// The defaults reproduce the standard coefficients; tests zero out `gravity`
/// or the coupling slopes to isolate individual terms.
#[derive(Debug, Clone, Copy)]
pub struct AccelerationModel {
    /// Gravitational acceleration (m/s²)
    pub gravity_mps2: Vector3<f64>,
    /// Lift-curve slope driving the coupling force (per rad)
    pub lift_slope_per_rad: f64,
    /// Pitching-moment slope; magnitude sets the spin-axis alignment rate
    pub restoring_moment_slope_per_rad: f64,
    /// Scale of the equilibrium yaw-of-repose angle
    pub yaw_of_repose_scale: f64,
    /// Scale of the transient aerodynamic-jump response
    pub jump_strength_scale: f64,
    /// Scale inside the lag-filter exponential
    pub beta_lag_scale: f64,
    /// Clamp on the yaw-of-repose angle (rad)
    pub max_yaw_of_repose_rad: f64,
}

impl Default for AccelerationModel {
    fn default() -> Self {
        Self {
            gravity_mps2: Vector3::new(0.0, 0.0, -G_ACCEL_MPS2),
            lift_slope_per_rad: LIFT_SLOPE_PER_RAD,
            restoring_moment_slope_per_rad: RESTORING_MOMENT_SLOPE_PER_RAD,
            yaw_of_repose_scale: YAW_OF_REPOSE_SCALE,
            jump_strength_scale: JUMP_STRENGTH_SCALE,
            beta_lag_scale: BETA_LAG_SCALE,
            max_yaw_of_repose_rad: MAX_YAW_OF_REPOSE_RAD,
        }
    }
}

impl AccelerationModel {
    /// Total acceleration on `state` in air moving at `wind_mps`.
    ///
    /// `dt_s` is the integration step the lag filter is being advanced by.
    /// With a zero air-relative speed only gravity acts and the lag angles
    /// pass through unchanged.
    pub fn evaluate(
        &self,
        state: &ProjectileState,
        wind_mps: &Vector3<f64>,
        air_density: f64,
        dt_s: f64,
    ) -> AccelerationEval {
        let relative = state.velocity_mps - wind_mps;
        let airspeed = relative.norm();
        if airspeed <= 0.0 {
            return AccelerationEval {
                acceleration_mps2: self.gravity_mps2,
                lag_right: state.lag_right,
                lag_up: state.lag_up,
            };
        }

        let retardation = drag::retardation_mps2(
            airspeed,
            state.drag_family,
            state.ballistic_coefficient,
            air_density,
        );
        let drag_accel = relative * (-retardation / airspeed);

        let (spin_accel, lag_right, lag_up) = self.spin_coupling(state, wind_mps, air_density, dt_s);

        AccelerationEval {
            acceleration_mps2: drag_accel + self.gravity_mps2 + spin_accel,
            lag_right,
            lag_up,
        }
    }

    /// Spin-dependent acceleration and the lag angles after this evaluation.
    ///
    /// Steady part: the yaw of repose, an equilibrium nose offset toward the
    /// `right` axis whose size shrinks as the spin-axis alignment rate grows.
    /// Transient part: the high-pass residual of the sideslip angles, rotated
    /// a quarter turn by the gyroscopic response and signed by the twist
    /// hand.
    fn spin_coupling(
        &self,
        state: &ProjectileState,
        wind_mps: &Vector3<f64>,
        air_density: f64,
        dt_s: f64,
    ) -> (Vector3<f64>, f64, f64) {
        let u = state.velocity_mps - wind_mps;
        let airspeed = u.norm();
        if airspeed < MIN_AIRSPEED_THRESHOLD {
            return (Vector3::zeros(), state.lag_right, state.lag_up);
        }

        let ground_speed = state.velocity_mps.norm();
        let t_hat = if ground_speed > MIN_VELOCITY_THRESHOLD {
            state.velocity_mps / ground_speed
        } else {
            u / airspeed
        };
        let right = normalize_or(&Vector3::z().cross(&t_hat), Vector3::x());
        let up_in_plane = normalize_or(&t_hat.cross(&right), Vector3::z());

        let dynamic_pressure = 0.5 * air_density * airspeed * airspeed;
        let reference_area = 0.25 * PI * state.diameter_m * state.diameter_m;
        let reference_length = state.diameter_m.max(state.length_m);

        // rate at which the spin axis realigns with the velocity vector;
        // fast spin resists, strong restoring moment helps
        let alignment_rate = dynamic_pressure
            * reference_area
            * reference_length
            * self.restoring_moment_slope_per_rad.abs()
            / (state.spin_moment_of_inertia() * state.spin_rate_rad_s.abs()
                + MIN_DIVISION_THRESHOLD);
        let lag_gain = 1.0 - (-self.beta_lag_scale * alignment_rate * dt_s).exp();

        let gravity_perp = self.gravity_mps2 - t_hat * self.gravity_mps2.dot(&t_hat);
        let t_cross_g = t_hat.cross(&gravity_perp);
        let repose_magnitude = if alignment_rate > MIN_ALIGNMENT_RATE {
            self.yaw_of_repose_scale * t_cross_g.norm() / (airspeed * alignment_rate)
        } else {
            0.0
        };
        let hand = if state.spin_rate_rad_s >= 0.0 { 1.0 } else { -1.0 };
        let repose_right = (hand
            * normalize_or(&t_cross_g, right).dot(&right)
            * repose_magnitude)
            .clamp(-self.max_yaw_of_repose_rad, self.max_yaw_of_repose_rad);

        let u_perp = u - t_hat * u.dot(&t_hat);
        let sideslip_right = u_perp.dot(&right) / (airspeed + MIN_DIVISION_THRESHOLD);
        let sideslip_up = u_perp.dot(&up_in_plane) / (airspeed + MIN_DIVISION_THRESHOLD);

        let lag_right = state.lag_right + lag_gain * (sideslip_right - state.lag_right);
        let lag_up = state.lag_up + lag_gain * (sideslip_up - state.lag_up);

        let high_pass_right = sideslip_right - lag_right;
        let high_pass_up = sideslip_up - lag_up;

        // gyroscopic response: the transient points a quarter turn from the
        // disturbance, with the twist hand picking the rotation sense
        let jump_right = self.jump_strength_scale * hand * (-high_pass_up);
        let jump_up = self.jump_strength_scale * hand * high_pass_right;

        let gain = dynamic_pressure * reference_area * self.lift_slope_per_rad / state.mass_kg;
        let accel =
            right * (gain * (repose_right + jump_right)) + up_in_plane * (gain * jump_up);
        (accel, lag_right, lag_up)
    }
}
