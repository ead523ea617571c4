//! Iterative zeroing solver.
//!
//! Finds the launch elevation and azimuth that put a shot on a target point.
//! Each trial fires from the origin, flies past the target range, reads the
//! trajectory back at the target distance, and nudges both angles by half the
//! small-angle correction. The damping trades a few extra iterations for
//! stability with strong drag and wind.
//!
//! Non-convergence is a soft outcome: the result always carries the
//! best-available angles plus enough metadata (phase, iterations, final miss)
//! for the caller to decide whether it is usable.

use nalgebra::Vector3;

use crate::projectile::ProjectileState;
use crate::simulator::Simulator;

/// Starting elevation guess (rad); slightly above the bore line so the first
/// trial brackets a flat-fire solution.
const INITIAL_ELEVATION_RAD: f64 = 1.0e-3;

/// Fraction of the raw angular correction applied per iteration.
const CORRECTION_DAMPING: f64 = 0.5;

/// Trials sweep this factor past the target distance so the read-back never
/// clamps to the final point.
const SWEEP_DISTANCE_FACTOR: f64 = 1.1;

/// Flight-time cap per trial (s).
const MAX_TRIAL_FLIGHT_TIME_S: f64 = 5.0;

/// Where the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPhase {
    /// Still correcting; never the final phase of a finished solve.
    Iterating,
    /// Miss distance fell below tolerance.
    Converged,
    /// Budget ran out, or no trajectory point was available at the target
    /// distance. The angles are the best estimate so far.
    Exhausted,
}

/// Outcome of a zeroing solve.
#[derive(Debug, Clone, Copy)]
pub struct ZeroingResult {
    /// Launch elevation above horizontal (rad)
    pub elevation_rad: f64,
    /// Launch azimuth from downrange (rad)
    pub azimuth_rad: f64,
    /// The zeroed launch state installed into the simulator
    pub state: ProjectileState,
    /// Terminal phase of the solve
    pub phase: ZeroPhase,
    /// Trials actually flown
    pub iterations: usize,
    /// Crossrange/vertical miss at the target distance on the last measured
    /// trial (m); infinite if no trial produced a point at range
    pub miss_distance_m: f64,
}

impl ZeroingResult {
    pub fn is_converged(&self) -> bool {
        self.phase == ZeroPhase::Converged
    }
}

/// Solver configuration: the target point, the acceptable 2-D miss, and the
/// trial budget.
#[derive(Debug, Clone, Copy)]
pub struct ZeroSolver {
    target_m: Vector3<f64>,
    tolerance_m: f64,
    max_iterations: usize,
}

impl ZeroSolver {
    pub fn new(target_m: Vector3<f64>, tolerance_m: f64, max_iterations: usize) -> Self {
        Self {
            target_m,
            tolerance_m,
            max_iterations,
        }
    }

    /// Run the solve on `sim`, firing at `muzzle_speed_mps` with timestep
    /// `dt_s` per trial.
    ///
    /// Uses the simulator's initial state as the projectile template (its
    /// spin rate carries into every trial) and its atmosphere and wind as the
    /// firing conditions. On return the simulator is loaded with the zeroed
    /// launch state, clock and trajectory reset, ready to fire.
    pub fn solve(&self, sim: &mut Simulator, muzzle_speed_mps: f64, dt_s: f64) -> ZeroingResult {
        let target_distance = self.target_m.norm();
        let sweep_distance = SWEEP_DISTANCE_FACTOR * target_distance;
        let template = *sim.initial_state();

        let mut elevation_rad = INITIAL_ELEVATION_RAD;
        let mut azimuth_rad = 0.0;
        let mut phase = ZeroPhase::Iterating;
        let mut iterations = 0;
        let mut miss_distance_m = f64::INFINITY;

        for _ in 0..self.max_iterations {
            iterations += 1;
            sim.set_initial_state(launch_state(
                &template,
                muzzle_speed_mps,
                elevation_rad,
                azimuth_rad,
            ));
            sim.simulate(sweep_distance, dt_s, MAX_TRIAL_FLIGHT_TIME_S);

            let Some(at_range) = sim.trajectory().at_distance(target_distance) else {
                break;
            };
            let error = at_range.state.position_m - self.target_m;
            miss_distance_m = (error.y * error.y + error.z * error.z).sqrt();
            if miss_distance_m < self.tolerance_m {
                phase = ZeroPhase::Converged;
                break;
            }

            elevation_rad += CORRECTION_DAMPING * (-error.z).atan2(target_distance);
            azimuth_rad += CORRECTION_DAMPING * (-error.y).atan2(target_distance);
        }

        if phase != ZeroPhase::Converged {
            phase = ZeroPhase::Exhausted;
        }

        let state = launch_state(&template, muzzle_speed_mps, elevation_rad, azimuth_rad);
        sim.set_initial_state(state);

        ZeroingResult {
            elevation_rad,
            azimuth_rad,
            state,
            phase,
            iterations,
            miss_distance_m,
        }
    }
}

/// Launch state at the origin with the given angles, carrying the template's
/// physical properties and spin but fresh lag-filter memory.
fn launch_state(
    template: &ProjectileState,
    muzzle_speed_mps: f64,
    elevation_rad: f64,
    azimuth_rad: f64,
) -> ProjectileState {
    let velocity = Vector3::new(
        muzzle_speed_mps * elevation_rad.cos() * azimuth_rad.cos(),
        muzzle_speed_mps * elevation_rad.cos() * azimuth_rad.sin(),
        muzzle_speed_mps * elevation_rad.sin(),
    );
    template
        .with_lag(0.0, 0.0)
        .with_flight(Vector3::zeros(), velocity, template.spin_rate_rad_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragFamily;

    fn rifle() -> ProjectileState {
        ProjectileState::new(0.010886, 0.00782, 0.031, 0.223, DragFamily::G7)
    }

    #[test]
    fn flat_fire_zero_converges() {
        let mut sim = Simulator::new(rifle());
        let solver = ZeroSolver::new(Vector3::new(100.0, 0.0, 0.0), 0.01, 20);
        let result = solver.solve(&mut sim, 800.0, 1.0e-3);

        assert!(result.is_converged());
        assert_eq!(result.phase, ZeroPhase::Converged);
        assert!(result.miss_distance_m < 0.01);
        // holds over by well under a degree at 100 m
        assert!(result.elevation_rad > 0.0);
        assert!(result.elevation_rad < 5.0e-3);
        assert!(result.iterations <= 20);
    }

    #[test]
    fn converged_state_is_installed_and_reflies_on_target() {
        let mut sim = Simulator::new(rifle());
        let solver = ZeroSolver::new(Vector3::new(100.0, 0.0, 0.0), 0.01, 20);
        let result = solver.solve(&mut sim, 800.0, 1.0e-3);
        assert!(result.is_converged());

        assert_eq!(sim.time_s(), 0.0);
        assert!(sim.trajectory().is_empty());
        assert_eq!(
            sim.initial_state().velocity_mps,
            result.state.velocity_mps
        );

        sim.simulate(110.0, 1.0e-3, 5.0);
        let at_target = sim.trajectory().at_distance(100.0).unwrap();
        assert!(at_target.state.position_m.z.abs() < 0.01);
        assert!(at_target.state.position_m.y.abs() < 0.01);
    }

    #[test]
    fn impossible_tolerance_exhausts_softly() {
        let mut sim = Simulator::new(rifle());
        let solver = ZeroSolver::new(Vector3::new(100.0, 0.0, 0.0), 1.0e-12, 3);
        let result = solver.solve(&mut sim, 800.0, 1.0e-3);

        assert!(!result.is_converged());
        assert_eq!(result.phase, ZeroPhase::Exhausted);
        assert_eq!(result.iterations, 3);
        assert!(result.miss_distance_m.is_finite());
        assert!(result.elevation_rad.is_finite());
    }

    #[test]
    fn crosswind_pulls_the_azimuth_off_axis() {
        let mut sim = Simulator::new(
            rifle().with_flight(Vector3::zeros(), Vector3::zeros(), 18_000.0),
        );
        sim.set_wind(Vector3::new(0.0, -4.0, 0.0));
        let solver = ZeroSolver::new(Vector3::new(100.0, 0.0, 0.0), 0.01, 30);
        let result = solver.solve(&mut sim, 800.0, 1.0e-3);

        assert!(result.is_converged());
        assert!(result.azimuth_rad != 0.0);
        // spin survives into the zeroed launch state, lag memory does not
        assert_eq!(result.state.spin_rate_rad_s, 18_000.0);
        assert_eq!(result.state.lag_angles(), (0.0, 0.0));
    }

    #[test]
    fn template_lag_memory_is_reset_per_trial() {
        let template = rifle()
            .with_lag(4.0e-4, -2.0e-4)
            .with_flight(Vector3::zeros(), Vector3::zeros(), 12_000.0);
        let mut sim = Simulator::new(template);
        let solver = ZeroSolver::new(Vector3::new(100.0, 0.0, 0.0), 0.01, 20);
        let result = solver.solve(&mut sim, 800.0, 1.0e-3);
        assert_eq!(result.state.lag_angles(), (0.0, 0.0));
    }
}
