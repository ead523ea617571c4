//! Flight simulation driver.
//!
//! A [`Simulator`] owns the pieces of one shot: the launch state, the
//! atmosphere, the wind, the forces model, a clock, and the trajectory being
//! recorded. `simulate` runs fixed steps until the projectile passes a
//! downrange cutoff or the flight-time cap expires, whichever comes first.

use nalgebra::Vector3;

use crate::acceleration::AccelerationModel;
use crate::atmosphere::Atmosphere;
use crate::integrator;
use crate::projectile::ProjectileState;
use crate::trajectory::Trajectory;
use crate::wind::WindSource;
use crate::zeroing::{ZeroSolver, ZeroingResult};

/// Drives one projectile through the atmosphere and records the path.
#[derive(Debug, Clone)]
pub struct Simulator {
    initial: ProjectileState,
    current: ProjectileState,
    atmosphere: Atmosphere,
    wind_mps: Vector3<f64>,
    model: AccelerationModel,
    time_s: f64,
    trajectory: Trajectory,
}

impl Simulator {
    /// A simulator launching `initial` into the standard atmosphere with
    /// still air and the default forces model.
    pub fn new(initial: ProjectileState) -> Self {
        Self {
            initial,
            current: initial,
            atmosphere: Atmosphere::standard(),
            wind_mps: Vector3::zeros(),
            model: AccelerationModel::default(),
            time_s: 0.0,
            trajectory: Trajectory::new(),
        }
    }

    /// Install a new launch state, rewinding the clock and dropping any
    /// recorded trajectory.
    pub fn set_initial_state(&mut self, initial: ProjectileState) {
        self.initial = initial;
        self.current = initial;
        self.time_s = 0.0;
        self.trajectory.clear();
    }

    pub fn set_atmosphere(&mut self, atmosphere: Atmosphere) {
        self.atmosphere = atmosphere;
    }

    /// Set a uniform wind used by [`Simulator::simulate`] and
    /// [`Simulator::time_step`].
    pub fn set_wind(&mut self, wind_mps: Vector3<f64>) {
        self.wind_mps = wind_mps;
    }

    pub fn set_model(&mut self, model: AccelerationModel) {
        self.model = model;
    }

    /// Rewind to the launch state: clock to zero, trajectory cleared.
    pub fn reset_to_initial(&mut self) {
        self.current = self.initial;
        self.time_s = 0.0;
        self.trajectory.clear();
    }

    pub fn initial_state(&self) -> &ProjectileState {
        &self.initial
    }

    pub fn current_state(&self) -> &ProjectileState {
        &self.current
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub fn wind_mps(&self) -> Vector3<f64> {
        self.wind_mps
    }

    pub fn model(&self) -> &AccelerationModel {
        &self.model
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Advance one step of `dt_s` under the current wind and record the new
    /// state.
    pub fn time_step(&mut self, dt_s: f64) {
        let air_density = self.atmosphere.air_density();
        self.current =
            integrator::step(&self.model, &self.current, &self.wind_mps, air_density, dt_s);
        self.time_s += dt_s;
        self.trajectory.add_point(self.time_s, self.current, self.wind_mps);
    }

    /// Run until the projectile passes `max_distance_m` downrange or
    /// `max_time_s` of flight time elapses. The state at entry is recorded
    /// as the first trajectory point.
    pub fn simulate(&mut self, max_distance_m: f64, dt_s: f64, max_time_s: f64) {
        self.trajectory.add_point(self.time_s, self.current, self.wind_mps);
        let start = self.time_s;
        while self.time_s < start + max_time_s {
            self.time_step(dt_s);
            if self.current.position_m.x > max_distance_m {
                break;
            }
        }
    }

    /// Like [`Simulator::simulate`], but the wind is re-sampled from `wind`
    /// at the current position and time before every step.
    pub fn simulate_with<W>(&mut self, wind: &W, max_distance_m: f64, dt_s: f64, max_time_s: f64)
    where
        W: WindSource + ?Sized,
    {
        self.wind_mps = wind.sample(&self.current.position_m, self.time_s);
        self.trajectory.add_point(self.time_s, self.current, self.wind_mps);
        let start = self.time_s;
        while self.time_s < start + max_time_s {
            self.wind_mps = wind.sample(&self.current.position_m, self.time_s);
            self.time_step(dt_s);
            if self.current.position_m.x > max_distance_m {
                break;
            }
        }
    }

    /// Solve for the launch angles that put the shot on `target_m`, leaving
    /// the simulator loaded with the zeroed launch state. See [`ZeroSolver`]
    /// for the iteration details.
    pub fn compute_zero(
        &mut self,
        muzzle_speed_mps: f64,
        target_m: Vector3<f64>,
        dt_s: f64,
        max_iterations: usize,
        tolerance_m: f64,
    ) -> ZeroingResult {
        ZeroSolver::new(target_m, tolerance_m, max_iterations).solve(self, muzzle_speed_mps, dt_s)
    }
}
