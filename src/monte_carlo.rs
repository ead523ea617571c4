//! Shot-group dispersion simulation.
//!
//! Zeroes once at the nominal muzzle speed, then fires N independent shots
//! with sampled launch variation: Normal muzzle-speed spread (clipped at
//! three sigma), a uniform-disk rifle accuracy scatter on the launch angles,
//! and a per-shot Normal wind. Every shot runs on its own simulator, so the
//! loop parallelizes cleanly; the collected impacts give the usual group
//! statistics.
//!
//! Randomness is fully seeded: the same config always produces the same
//! group, shot for shot, regardless of thread scheduling.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::atmosphere::Atmosphere;
use crate::error::{BallisticsError, Result};
use crate::projectile::ProjectileState;
use crate::simulator::Simulator;
use crate::zeroing::{ZeroSolver, ZeroingResult};

/// Flight-time cap per shot (s).
const MAX_SHOT_FLIGHT_TIME_S: f64 = 5.0;

/// Pre-zero acceptance and budget.
const ZERO_TOLERANCE_M: f64 = 0.01;
const ZERO_MAX_ITERATIONS: usize = 20;

/// Muzzle-speed samples are clipped at this many standard deviations.
const MUZZLE_SPEED_CLIP_SIGMA: f64 = 3.0;

/// One group simulation: how many shots, at what range, with how much
/// variation.
#[derive(Debug, Clone, Copy)]
pub struct DispersionConfig {
    /// Shots to fire
    pub shot_count: usize,
    /// Downrange distance of the target (m)
    pub target_range_m: f64,
    /// Nominal muzzle speed (m/s)
    pub nominal_muzzle_speed_mps: f64,
    /// Standard deviation of the muzzle speed (m/s)
    pub muzzle_speed_sd_mps: f64,
    /// Radius of the uniform-disk launch-angle scatter (rad)
    pub accuracy_radius_rad: f64,
    /// Per-axis standard deviation of the horizontal wind (m/s)
    pub wind_speed_sd_mps: f64,
    /// Master seed; per-shot generators derive from it
    pub seed: u64,
    /// Integration timestep (s)
    pub dt_s: f64,
}

/// Where one shot landed, as offsets from the aim point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotImpact {
    /// Shot index within the group
    pub shot: usize,
    /// Crossrange offset at the target range (m)
    pub crossrange_m: f64,
    /// Vertical offset at the target range (m)
    pub vertical_m: f64,
    /// Time of flight to the target range (s)
    pub time_s: f64,
    /// Remaining speed at the target range (m/s)
    pub speed_mps: f64,
}

/// A simulated group and its statistics.
#[derive(Debug, Clone)]
pub struct GroupResult {
    /// The pre-zero solved at the nominal muzzle speed
    pub zero: ZeroingResult,
    /// Impacts of the shots that reached the target range, in shot order
    pub impacts: Vec<ShotImpact>,
    /// Shots fired, including any that fell short
    pub attempted: usize,
    /// Group center, crossrange (m)
    pub center_crossrange_m: f64,
    /// Group center, vertical (m)
    pub center_vertical_m: f64,
    /// Mean distance of impacts from the group center (m)
    pub mean_radius_m: f64,
    /// Largest distance between any two impacts (m)
    pub extreme_spread_m: f64,
}

/// Fire a group from `template` (its spin rate applies to every shot) under
/// `atmosphere`.
///
/// Shots that never reach the target range within the flight-time cap are
/// left out of the impact list rather than treated as errors. The pre-zero
/// may itself come back unconverged; its result is passed through so callers
/// can check.
///
/// # Errors
/// [`BallisticsError::InvalidDispersion`] if a spread parameter is negative
/// or non-finite.
pub fn simulate_group(
    template: &ProjectileState,
    atmosphere: Atmosphere,
    config: &DispersionConfig,
) -> Result<GroupResult> {
    let muzzle_spread = Normal::new(0.0, config.muzzle_speed_sd_mps).map_err(|e| {
        BallisticsError::InvalidDispersion(format!(
            "muzzle speed sd {}: {e}",
            config.muzzle_speed_sd_mps
        ))
    })?;
    let wind_spread = Normal::new(0.0, config.wind_speed_sd_mps).map_err(|e| {
        BallisticsError::InvalidDispersion(format!(
            "wind speed sd {}: {e}",
            config.wind_speed_sd_mps
        ))
    })?;
    if !(config.accuracy_radius_rad >= 0.0 && config.accuracy_radius_rad.is_finite()) {
        return Err(BallisticsError::InvalidDispersion(format!(
            "accuracy radius {}",
            config.accuracy_radius_rad
        )));
    }

    let mut zero_sim = Simulator::new(*template);
    zero_sim.set_atmosphere(atmosphere);
    let zero = ZeroSolver::new(
        Vector3::new(config.target_range_m, 0.0, 0.0),
        ZERO_TOLERANCE_M,
        ZERO_MAX_ITERATIONS,
    )
    .solve(&mut zero_sim, config.nominal_muzzle_speed_mps, config.dt_s);

    let shot_template = zero.state;
    let impacts: Vec<Option<ShotImpact>> = (0..config.shot_count)
        .into_par_iter()
        .map(|shot| {
            let shot_seed =
                config.seed ^ (shot as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let mut rng = StdRng::seed_from_u64(shot_seed);

            let clip = MUZZLE_SPEED_CLIP_SIGMA * config.muzzle_speed_sd_mps;
            let speed_delta = muzzle_spread.sample(&mut rng).clamp(-clip, clip);
            let speed = config.nominal_muzzle_speed_mps + speed_delta;

            // uniform over a disk in angle space
            let radius = config.accuracy_radius_rad * rng.gen::<f64>().sqrt();
            let theta = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
            let elevation = zero.elevation_rad + radius * theta.sin();
            let azimuth = zero.azimuth_rad + radius * theta.cos();

            let wind = Vector3::new(
                wind_spread.sample(&mut rng),
                wind_spread.sample(&mut rng),
                0.0,
            );

            let velocity = Vector3::new(
                speed * elevation.cos() * azimuth.cos(),
                speed * elevation.cos() * azimuth.sin(),
                speed * elevation.sin(),
            );
            let launch = shot_template.with_flight(
                Vector3::zeros(),
                velocity,
                shot_template.spin_rate_rad_s,
            );

            let mut sim = Simulator::new(launch);
            sim.set_atmosphere(atmosphere);
            sim.set_wind(wind);
            sim.simulate(1.1 * config.target_range_m, config.dt_s, MAX_SHOT_FLIGHT_TIME_S);

            if sim.trajectory().total_distance_m() < config.target_range_m {
                return None; // fell short, no impact to record
            }
            let point = sim.trajectory().at_distance(config.target_range_m)?;
            Some(ShotImpact {
                shot,
                crossrange_m: point.state.position_m.y,
                vertical_m: point.state.position_m.z,
                time_s: point.time_s,
                speed_mps: point.speed_mps(),
            })
        })
        .collect();

    let impacts: Vec<ShotImpact> = impacts.into_iter().flatten().collect();
    Ok(group_statistics(zero, impacts, config.shot_count))
}

fn group_statistics(
    zero: ZeroingResult,
    impacts: Vec<ShotImpact>,
    attempted: usize,
) -> GroupResult {
    if impacts.is_empty() {
        return GroupResult {
            zero,
            impacts,
            attempted,
            center_crossrange_m: 0.0,
            center_vertical_m: 0.0,
            mean_radius_m: 0.0,
            extreme_spread_m: 0.0,
        };
    }

    let n = impacts.len() as f64;
    let center_crossrange_m = impacts.iter().map(|i| i.crossrange_m).sum::<f64>() / n;
    let center_vertical_m = impacts.iter().map(|i| i.vertical_m).sum::<f64>() / n;

    let mean_radius_m = impacts
        .iter()
        .map(|i| {
            let dy = i.crossrange_m - center_crossrange_m;
            let dz = i.vertical_m - center_vertical_m;
            (dy * dy + dz * dz).sqrt()
        })
        .sum::<f64>()
        / n;

    let mut extreme_spread_m: f64 = 0.0;
    for (idx, a) in impacts.iter().enumerate() {
        for b in &impacts[idx + 1..] {
            let dy = a.crossrange_m - b.crossrange_m;
            let dz = a.vertical_m - b.vertical_m;
            extreme_spread_m = extreme_spread_m.max((dy * dy + dz * dz).sqrt());
        }
    }

    GroupResult {
        zero,
        impacts,
        attempted,
        center_crossrange_m,
        center_vertical_m,
        mean_radius_m,
        extreme_spread_m,
    }
}
