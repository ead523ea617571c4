//! Trajectory recording and queries.
//!
//! A trajectory is the append-only list of states a flight produced, one
//! point per integration step plus the initial state. Queries interpolate
//! between recorded points rather than re-integrating: good enough for range
//! cards, and it keeps lookups cheap no matter how fine the timestep was.

use nalgebra::Vector3;

use crate::error::{BallisticsError, Result};
use crate::projectile::ProjectileState;

/// One recorded sample of a flight.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryPoint {
    /// Flight time (s)
    pub time_s: f64,
    /// Projectile state at this time
    pub state: ProjectileState,
    /// Wind the projectile saw at this point (m/s)
    pub wind_mps: Vector3<f64>,
}

impl TrajectoryPoint {
    /// Downrange distance (m), the x coordinate.
    pub fn distance_m(&self) -> f64 {
        self.state.position_m.x
    }

    /// Speed (m/s).
    pub fn speed_mps(&self) -> f64 {
        self.state.speed()
    }

    /// Kinetic energy (J).
    pub fn kinetic_energy_j(&self) -> f64 {
        self.state.kinetic_energy()
    }
}

/// Linear blend of two recorded points at fraction `t`, stamped with the
/// given time. Static projectile properties and the carried lag angles come
/// from the lower bracket.
fn lerp_points(a: &TrajectoryPoint, b: &TrajectoryPoint, t: f64, time_s: f64) -> TrajectoryPoint {
    let position = a.state.position_m.lerp(&b.state.position_m, t);
    let velocity = a.state.velocity_mps.lerp(&b.state.velocity_mps, t);
    let spin = a.state.spin_rate_rad_s + t * (b.state.spin_rate_rad_s - a.state.spin_rate_rad_s);
    TrajectoryPoint {
        time_s,
        state: a.state.with_flight(position, velocity, spin),
        wind_mps: a.wind_mps.lerp(&b.wind_mps, t),
    }
}

/// Recorded flight path.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.
    pub fn add_point(&mut self, time_s: f64, state: ProjectileState, wind_mps: Vector3<f64>) {
        self.points.push(TrajectoryPoint {
            time_s,
            state,
            wind_mps,
        });
    }

    /// The point at `index`.
    ///
    /// # Errors
    /// [`BallisticsError::IndexOutOfRange`] when `index` is past the end.
    pub fn point(&self, index: usize) -> Result<&TrajectoryPoint> {
        self.points.get(index).ok_or(BallisticsError::IndexOutOfRange {
            index,
            len: self.points.len(),
        })
    }

    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All recorded points in flight order.
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    /// Drop all recorded points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The flight state at a downrange distance, interpolated between the
    /// bracketing samples. Queries beyond either end clamp to the endpoint;
    /// an empty trajectory has no answer.
    pub fn at_distance(&self, distance_m: f64) -> Option<TrajectoryPoint> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if distance_m >= last.distance_m() {
            return Some(*last);
        }
        if distance_m <= first.distance_m() {
            return Some(*first);
        }

        let (left, right) = self.bracket(distance_m, |p| p.distance_m());
        let d1 = self.points[left].distance_m();
        let d2 = self.points[right].distance_m();
        let t = (distance_m - d1) / (d2 - d1);
        let time_s =
            self.points[left].time_s + t * (self.points[right].time_s - self.points[left].time_s);
        Some(lerp_points(&self.points[left], &self.points[right], t, time_s))
    }

    /// The flight state at a time, interpolated between the bracketing
    /// samples. Same clamp rules as [`Trajectory::at_distance`]; the returned
    /// point is stamped with the query time.
    pub fn at_time(&self, time_s: f64) -> Option<TrajectoryPoint> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if time_s >= last.time_s {
            return Some(*last);
        }
        if time_s <= first.time_s {
            return Some(*first);
        }

        let (left, right) = self.bracket(time_s, |p| p.time_s);
        let t1 = self.points[left].time_s;
        let t2 = self.points[right].time_s;
        let t = (time_s - t1) / (t2 - t1);
        Some(lerp_points(&self.points[left], &self.points[right], t, time_s))
    }

    /// Narrow `[left, right]` to adjacent indices bracketing `target` under
    /// `key`. Callers have already excluded the endpoints, so the list holds
    /// at least two points here.
    fn bracket<F>(&self, target: f64, key: F) -> (usize, usize)
    where
        F: Fn(&TrajectoryPoint) -> f64,
    {
        let mut left = 0;
        let mut right = self.points.len() - 1;
        while left < right - 1 {
            let mid = left + (right - left) / 2;
            if target < key(&self.points[mid]) {
                right = mid;
            } else {
                left = mid;
            }
        }
        (left, right)
    }

    /// Downrange distance of the last point (m), zero when empty.
    pub fn total_distance_m(&self) -> f64 {
        self.points.last().map_or(0.0, TrajectoryPoint::distance_m)
    }

    /// Time of the last point (s), zero when empty.
    pub fn total_time_s(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time_s)
    }

    /// Highest altitude reached over the recorded points (m), never below
    /// zero.
    pub fn max_height_m(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.state.position_m.z)
            .fold(0.0, f64::max)
    }

    /// Speed at the last point (m/s), zero when empty.
    pub fn impact_speed_mps(&self) -> f64 {
        self.points.last().map_or(0.0, TrajectoryPoint::speed_mps)
    }

    /// Angle below horizontal of the final velocity (rad), zero when empty.
    pub fn impact_angle_rad(&self) -> f64 {
        self.points.last().map_or(0.0, |p| {
            let v = p.state.velocity_mps;
            (-v.z).atan2(v.x)
        })
    }
}
