//! Wind field models.
//!
//! The integrator only ever asks one question of the wind: what is the air
//! mass doing at this position and time? [`WindSource`] captures that query,
//! with a constant field, a piecewise downrange profile, and plain closures
//! all usable interchangeably.

use std::f64::consts::PI;

use nalgebra::Vector3;

/// A wind field sampled by projectile position and flight time.
///
/// Returned vectors are air-mass velocity in m/s, in the trajectory frame
/// (x downrange, y crossrange, z up).
pub trait WindSource {
    /// Wind vector at `position_m` at flight time `time_s`.
    fn sample(&self, position_m: &Vector3<f64>, time_s: f64) -> Vector3<f64>;
}

/// Any closure of position and time is a wind source.
impl<F> WindSource for F
where
    F: Fn(&Vector3<f64>, f64) -> Vector3<f64>,
{
    fn sample(&self, position_m: &Vector3<f64>, time_s: f64) -> Vector3<f64> {
        self(position_m, time_s)
    }
}

/// A uniform wind field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWind {
    velocity_mps: Vector3<f64>,
}

impl ConstantWind {
    /// A uniform field with the given air-mass velocity.
    pub fn new(velocity_mps: Vector3<f64>) -> Self {
        Self { velocity_mps }
    }

    /// Still air.
    pub fn zero() -> Self {
        Self {
            velocity_mps: Vector3::zeros(),
        }
    }
}

impl WindSource for ConstantWind {
    fn sample(&self, _position_m: &Vector3<f64>, _time_s: f64) -> Vector3<f64> {
        self.velocity_mps
    }
}

/// One band of a downrange wind profile.
///
/// `direction_deg` is the bearing the wind blows *from*, measured clockwise
/// from downrange: 0 is a headwind, 90 blows from the shooter's right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSegment {
    /// Wind speed (m/s)
    pub speed_mps: f64,
    /// Bearing the wind comes from (degrees clockwise from downrange)
    pub direction_deg: f64,
    /// Downrange distance (m) at which this segment ends
    pub until_distance_m: f64,
}

/// Piecewise-constant wind by downrange distance.
///
/// Each segment applies up to (exclusive) its end distance; past the last
/// segment the air is treated as still. Lookups are stateless, so the
/// integrator may sample the same distance repeatedly or out of order.
#[derive(Debug, Clone)]
pub struct SegmentedWind {
    segments: Vec<WindSegment>,
}

impl SegmentedWind {
    /// Build a profile from segments, sorted by end distance.
    pub fn new(mut segments: Vec<WindSegment>) -> Self {
        segments.sort_by(|a, b| a.until_distance_m.total_cmp(&b.until_distance_m));
        Self { segments }
    }

    fn segment_vector(segment: &WindSegment) -> Vector3<f64> {
        let angle_rad = segment.direction_deg * PI / 180.0;
        // blowing-to vector is opposite the from-bearing
        Vector3::new(
            -segment.speed_mps * angle_rad.cos(),
            -segment.speed_mps * angle_rad.sin(),
            0.0,
        )
    }
}

impl WindSource for SegmentedWind {
    fn sample(&self, position_m: &Vector3<f64>, _time_s: f64) -> Vector3<f64> {
        let range_m = position_m.x;
        if range_m.is_nan() {
            return Vector3::zeros();
        }
        for segment in &self.segments {
            if range_m < segment.until_distance_m {
                return Self::segment_vector(segment);
            }
        }
        Vector3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_is_still_air() {
        let wind = SegmentedWind::new(vec![]);
        assert_eq!(wind.sample(&Vector3::new(50.0, 0.0, 0.0), 0.0), Vector3::zeros());
    }

    #[test]
    fn single_segment_covers_its_band_only() {
        // 4.47 m/s (10 mph) from the right, out to 100 m
        let wind = SegmentedWind::new(vec![WindSegment {
            speed_mps: 4.47,
            direction_deg: 90.0,
            until_distance_m: 100.0,
        }]);

        let near = wind.sample(&Vector3::new(50.0, 0.0, 0.0), 0.1);
        assert!(near.x.abs() < 0.01);
        assert!(near.y < 0.0);
        assert_eq!(near.z, 0.0);
        assert!((near.norm() - 4.47).abs() < 1e-9);

        let far = wind.sample(&Vector3::new(150.0, 0.0, 0.0), 0.3);
        assert_eq!(far, Vector3::zeros());
    }

    #[test]
    fn segments_apply_in_distance_order() {
        // deliberately unsorted input
        let wind = SegmentedWind::new(vec![
            WindSegment {
                speed_mps: 2.0,
                direction_deg: 180.0,
                until_distance_m: 200.0,
            },
            WindSegment {
                speed_mps: 4.0,
                direction_deg: 90.0,
                until_distance_m: 50.0,
            },
        ]);

        let first = wind.sample(&Vector3::new(25.0, 0.0, 0.0), 0.0);
        assert!(first.y < 0.0);

        let second = wind.sample(&Vector3::new(120.0, 0.0, 0.0), 0.0);
        assert!(second.x > 0.0); // tailwind band
        assert!(second.norm() < first.norm());

        assert_eq!(wind.sample(&Vector3::new(250.0, 0.0, 0.0), 0.0), Vector3::zeros());
    }

    #[test]
    fn nan_range_yields_still_air() {
        let wind = SegmentedWind::new(vec![WindSegment {
            speed_mps: 4.0,
            direction_deg: 90.0,
            until_distance_m: 100.0,
        }]);
        assert_eq!(wind.sample(&Vector3::new(f64::NAN, 0.0, 0.0), 0.0), Vector3::zeros());
    }

    #[test]
    fn constant_wind_ignores_position_and_time() {
        let wind = ConstantWind::new(Vector3::new(0.0, -3.0, 0.0));
        assert_eq!(
            wind.sample(&Vector3::new(1.0, 2.0, 3.0), 0.5),
            Vector3::new(0.0, -3.0, 0.0)
        );
        assert_eq!(ConstantWind::zero().sample(&Vector3::zeros(), 0.0), Vector3::zeros());
    }

    #[test]
    fn closures_are_wind_sources() {
        let gusty = |position: &Vector3<f64>, _time: f64| {
            if position.x > 100.0 {
                Vector3::new(0.0, -5.0, 0.0)
            } else {
                Vector3::zeros()
            }
        };
        assert_eq!(gusty.sample(&Vector3::new(50.0, 0.0, 0.0), 0.0), Vector3::zeros());
        assert_eq!(
            gusty.sample(&Vector3::new(150.0, 0.0, 0.0), 0.0),
            Vector3::new(0.0, -5.0, 0.0)
        );
    }
}
