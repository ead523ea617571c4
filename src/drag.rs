//! Table-driven drag model for the G1 and G7 reference projectiles.
//!
//! Each family is a fixed table of `(velocity_fps, coefficient, exponent)`
//! rows ordered by descending velocity. Retardation follows the classic
//! formulation `a * v^m / BC` in imperial units, scaled by the air density
//! ratio and converted back to SI. The tables are compiled-in constants and
//! are never interpolated: each velocity band has one constant coefficient
//! pair.

use std::fmt;
use std::str::FromStr;

use crate::constants::{FPS_TO_MPS, MPS_TO_FPS, STANDARD_AIR_DENSITY};

/// Reference drag-function family.
///
/// G1 suits flat-base projectiles; G7 suits long boat-tail projectiles. A
/// ballistic coefficient is only meaningful together with the family it was
/// measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragFamily {
    G1,
    G7,
}

impl fmt::Display for DragFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragFamily::G1 => write!(f, "G1"),
            DragFamily::G7 => write!(f, "G7"),
        }
    }
}

impl FromStr for DragFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "G1" => Ok(DragFamily::G1),
            "G7" => Ok(DragFamily::G7),
            other => Err(format!("unknown drag family '{other}', expected G1 or G7")),
        }
    }
}

/// One velocity band of a drag table.
#[derive(Debug, Clone, Copy)]
pub struct DragEntry {
    /// Lower velocity edge of the band (fps); the band extends up to the
    /// previous row's breakpoint
    pub velocity_fps: f64,
    /// Retardation coefficient `a`
    pub coefficient: f64,
    /// Velocity exponent `m`
    pub exponent: f64,
}

const fn entry(velocity_fps: f64, coefficient: f64, exponent: f64) -> DragEntry {
    DragEntry {
        velocity_fps,
        coefficient,
        exponent,
    }
}

/// G7 drag function data, 9 bands
static G7_TABLE: [DragEntry; 9] = [
    entry(4200.0, 1.29081656775919e-9, 3.24121295355962),
    entry(3000.0, 0.0171422231434847, 1.27907168025204),
    entry(1470.0, 2.33355948302505e-3, 1.52693913274526),
    entry(1260.0, 7.97592111627665e-4, 1.67688974440324),
    entry(1110.0, 5.71086414289273e-12, 4.3212826264889),
    entry(960.0, 3.02865108244904e-17, 5.99074203776707),
    entry(670.0, 7.52285155782565e-6, 2.1738019851075),
    entry(540.0, 1.31766281225189e-5, 2.08774690257991),
    entry(0.0, 1.34504843776525e-5, 2.08702306738884),
];

/// G1 drag function data, 25 bands
static G1_TABLE: [DragEntry; 25] = [
    entry(4230.0, 1.477404177730177e-4, 1.9565),
    entry(3680.0, 1.920339268755614e-4, 1.925),
    entry(3450.0, 2.894751026819746e-4, 1.875),
    entry(3295.0, 4.349905111115636e-4, 1.825),
    entry(3130.0, 6.520421871892662e-4, 1.775),
    entry(2960.0, 9.748073694078696e-4, 1.725),
    entry(2830.0, 1.453721560187286e-3, 1.675),
    entry(2680.0, 2.162887202930376e-3, 1.625),
    entry(2460.0, 3.209559783129881e-3, 1.575),
    entry(2225.0, 3.904368218691249e-3, 1.55),
    entry(2015.0, 3.222942271262336e-3, 1.575),
    entry(1890.0, 2.203329542297809e-3, 1.625),
    entry(1810.0, 1.511001028891904e-3, 1.675),
    entry(1730.0, 8.609957592468259e-4, 1.75),
    entry(1595.0, 4.086146797305117e-4, 1.85),
    entry(1520.0, 1.954473210037398e-4, 1.95),
    entry(1420.0, 5.431896266462351e-5, 2.125),
    entry(1360.0, 8.847742581674416e-6, 2.375),
    entry(1315.0, 1.456922328720298e-6, 2.625),
    entry(1280.0, 2.419485191895565e-7, 2.875),
    entry(1220.0, 1.657956321067612e-8, 3.25),
    entry(1185.0, 4.745469537157371e-10, 3.75),
    entry(1150.0, 1.379746590025088e-11, 4.25),
    entry(1100.0, 4.070157961147882e-13, 4.75),
    entry(1060.0, 2.938236954847331e-14, 5.125),
];

impl DragFamily {
    /// The retardation table for this family.
    pub fn table(&self) -> &'static [DragEntry] {
        match self {
            DragFamily::G1 => &G1_TABLE,
            DragFamily::G7 => &G7_TABLE,
        }
    }
}

/// Look up the `(coefficient, exponent)` pair for a speed in fps.
///
/// Speeds at or above the first breakpoint clamp to the first row; speeds at
/// or below zero, or below the last breakpoint, clamp to the last row. In
/// between, row `i` covers the band `(breakpoint_i, breakpoint_{i-1}]`: the
/// selected row is the one with the largest breakpoint strictly below the
/// speed. Pure function over the immutable table, no allocation.
pub fn lookup(speed_fps: f64, family: DragFamily) -> (f64, f64) {
    let table = family.table();

    let last = &table[table.len() - 1];
    if speed_fps <= 0.0 {
        return (last.coefficient, last.exponent);
    }
    let first = &table[0];
    if speed_fps >= first.velocity_fps {
        return (first.coefficient, first.exponent);
    }

    // Breakpoints descend, so rows with velocity >= speed form a prefix; the
    // partition point is the first row whose breakpoint sits below the speed.
    let idx = table.partition_point(|e| e.velocity_fps >= speed_fps);
    let row = if idx < table.len() { &table[idx] } else { last };
    (row.coefficient, row.exponent)
}

/// Drag retardation (deceleration magnitude) in m/s² for an air-relative
/// speed in m/s.
///
/// `a * v_fps^m` gives fps/s for a reference projectile at standard density;
/// the density ratio and the ballistic coefficient scale it to the actual
/// projectile and air. Non-positive table coefficients yield zero.
pub fn retardation_mps2(
    airspeed_mps: f64,
    family: DragFamily,
    ballistic_coefficient: f64,
    air_density: f64,
) -> f64 {
    let v_fps = airspeed_mps * MPS_TO_FPS;
    let (a, m) = lookup(v_fps, family);
    if a <= 0.0 || m <= 0.0 {
        return 0.0;
    }

    let density_ratio = air_density / STANDARD_AIR_DENSITY;
    let ret_fps_s = a * v_fps.powf(m) * density_ratio / ballistic_coefficient;
    ret_fps_s * FPS_TO_MPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lookup_clamps_high() {
        for family in [DragFamily::G1, DragFamily::G7] {
            let first = &family.table()[0];
            let (a, m) = lookup(1.0e9, family);
            assert_eq!(a, first.coefficient);
            assert_eq!(m, first.exponent);
            // Exactly at the first breakpoint also clamps high
            let (a_edge, _) = lookup(first.velocity_fps, family);
            assert_eq!(a_edge, first.coefficient);
        }
    }

    #[test]
    fn lookup_clamps_low() {
        for family in [DragFamily::G1, DragFamily::G7] {
            let last = family.table().last().copied().unwrap();
            for speed in [0.0, -100.0] {
                let (a, m) = lookup(speed, family);
                assert_eq!(a, last.coefficient);
                assert_eq!(m, last.exponent);
            }
        }
    }

    #[test]
    fn lookup_selects_band_below_speed() {
        // 2000 fps sits in the (1890, 2015] band of the G1 table
        let (a, m) = lookup(2000.0, DragFamily::G1);
        assert_eq!(a, 2.203329542297809e-3);
        assert_eq!(m, 1.625);

        // A breakpoint belongs to the band below it
        let (a_edge, _) = lookup(2015.0, DragFamily::G1);
        assert_eq!(a_edge, 2.203329542297809e-3);

        // Just above the breakpoint moves one band up
        let (a_above, m_above) = lookup(2015.001, DragFamily::G1);
        assert_eq!(a_above, 3.222942271262336e-3);
        assert_eq!(m_above, 1.575);
    }

    #[test]
    fn lookup_below_last_breakpoint() {
        // G1 stops at 1060 fps; slower speeds reuse the last band
        let last = G1_TABLE.last().unwrap();
        let (a, _) = lookup(500.0, DragFamily::G1);
        assert_eq!(a, last.coefficient);

        // G7 runs all the way to zero, so slow speeds land in the 0 fps band
        let (a7, _) = lookup(300.0, DragFamily::G7);
        assert_eq!(a7, 1.34504843776525e-5);
    }

    #[test]
    fn retardation_scales_with_bc_and_density() {
        let base = retardation_mps2(800.0, DragFamily::G7, 0.25, STANDARD_AIR_DENSITY);
        assert!(base > 0.0 && base.is_finite());

        // Doubling BC halves retardation
        let high_bc = retardation_mps2(800.0, DragFamily::G7, 0.5, STANDARD_AIR_DENSITY);
        assert_relative_eq!(high_bc, base / 2.0, epsilon = 1e-9);

        // Retardation is linear in density
        let thin_air = retardation_mps2(800.0, DragFamily::G7, 0.25, STANDARD_AIR_DENSITY * 0.8);
        assert_relative_eq!(thin_air, base * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn retardation_magnitude_is_plausible() {
        // A 0.25 G7 BC bullet at 800 m/s decelerates on the order of tens of g
        let ret = retardation_mps2(800.0, DragFamily::G7, 0.25, STANDARD_AIR_DENSITY);
        assert!(ret > 100.0 && ret < 1000.0, "retardation {ret} out of range");
    }

    #[test]
    fn family_parsing() {
        assert_eq!("g7".parse::<DragFamily>().unwrap(), DragFamily::G7);
        assert_eq!("G1".parse::<DragFamily>().unwrap(), DragFamily::G1);
        assert!("G8".parse::<DragFamily>().is_err());
    }
}
