//! Conversions between SI and the customary units of the shooting sports.
//!
//! The simulation itself is SI everywhere (kg, m, m/s, rad, s, Pa, K); these
//! helpers live at the edges, converting user-facing imperial quantities on
//! the way in and out.

use std::f64::consts::PI;

use crate::constants::{FPS_TO_MPS, GRAINS_TO_KG, INCHES_TO_METERS, MPS_TO_FPS, YARDS_TO_METERS};

/// Feet per second to meters per second
#[inline]
pub fn fps_to_mps(fps: f64) -> f64 {
    fps * FPS_TO_MPS
}

/// Meters per second to feet per second
#[inline]
pub fn mps_to_fps(mps: f64) -> f64 {
    mps * MPS_TO_FPS
}

/// Grains to kilograms
#[inline]
pub fn grains_to_kg(grains: f64) -> f64 {
    grains * GRAINS_TO_KG
}

/// Kilograms to grains
#[inline]
pub fn kg_to_grains(kg: f64) -> f64 {
    kg / GRAINS_TO_KG
}

/// Yards to meters
#[inline]
pub fn yards_to_meters(yards: f64) -> f64 {
    yards * YARDS_TO_METERS
}

/// Meters to yards
#[inline]
pub fn meters_to_yards(meters: f64) -> f64 {
    meters / YARDS_TO_METERS
}

/// Inches to meters
#[inline]
pub fn inches_to_meters(inches: f64) -> f64 {
    inches * INCHES_TO_METERS
}

/// Minutes of angle to radians
#[inline]
pub fn moa_to_radians(moa: f64) -> f64 {
    moa * PI / (180.0 * 60.0)
}

/// Radians to minutes of angle
#[inline]
pub fn radians_to_moa(rad: f64) -> f64 {
    rad * (180.0 * 60.0) / PI
}

/// Milliradians to radians
#[inline]
pub fn mrad_to_radians(mrad: f64) -> f64 {
    mrad * 1.0e-3
}

/// Radians to milliradians
#[inline]
pub fn radians_to_mrad(rad: f64) -> f64 {
    rad * 1.0e3
}

/// Barrel twist in inches per turn to a signed twist pitch in meters per
/// turn. Positive is right-hand twist, negative left-hand.
#[inline]
pub fn twist_inches_to_pitch_m(twist_inches: f64, right_hand: bool) -> f64 {
    let pitch = twist_inches.abs() * INCHES_TO_METERS;
    if right_hand {
        pitch
    } else {
        -pitch
    }
}
