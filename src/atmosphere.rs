//! Atmospheric state and derived air properties.
//!
//! Air density and speed of sound come from temperature, altitude, and
//! relative humidity. Pressure follows a fixed exponential profile of
//! altitude, and humidity enters density through the saturation vapor
//! pressure, so damp air is slightly less dense than dry air at the same
//! temperature.

use once_cell::sync::Lazy;

use crate::constants::{
    GAS_CONSTANT_UNIVERSAL, HEAT_CAPACITY_RATIO_AIR, MOLAR_MASS_DRY_AIR, PRESSURE_SCALE_HEIGHT_M,
    STANDARD_PRESSURE_PA, STANDARD_TEMPERATURE_K, TEMPERATURE_LAPSE_RATE,
};
use crate::error::{BallisticsError, Result};

/// Fraction by which water vapor partial pressure reduces the effective
/// pressure in the density equation (1 - M_water / M_dry_air).
const VAPOR_PRESSURE_DENSITY_FACTOR: f64 = 0.378;

static STANDARD: Lazy<Atmosphere> = Lazy::new(Atmosphere::default);

/// Atmospheric conditions at a point.
///
/// Constructed through [`Atmosphere::new`] so the humidity fraction is always
/// within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    temperature_k: f64,
    altitude_m: f64,
    humidity: f64,
}

impl Default for Atmosphere {
    /// Sea-level standard: 288.15 K, 0 m, 50% relative humidity.
    fn default() -> Self {
        Self {
            temperature_k: STANDARD_TEMPERATURE_K,
            altitude_m: 0.0,
            humidity: 0.5,
        }
    }
}

impl Atmosphere {
    /// Create an atmosphere from temperature (K), altitude (m), and relative
    /// humidity as a fraction.
    ///
    /// # Errors
    /// Returns [`BallisticsError::InvalidHumidity`] if `humidity` lies
    /// outside `0.0..=1.0`.
    pub fn new(temperature_k: f64, altitude_m: f64, humidity: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&humidity) {
            return Err(BallisticsError::InvalidHumidity(humidity));
        }
        Ok(Self {
            temperature_k,
            altitude_m,
            humidity,
        })
    }

    /// The shared sea-level standard atmosphere.
    pub fn standard() -> Atmosphere {
        *STANDARD
    }

    /// Air temperature (K).
    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }

    /// Altitude above sea level (m).
    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Relative humidity fraction in `0.0..=1.0`.
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Ambient pressure (Pa) from the exponential barometric profile at this
    /// altitude.
    pub fn pressure_pa(&self) -> f64 {
        STANDARD_PRESSURE_PA * (-self.altitude_m / PRESSURE_SCALE_HEIGHT_M).exp()
    }

    /// Saturation vapor pressure (Pa) at the current temperature, from the
    /// Magnus-form approximation over water.
    pub fn saturation_vapor_pressure_pa(&self) -> f64 {
        let t_c = self.temperature_k - 273.15;
        611.2 * (17.67 * t_c / (t_c + 243.5)).exp()
    }

    /// Air density (kg/m³), humidity-corrected.
    ///
    /// Water vapor partial pressure displaces dry air, lowering density
    /// relative to dry conditions at the same temperature and pressure.
    pub fn air_density(&self) -> f64 {
        let r_specific = GAS_CONSTANT_UNIVERSAL / MOLAR_MASS_DRY_AIR;
        let vapor_pressure = self.humidity * self.saturation_vapor_pressure_pa();
        let effective_pressure =
            self.pressure_pa() - VAPOR_PRESSURE_DENSITY_FACTOR * vapor_pressure;
        effective_pressure / (r_specific * self.temperature_k)
    }

    /// Speed of sound (m/s) in air at the current temperature.
    pub fn speed_of_sound(&self) -> f64 {
        let r_specific = GAS_CONSTANT_UNIVERSAL / MOLAR_MASS_DRY_AIR;
        (HEAT_CAPACITY_RATIO_AIR * r_specific * self.temperature_k).sqrt()
    }

    /// Conditions at a different altitude, with temperature following the
    /// standard lapse rate from the sea-level standard and humidity carried
    /// over unchanged.
    pub fn at_altitude(&self, altitude_m: f64) -> Atmosphere {
        Atmosphere {
            temperature_k: STANDARD_TEMPERATURE_K + TEMPERATURE_LAPSE_RATE * altitude_m,
            altitude_m,
            humidity: self.humidity,
        }
    }
}
