//! Physical constants used throughout the simulation.

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// ICAO standard temperature at sea level (K)
pub const STANDARD_TEMPERATURE_K: f64 = 288.15;

/// ICAO standard pressure at sea level (Pa)
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

/// Temperature lapse rate in the troposphere (K/m)
pub const TEMPERATURE_LAPSE_RATE: f64 = -0.0065;

/// Atmospheric scale height for the barometric pressure formula (m)
pub const PRESSURE_SCALE_HEIGHT_M: f64 = 8400.0;

/// Universal gas constant (J/(mol·K))
pub const GAS_CONSTANT_UNIVERSAL: f64 = 8.314;

/// Molar mass of dry air (kg/mol)
pub const MOLAR_MASS_DRY_AIR: f64 = 0.02897;

/// Heat capacity ratio (gamma) of air
pub const HEAT_CAPACITY_RATIO_AIR: f64 = 1.4;

// Spin-aerodynamic coupling coefficients. The first four are the tunables an
// offline fitting tool adjusts against observed drift; defaults here match
// the fitted values for typical boat-tail rifle bullets.

/// Lift (normal force) slope C_Nα per radian of sideslip
pub const LIFT_SLOPE_PER_RAD: f64 = 1.5;

/// Restoring (overturning) moment slope C_Mα per radian; negative restores
pub const RESTORING_MOMENT_SLOPE_PER_RAD: f64 = -0.07;

/// Empirical scale on the yaw-of-repose angle to match observed spin drift
pub const YAW_OF_REPOSE_SCALE: f64 = 0.2;

/// Crosswind-jump strength; shares the spin-drift scaling
pub const JUMP_STRENGTH_SCALE: f64 = YAW_OF_REPOSE_SCALE;

/// Slows the lag-filter (beta equilibrium) dynamics relative to the trim rate
pub const BETA_LAG_SCALE: f64 = 0.5;

/// Clamp on the yaw-of-repose angle (rad), about 3 mrad
pub const MAX_YAW_OF_REPOSE_RAD: f64 = 0.003;

/// Radius-of-gyration factor for the spin moment of inertia estimate,
/// as a fraction of diameter
pub const SPIN_RADIUS_OF_GYRATION_FACTOR: f64 = 0.30;

// Unit conversion factors

/// Conversion factor: meters per second to feet per second
pub const MPS_TO_FPS: f64 = 3.28084;

/// Conversion factor: feet per second to meters per second
pub const FPS_TO_MPS: f64 = 0.3048;

/// Conversion factor: grains to kilograms
pub const GRAINS_TO_KG: f64 = 0.00006479891;

/// Conversion factor: yards to meters
pub const YARDS_TO_METERS: f64 = 0.9144;

/// Conversion factor: inches to meters
pub const INCHES_TO_METERS: f64 = 0.0254;

// Numerical stability thresholds

/// Minimum velocity magnitude before the velocity direction is trusted
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum air-relative speed for any aerodynamic force computation
pub const MIN_AIRSPEED_THRESHOLD: f64 = 1e-3;

/// Minimum vector norm accepted by safe normalization
pub const MIN_VECTOR_NORM: f64 = 1e-9;

/// Minimum denominator for division guards
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

/// Minimum alignment rate before the yaw-of-repose term is evaluated
pub const MIN_ALIGNMENT_RATE: f64 = 1e-6;
