/// Physical and archery-standard constants used across the engines

/// Gravitational acceleration in ft/s²
pub const GRAVITY_FPS2: f64 = 32.174;

/// Grains per avoirdupois pound
pub const GRAINS_PER_POUND: f64 = 7000.0;

/// Archery kinetic energy divisor
///
/// KE (ft·lbf) = weight (grains) × velocity² (fps²) / 450240.
/// Derived from 2 × 7000 gr/lb × 32.16 ft/s².
pub const KE_DIVISOR: f64 = 450_240.0;

/// Conversion factor: miles per hour to feet per second
pub const MPH_TO_FPS: f64 = 1.467;

/// Feet per yard
pub const FEET_PER_YARD: f64 = 3.0;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Standard air density at 59°F, 29.92 inHg, dry air (lb/ft³)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 0.0765;

/// Rankine offset for Fahrenheit temperatures
pub const RANKINE_OFFSET: f64 = 459.67;

/// Baseline temperature for the density model (°F)
pub const STANDARD_TEMPERATURE_F: f64 = 59.0;

/// Baseline barometric pressure (inHg)
pub const STANDARD_PRESSURE_INHG: f64 = 29.92;

/// Altitude scale height for the exponential density decay (ft)
pub const DENSITY_SCALE_HEIGHT_FT: f64 = 26_900.0;

/// Default arrow shaft diameter when none is supplied (inches)
pub const DEFAULT_ARROW_DIAMETER_IN: f64 = 0.246;

/// Default component weights (grains)
pub const DEFAULT_POINT_WEIGHT: f64 = 100.0;
pub const DEFAULT_NOCK_WEIGHT: f64 = 10.0;
pub const DEFAULT_FLETCHING_WEIGHT: f64 = 15.0;
pub const DEFAULT_INSERT_WEIGHT: f64 = 15.0;

/// Standard centre-shot reference (inches)
pub const STANDARD_CENTER_SHOT_IN: f64 = 13.0 / 16.0;

/// Default IBO rating when a bow does not publish one (fps)
pub const DEFAULT_IBO_SPEED: f64 = 320.0;

// Numerical stability constants

/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
