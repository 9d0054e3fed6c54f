//! Shooting-environment description and air density model.
//!
//! Density is scaled from the 59°F / 29.92 inHg / dry-air sea-level value by
//! four independent ratios: absolute temperature, barometric pressure,
//! humidity (moist air is slightly lighter) and an exponential altitude decay.

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, DENSITY_SCALE_HEIGHT_FT, RANKINE_OFFSET, STANDARD_PRESSURE_INHG,
    STANDARD_TEMPERATURE_F,
};
use crate::wind::WindSegment;

/// Fractional density reduction at 100% relative humidity
const HUMIDITY_DENSITY_EFFECT: f64 = 0.02;

/// Weather and site conditions for one shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalConditions {
    pub temperature_f: f64,
    pub humidity_percent: f64,
    pub altitude_feet: f64,
    pub wind_speed_mph: f64,
    /// 0° is a headwind, 90° blows from the shooter's right
    pub wind_direction_degrees: f64,
    #[serde(rename = "air_pressure_inHg", alias = "air_pressure_inhg")]
    pub air_pressure_inhg: f64,
    /// Optional downrange wind zones; when present they replace the single wind
    pub wind_segments: Vec<WindSegment>,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature_f: 70.0,
            humidity_percent: 50.0,
            altitude_feet: 0.0,
            wind_speed_mph: 0.0,
            wind_direction_degrees: 0.0,
            air_pressure_inhg: STANDARD_PRESSURE_INHG,
            wind_segments: Vec::new(),
        }
    }
}

impl EnvironmentalConditions {
    /// Standard sea-level conditions with no wind
    pub fn standard() -> Self {
        Self {
            temperature_f: STANDARD_TEMPERATURE_F,
            humidity_percent: 0.0,
            ..Default::default()
        }
    }

    /// Calm conditions with the given wind
    pub fn with_wind(mut self, speed_mph: f64, direction_degrees: f64) -> Self {
        self.wind_speed_mph = speed_mph;
        self.wind_direction_degrees = direction_degrees;
        self
    }

    /// Air density (lb/ft³)
    pub fn air_density(&self) -> f64 {
        calculate_air_density(
            self.temperature_f,
            self.air_pressure_inhg,
            self.humidity_percent,
            self.altitude_feet,
        )
    }

    /// Density relative to the standard sea-level value
    pub fn air_density_factor(&self) -> f64 {
        self.air_density() / AIR_DENSITY_SEA_LEVEL
    }

    /// Strongest wind the arrow will meet (mph)
    pub fn peak_wind_mph(&self) -> f64 {
        self.wind_segments
            .iter()
            .map(|s| s.speed_mph.abs())
            .fold(self.wind_speed_mph.abs(), f64::max)
    }
}

/// Calculate air density from site conditions.
///
/// # Arguments
/// * `temperature_f` - Air temperature (°F)
/// * `pressure_inhg` - Barometric pressure (inHg)
/// * `humidity_percent` - Relative humidity (0-100)
/// * `altitude_ft` - Site altitude (ft)
///
/// # Returns
/// Density in lb/ft³. Temperatures at or below absolute zero are treated as the
/// standard temperature.
pub fn calculate_air_density(
    temperature_f: f64,
    pressure_inhg: f64,
    humidity_percent: f64,
    altitude_ft: f64,
) -> f64 {
    let absolute = temperature_f + RANKINE_OFFSET;
    let temperature_ratio = if absolute > 0.0 {
        (STANDARD_TEMPERATURE_F + RANKINE_OFFSET) / absolute
    } else {
        1.0
    };
    let pressure_ratio = (pressure_inhg / STANDARD_PRESSURE_INHG).max(0.0);
    let humidity_ratio = 1.0 - humidity_percent.clamp(0.0, 100.0) / 100.0 * HUMIDITY_DENSITY_EFFECT;
    let altitude_ratio = (-altitude_ft / DENSITY_SCALE_HEIGHT_FT).exp();

    AIR_DENSITY_SEA_LEVEL * temperature_ratio * pressure_ratio * humidity_ratio * altitude_ratio
}
