/// Drag coefficients and aerodynamic factors for arrows
use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bow::{ArrowMaterial, ArrowRestType};
use crate::constants::{GRAINS_PER_POUND, INCHES_PER_FOOT, MIN_DIVISION_THRESHOLD};

/// Oscillation turbulence saturates at +20%
const MAX_OSCILLATION_TURBULENCE: f64 = 0.2;
const OSCILLATION_TURBULENCE_PER_HZ: f64 = 0.002;

/// Arrow setup class, selects the base drag coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowType {
    /// Low-profile vanes, small diameter
    Target,
    /// Larger diameter, broadhead-ready fletching
    #[default]
    Hunting,
    /// Field points, moderate vanes
    Field,
    /// Optimized for accuracy
    #[serde(rename = "3d")]
    ThreeD,
}

impl ArrowType {
    /// Lenient parse; unknown values fall back to hunting
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "target" => ArrowType::Target,
            "field" => ArrowType::Field,
            "3d" | "three_d" | "threed" => ArrowType::ThreeD,
            _ => ArrowType::Hunting,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowType::Target => "target",
            ArrowType::Hunting => "hunting",
            ArrowType::Field => "field",
            ArrowType::ThreeD => "3d",
        }
    }

    /// Approximate drag coefficient for the setup
    pub fn base_drag_coefficient(&self) -> f64 {
        match self {
            ArrowType::Target => 0.35,
            ArrowType::Hunting => 0.45,
            ArrowType::Field => 0.40,
            ArrowType::ThreeD => 0.38,
        }
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface roughness multiplier by shaft material
pub fn material_roughness_factor(material: ArrowMaterial) -> f64 {
    match material {
        ArrowMaterial::Carbon => 1.00,
        ArrowMaterial::CarbonAluminum => 1.01,
        ArrowMaterial::Aluminum => 1.02,
        ArrowMaterial::Fiberglass => 1.05,
        ArrowMaterial::Wood => 1.08,
    }
}

/// Launch turbulence multiplier by rest type
pub fn rest_turbulence_factor(rest: ArrowRestType) -> f64 {
    match rest {
        ArrowRestType::DropAway => 1.00,
        ArrowRestType::Blade => 1.02,
        ArrowRestType::FullContainment => 1.03,
        ArrowRestType::Shelf => 1.04,
        ArrowRestType::WhiskerBiscuit => 1.05,
    }
}

/// Turbulence from shaft oscillation, capped at +20%
pub fn oscillation_turbulence_factor(frequency_hz: f64) -> f64 {
    1.0 + (frequency_hz.max(0.0) * OSCILLATION_TURBULENCE_PER_HZ).min(MAX_OSCILLATION_TURBULENCE)
}

/// Frontal area of the shaft (ft²)
pub fn cross_sectional_area_ft2(diameter_inches: f64) -> f64 {
    let radius_ft = diameter_inches / INCHES_PER_FOOT / 2.0;
    PI * radius_ft * radius_ft
}

/// Quadratic drag constant `k` (1/ft) so that drag deceleration is `k·v²`.
///
/// Returns 0 for a non-positive arrow weight.
pub fn drag_constant(air_density: f64, drag_coefficient: f64, diameter_inches: f64, weight_grains: f64) -> f64 {
    let mass_lbs = weight_grains / GRAINS_PER_POUND;
    if mass_lbs < MIN_DIVISION_THRESHOLD {
        return 0.0;
    }
    0.5 * air_density * drag_coefficient * cross_sectional_area_ft2(diameter_inches) / mass_lbs
}

/// Ballistic coefficient: mass (lb) over drag coefficient times frontal area (in²)
pub fn ballistic_coefficient(weight_grains: f64, diameter_inches: f64, drag_coefficient: f64) -> f64 {
    let mass_lbs = weight_grains / GRAINS_PER_POUND;
    let radius = diameter_inches / 2.0;
    let denominator = drag_coefficient * PI * radius * radius;
    if denominator < MIN_DIVISION_THRESHOLD {
        return 0.0;
    }
    mass_lbs / denominator
}
