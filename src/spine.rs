//! Required-spine calculation for compound, recurve, traditional and wood setups.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bow::{ArrowBuild, ArrowMaterial, ArrowRestType, BowConfiguration, BowType, ReleaseType};
use crate::chart::ChartLookup;
use crate::constants::{DEFAULT_INSERT_WEIGHT, STANDARD_CENTER_SHOT_IN};
use crate::foc::calculate_foc;
use crate::spine_charts::{wood_to_carbon_spine, SpineCharts};

/// Lowest spine number reported for carbon-unit results
const MIN_CARBON_SPINE: f64 = 100.0;
/// Lowest pound rating reported for wood results
const MIN_WOOD_SPINE_LBS: f64 = 5.0;

/// Nominal shaft mass used for dynamic-spine speed estimates (grains per inch)
const NOMINAL_SHAFT_GPI: f64 = 9.0;

const COMPOUND_TOLERANCE: f64 = 25.0;
const RECURVE_TOLERANCE_BELOW: f64 = 50.0;
const RECURVE_TOLERANCE_ABOVE: f64 = 25.0;
const TRADITIONAL_TOLERANCE: f64 = 30.0;
const WOOD_TOLERANCE_LBS: f64 = 5.0;

/// Wood point-weight steps: (grains, step value); 100 gr is the chart baseline
const WOOD_POINT_STEPS: [(f64, f64); 4] = [(30.0, 1.0), (70.0, 2.0), (100.0, 3.0), (125.0, 4.0)];
const WOOD_POINT_BASELINE_STEP: f64 = 3.0;
const WOOD_LBS_PER_STEP: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// One tier lower, saturating at `Low`
    pub fn downgrade(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            _ => Confidence::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Unit system of a spine value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineUnits {
    /// Deflection-based spine numbers (lower is stiffer)
    Carbon,
    /// Wood-arrow pound rating (higher is stiffer)
    Pounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpineRange {
    pub minimum: f64,
    pub optimal: f64,
    pub maximum: f64,
}

impl SpineRange {
    pub fn width(&self) -> f64 {
        self.maximum - self.minimum
    }

    pub fn contains(&self, spine: f64) -> bool {
        spine >= self.minimum && spine <= self.maximum
    }
}

/// Output of a spine calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineResult {
    pub bow_type: BowType,
    pub calculated_spine: f64,
    pub spine_range: SpineRange,
    /// Named contributions; keys ending in `_lbs` act on effective bow weight
    pub adjustments: BTreeMap<String, f64>,
    /// Signed change from `base_spine` to `calculated_spine`
    pub total_adjustment: f64,
    /// Chart value the calculation started from
    pub base_spine: f64,
    /// Effective bow weight used for the chart lookup, when it differs by path
    pub effective_draw_weight: Option<f64>,
    /// In-flight spine estimate (compound only)
    pub dynamic_spine: Option<f64>,
    pub confidence: Confidence,
    pub spine_units: SpineUnits,
    pub notes: Vec<String>,
}

/// Compound speed tier adjustment in lbf for an IBO rating
pub fn speed_adjustment(ibo_speed: f64) -> f64 {
    if ibo_speed < 300.0 {
        -10.0
    } else if ibo_speed < 320.0 {
        -5.0
    } else if ibo_speed < 340.0 {
        0.0
    } else if ibo_speed < 360.0 {
        10.0
    } else {
        15.0
    }
}

/// Rough launch speed from IBO rating, draw weight and arrow weight, clamped to 150-400 fps
pub fn estimate_arrow_speed(ibo_speed: f64, draw_weight: f64, arrow_weight: f64) -> f64 {
    (ibo_speed + (draw_weight - 70.0) * 2.5 - (arrow_weight - 350.0) * 0.55).clamp(150.0, 400.0)
}

/// Adjust a static spine for front balance and launch speed
pub fn calculate_dynamic_spine(static_spine: f64, foc_percentage: f64, speed_fps: f64) -> f64 {
    static_spine + (foc_percentage - 10.0) * 2.0 - (speed_fps - 250.0) * 0.1
}

/// Standard matching tolerance for a bow type (carbon spine units)
pub fn spine_tolerance(bow_type: BowType) -> f64 {
    match bow_type {
        BowType::Compound => 25.0,
        BowType::Recurve => 30.0,
        BowType::Traditional => 40.0,
    }
}

/// Rounded tolerance window around a target spine
pub fn spine_tolerance_range(target_spine: f64, bow_type: BowType) -> (f64, f64) {
    let tolerance = spine_tolerance(bow_type);
    (target_spine - tolerance, target_spine + tolerance)
}

/// Simplified formula estimate, used when no chart path applies.
///
/// Bow-type offsets (+50 recurve, +100 traditional) are calibration fits
/// pending expert re-validation.
pub fn simple_spine_estimate(
    draw_weight: f64,
    arrow_length: f64,
    point_weight: f64,
    bow_type: BowType,
) -> SpineResult {
    let base_spine = draw_weight * 12.5;
    let length_adjustment = (arrow_length - 28.0) * 25.0;
    let point_adjustment = (point_weight - 125.0) * 0.5;
    let bow_adjustment = match bow_type {
        BowType::Compound => 0.0,
        BowType::Recurve => 50.0,
        BowType::Traditional => 100.0,
    };

    let spine = (base_spine + length_adjustment + point_adjustment + bow_adjustment).max(MIN_CARBON_SPINE);

    let mut adjustments = BTreeMap::new();
    adjustments.insert("arrow_length".to_string(), length_adjustment);
    adjustments.insert("point_weight".to_string(), point_adjustment);
    adjustments.insert("bow_type".to_string(), bow_adjustment);

    SpineResult {
        bow_type,
        calculated_spine: spine.round(),
        spine_range: SpineRange {
            minimum: (spine - 25.0).round(),
            optimal: spine.round(),
            maximum: (spine + 25.0).round(),
        },
        adjustments,
        total_adjustment: spine - base_spine,
        base_spine,
        effective_draw_weight: None,
        dynamic_spine: None,
        confidence: Confidence::Medium,
        spine_units: SpineUnits::Carbon,
        notes: vec!["Simplified formula estimate; verify against a manufacturer chart".to_string()],
    }
}

fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

fn nearest_wood_point_step(point_weight: f64) -> f64 {
    let mut best = WOOD_POINT_STEPS[0];
    for step in WOOD_POINT_STEPS.iter().skip(1) {
        if (step.0 - point_weight).abs() < (best.0 - point_weight).abs() {
            best = *step;
        }
    }
    best.1
}

/// Spine calculator bound to one set of calibration charts
#[derive(Debug, Clone)]
pub struct SpineCalculator {
    charts: Arc<SpineCharts>,
}

impl Default for SpineCalculator {
    fn default() -> Self {
        Self::new(SpineCharts::standard())
    }
}

impl SpineCalculator {
    pub fn new(charts: Arc<SpineCharts>) -> Self {
        Self { charts }
    }

    pub fn charts(&self) -> &SpineCharts {
        &self.charts
    }

    /// Convenience wrapper taking a full arrow build
    pub fn calculate_for_build(&self, bow: &BowConfiguration, build: &ArrowBuild) -> SpineResult {
        self.calculate_required_spine(
            bow,
            build.arrow_length,
            build.point_weight,
            build.nock_weight,
            build.fletching_weight,
            build.material_preference,
        )
    }

    /// Required spine for a bow and arrow build.
    ///
    /// A wood material preference selects the pound-rated wood path for every
    /// bow type; otherwise the bow type picks the path.
    pub fn calculate_required_spine(
        &self,
        bow: &BowConfiguration,
        arrow_length: f64,
        point_weight: f64,
        nock_weight: f64,
        fletching_weight: f64,
        material_preference: Option<ArrowMaterial>,
    ) -> SpineResult {
        let result = if material_preference.is_some_and(|m| m.is_wood()) {
            debug!(draw_weight = bow.draw_weight, arrow_length, "spine path: wood");
            self.wood_spine(bow, arrow_length, point_weight)
        } else {
            debug!(bow_type = %bow.bow_type, draw_weight = bow.draw_weight, arrow_length, "spine path: chart");
            match bow.bow_type {
                BowType::Compound => {
                    self.compound_spine(bow, arrow_length, point_weight, nock_weight, fletching_weight)
                }
                BowType::Recurve => self.recurve_spine(bow, arrow_length, point_weight),
                BowType::Traditional => self.traditional_spine(bow, arrow_length, point_weight),
            }
        };
        debug!(
            spine = result.calculated_spine,
            units = ?result.spine_units,
            confidence = result.confidence.as_str(),
            "spine calculated"
        );
        result
    }

    fn compound_spine(
        &self,
        bow: &BowConfiguration,
        arrow_length: f64,
        point_weight: f64,
        nock_weight: f64,
        fletching_weight: f64,
    ) -> SpineResult {
        let speed_lbs = speed_adjustment(bow.ibo_speed);
        let point_lbs = (point_weight - 100.0) / 25.0 * 3.0;
        let release_lbs = match bow.release_type {
            ReleaseType::Finger => 5.0,
            ReleaseType::Mechanical => 0.0,
        };
        let effective_weight = bow.draw_weight + speed_lbs + point_lbs + release_lbs;

        let lookup = self.charts.compound.lookup(effective_weight, arrow_length);
        let base_spine = lookup.value;

        let cam = bow.cam_type.spine_offset();
        let rest = bow.arrow_rest_type.spine_offset();
        let center_shot = (bow.center_shot - STANDARD_CENTER_SHOT_IN) * 100.0;
        let static_spine = (base_spine - cam - rest - center_shot).max(MIN_CARBON_SPINE);

        // Dynamic estimate on a nominal shaft
        let shaft_weight = NOMINAL_SHAFT_GPI * arrow_length;
        let foc = calculate_foc(
            arrow_length,
            point_weight,
            shaft_weight,
            nock_weight,
            fletching_weight,
            DEFAULT_INSERT_WEIGHT,
        );
        let speed = estimate_arrow_speed(bow.ibo_speed, bow.draw_weight, foc.total_weight);
        let dynamic_spine =
            calculate_dynamic_spine(static_spine, foc.foc_percentage, speed).max(MIN_CARBON_SPINE);

        let mut adjustments = BTreeMap::new();
        adjustments.insert("speed_lbs".to_string(), speed_lbs);
        adjustments.insert("point_weight_lbs".to_string(), point_lbs);
        adjustments.insert("release_lbs".to_string(), release_lbs);
        adjustments.insert("cam_type".to_string(), cam);
        adjustments.insert("arrow_rest".to_string(), rest);
        adjustments.insert("center_shot".to_string(), center_shot);
        adjustments.insert("dynamic_spine".to_string(), dynamic_spine - static_spine);

        let mut notes = self.carbon_notes(static_spine);
        notes.push("Fine-tune with paper tuning or bare shaft testing".to_string());
        if bow.arrow_rest_type == ArrowRestType::WhiskerBiscuit {
            notes.push("Whisker biscuit may require slightly stiffer arrow".to_string());
        }

        self.carbon_result(
            bow.bow_type,
            static_spine,
            (COMPOUND_TOLERANCE, COMPOUND_TOLERANCE),
            adjustments,
            base_spine,
            Some(effective_weight),
            Some(dynamic_spine.round()),
            Confidence::High,
            lookup,
            notes,
        )
    }

    fn recurve_spine(&self, bow: &BowConfiguration, arrow_length: f64, point_weight: f64) -> SpineResult {
        let limb_lbs = bow.limb_type.weight_adjustment();
        let point_lbs = (point_weight - 100.0) / 25.0 * 5.0;
        let effective_weight = bow.draw_weight + limb_lbs + point_lbs;

        let lookup = self.charts.recurve.lookup(effective_weight, arrow_length);
        let spine = lookup.value.max(MIN_CARBON_SPINE);

        let mut adjustments = BTreeMap::new();
        adjustments.insert("limb_type_lbs".to_string(), limb_lbs);
        adjustments.insert("point_weight_lbs".to_string(), point_lbs);

        let mut notes = self.carbon_notes(spine);
        notes.push("Based on effective bow weight at the archer's draw".to_string());
        if bow.release_type == ReleaseType::Finger {
            notes.push("Finger release: confirm with bare shaft tuning".to_string());
        }

        self.carbon_result(
            bow.bow_type,
            spine,
            (RECURVE_TOLERANCE_BELOW, RECURVE_TOLERANCE_ABOVE),
            adjustments,
            lookup.value,
            Some(effective_weight),
            None,
            Confidence::Medium,
            lookup,
            notes,
        )
    }

    fn traditional_spine(&self, bow: &BowConfiguration, arrow_length: f64, point_weight: f64) -> SpineResult {
        let lookup = self.charts.wood.lookup(bow.draw_weight, arrow_length);
        let base_spine = wood_to_carbon_spine(lookup.value);

        // 25 spine per 25 gr off the 100 gr baseline; heavier points need stiffer shafts
        let point_adjustment = point_weight - 100.0;
        let spine = (base_spine - point_adjustment).max(MIN_CARBON_SPINE);

        let mut adjustments = BTreeMap::new();
        adjustments.insert("point_weight".to_string(), -point_adjustment);

        let mut notes = self.carbon_notes(spine);
        notes.push("Based on traditional wood arrow spine chart (carbon equivalent)".to_string());
        notes.push("Point weight adjustment applied per chart guidelines".to_string());
        notes.push("Consider testing with bare shaft tuning".to_string());

        self.carbon_result(
            bow.bow_type,
            spine,
            (TRADITIONAL_TOLERANCE, TRADITIONAL_TOLERANCE),
            adjustments,
            base_spine,
            None,
            None,
            Confidence::Medium,
            lookup,
            notes,
        )
    }

    fn wood_spine(&self, bow: &BowConfiguration, arrow_length: f64, point_weight: f64) -> SpineResult {
        let lookup = self.charts.wood.lookup(bow.draw_weight, arrow_length);
        let base_spine = lookup.value;

        let point_adjustment =
            (nearest_wood_point_step(point_weight) - WOOD_POINT_BASELINE_STEP) * WOOD_LBS_PER_STEP;
        let spine = (base_spine + point_adjustment).max(MIN_WOOD_SPINE_LBS);

        let mut adjustments = BTreeMap::new();
        adjustments.insert("point_weight".to_string(), point_adjustment);

        let mut notes = vec![
            "Based on traditional wood arrow spine chart".to_string(),
            "Spine values in pounds (wood arrow standard)".to_string(),
            "Point weight adjustment applied per chart guidelines".to_string(),
            "Consider testing with bare shaft tuning".to_string(),
        ];
        let mut confidence = Confidence::High;
        if lookup.clamped {
            confidence = confidence.downgrade();
            notes.push("Draw weight or arrow length outside the reference chart; nearest chart value used".to_string());
        }

        let calculated = round_half(spine);
        SpineResult {
            bow_type: bow.bow_type,
            calculated_spine: calculated,
            spine_range: SpineRange {
                minimum: round_half((spine - WOOD_TOLERANCE_LBS).max(MIN_WOOD_SPINE_LBS)),
                optimal: calculated,
                maximum: round_half(spine + WOOD_TOLERANCE_LBS),
            },
            adjustments,
            total_adjustment: spine - base_spine,
            base_spine,
            effective_draw_weight: None,
            dynamic_spine: None,
            confidence,
            spine_units: SpineUnits::Pounds,
            notes,
        }
    }

    fn carbon_notes(&self, spine: f64) -> Vec<String> {
        let mut notes = Vec::new();
        if spine < 250.0 {
            notes.push("Very stiff arrow required - consider high draw weight setup".to_string());
        } else if spine > 600.0 {
            notes.push("Weak spine required - double-check calculations".to_string());
        }
        notes
    }

    #[allow(clippy::too_many_arguments)]
    fn carbon_result(
        &self,
        bow_type: BowType,
        spine: f64,
        (below, above): (f64, f64),
        adjustments: BTreeMap<String, f64>,
        base_spine: f64,
        effective_draw_weight: Option<f64>,
        dynamic_spine: Option<f64>,
        confidence: Confidence,
        lookup: ChartLookup,
        mut notes: Vec<String>,
    ) -> SpineResult {
        let confidence = if lookup.clamped {
            notes.push("Draw weight or arrow length outside the reference chart; nearest chart value used".to_string());
            confidence.downgrade()
        } else {
            confidence
        };

        SpineResult {
            bow_type,
            calculated_spine: spine.round(),
            spine_range: SpineRange {
                minimum: (spine - below).max(MIN_CARBON_SPINE).round(),
                optimal: spine.round(),
                maximum: (spine + above).round(),
            },
            adjustments,
            total_adjustment: spine - base_spine,
            base_spine,
            effective_draw_weight,
            dynamic_spine,
            confidence,
            spine_units: SpineUnits::Carbon,
            notes,
        }
    }
}
