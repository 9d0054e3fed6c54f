//! Front-of-centre (FOC) balance calculations.
//!
//! The shaft is modelled as a uniform rod: half its weight sits in front of the
//! physical centre, half behind it. Point and insert load the front, nock and
//! fletching load the back.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_DIVISION_THRESHOLD;

/// Point-weight search domain for FOC optimisation (grains)
pub const MIN_CANDIDATE_POINT_WEIGHT: f64 = 25.0;
pub const MAX_CANDIDATE_POINT_WEIGHT: f64 = 500.0;

/// Point-weight change above which a retune is considered impractical (grains)
pub const PRACTICAL_POINT_WEIGHT_CHANGE: f64 = 50.0;

/// Tolerance for a target FOC to count as achieved (percentage points)
pub const FOC_TARGET_TOLERANCE: f64 = 0.5;

/// Component weights of an assembled arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowComponents {
    /// Arrow length (inches)
    pub arrow_length: f64,
    /// Weights (grains)
    pub point_weight: f64,
    pub shaft_weight: f64,
    pub nock_weight: f64,
    pub fletching_weight: f64,
    pub insert_weight: f64,
}

impl ArrowComponents {
    pub fn total_weight(&self) -> f64 {
        self.point_weight + self.shaft_weight + self.nock_weight + self.fletching_weight + self.insert_weight
    }

    pub fn foc(&self) -> FocResult {
        calculate_foc(
            self.arrow_length,
            self.point_weight,
            self.shaft_weight,
            self.nock_weight,
            self.fletching_weight,
            self.insert_weight,
        )
    }

    fn with_point_weight(&self, point_weight: f64) -> Self {
        Self { point_weight, ..*self }
    }
}

/// Balance calculation for one arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocResult {
    pub foc_percentage: f64,
    /// Balance point measured from the nock end (inches)
    pub balance_point: f64,
    pub physical_center: f64,
    pub total_weight: f64,
    pub front_weight: f64,
    pub back_weight: f64,
}

/// Calculate FOC percentage and balance point.
///
/// A zero-weight or zero-length arrow balances at its physical centre.
pub fn calculate_foc(
    arrow_length: f64,
    point_weight: f64,
    shaft_weight: f64,
    nock_weight: f64,
    fletching_weight: f64,
    insert_weight: f64,
) -> FocResult {
    let total_weight = point_weight + shaft_weight + nock_weight + fletching_weight + insert_weight;
    let front_weight = point_weight + insert_weight + shaft_weight / 2.0;
    let back_weight = nock_weight + fletching_weight + shaft_weight / 2.0;
    let physical_center = arrow_length / 2.0;

    if total_weight.abs() < MIN_DIVISION_THRESHOLD || arrow_length.abs() < MIN_DIVISION_THRESHOLD {
        return FocResult {
            foc_percentage: 0.0,
            balance_point: physical_center,
            physical_center,
            total_weight,
            front_weight,
            back_weight,
        };
    }

    let balance_point = physical_center + (front_weight - back_weight) / total_weight * physical_center;
    let foc_percentage = (balance_point - physical_center) / arrow_length * 100.0;

    FocResult { foc_percentage, balance_point, physical_center, total_weight, front_weight, back_weight }
}

/// Intended use, which sets the optimal FOC window and score weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    #[default]
    Hunting,
    Target,
    #[serde(rename = "3d", alias = "three_d")]
    ThreeD,
}

impl UseCase {
    /// Lenient parse; unknown values map to hunting
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "target" => UseCase::Target,
            "3d" | "three_d" => UseCase::ThreeD,
            _ => UseCase::Hunting,
        }
    }

    pub fn optimal_range(&self) -> FocRange {
        match self {
            UseCase::Hunting => FocRange { minimum: 10.0, maximum: 15.0 },
            UseCase::Target => FocRange { minimum: 7.0, maximum: 10.0 },
            UseCase::ThreeD => FocRange { minimum: 8.0, maximum: 12.0 },
        }
    }

    /// Weights for stability, accuracy, penetration, wind resistance, forgiveness
    fn score_weights(&self) -> [f64; 5] {
        match self {
            UseCase::Hunting => [0.20, 0.15, 0.35, 0.15, 0.15],
            UseCase::Target => [0.20, 0.40, 0.05, 0.20, 0.15],
            UseCase::ThreeD => [0.20, 0.30, 0.15, 0.15, 0.20],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl FocRange {
    pub fn midpoint(&self) -> f64 {
        (self.minimum + self.maximum) / 2.0
    }

    pub fn contains(&self, foc: f64) -> bool {
        foc >= self.minimum && foc <= self.maximum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocStatus {
    BelowOptimal,
    Optimal,
    AboveOptimal,
}

/// Five-axis flight-characteristics score, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocPerformance {
    pub stability: f64,
    pub accuracy: f64,
    pub penetration: f64,
    pub wind_resistance: f64,
    pub forgiveness: f64,
    /// Use-case weighted blend of the five axes
    pub composite: f64,
}

/// Suggested component change that reaches the target without a large point swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAlternative {
    pub description: String,
    pub insert_weight: f64,
    pub fletching_weight: f64,
    pub point_weight: f64,
    pub resulting_foc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointWeightOptimization {
    pub target_foc: f64,
    pub current_point_weight: f64,
    pub optimal_point_weight: f64,
    pub point_weight_change: f64,
    pub achieved_foc: f64,
    /// Whether the best candidate lands within half a point of the target
    pub achievable: bool,
    /// Whether the point change stays within practical limits
    pub practical: bool,
    pub alternatives: Vec<ComponentAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedFocResult {
    pub foc: FocResult,
    pub use_case: UseCase,
    pub optimal_range: FocRange,
    pub status: FocStatus,
    pub performance: FocPerformance,
    pub optimization: PointWeightOptimization,
    pub recommendations: Vec<String>,
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Score a balance for the given use case
pub fn score_performance(foc: f64, total_weight: f64, use_case: UseCase) -> FocPerformance {
    let range = use_case.optimal_range();

    let stability = clamp_score(40.0 + foc * 4.0);
    let accuracy = clamp_score(100.0 - (foc - range.midpoint()).abs() * 8.0);
    let penetration = clamp_score((total_weight - 300.0) / 3.0 + foc * 2.0);
    let wind_resistance = clamp_score((total_weight - 250.0) / 3.0 + foc * 1.5);
    let forgiveness =
        clamp_score(100.0 - (foc - 12.0).abs() * 6.0 - (350.0 - total_weight).max(0.0) * 0.1);

    let w = use_case.score_weights();
    let composite = clamp_score(
        stability * w[0]
            + accuracy * w[1]
            + penetration * w[2]
            + wind_resistance * w[3]
            + forgiveness * w[4],
    );

    FocPerformance { stability, accuracy, penetration, wind_resistance, forgiveness, composite }
}

/// Linear scan over candidate point weights; ties keep the lighter point.
fn best_point_weight(components: &ArrowComponents, target_foc: f64) -> (f64, f64) {
    let mut best = (components.point_weight, components.foc().foc_percentage);
    let mut best_error = f64::INFINITY;

    let mut candidate = MIN_CANDIDATE_POINT_WEIGHT;
    while candidate <= MAX_CANDIDATE_POINT_WEIGHT {
        let foc = components.with_point_weight(candidate).foc().foc_percentage;
        let error = (foc - target_foc).abs();
        if error < best_error {
            best_error = error;
            best = (candidate, foc);
        }
        candidate += 1.0;
    }
    best
}

/// Insert and fletching swaps that reach the target with a practical point change
fn component_alternatives(components: &ArrowComponents, target_foc: f64) -> Vec<ComponentAlternative> {
    const INSERT_DELTAS: [f64; 6] = [-10.0, 0.0, 25.0, 50.0, 75.0, 100.0];
    const FLETCHING_DELTAS: [f64; 5] = [-10.0, -5.0, 0.0, 5.0, 10.0];

    let mut options: Vec<(f64, ComponentAlternative)> = Vec::new();
    for insert_delta in INSERT_DELTAS {
        for fletching_delta in FLETCHING_DELTAS {
            if insert_delta == 0.0 && fletching_delta == 0.0 {
                continue;
            }
            let insert_weight = components.insert_weight + insert_delta;
            let fletching_weight = components.fletching_weight + fletching_delta;
            if insert_weight < 0.0 || fletching_weight < 3.0 {
                continue;
            }

            let adjusted = ArrowComponents { insert_weight, fletching_weight, ..*components };
            let (point_weight, resulting_foc) = best_point_weight(&adjusted, target_foc);
            let point_delta = point_weight - components.point_weight;
            if point_delta.abs() > PRACTICAL_POINT_WEIGHT_CHANGE
                || (resulting_foc - target_foc).abs() > FOC_TARGET_TOLERANCE
            {
                continue;
            }

            let mut parts = Vec::new();
            if insert_delta != 0.0 {
                parts.push(format!("{} insert ({:+.0} gr)", if insert_delta > 0.0 { "heavier" } else { "lighter" }, insert_delta));
            }
            if fletching_delta != 0.0 {
                parts.push(format!("{} fletching ({:+.0} gr)", if fletching_delta > 0.0 { "heavier" } else { "lighter" }, fletching_delta));
            }
            parts.push(format!("{:.0} gr point", point_weight));

            let effort = insert_delta.abs() + fletching_delta.abs() + point_delta.abs();
            options.push((
                effort,
                ComponentAlternative {
                    description: capitalize(&parts.join(", ")),
                    insert_weight,
                    fletching_weight,
                    point_weight,
                    resulting_foc,
                },
            ));
        }
    }

    options.sort_by(|a, b| a.0.total_cmp(&b.0));
    options.into_iter().take(3).map(|(_, alt)| alt).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Search for the point weight that brings the arrow to `target_foc`
pub fn optimize_point_weight(components: &ArrowComponents, target_foc: f64) -> PointWeightOptimization {
    let (optimal_point_weight, achieved_foc) = best_point_weight(components, target_foc);
    let point_weight_change = optimal_point_weight - components.point_weight;
    let practical = point_weight_change.abs() <= PRACTICAL_POINT_WEIGHT_CHANGE;

    let alternatives =
        if practical { Vec::new() } else { component_alternatives(components, target_foc) };

    PointWeightOptimization {
        target_foc,
        current_point_weight: components.point_weight,
        optimal_point_weight,
        point_weight_change,
        achieved_foc,
        achievable: (achieved_foc - target_foc).abs() <= FOC_TARGET_TOLERANCE,
        practical,
        alternatives,
    }
}

/// Full FOC analysis: balance, use-case fit, performance and point-weight tuning.
///
/// `target_foc` defaults to the midpoint of the use case's optimal range.
#[allow(clippy::too_many_arguments)]
pub fn calculate_enhanced_foc(
    arrow_length: f64,
    point_weight: f64,
    shaft_weight: f64,
    nock_weight: f64,
    fletching_weight: f64,
    insert_weight: f64,
    use_case: UseCase,
    target_foc: Option<f64>,
) -> EnhancedFocResult {
    let components = ArrowComponents {
        arrow_length,
        point_weight,
        shaft_weight,
        nock_weight,
        fletching_weight,
        insert_weight,
    };
    let foc = components.foc();
    let optimal_range = use_case.optimal_range();
    let target = target_foc.unwrap_or_else(|| optimal_range.midpoint());

    let status = if foc.foc_percentage < optimal_range.minimum {
        FocStatus::BelowOptimal
    } else if foc.foc_percentage > optimal_range.maximum {
        FocStatus::AboveOptimal
    } else {
        FocStatus::Optimal
    };

    let performance = score_performance(foc.foc_percentage, foc.total_weight, use_case);
    let optimization = optimize_point_weight(&components, target);

    let mut recommendations = Vec::new();
    match status {
        FocStatus::Optimal => recommendations.push(format!(
            "FOC of {:.1}% is within the {:.0}-{:.0}% window for this use",
            foc.foc_percentage, optimal_range.minimum, optimal_range.maximum
        )),
        FocStatus::BelowOptimal => recommendations.push(format!(
            "FOC of {:.1}% is low; add front weight to reach {:.0}-{:.0}%",
            foc.foc_percentage, optimal_range.minimum, optimal_range.maximum
        )),
        FocStatus::AboveOptimal => recommendations.push(format!(
            "FOC of {:.1}% is high; expect a steeper trajectory at long range",
            foc.foc_percentage
        )),
    }
    if optimization.point_weight_change.abs() >= 1.0 {
        recommendations.push(format!(
            "A {:.0} gr point gives {:.1}% FOC (target {:.1}%)",
            optimization.optimal_point_weight, optimization.achieved_foc, target
        ));
    }
    if !optimization.practical {
        if optimization.alternatives.is_empty() {
            recommendations.push(
                "Required point change is large; consider a different shaft weight".to_string(),
            );
        } else {
            recommendations.push(
                "Required point change is large; see component alternatives".to_string(),
            );
        }
    }
    if use_case == UseCase::Hunting && foc.total_weight < 400.0 {
        recommendations.push("Total weight under 400 gr limits penetration on larger game".to_string());
    }

    EnhancedFocResult { foc, use_case, optimal_range, status, performance, optimization, recommendations }
}
