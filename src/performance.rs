//! Derived flight metrics: energy, penetration, key-distance performance,
//! angled-shot adjustments, environmental impact and the text summary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::atmosphere::EnvironmentalConditions;
use crate::constants::{GRAINS_PER_POUND, GRAVITY_FPS2, KE_DIVISOR};
use crate::drag::ArrowType;
use crate::trajectory::{height_at, point_near, TrajectoryPoint};

/// Distances reported in performance metrics (yards)
pub const KEY_DISTANCES: [f64; 7] = [20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0];
/// Shot angles tabulated for angled-shot adjustments (degrees)
pub const COMMON_SHOT_ANGLES: [f64; 8] = [-30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0, 45.0];
pub const ADJUSTMENT_DISTANCES: [f64; 5] = [20.0, 30.0, 40.0, 50.0, 60.0];

const KEY_DISTANCE_TOLERANCE_YD: f64 = 5.0;
const FLIGHT_TIME_TOLERANCE_YD: f64 = 2.0;
const FLATNESS_WINDOW_YD: f64 = 40.0;
const FLATNESS_PENALTY_PER_INCH: f64 = 2.5;

/// Kinetic energy (ft·lbf) giving a full energy score
const FULL_SCORE_ENERGY: f64 = 80.0;
/// Momentum (slug·ft/s) giving a full momentum score
const FULL_SCORE_MOMENTUM: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticEnergy {
    pub kinetic_energy_ft_lbs: f64,
    /// Momentum with mass in pounds (lb·ft/s)
    pub momentum: f64,
    pub momentum_slug_fps: f64,
    pub velocity_fps: f64,
    pub velocity_retention_percent: f64,
}

/// Energy at a distance from a linear velocity-retention model.
///
/// Retention is `max(0.6, 1 − 0.003·distance)`; values are not rounded.
pub fn calculate_kinetic_energy(speed_fps: f64, weight_grains: f64, distance_yards: f64) -> KineticEnergy {
    let retention = (1.0 - distance_yards * 0.003).max(0.6);
    let velocity = speed_fps * retention;
    let momentum = weight_grains / GRAINS_PER_POUND * velocity;

    KineticEnergy {
        kinetic_energy_ft_lbs: weight_grains * (velocity * velocity) / KE_DIVISOR,
        momentum,
        momentum_slug_fps: momentum / GRAVITY_FPS2,
        velocity_fps: velocity,
        velocity_retention_percent: retention * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenetrationCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PenetrationCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            PenetrationCategory::Excellent
        } else if score >= 60.0 {
            PenetrationCategory::Good
        } else if score >= 40.0 {
            PenetrationCategory::Fair
        } else {
            PenetrationCategory::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PenetrationCategory::Excellent => "Superior penetration for large game",
            PenetrationCategory::Good => "Adequate for most hunting applications",
            PenetrationCategory::Fair => "Suitable for smaller game",
            PenetrationCategory::Poor => "Insufficient for hunting, good for target",
        }
    }

    fn recommendations(&self) -> &'static [&'static str] {
        match self {
            PenetrationCategory::Poor => &[
                "Increase arrow weight for better penetration",
                "Consider heavier points (150-200+ grains)",
                "Add weight tubes or FOC weights",
            ],
            PenetrationCategory::Fair => &[
                "Good penetration for small to medium game",
                "Consider slightly heavier setup for large game",
            ],
            PenetrationCategory::Good => &[
                "Excellent penetration for most hunting",
                "Well-balanced setup for hunting applications",
            ],
            PenetrationCategory::Excellent => &[
                "Superior penetration power",
                "Excellent for large game hunting",
                "Consider if speed/trajectory is adequate",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenetrationPotential {
    pub penetration_score: f64,
    pub category: PenetrationCategory,
    pub description: String,
    pub kinetic_energy_score: f64,
    pub momentum_score: f64,
    pub recommendations: Vec<String>,
}

/// (energy, momentum) blend weights
fn penetration_weights(arrow_type: ArrowType) -> (f64, f64) {
    match arrow_type {
        ArrowType::Target => (0.3, 0.7),
        ArrowType::Hunting => (0.4, 0.6),
        ArrowType::Field => (0.35, 0.65),
        ArrowType::ThreeD => (0.3, 0.7),
    }
}

pub fn calculate_penetration_potential(
    kinetic_energy_ft_lbs: f64,
    momentum_slug_fps: f64,
    arrow_type: ArrowType,
) -> PenetrationPotential {
    let (ke_weight, momentum_weight) = penetration_weights(arrow_type);
    let ke_score = (kinetic_energy_ft_lbs / FULL_SCORE_ENERGY * 100.0).clamp(0.0, 100.0);
    let momentum_score = (momentum_slug_fps / FULL_SCORE_MOMENTUM * 100.0).clamp(0.0, 100.0);
    let score = ke_score * ke_weight + momentum_score * momentum_weight;
    let category = PenetrationCategory::from_score(score);

    PenetrationPotential {
        penetration_score: round_to(score, 1),
        category,
        description: category.description().to_string(),
        kinetic_energy_score: round_to(ke_score, 1),
        momentum_score: round_to(momentum_score, 1),
        recommendations: category.recommendations().iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistancePerformance {
    pub distance_yards: f64,
    pub velocity_fps: f64,
    pub drop_inches: f64,
    pub kinetic_energy: f64,
    pub momentum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub performance_at_distance: Vec<DistancePerformance>,
    pub max_effective_range_yards: f64,
    pub max_trajectory_height_inches: f64,
    pub flight_time_40yd: Option<f64>,
    pub flight_time_60yd: Option<f64>,
    pub trajectory_flatness_score: f64,
    pub consistency_score: f64,
}

pub fn calculate_performance_metrics(
    points: &[TrajectoryPoint],
    weight_grains: f64,
    arrow_type: ArrowType,
) -> PerformanceMetrics {
    // Sampled velocities already include drag, so no retention model here
    let performance_at_distance = KEY_DISTANCES
        .iter()
        .filter_map(|&d| {
            let p = point_near(points, d, KEY_DISTANCE_TOLERANCE_YD)?;
            let energy = calculate_kinetic_energy(p.velocity_fps, weight_grains, 0.0);
            Some(DistancePerformance {
                distance_yards: d,
                velocity_fps: round_to(p.velocity_fps, 1),
                drop_inches: round_to(p.drop_inches, 2),
                kinetic_energy: round_to(energy.kinetic_energy_ft_lbs, 2),
                momentum: round_to(energy.momentum, 3),
            })
        })
        .collect();

    let flight_time = |d: f64| {
        points
            .iter()
            .find(|p| (p.distance_yards - d).abs() <= FLIGHT_TIME_TOLERANCE_YD)
            .map(|p| round_to(p.time, 3))
    };

    PerformanceMetrics {
        performance_at_distance,
        max_effective_range_yards: round_to(points.iter().map(|p| p.distance_yards).fold(0.0, f64::max), 1),
        max_trajectory_height_inches: round_to(max_height(points), 2),
        flight_time_40yd: flight_time(40.0),
        flight_time_60yd: flight_time(60.0),
        trajectory_flatness_score: flatness_score(points),
        consistency_score: consistency_score(arrow_type, weight_grains),
    }
}

fn max_height(points: &[TrajectoryPoint]) -> f64 {
    points.iter().map(|p| p.height_inches).reduce(f64::max).unwrap_or(0.0)
}

/// 100 minus 2.5 per inch of the largest deviation from the sight line inside 40 yards
pub fn flatness_score(points: &[TrajectoryPoint]) -> f64 {
    let max_deviation = points
        .iter()
        .filter(|p| p.distance_yards <= FLATNESS_WINDOW_YD)
        .map(|p| p.height_inches.abs())
        .reduce(f64::max);

    match max_deviation {
        Some(dev) if points.len() >= 2 => round_to((100.0 - dev * FLATNESS_PENALTY_PER_INCH).max(0.0), 1),
        _ => 0.0,
    }
}

pub fn consistency_score(arrow_type: ArrowType, weight_grains: f64) -> f64 {
    let base = match arrow_type {
        ArrowType::Target => 85.0,
        ArrowType::Hunting => 75.0,
        ArrowType::Field => 80.0,
        ArrowType::ThreeD => 82.0,
    };
    let weight_factor = if (350.0..=500.0).contains(&weight_grains) {
        1.0
    } else if (300.0..350.0).contains(&weight_grains) || (500.0..=600.0).contains(&weight_grains) {
        0.95
    } else {
        0.85
    };
    round_to(base * weight_factor, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holdover {
    AimLow,
    AimHigh,
    NoAdjustment,
}

impl fmt::Display for Holdover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Holdover::AimLow => "aim low",
            Holdover::AimHigh => "aim high",
            Holdover::NoAdjustment => "no adjustment",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceAdjustment {
    pub distance_yards: f64,
    pub horizontal_equivalent: f64,
    /// Rise of the impact above the level-shot impact; aim this much lower
    pub aim_adjustment_inches: f64,
    pub holdover_recommendation: Holdover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleAdjustment {
    pub angle_degrees: f64,
    pub distances: Vec<DistanceAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationAdjustments {
    pub angle_adjustments: Vec<AngleAdjustment>,
    pub general_rule: String,
    pub notes: Vec<String>,
}

/// Angled-shot corrections by the horizontal-distance rule.
///
/// Gravity only acts over the horizontal component of an angled shot, so an
/// arrow shot at `D` yards along a slope of `θ` drops like a level shot at
/// `D·cosθ`. The aim adjustment is the sight-line height difference between
/// those two distances on the sampled trajectory.
///
/// `points` must come from a level shot; heights on an angled trajectory are
/// already measured against a tilted sight line. The table lists every common
/// angle except `shot_angle_degrees`, the one being shot.
pub fn calculate_elevation_adjustments(shot_angle_degrees: f64, points: &[TrajectoryPoint]) -> ElevationAdjustments {
    let angle_adjustments = COMMON_SHOT_ANGLES
        .iter()
        .filter(|&&angle| angle != shot_angle_degrees)
        .map(|&angle| {
            let cos_angle = angle.to_radians().cos();
            let distances = ADJUSTMENT_DISTANCES
                .iter()
                .filter_map(|&d| {
                    point_near(points, d, FLIGHT_TIME_TOLERANCE_YD)?;
                    let horizontal = d * cos_angle;
                    let adjustment = height_at(points, horizontal)? - height_at(points, d)?;
                    let holdover = if adjustment > 0.05 {
                        Holdover::AimLow
                    } else if adjustment < -0.05 {
                        Holdover::AimHigh
                    } else {
                        Holdover::NoAdjustment
                    };
                    Some(DistanceAdjustment {
                        distance_yards: d,
                        horizontal_equivalent: round_to(horizontal, 1),
                        aim_adjustment_inches: round_to(adjustment, 2),
                        holdover_recommendation: holdover,
                    })
                })
                .collect();
            AngleAdjustment { angle_degrees: angle, distances }
        })
        .collect();

    ElevationAdjustments {
        angle_adjustments,
        general_rule: "Aim for the horizontal distance on both uphill and downhill shots".to_string(),
        notes: vec![
            "Adjustments are approximations - verify with practice".to_string(),
            "Effect is more pronounced at longer distances".to_string(),
            "Consider rangefinder with angle compensation".to_string(),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Minimal,
    Moderate,
    Significant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub temperature_effect: ImpactLevel,
    pub altitude_effect: ImpactLevel,
    pub humidity_effect: ImpactLevel,
    pub wind_effect: ImpactLevel,
    pub effects_description: Vec<String>,
    pub overall_impact: ImpactLevel,
    pub recommendations: Vec<String>,
}

pub fn analyze_environmental_impact(env: &EnvironmentalConditions) -> EnvironmentalImpact {
    let wind = env.peak_wind_mph();
    let mut effects_description = Vec::new();

    let temperature_effect = if env.temperature_f < 40.0 {
        effects_description.push("Cold air increases air density, slightly reducing velocity".to_string());
        ImpactLevel::Moderate
    } else if env.temperature_f > 90.0 {
        effects_description.push("Hot air decreases air density, slightly increasing velocity".to_string());
        ImpactLevel::Moderate
    } else {
        ImpactLevel::Minimal
    };

    let altitude_effect = if env.altitude_feet > 3000.0 {
        effects_description.push(format!(
            "High altitude ({}ft) reduces air density, increasing velocity and flattening trajectory",
            env.altitude_feet
        ));
        if env.altitude_feet < 8000.0 {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::Significant
        }
    } else {
        ImpactLevel::Minimal
    };

    let wind_effect = if wind > 5.0 {
        effects_description.push(format!("Wind ({}mph) will cause drift and affect trajectory", wind));
        if wind < 15.0 {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::Significant
        }
    } else {
        ImpactLevel::Minimal
    };

    let humidity_effect = ImpactLevel::Minimal;
    let overall_impact = temperature_effect.max(altitude_effect).max(humidity_effect).max(wind_effect);

    let mut recommendations = Vec::new();
    if wind > 10.0 {
        recommendations.push("Strong wind conditions - consider wind flags and practice wind reading".to_string());
    }
    if env.altitude_feet > 5000.0 {
        recommendations.push("High altitude - expect flatter trajectory and potentially faster speeds".to_string());
    }
    if env.temperature_f < 40.0 || env.temperature_f > 90.0 {
        recommendations.push("Extreme temperature - verify zero and expect minor velocity changes".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Favorable conditions for accurate shooting".to_string());
    }

    EnvironmentalImpact {
        temperature_effect,
        altitude_effect,
        humidity_effect,
        wind_effect,
        effects_description,
        overall_impact,
        recommendations,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub summary: String,
    pub key_points: Vec<String>,
}

pub fn generate_flight_summary(points: &[TrajectoryPoint], env: &EnvironmentalConditions) -> FlightSummary {
    if points.is_empty() {
        return FlightSummary { summary: "No trajectory data available".to_string(), key_points: Vec::new() };
    }

    let max_range = points.iter().map(|p| p.distance_yards).fold(0.0, f64::max);
    let mut key_points = vec![
        format!("Maximum effective range: {:.0} yards", max_range),
        format!("Peak trajectory height: {:.1} inches", max_height(points)),
    ];
    if let Some(p) = points.iter().find(|p| (p.distance_yards - 40.0).abs() <= FLIGHT_TIME_TOLERANCE_YD) {
        key_points.push(format!("At 40 yards: {:.1}\" drop, {:.0} fps", p.drop_inches, p.velocity_fps));
    }
    let wind = env.peak_wind_mph();
    if wind > 0.0 {
        let drift = points.last().map(|p| p.wind_drift_inches).unwrap_or(0.0);
        key_points.push(format!("Wind drift with {}mph wind: {:.1}\" at {:.0} yards", wind, drift.abs(), max_range));
    }

    FlightSummary { summary: key_points.join(". "), key_points }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(distance_yards: f64, height_inches: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            time: distance_yards * 3.0 / 280.0,
            distance_yards,
            height_inches,
            velocity_fps: 280.0 - distance_yards * 0.5,
            drop_inches: distance_yards * 0.3,
            wind_drift_inches: 0.0,
            oscillation_amplitude: None,
            kinetic_energy: None,
        }
    }

    /// Parabola through the sight line at 0 yards rising to a peak at 30 yards
    fn arc() -> Vec<TrajectoryPoint> {
        (0..=70).map(|d| point(d as f64, -0.01 * (d as f64 - 30.0).powi(2) + 2.0)).collect()
    }

    #[test]
    fn test_kinetic_energy_exact() {
        let ke = calculate_kinetic_energy(280.0, 420.0, 40.0);
        let retention = (1.0f64 - 0.003 * 40.0).max(0.6);
        assert_eq!(ke.kinetic_energy_ft_lbs, 420.0 * (280.0 * retention).powi(2) / 450240.0);
        assert_eq!(ke.velocity_retention_percent, retention * 100.0);
        assert!((ke.momentum - 0.06 * 280.0 * retention).abs() < 1e-12);
        assert!((ke.momentum_slug_fps * GRAVITY_FPS2 - ke.momentum).abs() < 1e-12);
    }

    #[test]
    fn test_retention_floor() {
        let ke = calculate_kinetic_energy(280.0, 420.0, 500.0);
        assert_eq!(ke.velocity_fps, 280.0 * 0.6);
    }

    #[test]
    fn test_penetration_categories() {
        let strong = calculate_penetration_potential(73.0, 0.52, ArrowType::Hunting);
        assert_eq!(strong.category, PenetrationCategory::Excellent);
        assert_eq!(strong.recommendations.len(), 3);

        let weak = calculate_penetration_potential(20.0, 0.1, ArrowType::Target);
        assert_eq!(weak.category, PenetrationCategory::Poor);
        assert_eq!(weak.description, "Insufficient for hunting, good for target");

        let capped = calculate_penetration_potential(500.0, 5.0, ArrowType::Field);
        assert_eq!(capped.penetration_score, 100.0);
    }

    #[test]
    fn test_consistency_score() {
        assert_eq!(consistency_score(ArrowType::Target, 400.0), 85.0);
        assert_eq!(consistency_score(ArrowType::Field, 320.0), 76.0);
        assert_eq!(consistency_score(ArrowType::Field, 700.0), 68.0);
    }

    #[test]
    fn test_flatness_score() {
        let flat: Vec<_> = (0..=40).map(|d| point(d as f64, 0.0)).collect();
        assert_eq!(flatness_score(&flat), 100.0);

        let curved: Vec<_> = (0..=60).map(|d| point(d as f64, -(d as f64) * 0.25)).collect();
        // 10" at 40 yd, points beyond 40 yd ignored
        assert_eq!(flatness_score(&curved), 75.0);

        assert_eq!(flatness_score(&flat[..1]), 0.0);
    }

    #[test]
    fn test_performance_metrics_key_distances() {
        let metrics = calculate_performance_metrics(&arc(), 420.0, ArrowType::Hunting);
        let distances: Vec<f64> = metrics.performance_at_distance.iter().map(|p| p.distance_yards).collect();
        // 80 yd is within 5 yd of nothing; 70 is the last sample
        assert_eq!(distances, vec![20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(metrics.max_effective_range_yards, 70.0);
        assert_eq!(metrics.max_trajectory_height_inches, 2.0);
        assert!(metrics.flight_time_40yd.is_some());
        assert!(metrics.flight_time_60yd.is_some());
        assert_eq!(metrics.consistency_score, 75.0);
    }

    #[test]
    fn test_elevation_adjustments_horizontal_rule() {
        let adjustments = calculate_elevation_adjustments(0.0, &arc());
        assert_eq!(adjustments.angle_adjustments.len(), 7);
        assert!(adjustments.angle_adjustments.iter().all(|a| a.angle_degrees != 0.0));

        let up30 = adjustments.angle_adjustments.iter().find(|a| a.angle_degrees == 30.0).unwrap();
        let at60 = up30.distances.iter().find(|d| d.distance_yards == 60.0).unwrap();
        // Past the peak the arrow is lower at 60 than at 52, so hold low
        assert!((at60.horizontal_equivalent - 52.0).abs() < 0.1);
        assert!(at60.aim_adjustment_inches > 0.0);
        assert_eq!(at60.holdover_recommendation, Holdover::AimLow);

        // Uphill and downhill at the same angle give the same correction
        let down30 = adjustments.angle_adjustments.iter().find(|a| a.angle_degrees == -30.0).unwrap();
        assert_eq!(down30.distances, up30.distances);
    }

    #[test]
    fn test_environmental_impact() {
        let calm = analyze_environmental_impact(&EnvironmentalConditions::default());
        assert_eq!(calm.overall_impact, ImpactLevel::Minimal);
        assert_eq!(calm.recommendations, vec!["Favorable conditions for accurate shooting".to_string()]);

        let harsh = EnvironmentalConditions {
            temperature_f: 20.0,
            altitude_feet: 9000.0,
            ..EnvironmentalConditions::default().with_wind(12.0, 90.0)
        };
        let impact = analyze_environmental_impact(&harsh);
        assert_eq!(impact.temperature_effect, ImpactLevel::Moderate);
        assert_eq!(impact.altitude_effect, ImpactLevel::Significant);
        assert_eq!(impact.wind_effect, ImpactLevel::Moderate);
        assert_eq!(impact.overall_impact, ImpactLevel::Significant);
        assert_eq!(impact.recommendations.len(), 3);
        assert_eq!(impact.effects_description.len(), 3);
    }

    #[test]
    fn test_flight_summary() {
        let summary = generate_flight_summary(&arc(), &EnvironmentalConditions::default());
        assert_eq!(summary.key_points[0], "Maximum effective range: 70 yards");
        assert!(summary.key_points.iter().any(|k| k.starts_with("At 40 yards")));
        assert!(summary.summary.contains(". "));

        let empty = generate_flight_summary(&[], &EnvironmentalConditions::default());
        assert_eq!(empty.summary, "No trajectory data available");
    }
}
