//! Ballistics calculator: trajectory reports, energy and broadhead comparison.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atmosphere::EnvironmentalConditions;
use crate::broadhead::{BroadheadSpec, PointType};
use crate::config::BallisticsSettings;
use crate::constants::{DEFAULT_ARROW_DIAMETER_IN, KE_DIVISOR};
use crate::drag::{self, ArrowType};
use crate::paradox::{ArrowParadoxParameters, ParadoxAnalysis};
use crate::performance::{
    self, round_to, ElevationAdjustments, EnvironmentalImpact, FlightSummary, KineticEnergy, PenetrationPotential,
    PerformanceMetrics, ADJUSTMENT_DISTANCES,
};
use crate::trajectory::{
    calculate_launch_angle, integrate, interpolate_at, FlightModel, FlightPath, Launch, ShootingConditions, StepControl,
    TerminationReason, TrajectoryPoint,
};
use crate::wind::WindSock;

/// Impact shift treated as "same zero" for broadhead tuning (inches)
const IMPACT_SHIFT_TOLERANCE_IN: f64 = 1.0;
const DRIFT_DIFFERENCE_TOLERANCE_IN: f64 = 1.0;
/// Margin past the last compared distance so it can be interpolated
const COMPARISON_RANGE_MARGIN_YD: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryReport {
    pub trajectory_points: Vec<TrajectoryPoint>,
    pub termination: TerminationReason,
    /// Bore elevation above the line of sight needed for the zero
    pub launch_angle_degrees: f64,
    /// lb/ft³
    pub air_density: f64,
    pub drag_coefficient: f64,
    pub performance_metrics: PerformanceMetrics,
    pub elevation_adjustments: ElevationAdjustments,
    pub environmental_impact: EnvironmentalImpact,
    pub ballistic_coefficient: f64,
    pub flight_summary: FlightSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedTrajectoryReport {
    #[serde(flatten)]
    pub report: TrajectoryReport,
    /// Launch speed after paradox losses
    pub effective_speed_fps: f64,
    pub paradox_analysis: ParadoxAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadheadDistanceComparison {
    pub distance_yards: f64,
    pub field_point_height_inches: f64,
    pub broadhead_height_inches: f64,
    /// Broadhead impact relative to the field point, positive high
    pub impact_shift_inches: f64,
    pub field_point_drift_inches: f64,
    pub broadhead_drift_inches: f64,
    pub drift_difference_inches: f64,
    pub field_point_velocity_fps: f64,
    pub broadhead_velocity_fps: f64,
    pub velocity_difference_fps: f64,
    pub energy_difference_ft_lbs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadheadComparison {
    pub broadhead: BroadheadSpec,
    pub launch_drag_factor: f64,
    pub launch_wind_sensitivity: f64,
    pub distances: Vec<BroadheadDistanceComparison>,
    pub max_impact_shift_inches: f64,
    pub sight_guidance: Vec<String>,
}

/// Aerodynamic setup for one simulated shot
struct Shot<'a> {
    speed_fps: f64,
    weight_grains: f64,
    diameter_inches: f64,
    arrow_type: ArrowType,
    drag_coefficient: f64,
    environmental: &'a EnvironmentalConditions,
    shooting: &'a ShootingConditions,
}

impl Shot<'_> {
    fn drag_constant(&self, air_density: f64) -> f64 {
        drag::drag_constant(air_density, self.drag_coefficient, self.diameter_inches, self.weight_grains)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BallisticsCalculator {
    settings: BallisticsSettings,
}

impl BallisticsCalculator {
    pub fn new(settings: BallisticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BallisticsSettings {
        &self.settings
    }

    fn basic_control(&self) -> StepControl {
        StepControl {
            time_step: self.settings.basic_time_step,
            max_time: self.settings.basic_max_time,
            ground_threshold_ft: self.settings.ground_threshold_ft,
        }
    }

    fn enhanced_control(&self) -> StepControl {
        StepControl {
            time_step: self.settings.enhanced_time_step,
            max_time: self.settings.enhanced_max_time,
            ground_threshold_ft: self.settings.ground_threshold_ft,
        }
    }

    /// Simulate a shot and derive the full report.
    ///
    /// A non-positive diameter falls back to 0.246".
    pub fn calculate_trajectory(
        &self,
        speed_fps: f64,
        weight_grains: f64,
        diameter_inches: f64,
        arrow_type: ArrowType,
        environmental: &EnvironmentalConditions,
        shooting: &ShootingConditions,
    ) -> TrajectoryReport {
        let shot = Shot {
            speed_fps,
            weight_grains,
            diameter_inches: positive_or(diameter_inches, DEFAULT_ARROW_DIAMETER_IN),
            arrow_type,
            drag_coefficient: arrow_type.base_drag_coefficient(),
            environmental,
            shooting,
        };
        let air_density = environmental.air_density();
        let model = FlightModel::new(shot.drag_constant(air_density));
        self.simulate(&shot, model, 0.0, air_density, &self.basic_control())
    }

    /// Trajectory with arrow-paradox launch losses, oscillation and ground effect
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_enhanced_trajectory(
        &self,
        speed_fps: f64,
        weight_grains: f64,
        diameter_inches: f64,
        arrow_type: ArrowType,
        environmental: &EnvironmentalConditions,
        shooting: &ShootingConditions,
        paradox: &ArrowParadoxParameters,
    ) -> EnhancedTrajectoryReport {
        let effects = paradox.effects();
        let effective_speed = speed_fps * (1.0 - effects.velocity_loss);
        let diameter = positive_or(
            diameter_inches,
            positive_or(paradox.shaft_diameter, DEFAULT_ARROW_DIAMETER_IN),
        );

        let shot = Shot {
            speed_fps: effective_speed,
            weight_grains,
            diameter_inches: diameter,
            arrow_type,
            drag_coefficient: arrow_type.base_drag_coefficient() * effects.drag_multiplier,
            environmental,
            shooting,
        };
        let air_density = environmental.air_density();
        let model = FlightModel {
            drag_constant: shot.drag_constant(air_density),
            oscillation: Some(effects.envelope),
            broadhead: None,
            ground_effect: true,
        };

        let report = self.simulate(&shot, model, effects.launch_bias_degrees, air_density, &self.enhanced_control());

        EnhancedTrajectoryReport { report, effective_speed_fps: effective_speed, paradox_analysis: paradox.analyze() }
    }

    fn simulate(
        &self,
        shot: &Shot<'_>,
        model: FlightModel,
        launch_bias_degrees: f64,
        air_density: f64,
        control: &StepControl,
    ) -> TrajectoryReport {
        let shooting = shot.shooting;
        let launch_angle = calculate_launch_angle(
            shot.speed_fps,
            model.drag_constant,
            shooting.sight_height_inches,
            shooting.zero_distance_yards,
        );
        let launch = Launch {
            speed_fps: shot.speed_fps,
            weight_grains: shot.weight_grains,
            elevation_degrees: shooting.shot_angle_degrees + launch_angle + launch_bias_degrees,
        };
        debug!(
            "simulating {} fps, {} gr, Cd {:.3}, launch {:.3}°",
            shot.speed_fps, shot.weight_grains, shot.drag_coefficient, launch.elevation_degrees
        );

        let wind = wind_sock(shot.environmental);
        let FlightPath { points, termination, .. } = integrate(&launch, &model, shooting, &wind, control);

        // The horizontal-distance rule is read off a level shot
        let level_points;
        let adjustment_points = if shooting.shot_angle_degrees == 0.0 {
            &points
        } else {
            let level = ShootingConditions { shot_angle_degrees: 0.0, ..shooting.clone() };
            let level_launch = Launch { elevation_degrees: launch_angle + launch_bias_degrees, ..launch };
            level_points = integrate(&level_launch, &model, &level, &wind, control).points;
            &level_points
        };
        let elevation_adjustments =
            performance::calculate_elevation_adjustments(shooting.shot_angle_degrees, adjustment_points);

        TrajectoryReport {
            performance_metrics: performance::calculate_performance_metrics(&points, shot.weight_grains, shot.arrow_type),
            elevation_adjustments,
            environmental_impact: performance::analyze_environmental_impact(shot.environmental),
            ballistic_coefficient: round_to(
                drag::ballistic_coefficient(shot.weight_grains, shot.diameter_inches, shot.drag_coefficient),
                4,
            ),
            flight_summary: performance::generate_flight_summary(&points, shot.environmental),
            trajectory_points: points,
            termination,
            launch_angle_degrees: launch_angle,
            air_density,
            drag_coefficient: shot.drag_coefficient,
        }
    }

    /// Energy at a distance from the velocity-retention model
    pub fn calculate_kinetic_energy(&self, speed_fps: f64, weight_grains: f64, distance_yards: f64) -> KineticEnergy {
        performance::calculate_kinetic_energy(speed_fps, weight_grains, distance_yards)
    }

    pub fn calculate_penetration_potential(
        &self,
        kinetic_energy_ft_lbs: f64,
        momentum_slug_fps: f64,
        arrow_type: ArrowType,
    ) -> PenetrationPotential {
        performance::calculate_penetration_potential(kinetic_energy_ft_lbs, momentum_slug_fps, arrow_type)
    }

    /// Fly a field point and a broadhead from the same sight setting and
    /// compare where they land.
    #[allow(clippy::too_many_arguments)]
    pub fn compare_field_point_vs_broadhead(
        &self,
        speed_fps: f64,
        weight_grains: f64,
        diameter_inches: f64,
        arrow_type: ArrowType,
        broadhead: &BroadheadSpec,
        environmental: &EnvironmentalConditions,
        shooting: &ShootingConditions,
    ) -> BroadheadComparison {
        let last_distance = ADJUSTMENT_DISTANCES[ADJUSTMENT_DISTANCES.len() - 1];
        let shooting = ShootingConditions {
            max_range_yards: shooting.max_range_yards.max(last_distance + COMPARISON_RANGE_MARGIN_YD),
            ..shooting.clone()
        };
        let shot = Shot {
            speed_fps,
            weight_grains,
            diameter_inches: positive_or(diameter_inches, DEFAULT_ARROW_DIAMETER_IN),
            arrow_type,
            drag_coefficient: arrow_type.base_drag_coefficient(),
            environmental,
            shooting: &shooting,
        };

        let field_point = FlightModel::new(shot.drag_constant(environmental.air_density()));
        let with_broadhead = FlightModel { broadhead: Some(broadhead.clone()), ..field_point.clone() };

        // Both arrows leave from the field-point sight setting
        let launch_angle = calculate_launch_angle(
            speed_fps,
            field_point.drag_constant,
            shooting.sight_height_inches,
            shooting.zero_distance_yards,
        );
        let launch = Launch {
            speed_fps,
            weight_grains,
            elevation_degrees: shooting.shot_angle_degrees + launch_angle,
        };
        let wind = wind_sock(environmental);
        let control = self.basic_control();
        let fp_path = integrate(&launch, &field_point, &shooting, &wind, &control);
        let bh_path = integrate(&launch, &with_broadhead, &shooting, &wind, &control);

        let distances: Vec<BroadheadDistanceComparison> = ADJUSTMENT_DISTANCES
            .iter()
            .filter_map(|&d| {
                let fp = interpolate_at(&fp_path.points, d)?;
                let bh = interpolate_at(&bh_path.points, d)?;
                let energy = |v: f64| weight_grains * (v * v) / KE_DIVISOR;
                Some(BroadheadDistanceComparison {
                    distance_yards: d,
                    field_point_height_inches: round_to(fp.height_inches, 2),
                    broadhead_height_inches: round_to(bh.height_inches, 2),
                    impact_shift_inches: round_to(bh.height_inches - fp.height_inches, 2),
                    field_point_drift_inches: round_to(fp.wind_drift_inches, 2),
                    broadhead_drift_inches: round_to(bh.wind_drift_inches, 2),
                    drift_difference_inches: round_to(bh.wind_drift_inches - fp.wind_drift_inches, 2),
                    field_point_velocity_fps: round_to(fp.velocity_fps, 1),
                    broadhead_velocity_fps: round_to(bh.velocity_fps, 1),
                    velocity_difference_fps: round_to(bh.velocity_fps - fp.velocity_fps, 1),
                    energy_difference_ft_lbs: round_to(energy(bh.velocity_fps) - energy(fp.velocity_fps), 2),
                })
            })
            .collect();

        let max_impact_shift_inches = distances
            .iter()
            .map(|c| c.impact_shift_inches)
            .fold(0.0, |acc: f64, s| if s.abs() > acc.abs() { s } else { acc });

        BroadheadComparison {
            sight_guidance: sight_guidance(broadhead, &distances, max_impact_shift_inches),
            broadhead: broadhead.clone(),
            launch_drag_factor: broadhead.drag_factor(speed_fps),
            launch_wind_sensitivity: broadhead.wind_sensitivity(speed_fps),
            distances,
            max_impact_shift_inches,
        }
    }
}

fn wind_sock(env: &EnvironmentalConditions) -> WindSock {
    if !env.wind_segments.is_empty() {
        WindSock::new(env.wind_segments.clone())
    } else if env.wind_speed_mph != 0.0 {
        WindSock::uniform(env.wind_speed_mph, env.wind_direction_degrees)
    } else {
        WindSock::calm()
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}

fn sight_guidance(
    broadhead: &BroadheadSpec,
    distances: &[BroadheadDistanceComparison],
    max_shift: f64,
) -> Vec<String> {
    let mut guidance = Vec::new();

    for c in distances.iter().filter(|c| c.impact_shift_inches.abs() >= IMPACT_SHIFT_TOLERANCE_IN) {
        let direction = if c.impact_shift_inches < 0.0 { "low" } else { "high" };
        guidance.push(format!(
            "At {:.0} yards the broadhead impacts {:.1}\" {} of the field point",
            c.distance_yards,
            c.impact_shift_inches.abs(),
            direction
        ));
    }

    if max_shift.abs() < IMPACT_SHIFT_TOLERANCE_IN {
        let reach = distances.last().map(|c| c.distance_yards).unwrap_or(0.0);
        guidance.push(format!(
            "Broadhead and field point share a zero through {:.0} yards; no sight change needed",
            reach
        ));
    } else {
        let pins = if max_shift < 0.0 { "down" } else { "up" };
        guidance.push(format!(
            "Follow the broadhead: move the pins {} or tune until both impact together",
            pins
        ));
    }

    if let Some(c) = distances
        .iter()
        .filter(|c| c.drift_difference_inches.abs() >= DRIFT_DIFFERENCE_TOLERANCE_IN)
        .last()
    {
        guidance.push(format!(
            "Broadhead drifts {:.1}\" more in the wind at {:.0} yards; practice wind holds with it",
            c.drift_difference_inches.abs(),
            c.distance_yards
        ));
    }

    if broadhead.point_type != PointType::Fixed {
        guidance.push("Mechanical blades fly close to a field point until they open; confirm impact at your longest hunting distance".to_string());
    }

    guidance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::point_near;
    use crate::wind::WindSegment;

    fn calculator() -> BallisticsCalculator {
        BallisticsCalculator::default()
    }

    #[test]
    fn test_basic_report() {
        let report = calculator().calculate_trajectory(
            280.0,
            420.0,
            0.246,
            ArrowType::Hunting,
            &EnvironmentalConditions::default(),
            &ShootingConditions::default(),
        );
        assert_eq!(report.drag_coefficient, 0.45);
        assert!(report.launch_angle_degrees >= 0.5 && report.launch_angle_degrees <= 3.0);
        assert!(matches!(report.termination, TerminationReason::GroundImpact | TerminationReason::MaxRange));
        assert!(report.trajectory_points.len() > 60);

        // Zeroed at 20 yards: the arrow crosses the sight line near there
        let at20 = point_near(&report.trajectory_points, 20.0, 1.0).unwrap();
        assert!(at20.height_inches.abs() < 1.0, "height at zero = {}", at20.height_inches);

        // Velocity decays monotonically
        for pair in report.trajectory_points.windows(2) {
            assert!(pair[1].velocity_fps <= pair[0].velocity_fps + 1e-9);
        }
        assert!(report.ballistic_coefficient > 0.0);
        assert_eq!(report.performance_metrics.consistency_score, 75.0);
        assert!(report.flight_summary.summary.contains("At 40 yards"));
    }

    #[test]
    fn test_heavier_drag_loses_more_speed() {
        let env = EnvironmentalConditions::default();
        let shooting = ShootingConditions::default();
        let target = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Target, &env, &shooting);
        let hunting = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Hunting, &env, &shooting);
        let v = |r: &TrajectoryReport| point_near(&r.trajectory_points, 60.0, 1.0).unwrap().velocity_fps;
        assert!(v(&target) > v(&hunting));
    }

    #[test]
    fn test_zero_weight_is_guarded() {
        let report = calculator().calculate_trajectory(
            280.0,
            0.0,
            0.246,
            ArrowType::Hunting,
            &EnvironmentalConditions::default(),
            &ShootingConditions::default(),
        );
        assert_eq!(report.termination, TerminationReason::NoFlight);
        assert_eq!(report.trajectory_points.len(), 1);
        assert_eq!(report.ballistic_coefficient, 0.0);
        assert!(report.performance_metrics.performance_at_distance.is_empty());
    }

    #[test]
    fn test_angled_shot_adjustments_use_level_flight() {
        let env = EnvironmentalConditions::default();
        let level = ShootingConditions::default();
        let uphill = ShootingConditions { shot_angle_degrees: 20.0, ..ShootingConditions::default() };

        let level_report = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Hunting, &env, &level);
        let uphill_report = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Hunting, &env, &uphill);

        let expected = performance::calculate_elevation_adjustments(20.0, &level_report.trajectory_points);
        assert_eq!(uphill_report.elevation_adjustments, expected);
        assert!(expected.angle_adjustments.iter().all(|a| a.angle_degrees != 20.0));
        assert_ne!(
            uphill_report.elevation_adjustments,
            performance::calculate_elevation_adjustments(20.0, &uphill_report.trajectory_points)
        );
    }

    #[test]
    fn test_wind_segments_override_single_wind() {
        let shooting = ShootingConditions::level(20.0, 40.0);
        let mut env = EnvironmentalConditions::default().with_wind(10.0, 90.0);
        let uniform = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Field, &env, &shooting);

        env.wind_segments = vec![WindSegment { speed_mph: 10.0, direction_degrees: 270.0, until_yards: 100.0 }];
        let segmented = calculator().calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Field, &env, &shooting);

        let drift = |r: &TrajectoryReport| r.trajectory_points.last().unwrap().wind_drift_inches;
        assert!(drift(&uniform) < 0.0);
        assert!(drift(&segmented) > 0.0);
    }

    #[test]
    fn test_enhanced_trajectory() {
        let params = ArrowParadoxParameters { dynamic_spine_factor: 1.2, ..Default::default() };
        let enhanced = calculator().calculate_enhanced_trajectory(
            280.0,
            420.0,
            0.0,
            ArrowType::Hunting,
            &EnvironmentalConditions::default(),
            &ShootingConditions::default(),
            &params,
        );
        assert!((enhanced.effective_speed_fps - 280.0 * 0.98).abs() < 1e-9);
        assert!(enhanced.report.drag_coefficient > 0.45);
        let first = &enhanced.report.trajectory_points[0];
        assert!(first.oscillation_amplitude.is_some());
        assert!(first.kinetic_energy.is_some());
        assert!((enhanced.paradox_analysis.velocity_loss_percent - 2.0).abs() < 1e-9);

        let json = serde_json::to_value(&enhanced).unwrap();
        assert!(json.get("trajectory_points").is_some());
        assert!(json.get("paradox_analysis").is_some());
    }

    #[test]
    fn test_broadhead_comparison() {
        let comparison = calculator().compare_field_point_vs_broadhead(
            280.0,
            420.0,
            0.246,
            ArrowType::Field,
            &BroadheadSpec::fixed(1.25, 3),
            &EnvironmentalConditions::default().with_wind(10.0, 90.0),
            &ShootingConditions::level(20.0, 40.0),
        );
        assert_eq!(comparison.distances.len(), 5);
        for c in &comparison.distances {
            assert!(c.impact_shift_inches <= 0.0);
            assert!(c.velocity_difference_fps < 0.0);
            assert!(c.energy_difference_ft_lbs < 0.0);
            assert!(c.broadhead_drift_inches <= c.field_point_drift_inches);
        }
        assert!(comparison.launch_drag_factor > 1.0);
        assert!(!comparison.sight_guidance.is_empty());
    }

    #[test]
    fn test_mechanical_guidance_note() {
        let comparison = calculator().compare_field_point_vs_broadhead(
            280.0,
            420.0,
            0.246,
            ArrowType::Field,
            &BroadheadSpec::mechanical(0.75, 2.0, 2, 250.0),
            &EnvironmentalConditions::default(),
            &ShootingConditions::default(),
        );
        assert!(comparison.sight_guidance.iter().any(|g| g.starts_with("Mechanical blades")));
    }
}
