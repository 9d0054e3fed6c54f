//! Arrow Trajectory Example
//!
//! Flies a hunting arrow through a quartering wind, prints the yardage table,
//! then repeats the shot with arrow-paradox effects enabled.

use arrow_tuning_engine::{
    ArrowParadoxParameters, ArrowType, BallisticsCalculator, EnvironmentalConditions, ShootingConditions,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Arrow Trajectory Example ===\n");

    let speed = 285.0; // fps
    let weight = 430.0; // grains
    let diameter = 0.246; // inches

    let env = EnvironmentalConditions { temperature_f: 45.0, altitude_feet: 1500.0, ..Default::default() }
        .with_wind(8.0, 60.0);
    let shooting = ShootingConditions { max_range_yards: 70.0, ..Default::default() };

    let calculator = BallisticsCalculator::default();
    let report = calculator.calculate_trajectory(speed, weight, diameter, ArrowType::Hunting, &env, &shooting);

    println!("Launch angle: {:.3}°", report.launch_angle_degrees);
    println!("Air density: {:.5} lb/ft³", report.air_density);
    println!("Ballistic coefficient: {}", report.ballistic_coefficient);
    println!("Flight ended: {:?}", report.termination);
    println!();

    println!("  Yards | Height (in) | Drift (in) | Velocity (fps)");
    println!("  ------|-------------|------------|---------------");
    for point in report.trajectory_points.iter().filter(|p| p.distance_yards >= 10.0) {
        if point.distance_yards.floor() as i64 % 10 == 0 {
            println!(
                "  {:5.0} | {:11.2} | {:10.2} | {:14.1}",
                point.distance_yards, point.height_inches, point.wind_drift_inches, point.velocity_fps
            );
        }
    }
    println!();

    let metrics = &report.performance_metrics;
    println!("Flatness score: {:.1}", metrics.trajectory_flatness_score);
    println!("Consistency score: {:.1}", metrics.consistency_score);
    for dp in &metrics.performance_at_distance {
        println!("  {:3.0} yd: {:5.1} ft·lbf, momentum {:.3}", dp.distance_yards, dp.kinetic_energy, dp.momentum);
    }

    let energy = calculator.calculate_kinetic_energy(speed, weight, 0.0);
    let penetration = calculator.calculate_penetration_potential(
        energy.kinetic_energy_ft_lbs,
        energy.momentum_slug_fps,
        ArrowType::Hunting,
    );
    println!(
        "Penetration: {:.1} ({:?}) - {}",
        penetration.penetration_score, penetration.category, penetration.description
    );
    println!();

    println!("Summary: {}", report.flight_summary.summary);
    for line in &report.flight_summary.key_points {
        println!("  - {}", line);
    }
    println!();

    let paradox = ArrowParadoxParameters { dynamic_spine_factor: 1.12, nocking_point_height: 0.25, ..Default::default() };
    let enhanced =
        calculator.calculate_enhanced_trajectory(speed, weight, diameter, ArrowType::Hunting, &env, &shooting, &paradox);
    let analysis = &enhanced.paradox_analysis;

    println!("=== With Arrow Paradox ===");
    println!("Effective speed: {:.1} fps", enhanced.effective_speed_fps);
    println!("Initial oscillation: {:.2}\"", analysis.initial_amplitude_inches);
    println!("Assessment: {}", analysis.tuning_assessment);
    for rec in &analysis.recommendations {
        println!("  - {}", rec);
    }
}
