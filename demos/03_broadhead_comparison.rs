//! Broadhead vs Field Point Example
//!
//! Compares a fixed-blade and a mechanical broadhead against a field point of
//! the same weight, both shot from the field-point sight setting in a
//! crosswind.

use arrow_tuning_engine::{
    ArrowType, BallisticsCalculator, BroadheadComparison, BroadheadSpec, EnvironmentalConditions, ShootingConditions,
};
use tracing_subscriber::EnvFilter;

fn print_comparison(name: &str, comparison: &BroadheadComparison) {
    println!("{}:", name);
    println!(
        "  Drag factor at launch: {:.3}, wind sensitivity: {:.3}",
        comparison.launch_drag_factor, comparison.launch_wind_sensitivity
    );
    println!("  Yards | Impact shift (in) | Extra drift (in) | Velocity loss (fps)");
    println!("  ------|-------------------|------------------|--------------------");
    for d in &comparison.distances {
        println!(
            "  {:5.0} | {:17.2} | {:16.2} | {:19.1}",
            d.distance_yards, d.impact_shift_inches, d.drift_difference_inches, d.velocity_difference_fps
        );
    }
    println!("  Largest shift: {:.2}\"", comparison.max_impact_shift_inches);
    for line in &comparison.sight_guidance {
        println!("  - {}", line);
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Broadhead Comparison Example ===\n");

    let calculator = BallisticsCalculator::default();
    let env = EnvironmentalConditions::default().with_wind(10.0, 90.0);
    let shooting = ShootingConditions::default();

    let fixed = BroadheadSpec::fixed(1.125, 3);
    let mechanical = BroadheadSpec::mechanical(0.75, 2.0, 2, 200.0);

    let fixed_result =
        calculator.compare_field_point_vs_broadhead(280.0, 425.0, 0.246, ArrowType::Hunting, &fixed, &env, &shooting);
    let mechanical_result = calculator.compare_field_point_vs_broadhead(
        280.0,
        425.0,
        0.246,
        ArrowType::Hunting,
        &mechanical,
        &env,
        &shooting,
    );

    print_comparison("Fixed 3-blade, 1-1/8\"", &fixed_result);
    print_comparison("Mechanical 2-blade, 2\" open", &mechanical_result);
}
