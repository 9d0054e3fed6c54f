// End-to-end checks across the spine, matching and ballistics engines

use arrow_tuning_engine::config::BallisticsSettings;
use arrow_tuning_engine::constants::{GRAVITY_FPS2, KE_DIVISOR};
use arrow_tuning_engine::drag::drag_constant;
use arrow_tuning_engine::*;

fn carbon_record(id: u64, manufacturer: &str, spines: &[f64]) -> ArrowCatalogRecord {
    ArrowCatalogRecord {
        id,
        manufacturer: manufacturer.to_string(),
        model_name: format!("Hunter {}", id),
        material: "Carbon".to_string(),
        arrow_type: Some("hunting".to_string()),
        description: None,
        spine_specifications: spines.iter().map(|&s| SpineSpecification::new(s, 9.0, Some(0.246))).collect(),
    }
}

#[test]
fn compound_seventy_pound_setup() {
    let calculator = SpineCalculator::default();
    let bow = BowConfiguration::new(70.0, 29.0, BowType::Compound);
    let result = calculator.calculate_required_spine(&bow, 29.5, 100.0, 10.0, 15.0, None);

    assert_eq!(result.spine_units, SpineUnits::Carbon);
    assert!((250.0..=340.0).contains(&result.calculated_spine));
    // 70# at 29" reads 300 on the compound chart
    assert!((result.calculated_spine - 300.0).abs() <= 25.0);
    assert!(result.spine_range.contains(result.calculated_spine));
    assert!(result.dynamic_spine.is_some());
}

#[test]
fn recurve_finger_shooter() {
    let calculator = SpineCalculator::default();
    let mut bow = BowConfiguration::new(35.0, 28.0, BowType::Recurve);
    bow.release_type = ReleaseType::Finger;
    let result = calculator.calculate_required_spine(&bow, 30.0, 125.0, 10.0, 15.0, None);

    assert_eq!(result.spine_units, SpineUnits::Carbon);
    assert!((450.0..=550.0).contains(&result.calculated_spine));
    assert!(result.effective_draw_weight.is_some());
}

#[test]
fn wood_arrows_use_pound_ratings() {
    let calculator = SpineCalculator::default();
    let bow = BowConfiguration::new(40.0, 28.0, BowType::Traditional);
    let result = calculator.calculate_required_spine(&bow, 28.0, 100.0, 10.0, 15.0, Some(ArrowMaterial::Wood));

    assert_eq!(result.spine_units, SpineUnits::Pounds);
    assert!(result.spine_range.minimum >= 37.5);
    assert!(result.spine_range.maximum <= 47.5);
    assert!(result.spine_range.contains(result.calculated_spine));
}

#[test]
fn matching_widens_search_for_distant_spines() {
    // Nothing inside the ±50 window around 250-300, one spine inside ±100
    let catalog = InMemoryCatalog::new(vec![carbon_record(7, "Carbon Express", &[365.0])]);
    let engine = ArrowMatchingEngine::new(catalog, SpineCalculator::default());
    let request = MatchRequest::new(BowConfiguration::new(70.0, 29.0, BowType::Compound), 29.5);

    let matches = engine.find_matching_arrows(&request);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].arrow_id, 7);
    assert_eq!(matches[0].matched_spine, 365.0);
    assert!((0.0..=100.0).contains(&matches[0].match_score));
}

#[test]
fn matching_results_are_ranked_and_bounded() {
    let catalog = InMemoryCatalog::new(vec![
        carbon_record(1, "Gold Tip", &[250.0, 300.0, 340.0, 400.0]),
        carbon_record(2, "Easton Archery", &[260.0, 280.0, 300.0, 340.0, 400.0]),
        carbon_record(3, "Victory Archery", &[300.0, 350.0, 400.0]),
    ]);
    let engine = ArrowMatchingEngine::new(catalog, SpineCalculator::default());
    let mut request = MatchRequest::new(BowConfiguration::new(70.0, 29.0, BowType::Compound), 29.5);
    request.max_results = 2;

    let matches = engine.find_matching_arrows(&request);
    assert_eq!(matches.len(), 2);
    for pair in matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
}

#[test]
fn hunting_arrow_tracks_closed_form_drag() {
    let calculator = BallisticsCalculator::default();
    let env = EnvironmentalConditions::standard();
    let shooting = ShootingConditions::level(20.0, 60.0);
    let report = calculator.calculate_trajectory(280.0, 420.0, 0.246, ArrowType::Hunting, &env, &shooting);

    let k = drag_constant(report.air_density, report.drag_coefficient, 0.246, 420.0);
    let sample = report
        .trajectory_points
        .iter()
        .find(|p| p.distance_yards >= 40.0)
        .expect("trajectory reaches 40 yards");

    let x = sample.distance_yards * 3.0;
    let velocity = 280.0 * (-k * x).exp();
    let time = (k * x).exp_m1() / (k * 280.0);
    let drop = 0.5 * GRAVITY_FPS2 * time * time * 12.0;

    assert!((sample.velocity_fps - velocity).abs() / velocity < 0.05);
    assert!((sample.drop_inches - drop).abs() / drop < 0.05);
}

#[test]
fn kinetic_energy_is_exact() {
    let calculator = BallisticsCalculator::default();
    let at_bow = calculator.calculate_kinetic_energy(280.0, 420.0, 0.0);
    assert_eq!(at_bow.kinetic_energy_ft_lbs, 420.0 * 280.0 * 280.0 / KE_DIVISOR);
    assert_eq!(at_bow.velocity_retention_percent, 100.0);

    // 40 yards keeps 88% of launch speed
    let retention = (1.0f64 - 40.0 * 0.003).max(0.6);
    let velocity = 280.0 * retention;
    let at_forty = calculator.calculate_kinetic_energy(280.0, 420.0, 40.0);
    assert_eq!(at_forty.kinetic_energy_ft_lbs, 420.0 * (velocity * velocity) / KE_DIVISOR);
    assert!((at_forty.velocity_retention_percent - 88.0).abs() < 1e-9);
    assert!((at_forty.velocity_fps - 246.4).abs() < 1e-9);
}

#[test]
fn fine_steps_match_free_fall_from_the_bore_line() {
    let settings = BallisticsSettings { basic_time_step: 0.001, ..Default::default() };
    let calculator = BallisticsCalculator::new(settings);
    let env = EnvironmentalConditions::standard();
    let shooting = ShootingConditions { sight_height_inches: 0.0, ..ShootingConditions::level(20.0, 50.0) };
    let report = calculator.calculate_trajectory(300.0, 400.0, 0.246, ArrowType::Target, &env, &shooting);

    let sample = report
        .trajectory_points
        .iter()
        .find(|p| p.distance_yards >= 30.0)
        .expect("trajectory reaches 30 yards");
    let free_fall = 0.5 * GRAVITY_FPS2 * sample.time * sample.time * 12.0;

    assert!(sample.wind_drift_inches.abs() < 1e-9);
    assert!((sample.drop_inches - free_fall).abs() / free_fall < 0.015);
}

#[test]
fn default_config_parses_and_validates() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.ballistics, BallisticsSettings::default());
}
