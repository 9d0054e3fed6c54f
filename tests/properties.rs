// Property checks for spine monotonicity, FOC optimisation and match scoring

use arrow_tuning_engine::*;
use proptest::prelude::*;

fn carbon_bow_type() -> impl Strategy<Value = BowType> {
    prop_oneof![Just(BowType::Compound), Just(BowType::Recurve), Just(BowType::Traditional)]
}

fn spine(bow_type: BowType, draw_weight: f64, arrow_length: f64, material: Option<ArrowMaterial>) -> SpineResult {
    let bow = BowConfiguration::new(draw_weight, 28.0, bow_type);
    SpineCalculator::default().calculate_required_spine(&bow, arrow_length, 100.0, 10.0, 15.0, material)
}

proptest! {
    #[test]
    fn carbon_spine_stiffens_with_draw_weight(
        bow_type in carbon_bow_type(),
        draw_weight in 20.0f64..85.0,
        extra in 0.0f64..15.0,
        arrow_length in 24.0f64..34.0,
    ) {
        let light = spine(bow_type, draw_weight, arrow_length, None);
        let heavy = spine(bow_type, draw_weight + extra, arrow_length, None);
        prop_assert!(heavy.calculated_spine <= light.calculated_spine);
    }

    #[test]
    fn carbon_spine_stiffens_with_length(
        bow_type in carbon_bow_type(),
        draw_weight in 20.0f64..85.0,
        arrow_length in 24.0f64..32.0,
        extra in 0.0f64..3.0,
    ) {
        let short = spine(bow_type, draw_weight, arrow_length, None);
        let long = spine(bow_type, draw_weight, arrow_length + extra, None);
        prop_assert!(long.calculated_spine <= short.calculated_spine);
    }

    #[test]
    fn wood_pounds_rise_with_draw_weight_and_length(
        draw_weight in 25.0f64..70.0,
        extra_weight in 0.0f64..10.0,
        arrow_length in 25.0f64..31.0,
        extra_length in 0.0f64..2.0,
    ) {
        let base = spine(BowType::Traditional, draw_weight, arrow_length, Some(ArrowMaterial::Wood));
        let heavier = spine(BowType::Traditional, draw_weight + extra_weight, arrow_length, Some(ArrowMaterial::Wood));
        let longer = spine(BowType::Traditional, draw_weight, arrow_length + extra_length, Some(ArrowMaterial::Wood));
        prop_assert_eq!(base.spine_units, SpineUnits::Pounds);
        prop_assert!(heavier.calculated_spine >= base.calculated_spine);
        prop_assert!(longer.calculated_spine >= base.calculated_spine);
    }

    #[test]
    fn spine_calculation_is_pure(
        bow_type in carbon_bow_type(),
        draw_weight in 20.0f64..85.0,
        arrow_length in 24.0f64..34.0,
    ) {
        prop_assert_eq!(
            spine(bow_type, draw_weight, arrow_length, None),
            spine(bow_type, draw_weight, arrow_length, None)
        );
    }

    #[test]
    fn optimised_point_weight_reaches_target_foc(
        arrow_length in 26.0f64..32.0,
        point_weight in 75.0f64..200.0,
        shaft_weight in 180.0f64..330.0,
        fraction in 0.0f64..=1.0,
    ) {
        let components = ArrowComponents {
            arrow_length,
            point_weight,
            shaft_weight,
            nock_weight: 10.0,
            fletching_weight: 15.0,
            insert_weight: 15.0,
        };
        let lightest = calculate_foc(arrow_length, 25.0, shaft_weight, 10.0, 15.0, 15.0).foc_percentage;
        let heaviest = calculate_foc(arrow_length, 500.0, shaft_weight, 10.0, 15.0, 15.0).foc_percentage;
        let target = lightest + (heaviest - lightest) * fraction;

        let optimization = optimize_point_weight(&components, target);
        prop_assert!(optimization.achievable);
        let rebuilt = calculate_foc(arrow_length, optimization.optimal_point_weight, shaft_weight, 10.0, 15.0, 15.0);
        prop_assert!((rebuilt.foc_percentage - target).abs() <= 0.5);

        let enhanced = calculate_enhanced_foc(
            arrow_length,
            point_weight,
            shaft_weight,
            10.0,
            15.0,
            15.0,
            UseCase::Hunting,
            Some(target),
        );
        prop_assert!(enhanced.optimization.achievable);
        prop_assert_eq!(enhanced.optimization.optimal_point_weight, optimization.optimal_point_weight);
        let through_entry = calculate_foc(
            arrow_length,
            enhanced.optimization.optimal_point_weight,
            shaft_weight,
            10.0,
            15.0,
            15.0,
        );
        prop_assert!((through_entry.foc_percentage - target).abs() <= 0.5);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn match_scores_stay_within_bounds(
        shafts in prop::collection::vec(
            (prop::collection::vec(150.0f64..700.0, 1..6), 5.0f64..12.0, 0.2f64..0.4),
            1..6,
        ),
        draw_weight in 40.0f64..80.0,
    ) {
        let records = shafts
            .into_iter()
            .enumerate()
            .map(|(i, (spines, gpi, od))| ArrowCatalogRecord {
                id: i as u64 + 1,
                manufacturer: format!("Maker {}", i % 3),
                model_name: format!("Model {}", i),
                material: "Carbon".to_string(),
                arrow_type: None,
                description: None,
                spine_specifications: spines
                    .into_iter()
                    .map(|s| SpineSpecification::new(s.round(), gpi, Some(od)))
                    .collect(),
            })
            .collect();
        let engine = ArrowMatchingEngine::new(InMemoryCatalog::new(records), SpineCalculator::default());
        let request = MatchRequest::new(BowConfiguration::new(draw_weight, 29.0, BowType::Compound), 29.0);

        let matches = engine.find_matching_arrows(&request);
        prop_assert!(matches.len() <= request.max_results);
        for m in &matches {
            prop_assert!((0.0..=100.0).contains(&m.match_score));
        }
    }
}
