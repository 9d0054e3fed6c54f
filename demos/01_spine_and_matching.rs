//! Spine Recommendation and Arrow Matching Example
//!
//! Calculates the required spine for a hunting compound, balances the build
//! and ranks a small in-memory catalog against the recommendation.
//!
//! Run with `RUST_LOG=arrow_tuning_engine=debug` to see the engine's trace.

use arrow_tuning_engine::{
    calculate_enhanced_foc, ArrowCatalogRecord, ArrowMatchingEngine, BowConfiguration, BowType, InMemoryCatalog,
    MatchRequest, SpineCalculator, SpineSpecification, UseCase,
};
use tracing_subscriber::EnvFilter;

fn shaft(id: u64, manufacturer: &str, model: &str, spines: &[(f64, f64)], diameter: f64) -> ArrowCatalogRecord {
    ArrowCatalogRecord {
        id,
        manufacturer: manufacturer.to_string(),
        model_name: model.to_string(),
        material: "Carbon".to_string(),
        arrow_type: Some("hunting".to_string()),
        description: None,
        spine_specifications: spines
            .iter()
            .map(|&(spine, gpi)| SpineSpecification::new(spine, gpi, Some(diameter)))
            .collect(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Spine and Matching Example ===\n");

    let bow = BowConfiguration::new(70.0, 29.0, BowType::Compound);
    let calculator = SpineCalculator::default();
    let spine = calculator.calculate_required_spine(&bow, 29.5, 100.0, 10.0, 15.0, None);

    println!("Bow: {}# {} at {}\" draw", bow.draw_weight, bow.bow_type, bow.draw_length);
    println!(
        "  Required spine: {} (range {}-{}, {:?} units)",
        spine.calculated_spine, spine.spine_range.minimum, spine.spine_range.maximum, spine.spine_units
    );
    if let Some(dynamic) = spine.dynamic_spine {
        println!("  Dynamic spine estimate: {}", dynamic);
    }
    println!("  Confidence: {}", spine.confidence.as_str());
    for note in &spine.notes {
        println!("  - {}", note);
    }
    println!();

    // 29.5" of a 9.5 gpi shaft
    let foc = calculate_enhanced_foc(29.5, 100.0, 280.0, 10.0, 15.0, 16.0, UseCase::Hunting, None);
    println!("FOC: {:.1}% ({:?})", foc.foc.foc_percentage, foc.status);
    println!(
        "  Optimal point: {:.0} gr -> {:.1}% FOC",
        foc.optimization.optimal_point_weight, foc.optimization.achieved_foc
    );
    for rec in &foc.recommendations {
        println!("  - {}", rec);
    }
    println!();

    let catalog = InMemoryCatalog::new(vec![
        shaft(1, "Easton Archery", "Axis 4mm", &[(260.0, 11.0), (300.0, 10.2), (340.0, 9.5), (400.0, 8.8)], 0.204),
        shaft(2, "Gold Tip", "Hunter XT", &[(250.0, 10.8), (300.0, 9.7), (340.0, 9.1), (400.0, 8.4)], 0.246),
        shaft(3, "Victory Archery", "VAP TKO", &[(250.0, 10.5), (300.0, 9.4), (350.0, 8.7)], 0.166),
        shaft(4, "Black Eagle", "Outlaw", &[(350.0, 9.0), (400.0, 8.3), (500.0, 7.4)], 0.244),
    ]);
    let engine = ArrowMatchingEngine::new(catalog, calculator);

    let mut request = MatchRequest::new(bow, 29.5);
    request.preferred_manufacturers = vec!["easton".to_string()];
    let matches = engine.find_matching_arrows(&request);

    println!("Catalog Matches:");
    println!("  Score | Spine | Confidence | Arrow");
    println!("  ------|-------|------------|------------------------------");
    for m in &matches {
        println!(
            "  {:5.1} | {:5.0} | {:10} | {} {}",
            m.match_score,
            m.matched_spine,
            m.confidence_level.as_str(),
            m.manufacturer,
            m.model_name
        );
        for issue in &m.potential_issues {
            println!("        ! {}", issue);
        }
    }
}
