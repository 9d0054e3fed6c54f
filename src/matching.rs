//! Arrow matching: turn a spine recommendation into a ranked list of catalog arrows.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bow::{ArrowMaterial, BowConfiguration, BowType};
use crate::catalog::{ArrowCatalog, ArrowCatalogRecord, CatalogQuery, CatalogSummary, SpineSpecification};
use crate::config::{EngineConfig, MatchingSettings, ScoringWeights};
use crate::constants::{DEFAULT_FLETCHING_WEIGHT, DEFAULT_INSERT_WEIGHT, DEFAULT_NOCK_WEIGHT, DEFAULT_POINT_WEIGHT};
use crate::foc::calculate_foc;
use crate::spine::{Confidence, SpineCalculator, SpineRange, SpineResult, SpineUnits};

/// Shop names customers type mapped to catalog manufacturer names
const MANUFACTURER_ALIASES: &[(&str, &str)] = &[
    ("Easton", "Easton Archery"),
    ("Gold Tip", "Gold Tip"),
    ("Victory", "Victory Archery"),
    ("Carbon Express", "Carbon Express"),
    ("Traditional Wood", "Traditional Wood Arrows"),
    ("BigArchery", "BigArchery"),
    ("Nijora", "Nijora Archery"),
    ("DK Bow", "DK Bow"),
    ("Aurel", "Aurel Archery"),
    ("Fivics", "Fivics"),
    ("Pandarus", "Pandarus Archery"),
    ("Skylon", "Skylon Archery"),
];

/// Name fragments identifying wood-shaft manufacturers
const WOOD_MANUFACTURER_HINTS: &[&str] = &[
    "Traditional Wood",
    "Traditional Wood Arrows",
    "Port Orford Cedar",
    "Sitka Spruce",
    "Douglas Fir",
    "Pine",
    "Ash",
    "Bamboo",
];

const ALL_WOOD_MANUFACTURERS: &[&str] = &[
    "Traditional Wood Arrows",
    "Port Orford Cedar Shafts",
    "Sitka Spruce Shafts",
    "Douglas Fir Shafts",
    "Pine Shafts",
    "Ash Shafts",
    "Bamboo Shafts",
];

/// Catalog manufacturer name for a customer-entered one
pub fn manufacturer_alias(name: &str) -> &str {
    let trimmed = name.trim();
    MANUFACTURER_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, full)| *full)
        .unwrap_or(trimmed)
}

/// Manufacturers stocking a wood species; unknown or empty species gives every wood maker
pub fn wood_species_manufacturers(species: Option<&str>) -> &'static [&'static str] {
    let species = species.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    match species.as_str() {
        "port orford cedar" => &["Port Orford Cedar Shafts"],
        "sitka spruce" => &["Sitka Spruce Shafts"],
        "douglas fir" => &["Douglas Fir Shafts"],
        "pine" => &["Pine Shafts"],
        "ash" => &["Ash Shafts"],
        "bamboo" => &["Bamboo Shafts", "Traditional Wood Arrows"],
        _ => ALL_WOOD_MANUFACTURERS,
    }
}

/// Inputs for one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRequest {
    pub bow_config: BowConfiguration,
    pub arrow_length: f64,
    pub point_weight: f64,
    pub nock_weight: f64,
    pub fletching_weight: f64,
    pub insert_weight: f64,
    pub preferred_manufacturers: Vec<String>,
    /// Outer diameter bounds (inches)
    pub target_diameter_range: Option<(f64, f64)>,
    /// Shaft GPI bounds
    pub target_weight_range: Option<(f64, f64)>,
    /// FOC percentage bounds
    pub target_foc_range: Option<(f64, f64)>,
    pub arrow_type_preference: Option<String>,
    pub material_preference: Option<ArrowMaterial>,
    pub wood_species_preference: Option<String>,
    pub max_results: usize,
    pub min_spine_options: usize,
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            bow_config: BowConfiguration::default(),
            arrow_length: 29.0,
            point_weight: DEFAULT_POINT_WEIGHT,
            nock_weight: DEFAULT_NOCK_WEIGHT,
            fletching_weight: DEFAULT_FLETCHING_WEIGHT,
            insert_weight: DEFAULT_INSERT_WEIGHT,
            preferred_manufacturers: Vec::new(),
            target_diameter_range: None,
            target_weight_range: None,
            target_foc_range: None,
            arrow_type_preference: None,
            material_preference: None,
            wood_species_preference: None,
            max_results: 50,
            min_spine_options: 3,
        }
    }
}

impl MatchRequest {
    pub fn new(bow_config: BowConfiguration, arrow_length: f64) -> Self {
        Self { bow_config, arrow_length, ..Default::default() }
    }

    fn wants_wood(&self) -> bool {
        self.material_preference.is_some_and(|m| m.is_wood())
    }
}

/// One ranked catalog arrow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowMatch {
    pub arrow_id: u64,
    pub manufacturer: String,
    pub model_name: String,
    pub material: String,
    pub arrow_type: Option<String>,
    pub matched_spine: f64,
    pub spine_deviation: f64,
    pub gpi_weight: f64,
    pub outer_diameter: Option<f64>,
    pub inner_diameter: Option<f64>,
    /// Weighted score, 0-100
    pub match_score: f64,
    pub confidence_level: Confidence,
    pub spine_specifications: Vec<SpineSpecification>,
    pub match_reasons: Vec<String>,
    pub potential_issues: Vec<String>,
}

/// Sub-scores feeding a match score
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoreBreakdown {
    spine_accuracy: f64,
    availability: f64,
    manufacturer: f64,
    diameter: f64,
    foc: f64,
}

impl ScoreBreakdown {
    fn weighted(&self, w: &ScoringWeights) -> f64 {
        let total = self.spine_accuracy * w.spine_accuracy()
            + self.availability * w.availability()
            + self.manufacturer * w.manufacturer_preference()
            + self.diameter * w.diameter_fit()
            + self.foc * w.foc_fit();
        ((total * 10.0).round() / 10.0).clamp(0.0, 100.0)
    }
}

/// Linear falloff outside `[min, max]`; `half_penalty` away scores 50
fn range_fit_score(value: f64, (min, max): (f64, f64), half_penalty: f64) -> f64 {
    if value >= min && value <= max {
        return 100.0;
    }
    let deviation = if value < min { min - value } else { value - max };
    (100.0 - deviation / (half_penalty * 2.0) * 100.0).max(0.0)
}

/// Confidence tier from deviation against half the tolerance band
pub fn confidence_for_deviation(deviation: f64, range: &SpineRange) -> Confidence {
    let half_width = range.width() / 2.0;
    if half_width <= 0.0 {
        return if deviation <= 0.0 { Confidence::High } else { Confidence::Low };
    }
    let ratio = deviation / half_width;
    if ratio <= 0.3 {
        Confidence::High
    } else if ratio <= 0.7 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Ranks catalog arrows against a spine recommendation
pub struct ArrowMatchingEngine<C: ArrowCatalog> {
    catalog: C,
    calculator: SpineCalculator,
    weights: ScoringWeights,
    settings: MatchingSettings,
}

impl<C: ArrowCatalog> ArrowMatchingEngine<C> {
    pub fn new(catalog: C, calculator: SpineCalculator) -> Self {
        Self {
            catalog,
            calculator,
            weights: ScoringWeights::default(),
            settings: MatchingSettings::default(),
        }
    }

    pub fn with_config(catalog: C, calculator: SpineCalculator, config: &EngineConfig) -> Self {
        Self {
            catalog,
            calculator,
            weights: config.scoring,
            settings: config.matching.clone(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_settings(mut self, settings: MatchingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn calculator(&self) -> &SpineCalculator {
        &self.calculator
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Ranked matches for a request; empty when nothing survives the relaxed search.
    ///
    /// Matches scoring at or above the diversity threshold come first, by score,
    /// up to the per-manufacturer cap. Remaining slots are filled by score after
    /// them, so a capped manufacturer's next entry can follow a lower-scoring one.
    pub fn find_matching_arrows(&self, request: &MatchRequest) -> Vec<ArrowMatch> {
        let spine = self.calculator.calculate_required_spine(
            &request.bow_config,
            request.arrow_length,
            request.point_weight,
            request.nock_weight,
            request.fletching_weight,
            request.material_preference,
        );
        info!(
            bow_type = %request.bow_config.bow_type,
            draw_weight = request.bow_config.draw_weight,
            arrow_length = request.arrow_length,
            spine = spine.calculated_spine,
            min = spine.spine_range.minimum,
            max = spine.spine_range.maximum,
            "finding arrow matches"
        );

        let expansion = match spine.spine_units {
            SpineUnits::Pounds => self.settings.wood_expansion,
            SpineUnits::Carbon => self.settings.numeric_expansion,
        };

        let summaries = self.search_candidates(request, &spine.spine_range, expansion, true);
        debug!(candidates = summaries.len(), expansion, "catalog search returned");
        if summaries.is_empty() {
            warn!("no catalog arrows matched the search criteria");
        }
        let records = self.fetch_records(&summaries);

        let first_pass_min = if request.wants_wood() {
            self.settings.wood_min_spine_options
        } else {
            request.min_spine_options
        };
        let mut matches = self.score_records(&records, first_pass_min, &spine, request);
        debug!(matches = matches.len(), min_spine_options = first_pass_min, "strict pass");

        if matches.is_empty() && !records.is_empty() {
            matches = self.score_records(&records, 1, &spine, request);
            debug!(matches = matches.len(), "relaxed spine-option pass");
        }

        if matches.is_empty() {
            let widened = expansion * 2.0;
            let summaries = self.search_candidates(request, &spine.spine_range, widened, false);
            debug!(candidates = summaries.len(), expansion = widened, "widened catalog search");
            let records = self.fetch_records(&summaries);
            matches = self.score_records(&records, 1, &spine, request);
        }

        if matches.is_empty() {
            warn!("no arrows matched after relaxing the search");
            return matches;
        }

        matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        let selected = self.diversify(matches, request.max_results);
        info!(matches = selected.len(), "arrow matching complete");
        selected
    }

    fn manufacturer_filter(&self, request: &MatchRequest) -> Vec<String> {
        if request.wants_wood() {
            // Only wood makers narrow a wood search; species buckets handle the rest
            return request
                .preferred_manufacturers
                .iter()
                .filter(|pref| {
                    let pref = pref.to_lowercase();
                    WOOD_MANUFACTURER_HINTS.iter().any(|hint| pref.contains(&hint.to_lowercase()))
                })
                .map(|pref| manufacturer_alias(pref).to_string())
                .collect();
        }
        request
            .preferred_manufacturers
            .iter()
            .map(|pref| manufacturer_alias(pref).to_string())
            .collect()
    }

    fn search_candidates(
        &self,
        request: &MatchRequest,
        range: &SpineRange,
        expansion: f64,
        include_wood_buckets: bool,
    ) -> Vec<CatalogSummary> {
        let wood = request.wants_wood();
        let spine_min = (range.minimum - expansion).floor();
        let spine_max = (range.maximum + expansion).ceil();

        let query = CatalogQuery {
            spine_min,
            spine_max,
            manufacturers: self.manufacturer_filter(request),
            material: request.material_preference.map(|m| m.catalog_name().to_string()),
            // Wood shafts are rarely typed by discipline
            arrow_type: if wood { None } else { request.arrow_type_preference.clone() },
            diameter_min: request.target_diameter_range.map(|r| r.0),
            diameter_max: request.target_diameter_range.map(|r| r.1),
            gpi_min: request.target_weight_range.map(|r| r.0),
            gpi_max: request.target_weight_range.map(|r| r.1),
            limit: request.max_results.saturating_mul(self.settings.candidate_multiplier),
        };
        debug!(spine_min, spine_max, manufacturers = ?query.manufacturers, material = ?query.material, "catalog query");
        let mut results = self.catalog.search(&query);

        if wood && include_wood_buckets && results.len() < request.max_results {
            let mut seen: HashSet<u64> = results.iter().map(|s| s.id).collect();
            for maker in wood_species_manufacturers(request.wood_species_preference.as_deref()) {
                let mut bucket = CatalogQuery::spine_window(spine_min, spine_max, request.max_results);
                bucket.manufacturers = vec![maker.to_string()];
                bucket.material = Some(ArrowMaterial::Wood.catalog_name().to_string());
                for hit in self.catalog.search(&bucket) {
                    if seen.insert(hit.id) {
                        results.push(hit);
                    }
                }
            }
        }
        results
    }

    fn fetch_records(&self, summaries: &[CatalogSummary]) -> Vec<ArrowCatalogRecord> {
        summaries.iter().filter_map(|s| self.catalog.get_arrow(s.id)).collect()
    }

    fn score_records(
        &self,
        records: &[ArrowCatalogRecord],
        min_spine_options: usize,
        spine: &SpineResult,
        request: &MatchRequest,
    ) -> Vec<ArrowMatch> {
        records
            .par_iter()
            .filter(|r| r.spine_specifications.len() >= min_spine_options.max(1))
            .filter_map(|r| self.create_match(r, spine, request))
            .collect()
    }

    fn create_match(
        &self,
        record: &ArrowCatalogRecord,
        spine: &SpineResult,
        request: &MatchRequest,
    ) -> Option<ArrowMatch> {
        let optimal = spine.calculated_spine;
        let valid: Vec<&SpineSpecification> =
            record.spine_specifications.iter().filter(|s| s.is_valid()).collect();
        let closest = *valid
            .iter()
            .min_by(|a, b| (a.spine - optimal).abs().total_cmp(&(b.spine - optimal).abs()))?;

        // Wood shafts are sold by weight band: anywhere inside the band is exact
        let is_wood = request.wants_wood() || record.is_wood();
        let inside_wood_band = is_wood && valid.len() >= 2 && {
            let lo = valid.iter().map(|s| s.spine).fold(f64::INFINITY, f64::min);
            let hi = valid.iter().map(|s| s.spine).fold(f64::NEG_INFINITY, f64::max);
            optimal >= lo && optimal <= hi
        };
        let deviation = if inside_wood_band { 0.0 } else { (closest.spine - optimal).abs() };

        let breakdown = self.score_breakdown(record, closest, deviation, &spine.spine_range, request);
        let match_score = breakdown.weighted(&self.weights);

        Some(ArrowMatch {
            arrow_id: record.id,
            manufacturer: record.manufacturer.clone(),
            model_name: record.model_name.clone(),
            material: record.material.clone(),
            arrow_type: record.arrow_type.clone(),
            matched_spine: closest.spine,
            spine_deviation: deviation,
            gpi_weight: closest.gpi_weight,
            outer_diameter: closest.outer_diameter,
            inner_diameter: closest.inner_diameter,
            match_score,
            confidence_level: confidence_for_deviation(deviation, &spine.spine_range),
            spine_specifications: record.spine_specifications.clone(),
            match_reasons: self.match_reasons(record, closest, deviation, request),
            potential_issues: self.potential_issues(record, closest, &spine.spine_range, &request.bow_config),
        })
    }

    fn score_breakdown(
        &self,
        record: &ArrowCatalogRecord,
        spec: &SpineSpecification,
        deviation: f64,
        range: &SpineRange,
        request: &MatchRequest,
    ) -> ScoreBreakdown {
        let half_width = range.width() / 2.0;
        let spine_accuracy = if half_width > 0.0 {
            (100.0 - deviation / half_width * 100.0).max(0.0)
        } else if deviation <= 0.0 {
            100.0
        } else {
            0.0
        };

        let count = record.spine_specifications.len() as f64;
        let availability = (count / self.settings.availability_saturation as f64 * 100.0).min(100.0);

        let manufacturer = if request.preferred_manufacturers.is_empty()
            || preferred_manufacturer(&record.manufacturer, &request.preferred_manufacturers).is_some()
        {
            100.0
        } else {
            50.0
        };

        let diameter = match (request.target_diameter_range, spec.outer_diameter) {
            (Some(range), Some(d)) => range_fit_score(d, range, 0.05),
            _ => 100.0,
        };

        let foc = match request.target_foc_range {
            Some(range) => {
                let shaft_weight = spec.gpi_weight * request.arrow_length;
                let estimate = calculate_foc(
                    request.arrow_length,
                    request.point_weight,
                    shaft_weight,
                    request.nock_weight,
                    request.fletching_weight,
                    request.insert_weight,
                );
                range_fit_score(estimate.foc_percentage, range, 2.0)
            }
            None => 100.0,
        };

        ScoreBreakdown { spine_accuracy, availability, manufacturer, diameter, foc }
    }

    fn match_reasons(
        &self,
        record: &ArrowCatalogRecord,
        spec: &SpineSpecification,
        deviation: f64,
        request: &MatchRequest,
    ) -> Vec<String> {
        let mut reasons = Vec::new();
        if deviation <= 10.0 {
            reasons.push("Excellent spine match".to_string());
        } else if deviation <= 25.0 {
            reasons.push("Good spine match".to_string());
        } else {
            reasons.push("Acceptable spine match".to_string());
        }

        let count = record.spine_specifications.len();
        if count >= 6 {
            reasons.push(format!("Excellent availability ({} spine options)", count));
        } else if count >= 3 {
            reasons.push(format!("Good availability ({} spine options)", count));
        }

        if preferred_manufacturer(&record.manufacturer, &request.preferred_manufacturers).is_some() {
            reasons.push(format!("Preferred manufacturer ({})", record.manufacturer));
        }

        if let Some(d) = spec.outer_diameter {
            if d <= 0.24 {
                reasons.push("Small diameter for excellent penetration".to_string());
            } else if d >= 0.30 {
                reasons.push("Large diameter for maximum cutting surface".to_string());
            }
        }
        reasons
    }

    fn potential_issues(
        &self,
        record: &ArrowCatalogRecord,
        spec: &SpineSpecification,
        range: &SpineRange,
        bow: &BowConfiguration,
    ) -> Vec<String> {
        let mut issues = Vec::new();
        let off_center = (spec.spine - range.optimal).abs();
        if off_center > 40.0 {
            issues.push("Large spine deviation - may require tuning".to_string());
        } else if off_center > 25.0 {
            issues.push("Moderate spine deviation - paper tuning recommended".to_string());
        }

        if spec.gpi_weight > 12.0 && bow.bow_type == BowType::Compound {
            issues.push("Heavy arrow - may reduce arrow speed significantly".to_string());
        } else if spec.gpi_weight > 0.0 && spec.gpi_weight < 5.0 {
            issues.push("Very light arrow - may cause noise and vibration".to_string());
        }

        if let Some(d) = spec.outer_diameter {
            if d < 0.20 {
                issues.push("Very small diameter - may be fragile".to_string());
            } else if d > 0.35 {
                issues.push("Large diameter - may cause wind drift".to_string());
            }
        }

        if record.spine_specifications.len() < 3 {
            issues.push("Limited spine options available".to_string());
        }
        issues
    }

    /// Admit strong matches up to the per-manufacturer cap, then fill by score
    fn diversify(&self, sorted: Vec<ArrowMatch>, max_results: usize) -> Vec<ArrowMatch> {
        let mut per_manufacturer: HashMap<String, usize> = HashMap::new();
        let mut selected = Vec::with_capacity(max_results.min(sorted.len()));
        let mut remaining = Vec::new();

        for m in sorted {
            let count = per_manufacturer.entry(m.manufacturer.clone()).or_insert(0);
            if *count < self.settings.diversity_cap_per_manufacturer
                && m.match_score >= self.settings.diversity_score_threshold
            {
                *count += 1;
                selected.push(m);
            } else {
                remaining.push(m);
            }
        }

        let open = max_results.saturating_sub(selected.len());
        selected.extend(remaining.into_iter().take(open));
        selected.truncate(max_results);
        selected
    }
}

fn preferred_manufacturer<'a>(manufacturer: &str, preferred: &'a [String]) -> Option<&'a String> {
    let name = manufacturer.to_lowercase();
    preferred.iter().find(|p| name.contains(&p.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bow::ReleaseType;
    use crate::catalog::InMemoryCatalog;

    fn record(id: u64, manufacturer: &str, material: &str, spines: &[f64], gpi: f64, od: f64) -> ArrowCatalogRecord {
        ArrowCatalogRecord {
            id,
            manufacturer: manufacturer.to_string(),
            model_name: format!("Shaft {}", id),
            material: material.to_string(),
            arrow_type: Some("hunting".to_string()),
            description: None,
            spine_specifications: spines.iter().map(|&s| SpineSpecification::new(s, gpi, Some(od))).collect(),
        }
    }

    fn engine(records: Vec<ArrowCatalogRecord>) -> ArrowMatchingEngine<InMemoryCatalog> {
        ArrowMatchingEngine::new(InMemoryCatalog::new(records), SpineCalculator::default())
    }

    fn compound_request() -> MatchRequest {
        // 70# at 29.5" -> optimal 275, range 250-300
        MatchRequest::new(BowConfiguration::new(70.0, 29.0, BowType::Compound), 29.5)
    }

    #[test]
    fn test_aliases_and_species() {
        assert_eq!(manufacturer_alias("easton"), "Easton Archery");
        assert_eq!(manufacturer_alias("Black Eagle"), "Black Eagle");
        assert_eq!(wood_species_manufacturers(Some("Bamboo")).len(), 2);
        assert_eq!(wood_species_manufacturers(None).len(), 7);
        assert_eq!(wood_species_manufacturers(Some("oak")).len(), 7);
    }

    #[test]
    fn test_range_fit_score() {
        assert_eq!(range_fit_score(0.25, (0.2, 0.3), 0.05), 100.0);
        assert!((range_fit_score(0.35, (0.2, 0.3), 0.05) - 50.0).abs() < 1e-9);
        assert_eq!(range_fit_score(1.0, (0.2, 0.3), 0.05), 0.0);
        assert!((range_fit_score(6.0, (8.0, 12.0), 2.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_tiers() {
        let range = SpineRange { minimum: 250.0, optimal: 275.0, maximum: 300.0 };
        assert_eq!(confidence_for_deviation(7.5, &range), Confidence::High);
        assert_eq!(confidence_for_deviation(15.0, &range), Confidence::Medium);
        assert_eq!(confidence_for_deviation(20.0, &range), Confidence::Low);
    }

    #[test]
    fn test_ranks_by_score() {
        let e = engine(vec![
            record(1, "Gold Tip", "Carbon", &[250.0, 300.0, 340.0, 400.0], 9.0, 0.246),
            record(2, "Easton Archery", "Carbon", &[260.0, 280.0, 300.0, 340.0, 400.0, 500.0, 600.0, 700.0], 9.5, 0.246),
        ]);
        let matches = e.find_matching_arrows(&compound_request());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].arrow_id, 2);
        assert_eq!(matches[0].matched_spine, 280.0);
        assert_eq!(matches[0].spine_deviation, 5.0);
        assert_eq!(matches[0].confidence_level, Confidence::High);
        assert!(matches[0].match_score > matches[1].match_score);
        assert!(matches.iter().all(|m| (0.0..=100.0).contains(&m.match_score)));
    }

    #[test]
    fn test_relaxes_spine_option_requirement() {
        let e = engine(vec![record(1, "Victory Archery", "Carbon", &[280.0], 8.5, 0.204)]);
        let matches = e.find_matching_arrows(&compound_request());
        assert_eq!(matches.len(), 1);
        assert!(matches[0].potential_issues.iter().any(|i| i.contains("Limited spine options")));
    }

    #[test]
    fn test_widened_search_finds_distant_spine() {
        // 365 is beyond 300 + 50 but inside 300 + 100
        let e = engine(vec![record(1, "Carbon Express", "Carbon", &[365.0, 400.0, 450.0], 8.0, 0.246)]);
        let matches = e.find_matching_arrows(&compound_request());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_spine, 365.0);
        assert_eq!(matches[0].confidence_level, Confidence::Low);
    }

    #[test]
    fn test_empty_when_nothing_fits() {
        let e = engine(vec![record(1, "Gold Tip", "Carbon", &[1000.0], 6.0, 0.246)]);
        assert!(e.find_matching_arrows(&compound_request()).is_empty());
    }

    #[test]
    fn test_manufacturer_preference() {
        let e = engine(vec![
            record(1, "Gold Tip", "Carbon", &[275.0, 300.0, 340.0], 9.0, 0.246),
            record(2, "Easton Archery", "Carbon", &[275.0, 300.0, 340.0], 9.0, 0.246),
        ]);
        let mut request = compound_request();
        request.preferred_manufacturers = vec!["Easton".to_string()];
        let matches = e.find_matching_arrows(&request);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].arrow_id, 2);
        assert!(matches[0].match_reasons.iter().any(|r| r.starts_with("Preferred manufacturer")));
    }

    #[test]
    fn test_wood_band_counts_as_exact() {
        let e = engine(vec![
            record(1, "Port Orford Cedar Shafts", "Wood", &[35.0, 40.0, 45.0, 50.0], 10.0, 0.34),
            record(2, "Easton Archery", "Carbon", &[40.0, 45.0], 9.0, 0.246),
        ]);
        let mut request = MatchRequest::new(BowConfiguration::new(40.0, 28.0, BowType::Traditional), 28.0);
        request.material_preference = Some(ArrowMaterial::Wood);
        let matches = e.find_matching_arrows(&request);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].arrow_id, 1);
        assert_eq!(matches[0].spine_deviation, 0.0);
        assert_eq!(matches[0].confidence_level, Confidence::High);
    }

    #[test]
    fn test_diversity_cap() {
        let spines = [260.0, 270.0, 275.0, 280.0, 290.0, 300.0, 310.0, 320.0];
        let mut records: Vec<ArrowCatalogRecord> =
            (1..=5).map(|id| record(id, "Gold Tip", "Carbon", &spines, 9.0, 0.246)).collect();
        records.push(record(6, "Easton Archery", "Carbon", &[250.0, 300.0, 340.0], 9.0, 0.246));
        let e = engine(records);

        let mut request = compound_request();
        request.max_results = 4;
        let matches = e.find_matching_arrows(&request);
        assert_eq!(matches.len(), 4);
        // Three high scorers per maker, then the best remaining entry
        let gold_tip_first = matches.iter().take(3).filter(|m| m.manufacturer == "Gold Tip").count();
        assert_eq!(gold_tip_first, 3);
    }

    fn scored(id: u64, manufacturer: &str, score: f64) -> ArrowMatch {
        ArrowMatch {
            arrow_id: id,
            manufacturer: manufacturer.to_string(),
            model_name: format!("Shaft {}", id),
            material: "Carbon".to_string(),
            arrow_type: None,
            matched_spine: 300.0,
            spine_deviation: 0.0,
            gpi_weight: 9.0,
            outer_diameter: None,
            inner_diameter: None,
            match_score: score,
            confidence_level: Confidence::High,
            spine_specifications: Vec::new(),
            match_reasons: Vec::new(),
            potential_issues: Vec::new(),
        }
    }

    #[test]
    fn test_diversity_admission_order() {
        let e = engine(Vec::new());
        let sorted = vec![
            scored(1, "Gold Tip", 95.0),
            scored(2, "Gold Tip", 94.0),
            scored(3, "Gold Tip", 93.0),
            scored(4, "Gold Tip", 92.0),
            scored(5, "Easton Archery", 86.0),
            scored(6, "Easton Archery", 60.0),
        ];
        let ids: Vec<u64> = e.diversify(sorted, 5).iter().map(|m| m.arrow_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 5, 4]);
    }

    #[test]
    fn test_off_center_issue_measured_from_optimal() {
        // Recurve band is 450-525 around an optimal of 500
        let e = engine(vec![record(1, "Carbon Express", "Carbon", &[530.0, 600.0, 700.0], 8.0, 0.246)]);
        let mut bow = BowConfiguration::new(35.0, 28.0, BowType::Recurve);
        bow.release_type = ReleaseType::Finger;
        let mut request = MatchRequest::new(bow, 30.0);
        request.point_weight = 125.0;

        let matches = e.find_matching_arrows(&request);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_spine, 530.0);
        let issues = &matches[0].potential_issues;
        assert!(issues.iter().any(|i| i.starts_with("Moderate spine deviation")));
        assert!(!issues.iter().any(|i| i.starts_with("Large spine deviation")));
    }

    #[test]
    fn test_foc_range_scoring() {
        let e = engine(vec![record(1, "Gold Tip", "Carbon", &[275.0, 300.0, 340.0], 9.0, 0.246)]);
        let mut request = compound_request();
        request.target_foc_range = Some((30.0, 35.0));
        let penalised = e.find_matching_arrows(&request);
        request.target_foc_range = Some((0.0, 35.0));
        let ideal = e.find_matching_arrows(&request);
        assert!(ideal[0].match_score > penalised[0].match_score);
    }
}
