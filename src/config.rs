//! Engine configuration.
//!
//! All sections are optional in TOML; anything missing takes the defaults
//! below.
//!
//! ```toml
//! [scoring]
//! spine_accuracy = 0.5
//! availability = 0.1
//! manufacturer_preference = 0.1
//! diameter_fit = 0.15
//! foc_fit = 0.15
//!
//! [matching]
//! numeric_expansion = 60.0
//!
//! [ballistics]
//! enhanced_time_step = 0.002
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the five match-score criteria.
///
/// Immutable once built; every weight is finite and non-negative and the set
/// sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoringWeights", into = "RawScoringWeights")]
pub struct ScoringWeights {
    spine_accuracy: f64,
    availability: f64,
    manufacturer_preference: f64,
    diameter_fit: f64,
    foc_fit: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawScoringWeights {
    #[serde(default = "default_spine_weight")]
    spine_accuracy: f64,
    #[serde(default = "default_availability_weight")]
    availability: f64,
    #[serde(default = "default_manufacturer_weight")]
    manufacturer_preference: f64,
    #[serde(default = "default_diameter_weight")]
    diameter_fit: f64,
    #[serde(default = "default_foc_weight")]
    foc_fit: f64,
}

fn default_spine_weight() -> f64 {
    0.40
}
fn default_availability_weight() -> f64 {
    0.20
}
fn default_manufacturer_weight() -> f64 {
    0.10
}
fn default_diameter_weight() -> f64 {
    0.15
}
fn default_foc_weight() -> f64 {
    0.15
}

impl TryFrom<RawScoringWeights> for ScoringWeights {
    type Error = EngineError;

    fn try_from(raw: RawScoringWeights) -> Result<Self> {
        ScoringWeights::new(
            raw.spine_accuracy,
            raw.availability,
            raw.manufacturer_preference,
            raw.diameter_fit,
            raw.foc_fit,
        )
    }
}

impl From<ScoringWeights> for RawScoringWeights {
    fn from(w: ScoringWeights) -> Self {
        RawScoringWeights {
            spine_accuracy: w.spine_accuracy,
            availability: w.availability,
            manufacturer_preference: w.manufacturer_preference,
            diameter_fit: w.diameter_fit,
            foc_fit: w.foc_fit,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            spine_accuracy: default_spine_weight(),
            availability: default_availability_weight(),
            manufacturer_preference: default_manufacturer_weight(),
            diameter_fit: default_diameter_weight(),
            foc_fit: default_foc_weight(),
        }
    }
}

impl ScoringWeights {
    /// Validate and build a weight set
    pub fn new(
        spine_accuracy: f64,
        availability: f64,
        manufacturer_preference: f64,
        diameter_fit: f64,
        foc_fit: f64,
    ) -> Result<Self> {
        let named = [
            ("spine_accuracy", spine_accuracy),
            ("availability", availability),
            ("manufacturer_preference", manufacturer_preference),
            ("diameter_fit", diameter_fit),
            ("foc_fit", foc_fit),
        ];
        for (criterion, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::NegativeWeight { criterion, value });
            }
        }
        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights { sum });
        }
        Ok(Self { spine_accuracy, availability, manufacturer_preference, diameter_fit, foc_fit })
    }

    pub fn spine_accuracy(&self) -> f64 {
        self.spine_accuracy
    }
    pub fn availability(&self) -> f64 {
        self.availability
    }
    pub fn manufacturer_preference(&self) -> f64 {
        self.manufacturer_preference
    }
    pub fn diameter_fit(&self) -> f64 {
        self.diameter_fit
    }
    pub fn foc_fit(&self) -> f64 {
        self.foc_fit
    }
}

/// Candidate search and ranking knobs for the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Search expansion beyond the spine range for wood arrows (lbf)
    #[serde(default = "default_wood_expansion")]
    pub wood_expansion: f64,
    /// Search expansion beyond the spine range for numeric spines
    #[serde(default = "default_numeric_expansion")]
    pub numeric_expansion: f64,
    /// Spine options a wood arrow must offer on the first pass
    #[serde(default = "default_wood_min_spine_options")]
    pub wood_min_spine_options: usize,
    /// Spine-option count that earns a full availability score
    #[serde(default = "default_availability_saturation")]
    pub availability_saturation: usize,
    /// Entries admitted per manufacturer during the diversity pass
    #[serde(default = "default_diversity_cap")]
    pub diversity_cap_per_manufacturer: usize,
    /// Minimum score for the diversity pass
    #[serde(default = "default_diversity_threshold")]
    pub diversity_score_threshold: f64,
    /// Catalog summaries fetched per requested result
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
}

fn default_wood_expansion() -> f64 {
    5.0
}
fn default_numeric_expansion() -> f64 {
    50.0
}
fn default_wood_min_spine_options() -> usize {
    2
}
fn default_availability_saturation() -> usize {
    8
}
fn default_diversity_cap() -> usize {
    3
}
fn default_diversity_threshold() -> f64 {
    85.0
}
fn default_candidate_multiplier() -> usize {
    10
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            wood_expansion: default_wood_expansion(),
            numeric_expansion: default_numeric_expansion(),
            wood_min_spine_options: default_wood_min_spine_options(),
            availability_saturation: default_availability_saturation(),
            diversity_cap_per_manufacturer: default_diversity_cap(),
            diversity_score_threshold: default_diversity_threshold(),
            candidate_multiplier: default_candidate_multiplier(),
        }
    }
}

impl MatchingSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.wood_expansion >= 0.0 && self.numeric_expansion >= 0.0) {
            return Err(EngineError::InvalidSetting("search expansions must be non-negative".into()));
        }
        if self.availability_saturation == 0 || self.candidate_multiplier == 0 {
            return Err(EngineError::InvalidSetting(
                "availability_saturation and candidate_multiplier must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.diversity_score_threshold) {
            return Err(EngineError::InvalidSetting(format!(
                "diversity_score_threshold must be within 0-100 (got {})",
                self.diversity_score_threshold
            )));
        }
        Ok(())
    }
}

/// Integrator settings for the trajectory simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallisticsSettings {
    /// Basic-mode step (s)
    #[serde(default = "default_basic_time_step")]
    pub basic_time_step: f64,
    /// Basic-mode time cap (s)
    #[serde(default = "default_basic_max_time")]
    pub basic_max_time: f64,
    #[serde(default = "default_enhanced_time_step")]
    pub enhanced_time_step: f64,
    #[serde(default = "default_enhanced_max_time")]
    pub enhanced_max_time: f64,
    /// Height below the line of sight at which flight ends (ft, negative)
    #[serde(default = "default_ground_threshold")]
    pub ground_threshold_ft: f64,
}

fn default_basic_time_step() -> f64 {
    0.01
}
fn default_basic_max_time() -> f64 {
    10.0
}
fn default_enhanced_time_step() -> f64 {
    0.001
}
fn default_enhanced_max_time() -> f64 {
    30.0
}
fn default_ground_threshold() -> f64 {
    -10.0
}

impl Default for BallisticsSettings {
    fn default() -> Self {
        Self {
            basic_time_step: default_basic_time_step(),
            basic_max_time: default_basic_max_time(),
            enhanced_time_step: default_enhanced_time_step(),
            enhanced_max_time: default_enhanced_max_time(),
            ground_threshold_ft: default_ground_threshold(),
        }
    }
}

impl BallisticsSettings {
    pub fn validate(&self) -> Result<()> {
        for (name, step, cap) in [
            ("basic", self.basic_time_step, self.basic_max_time),
            ("enhanced", self.enhanced_time_step, self.enhanced_max_time),
        ] {
            if !(step > 0.0 && step.is_finite() && cap > 0.0 && cap.is_finite()) {
                return Err(EngineError::InvalidSetting(format!(
                    "{} time step and cap must be positive and finite",
                    name
                )));
            }
            if step > cap {
                return Err(EngineError::InvalidSetting(format!(
                    "{} time step exceeds its time cap",
                    name
                )));
            }
        }
        if !(self.ground_threshold_ft < 0.0) {
            return Err(EngineError::InvalidSetting("ground_threshold_ft must be negative".into()));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub ballistics: BallisticsSettings,
}

impl EngineConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;
        self.ballistics.validate()
    }
}
