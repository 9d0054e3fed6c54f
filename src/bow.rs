//! Bow and arrow-build descriptions consumed by the spine and matching engines.
//!
//! String-facing helpers (`parse`) never fail: unrecognised values fall back to
//! the documented default variant so callers can pass raw form input through.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FLETCHING_WEIGHT, DEFAULT_IBO_SPEED, DEFAULT_INSERT_WEIGHT, DEFAULT_NOCK_WEIGHT,
    DEFAULT_POINT_WEIGHT, STANDARD_CENTER_SHOT_IN,
};

/// Bow families with distinct spine methodologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BowType {
    #[default]
    Compound,
    Recurve,
    #[serde(alias = "longbow")]
    Traditional,
}

impl BowType {
    /// Lenient parse; `longbow` is treated as traditional, unknown values as compound.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "recurve" => BowType::Recurve,
            "traditional" | "longbow" => BowType::Traditional,
            _ => BowType::Compound,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BowType::Compound => "compound",
            BowType::Recurve => "recurve",
            BowType::Traditional => "traditional",
        }
    }
}

impl std::fmt::Display for BowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compound cam aggressiveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CamType {
    Soft,
    #[default]
    Medium,
    Hard,
}

impl CamType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "soft" => CamType::Soft,
            "hard" => CamType::Hard,
            _ => CamType::Medium,
        }
    }

    /// Spine offset: positive values call for a stiffer (lower-numbered) shaft
    pub fn spine_offset(&self) -> f64 {
        match self {
            CamType::Soft => -10.0,
            CamType::Medium => 0.0,
            CamType::Hard => 10.0,
        }
    }
}

/// Arrow rest styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrowRestType {
    #[default]
    DropAway,
    Blade,
    WhiskerBiscuit,
    FullContainment,
    Shelf,
}

impl ArrowRestType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "blade" => ArrowRestType::Blade,
            "whisker_biscuit" => ArrowRestType::WhiskerBiscuit,
            "full_containment" => ArrowRestType::FullContainment,
            "shelf" => ArrowRestType::Shelf,
            _ => ArrowRestType::DropAway,
        }
    }

    /// Compound spine offset for contact rests
    pub fn spine_offset(&self) -> f64 {
        match self {
            ArrowRestType::DropAway => 0.0,
            ArrowRestType::Blade => 10.0,
            ArrowRestType::WhiskerBiscuit => 20.0,
            ArrowRestType::FullContainment => 15.0,
            ArrowRestType::Shelf => 0.0,
        }
    }
}

/// Release aid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    #[default]
    Mechanical,
    Finger,
}

impl ReleaseType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "finger" | "fingers" => ReleaseType::Finger,
            _ => ReleaseType::Mechanical,
        }
    }
}

/// Recurve limb construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LimbType {
    Wood,
    #[default]
    Fiberglass,
    Carbon,
    FoamCore,
}

impl LimbType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "wood" => LimbType::Wood,
            "carbon" => LimbType::Carbon,
            "foam" | "foam_core" => LimbType::FoamCore,
            _ => LimbType::Fiberglass,
        }
    }

    /// Effective draw-weight adjustment in lbf; faster limbs load the shaft harder
    pub fn weight_adjustment(&self) -> f64 {
        match self {
            LimbType::Wood => -2.0,
            LimbType::Fiberglass => 0.0,
            LimbType::Carbon => 3.0,
            LimbType::FoamCore => 2.0,
        }
    }
}

/// Shaft materials known to the engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowMaterial {
    Carbon,
    Aluminum,
    CarbonAluminum,
    Wood,
    Fiberglass,
}

impl ArrowMaterial {
    /// Lenient parse; returns `None` for an empty or unknown preference
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['/', ' ', '_'], "-").as_str() {
            "carbon" => Some(ArrowMaterial::Carbon),
            "aluminum" | "aluminium" => Some(ArrowMaterial::Aluminum),
            "carbon-aluminum" | "carbon--aluminum" | "carbon---aluminum" => {
                Some(ArrowMaterial::CarbonAluminum)
            }
            "wood" => Some(ArrowMaterial::Wood),
            "fiberglass" => Some(ArrowMaterial::Fiberglass),
            _ => None,
        }
    }

    /// Material label as stored in manufacturer catalogs
    pub fn catalog_name(&self) -> &'static str {
        match self {
            ArrowMaterial::Carbon => "Carbon",
            ArrowMaterial::Aluminum => "Aluminum",
            ArrowMaterial::CarbonAluminum => "Carbon / Aluminum",
            ArrowMaterial::Wood => "Wood",
            ArrowMaterial::Fiberglass => "Fiberglass",
        }
    }

    pub fn is_wood(&self) -> bool {
        matches!(self, ArrowMaterial::Wood)
    }
}

/// Bow setup used for one calculation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowConfiguration {
    /// Marked draw weight (lbf)
    pub draw_weight: f64,
    /// Draw length (inches); informational, not used in spine math
    pub draw_length: f64,
    pub bow_type: BowType,
    pub cam_type: CamType,
    /// Centre-shot distance (inches)
    pub center_shot: f64,
    pub arrow_rest_type: ArrowRestType,
    /// IBO speed rating (fps)
    pub ibo_speed: f64,
    pub release_type: ReleaseType,
    pub limb_type: LimbType,
}

impl Default for BowConfiguration {
    fn default() -> Self {
        Self {
            draw_weight: 60.0,
            draw_length: 28.0,
            bow_type: BowType::Compound,
            cam_type: CamType::Medium,
            center_shot: STANDARD_CENTER_SHOT_IN,
            arrow_rest_type: ArrowRestType::DropAway,
            ibo_speed: DEFAULT_IBO_SPEED,
            release_type: ReleaseType::Mechanical,
            limb_type: LimbType::Fiberglass,
        }
    }
}

impl BowConfiguration {
    /// Bow with the given draw and type, everything else at defaults
    pub fn new(draw_weight: f64, draw_length: f64, bow_type: BowType) -> Self {
        Self { draw_weight, draw_length, bow_type, ..Default::default() }
    }
}

/// Arrow build parameters for a spine calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowBuild {
    /// Arrow length (inches)
    pub arrow_length: f64,
    /// Component weights (grains)
    pub point_weight: f64,
    pub nock_weight: f64,
    pub fletching_weight: f64,
    pub insert_weight: f64,
    pub material_preference: Option<ArrowMaterial>,
}

impl Default for ArrowBuild {
    fn default() -> Self {
        Self {
            arrow_length: 29.0,
            point_weight: DEFAULT_POINT_WEIGHT,
            nock_weight: DEFAULT_NOCK_WEIGHT,
            fletching_weight: DEFAULT_FLETCHING_WEIGHT,
            insert_weight: DEFAULT_INSERT_WEIGHT,
            material_preference: None,
        }
    }
}

impl ArrowBuild {
    pub fn new(arrow_length: f64, point_weight: f64) -> Self {
        Self { arrow_length, point_weight, ..Default::default() }
    }

    pub fn is_wood(&self) -> bool {
        self.material_preference.is_some_and(|m| m.is_wood())
    }
}
