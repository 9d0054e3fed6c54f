//! # Arrow Tuning Engine
//!
//! Spine selection, arrow matching and arrow flight simulation for archery setups.
//!
//! Three engines share the value types in [`bow`]:
//! - [`SpineCalculator`] recommends a static spine (and FOC) for a bow and arrow build
//! - [`ArrowMatchingEngine`] ranks catalog arrows against that recommendation
//! - [`BallisticsCalculator`] simulates flight and derives energy and penetration metrics

// Re-export the main types and functions
pub use atmosphere::{calculate_air_density, EnvironmentalConditions};
pub use ballistics::{
    BallisticsCalculator, BroadheadComparison, BroadheadDistanceComparison, EnhancedTrajectoryReport,
    TrajectoryReport,
};
pub use bow::{
    ArrowBuild, ArrowMaterial, ArrowRestType, BowConfiguration, BowType, CamType, LimbType, ReleaseType,
};
pub use broadhead::{BladeProfile, BroadheadSpec, PointType};
pub use catalog::{ArrowCatalog, ArrowCatalogRecord, CatalogQuery, CatalogSummary, InMemoryCatalog, SpineSpecification};
pub use chart::{ChartLookup, SpineChart};
pub use config::{BallisticsSettings, EngineConfig, MatchingSettings, ScoringWeights};
pub use drag::ArrowType;
pub use error::{EngineError, Result};
pub use foc::{
    calculate_enhanced_foc, calculate_foc, optimize_point_weight, ArrowComponents, EnhancedFocResult, FocResult,
    UseCase,
};
pub use matching::{ArrowMatch, ArrowMatchingEngine, MatchRequest};
pub use paradox::{ArrowParadoxParameters, ParadoxAnalysis};
pub use performance::{KineticEnergy, PenetrationCategory, PenetrationPotential};
pub use spine::{Confidence, SpineCalculator, SpineRange, SpineResult, SpineUnits};
pub use spine_charts::SpineCharts;
pub use trajectory::{ShootingConditions, TerminationReason, TrajectoryPoint};
pub use wind::WindSegment;

// Module declarations
pub mod atmosphere;
pub mod ballistics;
pub mod bow;
pub mod broadhead;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod constants;
pub mod drag;
mod error;
pub mod foc;
pub mod matching;
pub mod paradox;
pub mod performance;
pub mod spine;
pub mod spine_charts;
pub mod trajectory;
pub mod wind;
