//! Spine calibration data.
//!
//! The literal values below are empirical reference charts (manufacturer and
//! traditional wood-arrow charts), not physics-derived constants. They are kept
//! apart from the interpolation code in [`crate::chart`] so that either can be
//! replaced or re-validated independently.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::chart::SpineChart;
use crate::error::Result;

const COMPOUND_LENGTHS: [f64; 7] = [26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0];

/// Compound chart: carbon spine numbers
static COMPOUND_ROWS: &[(f64, &[f64])] = &[
    (40.0, &[600.0, 600.0, 500.0, 500.0, 400.0, 400.0, 340.0]),
    (45.0, &[600.0, 500.0, 500.0, 400.0, 400.0, 340.0, 340.0]),
    (50.0, &[500.0, 500.0, 400.0, 400.0, 340.0, 340.0, 300.0]),
    (55.0, &[500.0, 400.0, 400.0, 340.0, 340.0, 300.0, 300.0]),
    (60.0, &[400.0, 400.0, 340.0, 340.0, 300.0, 300.0, 250.0]),
    (65.0, &[400.0, 340.0, 340.0, 300.0, 300.0, 250.0, 250.0]),
    (70.0, &[340.0, 340.0, 300.0, 300.0, 250.0, 250.0, 200.0]),
    (75.0, &[340.0, 300.0, 300.0, 250.0, 250.0, 200.0, 200.0]),
    (80.0, &[300.0, 300.0, 250.0, 250.0, 200.0, 200.0, 200.0]),
];

const RECURVE_LENGTHS: [f64; 9] = [24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0];

/// Recurve chart: carbon spine numbers at the archer's effective bow weight
static RECURVE_ROWS: &[(f64, &[f64])] = &[
    (20.0, &[2000.0, 1900.0, 1800.0, 1700.0, 1600.0, 1500.0, 1400.0, 1300.0, 1200.0]),
    (25.0, &[1800.0, 1700.0, 1600.0, 1500.0, 1400.0, 1300.0, 1200.0, 1100.0, 1000.0]),
    (30.0, &[1400.0, 1300.0, 1200.0, 1100.0, 1000.0, 900.0, 800.0, 750.0, 700.0]),
    (35.0, &[1000.0, 900.0, 800.0, 750.0, 700.0, 650.0, 600.0, 550.0, 500.0]),
    (40.0, &[800.0, 750.0, 700.0, 650.0, 600.0, 550.0, 500.0, 450.0, 400.0]),
    (45.0, &[700.0, 650.0, 600.0, 550.0, 500.0, 450.0, 400.0, 370.0, 340.0]),
    (50.0, &[600.0, 550.0, 500.0, 450.0, 400.0, 370.0, 340.0, 320.0, 300.0]),
    (55.0, &[500.0, 450.0, 400.0, 370.0, 340.0, 320.0, 300.0, 280.0, 260.0]),
    (60.0, &[450.0, 400.0, 370.0, 340.0, 320.0, 300.0, 280.0, 260.0, 240.0]),
    (65.0, &[400.0, 370.0, 340.0, 320.0, 300.0, 280.0, 260.0, 240.0, 220.0]),
    (70.0, &[370.0, 340.0, 320.0, 300.0, 280.0, 260.0, 240.0, 220.0, 200.0]),
];

const WOOD_LENGTHS: [f64; 7] = [26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0];

/// Traditional wood-arrow chart: spine in pounds (mid-point of each chart band)
static WOOD_ROWS: &[(f64, &[f64])] = &[
    (30.0, &[32.5, 32.5, 35.0, 37.5, 42.5, 47.5, 47.5]),
    (35.0, &[35.0, 35.0, 37.5, 42.5, 47.5, 52.5, 52.5]),
    (40.0, &[37.5, 37.5, 42.5, 47.5, 52.5, 57.5, 62.5]),
    (45.0, &[42.5, 42.5, 47.5, 52.5, 57.5, 62.5, 67.5]),
    (50.0, &[47.5, 47.5, 52.5, 57.5, 62.5, 67.5, 77.5]),
    (55.0, &[52.5, 52.5, 57.5, 62.5, 67.5, 72.5, 77.5]),
    (60.0, &[57.5, 57.5, 62.5, 67.5, 72.5, 77.5, 82.5]),
    (65.0, &[62.5, 62.5, 67.5, 72.5, 77.5, 82.5, 87.5]),
];

/// Wood pound rating to carbon spine number: `carbon = 950 - 9 × wood`.
///
/// Empirical fit (35# ≈ 600, 50# ≈ 450, 65# ≈ 350); awaiting expert
/// re-validation. Never returns less than [`WOOD_TO_CARBON_FLOOR`].
pub const WOOD_TO_CARBON_INTERCEPT: f64 = 950.0;
pub const WOOD_TO_CARBON_SLOPE: f64 = 9.0;
pub const WOOD_TO_CARBON_FLOOR: f64 = 300.0;

/// Convert a wood spine (pounds) to its carbon-number equivalent
pub fn wood_to_carbon_spine(wood_spine_lbs: f64) -> f64 {
    (WOOD_TO_CARBON_INTERCEPT - wood_spine_lbs * WOOD_TO_CARBON_SLOPE).max(WOOD_TO_CARBON_FLOOR)
}

/// Full set of calibration charts used by the spine calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineCharts {
    pub compound: SpineChart,
    pub recurve: SpineChart,
    pub wood: SpineChart,
}

static STANDARD_CHARTS: Lazy<Arc<SpineCharts>> = Lazy::new(|| {
    Arc::new(SpineCharts {
        compound: SpineChart::from_rows(&COMPOUND_LENGTHS, COMPOUND_ROWS),
        recurve: SpineChart::from_rows(&RECURVE_LENGTHS, RECURVE_ROWS),
        wood: SpineChart::from_rows(&WOOD_LENGTHS, WOOD_ROWS),
    })
});

impl SpineCharts {
    /// Shared handle to the built-in reference charts
    pub fn standard() -> Arc<SpineCharts> {
        Arc::clone(&STANDARD_CHARTS)
    }

    /// Parse a calibration set from TOML and validate every chart.
    ///
    /// ```toml
    /// [compound]
    /// weights = [50.0, 60.0]
    /// lengths = [28.0, 30.0]
    /// values = [[400.0, 340.0], [340.0, 300.0]]
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let charts: SpineCharts = toml::from_str(contents)?;
        charts.validate()?;
        Ok(charts)
    }

    /// Load a calibration set from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate all charts
    pub fn validate(&self) -> Result<()> {
        self.compound.validate()?;
        self.recurve.validate()?;
        self.wood.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_non_increasing(chart: &SpineChart) {
        for row in &chart.values {
            assert!(row.windows(2).all(|w| w[0] >= w[1]), "row not non-increasing: {:?}", row);
        }
        for col in 0..chart.lengths.len() {
            let column: Vec<f64> = chart.values.iter().map(|r| r[col]).collect();
            assert!(column.windows(2).all(|w| w[0] >= w[1]), "column not non-increasing: {:?}", column);
        }
    }

    #[test]
    fn test_standard_charts_are_valid() {
        let charts = SpineCharts::standard();
        assert!(charts.validate().is_ok());
    }

    #[test]
    fn test_carbon_charts_stiffen_with_weight_and_length() {
        let charts = SpineCharts::standard();
        assert_non_increasing(&charts.compound);
        assert_non_increasing(&charts.recurve);
    }

    #[test]
    fn test_wood_chart_rises_with_weight_and_length() {
        let charts = SpineCharts::standard();
        for row in &charts.wood.values {
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
        }
        for col in 0..charts.wood.lengths.len() {
            let column: Vec<f64> = charts.wood.values.iter().map(|r| r[col]).collect();
            assert!(column.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_wood_to_carbon_conversion() {
        assert_eq!(wood_to_carbon_spine(35.0), 635.0);
        assert_eq!(wood_to_carbon_spine(50.0), 500.0);
        // Floor for very heavy wood ratings
        assert_eq!(wood_to_carbon_spine(80.0), 300.0);
    }

    #[test]
    fn test_standard_handle_is_shared() {
        let a = SpineCharts::standard();
        let b = SpineCharts::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_from_toml_roundtrip() {
        let charts = SpineCharts::standard();
        let text = toml::to_string(&*charts).expect("serialize charts");
        let parsed = SpineCharts::from_toml_str(&text).expect("parse charts");
        assert_eq!(parsed, *charts);
    }

    #[test]
    fn test_from_toml_rejects_bad_chart() {
        let text = r#"
            [compound]
            weights = [60.0, 50.0]
            lengths = [28.0]
            values = [[340.0], [400.0]]

            [recurve]
            weights = [40.0]
            lengths = [28.0]
            values = [[600.0]]

            [wood]
            weights = [40.0]
            lengths = [28.0]
            values = [[42.5]]
        "#;
        assert!(SpineCharts::from_toml_str(text).is_err());
    }
}
