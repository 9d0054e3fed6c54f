//! Two-axis spine reference tables.
//!
//! A [`SpineChart`] is keyed by draw weight (rows) and arrow length (columns).
//! Both axes are stored sorted ascending. Lookups bracket each axis with a
//! binary search, clamp values outside the chart to the nearest edge bucket,
//! and interpolate linearly: first along the weight axis for each of the two
//! bracketing length columns, then along the length axis.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_DIVISION_THRESHOLD;
use crate::error::{EngineError, Result};

/// Result of a chart lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLookup {
    /// Interpolated chart value
    pub value: f64,
    /// True when either input lay outside the chart and was clamped
    pub clamped: bool,
}

/// Position of a query value on one chart axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisPosition {
    lower: usize,
    upper: usize,
    fraction: f64,
    clamped: bool,
}

/// Locate `x` on a sorted axis.
///
/// Returns the bracketing indices and the interpolation fraction between them.
/// Values beyond either end collapse onto the edge key.
fn locate(axis: &[f64], x: f64) -> AxisPosition {
    let n = axis.len();
    if n == 1 || x.is_nan() {
        return AxisPosition { lower: 0, upper: 0, fraction: 0.0, clamped: x.is_nan() || x != axis[0] };
    }
    if x <= axis[0] {
        return AxisPosition { lower: 0, upper: 0, fraction: 0.0, clamped: x < axis[0] };
    }
    if x >= axis[n - 1] {
        return AxisPosition { lower: n - 1, upper: n - 1, fraction: 0.0, clamped: x > axis[n - 1] };
    }

    match axis.binary_search_by(|k| k.total_cmp(&x)) {
        Ok(idx) => AxisPosition { lower: idx, upper: idx, fraction: 0.0, clamped: false },
        Err(idx) => {
            // axis[idx - 1] < x < axis[idx]
            let x0 = axis[idx - 1];
            let x1 = axis[idx];
            let span = x1 - x0;
            let fraction = if span.abs() < MIN_DIVISION_THRESHOLD { 0.0 } else { (x - x0) / span };
            AxisPosition { lower: idx - 1, upper: idx, fraction, clamped: false }
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Spine reference chart keyed by draw weight and arrow length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineChart {
    /// Draw weight keys in lbf, ascending
    pub weights: Vec<f64>,
    /// Arrow length keys in inches, ascending
    pub lengths: Vec<f64>,
    /// `values[w][l]` is the chart entry for `weights[w]`, `lengths[l]`
    pub values: Vec<Vec<f64>>,
}

impl SpineChart {
    /// Build and validate a chart.
    pub fn new(weights: Vec<f64>, lengths: Vec<f64>, values: Vec<Vec<f64>>) -> Result<Self> {
        let chart = Self { weights, lengths, values };
        chart.validate()?;
        Ok(chart)
    }

    /// Build a chart from literal rows of `(draw_weight, [value per length])`.
    ///
    /// Used for the compiled-in calibration tables. Panics only on malformed
    /// literal data, which the unit tests cover.
    pub(crate) fn from_rows(lengths: &[f64], rows: &[(f64, &[f64])]) -> Self {
        let chart = Self {
            weights: rows.iter().map(|(w, _)| *w).collect(),
            lengths: lengths.to_vec(),
            values: rows.iter().map(|(_, vals)| vals.to_vec()).collect(),
        };
        debug_assert!(chart.validate().is_ok(), "malformed built-in spine chart");
        chart
    }

    /// Check shape, ordering and value sanity.
    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() || self.lengths.is_empty() {
            return Err(EngineError::InvalidChart("chart axes must not be empty".into()));
        }
        if self.values.len() != self.weights.len() {
            return Err(EngineError::InvalidChart(format!(
                "expected {} rows, found {}",
                self.weights.len(),
                self.values.len()
            )));
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.lengths.len() {
                return Err(EngineError::InvalidChart(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    self.lengths.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(EngineError::InvalidChart(format!(
                    "row {} contains a non-positive or non-finite value",
                    i
                )));
            }
        }
        for (name, axis) in [("weight", &self.weights), ("length", &self.lengths)] {
            if axis.iter().any(|v| !v.is_finite()) || axis.windows(2).any(|w| w[0] >= w[1]) {
                return Err(EngineError::InvalidChart(format!(
                    "{} axis must be finite and strictly ascending",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Interpolated chart value for a draw weight and arrow length.
    pub fn lookup(&self, draw_weight: f64, arrow_length: f64) -> ChartLookup {
        let w = locate(&self.weights, draw_weight);
        let l = locate(&self.lengths, arrow_length);

        // Weight axis first, once per bracketing length column
        let at_lower_length = lerp(
            self.values[w.lower][l.lower],
            self.values[w.upper][l.lower],
            w.fraction,
        );
        let at_upper_length = lerp(
            self.values[w.lower][l.upper],
            self.values[w.upper][l.upper],
            w.fraction,
        );

        ChartLookup {
            value: lerp(at_lower_length, at_upper_length, l.fraction),
            clamped: w.clamped || l.clamped,
        }
    }

    /// Inclusive draw-weight domain covered by the chart
    pub fn weight_domain(&self) -> (f64, f64) {
        (self.weights[0], self.weights[self.weights.len() - 1])
    }

    /// Inclusive arrow-length domain covered by the chart
    pub fn length_domain(&self) -> (f64, f64) {
        (self.lengths[0], self.lengths[self.lengths.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_chart() -> SpineChart {
        SpineChart::from_rows(
            &[26.0, 28.0, 30.0],
            &[
                (50.0, &[500.0, 400.0, 340.0]),
                (60.0, &[400.0, 340.0, 300.0]),
                (70.0, &[340.0, 300.0, 250.0]),
            ],
        )
    }

    #[test]
    fn test_exact_key_hit() {
        let chart = small_chart();
        let hit = chart.lookup(60.0, 28.0);
        assert_eq!(hit.value, 340.0);
        assert!(!hit.clamped);
    }

    #[test]
    fn test_weight_axis_interpolation() {
        let chart = small_chart();
        // Halfway between 50 and 60 at 26": 500 -> 400
        let mid = chart.lookup(55.0, 26.0);
        assert!((mid.value - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_axis_interpolation() {
        let chart = small_chart();
        // 70# between 28" (300) and 30" (250)
        let mid = chart.lookup(70.0, 29.0);
        assert!((mid.value - 275.0).abs() < 1e-9);
    }

    #[test]
    fn test_bilinear_interpolation() {
        let chart = small_chart();
        // (55, 27): weight axis gives 450 at 26" and 370 at 28", then 410
        let v = chart.lookup(55.0, 27.0);
        assert!((v.value - 410.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let chart = small_chart();
        let heavy = chart.lookup(90.0, 28.0);
        assert_eq!(heavy.value, 300.0);
        assert!(heavy.clamped);

        let short = chart.lookup(60.0, 20.0);
        assert_eq!(short.value, 400.0);
        assert!(short.clamped);
    }

    #[test]
    fn test_nan_input_is_clamped() {
        let chart = small_chart();
        let v = chart.lookup(f64::NAN, 28.0);
        assert!(v.value.is_finite());
        assert!(v.clamped);
    }

    #[test]
    fn test_validate_rejects_unsorted_axis() {
        let err = SpineChart::new(
            vec![60.0, 50.0],
            vec![28.0],
            vec![vec![340.0], vec![400.0]],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let err = SpineChart::new(
            vec![50.0, 60.0],
            vec![28.0, 29.0],
            vec![vec![400.0, 400.0], vec![340.0]],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        let err = SpineChart::new(vec![50.0], vec![28.0], vec![vec![0.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_domains() {
        let chart = small_chart();
        assert_eq!(chart.weight_domain(), (50.0, 70.0));
        assert_eq!(chart.length_domain(), (26.0, 30.0));
    }
}
