//! Arrow paradox model.
//!
//! The shaft flexes around the riser on release and keeps oscillating as a
//! damped wave for the first part of the flight. The model reduces that to
//! four effects used by the enhanced trajectory: a launch velocity loss, a
//! small launch-angle bias, extra drag (shaft material, rest contact and
//! oscillation turbulence) and a decaying amplitude envelope that scales drag
//! and wind sensitivity while it lasts.

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use crate::bow::{ArrowMaterial, ArrowRestType};
use crate::constants::{DEFAULT_ARROW_DIAMETER_IN, STANDARD_CENTER_SHOT_IN};
use crate::drag::{material_roughness_factor, oscillation_turbulence_factor, rest_turbulence_factor};

const MAX_VELOCITY_LOSS: f64 = 0.05;
const VELOCITY_LOSS_PER_MISMATCH: f64 = 0.10;
const LAUNCH_BIAS_PER_MISMATCH_DEG: f64 = 0.25;
const LAUNCH_BIAS_PER_NOCK_INCH_DEG: f64 = 0.1;
const MAX_LAUNCH_BIAS_DEG: f64 = 0.5;

/// Amplitude of a perfectly tuned arrow (inches)
const BASE_AMPLITUDE_IN: f64 = 0.25;
const AMPLITUDE_PER_MISMATCH_IN: f64 = 2.0;
const REFERENCE_SHAFT_LENGTH_IN: f64 = 29.0;

/// Drag increase per inch of oscillation amplitude
pub const OSCILLATION_DRAG_GAIN: f64 = 0.2;
/// Crosswind sensitivity increase per inch of oscillation amplitude
pub const OSCILLATION_WIND_GAIN: f64 = 0.5;

/// Shaft and setup parameters driving the paradox model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowParadoxParameters {
    pub static_spine: f64,
    /// 1.0 is matched; above 1.0 the shaft flexes more than the bow needs
    /// (weak), below 1.0 it is stiff
    pub dynamic_spine_factor: f64,
    pub shaft_material: ArrowMaterial,
    pub shaft_length: f64,
    /// Used when the caller does not supply a diameter (inches)
    pub shaft_diameter: f64,
    /// Nocking point above square (inches)
    pub nocking_point_height: f64,
    pub bow_centershot: f64,
    pub arrow_rest_type: ArrowRestType,
    pub oscillation_frequency: f64,
    /// Exponential damping rate of the oscillation (1/s)
    pub dampening_factor: f64,
}

impl Default for ArrowParadoxParameters {
    fn default() -> Self {
        Self {
            static_spine: 400.0,
            dynamic_spine_factor: 1.0,
            shaft_material: ArrowMaterial::Carbon,
            shaft_length: REFERENCE_SHAFT_LENGTH_IN,
            shaft_diameter: DEFAULT_ARROW_DIAMETER_IN,
            nocking_point_height: 0.0,
            bow_centershot: STANDARD_CENTER_SHOT_IN,
            arrow_rest_type: ArrowRestType::DropAway,
            oscillation_frequency: 25.0,
            dampening_factor: 8.0,
        }
    }
}

/// Decaying oscillation amplitude `A0·e^(−ζt)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillationEnvelope {
    pub initial_amplitude_inches: f64,
    pub damping_per_second: f64,
}

impl OscillationEnvelope {
    /// Amplitude at time `t` (inches)
    pub fn amplitude(&self, t: f64) -> f64 {
        self.initial_amplitude_inches * (-self.damping_per_second * t.max(0.0)).exp()
    }

    /// Time for the amplitude to halve; infinite when undamped
    pub fn half_life(&self) -> f64 {
        if self.damping_per_second > 0.0 {
            LN_2 / self.damping_per_second
        } else {
            f64::INFINITY
        }
    }

    pub fn drag_gain(&self, t: f64) -> f64 {
        1.0 + OSCILLATION_DRAG_GAIN * self.amplitude(t)
    }

    pub fn wind_gain(&self, t: f64) -> f64 {
        1.0 + OSCILLATION_WIND_GAIN * self.amplitude(t)
    }
}

/// Launch effects derived from [`ArrowParadoxParameters`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParadoxEffects {
    /// Fraction of launch speed lost (0-0.05)
    pub velocity_loss: f64,
    pub launch_bias_degrees: f64,
    /// Material × rest × oscillation turbulence
    pub drag_multiplier: f64,
    pub envelope: OscillationEnvelope,
}

impl ArrowParadoxParameters {
    fn spine_mismatch(&self) -> f64 {
        (self.dynamic_spine_factor - 1.0).abs()
    }

    fn centershot_offset(&self) -> f64 {
        (self.bow_centershot - STANDARD_CENTER_SHOT_IN).abs()
    }

    pub fn effects(&self) -> ParadoxEffects {
        let mismatch = self.spine_mismatch();
        let velocity_loss = (mismatch * VELOCITY_LOSS_PER_MISMATCH).min(MAX_VELOCITY_LOSS);

        let launch_bias_degrees = ((self.dynamic_spine_factor - 1.0) * LAUNCH_BIAS_PER_MISMATCH_DEG
            + self.nocking_point_height * LAUNCH_BIAS_PER_NOCK_INCH_DEG)
            .clamp(-MAX_LAUNCH_BIAS_DEG, MAX_LAUNCH_BIAS_DEG);

        let drag_multiplier = material_roughness_factor(self.shaft_material)
            * rest_turbulence_factor(self.arrow_rest_type)
            * oscillation_turbulence_factor(self.oscillation_frequency);

        // Longer shafts bend further for the same mismatch
        let length_scale = if self.shaft_length > 0.0 {
            self.shaft_length / REFERENCE_SHAFT_LENGTH_IN
        } else {
            1.0
        };
        let initial_amplitude_inches = (BASE_AMPLITUDE_IN
            + mismatch * AMPLITUDE_PER_MISMATCH_IN
            + self.centershot_offset())
            * length_scale;

        ParadoxEffects {
            velocity_loss,
            launch_bias_degrees,
            drag_multiplier,
            envelope: OscillationEnvelope {
                initial_amplitude_inches,
                damping_per_second: self.dampening_factor.max(0.0),
            },
        }
    }

    /// Summary block reported with enhanced trajectories
    pub fn analyze(&self) -> ParadoxAnalysis {
        let effects = self.effects();
        let mismatch = self.spine_mismatch();

        let tuning_assessment = if mismatch <= 0.05 {
            format!("{:.0} spine shaft is well matched to the bow", self.static_spine)
        } else if mismatch <= 0.15 {
            format!("{:.0} spine shaft is acceptably matched; fine tuning will tighten groups", self.static_spine)
        } else {
            format!("{:.0} spine shaft is poorly matched to the bow", self.static_spine)
        };

        let mut recommendations = Vec::new();
        if self.dynamic_spine_factor > 1.05 {
            recommendations.push("Arrow is acting weak: try a stiffer spine, a lighter point or a shorter shaft".to_string());
        } else if self.dynamic_spine_factor < 0.95 {
            recommendations.push("Arrow is acting stiff: try a weaker spine, a heavier point or a longer shaft".to_string());
        }
        if self.nocking_point_height.abs() > 0.25 {
            recommendations.push("Nocking point is far from square; expect porpoising until it is lowered".to_string());
        }
        if self.centershot_offset() > 0.125 {
            recommendations.push("Centershot is more than 1/8\" off standard; adjust the rest before paper tuning".to_string());
        }
        if effects.envelope.half_life() > 0.15 {
            recommendations.push("Shaft oscillation persists downrange; consider more fletching or a stiffer shaft".to_string());
        }
        if matches!(self.arrow_rest_type, ArrowRestType::WhiskerBiscuit | ArrowRestType::Shelf) {
            recommendations.push("Contact rests add launch turbulence; a drop-away rest reduces fletching contact".to_string());
        }
        if recommendations.is_empty() {
            recommendations.push("Paradox effects are minimal for this setup".to_string());
        }

        ParadoxAnalysis {
            velocity_loss_percent: effects.velocity_loss * 100.0,
            launch_bias_degrees: effects.launch_bias_degrees,
            initial_amplitude_inches: effects.envelope.initial_amplitude_inches,
            amplitude_half_life_seconds: effects.envelope.half_life(),
            drag_multiplier: effects.drag_multiplier,
            tuning_assessment,
            recommendations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParadoxAnalysis {
    pub velocity_loss_percent: f64,
    pub launch_bias_degrees: f64,
    pub initial_amplitude_inches: f64,
    pub amplitude_half_life_seconds: f64,
    pub drag_multiplier: f64,
    pub tuning_assessment: String,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_arrow_has_no_loss() {
        let effects = ArrowParadoxParameters::default().effects();
        assert_eq!(effects.velocity_loss, 0.0);
        assert_eq!(effects.launch_bias_degrees, 0.0);
        assert!((effects.envelope.initial_amplitude_inches - 0.25).abs() < 1e-12);
        // Carbon, drop-away, 25 Hz
        assert!((effects.drag_multiplier - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_loss_is_capped() {
        let params = ArrowParadoxParameters { dynamic_spine_factor: 1.2, ..Default::default() };
        assert!((params.effects().velocity_loss - 0.02).abs() < 1e-12);

        let params = ArrowParadoxParameters { dynamic_spine_factor: 2.0, ..Default::default() };
        assert_eq!(params.effects().velocity_loss, 0.05);
    }

    #[test]
    fn test_launch_bias_clamped() {
        let params = ArrowParadoxParameters { dynamic_spine_factor: 1.4, nocking_point_height: 0.5, ..Default::default() };
        assert!((params.effects().launch_bias_degrees - 0.15).abs() < 1e-12);

        let params = ArrowParadoxParameters { nocking_point_height: 10.0, ..Default::default() };
        assert_eq!(params.effects().launch_bias_degrees, 0.5);
        let params = ArrowParadoxParameters { nocking_point_height: -10.0, ..Default::default() };
        assert_eq!(params.effects().launch_bias_degrees, -0.5);
    }

    #[test]
    fn test_envelope_decay() {
        let env = OscillationEnvelope { initial_amplitude_inches: 1.0, damping_per_second: 8.0 };
        let half = env.half_life();
        assert!((env.amplitude(half) - 0.5).abs() < 1e-12);
        assert!(env.amplitude(1.0) < 0.001);
        assert!((env.drag_gain(0.0) - 1.2).abs() < 1e-12);
        assert!((env.wind_gain(0.0) - 1.5).abs() < 1e-12);

        let undamped = OscillationEnvelope { initial_amplitude_inches: 1.0, damping_per_second: 0.0 };
        assert!(undamped.half_life().is_infinite());
        assert_eq!(undamped.amplitude(5.0), 1.0);
    }

    #[test]
    fn test_analysis_recommendations() {
        let tuned = ArrowParadoxParameters::default().analyze();
        assert_eq!(tuned.recommendations, vec!["Paradox effects are minimal for this setup".to_string()]);
        assert!(tuned.tuning_assessment.contains("well matched"));

        let weak = ArrowParadoxParameters {
            dynamic_spine_factor: 1.3,
            arrow_rest_type: ArrowRestType::WhiskerBiscuit,
            ..Default::default()
        }
        .analyze();
        assert!(weak.tuning_assessment.contains("poorly matched"));
        assert!(weak.recommendations.iter().any(|r| r.contains("acting weak")));
        assert!(weak.recommendations.iter().any(|r| r.contains("Contact rests")));
        assert!((weak.velocity_loss_percent - 3.0).abs() < 1e-9);
    }
}
