//! Broadhead aerodynamic model.
//!
//! Blades add drag and act as small wings, so a broadhead both slows the
//! arrow and makes it more sensitive to crosswind than a field point of the
//! same weight. Mechanical heads fly nearly like a field point while closed
//! and take on the full-diameter penalty once they deploy.

use serde::{Deserialize, Serialize};

const CLOSED_MECHANICAL_DRAG: f64 = 0.03;
const FIXED_BLADE_DRAG_BASE: f64 = 0.10;
const EXTRA_BLADE_DRAG: f64 = 0.04;
const WIND_PLANING_GAIN: f64 = 0.25;
const CLOSED_MECHANICAL_WIND_SHARE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointType {
    #[default]
    Fixed,
    Mechanical,
    Hybrid,
}

impl PointType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mechanical" | "expandable" => PointType::Mechanical,
            "hybrid" => PointType::Hybrid,
            _ => PointType::Fixed,
        }
    }
}

/// Blade profile height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BladeProfile {
    Low,
    #[default]
    Standard,
    High,
}

impl BladeProfile {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => BladeProfile::Low,
            "high" => BladeProfile::High,
            _ => BladeProfile::Standard,
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            BladeProfile::Low => 0.85,
            BladeProfile::Standard => 1.0,
            BladeProfile::High => 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadheadSpec {
    #[serde(default)]
    pub point_type: PointType,
    /// Inches
    pub cutting_diameter: f64,
    pub blade_count: u32,
    #[serde(default)]
    pub profile: BladeProfile,
    /// Mechanical blades open once the arrow slows below this speed (fps)
    #[serde(default)]
    pub deployment_speed_fps: Option<f64>,
    /// Open cutting diameter of mechanical blades (inches)
    #[serde(default)]
    pub deployed_diameter: Option<f64>,
}

impl BroadheadSpec {
    pub fn fixed(cutting_diameter: f64, blade_count: u32) -> Self {
        Self {
            point_type: PointType::Fixed,
            cutting_diameter,
            blade_count,
            profile: BladeProfile::Standard,
            deployment_speed_fps: None,
            deployed_diameter: None,
        }
    }

    pub fn mechanical(closed_diameter: f64, deployed_diameter: f64, blade_count: u32, deployment_speed_fps: f64) -> Self {
        Self {
            point_type: PointType::Mechanical,
            cutting_diameter: closed_diameter,
            blade_count,
            profile: BladeProfile::Standard,
            deployment_speed_fps: Some(deployment_speed_fps),
            deployed_diameter: Some(deployed_diameter),
        }
    }

    /// Whether mechanical blades are open at this speed
    pub fn is_deployed(&self, speed_fps: f64) -> bool {
        match self.point_type {
            PointType::Fixed => false,
            PointType::Mechanical | PointType::Hybrid => {
                self.deployment_speed_fps.is_some_and(|threshold| speed_fps < threshold)
            }
        }
    }

    fn open_diameter(&self) -> f64 {
        self.deployed_diameter.unwrap_or(self.cutting_diameter)
    }

    fn blade_drag(&self, diameter: f64) -> f64 {
        let extra_blades = self.blade_count.saturating_sub(2) as f64;
        (FIXED_BLADE_DRAG_BASE + EXTRA_BLADE_DRAG * extra_blades) * diameter.max(0.0) * self.profile.factor()
    }

    fn planing(&self, diameter: f64) -> f64 {
        WIND_PLANING_GAIN * (diameter.max(0.0) * self.blade_count as f64 / 3.0) * self.profile.factor()
    }

    /// Drag multiplier relative to a field point at the given speed
    pub fn drag_factor(&self, speed_fps: f64) -> f64 {
        let deployed = self.is_deployed(speed_fps);
        match self.point_type {
            PointType::Fixed => 1.0 + self.blade_drag(self.cutting_diameter),
            PointType::Mechanical if deployed => 1.0 + self.blade_drag(self.open_diameter()),
            PointType::Mechanical => 1.0 + CLOSED_MECHANICAL_DRAG * self.profile.factor(),
            PointType::Hybrid => {
                let diameter = if deployed {
                    self.cutting_diameter.max(self.open_diameter())
                } else {
                    self.cutting_diameter
                };
                1.0 + self.blade_drag(diameter)
            }
        }
    }

    /// Crosswind sensitivity multiplier from blade planing
    pub fn wind_sensitivity(&self, speed_fps: f64) -> f64 {
        let deployed = self.is_deployed(speed_fps);
        match self.point_type {
            PointType::Fixed => 1.0 + self.planing(self.cutting_diameter),
            PointType::Mechanical if deployed => 1.0 + self.planing(self.open_diameter()),
            PointType::Mechanical => 1.0 + CLOSED_MECHANICAL_WIND_SHARE * self.planing(self.cutting_diameter),
            PointType::Hybrid => {
                let diameter = if deployed {
                    self.cutting_diameter.max(self.open_diameter())
                } else {
                    self.cutting_diameter
                };
                1.0 + self.planing(diameter)
            }
        }
    }
}
