use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{FEET_PER_YARD, MPH_TO_FPS};

/// Wind zone: constant wind out to `until_yards` downrange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSegment {
    pub speed_mph: f64,
    /// 0° headwind, 90° from the right, 180° tailwind
    pub direction_degrees: f64,
    pub until_yards: f64,
}

/// Wind condition handler for trajectory integration
#[derive(Debug, Clone)]
pub struct WindSock {
    /// Segments sorted by end distance, with precomputed vectors (fps)
    winds: Vec<(f64, Vector3<f64>)>,
}

impl WindSock {
    /// Create a new WindSock from wind segments
    pub fn new(mut segments: Vec<WindSegment>) -> Self {
        segments.retain(|s| !s.until_yards.is_nan());
        segments.sort_by(|a, b| a.until_yards.total_cmp(&b.until_yards));

        WindSock {
            winds: segments
                .iter()
                .map(|s| (s.until_yards * FEET_PER_YARD, wind_vector(s.speed_mph, s.direction_degrees)))
                .collect(),
        }
    }

    /// A single wind that holds for the whole flight
    pub fn uniform(speed_mph: f64, direction_degrees: f64) -> Self {
        Self::new(vec![WindSegment { speed_mph, direction_degrees, until_yards: f64::INFINITY }])
    }

    pub fn calm() -> Self {
        WindSock { winds: Vec::new() }
    }

    /// Get wind vector for a downrange distance (ft)
    ///
    /// Stateless so the integrator may query any distance in any order.
    pub fn vector_for_range(&self, range_ft: f64) -> Vector3<f64> {
        if range_ft.is_nan() {
            return Vector3::zeros();
        }
        for (until_ft, vec) in &self.winds {
            if range_ft < *until_ft {
                return *vec;
            }
        }
        // Beyond all segments
        Vector3::zeros()
    }

    pub fn is_calm(&self) -> bool {
        self.winds.iter().all(|(_, v)| v.norm() == 0.0)
    }
}

/// Air velocity (fps) for a wind speed and direction.
///
/// The vector points where the air is going: a 90° wind from the right
/// blows toward negative z (left), a headwind toward negative x.
pub fn wind_vector(speed_mph: f64, direction_degrees: f64) -> Vector3<f64> {
    let speed_fps = speed_mph * MPH_TO_FPS;
    let angle_rad = direction_degrees.to_radians();
    Vector3::new(-speed_fps * angle_rad.cos(), 0.0, -speed_fps * angle_rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_sock_empty() {
        let sock = WindSock::calm();
        assert_eq!(sock.vector_for_range(50.0), Vector3::zeros());
        assert!(sock.is_calm());
    }

    #[test]
    fn test_crosswind_from_right() {
        let v = wind_vector(10.0, 90.0);
        assert!(v.x.abs() < 1e-9);
        assert_eq!(v.y, 0.0);
        assert!((v.z + 14.67).abs() < 1e-9);
    }

    #[test]
    fn test_head_and_tail_wind() {
        assert!(wind_vector(10.0, 0.0).x < 0.0);
        assert!(wind_vector(10.0, 180.0).x > 0.0);
    }

    #[test]
    fn test_wind_sock_multiple_segments() {
        let sock = WindSock::new(vec![
            WindSegment { speed_mph: 5.0, direction_degrees: 180.0, until_yards: 60.0 },
            WindSegment { speed_mph: 10.0, direction_degrees: 90.0, until_yards: 20.0 },
            WindSegment { speed_mph: 15.0, direction_degrees: 45.0, until_yards: 40.0 },
        ]);

        let v10 = sock.vector_for_range(10.0 * FEET_PER_YARD);
        assert!(v10.z < 0.0);

        let v30 = sock.vector_for_range(30.0 * FEET_PER_YARD);
        assert!(v30.norm() > v10.norm());
        assert!(v30.x < 0.0 && v30.z < 0.0);

        let v50 = sock.vector_for_range(50.0 * FEET_PER_YARD);
        assert!(v50.x > 0.0);

        assert_eq!(sock.vector_for_range(70.0 * FEET_PER_YARD), Vector3::zeros());
        assert_eq!(sock.vector_for_range(f64::NAN), Vector3::zeros());
    }

    #[test]
    fn test_uniform_wind_never_ends() {
        let sock = WindSock::uniform(8.0, 270.0);
        assert!(sock.vector_for_range(1.0e6).z > 0.0);
        assert!(!sock.is_calm());
    }
}
