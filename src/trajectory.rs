//! Fixed-step arrow trajectory integrator.
//!
//! State is position and velocity in feet with x downrange, y up and z to the
//! shooter's right. Each step applies gravity and quadratic drag on the
//! air-relative velocity, then advances velocity before position (the
//! velocity used for the position update is the freshly updated one).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::broadhead::BroadheadSpec;
use crate::constants::{
    FEET_PER_YARD, GRAVITY_FPS2, INCHES_PER_FOOT, KE_DIVISOR, MIN_DIVISION_THRESHOLD, MIN_VELOCITY_THRESHOLD,
};
use crate::paradox::OscillationEnvelope;
use crate::wind::WindSock;

pub const MIN_LAUNCH_ANGLE_DEG: f64 = 0.5;
pub const MAX_LAUNCH_ANGLE_DEG: f64 = 3.0;

/// Drag reduction close to the ground
const GROUND_EFFECT_DRAG_REDUCTION: f64 = 0.05;
const GROUND_EFFECT_HEIGHT_FT: f64 = 3.0;

/// Shot geometry and calculation range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingConditions {
    /// Line-of-sight angle, positive uphill
    pub shot_angle_degrees: f64,
    /// Sight pin height above the arrow (inches)
    pub sight_height_inches: f64,
    pub zero_distance_yards: f64,
    pub max_range_yards: f64,
}

impl Default for ShootingConditions {
    fn default() -> Self {
        Self {
            shot_angle_degrees: 0.0,
            sight_height_inches: 7.0,
            zero_distance_yards: 20.0,
            max_range_yards: 100.0,
        }
    }
}

impl ShootingConditions {
    pub fn level(zero_distance_yards: f64, max_range_yards: f64) -> Self {
        Self { zero_distance_yards, max_range_yards, ..Default::default() }
    }
}

/// One sample of the flight path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub distance_yards: f64,
    /// Height relative to the line of sight, positive above
    pub height_inches: f64,
    pub velocity_fps: f64,
    /// Fall below the line of departure
    pub drop_inches: f64,
    /// Lateral displacement, positive to the right
    pub wind_drift_inches: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oscillation_amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinetic_energy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Fell past the ground threshold below the line of sight
    GroundImpact,
    TimeLimit,
    MaxRange,
    /// Non-positive speed or weight, nothing to integrate
    NoFlight,
}

/// Launch state of the arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub speed_fps: f64,
    pub weight_grains: f64,
    /// Angle of the bore line above horizontal
    pub elevation_degrees: f64,
}

/// Aerodynamic model applied during integration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlightModel {
    /// `k` in `a = −k·|v|·v` (1/ft)
    pub drag_constant: f64,
    pub oscillation: Option<OscillationEnvelope>,
    pub broadhead: Option<BroadheadSpec>,
    pub ground_effect: bool,
}

impl FlightModel {
    pub fn new(drag_constant: f64) -> Self {
        Self { drag_constant, ..Default::default() }
    }

    fn acceleration(&self, t: f64, vel: Vector3<f64>, wind: Vector3<f64>, height_above_ground_ft: f64) -> Vector3<f64> {
        let speed = vel.norm();
        let mut drag_gain = 1.0;
        let mut wind_gain = 1.0;

        if let Some(envelope) = &self.oscillation {
            drag_gain *= envelope.drag_gain(t);
            wind_gain *= envelope.wind_gain(t);
        }
        if let Some(head) = &self.broadhead {
            drag_gain *= head.drag_factor(speed);
            wind_gain *= head.wind_sensitivity(speed);
        }
        if self.ground_effect && height_above_ground_ft < GROUND_EFFECT_HEIGHT_FT {
            drag_gain *= 1.0 - GROUND_EFFECT_DRAG_REDUCTION;
        }

        let v_rel = vel - wind;
        let mut accel = -self.drag_constant * drag_gain * v_rel.norm() * v_rel;
        accel.z *= wind_gain;
        accel.y -= GRAVITY_FPS2;
        accel
    }
}

/// Step size and stopping limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepControl {
    pub time_step: f64,
    pub max_time: f64,
    /// Height below the line of sight that counts as ground (ft, negative)
    pub ground_threshold_ft: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPath {
    pub points: Vec<TrajectoryPoint>,
    pub termination: TerminationReason,
    pub steps: usize,
}

/// Bore elevation above the line of sight that puts the arrow on the sight
/// line at the zero distance.
///
/// Flight time to the zero uses the horizontal drag solution
/// `t = (e^{kD} − 1)/(k·v0)`; the result is clamped to 0.5°..3°.
pub fn calculate_launch_angle(speed_fps: f64, drag_constant: f64, sight_height_inches: f64, zero_distance_yards: f64) -> f64 {
    let distance_ft = zero_distance_yards * FEET_PER_YARD;
    if distance_ft <= 0.0 || speed_fps < MIN_VELOCITY_THRESHOLD {
        return MIN_LAUNCH_ANGLE_DEG;
    }

    let kd = drag_constant * distance_ft;
    let time = if kd > MIN_DIVISION_THRESHOLD {
        kd.exp_m1() / (drag_constant * speed_fps)
    } else {
        distance_ft / speed_fps
    };

    let rise_ft = sight_height_inches / INCHES_PER_FOOT + 0.5 * GRAVITY_FPS2 * time * time;
    rise_ft.atan2(distance_ft).to_degrees().clamp(MIN_LAUNCH_ANGLE_DEG, MAX_LAUNCH_ANGLE_DEG)
}

/// Integrate one flight, sampling the first step past every whole yard.
pub fn integrate(
    launch: &Launch,
    model: &FlightModel,
    shooting: &ShootingConditions,
    wind: &WindSock,
    control: &StepControl,
) -> FlightPath {
    let elevation = launch.elevation_degrees.to_radians();
    let tan_elevation = elevation.tan();
    let tan_shot = shooting.shot_angle_degrees.to_radians().tan();
    let sight_ft = shooting.sight_height_inches / INCHES_PER_FOOT;
    let record_energy = model.oscillation.is_some();

    let sample = |t: f64, pos: &Vector3<f64>, vel: &Vector3<f64>| {
        let speed = vel.norm();
        TrajectoryPoint {
            time: t,
            distance_yards: pos.x / FEET_PER_YARD,
            height_inches: (pos.y - (sight_ft + pos.x * tan_shot)) * INCHES_PER_FOOT,
            velocity_fps: speed,
            drop_inches: (pos.x * tan_elevation - pos.y) * INCHES_PER_FOOT,
            wind_drift_inches: pos.z * INCHES_PER_FOOT,
            oscillation_amplitude: model.oscillation.as_ref().map(|e| e.amplitude(t)),
            kinetic_energy: record_energy.then(|| launch.weight_grains * speed * speed / KE_DIVISOR),
        }
    };

    let mut pos = Vector3::zeros();
    let mut vel = Vector3::new(launch.speed_fps * elevation.cos(), launch.speed_fps * elevation.sin(), 0.0);
    let mut points = vec![sample(0.0, &pos, &vel)];

    if launch.speed_fps < MIN_VELOCITY_THRESHOLD || launch.weight_grains <= 0.0 || control.time_step <= 0.0 {
        debug!("no flight: speed {} fps, weight {} gr", launch.speed_fps, launch.weight_grains);
        return FlightPath { points, termination: TerminationReason::NoFlight, steps: 0 };
    }

    let dt = control.time_step;
    let max_steps = (control.max_time / dt).ceil().max(1.0) as usize;
    let mut next_yard = 1.0;
    let mut steps = 0;

    let termination = loop {
        let t = steps as f64 * dt;
        let height_above_ground = pos.y - (sight_ft + pos.x * tan_shot) - control.ground_threshold_ft;
        let accel = model.acceleration(t, vel, wind.vector_for_range(pos.x), height_above_ground);

        vel += accel * dt;
        pos += vel * dt;
        steps += 1;
        let t = steps as f64 * dt;

        let yards = pos.x / FEET_PER_YARD;
        if yards >= next_yard {
            points.push(sample(t, &pos, &vel));
            next_yard = yards.floor() + 1.0;
        }

        let height_los = pos.y - (sight_ft + pos.x * tan_shot);
        if height_los <= control.ground_threshold_ft {
            break TerminationReason::GroundImpact;
        }
        if yards > shooting.max_range_yards {
            break TerminationReason::MaxRange;
        }
        if steps >= max_steps {
            break TerminationReason::TimeLimit;
        }
    };

    debug!(
        "trajectory ended: {:?} after {} steps at {:.1} yd",
        termination,
        steps,
        pos.x / FEET_PER_YARD
    );

    FlightPath { points, termination, steps }
}

/// Sample nearest to `yards`, if one lies within `tolerance`
pub fn point_near(points: &[TrajectoryPoint], yards: f64, tolerance: f64) -> Option<&TrajectoryPoint> {
    points
        .iter()
        .filter(|p| (p.distance_yards - yards).abs() <= tolerance)
        .min_by(|a, b| (a.distance_yards - yards).abs().total_cmp(&(b.distance_yards - yards).abs()))
}

/// Flight state at `yards`, linearly interpolated between samples
pub fn interpolate_at(points: &[TrajectoryPoint], yards: f64) -> Option<TrajectoryPoint> {
    let upper = points.iter().position(|p| p.distance_yards >= yards)?;
    if upper == 0 {
        return (points[0].distance_yards == yards).then(|| points[0].clone());
    }
    let (a, b) = (&points[upper - 1], &points[upper]);
    let span = b.distance_yards - a.distance_yards;
    if span < MIN_DIVISION_THRESHOLD {
        return Some(b.clone());
    }
    let frac = (yards - a.distance_yards) / span;
    let lerp = |x: f64, y: f64| x + frac * (y - x);
    let lerp_opt = |x: Option<f64>, y: Option<f64>| x.zip(y).map(|(x, y)| lerp(x, y));

    Some(TrajectoryPoint {
        time: lerp(a.time, b.time),
        distance_yards: yards,
        height_inches: lerp(a.height_inches, b.height_inches),
        velocity_fps: lerp(a.velocity_fps, b.velocity_fps),
        drop_inches: lerp(a.drop_inches, b.drop_inches),
        wind_drift_inches: lerp(a.wind_drift_inches, b.wind_drift_inches),
        oscillation_amplitude: lerp_opt(a.oscillation_amplitude, b.oscillation_amplitude),
        kinetic_energy: lerp_opt(a.kinetic_energy, b.kinetic_energy),
    })
}

/// Line-of-sight height at `yards`, interpolated between samples
pub fn height_at(points: &[TrajectoryPoint], yards: f64) -> Option<f64> {
    interpolate_at(points, yards).map(|p| p.height_inches)
}
