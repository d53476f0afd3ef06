/// Keplerian orbital mechanics. Pure math, no engine state.
///
/// Uses f64 throughout: simulated times reach 10⁹ s and beyond once the
/// time scale is cranked up, and f32 loses the phase long before that.

use std::f64::consts::{PI, TAU};
use glam::DVec3;

use crate::core::math::{self, EPSILON};

const DEG_TO_RAD: f64 = PI / 180.0;

/// Newton-Raphson iterations for Kepler's equation. Fixed, not
/// convergence-checked: ten steps are well inside f64 precision for e < 0.95.
pub const KEPLER_ITERATIONS: usize = 10;

/// Above this eccentricity the solver starts from E₀ = π instead of E₀ = M.
const HIGH_ECCENTRICITY: f64 = 0.8;

/// Keplerian elements in scene units and radians, ready for solving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (scene units, or km before scaling).
    pub semi_major_axis: f64,
    /// Eccentricity in [0, 1).
    pub eccentricity: f64,
    /// Inclination (radians).
    pub inclination: f64,
    /// Longitude of the ascending node (radians).
    pub longitude_ascending: f64,
    /// Argument of periapsis (radians).
    pub argument_periapsis: f64,
    /// Mean anomaly at epoch (radians).
    pub mean_anomaly_epoch: f64,
    /// Extra phase added to the mean anomaly at spawn (radians).
    pub phase_offset: f64,
    /// Orbital period (seconds).
    pub period: f64,
}

impl Default for OrbitalElements {
    fn default() -> Self {
        Self {
            semi_major_axis: 0.0,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_ascending: 0.0,
            argument_periapsis: 0.0,
            mean_anomaly_epoch: 0.0,
            phase_offset: 0.0,
            period: 0.0,
        }
    }
}

impl OrbitalElements {
    /// Build from dataset-style degrees.
    pub fn from_degrees(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination_deg: f64,
        longitude_ascending_deg: f64,
        argument_periapsis_deg: f64,
        mean_anomaly_deg: f64,
        phase_offset_deg: f64,
        period: f64,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: inclination_deg * DEG_TO_RAD,
            longitude_ascending: longitude_ascending_deg * DEG_TO_RAD,
            argument_periapsis: argument_periapsis_deg * DEG_TO_RAD,
            mean_anomaly_epoch: mean_anomaly_deg * DEG_TO_RAD,
            phase_offset: phase_offset_deg * DEG_TO_RAD,
            period,
        }
    }

    /// A body whose period or semi-major axis is not positive stays
    /// at its parent's position.
    pub fn has_orbit(&self) -> bool {
        self.period > 0.0
            && self.semi_major_axis > 0.0
            && self.period.is_finite()
            && self.semi_major_axis.is_finite()
    }

    /// Same orbit with a different semi-major axis (used after scaling).
    pub fn with_semi_major_axis(mut self, semi_major_axis: f64) -> Self {
        self.semi_major_axis = semi_major_axis;
        self
    }

    /// Mean motion in radians per second.
    pub fn mean_motion(&self) -> f64 {
        TAU / math::floor_abs(self.period)
    }

    /// Mean anomaly at `elapsed` seconds, wrapped to [0, 2π).
    pub fn mean_anomaly_at(&self, elapsed: f64) -> f64 {
        math::wrap_tau(self.mean_anomaly_epoch + self.phase_offset + self.mean_motion() * elapsed)
    }
}

/// Solve Kepler's equation E - e·sin(E) = M for the eccentric anomaly.
/// `mean_anomaly` in radians, returns the eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = if eccentricity < HIGH_ECCENTRICITY { mean_anomaly } else { PI };
    for _ in 0..KEPLER_ITERATIONS {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = (1.0 - eccentricity * ea.cos()).max(EPSILON);
        ea -= delta / derivative;
    }
    ea
}

/// True anomaly from the eccentric anomaly. Full-angle atan2 form, stable at
/// periapsis and apoapsis.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let beta = (1.0 - eccentricity * eccentricity).max(0.0).sqrt();
    (beta * eccentric_anomaly.sin()).atan2(eccentric_anomaly.cos() - eccentricity)
}

/// Position on the orbit for a given mean anomaly, in the scene frame.
fn offset_at_mean_anomaly(elements: &OrbitalElements, mean_anomaly: f64) -> DVec3 {
    let e = elements.eccentricity;
    let ea = solve_kepler(mean_anomaly, e);
    let nu = true_anomaly(ea, e);
    let r = elements.semi_major_axis * (1.0 - e * ea.cos());

    // Argument of latitude: angle from the ascending node along the orbit
    let u = elements.argument_periapsis + nu;
    let (sin_u, cos_u) = u.sin_cos();
    let (sin_i, cos_i) = elements.inclination.sin_cos();
    let (sin_o, cos_o) = elements.longitude_ascending.sin_cos();

    let astro = DVec3::new(
        r * (cos_o * cos_u - sin_o * sin_u * cos_i),
        r * (sin_o * cos_u + cos_o * sin_u * cos_i),
        r * (sin_u * sin_i),
    );
    math::astro_to_scene(astro)
}

/// Offset from the parent at `elapsed` simulated seconds, in the parent's
/// local scene frame. Bodies without an orbit sit at the origin.
pub fn solve_offset(elements: &OrbitalElements, elapsed: f64) -> DVec3 {
    if !elements.has_orbit() {
        return DVec3::ZERO;
    }
    offset_at_mean_anomaly(elements, elements.mean_anomaly_at(elapsed))
}

/// `sample_count` points evenly spaced in time over one full period,
/// starting at the epoch. The path is closed: the last point connects back
/// to the first.
pub fn solve_path_samples(elements: &OrbitalElements, sample_count: usize) -> Vec<DVec3> {
    if !elements.has_orbit() || sample_count == 0 {
        return Vec::new();
    }
    (0..sample_count)
        .map(|i| {
            let t = elements.period * i as f64 / sample_count as f64;
            solve_offset(elements, t)
        })
        .collect()
}
