// core/spin.rs
//
// Axial spin and tidal lock. Two states, re-evaluated every tick:
// FreeSpin (tilt × spin about the tilted up axis) and TidalLocked
// (one face towards the parent).

use std::f64::consts::{PI, TAU};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyKind, TidalLockOverride};
use crate::core::math;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Tilts above this render as retrograde, so the spin sign flips.
const RETROGRADE_TILT_DEG: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinState {
    #[default]
    FreeSpin,
    TidalLocked,
}

/// Global tidal-lock policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidalLockSettings {
    pub enabled: bool,
    /// Only moons may lock automatically. Overrides still apply to any body.
    pub moons_only: bool,
    /// Maximum relative mismatch `|P_rot - P_orb| / P_orb` that still locks.
    pub tolerance: f64,
}

impl Default for TidalLockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            moons_only: true,
            tolerance: 0.02,
        }
    }
}

/// What the lock decision looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSubject {
    pub kind: BodyKind,
    pub has_orbit: bool,
    /// Rotation period magnitude (s), if the body spins.
    pub rotation_period: Option<f64>,
    /// Orbital period (s).
    pub orbital_period: f64,
    pub lock_override: TidalLockOverride,
}

/// Decide the spin state. Priority: global switch and missing data, explicit
/// override, moons-only restriction, then the period ratio.
pub fn evaluate_spin_state(subject: &SpinSubject, settings: &TidalLockSettings) -> SpinState {
    let Some(rotation_period) = subject.rotation_period else {
        return SpinState::FreeSpin;
    };
    if !settings.enabled || !subject.has_orbit {
        return SpinState::FreeSpin;
    }
    match subject.lock_override {
        TidalLockOverride::ForceOn => return SpinState::TidalLocked,
        TidalLockOverride::ForceOff => return SpinState::FreeSpin,
        TidalLockOverride::Auto => {}
    }
    if settings.moons_only && subject.kind != BodyKind::Moon {
        return SpinState::FreeSpin;
    }
    let mismatch = (rotation_period - subject.orbital_period).abs()
        / math::floor_abs(subject.orbital_period);
    if mismatch <= settings.tolerance {
        SpinState::TidalLocked
    } else {
        SpinState::FreeSpin
    }
}

/// Axial tilt as a rotation about the scene's forward (Z) axis.
pub fn tilt_rotation(axial_tilt_deg: f64) -> DQuat {
    DQuat::from_rotation_z(axial_tilt_deg * DEG_TO_RAD)
}

/// The body's north pole direction after tilting.
pub fn spin_axis(axial_tilt_deg: f64) -> DVec3 {
    tilt_rotation(axial_tilt_deg) * DVec3::Y
}

/// Spin direction as drawn. A prograde body spins the way its orbit
/// advances; tilts past 90° flip the visible sense.
pub fn effective_direction_sign(direction_sign: f64, axial_tilt_deg: f64) -> f64 {
    let sign = if direction_sign < 0.0 { -1.0 } else { 1.0 };
    if axial_tilt_deg.abs() > RETROGRADE_TILT_DEG { -sign } else { sign }
}

/// Spin angle (radians, [0, 2π)) after `elapsed` seconds.
pub fn spin_angle(elapsed: f64, rotation_period: f64, direction_sign: f64, axial_tilt_deg: f64) -> f64 {
    let sign = effective_direction_sign(direction_sign, axial_tilt_deg);
    let cycles = elapsed / math::floor_abs(rotation_period) * -sign;
    math::wrap_unit(cycles) * TAU
}

/// Free-spin orientation: tilt, then spin about the tilted up axis.
/// Bodies without a rotation period only carry their tilt.
pub fn free_spin_orientation(
    elapsed: f64,
    rotation_period: Option<f64>,
    direction_sign: f64,
    axial_tilt_deg: f64,
) -> DQuat {
    let tilt = tilt_rotation(axial_tilt_deg);
    match rotation_period {
        Some(period) => {
            let angle = spin_angle(elapsed, period, direction_sign, axial_tilt_deg);
            (tilt * DQuat::from_rotation_y(angle)).normalize()
        }
        None => tilt,
    }
}

/// Tidal-lock orientation: +Z faces the parent, up stays as close to the
/// tilted pole as possible, then `facing_offset_deg` turns about up.
/// A body sitting on its parent keeps its tilt.
pub fn tidal_lock_orientation(
    position: DVec3,
    parent_position: DVec3,
    axial_tilt_deg: f64,
    facing_offset_deg: f64,
) -> DQuat {
    let up = spin_axis(axial_tilt_deg);
    match math::look_rotation(parent_position - position, up) {
        Some(look) => (look * DQuat::from_rotation_y(facing_offset_deg * DEG_TO_RAD)).normalize(),
        None => tilt_rotation(axial_tilt_deg),
    }
}
