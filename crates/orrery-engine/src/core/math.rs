// core/math.rs
//
// Small numeric helpers shared by the solver, blender and spin logic.
// Pure functions, f64 throughout.

use std::f64::consts::TAU;
use glam::{DMat3, DQuat, DVec3};

/// Floor used wherever a division or normalisation could blow up.
pub const EPSILON: f64 = 1e-9;

/// Linear interpolation that is exact at both endpoints:
/// `t = 0` returns `a` and `t = 1` returns `b` bit-for-bit.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Wrap an angle in radians into `[0, 2π)`.
#[inline]
pub fn wrap_tau(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap a cycle count into `[0, 1)`.
#[inline]
pub fn wrap_unit(cycles: f64) -> f64 {
    let wrapped = cycles.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Keep `value` at least `EPSILON` away from zero, preserving its sign.
#[inline]
pub fn floor_abs(value: f64) -> f64 {
    if value.abs() < EPSILON {
        if value.is_sign_negative() { -EPSILON } else { EPSILON }
    } else {
        value
    }
}

/// Fixed basis change from the astronomical right-handed frame
/// (x, y in the reference plane, z towards the north pole) to the scene's
/// left-handed Y-up frame. Swapping y and z is exact, not an approximation.
#[inline]
pub fn astro_to_scene(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, v.y)
}

/// Normalise `v`, or `None` when its length is below `EPSILON`.
#[inline]
pub fn try_normalize(v: DVec3) -> Option<DVec3> {
    let len = v.length();
    if len.is_finite() && len >= EPSILON {
        Some(v / len)
    } else {
        None
    }
}

/// Rotation whose +Z axis points along `forward` and whose +Y axis is as close
/// to `up` as possible. Falls back to world up, then world forward, when `up`
/// is parallel to `forward`. Returns `None` only for a zero `forward`.
pub fn look_rotation(forward: DVec3, up: DVec3) -> Option<DQuat> {
    let f = try_normalize(forward)?;
    let right = [up, DVec3::Y, DVec3::Z]
        .into_iter()
        .find_map(|candidate| try_normalize(candidate.cross(f)))?;
    let u = f.cross(right);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, u, f)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_exact_at_endpoints() {
        assert_eq!(lerp(21.842, 1.0, 0.0), 21.842);
        assert_eq!(lerp(21.842, 1.0, 1.0), 1.0);
        assert!((lerp(2.0, 4.0, 0.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_tau_stays_in_range() {
        for angle in [-7.0, -TAU, -1e-18, 0.0, 3.0, TAU, 100.0] {
            let w = wrap_tau(angle);
            assert!((0.0..TAU).contains(&w), "{angle} wrapped to {w}");
        }
    }

    #[test]
    fn floor_abs_preserves_sign() {
        assert_eq!(floor_abs(0.0), EPSILON);
        assert_eq!(floor_abs(-1e-15), -EPSILON);
        assert_eq!(floor_abs(0.5), 0.5);
    }

    #[test]
    fn basis_swap_moves_north_to_up() {
        assert_eq!(astro_to_scene(DVec3::Z), DVec3::Y);
        assert_eq!(astro_to_scene(DVec3::X), DVec3::X);
    }

    #[test]
    fn look_rotation_points_forward() {
        let q = look_rotation(DVec3::X, DVec3::Y).unwrap();
        assert!((q * DVec3::Z - DVec3::X).length() < 1e-9);
        assert!((q * DVec3::Y - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn look_rotation_survives_parallel_up() {
        let q = look_rotation(DVec3::Y, DVec3::Y).unwrap();
        assert!((q * DVec3::Z - DVec3::Y).length() < 1e-9);
        assert!(q.is_finite());
        assert!(look_rotation(DVec3::ZERO, DVec3::Y).is_none());
    }
}
