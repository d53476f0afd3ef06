use glam::{DQuat, DVec3};

use crate::api::types::{BodyId, BodyKind, TidalLockOverride};
use crate::assets::dataset::BodyRecord;
use crate::core::orbit::OrbitalElements;
use crate::core::scale::ScaleSubject;
use crate::core::spin::{self, SpinState, SpinSubject};
use crate::systems::orbit_path::OrbitPathCache;

/// Physical constants of one body, derived once from its record.
/// Invalid values are replaced by safe fallbacks with a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyConstants {
    pub kind: BodyKind,
    pub is_reference: bool,
    pub is_hypothetical: bool,
    pub order: Option<u32>,
    pub radius_km: f64,
    /// Rotation period magnitude (s), `None` for bodies that don't spin.
    pub rotation_period: Option<f64>,
    /// +1 prograde, -1 retrograde.
    pub spin_direction: f64,
    pub axial_tilt_deg: f64,
    /// Orbit in km. Periods and axes that are not positive mean no orbit.
    pub orbit_km: OrbitalElements,
    pub radius_multiplier: Option<f64>,
    pub distance_multiplier: Option<f64>,
    pub tidal_lock: TidalLockOverride,
    pub align_to_parent_equator: bool,
    pub facing_offset_deg: f64,
}

fn positive_multiplier(id: &str, name: &str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(m) if m.is_finite() && m > 0.0 => Some(m),
        Some(m) => {
            log::warn!("body '{id}': ignoring {name} multiplier {m}");
            None
        }
        None => None,
    }
}

fn finite_or_zero(id: &str, name: &str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("body '{id}': {name} is not finite; using 0");
        0.0
    }
}

impl BodyConstants {
    pub fn from_record(record: &BodyRecord) -> Self {
        let id = record.id.as_str();

        let radius_km = if record.radius_km.is_finite() && record.radius_km > 0.0 {
            record.radius_km
        } else {
            log::warn!("body '{id}': radius {} km is not positive; using 1 km", record.radius_km);
            1.0
        };

        let (rotation_period, spin_direction) = match record.rotation_period_s {
            Some(p) if p.is_finite() && p != 0.0 => (Some(p.abs()), p.signum()),
            Some(p) => {
                log::warn!("body '{id}': rotation period {p} s is unusable; body will not spin");
                (None, 1.0)
            }
            None => (None, 1.0),
        };

        let orbit_km = if record.is_reference {
            OrbitalElements::default()
        } else {
            Self::orbit_from_record(record)
        };

        Self {
            kind: record.kind,
            is_reference: record.is_reference,
            is_hypothetical: record.is_hypothetical,
            order: record.order_from_parent,
            radius_km,
            rotation_period,
            spin_direction,
            axial_tilt_deg: finite_or_zero(id, "axial tilt", record.axial_tilt_deg),
            orbit_km,
            radius_multiplier: positive_multiplier(id, "radius", record.radius_multiplier),
            distance_multiplier: positive_multiplier(id, "distance", record.distance_multiplier),
            tidal_lock: record.tidal_lock,
            align_to_parent_equator: record.align_to_parent_equator,
            facing_offset_deg: finite_or_zero(id, "facing offset", record.facing_offset_deg),
        }
    }

    fn orbit_from_record(record: &BodyRecord) -> OrbitalElements {
        let id = record.id.as_str();
        let elements = OrbitalElements::from_degrees(
            record.semi_major_axis_km,
            record.eccentricity,
            finite_or_zero(id, "inclination", record.inclination_deg),
            finite_or_zero(id, "ascending node", record.longitude_ascending_node_deg),
            finite_or_zero(id, "argument of periapsis", record.argument_periapsis_deg),
            finite_or_zero(id, "mean anomaly", record.mean_anomaly_deg),
            finite_or_zero(id, "initial phase", record.initial_phase_deg),
            record.orbital_period_s.unwrap_or(0.0),
        );

        let valid_eccentricity = (0.0..1.0).contains(&elements.eccentricity);
        if !elements.has_orbit() || !valid_eccentricity {
            log::warn!(
                "body '{id}': degenerate orbit (a={} km, e={}, period={:?} s); body stays at its parent",
                record.semi_major_axis_km, record.eccentricity, record.orbital_period_s
            );
            return OrbitalElements { period: 0.0, ..elements };
        }
        elements
    }

    pub fn has_orbit(&self) -> bool {
        self.orbit_km.has_orbit()
    }

    /// Inputs for the scale blender.
    pub fn scale_subject(&self, orbits_reference: bool) -> ScaleSubject {
        ScaleSubject {
            kind: self.kind,
            radius_km: self.radius_km,
            semi_major_axis_km: self.orbit_km.semi_major_axis,
            order: self.order,
            orbits_reference,
            radius_multiplier: self.radius_multiplier,
            distance_multiplier: self.distance_multiplier,
        }
    }

    /// Inputs for the tidal-lock decision.
    pub fn spin_subject(&self) -> SpinSubject {
        SpinSubject {
            kind: self.kind,
            has_orbit: self.has_orbit(),
            rotation_period: self.rotation_period,
            orbital_period: self.orbit_km.period,
            lock_override: self.tidal_lock,
        }
    }
}

/// Kinematic state of one spawned body. Owned by the system arena; the
/// parent is referenced by arena index only.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub id: BodyId,
    /// Dataset key.
    pub key: String,
    pub parent: Option<BodyId>,
    /// Whether the parent is the reference star.
    pub orbits_reference: bool,
    pub constants: BodyConstants,

    // -- Per-tick outputs --
    /// Offset from the parent in the parent's frame (scene units).
    pub local_offset: DVec3,
    /// World position (scene units).
    pub position: DVec3,
    pub orientation: DQuat,
    pub spin_state: SpinState,
    /// Rendered diameter (scene units).
    pub diameter: f64,

    // -- Scale-dependent caches --
    /// Orbit with the semi-major axis in scene units.
    pub(crate) scaled_orbit: OrbitalElements,
    /// Scale generation the caches were built for; `None` before first scaling.
    pub(crate) scale_generation: Option<u64>,
    pub(crate) path: OrbitPathCache,
}

impl BodyState {
    pub fn new(id: BodyId, record: &BodyRecord, parent: Option<BodyId>, orbits_reference: bool) -> Self {
        let constants = BodyConstants::from_record(record);
        let orientation = spin::tilt_rotation(constants.axial_tilt_deg);
        Self {
            id,
            key: record.id.clone(),
            parent,
            orbits_reference,
            constants,
            local_offset: DVec3::ZERO,
            position: DVec3::ZERO,
            orientation,
            spin_state: SpinState::FreeSpin,
            diameter: 0.0,
            scaled_orbit: OrbitalElements::default(),
            scale_generation: None,
            path: OrbitPathCache::new(),
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.constants.kind
    }

    pub fn is_reference(&self) -> bool {
        self.constants.is_reference
    }

    pub fn is_hypothetical(&self) -> bool {
        self.constants.is_hypothetical
    }

    pub fn has_orbit(&self) -> bool {
        self.constants.has_orbit()
    }

    /// Whether scale-dependent caches have been built at least once.
    pub fn is_initialized(&self) -> bool {
        self.scale_generation.is_some()
    }

    /// Orbit in scene units, as last scaled.
    pub fn scaled_orbit(&self) -> &OrbitalElements {
        &self.scaled_orbit
    }

    /// Rendered radius (scene units).
    pub fn radius(&self) -> f64 {
        self.diameter * 0.5
    }

    /// North pole direction in world space, for axis indicators.
    pub fn spin_axis(&self) -> DVec3 {
        spin::spin_axis(self.constants.axial_tilt_deg)
    }

    /// Replace the record-derived constants in place (same-id reload).
    /// Forces a rescale on the next tick.
    pub(crate) fn reapply(&mut self, record: &BodyRecord, parent: Option<BodyId>, orbits_reference: bool) {
        self.constants = BodyConstants::from_record(record);
        self.parent = parent;
        self.orbits_reference = orbits_reference;
        self.scale_generation = None;
        self.path.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> BodyRecord {
        BodyRecord::new("earth", BodyKind::Planet, 6_371.0)
            .with_parent("sun")
            .with_orbit(149_598_023.0, 0.0167, 31_558_149.8)
            .with_rotation(86_164.1, 23.44)
    }

    #[test]
    fn constants_from_valid_record() {
        let c = BodyConstants::from_record(&earth());
        assert!(c.has_orbit());
        assert_eq!(c.rotation_period, Some(86_164.1));
        assert_eq!(c.spin_direction, 1.0);
        assert_eq!(c.orbit_km.semi_major_axis, 149_598_023.0);
    }

    #[test]
    fn retrograde_rotation_keeps_magnitude() {
        let venus = BodyRecord::new("venus", BodyKind::Planet, 6_051.8)
            .with_rotation(-20_997_360.0, 177.36);
        let c = BodyConstants::from_record(&venus);
        assert_eq!(c.rotation_period, Some(20_997_360.0));
        assert_eq!(c.spin_direction, -1.0);
    }

    #[test]
    fn degenerate_values_fall_back() {
        let mut record = earth();
        record.eccentricity = 1.2;
        record.radius_km = -4.0;
        record.radius_multiplier = Some(0.0);
        record.rotation_period_s = Some(0.0);
        let c = BodyConstants::from_record(&record);
        assert!(!c.has_orbit());
        assert_eq!(c.radius_km, 1.0);
        assert_eq!(c.radius_multiplier, None);
        assert_eq!(c.rotation_period, None);
    }

    #[test]
    fn reference_never_orbits() {
        let sun = BodyRecord::star("sun", 695_700.0).with_orbit(1.0e9, 0.1, 1.0e9);
        assert!(!BodyConstants::from_record(&sun).has_orbit());
    }

    #[test]
    fn new_state_is_uninitialized() {
        let state = BodyState::new(BodyId(1), &earth(), Some(BodyId(0)), true);
        assert!(!state.is_initialized());
        assert_eq!(state.key, "earth");
        assert_eq!(state.parent, Some(BodyId(0)));
        assert!((state.spin_axis().length() - 1.0).abs() < 1e-12);
    }
}
