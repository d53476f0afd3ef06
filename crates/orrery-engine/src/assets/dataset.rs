use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyKind, TidalLockOverride};
use crate::error::ConfigResult;

/// One celestial body as authored in the dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    /// Unique key (e.g., "earth").
    pub id: String,
    /// The single non-orbiting anchor of the system.
    #[serde(default)]
    pub is_reference: bool,
    /// Speculative bodies (e.g., "Planet Nine"), flagged for the UI.
    #[serde(default)]
    pub is_hypothetical: bool,
    #[serde(default)]
    pub kind: BodyKind,
    /// Key of the body this one orbits. Required unless `is_reference`.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Tie-break position among siblings (1 = closest).
    #[serde(default)]
    pub order_from_parent: Option<u32>,
    /// Mean radius (km).
    pub radius_km: f64,
    /// Sidereal rotation period (s). Negative means retrograde rotation.
    #[serde(default)]
    pub rotation_period_s: Option<f64>,
    #[serde(default)]
    pub axial_tilt_deg: f64,

    /// Semi-major axis (km).
    #[serde(default)]
    pub semi_major_axis_km: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub longitude_ascending_node_deg: f64,
    #[serde(default)]
    pub argument_periapsis_deg: f64,
    /// Mean anomaly at epoch (degrees).
    #[serde(default)]
    pub mean_anomaly_deg: f64,
    /// Orbital period (s).
    #[serde(default)]
    pub orbital_period_s: Option<f64>,

    /// Authored visual multipliers for the schematic look.
    #[serde(default)]
    pub radius_multiplier: Option<f64>,
    #[serde(default)]
    pub distance_multiplier: Option<f64>,
    #[serde(default)]
    pub tidal_lock: TidalLockOverride,
    /// Tilt a moon's orbital plane with its parent's equator.
    #[serde(default)]
    pub align_to_parent_equator: bool,
    /// Added to the mean anomaly at spawn (degrees).
    #[serde(default)]
    pub initial_phase_deg: f64,
    /// Turn about up applied after facing the parent when tidally locked.
    #[serde(default)]
    pub facing_offset_deg: f64,
}

impl BodyRecord {
    /// A minimal record; fill in the rest with the `with_*` builders.
    pub fn new(id: impl Into<String>, kind: BodyKind, radius_km: f64) -> Self {
        Self {
            id: id.into(),
            is_reference: false,
            is_hypothetical: false,
            kind,
            parent_id: None,
            order_from_parent: None,
            radius_km,
            rotation_period_s: None,
            axial_tilt_deg: 0.0,
            semi_major_axis_km: 0.0,
            eccentricity: 0.0,
            inclination_deg: 0.0,
            longitude_ascending_node_deg: 0.0,
            argument_periapsis_deg: 0.0,
            mean_anomaly_deg: 0.0,
            orbital_period_s: None,
            radius_multiplier: None,
            distance_multiplier: None,
            tidal_lock: TidalLockOverride::Auto,
            align_to_parent_equator: false,
            initial_phase_deg: 0.0,
            facing_offset_deg: 0.0,
        }
    }

    /// The reference star.
    pub fn star(id: impl Into<String>, radius_km: f64) -> Self {
        let mut record = Self::new(id, BodyKind::Star, radius_km);
        record.is_reference = true;
        record
    }

    // -- Builder pattern --

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order_from_parent = Some(order);
        self
    }

    /// Circular-ish orbit: semi-major axis (km), eccentricity, period (s).
    pub fn with_orbit(mut self, semi_major_axis_km: f64, eccentricity: f64, period_s: f64) -> Self {
        self.semi_major_axis_km = semi_major_axis_km;
        self.eccentricity = eccentricity;
        self.orbital_period_s = Some(period_s);
        self
    }

    /// Orientation of the orbit (degrees).
    pub fn with_orientation(mut self, inclination: f64, ascending_node: f64, periapsis: f64) -> Self {
        self.inclination_deg = inclination;
        self.longitude_ascending_node_deg = ascending_node;
        self.argument_periapsis_deg = periapsis;
        self
    }

    pub fn with_mean_anomaly(mut self, mean_anomaly_deg: f64) -> Self {
        self.mean_anomaly_deg = mean_anomaly_deg;
        self
    }

    pub fn with_rotation(mut self, period_s: f64, axial_tilt_deg: f64) -> Self {
        self.rotation_period_s = Some(period_s);
        self.axial_tilt_deg = axial_tilt_deg;
        self
    }

    pub fn with_multipliers(mut self, radius: Option<f64>, distance: Option<f64>) -> Self {
        self.radius_multiplier = radius;
        self.distance_multiplier = distance;
        self
    }

    pub fn with_tidal_lock(mut self, lock: TidalLockOverride) -> Self {
        self.tidal_lock = lock;
        self
    }

    pub fn with_phase(mut self, initial_phase_deg: f64) -> Self {
        self.initial_phase_deg = initial_phase_deg;
        self
    }

    pub fn aligned_to_parent_equator(mut self) -> Self {
        self.align_to_parent_equator = true;
        self
    }
}

/// A full dataset: every body of one star system.
/// Loaded from a JSON file by the host, or built in code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub bodies: Vec<BodyRecord>,
}

impl Dataset {
    pub fn new(bodies: Vec<BodyRecord>) -> Self {
        Self { bodies }
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a record by key.
    pub fn get(&self, id: &str) -> Option<&BodyRecord> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// The set of body keys, used to decide between in-place reload and respawn.
    pub fn id_set(&self) -> BTreeSet<&str> {
        self.bodies.iter().map(|b| b.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
