use serde::{Deserialize, Serialize};

/// Index of a body in the engine's arena.
/// Stable for the lifetime of one spawn; invalidated by a respawning reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broad classification of a celestial body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,
    Planet,
    DwarfPlanet,
    Moon,
    #[default]
    Other,
}

impl BodyKind {
    /// Numeric code used by the snapshot wire format.
    pub fn code(self) -> f32 {
        match self {
            BodyKind::Star => 0.0,
            BodyKind::Planet => 1.0,
            BodyKind::DwarfPlanet => 2.0,
            BodyKind::Moon => 3.0,
            BodyKind::Other => 4.0,
        }
    }
}

/// Per-body tidal-lock override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TidalLockOverride {
    /// Decide from the rotation/orbit period ratio.
    #[default]
    Auto,
    ForceOn,
    ForceOff,
}

/// Optional presentation elements the UI can switch on and off.
/// These never influence kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualToggle {
    OrbitPaths,
    AxisIndicators,
    Labels,
}

impl VisualToggle {
    /// Decode the numeric id used across the wasm boundary.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(VisualToggle::OrbitPaths),
            1 => Some(VisualToggle::AxisIndicators),
            2 => Some(VisualToggle::Labels),
            _ => None,
        }
    }
}

/// Current on/off state of every [`VisualToggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualToggles {
    pub orbit_paths: bool,
    pub axis_indicators: bool,
    pub labels: bool,
}

impl Default for VisualToggles {
    fn default() -> Self {
        Self {
            orbit_paths: true,
            axis_indicators: false,
            labels: true,
        }
    }
}

impl VisualToggles {
    pub fn set(&mut self, toggle: VisualToggle, on: bool) {
        match toggle {
            VisualToggle::OrbitPaths => self.orbit_paths = on,
            VisualToggle::AxisIndicators => self.axis_indicators = on,
            VisualToggle::Labels => self.labels = on,
        }
    }

    pub fn is_on(&self, toggle: VisualToggle) -> bool {
        match toggle {
            VisualToggle::OrbitPaths => self.orbit_paths,
            VisualToggle::AxisIndicators => self.axis_indicators,
            VisualToggle::Labels => self.labels,
        }
    }
}
