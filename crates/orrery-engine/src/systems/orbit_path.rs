// systems/orbit_path.rs
//
// Sampled orbit paths for presentation. Rebuilt only when the scale
// generation changes, never on plain time advance: the shape of an orbit
// does not depend on where the body currently is.

use glam::{DQuat, DVec3};

use crate::core::orbit::{self, OrbitalElements};
use crate::core::scale::{self, LineStyle, VisualScaleContext};

/// Cached path of one body, in its parent's frame.
#[derive(Debug, Clone, Default)]
pub struct OrbitPathCache {
    points: Vec<DVec3>,
    style: Option<LineStyle>,
    generation: Option<u64>,
}

impl OrbitPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cache matches the given scale generation.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == Some(generation)
    }

    pub fn invalidate(&mut self) {
        self.generation = None;
    }

    /// Resample the path. `plane` rotates the orbital plane (equator alignment).
    pub fn rebuild(&mut self, orbit: &OrbitalElements, plane: DQuat, ctx: &VisualScaleContext) {
        let style = scale::line_style(ctx);
        self.points.clear();
        self.points.extend(
            orbit::solve_path_samples(orbit, style.segments)
                .into_iter()
                .map(|p| plane * p),
        );
        self.style = Some(style);
        self.generation = Some(ctx.generation());
    }

    /// Points of the closed path; empty for bodies without an orbit.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn style(&self) -> Option<LineStyle> {
        self.style
    }
}
