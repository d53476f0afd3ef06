// core/scale.rs
//
// Visual scale context and the blender that turns dataset truth into scene
// sizes. Every multiplier is blended by one realism weight:
//   0.0 → schematic (authored per-body multipliers + per-type profile)
//   1.0 → true to data (only the realistic global scales remain)
//
// Composition is multiplicative; only the blend between two candidate values
// of the same multiplier is linear.

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::types::BodyKind;
use crate::core::math::{self, lerp};

/// Kilometers per astronomical unit.
pub const AU_KM: f64 = 149_597_870.7;

/// Fewest points an orbit path is ever sampled with.
pub const MIN_PATH_SAMPLES: usize = 3;

/// A value with a schematic and a realistic setting, blended by realism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePair {
    pub schematic: f64,
    pub realistic: f64,
}

impl ProfilePair {
    pub const fn new(schematic: f64, realistic: f64) -> Self {
        Self { schematic, realistic }
    }

    /// Same value in both profiles.
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Blend at realism weight `w`.
    #[inline]
    pub fn at(&self, w: f64) -> f64 {
        lerp(self.schematic, self.realistic, w)
    }
}

/// Per-type multipliers of the schematic look. Faded towards 1.0 as realism
/// rises, fully gone at realism 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeScaleProfile {
    pub moon_radius: f64,
    pub dwarf_radius: f64,
    pub small_planet_radius: f64,
    pub large_planet_radius: f64,
    pub other_radius: f64,
    /// Planets at or above this radius use `large_planet_radius`.
    pub large_planet_cutoff_km: f64,

    /// Inner planets: `inner_distance_base + inner_spacing_bias × order`.
    pub inner_distance_base: f64,
    pub inner_spacing_bias: f64,
    /// Bodies at or beyond this distance from the star count as outer.
    pub outer_cutoff_au: f64,
    pub outer_planet_distance: f64,
    pub outer_dwarf_distance: f64,
    /// Applied to every moon regardless of its parent.
    pub moon_distance: f64,
}

impl Default for TypeScaleProfile {
    fn default() -> Self {
        Self {
            moon_radius: 20.0,
            dwarf_radius: 40.0,
            small_planet_radius: 30.0,
            large_planet_radius: 8.0,
            other_radius: 20.0,
            large_planet_cutoff_km: 20_000.0,
            inner_distance_base: 1.0,
            inner_spacing_bias: 0.25,
            outer_cutoff_au: 5.0,
            outer_planet_distance: 0.35,
            outer_dwarf_distance: 0.3,
            moon_distance: 12.0,
        }
    }
}

impl TypeScaleProfile {
    /// Profile that changes nothing, for datasets that are already tuned.
    pub fn neutral() -> Self {
        Self {
            moon_radius: 1.0,
            dwarf_radius: 1.0,
            small_planet_radius: 1.0,
            large_planet_radius: 1.0,
            other_radius: 1.0,
            large_planet_cutoff_km: 20_000.0,
            inner_distance_base: 1.0,
            inner_spacing_bias: 0.0,
            outer_cutoff_au: 5.0,
            outer_planet_distance: 1.0,
            outer_dwarf_distance: 1.0,
            moon_distance: 1.0,
        }
    }

    /// Schematic radius multiplier for a body.
    pub fn radius_for(&self, subject: &ScaleSubject) -> f64 {
        match subject.kind {
            BodyKind::Star => 1.0,
            BodyKind::Moon => self.moon_radius,
            BodyKind::DwarfPlanet => self.dwarf_radius,
            BodyKind::Planet if subject.radius_km >= self.large_planet_cutoff_km => {
                self.large_planet_radius
            }
            BodyKind::Planet => self.small_planet_radius,
            BodyKind::Other => self.other_radius,
        }
    }

    /// Schematic distance multiplier for a body. Order and band rules only
    /// apply to bodies orbiting the reference star.
    pub fn distance_for(&self, subject: &ScaleSubject) -> f64 {
        if subject.kind == BodyKind::Moon {
            return self.moon_distance;
        }
        if !subject.orbits_reference {
            return 1.0;
        }
        let outer = subject.semi_major_axis_km / AU_KM >= self.outer_cutoff_au;
        let inner = self.inner_distance_base
            + self.inner_spacing_bias * subject.order.unwrap_or(0) as f64;
        match subject.kind {
            BodyKind::Planet if outer => self.outer_planet_distance,
            BodyKind::DwarfPlanet if outer => self.outer_dwarf_distance,
            BodyKind::Planet | BodyKind::DwarfPlanet => inner,
            _ => 1.0,
        }
    }
}

/// Shared visual scale state. Mutated by the UI, read by every body on
/// every tick. Every setter bumps `generation`, which bodies compare with
/// their cached generation instead of comparing floats, so fields are only
/// reachable through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualScaleContext {
    /// Configured rendered diameter of the reference star (scene units).
    reference_diameter: f64,
    /// Kilometers per scene unit for orbital distances.
    km_per_unit: f64,
    global_radius_scale: ProfilePair,
    global_distance_scale: ProfilePair,
    type_profile: TypeScaleProfile,
    /// Points per sampled orbit path.
    orbit_path_samples: usize,
    orbit_line_width: ProfilePair,
    /// Minimum gap between a moon's surface and its parent's surface.
    moon_clearance: f64,
    #[serde(deserialize_with = "clamped_realism")]
    realism: f64,
    #[serde(skip)]
    generation: u64,
}

/// Realism read from config goes through the same [0, 1] clamp as `set_realism`.
fn clamped_realism<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let realism = f64::deserialize(deserializer)?;
    if !realism.is_finite() {
        log::warn!("config realism {realism} is not finite; using 0");
        return Ok(0.0);
    }
    if !(0.0..=1.0).contains(&realism) {
        log::warn!("config realism {realism} clamped to [0, 1]");
    }
    Ok(realism.clamp(0.0, 1.0))
}

impl Default for VisualScaleContext {
    fn default() -> Self {
        Self {
            reference_diameter: 1.0,
            // One solar diameter per unit keeps realistic sizes and distances consistent
            km_per_unit: 1_391_400.0,
            global_radius_scale: ProfilePair::fixed(1.0),
            global_distance_scale: ProfilePair::new(0.25, 1.0),
            type_profile: TypeScaleProfile::default(),
            orbit_path_samples: 128,
            orbit_line_width: ProfilePair::new(0.02, 0.005),
            moon_clearance: 0.05,
            realism: 0.0,
            generation: 0,
        }
    }
}

impl VisualScaleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_realism(mut self, realism: f64) -> Self {
        self.set_realism(realism);
        self
    }

    pub fn with_type_profile(mut self, profile: TypeScaleProfile) -> Self {
        self.set_type_profile(profile);
        self
    }

    /// Realism weight in [0, 1].
    pub fn realism(&self) -> f64 {
        self.realism
    }

    /// Set the realism weight, clamped to [0, 1]. Non-finite input is ignored.
    pub fn set_realism(&mut self, realism: f64) {
        if !realism.is_finite() {
            log::warn!("ignoring non-finite realism weight {realism}");
            return;
        }
        self.realism = realism.clamp(0.0, 1.0);
        self.touch();
    }

    pub fn reference_diameter(&self) -> f64 {
        self.reference_diameter
    }

    pub fn set_reference_diameter(&mut self, diameter: f64) {
        self.reference_diameter = diameter;
        self.touch();
    }

    pub fn km_per_unit(&self) -> f64 {
        self.km_per_unit
    }

    pub fn set_km_per_unit(&mut self, km_per_unit: f64) {
        self.km_per_unit = km_per_unit;
        self.touch();
    }

    pub fn global_radius_scale(&self) -> ProfilePair {
        self.global_radius_scale
    }

    pub fn set_global_radius_scale(&mut self, scale: ProfilePair) {
        self.global_radius_scale = scale;
        self.touch();
    }

    pub fn global_distance_scale(&self) -> ProfilePair {
        self.global_distance_scale
    }

    pub fn set_global_distance_scale(&mut self, scale: ProfilePair) {
        self.global_distance_scale = scale;
        self.touch();
    }

    pub fn type_profile(&self) -> &TypeScaleProfile {
        &self.type_profile
    }

    pub fn set_type_profile(&mut self, profile: TypeScaleProfile) {
        self.type_profile = profile;
        self.touch();
    }

    pub fn orbit_path_samples(&self) -> usize {
        self.orbit_path_samples
    }

    pub fn set_orbit_path_samples(&mut self, samples: usize) {
        self.orbit_path_samples = samples;
        self.touch();
    }

    pub fn orbit_line_width(&self) -> ProfilePair {
        self.orbit_line_width
    }

    pub fn set_orbit_line_width(&mut self, width: ProfilePair) {
        self.orbit_line_width = width;
        self.touch();
    }

    pub fn moon_clearance(&self) -> f64 {
        self.moon_clearance
    }

    pub fn set_moon_clearance(&mut self, clearance: f64) {
        self.moon_clearance = clearance;
        self.touch();
    }

    /// Current generation. Changes whenever anything in the context changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark the context as changed.
    pub fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn global_radius(&self) -> f64 {
        self.global_radius_scale.at(self.realism)
    }

    pub fn global_distance(&self) -> f64 {
        self.global_distance_scale.at(self.realism)
    }
}

/// The reference star as measured in phase 1: every other diameter is a
/// ratio against its radius, times its rendered diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAnchor {
    /// Rendered diameter (scene units).
    pub diameter: f64,
    /// Physical radius (km).
    pub radius_km: f64,
}

/// The body facts the blender needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSubject {
    pub kind: BodyKind,
    pub radius_km: f64,
    pub semi_major_axis_km: f64,
    pub order: Option<u32>,
    /// Whether the body's parent is the reference star.
    pub orbits_reference: bool,
    pub radius_multiplier: Option<f64>,
    pub distance_multiplier: Option<f64>,
}

/// Per-body radius multiplier: authored value and type profile, each blended
/// towards 1.0 by realism. Excludes the global scale.
pub fn body_radius_multiplier(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    let w = ctx.realism();
    let authored = lerp(subject.radius_multiplier.unwrap_or(1.0), 1.0, w);
    let profile = lerp(ctx.type_profile.radius_for(subject), 1.0, w);
    authored * profile
}

/// Per-body distance multiplier. Excludes the global scale.
pub fn body_distance_multiplier(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    let w = ctx.realism();
    let authored = lerp(subject.distance_multiplier.unwrap_or(1.0), 1.0, w);
    let profile = lerp(ctx.type_profile.distance_for(subject), 1.0, w);
    authored * profile
}

/// Complete radius multiplier, global scale included.
pub fn effective_radius_multiplier(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    body_radius_multiplier(subject, ctx) * ctx.global_radius()
}

/// Complete distance multiplier, global scale included.
pub fn effective_distance_multiplier(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    body_distance_multiplier(subject, ctx) * ctx.global_distance()
}

/// Rendered diameter of the reference star. This is the anchor every other
/// diameter is measured against.
pub fn reference_diameter(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    let authored = lerp(subject.radius_multiplier.unwrap_or(1.0), 1.0, ctx.realism());
    ctx.reference_diameter * authored
}

/// Measure the reference star.
pub fn measure_anchor(subject: &ScaleSubject, ctx: &VisualScaleContext) -> ScaleAnchor {
    ScaleAnchor {
        diameter: reference_diameter(subject, ctx),
        radius_km: subject.radius_km,
    }
}

/// Rendered diameter of a dependent body, given the measured reference star.
pub fn body_diameter(subject: &ScaleSubject, ctx: &VisualScaleContext, anchor: ScaleAnchor) -> f64 {
    let ratio = subject.radius_km / math::floor_abs(anchor.radius_km);
    anchor.diameter * ratio * effective_radius_multiplier(subject, ctx)
}

/// Semi-major axis in scene units.
pub fn scaled_semi_major_axis(subject: &ScaleSubject, ctx: &VisualScaleContext) -> f64 {
    subject.semi_major_axis_km / math::floor_abs(ctx.km_per_unit)
        * effective_distance_multiplier(subject, ctx)
}

/// Presentation settings for orbit lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub segments: usize,
}

pub fn line_style(ctx: &VisualScaleContext) -> LineStyle {
    LineStyle {
        width: ctx.orbit_line_width.at(ctx.realism()),
        segments: ctx.orbit_path_samples.max(MIN_PATH_SAMPLES),
    }
}
