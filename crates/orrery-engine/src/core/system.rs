use std::collections::HashMap;
use glam::{DQuat, DVec3};

use crate::api::types::{BodyId, BodyKind, VisualToggles};
use crate::assets::dataset::{BodyRecord, Dataset};
use crate::components::body::BodyState;
use crate::core::math;
use crate::core::orbit;
use crate::core::resolver::{self, ResolvedOrder};
use crate::core::scale::{self, ScaleAnchor, VisualScaleContext};
use crate::core::spin::{self, SpinState, TidalLockSettings};
use crate::error::ConfigResult;

/// Flat arena of body states, stored in initialization order.
/// `BodyId(i)` is slot `i`, and every parent sits in a lower slot than its
/// children, so one forward pass updates parents before children.
#[derive(Debug, Clone)]
pub struct StarSystem {
    bodies: Vec<BodyState>,
    by_key: HashMap<String, BodyId>,
    /// The reference star as last measured.
    anchor: ScaleAnchor,
}

/// Phase 1 of construction: records and their resolved order.
pub struct SystemBuilder<'a> {
    records: &'a [BodyRecord],
    resolved: &'a ResolvedOrder,
    slots: Vec<BodyId>,
}

/// Phase 1 result: the reference star is spawned and measured.
pub struct ReferencePhase<'a> {
    builder: SystemBuilder<'a>,
    reference: BodyState,
    anchor: ScaleAnchor,
}

impl<'a> SystemBuilder<'a> {
    pub fn new(records: &'a [BodyRecord], resolved: &'a ResolvedOrder) -> Self {
        let mut slots = vec![BodyId(0); records.len()];
        for (pos, &record) in resolved.order.iter().enumerate() {
            slots[record] = BodyId(pos as u32);
        }
        Self { records, resolved, slots }
    }

    fn spawn(&self, record_index: usize) -> BodyState {
        let record = &self.records[record_index];
        let parent_record = self.resolved.parents[record_index];
        let orbits_reference = parent_record == Some(self.resolved.reference);
        BodyState::new(
            self.slots[record_index],
            record,
            parent_record.map(|p| self.slots[p]),
            orbits_reference,
        )
    }

    /// Spawn the reference star and measure its rendered diameter and
    /// physical radius.
    pub fn spawn_reference(self, ctx: &VisualScaleContext) -> ReferencePhase<'a> {
        let mut reference = self.spawn(self.resolved.reference);
        let anchor = measure_reference(&mut reference, ctx);
        log::debug!(
            "reference '{}' measured at {} units for {} km",
            reference.key, anchor.diameter, anchor.radius_km
        );
        ReferencePhase {
            builder: self,
            reference,
            anchor,
        }
    }
}

impl<'a> ReferencePhase<'a> {
    pub fn anchor(&self) -> ScaleAnchor {
        self.anchor
    }

    pub fn measured_diameter(&self) -> f64 {
        self.anchor.diameter
    }

    /// Phase 2: spawn every dependent body, scaled against `anchor`.
    pub fn spawn_dependents(self, anchor: ScaleAnchor, ctx: &VisualScaleContext) -> StarSystem {
        let ReferencePhase { builder, reference, .. } = self;
        let mut bodies = Vec::with_capacity(builder.resolved.order.len());
        bodies.push(reference);
        for &record_index in builder.resolved.order.iter().skip(1) {
            let mut body = builder.spawn(record_index);
            rescale(&mut body, ctx, anchor);
            bodies.push(body);
        }
        let by_key = bodies.iter().map(|b| (b.key.clone(), b.id)).collect();
        StarSystem {
            bodies,
            by_key,
            anchor,
        }
    }
}

/// Size the reference star from its own record.
fn measure_reference(body: &mut BodyState, ctx: &VisualScaleContext) -> ScaleAnchor {
    let subject = body.constants.scale_subject(false);
    let anchor = scale::measure_anchor(&subject, ctx);
    body.diameter = anchor.diameter;
    body.scale_generation = Some(ctx.generation());
    anchor
}

/// Recompute the scale-dependent state of a non-reference body.
fn rescale(body: &mut BodyState, ctx: &VisualScaleContext, anchor: ScaleAnchor) {
    let subject = body.constants.scale_subject(body.orbits_reference);
    body.diameter = scale::body_diameter(&subject, ctx, anchor);
    body.scaled_orbit = body
        .constants
        .orbit_km
        .with_semi_major_axis(scale::scaled_semi_major_axis(&subject, ctx));
    body.scale_generation = Some(ctx.generation());
}

/// Push a moon out to the minimum clearance from its parent, keeping the
/// direction. Zero offsets are pushed along +X.
pub fn clamp_clearance(offset: DVec3, parent_diameter: f64, own_diameter: f64, clearance: f64) -> DVec3 {
    let minimum = (parent_diameter + own_diameter) * 0.5 + clearance;
    if offset.length() >= minimum {
        return offset;
    }
    match math::try_normalize(offset) {
        Some(direction) => direction * minimum,
        None => {
            log::debug!("moon offset is zero; pushing it out along +X");
            DVec3::X * minimum
        }
    }
}

impl StarSystem {
    /// Resolve and spawn a dataset with two-pass initialization.
    pub fn build(dataset: &Dataset, ctx: &VisualScaleContext) -> ConfigResult<Self> {
        let resolved = resolver::resolve_order(&dataset.bodies)?;
        Ok(Self::from_resolved(&dataset.bodies, &resolved, ctx))
    }

    pub fn from_resolved(records: &[BodyRecord], resolved: &ResolvedOrder, ctx: &VisualScaleContext) -> Self {
        let phase = SystemBuilder::new(records, resolved).spawn_reference(ctx);
        let anchor = phase.anchor();
        let system = phase.spawn_dependents(anchor, ctx);
        log::info!("spawned {} bodies", system.len());
        system
    }

    /// Whether `resolved` would produce exactly this arena layout.
    pub fn matches_layout(&self, records: &[BodyRecord], resolved: &ResolvedOrder) -> bool {
        if resolved.order.len() != self.bodies.len() {
            return false;
        }
        let builder = SystemBuilder::new(records, resolved);
        resolved.order.iter().zip(&self.bodies).all(|(&record_index, body)| {
            records[record_index].id == body.key
                && resolved.parents[record_index].map(|p| builder.slots[p]) == body.parent
        })
    }

    /// Re-apply records to existing bodies, keeping every `BodyId`.
    /// The caller checks `matches_layout` first.
    pub(crate) fn reapply(&mut self, records: &[BodyRecord], resolved: &ResolvedOrder) {
        let builder = SystemBuilder::new(records, resolved);
        for (&record_index, body) in resolved.order.iter().zip(self.bodies.iter_mut()) {
            let parent = resolved.parents[record_index];
            body.reapply(
                &records[record_index],
                parent.map(|p| builder.slots[p]),
                parent == Some(resolved.reference),
            );
        }
    }

    /// Recompute every body for simulated time `elapsed`, parents first.
    pub fn update(
        &mut self,
        elapsed: f64,
        ctx: &VisualScaleContext,
        lock: &TidalLockSettings,
        toggles: &VisualToggles,
    ) {
        let generation = ctx.generation();
        let mut anchor = self.anchor;

        for i in 0..self.bodies.len() {
            let (before, rest) = self.bodies.split_at_mut(i);
            let body = &mut rest[0];
            let parent = match body.parent {
                Some(p) => {
                    debug_assert!(p.index() < i, "parent of '{}' not updated first", body.key);
                    Some(&before[p.index()])
                }
                None => None,
            };

            if body.scale_generation != Some(generation) {
                if body.is_reference() {
                    anchor = measure_reference(body, ctx);
                } else {
                    rescale(body, ctx, anchor);
                }
            }

            update_body(body, parent, elapsed, ctx, lock);

            if toggles.orbit_paths && !body.path.is_current(generation) {
                let plane = equator_plane(body, parent);
                body.path.rebuild(&body.scaled_orbit, plane, ctx);
            }
        }

        self.anchor = anchor;
    }

    // -- Queries --

    pub fn get(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(id.index())
    }

    /// Find a body by dataset key.
    pub fn find(&self, key: &str) -> Option<&BodyState> {
        self.by_key.get(key).and_then(|&id| self.get(id))
    }

    pub fn id_of(&self, key: &str) -> Option<BodyId> {
        self.by_key.get(key).copied()
    }

    /// Bodies in update order.
    pub fn iter(&self) -> impl Iterator<Item = &BodyState> {
        self.bodies.iter()
    }

    pub fn reference(&self) -> Option<&BodyState> {
        self.bodies.first()
    }

    /// Direct children of a body.
    pub fn children(&self, id: BodyId) -> impl Iterator<Item = &BodyState> {
        self.bodies.iter().filter(move |b| b.parent == Some(id))
    }

    /// Sampled orbit path of a body in world space (around its parent's
    /// current position). Empty until built, or for bodies without an orbit.
    pub fn orbit_path_world(&self, id: BodyId) -> Vec<DVec3> {
        let Some(body) = self.get(id) else { return Vec::new() };
        let origin = body
            .parent
            .and_then(|p| self.get(p))
            .map_or(DVec3::ZERO, |p| p.position);
        body.path.points().iter().map(|&p| origin + p).collect()
    }

    /// Sampled orbit path in the parent's frame.
    pub fn orbit_path(&self, id: BodyId) -> &[DVec3] {
        match self.get(id) {
            Some(body) => body.path.points(),
            None => &[],
        }
    }

    /// The reference star's measured diameter and radius.
    pub fn anchor(&self) -> ScaleAnchor {
        self.anchor
    }

    pub fn anchor_diameter(&self) -> f64 {
        self.anchor.diameter
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Rotation applied to a body's orbital plane: its parent's tilt when the
/// body asks for equator alignment, identity otherwise.
fn equator_plane(body: &BodyState, parent: Option<&BodyState>) -> DQuat {
    match parent {
        Some(p) if body.constants.align_to_parent_equator => {
            spin::tilt_rotation(p.constants.axial_tilt_deg)
        }
        _ => DQuat::IDENTITY,
    }
}

/// Position and orientation of one body for this tick. The parent, if any,
/// has already been updated.
fn update_body(
    body: &mut BodyState,
    parent: Option<&BodyState>,
    elapsed: f64,
    ctx: &VisualScaleContext,
    lock: &TidalLockSettings,
) {
    debug_assert!(body.is_initialized(), "'{}' solved before initialization", body.key);

    let parent_position = parent.map_or(DVec3::ZERO, |p| p.position);

    if body.has_orbit() {
        let mut offset = equator_plane(body, parent) * orbit::solve_offset(&body.scaled_orbit, elapsed);
        if body.kind() == BodyKind::Moon {
            if let Some(p) = parent {
                offset = clamp_clearance(offset, p.diameter, body.diameter, ctx.moon_clearance());
            }
        }
        body.local_offset = offset;
    } else {
        body.local_offset = DVec3::ZERO;
    }
    body.position = parent_position + body.local_offset;

    let c = &body.constants;
    body.spin_state = spin::evaluate_spin_state(&c.spin_subject(), lock);
    body.orientation = match body.spin_state {
        SpinState::FreeSpin => {
            spin::free_spin_orientation(elapsed, c.rotation_period, c.spin_direction, c.axial_tilt_deg)
        }
        SpinState::TidalLocked => spin::tidal_lock_orientation(
            body.position,
            parent_position,
            c.axial_tilt_deg,
            c.facing_offset_deg,
        ),
    };
}
