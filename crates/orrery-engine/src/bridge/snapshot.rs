//! Per-body snapshot layout, shared with the browser UI.
//!
//! Layout (all values f32, one record per body in update order):
//! ```text
//! [x, y, z, qx, qy, qz, qw, diameter, kind, parent, flags, radius]
//! ```
//! `parent` is the parent's slot (`BodyId`) or -1. `flags` is a bit set of the
//! `FLAG_*` constants, stored as a float.

use bytemuck::{Pod, Zeroable};

use crate::core::spin::SpinState;
use crate::core::system::StarSystem;

pub const FLAG_REFERENCE: u32 = 1 << 0;
pub const FLAG_HYPOTHETICAL: u32 = 1 << 1;
pub const FLAG_TIDAL_LOCKED: u32 = 1 << 2;
pub const FLAG_HAS_ORBIT: u32 = 1 << 3;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodySnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Rendered diameter in scene units.
    pub diameter: f32,
    /// `BodyKind::code`.
    pub kind: f32,
    pub parent: f32,
    pub flags: f32,
    /// Rendered radius; also pads the record to 48 bytes.
    pub radius: f32,
}

impl BodySnapshot {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

/// Snapshot of the whole system, rebuilt after every solve.
pub struct SnapshotBuffer {
    bodies: Vec<BodySnapshot>,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(64),
        }
    }

    pub fn rebuild(&mut self, system: &StarSystem) {
        self.bodies.clear();
        self.bodies.extend(system.iter().map(|body| {
            let mut flags = 0;
            if body.is_reference() {
                flags |= FLAG_REFERENCE;
            }
            if body.is_hypothetical() {
                flags |= FLAG_HYPOTHETICAL;
            }
            if body.spin_state == SpinState::TidalLocked {
                flags |= FLAG_TIDAL_LOCKED;
            }
            if body.has_orbit() {
                flags |= FLAG_HAS_ORBIT;
            }
            let q = body.orientation;
            BodySnapshot {
                x: body.position.x as f32,
                y: body.position.y as f32,
                z: body.position.z as f32,
                qx: q.x as f32,
                qy: q.y as f32,
                qz: q.z as f32,
                qw: q.w as f32,
                diameter: body.diameter as f32,
                kind: body.kind().code(),
                parent: body.parent.map_or(-1.0, |p| p.0 as f32),
                flags: flags as f32,
                radius: body.radius() as f32,
            }
        }));
    }

    pub fn bodies(&self) -> &[BodySnapshot] {
        &self.bodies
    }

    /// The snapshot as one flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.bodies)
    }

    /// Number of body records.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Raw pointer to snapshot data for wasm memory reads.
    pub fn ptr(&self) -> *const f32 {
        self.bodies.as_ptr() as *const f32
    }
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new()
    }
}
