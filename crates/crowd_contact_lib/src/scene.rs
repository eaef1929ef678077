//! Immutable geometry: domain extents and obstacle polylines. Agents live in
//! `agent.rs`; this module only holds the parts of `spec.md` §3 that never
//! change once loaded.

use std::collections::HashMap;

use crate::{
    agent::Agent,
    ids::{AgentId, MaterialId, SegmentIndex, WallId},
    material::MaterialRegistry,
    math::Vec2,
};

/// An obstacle polyline: `corners.len() - 1` segments, each between
/// consecutive corners (not closed unless the data repeats the first point).
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: WallId,
    pub material: MaterialId,
    pub corners: Vec<Vec2>,
}

impl Wall {
    /// Iterates the segments `(corner[k], corner[k+1])` with their index.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentIndex, Vec2, Vec2)> + '_ {
        self.corners.windows(2).enumerate().map(|(k, w)| (SegmentIndex(k), w[0], w[1]))
    }

    pub fn segment(&self, index: SegmentIndex) -> (Vec2, Vec2) {
        (self.corners[index.0], self.corners[index.0 + 1])
    }
}

/// Domain size and the immutable wall set. Toroidal only for the coarse
/// neighbor-pruning distance (`spec.md` §3 invariants); never for contact
/// geometry.
pub struct Geometry {
    pub lx: f32,
    pub ly: f32,
    pub walls: Vec<Wall>,
}

/// The full hydrated scene for one macro step: immutable geometry and
/// materials plus the mutable agent table. Owned explicitly by the caller
/// (or by the CLI session) rather than kept as global state — the
/// re-architecture `spec.md` §9 calls for.
pub struct Scene {
    pub geometry: Geometry,
    pub materials: MaterialRegistry,
    pub agents: HashMap<AgentId, Agent>,
    pub dt: f32,
    pub dt_mech: f32,
}

impl Scene {
    /// Number of mechanical sub-steps per macro step: `ceil(dt / dt_mech)`.
    pub fn sub_steps(&self) -> u32 {
        (self.dt / self.dt_mech).ceil() as u32
    }
}
