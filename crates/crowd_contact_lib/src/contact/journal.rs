//! Interaction journal: the persistent per-contact tangential-displacement
//! store (`spec.md` §4.6). Keyed by composite tuples rather than a pointer
//! graph, per the redesign note in `spec.md` §9.

use std::collections::{HashMap, HashSet};

use crate::{
    ids::{AgentId, SegmentIndex, ShapeId, WallId},
    math::Vec2,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub agent_i: AgentId,
    pub agent_j: AgentId,
    pub disk_i: ShapeId,
    pub disk_j: ShapeId,
}

impl PairKey {
    /// Constructs a key with `agent_i < agent_j`, matching the "only i<j is
    /// stored" invariant in `spec.md` §3/§4.6. Panics if `a == b`; agents
    /// never contact their own disks (`spec.md` Non-goals).
    pub fn ordered(a: &AgentId, disk_a: &ShapeId, b: &AgentId, disk_b: &ShapeId) -> Self {
        assert_ne!(a, b, "self-contacts between disks of the same agent are out of scope");
        if a < b {
            Self { agent_i: a.clone(), agent_j: b.clone(), disk_i: disk_a.clone(), disk_j: disk_b.clone() }
        } else {
            Self { agent_i: b.clone(), agent_j: a.clone(), disk_i: disk_b.clone(), disk_j: disk_a.clone() }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WallKey {
    pub agent: AgentId,
    pub disk: ShapeId,
    pub wall: WallId,
    pub segment: SegmentIndex,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactRecord {
    pub xi: Vec2,
    pub f_n: Vec2,
    pub f_t: Vec2,
}

/// Missing entries are treated as `xi = 0` (`spec.md` §4.6/§7); a missing
/// journal file on the very first run is not an error (handled by the
/// `io::interactions` loader, which just returns an empty `Journal`).
#[derive(Default)]
pub struct Journal {
    pairs: HashMap<PairKey, ContactRecord>,
    walls: HashMap<WallKey, ContactRecord>,
    touched_pairs: HashSet<PairKey>,
    touched_walls: HashSet<WallKey>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-macro-step "touched" bookkeeping; call once before the
    /// first sub-step.
    pub fn begin_macro_step(&mut self) {
        self.touched_pairs.clear();
        self.touched_walls.clear();
    }

    /// Reads the current tangential displacement for a pair contact,
    /// seeding a zeroed entry and marking it touched if it wasn't already
    /// present.
    pub fn pair_xi(&mut self, key: &PairKey) -> Vec2 {
        self.touched_pairs.insert(key.clone());
        self.pairs.get(key).map(|r| r.xi).unwrap_or(Vec2::ZERO)
    }

    pub fn wall_xi(&mut self, key: &WallKey) -> Vec2 {
        self.touched_walls.insert(key.clone());
        self.walls.get(key).map(|r| r.xi).unwrap_or(Vec2::ZERO)
    }

    pub fn set_pair(&mut self, key: PairKey, record: ContactRecord) {
        self.touched_pairs.insert(key.clone());
        self.pairs.insert(key, record);
    }

    pub fn set_wall(&mut self, key: WallKey, record: ContactRecord) {
        self.touched_walls.insert(key.clone());
        self.walls.insert(key, record);
    }

    /// Drops any entry not touched by any sub-step this macro step
    /// (`spec.md` §4.4 step 7).
    pub fn end_macro_step_cleanup(&mut self) {
        self.pairs.retain(|k, _| self.touched_pairs.contains(k));
        self.walls.retain(|k, _| self.touched_walls.contains(k));
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, &ContactRecord)> {
        self.pairs.iter()
    }

    pub fn walls(&self) -> impl Iterator<Item = (&WallKey, &ContactRecord)> {
        self.walls.iter()
    }

    pub fn insert_pair_seed(&mut self, key: PairKey, record: ContactRecord) {
        self.pairs.insert(key, record);
    }

    pub fn insert_wall_seed(&mut self, key: WallKey, record: ContactRecord) {
        self.walls.insert(key, record);
    }
}
