//! Rigid-body agent model: a cluster of disks with a shared mass, inertia,
//! and floor/angular damping, plus its current and driving-target kinematic
//! state (`spec.md` §3).

use smallvec::SmallVec;

use crate::{
    ids::{AgentId, MaterialId, SegmentIndex, ShapeId, WallId},
    math::{rotate, Vec2},
};

/// Contact primitive: a circle at a fixed body-frame offset from the
/// agent's center of mass.
#[derive(Debug, Clone)]
pub struct Disk {
    pub id: ShapeId,
    pub radius: f32,
    pub offset: Vec2,
    pub material: MaterialId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicState {
    pub position: Vec2,
    pub theta: f32,
    pub velocity: Vec2,
    pub omega: f32,
}

/// Driving target the agent relaxes towards, either through the contact
/// solver's relaxation force (`spec.md` §4.4 step 5) or the passive
/// integrator's closed form (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, Default)]
pub struct DesiredState {
    pub velocity: Vec2,
    pub omega: f32,
    /// Carried as agent state per `spec.md` §3 but not read by any force or
    /// integration equation in `spec.md` §4 — see DESIGN.md for the
    /// resolution of this open question.
    pub theta: f32,
}

pub struct Agent {
    pub id: AgentId,
    pub mass: f32,
    pub inertia: f32,
    /// tau_t^-1, read directly from the `FloorDamping` attribute.
    pub inv_floor_damping: f32,
    /// tau_r^-1, read directly from the `AngularDamping` attribute.
    pub inv_angular_damping: f32,
    pub disks: SmallVec<[Disk; 8]>,
    /// theta0, derived once at load from the left-shoulder->right-shoulder
    /// normal of the initial disk layout.
    pub theta0: f32,
    /// max_i(|offset_i| + radius_i), used only for coarse pruning.
    pub bounding_radius: f32,
    pub state: KinematicState,
    pub desired: DesiredState,
    pub neighbors_walls: Vec<(WallId, SegmentIndex)>,
    pub neighbors_agents: Vec<AgentId>,
}

impl Agent {
    /// Builds an agent from its immutable geometry; `theta0` and
    /// `bounding_radius` are derived here and never recomputed.
    pub fn new(
        id: AgentId,
        mass: f32,
        inertia: f32,
        inv_floor_damping: f32,
        inv_angular_damping: f32,
        disks: SmallVec<[Disk; 8]>,
    ) -> Self {
        let theta0 = derive_theta0(&disks);
        let bounding_radius = disks.iter().map(|d| d.offset.length() + d.radius).fold(0.0_f32, f32::max);
        Self {
            id,
            mass,
            inertia,
            inv_floor_damping,
            inv_angular_damping,
            disks,
            theta0,
            bounding_radius,
            state: KinematicState::default(),
            desired: DesiredState::default(),
            neighbors_walls: Vec::new(),
            neighbors_agents: Vec::new(),
        }
    }

    /// Absolute center of disk `offset` at the agent's current orientation.
    #[inline]
    pub fn disk_center_at(&self, offset: Vec2, position: Vec2, theta: f32) -> Vec2 {
        position + rotate(offset, theta - self.theta0)
    }

    #[inline]
    pub fn disk_center(&self, disk: &Disk) -> Vec2 {
        self.disk_center_at(disk.offset, self.state.position, self.state.theta)
    }

    /// Velocity of the material point at world-space lever arm `r` from the
    /// center of mass: `v + omega x r`.
    #[inline]
    pub fn point_velocity(&self, r: Vec2) -> Vec2 {
        self.state.velocity + crate::math::cross_scalar_vec(self.state.omega, r)
    }
}

/// `theta0` is the angle of the unit normal to the vector from the first
/// (left-shoulder) disk offset to the last (right-shoulder) disk offset, so
/// that `theta - theta0` is the rotation already applied to the body-frame
/// offsets at the agent's current heading `theta`.
fn derive_theta0(disks: &SmallVec<[Disk; 8]>) -> f32 {
    if disks.len() < 2 {
        return 0.0;
    }
    let shoulder = disks[disks.len() - 1].offset - disks[0].offset;
    if shoulder.length_squared() < f32::EPSILON {
        return 0.0;
    }
    let normal = Vec2::new(-shoulder.y, shoulder.x).normalize();
    normal.y.atan2(normal.x)
}
