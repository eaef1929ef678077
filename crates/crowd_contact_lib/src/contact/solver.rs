//! The contact solver inner loop (`spec.md` §4.4): per-sub-step detection,
//! Hertz-like spring-dashpot force assembly with Coulomb-friction clipping,
//! tangential-history maintenance, and semi-implicit Euler integration over
//! the active subset.
//!
//! The force model is grounded in the teacher's own penetration-driven
//! corrective displacement (`motte_lib/src/navigation/avoidance.rs`:
//! `f = d - (r_a + r_b)`, tangential clip against `mu * d`) and in the wider
//! pack's dedicated rigid-body solvers — `box2d-lite`'s `arbiter.rs`
//! (pre-step / apply-impulse split over a body pair) and rapier's
//! `contact_pair.rs` / `velocity_constraint.rs` (accumulated per-contact
//! state carried across steps) — adapted here from impulse accumulation to
//! the spring-dashpot force law `spec.md` requires.

use std::collections::{HashMap, HashSet};

use crate::{
    agent::Disk,
    contact::journal::{ContactRecord, Journal, PairKey, WallKey},
    ids::AgentId,
    math::{cross, cross_scalar_vec, segment_point_distance, Vec2},
    scene::Scene,
};

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    position: Vec2,
    theta: f32,
    velocity: Vec2,
    omega: f32,
}

/// Runs `scene.sub_steps()` mechanical sub-steps over the active subset,
/// maintaining `journal` across them, then drops any journal entry that saw
/// no live contact during the macro step (`spec.md` §4.4 step 7).
pub fn run_macro_step(scene: &mut Scene, journal: &mut Journal, active: &HashSet<AgentId>) {
    journal.begin_macro_step();
    for _ in 0..scene.sub_steps() {
        run_sub_step(scene, journal, active);
    }
    journal.end_macro_step_cleanup();
}

fn run_sub_step(scene: &mut Scene, journal: &mut Journal, active: &HashSet<AgentId>) {
    let dt_mech = scene.dt_mech;

    // Re-read all current positions before writing any updates, so force
    // assembly never depends on another contact's update within this
    // sub-step (`spec.md` §4.4 "Ordering and determinism").
    let snapshot: HashMap<AgentId, Snapshot> = active
        .iter()
        .filter_map(|id| {
            scene.agents.get(id).map(|a| {
                (id.clone(), Snapshot { position: a.state.position, theta: a.state.theta, velocity: a.state.velocity, omega: a.state.omega })
            })
        })
        .collect();

    let mut active_ids: Vec<&AgentId> = active.iter().collect();
    active_ids.sort();

    let mut forces: HashMap<AgentId, Vec2> = active_ids.iter().map(|id| ((*id).clone(), Vec2::ZERO)).collect();
    let mut torques: HashMap<AgentId, f32> = active_ids.iter().map(|id| ((*id).clone(), 0.0)).collect();

    accumulate_pair_contacts(scene, journal, &active_ids, active, &snapshot, dt_mech, &mut forces, &mut torques);
    accumulate_wall_contacts(scene, journal, &active_ids, &snapshot, dt_mech, &mut forces, &mut torques);
    accumulate_driving_relaxation(scene, &active_ids, &snapshot, &mut forces, &mut torques);

    for id in active_ids {
        let agent = scene.agents.get_mut(id).expect("active id refers to a live agent");
        let f = forces[id];
        let tau = torques[id];
        agent.state.velocity += (f / agent.mass) * dt_mech;
        agent.state.omega += (tau / agent.inertia) * dt_mech;
        agent.state.position += agent.state.velocity * dt_mech;
        agent.state.theta += agent.state.omega * dt_mech;
    }
}

#[allow(clippy::too_many_arguments)]
fn accumulate_pair_contacts(
    scene: &Scene,
    journal: &mut Journal,
    active_ids: &[&AgentId],
    active: &HashSet<AgentId>,
    snapshot: &HashMap<AgentId, Snapshot>,
    dt_mech: f32,
    forces: &mut HashMap<AgentId, Vec2>,
    torques: &mut HashMap<AgentId, f32>,
) {
    for &id_i in active_ids {
        let agent_i = &scene.agents[id_i];
        let mut neighbor_js: Vec<&AgentId> = agent_i.neighbors_agents.iter().filter(|j| active.contains(*j) && *j > id_i).collect();
        neighbor_js.sort();

        let mut disks_i: Vec<&Disk> = agent_i.disks.iter().collect();
        disks_i.sort_by(|a, b| a.id.0.cmp(&b.id.0));

        for id_j in neighbor_js {
            let agent_j = &scene.agents[id_j];
            let snap_i = snapshot[id_i];
            let snap_j = snapshot[id_j];

            let mut disks_j: Vec<&Disk> = agent_j.disks.iter().collect();
            disks_j.sort_by(|a, b| a.id.0.cmp(&b.id.0));

            for disk_a in &disks_i {
                let c_a = agent_i.disk_center_at(disk_a.offset, snap_i.position, snap_i.theta);
                for disk_b in &disks_j {
                    let c_b = agent_j.disk_center_at(disk_b.offset, snap_j.position, snap_j.theta);

                    let diff = c_a - c_b;
                    let dist = diff.length();
                    let overlap = disk_a.radius + disk_b.radius - dist;
                    if overlap <= 0.0 {
                        continue;
                    }
                    let n_hat = if dist > f32::EPSILON { diff / dist } else { Vec2::X };

                    let params = scene
                        .materials
                        .params(&disk_a.material, &disk_b.material)
                        .expect("material pair validated at load time");

                    let key = PairKey::ordered(id_i, &disk_a.id, id_j, &disk_b.id);
                    let xi_prev = journal.pair_xi(&key);

                    let r_i = c_a - snap_i.position;
                    let r_j = c_b - snap_j.position;
                    let v_rel =
                        (snap_i.velocity + cross_scalar_vec(snap_i.omega, r_i)) - (snap_j.velocity + cross_scalar_vec(snap_j.omega, r_j));
                    let v_n = v_rel.dot(n_hat);
                    let v_t = v_rel - v_n * n_hat;

                    let f_n_mag = (params.k_n * overlap - params.gamma_n * v_n).max(0.0);
                    let xi_raw = project_tangent(xi_prev + v_t * dt_mech, n_hat);
                    let f_t_raw = -params.k_t * xi_raw - params.gamma_t * v_t;
                    let (f_t_vec, xi) = coulomb_clip(f_t_raw, xi_raw, f_n_mag, params.mu, params.k_t);

                    journal.set_pair(key, ContactRecord { xi, f_n: f_n_mag * n_hat, f_t: f_t_vec });

                    let total = f_n_mag * n_hat + f_t_vec;
                    *forces.get_mut(id_i).expect("forces seeded for every active id") += total;
                    *forces.get_mut(id_j).expect("forces seeded for every active id") -= total;
                    *torques.get_mut(id_i).expect("torques seeded for every active id") += cross(r_i, total);
                    *torques.get_mut(id_j).expect("torques seeded for every active id") -= cross(r_j, total);
                }
            }
        }
    }
}

fn accumulate_wall_contacts(
    scene: &Scene,
    journal: &mut Journal,
    active_ids: &[&AgentId],
    snapshot: &HashMap<AgentId, Snapshot>,
    dt_mech: f32,
    forces: &mut HashMap<AgentId, Vec2>,
    torques: &mut HashMap<AgentId, f32>,
) {
    for &id in active_ids {
        let agent = &scene.agents[id];
        let snap = snapshot[id];

        let mut disks: Vec<&Disk> = agent.disks.iter().collect();
        disks.sort_by(|a, b| a.id.0.cmp(&b.id.0));

        let mut wall_neighbors = agent.neighbors_walls.clone();
        wall_neighbors.sort_by(|a, b| a.0.0.cmp(&b.0.0).then(a.1 .0.cmp(&b.1 .0)));

        for (wall_id, seg_idx) in wall_neighbors {
            let wall = scene.geometry.walls.iter().find(|w| w.id == wall_id).expect("neighbor list references a live wall");
            let (a, b) = wall.segment(seg_idx);

            for disk in &disks {
                let c = agent.disk_center_at(disk.offset, snap.position, snap.theta);
                let (closest, dist) = segment_point_distance(c, a, b);
                let overlap = disk.radius - dist;
                if overlap <= 0.0 {
                    continue;
                }
                let diff = c - closest;
                let n_hat = if diff.length() > f32::EPSILON { diff.normalize() } else { Vec2::X };

                let params =
                    scene.materials.params(&disk.material, &wall.material).expect("material pair validated at load time");

                let key = WallKey { agent: id.clone(), disk: disk.id.clone(), wall: wall.id.clone(), segment: seg_idx };
                let xi_prev = journal.wall_xi(&key);

                let r = c - snap.position;
                let v_rel = snap.velocity + cross_scalar_vec(snap.omega, r);
                let v_n = v_rel.dot(n_hat);
                let v_t = v_rel - v_n * n_hat;

                let f_n_mag = (params.k_n * overlap - params.gamma_n * v_n).max(0.0);
                let xi_raw = project_tangent(xi_prev + v_t * dt_mech, n_hat);
                let f_t_raw = -params.k_t * xi_raw - params.gamma_t * v_t;
                let (f_t_vec, xi) = coulomb_clip(f_t_raw, xi_raw, f_n_mag, params.mu, params.k_t);

                journal.set_wall(key, ContactRecord { xi, f_n: f_n_mag * n_hat, f_t: f_t_vec });

                let total = f_n_mag * n_hat + f_t_vec;
                *forces.get_mut(id).expect("forces seeded for every active id") += total;
                *torques.get_mut(id).expect("torques seeded for every active id") += cross(r, total);
            }
        }
    }
}

fn accumulate_driving_relaxation(
    scene: &Scene,
    active_ids: &[&AgentId],
    snapshot: &HashMap<AgentId, Snapshot>,
    forces: &mut HashMap<AgentId, Vec2>,
    torques: &mut HashMap<AgentId, f32>,
) {
    for &id in active_ids {
        let agent = &scene.agents[id];
        let snap = snapshot[id];
        let rel_force = agent.mass * (agent.desired.velocity - snap.velocity) * agent.inv_floor_damping;
        let rel_torque = agent.inertia * (agent.desired.omega - snap.omega) * agent.inv_angular_damping;
        *forces.get_mut(id).expect("forces seeded for every active id") += rel_force;
        *torques.get_mut(id).expect("torques seeded for every active id") += rel_torque;
    }
}

/// Removes any component of `xi` along the contact normal.
#[inline]
fn project_tangent(xi: Vec2, n_hat: Vec2) -> Vec2 {
    xi - xi.dot(n_hat) * n_hat
}

/// Coulomb clip: if the tangential force exceeds `mu * f_n_mag`, rescale the
/// force proportionally and rescale `xi` along its own direction so that
/// `k_t * |xi_new| == mu * f_n_mag` (sliding regime, `spec.md` §4.4 step 3).
#[inline]
fn coulomb_clip(f_t_vec: Vec2, xi: Vec2, f_n_mag: f32, mu: f32, k_t: f32) -> (Vec2, Vec2) {
    let limit = mu * f_n_mag;
    let f_t_mag = f_t_vec.length();
    if f_t_mag <= limit || f_t_mag <= f32::EPSILON {
        return (f_t_vec, xi);
    }
    let scaled_force = f_t_vec * (limit / f_t_mag);
    let xi_norm = xi.length();
    let scaled_xi = if xi_norm > f32::EPSILON && k_t > f32::EPSILON { xi * ((limit / k_t) / xi_norm) } else { xi };
    (scaled_force, scaled_xi)
}
