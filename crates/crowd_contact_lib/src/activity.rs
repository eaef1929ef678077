//! Activity gate: neighbor construction and the overlap-prediction probe
//! that decides which agents must enter the contact solver (`spec.md` §4.3).
//!
//! Grounded in the teacher's own avoidance solver
//! (`motte_lib/src/navigation/avoidance.rs::contact_solve`), which already
//! extrapolates agent positions and compares summed bounding radii plus a
//! tuned slack constant; here the same shape of computation produces a
//! boolean activity flag instead of a corrective displacement.

use std::collections::{HashMap, HashSet};

use crate::{
    agent::Agent,
    ids::AgentId,
    math::{segment_point_distance, wrapped_distance},
    scene::Geometry,
};

/// Upper bound on agent speed used to size the neighbor-pruning reach. A
/// tuned constant from the source model, not derived.
pub const V_MAX: f32 = 7.0;

/// Slack added to summed bounding radii in the overlap-prediction probe.
/// Tuned, not derived — preserved verbatim per `spec.md` §9 open questions.
pub const ACTIVITY_SLACK: f32 = 0.1;

/// Squared threshold on the desired-vs-current velocity gap
/// `(vx-vx*)^2 + (vy-vy*)^2 + (omega-omega*)^2` above which an agent is
/// flagged active even with no predicted overlap.
pub const VELOCITY_GAP_THRESHOLD_SQ: f32 = 1e-4;

/// Clears and rebuilds every agent's wall- and agent-neighbor lists. Must be
/// called at the start of every macro step; lists are considered stale
/// immediately after (`spec.md` §3 invariants).
pub fn rebuild_neighbors(geometry: &Geometry, agents: &mut HashMap<AgentId, Agent>, dt: f32) {
    let d_wall = dt * V_MAX;
    let d_agent = 2.0 * d_wall;

    for agent in agents.values_mut() {
        agent.neighbors_walls.clear();
        for wall in &geometry.walls {
            for (seg, a, b) in wall.segments() {
                let (_, dist) = segment_point_distance(agent.state.position, a, b);
                if dist < d_wall {
                    agent.neighbors_walls.push((wall.id.clone(), seg));
                }
            }
        }
        agent.neighbors_agents.clear();
    }

    let snapshot: Vec<(AgentId, crate::math::Vec2)> = agents.values().map(|a| (a.id.clone(), a.state.position)).collect();
    for i in 0..snapshot.len() {
        for j in (i + 1)..snapshot.len() {
            let (id_a, pos_a) = &snapshot[i];
            let (id_b, pos_b) = &snapshot[j];
            if wrapped_distance(*pos_a, *pos_b, geometry.lx, geometry.ly) < d_agent {
                agents.get_mut(id_a).expect("snapshot id came from this map").neighbors_agents.push(id_b.clone());
                agents.get_mut(id_b).expect("snapshot id came from this map").neighbors_agents.push(id_a.clone());
            }
        }
    }
}

/// The overlap-prediction probe: tentatively advances every agent by its
/// desired velocity, flags any pair (agent-agent or agent-wall) whose
/// bounding spheres would overlap, flags any agent whose velocity gap
/// exceeds `VELOCITY_GAP_THRESHOLD_SQ`, then propagates activity one hop
/// through the agent-neighbor graph. Returns the active subset `M`.
pub fn predict_active(geometry: &Geometry, agents: &HashMap<AgentId, Agent>, dt: f32) -> HashSet<AgentId> {
    let tentative: HashMap<AgentId, crate::math::Vec2> =
        agents.iter().map(|(id, a)| (id.clone(), a.state.position + a.desired.velocity * dt)).collect();

    let mut active = HashSet::new();

    for (id, agent) in agents {
        for (wall_id, seg_idx) in &agent.neighbors_walls {
            let wall = geometry.walls.iter().find(|w| &w.id == wall_id).expect("neighbor list references a live wall");
            let (a, b) = wall.segment(*seg_idx);
            let midpoint = (a + b) * 0.5;
            let dist = tentative[id].distance(midpoint);
            if dist < agent.bounding_radius + ACTIVITY_SLACK {
                active.insert(id.clone());
            }
        }

        for other_id in &agent.neighbors_agents {
            let other = &agents[other_id];
            let dist = tentative[id].distance(tentative[other_id]);
            let threshold = agent.bounding_radius + other.bounding_radius + ACTIVITY_SLACK;
            if dist < threshold {
                active.insert(id.clone());
                active.insert(other_id.clone());
            }
        }

        let linear_gap = (agent.state.velocity - agent.desired.velocity).length_squared();
        let angular_gap = (agent.state.omega - agent.desired.omega).powi(2);
        if linear_gap + angular_gap > VELOCITY_GAP_THRESHOLD_SQ {
            active.insert(id.clone());
        }
    }

    let mut closure = Vec::new();
    for id in &active {
        if let Some(agent) = agents.get(id) {
            closure.extend(agent.neighbors_agents.iter().filter(|n| !active.contains(*n)).cloned());
        }
    }
    active.extend(closure);

    active
}

#[cfg(test)]
mod tests {
    use smallvec::SmallVec;

    use super::*;
    use crate::{
        agent::Disk,
        ids::{MaterialId, ShapeId},
        math::Vec2,
        scene::Geometry,
    };

    fn lone_agent(id: &str, pos: Vec2) -> Agent {
        let disks: SmallVec<[Disk; 8]> = SmallVec::from_vec(vec![Disk {
            id: ShapeId::from("d0"),
            radius: 0.3,
            offset: Vec2::ZERO,
            material: MaterialId::from("human"),
        }]);
        let mut agent = Agent::new(AgentId::from(id), 80.0, 4.0, 2.0, 2.0, disks);
        agent.state.position = pos;
        agent
    }

    #[test]
    fn isolated_agent_has_no_neighbors() {
        let geometry = Geometry { lx: 100.0, ly: 100.0, walls: vec![] };
        let mut agents = HashMap::new();
        agents.insert(AgentId::from("a"), lone_agent("a", Vec2::ZERO));
        rebuild_neighbors(&geometry, &mut agents, 0.1);
        assert!(agents[&AgentId::from("a")].neighbors_agents.is_empty());
        assert!(agents[&AgentId::from("a")].neighbors_walls.is_empty());
    }

    #[test]
    fn close_agents_become_neighbors_and_active() {
        let geometry = Geometry { lx: 100.0, ly: 100.0, walls: vec![] };
        let mut agents = HashMap::new();
        agents.insert(AgentId::from("a"), lone_agent("a", Vec2::new(0.0, 0.0)));
        agents.insert(AgentId::from("b"), lone_agent("b", Vec2::new(0.5, 0.0)));
        rebuild_neighbors(&geometry, &mut agents, 0.1);
        assert_eq!(agents[&AgentId::from("a")].neighbors_agents.len(), 1);

        let active = predict_active(&geometry, &agents, 0.1);
        assert!(active.contains(&AgentId::from("a")));
        assert!(active.contains(&AgentId::from("b")));
    }

    #[test]
    fn one_hop_closure_activates_third_agent() {
        // three agents in a line; middle overlaps only with left.
        let geometry = Geometry { lx: 100.0, ly: 100.0, walls: vec![] };
        let mut agents = HashMap::new();
        agents.insert(AgentId::from("left"), lone_agent("left", Vec2::new(0.0, 0.0)));
        agents.insert(AgentId::from("mid"), lone_agent("mid", Vec2::new(0.5, 0.0)));
        agents.insert(AgentId::from("right"), lone_agent("right", Vec2::new(3.0, 0.0)));
        rebuild_neighbors(&geometry, &mut agents, 0.1);
        // make mid and right agent-neighbors (within d_agent) but not overlapping bounding spheres
        agents.get_mut(&AgentId::from("mid")).unwrap().neighbors_agents.push(AgentId::from("right"));
        agents.get_mut(&AgentId::from("right")).unwrap().neighbors_agents.push(AgentId::from("mid"));

        let active = predict_active(&geometry, &agents, 0.1);
        assert!(active.contains(&AgentId::from("left")));
        assert!(active.contains(&AgentId::from("mid")));
        assert!(active.contains(&AgentId::from("right")), "one-hop closure must pull in mid's neighbor");
    }
}
