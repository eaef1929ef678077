//! Passive integrator: analytic exponential relaxation for agents outside
//! the active subset, avoiding the inner loop entirely (`spec.md` §4.5).

use std::collections::{HashMap, HashSet};

use crate::{agent::Agent, ids::AgentId};

/// Advances every agent not in `active` over the full macro step `dt` using
/// the closed-form damped relaxation toward its driving target.
pub fn advance_inactive(agents: &mut HashMap<AgentId, Agent>, active: &HashSet<AgentId>, dt: f32) {
    for (id, agent) in agents.iter_mut() {
        if active.contains(id) {
            continue;
        }
        advance_one(agent, dt);
    }
}

fn advance_one(agent: &mut Agent, dt: f32) {
    let decay_t = (-dt * agent.inv_floor_damping).exp();
    let decay_r = (-dt * agent.inv_angular_damping).exp();

    let v_next = agent.desired.velocity + (agent.state.velocity - agent.desired.velocity) * decay_t;
    let omega_next = agent.desired.omega + (agent.state.omega - agent.desired.omega) * decay_r;

    agent.state.position += v_next * dt;
    agent.state.theta += omega_next * dt;
    agent.state.velocity = v_next;
    agent.state.omega = omega_next;
}
