//! Loader/writer for the AgentDynamics document (`spec.md` §6). The input
//! form carries `Kinematics` (current state) and `Dynamics` (driving force
//! `Fp`/moment `Mp`); the output form mirrors post-step kinematics with no
//! `Dynamics` tags.
//!
//! `Fp`/`Mp` are given as the external driving force/moment rather than a
//! desired velocity directly, so the desired state the relaxation terms in
//! `spec.md` §4.4 step 5 and §4.5 pull towards is derived once at hydration
//! time by inverting `F_relax = m * (v* - v) * tau_t^-1`:
//! `v* = v + Fp / (m * tau_t^-1)`, `omega* = omega + Mp / (I * tau_r^-1)`.

use std::{collections::HashMap, path::Path};

use crate::{
    agent::Agent,
    error::EngineError,
    ids::AgentId,
    io::xml_util::{children, parse_document, read_and_parse, required_attr, required_f32, required_vec2},
};

/// Hydrates every agent's current and desired kinematic state from the
/// input AgentDynamics document. Every agent id present in the document
/// must already exist in `agents` (populated from the Agents document).
pub fn load_into(path: &Path, agents: &mut HashMap<AgentId, Agent>) -> Result<(), EngineError> {
    let text = read_and_parse(path)?;
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    for node in children(root, "Agent") {
        let id = AgentId::from(required_attr(path, node, "Id")?);
        let agent = agents
            .get_mut(&id)
            .ok_or_else(|| EngineError::Reference { path: path.to_owned(), kind: "agent", id: id.0.clone() })?;

        let kinematics = children(node, "Kinematics")
            .next()
            .ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: "Agent".to_owned(), attribute: "Kinematics" })?;
        agent.state.position = required_vec2(path, kinematics, "Position")?;
        agent.state.velocity = required_vec2(path, kinematics, "Velocity")?;
        agent.state.theta = required_f32(path, kinematics, "Theta")?;
        agent.state.omega = required_f32(path, kinematics, "Omega")?;

        let dynamics = children(node, "Dynamics")
            .next()
            .ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: "Agent".to_owned(), attribute: "Dynamics" })?;
        let fp = required_vec2(path, dynamics, "Fp")?;
        let mp = required_f32(path, dynamics, "Mp")?;

        // FloorDamping/AngularDamping of 0 means the relaxation force in
        // `spec.md` §4.4 step 5 (`m * (v* - v) * tau_t^-1`) is always zero
        // regardless of v*, so v* is unconstrained by Fp — leave it equal to
        // the current velocity rather than dividing by zero.
        agent.desired.velocity = if agent.inv_floor_damping > 0.0 {
            agent.state.velocity + fp / agent.inv_floor_damping / agent.mass
        } else {
            agent.state.velocity
        };
        agent.desired.omega = if agent.inv_angular_damping > 0.0 {
            agent.state.omega + mp / agent.inv_angular_damping / agent.inertia
        } else {
            agent.state.omega
        };
    }
    Ok(())
}

/// Writes the post-step AgentDynamics output document: same `Kinematics`
/// shape as the input, no `Dynamics` tags.
pub fn save(path: &Path, agents: &HashMap<AgentId, Agent>) -> Result<(), EngineError> {
    let mut ids: Vec<&AgentId> = agents.keys().collect();
    ids.sort();

    let mut out = String::from("<Agents>\n");
    for id in ids {
        let agent = &agents[id];
        let s = &agent.state;
        out.push_str(&format!(
            "  <Agent Id=\"{}\">\n    <Kinematics Position=\"{},{}\" Velocity=\"{},{}\" Theta=\"{}\" Omega=\"{}\"/>\n  </Agent>\n",
            id.0, s.position.x, s.position.y, s.velocity.x, s.velocity.y, s.theta, s.omega
        ));
    }
    out.push_str("</Agents>\n");

    std::fs::write(path, out).map_err(|source| EngineError::DocumentLoad { path: path.to_owned(), source })
}
