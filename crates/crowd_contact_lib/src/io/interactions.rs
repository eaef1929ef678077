//! Loader/writer for the AgentInteractions journal document (`spec.md` §4.6,
//! §6). A missing file is not an error: the journal starts empty on a
//! agent's very first run and entries are seeded lazily as contacts occur.

use std::{
    collections::HashMap,
    path::Path,
};

use crate::{
    contact::journal::{ContactRecord, Journal, PairKey, WallKey},
    error::EngineError,
    ids::{AgentId, SegmentIndex, ShapeId, WallId},
    io::xml_util::{children, parse_document, required_attr, required_f32, required_vec2},
    math::Vec2,
};

pub fn load(path: &Path) -> Result<Journal, EngineError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Journal::new()),
        Err(source) => return Err(EngineError::DocumentLoad { path: path.to_owned(), source }),
    };
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    let mut journal = Journal::new();
    for agent_node in children(root, "Agent") {
        let agent_i = AgentId::from(required_attr(path, agent_node, "Id")?);

        for other_node in children(agent_node, "Agent") {
            let agent_j = AgentId::from(required_attr(path, other_node, "Id")?);
            for interaction in children(other_node, "Interaction") {
                let disk_i = ShapeId::from(required_attr(path, interaction, "ParentShape")?);
                let disk_j = ShapeId::from(required_attr(path, interaction, "ChildShape")?);
                let record = read_record(path, interaction)?;
                let key = PairKey::ordered(&agent_i, &disk_i, &agent_j, &disk_j);
                journal.insert_pair_seed(key, record);
            }
        }

        for wall_node in children(agent_node, "Wall") {
            let disk = ShapeId::from(required_attr(path, wall_node, "ShapeId")?);
            let wall = WallId::from(required_attr(path, wall_node, "WallId")?);
            let corner_id = required_attr(path, wall_node, "CornerId")?;
            let segment = SegmentIndex(corner_id.parse::<usize>().map_err(|_| EngineError::Numeric {
                path: path.to_owned(),
                tag: "Wall".to_owned(),
                attribute: "CornerId",
                expected: "non-negative integer",
                value: corner_id.to_owned(),
            })?);
            let record = read_record(path, wall_node)?;
            journal.insert_wall_seed(WallKey { agent: agent_i.clone(), disk, wall, segment }, record);
        }
    }
    Ok(journal)
}

fn read_record(path: &Path, node: roxmltree::Node<'_, '_>) -> Result<ContactRecord, EngineError> {
    Ok(ContactRecord {
        xi: required_vec2(path, node, "TangentialRelativeDisplacement")?,
        f_n: required_vec2(path, node, "Fn")?,
        f_t: required_vec2(path, node, "Ft")?,
    })
}

/// Writes only the entries the journal currently holds — by the time this
/// runs, `end_macro_step_cleanup` has already dropped anything not touched
/// in the macro step just completed.
pub fn save(path: &Path, journal: &Journal) -> Result<(), EngineError> {
    let mut by_parent: HashMap<AgentId, Vec<(PairKey, ContactRecord)>> = HashMap::new();
    for (key, record) in journal.pairs() {
        by_parent.entry(key.agent_i.clone()).or_default().push((key.clone(), *record));
    }
    let mut by_agent_walls: HashMap<AgentId, Vec<(WallKey, ContactRecord)>> = HashMap::new();
    for (key, record) in journal.walls() {
        by_agent_walls.entry(key.agent.clone()).or_default().push((key.clone(), *record));
    }

    let mut agent_ids: Vec<AgentId> = by_parent.keys().chain(by_agent_walls.keys()).cloned().collect();
    agent_ids.sort();
    agent_ids.dedup();

    let mut out = String::from("<Interactions>\n");
    for agent_id in &agent_ids {
        out.push_str(&format!("  <Agent Id=\"{}\">\n", agent_id.0));

        let mut children_by_other: HashMap<AgentId, Vec<(PairKey, ContactRecord)>> = HashMap::new();
        if let Some(pairs) = by_parent.get(agent_id) {
            for (key, record) in pairs {
                children_by_other.entry(key.agent_j.clone()).or_default().push((key.clone(), *record));
            }
        }
        let mut others: Vec<&AgentId> = children_by_other.keys().collect();
        others.sort();
        for other in others {
            out.push_str(&format!("    <Agent Id=\"{}\">\n", other.0));
            for (key, record) in &children_by_other[other] {
                out.push_str(&format!(
                    "      <Interaction ParentShape=\"{}\" ChildShape=\"{}\" TangentialRelativeDisplacement=\"{},{}\" Fn=\"{},{}\" Ft=\"{},{}\"/>\n",
                    key.disk_i.0, key.disk_j.0, record.xi.x, record.xi.y, record.f_n.x, record.f_n.y, record.f_t.x, record.f_t.y
                ));
            }
            out.push_str("    </Agent>\n");
        }

        if let Some(walls) = by_agent_walls.get(agent_id) {
            for (key, record) in walls {
                out.push_str(&format!(
                    "    <Wall ShapeId=\"{}\" WallId=\"{}\" CornerId=\"{}\" TangentialRelativeDisplacement=\"{},{}\" Fn=\"{},{}\" Ft=\"{},{}\"/>\n",
                    key.disk.0, key.wall.0, key.segment.0, record.xi.x, record.xi.y, record.f_n.x, record.f_n.y, record.f_t.x, record.f_t.y
                ));
            }
        }

        out.push_str("  </Agent>\n");
    }
    out.push_str("</Interactions>\n");

    std::fs::write(path, out).map_err(|source| EngineError::DocumentLoad { path: path.to_owned(), source })
}
