//! Loader for the Agents document (`spec.md` §6): per-agent mass, inertia,
//! damping, and the ordered left-shoulder-to-right-shoulder disk list.

use std::{collections::HashMap, path::Path};

use smallvec::SmallVec;

use crate::{
    agent::{Agent, Disk},
    error::EngineError,
    ids::{AgentId, MaterialId, ShapeId},
    io::xml_util::{children, parse_document, read_and_parse, required_attr, required_f32, required_vec2},
};

pub fn load(path: &Path) -> Result<HashMap<AgentId, Agent>, EngineError> {
    let text = read_and_parse(path)?;
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    let mut agents = HashMap::new();
    for node in children(root, "Agent") {
        let id = AgentId::from(required_attr(path, node, "Id")?);
        let mass = required_f32(path, node, "Mass")?;
        let inertia = required_f32(path, node, "MomentOfInertia")?;
        let inv_floor_damping = required_f32(path, node, "FloorDamping")?;
        let inv_angular_damping = required_f32(path, node, "AngularDamping")?;

        let disks: SmallVec<[Disk; 8]> = children(node, "Shape")
            .map(|shape| -> Result<Disk, EngineError> {
                Ok(Disk {
                    id: ShapeId::from(required_attr(path, shape, "Id")?),
                    radius: required_f32(path, shape, "Radius")?,
                    offset: required_vec2(path, shape, "Position")?,
                    material: MaterialId::from(required_attr(path, shape, "MaterialId")?),
                })
            })
            .collect::<Result<_, _>>()?;
        if disks.is_empty() {
            return Err(EngineError::Schema { path: path.to_owned(), tag: "Agent".to_owned(), attribute: "Shape (at least 1 required)" });
        }

        agents.insert(id.clone(), Agent::new(id, mass, inertia, inv_floor_damping, inv_angular_damping, disks));
    }
    Ok(agents)
}
