//! Loader for the Geometry document (`spec.md` §6): domain extents and wall
//! polylines. Walls carry no explicit `Id` attribute in the schema; this
//! loader assigns stable ids by document order (see DESIGN.md).

use std::path::Path;

use crate::{
    error::EngineError,
    ids::{MaterialId, WallId},
    io::xml_util::{children, parse_document, read_and_parse, required_attr, required_f32, required_vec2},
    scene::{Geometry, Wall},
};

pub fn load(path: &Path) -> Result<Geometry, EngineError> {
    let text = read_and_parse(path)?;
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    let dimensions = children(root, "Dimensions")
        .next()
        .ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: "Geometry".to_owned(), attribute: "Dimensions" })?;
    let lx = required_f32(path, dimensions, "Lx")?;
    let ly = required_f32(path, dimensions, "Ly")?;

    let mut walls = Vec::new();
    for (index, node) in children(root, "Wall").enumerate() {
        let material = MaterialId::from(required_attr(path, node, "MaterialId")?);
        let corners = children(node, "Corner")
            .map(|corner| required_vec2(path, corner, "Coordinates"))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 2 {
            return Err(EngineError::Schema { path: path.to_owned(), tag: "Wall".to_owned(), attribute: "Corner (at least 2 required)" });
        }
        walls.push(Wall { id: WallId(format!("w{index}")), material, corners });
    }
    if walls.is_empty() {
        return Err(EngineError::Schema { path: path.to_owned(), tag: "Geometry".to_owned(), attribute: "Wall (at least 1 required)" });
    }

    Ok(Geometry { lx, ly, walls })
}
