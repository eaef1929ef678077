//! Loader for the Parameters document (`spec.md` §6): directories and the
//! macro/mechanical time steps.

use std::path::{Path, PathBuf};

use crate::{
    error::EngineError,
    io::xml_util::{children, parse_document, read_and_parse, required_attr, required_f32},
};

pub struct Parameters {
    pub static_dir: PathBuf,
    pub dynamic_dir: PathBuf,
    pub dt: f32,
    pub dt_mech: f32,
}

pub fn load(path: &Path) -> Result<Parameters, EngineError> {
    let text = read_and_parse(path)?;
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    let directories = children(root, "Directories")
        .next()
        .ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: "Parameters".to_owned(), attribute: "Directories" })?;
    let static_dir = PathBuf::from(required_attr(path, directories, "Static")?);
    let dynamic_dir = PathBuf::from(required_attr(path, directories, "Dynamic")?);

    let times = children(root, "Times")
        .next()
        .ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: "Parameters".to_owned(), attribute: "Times" })?;
    let dt = required_f32(path, times, "TimeStep")?;
    let dt_mech = required_f32(path, times, "TimeStepMechanical")?;

    Ok(Parameters { static_dir, dynamic_dir, dt, dt_mech })
}
