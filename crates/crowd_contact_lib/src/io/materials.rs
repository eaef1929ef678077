//! Loader for the Materials document (`spec.md` §6, §4.2): intrinsic moduli
//! per material and the binary damping/friction table, validated for full
//! pairwise coverage (including self-pairs) before the registry is built.

use std::{collections::HashMap, path::Path};

use itertools::Itertools;

use crate::{
    error::EngineError,
    ids::MaterialId,
    io::xml_util::{children, parse_document, read_and_parse, required_attr, required_f32},
    material::{BinaryContact, Material, MaterialRegistry},
};

fn canonical(a: &MaterialId, b: &MaterialId) -> (MaterialId, MaterialId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

pub fn load(path: &Path) -> Result<MaterialRegistry, EngineError> {
    let text = read_and_parse(path)?;
    let doc = parse_document(path, &text)?;
    let root = doc.root_element();

    let mut intrinsic = HashMap::new();
    for node in children(root, "Intrinsic").flat_map(|intr| children(intr, "Material")) {
        let id = MaterialId::from(required_attr(path, node, "Id")?);
        let young_modulus = required_f32(path, node, "YoungModulus")?;
        let shear_modulus = required_f32(path, node, "ShearModulus")?;
        intrinsic.insert(id, Material { young_modulus, shear_modulus });
    }

    let mut binary: HashMap<(MaterialId, MaterialId), BinaryContact> = HashMap::new();
    for node in children(root, "Binary").flat_map(|bin| children(bin, "Contact")) {
        let id1 = MaterialId::from(required_attr(path, node, "Id1")?);
        let id2 = MaterialId::from(required_attr(path, node, "Id2")?);
        if !intrinsic.contains_key(&id1) {
            return Err(EngineError::Reference { path: path.to_owned(), kind: "material", id: id1.0 });
        }
        if !intrinsic.contains_key(&id2) {
            return Err(EngineError::Reference { path: path.to_owned(), kind: "material", id: id2.0 });
        }
        let gamma_n = required_f32(path, node, "GammaNormal")?;
        let gamma_t = required_f32(path, node, "GammaTangential")?;
        let mu = required_f32(path, node, "KineticFriction")?;
        binary.insert(canonical(&id1, &id2), BinaryContact { gamma_n, gamma_t, mu });
    }

    let ids: Vec<&MaterialId> = intrinsic.keys().sorted().collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i..] {
            let key = canonical(a, b);
            if !binary.contains_key(&key) {
                return Err(EngineError::MissingPair { path: path.to_owned(), a: a.0.clone(), b: b.0.clone() });
            }
        }
    }

    Ok(MaterialRegistry::new(intrinsic, binary))
}
