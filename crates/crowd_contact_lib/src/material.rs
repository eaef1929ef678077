//! Material registry: intrinsic elastic moduli per material, plus derived
//! per-pair contact stiffnesses, damping and friction (`spec.md` §4.2).

use std::collections::HashMap;

use crate::ids::MaterialId;

/// Intrinsic material properties, loaded once and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub young_modulus: f32,
    pub shear_modulus: f32,
}

/// Derived properties for an ordered pair of materials. Symmetric:
/// `k_n(i, j) == k_n(j, i)` etc.
#[derive(Debug, Clone, Copy)]
pub struct ContactParams {
    pub k_n: f32,
    pub k_t: f32,
    pub gamma_n: f32,
    pub gamma_t: f32,
    pub mu: f32,
}

/// Per-unordered-pair damping/friction as read straight from the Materials
/// document, before being mirrored into the dense `ContactParams` table.
#[derive(Debug, Clone, Copy)]
pub struct BinaryContact {
    pub gamma_n: f32,
    pub gamma_t: f32,
    pub mu: f32,
}

pub struct MaterialRegistry {
    intrinsic: HashMap<MaterialId, Material>,
    contacts: HashMap<(MaterialId, MaterialId), ContactParams>,
}

impl MaterialRegistry {
    /// Builds the dense, symmetric `ContactParams` table from the intrinsic
    /// moduli and the binary damping/friction table. `binary` must already
    /// contain every unordered pair, including self-pairs; that is enforced
    /// by the loader in `io::materials`, not here.
    pub fn new(intrinsic: HashMap<MaterialId, Material>, binary: HashMap<(MaterialId, MaterialId), BinaryContact>) -> Self {
        let mut contacts = HashMap::with_capacity(binary.len() * 2);
        for ((a, b), bc) in &binary {
            let ma = intrinsic[a];
            let mb = intrinsic[b];
            let params = ContactParams {
                k_n: normal_stiffness(ma, mb),
                k_t: tangential_stiffness(ma, mb),
                gamma_n: bc.gamma_n,
                gamma_t: bc.gamma_t,
                mu: bc.mu,
            };
            contacts.insert((a.clone(), b.clone()), params);
            contacts.insert((b.clone(), a.clone()), params);
        }
        Self { intrinsic, contacts }
    }

    pub fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.intrinsic.get(id)
    }

    pub fn params(&self, a: &MaterialId, b: &MaterialId) -> Option<ContactParams> {
        self.contacts.get(&(a.clone(), b.clone())).copied()
    }
}

/// `k_n(i,j) = 1 / [(4G_i - E_i)/(4 G_i^2) + (4G_j - E_j)/(4 G_j^2)]`
fn normal_stiffness(a: Material, b: Material) -> f32 {
    let term = |m: Material| (4.0 * m.shear_modulus - m.young_modulus) / (4.0 * m.shear_modulus * m.shear_modulus);
    1.0 / (term(a) + term(b))
}

/// `k_t(i,j) = 1 / [(6G_i - E_i)/(8 G_i^2) + (6G_j - E_j)/(8 G_j^2)]`
fn tangential_stiffness(a: Material, b: Material) -> f32 {
    let term = |m: Material| (6.0 * m.shear_modulus - m.young_modulus) / (8.0 * m.shear_modulus * m.shear_modulus);
    1.0 / (term(a) + term(b))
}
