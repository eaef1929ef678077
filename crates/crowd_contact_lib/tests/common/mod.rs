//! Shared fixture builders for the integration tests: each test gets its own
//! temp directory tree holding the five documents `spec.md` §6 describes.

use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

/// The journal path is implicitly `<cwd>/AgentInteractions.xml`
/// (`spec.md` §6), so any test that calls `run_step` must serialize on the
/// process-global working directory. Acquire this before `set_current_dir`.
pub static CWD_LOCK: Mutex<()> = Mutex::new(());

pub struct Fixture {
    pub root: PathBuf,
    pub static_dir: PathBuf,
    pub dynamic_dir: PathBuf,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("crowd_contact_it_{name}_{}", std::process::id()));
        let static_dir = root.join("static");
        let dynamic_dir = root.join("dynamic");
        fs::create_dir_all(&static_dir).unwrap();
        fs::create_dir_all(&dynamic_dir).unwrap();
        Self { root, static_dir, dynamic_dir }
    }

    pub fn parameters_path(&self, dt: f32, dt_mech: f32) -> PathBuf {
        let path = self.root.join("Parameters.xml");
        let xml = format!(
            r#"<Parameters>
                <Directories Static="{}/" Dynamic="{}/"/>
                <Times TimeStep="{dt}" TimeStepMechanical="{dt_mech}"/>
            </Parameters>"#,
            self.static_dir.display(),
            self.dynamic_dir.display(),
        );
        fs::write(&path, xml).unwrap();
        path
    }

    pub fn write_single_material(&self, filename: &str, young: f32, shear: f32, gamma_n: f32, gamma_t: f32, mu: f32) {
        let xml = format!(
            r#"<Materials>
                <Intrinsic>
                    <Material Id="human" YoungModulus="{young}" ShearModulus="{shear}"/>
                </Intrinsic>
                <Binary>
                    <Contact Id1="human" Id2="human" GammaNormal="{gamma_n}" GammaTangential="{gamma_t}" KineticFriction="{mu}"/>
                </Binary>
            </Materials>"#
        );
        fs::write(self.static_dir.join(filename), xml).unwrap();
    }

    pub fn write_incomplete_material_table(&self, filename: &str) {
        // Two materials declared, but only one self-pair and no cross-pair:
        // `spec.md` §4.2 requires every unordered pair including self-pairs.
        let xml = r#"<Materials>
            <Intrinsic>
                <Material Id="human" YoungModulus="2.0e5" ShearModulus="8.0e4"/>
                <Material Id="concrete" YoungModulus="3.0e7" ShearModulus="1.2e7"/>
            </Intrinsic>
            <Binary>
                <Contact Id1="human" Id2="human" GammaNormal="1.3e4" GammaTangential="1.0e4" KineticFriction="0.5"/>
            </Binary>
        </Materials>"#;
        fs::write(self.static_dir.join(filename), xml).unwrap();
    }

    pub fn write_empty_geometry(&self, filename: &str, lx: f32, ly: f32) {
        // a single far-away wall keeps the Geometry document schema-valid
        // (at least one Wall) without affecting the agents under test.
        let xml = format!(
            r#"<Geometry>
                <Dimensions Lx="{lx}" Ly="{ly}"/>
                <Wall MaterialId="human">
                    <Corner Coordinates="-1000.0,-1000.0"/>
                    <Corner Coordinates="-999.0,-1000.0"/>
                </Wall>
            </Geometry>"#
        );
        fs::write(self.static_dir.join(filename), xml).unwrap();
    }

    pub fn write_wall_geometry(&self, filename: &str, lx: f32, ly: f32, material: &str, corners: &[(f32, f32)]) {
        let mut body = String::new();
        for (x, y) in corners {
            body.push_str(&format!(r#"<Corner Coordinates="{x},{y}"/>"#));
        }
        let xml = format!(
            r#"<Geometry>
                <Dimensions Lx="{lx}" Ly="{ly}"/>
                <Wall MaterialId="{material}">{body}</Wall>
            </Geometry>"#
        );
        fs::write(self.static_dir.join(filename), xml).unwrap();
    }

    /// Writes an Agents document with one disk per agent, centered on the
    /// agent (offset 0,0) — sufficient for the single-disk scenarios.
    pub fn write_single_disk_agents(&self, filename: &str, agents: &[(&str, f32, f32, f32, f32, f32, &str)]) {
        let mut body = String::new();
        for (id, mass, inertia, floor_damping, angular_damping, radius, material) in agents {
            body.push_str(&format!(
                r#"<Agent Id="{id}" Mass="{mass}" MomentOfInertia="{inertia}" FloorDamping="{floor_damping}" AngularDamping="{angular_damping}">
                    <Shape Id="d0" Radius="{radius}" MaterialId="{material}" Position="0.0,0.0"/>
                </Agent>"#
            ));
        }
        let xml = format!("<Agents>{body}</Agents>");
        fs::write(self.static_dir.join(filename), xml).unwrap();
    }

    pub fn write_dynamics(&self, filename: &str, agents: &[(&str, (f32, f32), (f32, f32), f32, f32, (f32, f32), f32)]) {
        let mut body = String::new();
        for (id, pos, vel, theta, omega, fp, mp) in agents {
            body.push_str(&format!(
                r#"<Agent Id="{id}">
                    <Kinematics Position="{},{}" Velocity="{},{}" Theta="{theta}" Omega="{omega}"/>
                    <Dynamics Fp="{},{}" Mp="{mp}"/>
                </Agent>"#,
                pos.0, pos.1, vel.0, vel.1, fp.0, fp.1
            ));
        }
        let xml = format!("<Agents>{body}</Agents>");
        fs::write(self.dynamic_dir.join(filename), xml).unwrap();
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
