//! Top-level orchestration for one macro step (`spec.md` §5, §6): hydrate the
//! scene from the five documents, run the activity gate, dispatch to the
//! contact solver and the passive integrator, then emit updated kinematics
//! and the interaction journal.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    activity,
    contact::{journal::Journal, solver},
    error::EngineError,
    io::{agents, dynamics, geometry, interactions, materials, parameters},
    passive,
    scene::Scene,
};

/// Whether to rebuild the static tables (materials, geometry, agent
/// geometry) from disk or reuse a `Session` retained from a previous call.
/// `spec.md` §5's `load_static_data` flag, made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Cold,
    Warm,
}

/// The ordered document paths from `spec.md` §6. `parameters` is absolute;
/// the rest are filenames resolved against the `Static`/`Dynamic`
/// directories the Parameters document declares.
#[derive(Debug, Clone)]
pub struct StepPaths {
    pub parameters: PathBuf,
    pub materials: String,
    pub geometry: String,
    pub agents: String,
    pub agent_dynamics: String,
}

/// Retained across calls for a warm start: the hydrated scene plus the
/// interaction journal, both normally rebuilt from disk on a cold start.
pub struct Session {
    pub scene: Scene,
    pub journal: Journal,
}

#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    pub sub_steps: u32,
    pub active_agents: usize,
    pub total_agents: usize,
}

/// Runs exactly one macro step and returns the updated session plus a short
/// report. The journal path is not part of `StepPaths`: it is implicitly
/// `<cwd>/AgentInteractions.xml` (`spec.md` §6) and is always overwritten on
/// exit, regardless of `mode`.
pub fn run_step(paths: &StepPaths, mode: LoadMode, session: Option<Session>) -> Result<(Session, StepReport), EngineError> {
    let parameters = parameters::load(&paths.parameters)?;
    let journal_path = interaction_journal_path()?;

    let (mut scene, mut journal) = match (mode, session) {
        (LoadMode::Warm, Some(session)) => {
            debug!("warm start: reusing retained scene and journal");
            let mut scene = session.scene;
            scene.dt = parameters.dt;
            scene.dt_mech = parameters.dt_mech;
            (scene, session.journal)
        }
        (LoadMode::Warm, None) => {
            info!("warm start requested with no retained session; falling back to a cold start");
            cold_start(paths, &parameters, &journal_path)?
        }
        (LoadMode::Cold, _) => cold_start(paths, &parameters, &journal_path)?,
    };

    let dynamic_path = parameters.dynamic_dir.join(&paths.agent_dynamics);
    dynamics::load_into(&dynamic_path, &mut scene.agents)?;

    activity::rebuild_neighbors(&scene.geometry, &mut scene.agents, scene.dt);
    let active = activity::predict_active(&scene.geometry, &scene.agents, scene.dt);

    if !active.is_empty() {
        solver::run_macro_step(&mut scene, &mut journal, &active);
    } else {
        debug!("active subset is empty, skipping contact solver entirely");
    }
    passive::advance_inactive(&mut scene.agents, &active, scene.dt);

    dynamics::save(&dynamic_path, &scene.agents)?;
    interactions::save(&journal_path, &journal)?;

    let report = StepReport { sub_steps: scene.sub_steps(), active_agents: active.len(), total_agents: scene.agents.len() };
    info!(active = report.active_agents, total = report.total_agents, sub_steps = report.sub_steps, "macro step complete");

    Ok((Session { scene, journal }, report))
}

fn cold_start(
    paths: &StepPaths,
    parameters: &parameters::Parameters,
    journal_path: &Path,
) -> Result<(Scene, Journal), EngineError> {
    let materials = materials::load(&parameters.static_dir.join(&paths.materials))?;
    let geometry = geometry::load(&parameters.static_dir.join(&paths.geometry))?;
    let agents = agents::load(&parameters.static_dir.join(&paths.agents))?;
    let journal = interactions::load(journal_path)?;

    let scene = Scene { geometry, materials, agents, dt: parameters.dt, dt_mech: parameters.dt_mech };
    validate_material_refs(paths, parameters, &scene)?;
    Ok((scene, journal))
}

/// `spec.md` §4.1/§7: a disk or wall referencing a material id absent from
/// the Materials document is a fatal load-time error, not a panic the first
/// time that shape enters a contact.
fn validate_material_refs(paths: &StepPaths, parameters: &parameters::Parameters, scene: &Scene) -> Result<(), EngineError> {
    let geometry_path = parameters.static_dir.join(&paths.geometry);
    for wall in &scene.geometry.walls {
        if scene.materials.material(&wall.material).is_none() {
            return Err(EngineError::Reference { path: geometry_path.clone(), kind: "material", id: wall.material.0.clone() });
        }
    }

    let agents_path = parameters.static_dir.join(&paths.agents);
    for agent in scene.agents.values() {
        for disk in &agent.disks {
            if scene.materials.material(&disk.material).is_none() {
                return Err(EngineError::Reference { path: agents_path.clone(), kind: "material", id: disk.material.0.clone() });
            }
        }
    }

    Ok(())
}

fn interaction_journal_path() -> Result<PathBuf, EngineError> {
    let cwd = std::env::current_dir().map_err(|source| EngineError::DocumentLoad { path: PathBuf::from("."), source })?;
    Ok(cwd.join("AgentInteractions.xml"))
}
