//! CLI entry point: runs exactly one macro step and exits. The caller is
//! responsible for re-invoking for subsequent steps (`spec.md` §5). Warm
//! starts only make sense for an embedder holding a `Session` across calls
//! to `crowd_contact_lib::run_step` directly, so a fresh process always
//! starts cold.
//!
//! Arguments follow `spec.md` §6 directly, no parsing framework: five
//! ordered document paths, `[Parameters, Materials, Geometry, Agents,
//! AgentDynamics]`.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use crowd_contact_lib::{run_step, LoadMode, StepPaths};
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let [parameters, materials, geometry, agents, agent_dynamics] = <[String; 5]>::try_from(args)
        .map_err(|got| anyhow::anyhow!("expected 5 paths [Parameters, Materials, Geometry, Agents, AgentDynamics], got {}", got.len()))?;

    let paths = StepPaths { parameters: PathBuf::from(parameters), materials, geometry, agents, agent_dynamics };

    let (_, report) = run_step(&paths, LoadMode::Cold, None).context("macro step failed")?;
    println!("active {}/{} agents, {} sub-steps", report.active_agents, report.total_agents, report.sub_steps);
    Ok(())
}
