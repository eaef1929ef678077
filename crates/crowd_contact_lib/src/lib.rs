//! Mechanical-layer contact solver for 2D crowd simulations: disk-disk and
//! disk-wall Hertz-like spring-dashpot contact with Coulomb friction and
//! history-dependent tangential displacement, driven by five XML
//! configuration documents plus a persistent interaction journal.

pub mod activity;
pub mod agent;
pub mod contact;
pub mod engine;
pub mod error;
pub mod ids;
pub mod io;
pub mod material;
pub mod math;
pub mod passive;
pub mod scene;

pub use engine::{run_step, LoadMode, Session, StepPaths, StepReport};
pub use error::{EngineError, Result};
