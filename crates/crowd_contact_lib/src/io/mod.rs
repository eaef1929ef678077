//! Document loaders/writers for the five configuration documents plus the
//! interaction journal (`spec.md` §6).

pub mod agents;
pub mod dynamics;
pub mod geometry;
pub mod interactions;
pub mod materials;
pub mod parameters;
pub mod xml_util;
