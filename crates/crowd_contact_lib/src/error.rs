//! Error taxonomy for document loading. The solver itself never returns an
//! error at run time (saturation/clamping handles every edge case); these
//! variants only ever surface from the `io` loaders.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not read {}: {source}", path.display())]
    DocumentLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{}: missing required <{tag}> {attribute}", path.display())]
    Schema { path: PathBuf, tag: String, attribute: &'static str },

    #[error("{}: {kind} '{id}' referenced but not declared", path.display())]
    Reference { path: PathBuf, kind: &'static str, id: String },

    #[error("{}: attribute '{attribute}' on <{tag}> is not a valid {expected}: {value:?}", path.display())]
    Numeric { path: PathBuf, tag: String, attribute: &'static str, expected: &'static str, value: String },

    #[error("{}: contact table is missing the pair ({a}, {b})", path.display())]
    MissingPair { path: PathBuf, a: String, b: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
