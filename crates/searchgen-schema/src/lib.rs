//! GraphQL schema nodes for the searchgen transform: an owned, ordered model
//! of an SDL document that passes can inspect and extend, plus SDL ingest,
//! printing, and schema-wide validation.

pub mod error;
pub mod node;
pub mod parse;
pub mod print;
pub mod types;
pub mod validate;

use crate::{node::NodeError, parse::ParseError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        types::{FieldKind, ScalarKind},
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    NodeError(#[from] NodeError),

    #[error("validation failed: {0}")]
    Validation(error::ErrorTree),
}
