//! ## Crate layout
//! - `build`: transform passes, templates, the resource graph and the
//!   orchestrator.
//! - `config`: typed transform configuration and its loaders.
//! - `schema`: GraphQL schema nodes, SDL ingest and printing, validation.
//! - `utils`: naming helpers shared by the passes.
//!
//! [`transform`] is the one-call entry point used by the CLI.

pub use searchgen_build as build;
pub use searchgen_config_build as config;
pub use searchgen_schema as schema;
pub use searchgen_utils as utils;

pub use searchgen_build::{GraphQLTransform, TransformError, TransformOutput};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate `config`, then run the model and searchable passes over `sdl`.
pub fn transform(
    sdl: &str,
    config: config::TransformConfig,
) -> Result<TransformOutput, TransformError> {
    let resolved = config.validate()?;

    GraphQLTransform::with_default_passes(resolved).transform(sdl)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::transform;
    pub use searchgen_build::prelude::*;
}
