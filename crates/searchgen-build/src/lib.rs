//! Directive transforms over model-annotated GraphQL schemas.
//!
//! [`GraphQLTransform`] runs an ordered list of [`TransformPass`]es over a
//! parsed schema, phase by phase, and returns the printed schema, the
//! resolver template map and one CloudFormation template per stack.

pub mod assets;
pub mod context;
pub mod error;
pub mod mapping;
pub mod model;
pub mod resources;
pub mod searchable;
pub mod transform;

pub use crate::{
    assets::{AssetKeyGenerator, ContentHashKeys, FixedAssetKey},
    context::TransformContext,
    error::TransformError,
    model::ModelTransformer,
    searchable::SearchableTransformer,
    transform::{GraphQLTransform, TransformOutput, TransformPass},
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        AssetKeyGenerator, GraphQLTransform, TransformContext, TransformError, TransformOutput,
        TransformPass,
        mapping::Expr,
        resources::{Resource, ResourceGroup, ResourceHandle},
    };
    pub use searchgen_config_build::{ConflictDetection, ResolvedConfig, TransformConfig};
}
