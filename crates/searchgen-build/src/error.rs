use searchgen_config_build::ConfigError;
use searchgen_schema::{Error as SchemaError, error::ErrorTree, node::NodeError, parse::ParseError};
use thiserror::Error as ThisError;

///
/// TransformError
///
/// Every variant is fatal; a failed run returns no partial output.
///

#[derive(Debug, ThisError)]
pub enum TransformError {
    #[error("invalid directive usage on '{type_name}': {message}")]
    InvalidDirectiveUsage { type_name: String, message: String },

    #[error("name collision: {synthesized} collides with {existing}")]
    NameCollision {
        existing: String,
        synthesized: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl TransformError {
    pub(crate) fn invalid(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDirectiveUsage {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

impl From<NodeError> for TransformError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Collision {
                existing,
                synthesized,
            } => Self::NameCollision {
                existing,
                synthesized,
            },
            other => Self::Schema(SchemaError::NodeError(other)),
        }
    }
}

impl From<ErrorTree> for TransformError {
    fn from(tree: ErrorTree) -> Self {
        Self::Schema(SchemaError::Validation(tree))
    }
}
