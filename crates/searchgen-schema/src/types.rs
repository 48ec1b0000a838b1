use crate::node::{Schema, TypeDef};
use derive_more::Display;
use serde::Serialize;

///
/// AWS_SCALARS
/// scalars the API layer provides without a declaration
///

pub const AWS_SCALARS: &[&str] = &[
    "AWSDate",
    "AWSDateTime",
    "AWSEmail",
    "AWSIPAddress",
    "AWSJSON",
    "AWSPhone",
    "AWSTime",
    "AWSTimestamp",
    "AWSURL",
];

/// Built-in GraphQL scalars.
pub const BUILTIN_SCALARS: &[&str] = &["Boolean", "Float", "ID", "Int", "String"];

///
/// ScalarKind
///
/// Filter family a field lowers to. Everything that is not numeric or
/// boolean is indexed as text, which includes enums and most AWS scalars.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum ScalarKind {
    Boolean,
    Float,
    #[display("ID")]
    Id,
    Int,
    String,
}

impl ScalarKind {
    #[must_use]
    pub fn from_builtin(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(Self::Boolean),
            "Float" => Some(Self::Float),
            "ID" => Some(Self::Id),
            "Int" => Some(Self::Int),
            "String" => Some(Self::String),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_aws(name: &str) -> Option<Self> {
        match name {
            "AWSTimestamp" => Some(Self::Int),
            other if AWS_SCALARS.contains(&other) => Some(Self::String),
            _ => None,
        }
    }

    /// Stored without a `.keyword` sub-field in the index.
    #[must_use]
    pub const fn is_non_keyword(self) -> bool {
        matches!(self, Self::Boolean | Self::Float | Self::Int)
    }

    /// GraphQL scalar used for operator arguments of this family.
    #[must_use]
    pub const fn graphql_scalar(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Float => "Float",
            Self::Id => "ID",
            Self::Int => "Int",
            Self::String => "String",
        }
    }
}

///
/// FieldKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(String),
    Unsupported(String),
}

impl FieldKind {
    /// Classify a named type against the schema.
    ///
    /// Enums and custom scalars keep their identity here; lowering them to
    /// string filtering is the synthesizer's decision.
    #[must_use]
    pub fn classify(schema: &Schema, type_name: &str) -> Self {
        if let Some(kind) = ScalarKind::from_builtin(type_name) {
            return Self::Scalar(kind);
        }
        if let Some(kind) = ScalarKind::from_aws(type_name) {
            return Self::Scalar(kind);
        }

        match schema.get(type_name) {
            Some(TypeDef::Enum(node)) => Self::Enum(node.name.clone()),
            Some(TypeDef::Scalar(_)) => Self::Scalar(ScalarKind::String),
            Some(other) => Self::Unsupported(other.kind().to_string()),
            None => Self::Unsupported("unknown".to_string()),
        }
    }

    /// The filter family used at the index level; enums filter as strings.
    #[must_use]
    pub const fn filter_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Enum(_) => Some(ScalarKind::String),
            Self::Unsupported(_) => None,
        }
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// True for names the schema can reference without declaring them.
#[must_use]
pub fn is_implicit_type(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name) || AWS_SCALARS.contains(&name)
}
