mod directive;
mod r#enum;
mod field;
mod input;
mod object;
mod scalar;
mod type_ref;

pub use self::directive::*;
pub use self::r#enum::*;
pub use self::field::*;
pub use self::input::*;
pub use self::object::*;
pub use self::scalar::*;
pub use self::type_ref::*;

use derive_more::Display;
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Debug, ThisError)]
pub enum NodeError {
    #[error("type '{0}' not found")]
    TypeNotFound(String),

    #[error("'{name}' is {actual}, expected {expected}")]
    UnexpectedKind {
        name: String,
        expected: DefKind,
        actual: DefKind,
    },

    #[error("synthesized '{synthesized}' collides with existing '{existing}'")]
    Collision {
        existing: String,
        synthesized: String,
    },
}

///
/// Merge
/// outcome of a create-if-absent insert
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Merge {
    Added,
    Unchanged,
}

///
/// DefKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum DefKind {
    #[display("type")]
    Object,
    #[display("interface")]
    Interface,
    #[display("union")]
    Union,
    #[display("enum")]
    Enum,
    #[display("input")]
    InputObject,
    #[display("scalar")]
    Scalar,
}

///
/// TypeDef
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TypeDef {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
    Scalar(ScalarType),
}

impl TypeDef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(node) => &node.name,
            Self::Interface(node) => &node.name,
            Self::Union(node) => &node.name,
            Self::Enum(node) => &node.name,
            Self::InputObject(node) => &node.name,
            Self::Scalar(node) => &node.name,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DefKind {
        match self {
            Self::Object(_) => DefKind::Object,
            Self::Interface(_) => DefKind::Interface,
            Self::Union(_) => DefKind::Union,
            Self::Enum(_) => DefKind::Enum,
            Self::InputObject(_) => DefKind::InputObject,
            Self::Scalar(_) => DefKind::Scalar,
        }
    }

    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Object(node) => &node.directives,
            Self::Interface(node) => &node.directives,
            Self::Union(node) => &node.directives,
            Self::Enum(node) => &node.directives,
            Self::InputObject(node) => &node.directives,
            Self::Scalar(node) => &node.directives,
        }
    }

    // label
    // "type Post", "input PostFilterInput", as used in collision reports
    fn label(&self) -> String {
        format!("{} {}", self.kind(), self.name())
    }

    fn strip_directives(&mut self, names: &[&str]) {
        let keep = |d: &Directive| !names.contains(&d.name.as_str());

        match self {
            Self::Object(node) => {
                node.directives.retain(keep);
                for field in &mut node.fields {
                    field.directives.retain(keep);
                }
            }
            Self::Interface(node) => {
                node.directives.retain(keep);
                for field in &mut node.fields {
                    field.directives.retain(keep);
                }
            }
            Self::Union(node) => node.directives.retain(keep),
            Self::Enum(node) => node.directives.retain(keep),
            Self::InputObject(node) => node.directives.retain(keep),
            Self::Scalar(node) => node.directives.retain(keep),
        }
    }
}

///
/// Schema
///
/// Ordered list of type definitions. Declaration order is preserved so
/// that printing and downstream naming stay deterministic. Definitions the
/// transform never inspects (schema blocks, directive definitions, type
/// extensions) are carried through as printed text.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Schema {
    pub types: Vec<TypeDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verbatim: Vec<String>,
}

impl Schema {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            types: Vec::new(),
            verbatim: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|def| def.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeDef> {
        self.types.iter_mut().find(|def| def.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DefKind> {
        self.get(name).map(TypeDef::kind)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter().filter_map(|def| match def {
            TypeDef::Object(node) => Some(node),
            _ => None,
        })
    }

    /// Object types matching `pred`, in declaration order.
    pub fn filter_objects<F>(&self, pred: F) -> impl Iterator<Item = &ObjectType>
    where
        F: Fn(&ObjectType) -> bool,
    {
        self.objects().filter(move |node| pred(node))
    }

    pub fn object(&self, name: &str) -> Result<&ObjectType, NodeError> {
        match self.get(name) {
            Some(TypeDef::Object(node)) => Ok(node),
            Some(other) => Err(NodeError::UnexpectedKind {
                name: name.to_string(),
                expected: DefKind::Object,
                actual: other.kind(),
            }),
            None => Err(NodeError::TypeNotFound(name.to_string())),
        }
    }

    pub fn object_mut(&mut self, name: &str) -> Result<&mut ObjectType, NodeError> {
        match self.get_mut(name) {
            Some(TypeDef::Object(node)) => Ok(node),
            Some(other) => Err(NodeError::UnexpectedKind {
                name: name.to_string(),
                expected: DefKind::Object,
                actual: other.kind(),
            }),
            None => Err(NodeError::TypeNotFound(name.to_string())),
        }
    }

    /// Return the named object type, appending an empty one if absent.
    pub fn ensure_object(&mut self, name: &str) -> Result<&mut ObjectType, NodeError> {
        if !self.contains(name) {
            self.types.push(TypeDef::Object(ObjectType::new(name)));
        }

        self.object_mut(name)
    }

    /// Insert a definition unless an identical one already exists.
    ///
    /// A same-named definition that differs is a collision; the schema is
    /// left untouched in that case.
    pub fn ensure(&mut self, def: TypeDef) -> Result<Merge, NodeError> {
        match self.get(def.name()) {
            None => {
                self.types.push(def);
                Ok(Merge::Added)
            }
            Some(existing) if *existing == def => Ok(Merge::Unchanged),
            Some(existing) => Err(NodeError::Collision {
                existing: existing.label(),
                synthesized: def.label(),
            }),
        }
    }

    /// Append a field to an object type unless an identical field exists.
    pub fn ensure_field(&mut self, type_name: &str, field: Field) -> Result<Merge, NodeError> {
        let object = self.object_mut(type_name)?;

        match object.field(&field.name) {
            None => {
                object.fields.push(field);
                Ok(Merge::Added)
            }
            Some(existing) if *existing == field => Ok(Merge::Unchanged),
            Some(existing) => Err(NodeError::Collision {
                existing: format!("{type_name}.{}: {}", existing.name, existing.ty),
                synthesized: format!("{type_name}.{}: {}", field.name, field.ty),
            }),
        }
    }

    /// Remove every use of the named directives, e.g. once their passes ran.
    pub fn strip_directives(&mut self, names: &[&str]) {
        for def in &mut self.types {
            def.strip_directives(names);
        }
    }
}
