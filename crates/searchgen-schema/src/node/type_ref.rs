use crate::prelude::*;
use std::fmt;

///
/// TypeRef
/// a (possibly wrapped) reference to a named type, e.g. `[Post!]!`
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list_of(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// The innermost named type.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// True if a list wrapper appears anywhere in the reference.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_sdl() {
        let ty = TypeRef::list_of(TypeRef::named("Post").non_null()).non_null();
        assert_eq!(ty.to_string(), "[Post!]!");
        assert_eq!(ty.base_name(), "Post");
        assert!(ty.is_list());
        assert!(ty.is_non_null());
    }

    #[test]
    fn non_null_does_not_double_wrap() {
        let ty = TypeRef::named("ID").non_null().non_null();
        assert_eq!(ty.to_string(), "ID!");
        assert!(!ty.is_list());
    }
}
