use convert_case::{Case, Casing};
use thiserror::Error as ThisError;

///
/// NameError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name '{name}' must start with a letter or underscore")]
    InvalidStart { name: String },

    #[error("name '{name}' contains invalid character '{ch}'")]
    InvalidChar { name: String, ch: char },

    #[error("name '{name}' uses the reserved '__' prefix")]
    Reserved { name: String },
}

/// Ensure a string is a legal GraphQL name (`/[_A-Za-z][_0-9A-Za-z]*/`).
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(NameError::Empty);
    };

    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err(NameError::InvalidStart {
            name: name.to_string(),
        });
    }
    if let Some(ch) = chars.find(|c| !(*c == '_' || c.is_ascii_alphanumeric())) {
        return Err(NameError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }
    if name.starts_with("__") {
        return Err(NameError::Reserved {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Uppercase the first character, leaving the rest untouched.
#[must_use]
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Lowercase the first character, leaving the rest untouched.
#[must_use]
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// PascalCase conversion for identifiers such as `searchPosts` -> `SearchPosts`.
#[must_use]
pub fn to_pascal(s: &str) -> String {
    s.to_case(Case::Pascal)
}

// resource_name
// logical resource ids must be alphanumeric
#[must_use]
pub fn resource_name(s: &str) -> String {
    to_pascal(s)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
