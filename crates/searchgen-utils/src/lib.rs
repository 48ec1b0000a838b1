//! Naming helpers shared by the searchgen crates: case conversion, English
//! pluralization for default query names, and stable hash segments.

pub mod case;
pub mod hash;
pub mod plural;

pub use case::{NameError, lower_first, resource_name, to_pascal, upper_first, validate_name};
pub use hash::hash_segment;
pub use plural::Pluralizer;
