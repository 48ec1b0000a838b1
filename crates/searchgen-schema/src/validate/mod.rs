//! Schema validation orchestration and shared helpers.

pub mod naming;
pub mod reference;

use crate::{error::ErrorTree, node::Schema};

/// Run full schema validation in a staged, deterministic order.
pub fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    let mut errors = ErrorTree::new();

    // Phase 1: names are legal and unique.
    naming::validate_type_names(schema, &mut errors);
    naming::validate_member_names(schema, &mut errors);

    // Phase 2: every reference resolves to an input or output type as required.
    reference::validate_references(schema, &mut errors);

    errors.result()
}
