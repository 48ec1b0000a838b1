use crate::{
    node::{DefKind, Field, InputValue, Schema, TypeDef},
    prelude::*,
    types::is_implicit_type,
};

// Output positions accept anything but input objects; input positions accept
// only scalars, enums and input objects.
pub fn validate_references(schema: &Schema, errs: &mut ErrorTree) {
    for def in &schema.types {
        let mut tree = ErrorTree::new();

        match def {
            TypeDef::Object(node) => check_fields(schema, &node.fields, &mut tree),
            TypeDef::Interface(node) => check_fields(schema, &node.fields, &mut tree),
            TypeDef::InputObject(node) => {
                for field in &node.fields {
                    check_input(schema, field, &mut tree);
                }
            }
            TypeDef::Union(node) => {
                for member in &node.members {
                    if schema.kind_of(member) != Some(DefKind::Object) {
                        err!(tree, "union member '{member}' is not an object type");
                    }
                }
            }
            TypeDef::Enum(_) | TypeDef::Scalar(_) => {}
        }

        errs.merge_for(def.name(), tree);
    }
}

fn check_fields(schema: &Schema, fields: &[Field], tree: &mut ErrorTree) {
    for field in fields {
        let base = field.ty.base_name();

        match schema.kind_of(base) {
            Some(DefKind::InputObject) => {
                tree.add_for(&field.name, format!("input type '{base}' used as output"));
            }
            None if !is_implicit_type(base) => {
                tree.add_for(&field.name, format!("unknown type '{base}'"));
            }
            _ => {}
        }

        for argument in &field.arguments {
            let mut args = ErrorTree::new();
            check_input(schema, argument, &mut args);
            tree.merge_for(field.name.clone(), args);
        }
    }
}

fn check_input(schema: &Schema, value: &InputValue, tree: &mut ErrorTree) {
    let base = value.ty.base_name();

    match schema.kind_of(base) {
        Some(DefKind::Scalar | DefKind::Enum | DefKind::InputObject) => {}
        Some(kind) => {
            tree.add_for(&value.name, format!("{kind} '{base}' used as input"));
        }
        None if !is_implicit_type(base) => {
            tree.add_for(&value.name, format!("unknown type '{base}'"));
        }
        None => {}
    }
}
