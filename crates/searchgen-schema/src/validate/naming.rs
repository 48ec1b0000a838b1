use crate::{
    node::{Schema, TypeDef},
    prelude::*,
};
use searchgen_utils::validate_name;
use std::collections::BTreeSet;

pub fn validate_type_names(schema: &Schema, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for def in &schema.types {
        let name = def.name();

        if let Err(e) = validate_name(name) {
            errs.add_for(name, e);
        }
        if !seen.insert(name) {
            err!(errs, "duplicate type name '{name}'");
        }
    }
}

pub fn validate_member_names(schema: &Schema, errs: &mut ErrorTree) {
    for def in &schema.types {
        let members: Vec<&str> = match def {
            TypeDef::Object(node) => node.fields.iter().map(|f| f.name.as_str()).collect(),
            TypeDef::Interface(node) => node.fields.iter().map(|f| f.name.as_str()).collect(),
            TypeDef::InputObject(node) => node.fields.iter().map(|f| f.name.as_str()).collect(),
            TypeDef::Enum(node) => node.values.iter().map(|v| v.name.as_str()).collect(),
            TypeDef::Union(_) | TypeDef::Scalar(_) => continue,
        };

        let mut tree = ErrorTree::new();
        let mut seen = BTreeSet::new();
        for member in members {
            if let Err(e) = validate_name(member) {
                tree.add_for(member, e);
            }
            if !seen.insert(member) {
                err!(tree, "duplicate member '{member}'");
            }
        }

        errs.merge_for(def.name(), tree);
    }
}
