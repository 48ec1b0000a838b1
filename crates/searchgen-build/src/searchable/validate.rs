use super::{SEARCHABLE, SearchableConfig, SearchableField};
use crate::{
    error::TransformError,
    model::{IMPLICIT_TIMESTAMPS, MODEL, QUERY, RESERVED_FIELDS, key_fields},
};
use searchgen_schema::{
    node::{Directive, ObjectType, Schema, TypeDef, Value},
    types::FieldKind,
};
use searchgen_utils::{Pluralizer, resource_name, upper_first, validate_name};
use std::collections::BTreeMap;

const QUERIES: &str = "queries";
const SEARCH: &str = "search";
const DATE_TIME: &str = "AWSDateTime";

/// Project every `@searchable` type into its config, in declaration order.
///
/// The schema is not modified. The first problem found aborts the run.
pub fn collect(
    schema: &Schema,
    pluralizer: &Pluralizer,
) -> Result<Vec<SearchableConfig>, TransformError> {
    let mut configs = Vec::new();
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    let mut resource_ids: BTreeMap<String, String> = BTreeMap::new();

    for def in &schema.types {
        let uses: Vec<&Directive> = def
            .directives()
            .iter()
            .filter(|d| d.name == SEARCHABLE)
            .collect();
        let Some(directive) = uses.first() else {
            continue;
        };

        let TypeDef::Object(node) = def else {
            return Err(TransformError::invalid(
                def.name(),
                format!("@{SEARCHABLE} can only be used on object types, not {}", def.kind()),
            ));
        };
        if uses.len() > 1 {
            return Err(TransformError::invalid(
                &node.name,
                format!("@{SEARCHABLE} may only appear once"),
            ));
        }
        if !node.has_directive(MODEL) {
            return Err(TransformError::invalid(
                &node.name,
                format!("types annotated with @{SEARCHABLE} must also be annotated with @{MODEL}"),
            ));
        }

        let query_field = match custom_query_name(node, directive)? {
            Some(name) => name,
            None => format!("{SEARCH}{}", upper_first(&pluralizer.plural(&node.name))),
        };

        if let Some(owner) = owners.get(&query_field) {
            return Err(TransformError::NameCollision {
                existing: format!("{QUERY}.{query_field} (searchable {owner})"),
                synthesized: format!("{QUERY}.{query_field} (searchable {})", node.name),
            });
        }
        owners.insert(query_field.clone(), node.name.clone());

        // resource ids drop case and punctuation, so distinct fields can share one
        let id = resource_name(&query_field);
        if let Some(other) = resource_ids.get(&id) {
            return Err(TransformError::NameCollision {
                existing: format!("{QUERY}.{other} (resource id {QUERY}{id})"),
                synthesized: format!("{QUERY}.{query_field} (resource id {QUERY}{id})"),
            });
        }
        resource_ids.insert(id, query_field.clone());

        configs.push(SearchableConfig {
            type_name: node.name.clone(),
            query_field,
            fields: enabled_fields(schema, node),
            key_fields: key_fields(node),
        });
    }

    Ok(configs)
}

// custom_query_name
// `queries: null` and `queries: { search: null }` fall back to the default
fn custom_query_name(
    node: &ObjectType,
    directive: &Directive,
) -> Result<Option<String>, TransformError> {
    for (name, _) in &directive.arguments {
        if name != QUERIES {
            return Err(TransformError::invalid(
                &node.name,
                format!("unknown @{SEARCHABLE} argument '{name}'"),
            ));
        }
    }

    let queries = match directive.argument(QUERIES) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(queries)) => queries,
        Some(other) => {
            return Err(TransformError::invalid(
                &node.name,
                format!("'{QUERIES}' must be an object, got {}", other.kind_label()),
            ));
        }
    };

    if let Some(key) = queries.keys().find(|key| key.as_str() != SEARCH) {
        return Err(TransformError::invalid(
            &node.name,
            format!("unknown key '{key}' in '{QUERIES}'"),
        ));
    }

    match queries.get(SEARCH) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) if name.is_empty() => Err(TransformError::invalid(
            &node.name,
            format!("'{QUERIES}.{SEARCH}' must be a non-empty string"),
        )),
        Some(Value::String(name)) => match validate_name(name) {
            Ok(()) => Ok(Some(name.clone())),
            Err(e) => Err(TransformError::invalid(
                &node.name,
                format!("'{QUERIES}.{SEARCH}' is not a valid field name: {e}"),
            )),
        },
        Some(other) => Err(TransformError::invalid(
            &node.name,
            format!(
                "'{QUERIES}.{SEARCH}' must be a non-empty string, got {}",
                other.kind_label()
            ),
        )),
    }
}

// enabled_fields
// declared fields in order, then any timestamps the model pass will add
fn enabled_fields(schema: &Schema, node: &ObjectType) -> Vec<SearchableField> {
    let mut fields: Vec<SearchableField> = node
        .fields
        .iter()
        .map(|field| {
            let base = field.ty.base_name();

            SearchableField {
                name: field.name.clone(),
                kind: FieldKind::classify(schema, base),
                list: field.ty.is_list(),
                implicit: false,
                reserved: RESERVED_FIELDS.contains(&field.name.as_str()),
                timestamp: base == DATE_TIME || IMPLICIT_TIMESTAMPS.contains(&field.name.as_str()),
            }
        })
        .collect();

    for name in IMPLICIT_TIMESTAMPS {
        if node.field(name).is_none() {
            fields.push(SearchableField {
                name: (*name).to_string(),
                kind: FieldKind::classify(schema, DATE_TIME),
                list: false,
                implicit: true,
                reserved: false,
                timestamp: true,
            });
        }
    }

    fields
}
