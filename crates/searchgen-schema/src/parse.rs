//! SDL ingest: lowers a `graphql-parser` document into owned schema nodes.

use crate::node::{
    Directive, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType, ObjectType,
    ScalarType, Schema, TypeDef, TypeRef, UnionType, Value,
};
use graphql_parser::schema as gql;
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("schema syntax error: {0}")]
    Syntax(String),

    #[error("schema document is empty")]
    Empty,
}

/// Parse SDL text into a [`Schema`], preserving declaration order.
pub fn parse_schema(sdl: &str) -> Result<Schema, ParseError> {
    if sdl.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let document = gql::parse_schema::<String>(sdl).map_err(|e| ParseError::Syntax(e.to_string()))?;

    let mut schema = Schema::new();
    for definition in document.definitions {
        match definition {
            gql::Definition::TypeDefinition(def) => schema.types.push(lower_type(def)),
            other => schema.verbatim.push(other.to_string().trim_end().to_string()),
        }
    }

    Ok(schema)
}

fn lower_type(def: gql::TypeDefinition<'_, String>) -> TypeDef {
    match def {
        gql::TypeDefinition::Object(node) => TypeDef::Object(ObjectType {
            name: node.name,
            description: node.description,
            implements: node.implements_interfaces,
            directives: lower_directives(node.directives),
            fields: node.fields.into_iter().map(lower_field).collect(),
        }),
        gql::TypeDefinition::Interface(node) => TypeDef::Interface(InterfaceType {
            name: node.name,
            description: node.description,
            implements: node.implements_interfaces,
            directives: lower_directives(node.directives),
            fields: node.fields.into_iter().map(lower_field).collect(),
        }),
        gql::TypeDefinition::Union(node) => TypeDef::Union(UnionType {
            name: node.name,
            description: node.description,
            directives: lower_directives(node.directives),
            members: node.types,
        }),
        gql::TypeDefinition::Enum(node) => TypeDef::Enum(EnumType {
            name: node.name,
            description: node.description,
            directives: lower_directives(node.directives),
            values: node
                .values
                .into_iter()
                .map(|value| EnumValue {
                    name: value.name,
                    description: value.description,
                    directives: lower_directives(value.directives),
                })
                .collect(),
        }),
        gql::TypeDefinition::InputObject(node) => TypeDef::InputObject(InputObjectType {
            name: node.name,
            description: node.description,
            directives: lower_directives(node.directives),
            fields: node.fields.into_iter().map(lower_input_value).collect(),
        }),
        gql::TypeDefinition::Scalar(node) => TypeDef::Scalar(ScalarType {
            name: node.name,
            description: node.description,
            directives: lower_directives(node.directives),
        }),
    }
}

fn lower_field(field: gql::Field<'_, String>) -> Field {
    Field {
        name: field.name,
        description: field.description,
        arguments: field.arguments.into_iter().map(lower_input_value).collect(),
        ty: lower_type_ref(field.field_type),
        directives: lower_directives(field.directives),
    }
}

fn lower_input_value(value: gql::InputValue<'_, String>) -> InputValue {
    InputValue {
        name: value.name,
        description: value.description,
        ty: lower_type_ref(value.value_type),
        default_value: value.default_value.map(lower_value),
        directives: lower_directives(value.directives),
    }
}

fn lower_type_ref(ty: gql::Type<'_, String>) -> TypeRef {
    match ty {
        gql::Type::NamedType(name) => TypeRef::Named(name),
        gql::Type::ListType(inner) => TypeRef::List(Box::new(lower_type_ref(*inner))),
        gql::Type::NonNullType(inner) => TypeRef::NonNull(Box::new(lower_type_ref(*inner))),
    }
}

fn lower_directives(directives: Vec<gql::Directive<'_, String>>) -> Vec<Directive> {
    directives
        .into_iter()
        .map(|directive| Directive {
            name: directive.name,
            arguments: directive
                .arguments
                .into_iter()
                .map(|(name, value)| (name, lower_value(value)))
                .collect(),
        })
        .collect()
}

fn lower_value(value: gql::Value<'_, String>) -> Value {
    match value {
        gql::Value::Null => Value::Null,
        gql::Value::Boolean(b) => Value::Boolean(b),
        gql::Value::Int(n) => n.as_i64().map_or(Value::Null, Value::Int),
        gql::Value::Float(n) => Value::Float(n),
        gql::Value::String(s) => Value::String(s),
        gql::Value::Enum(s) => Value::Enum(s),
        gql::Value::Variable(s) => Value::Variable(s),
        gql::Value::List(items) => Value::List(items.into_iter().map(lower_value).collect()),
        gql::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, lower_value(v)))
                .collect(),
        ),
    }
}
