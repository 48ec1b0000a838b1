//! Minimal `@model` pass.
//!
//! Enough of the upstream model transform to drive the searchable pass end
//! to end: placement checks, the root `Query` type with a getter per model,
//! implicit timestamps, and the versioning fields added under `VERSION`
//! conflict detection.

use crate::{context::TransformContext, error::TransformError, transform::TransformPass};
use searchgen_schema::node::{Field, InputValue, ObjectType, TypeDef, TypeRef, Value};
use searchgen_utils::upper_first;
use tracing::debug;

pub const MODEL: &str = "model";
pub const PRIMARY_KEY: &str = "primaryKey";

pub const QUERY: &str = "Query";
const ROOT_TYPES: &[&str] = &["Query", "Mutation", "Subscription"];

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

pub const VERSION: &str = "_version";
pub const DELETED: &str = "_deleted";
pub const LAST_CHANGED_AT: &str = "_lastChangedAt";

/// Conflict-resolution bookkeeping, never filterable or sortable.
pub const RESERVED_FIELDS: &[&str] = &[VERSION, DELETED, LAST_CHANGED_AT];

/// Added to every model type when it does not declare them.
pub const IMPLICIT_TIMESTAMPS: &[&str] = &[CREATED_AT, UPDATED_AT];

/// Primary-key field names: the `@primaryKey` field plus its
/// `sortKeyFields`, else `id`.
#[must_use]
pub fn key_fields(node: &ObjectType) -> Vec<String> {
    let Some(field) = node.fields.iter().find(|f| f.has_directive(PRIMARY_KEY)) else {
        return vec!["id".to_string()];
    };

    let mut keys = vec![field.name.clone()];
    if let Some(Value::List(sort_keys)) = field
        .directive(PRIMARY_KEY)
        .and_then(|d| d.argument("sortKeyFields"))
    {
        keys.extend(sort_keys.iter().filter_map(Value::as_str).map(str::to_string));
    }

    keys
}

///
/// ModelTransformer
///

#[derive(Debug, Default)]
pub struct ModelTransformer {
    models: Vec<String>,
}

impl ModelTransformer {
    fn getter(node: &ObjectType) -> Field {
        let mut getter = Field::new(
            format!("get{}", upper_first(&node.name)),
            TypeRef::named(node.name.clone()),
        );

        for key in key_fields(node) {
            let ty = node
                .field(&key)
                .map_or_else(|| TypeRef::named("ID"), |f| f.ty.clone());
            getter = getter.with_argument(InputValue::new(key, ty.non_null()));
        }

        getter
    }
}

impl TransformPass for ModelTransformer {
    fn name(&self) -> &'static str {
        "ModelTransformer"
    }

    fn directives(&self) -> &'static [&'static str] {
        &[MODEL, PRIMARY_KEY]
    }

    fn validate(&mut self, ctx: &TransformContext) -> Result<(), TransformError> {
        self.models.clear();

        for def in &ctx.schema.types {
            let uses = def.directives().iter().filter(|d| d.name == MODEL).count();
            if uses == 0 {
                continue;
            }

            let TypeDef::Object(node) = def else {
                return Err(TransformError::invalid(
                    def.name(),
                    format!("@{MODEL} can only be used on object types"),
                ));
            };
            if uses > 1 {
                return Err(TransformError::invalid(
                    &node.name,
                    format!("@{MODEL} may only appear once"),
                ));
            }
            if ROOT_TYPES.contains(&node.name.as_str()) {
                return Err(TransformError::invalid(
                    &node.name,
                    format!("@{MODEL} cannot be used on a root operation type"),
                ));
            }

            let keys = node.fields.iter().filter(|f| f.has_directive(PRIMARY_KEY));
            if keys.count() > 1 {
                return Err(TransformError::invalid(
                    &node.name,
                    format!("@{PRIMARY_KEY} may only be used on one field"),
                ));
            }

            self.models.push(node.name.clone());
        }

        Ok(())
    }

    fn synthesize_types(&mut self, ctx: &mut TransformContext) -> Result<(), TransformError> {
        let versioned = ctx.config().is_versioned();
        ctx.schema.ensure_object(QUERY)?;

        for name in &self.models {
            let mut implicit = vec![
                Field::new(CREATED_AT, TypeRef::named("AWSDateTime").non_null()),
                Field::new(UPDATED_AT, TypeRef::named("AWSDateTime").non_null()),
            ];
            if versioned {
                implicit.extend([
                    Field::new(VERSION, TypeRef::named("Int").non_null()),
                    Field::new(DELETED, TypeRef::named("Boolean")),
                    Field::new(LAST_CHANGED_AT, TypeRef::named("AWSTimestamp").non_null()),
                ]);
            }

            let node = ctx.schema.object_mut(name)?;
            for field in implicit {
                if node.field(&field.name).is_none() {
                    debug!(model = %name, field = %field.name, "adding implicit field");
                    node.fields.push(field);
                }
            }

            let getter = Self::getter(node);
            ctx.schema.ensure_field(QUERY, getter)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::GraphQLTransform;
    use searchgen_config_build::{ConflictDetection, ResolvedConfig, TransformConfig};
    use searchgen_schema::parse::parse_schema;

    fn run(sdl: &str, config: ResolvedConfig) -> Result<String, TransformError> {
        GraphQLTransform::new(config)
            .with_pass(ModelTransformer::default())
            .transform(sdl)
            .map(|out| out.schema)
    }

    #[test]
    fn adds_getter_and_timestamps() {
        let schema = run("type Post @model { id: ID! title: String }", ResolvedConfig::default())
            .unwrap();

        assert_eq!(
            schema,
            "type Post {\n  id: ID!\n  title: String\n  createdAt: AWSDateTime!\n  updatedAt: AWSDateTime!\n}\n\ntype Query {\n  getPost(id: ID!): Post\n}\n"
        );
    }

    #[test]
    fn declared_timestamps_are_kept() {
        let schema = run(
            "type Post @model { id: ID! createdAt: String updatedAt: String }",
            ResolvedConfig::default(),
        )
        .unwrap();

        assert!(schema.contains("createdAt: String\n"));
        assert!(!schema.contains("AWSDateTime"));
    }

    #[test]
    fn versioning_fields_follow_conflict_detection() {
        let config = TransformConfig::default()
            .with_conflict_detection(ConflictDetection::Version)
            .validate()
            .unwrap();
        let schema = run("type Post @model { id: ID! }", config).unwrap();

        assert!(schema.contains("_version: Int!"));
        assert!(schema.contains("_deleted: Boolean\n"));
        assert!(schema.contains("_lastChangedAt: AWSTimestamp!"));
    }

    #[test]
    fn primary_key_shapes_the_getter() {
        let sdl = r#"type Order @model {
            customerId: ID! @primaryKey(sortKeyFields: ["placedAt"])
            placedAt: AWSDateTime!
        }"#;
        let schema = run(sdl, ResolvedConfig::default()).unwrap();

        assert!(schema.contains("getOrder(customerId: ID!, placedAt: AWSDateTime!): Order"));
        assert!(!schema.contains("@primaryKey"));

        let parsed = parse_schema(sdl).unwrap();
        assert_eq!(
            key_fields(parsed.object("Order").unwrap()),
            vec!["customerId".to_string(), "placedAt".to_string()]
        );
    }

    #[test]
    fn model_on_non_object_is_rejected() {
        let err = run("enum Status @model { OPEN }", ResolvedConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            TransformError::InvalidDirectiveUsage { ref type_name, .. } if type_name == "Status"
        ));
    }
}
