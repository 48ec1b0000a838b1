use super::SearchableConfig;
use crate::{error::TransformError, model::QUERY};
use searchgen_schema::{
    node::{
        EnumType, Field, InputObjectType, InputValue, Merge, ObjectType, Schema, TypeDef, TypeRef,
    },
    types::ScalarKind,
};
use std::collections::BTreeSet;
use tracing::debug;

pub const SORT_DIRECTION: &str = "SearchableSortDirection";

const TEXT_OPERATORS: &[&str] = &[
    "ne",
    "gt",
    "lt",
    "gte",
    "lte",
    "eq",
    "match",
    "matchPhrase",
    "matchPhrasePrefix",
    "multiMatch",
    "exists",
    "wildcard",
    "regexp",
    "range",
];
const NUMERIC_OPERATORS: &[&str] = &["ne", "gt", "lt", "gte", "lte", "eq", "range"];
const BOOLEAN_OPERATORS: &[&str] = &["eq", "ne"];

/// Shared filter input name for a scalar family.
#[must_use]
pub fn scalar_filter_name(kind: ScalarKind) -> String {
    format!("Searchable{kind}FilterInput")
}

/// The operator set for a scalar family. Enums never get their own set;
/// they arrive here as `String`.
#[must_use]
pub fn scalar_filter_input(kind: ScalarKind) -> InputObjectType {
    let scalar = kind.graphql_scalar();
    let operators = match kind {
        ScalarKind::String | ScalarKind::Id => TEXT_OPERATORS,
        ScalarKind::Int | ScalarKind::Float => NUMERIC_OPERATORS,
        ScalarKind::Boolean => BOOLEAN_OPERATORS,
    };

    operators
        .iter()
        .fold(InputObjectType::new(scalar_filter_name(kind)), |input, op| {
            let ty = match *op {
                "exists" => TypeRef::named("Boolean"),
                "range" => TypeRef::list_of(TypeRef::named(scalar)),
                _ => TypeRef::named(scalar),
            };
            input.with_field(InputValue::new(*op, ty))
        })
}

/// Merge every type a search query needs, then the query field itself.
pub fn synthesize(schema: &mut Schema, configs: &[SearchableConfig]) -> Result<(), TransformError> {
    for config in configs {
        for field in &config.fields {
            if !field.kind.is_supported() {
                debug!(
                    type_name = %config.type_name,
                    field = %field.name,
                    kind = ?field.kind,
                    "field left out of search filters"
                );
            }
        }

        let kinds: BTreeSet<ScalarKind> = config
            .filterable_fields()
            .filter_map(super::SearchableField::filter_kind)
            .collect();
        for kind in kinds {
            merge(schema, TypeDef::InputObject(scalar_filter_input(kind)))?;
        }

        merge(schema, TypeDef::InputObject(root_filter_input(config)))?;

        let sortable = sortable_fields_enum(config);
        if let Some(sortable) = &sortable {
            merge(schema, TypeDef::Enum(sortable.clone()))?;
            merge(schema, TypeDef::Enum(EnumType::new(SORT_DIRECTION, ["ASC", "DESC"])))?;
            merge(schema, TypeDef::InputObject(sort_input(config)))?;
        }

        merge(schema, TypeDef::Object(connection(config)))?;

        schema.ensure_object(QUERY)?;
        schema.ensure_field(QUERY, query_field(config, sortable.is_some()))?;
    }

    Ok(())
}

fn merge(schema: &mut Schema, def: TypeDef) -> Result<(), TransformError> {
    let name = def.name().to_string();
    if schema.ensure(def)? == Merge::Unchanged {
        debug!(type_name = %name, "type already present");
    }

    Ok(())
}

fn root_filter_input(config: &SearchableConfig) -> InputObjectType {
    let name = config.filter_input();
    let mut input = InputObjectType::new(&name);

    for field in config.filterable_fields() {
        if let Some(kind) = field.filter_kind() {
            input.fields.push(InputValue::new(
                &field.name,
                TypeRef::named(scalar_filter_name(kind)),
            ));
        }
    }

    for connective in ["and", "or", "not"] {
        input.fields.push(InputValue::new(
            connective,
            TypeRef::list_of(TypeRef::named(&name)),
        ));
    }

    input
}

fn sortable_fields_enum(config: &SearchableConfig) -> Option<EnumType> {
    let fields: Vec<&str> = config.sortable_fields().map(|f| f.name.as_str()).collect();

    if fields.is_empty() {
        None
    } else {
        Some(EnumType::new(config.sortable_fields_enum(), fields))
    }
}

fn sort_input(config: &SearchableConfig) -> InputObjectType {
    InputObjectType::new(config.sort_input())
        .with_field(InputValue::new(
            "field",
            TypeRef::named(config.sortable_fields_enum()),
        ))
        .with_field(InputValue::new("direction", TypeRef::named(SORT_DIRECTION)))
}

fn connection(config: &SearchableConfig) -> ObjectType {
    ObjectType::new(config.connection())
        .with_field(Field::new(
            "items",
            TypeRef::list_of(TypeRef::named(&config.type_name)),
        ))
        .with_field(Field::new("nextToken", TypeRef::named("String")))
        .with_field(Field::new("total", TypeRef::named("Int")))
}

fn query_field(config: &SearchableConfig, sortable: bool) -> Field {
    let mut field = Field::new(&config.query_field, TypeRef::named(config.connection()))
        .with_argument(InputValue::new(
            "filter",
            TypeRef::named(config.filter_input()),
        ));
    if sortable {
        field = field.with_argument(InputValue::new("sort", TypeRef::named(config.sort_input())));
    }

    field
        .with_argument(InputValue::new("limit", TypeRef::named("Int")))
        .with_argument(InputValue::new("nextToken", TypeRef::named("String")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchable::validate::collect;
    use searchgen_schema::parse::parse_schema;
    use searchgen_utils::Pluralizer;

    fn synthesized(sdl: &str) -> Schema {
        let mut schema = parse_schema(sdl).unwrap();
        let configs = collect(&schema, &Pluralizer::default()).unwrap();
        synthesize(&mut schema, &configs).unwrap();
        schema
    }

    fn input_fields(schema: &Schema, name: &str) -> Vec<(String, String)> {
        match schema.get(name) {
            Some(TypeDef::InputObject(input)) => input
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.ty.to_string()))
                .collect(),
            other => panic!("expected input {name}, got {other:?}"),
        }
    }

    #[test]
    fn post_gets_query_and_supporting_types() {
        let schema = synthesized(
            "type Post @model @searchable { id: ID! title: String! createdAt: String updatedAt: String }",
        );

        for name in [
            "PostFilterInput",
            "SearchablePostSortInput",
            "SearchablePostSortableFields",
            "SearchableSortDirection",
            "SearchablePostConnection",
            "SearchableIDFilterInput",
            "SearchableStringFilterInput",
        ] {
            assert!(schema.contains(name), "missing {name}");
        }

        let query = schema.object("Query").unwrap();
        let search = query.field("searchPosts").unwrap();
        assert_eq!(search.ty.to_string(), "SearchablePostConnection");
        let args: Vec<&str> = search.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(args, vec!["filter", "sort", "limit", "nextToken"]);

        assert_eq!(
            input_fields(&schema, "PostFilterInput"),
            vec![
                ("id".into(), "SearchableIDFilterInput".into()),
                ("title".into(), "SearchableStringFilterInput".into()),
                ("createdAt".into(), "SearchableStringFilterInput".into()),
                ("updatedAt".into(), "SearchableStringFilterInput".into()),
                ("and".into(), "[PostFilterInput]".into()),
                ("or".into(), "[PostFilterInput]".into()),
                ("not".into(), "[PostFilterInput]".into()),
            ]
        );
    }

    #[test]
    fn enum_fields_use_the_string_filter() {
        let schema = synthesized(
            "enum EmploymentType { FULLTIME HOURLY }\n\
             type Employee @model @searchable { id: ID! employmentType: EmploymentType }",
        );

        let fields = input_fields(&schema, "EmployeeFilterInput");
        assert!(fields.contains(&(
            "employmentType".to_string(),
            "SearchableStringFilterInput".to_string()
        )));
        assert!(!schema.contains("SearchableEmploymentTypeFilterInput"));
    }

    #[test]
    fn shared_filters_are_created_once() {
        let schema = synthesized(
            "type Post @model @searchable { id: ID! title: String views: Int }\n\
             type Todo @model @searchable { id: ID! name: String done: Boolean }",
        );

        let count = |name: &str| schema.types.iter().filter(|t| t.name() == name).count();
        assert_eq!(count("SearchableStringFilterInput"), 1);
        assert_eq!(count("SearchableSortDirection"), 1);
        assert_eq!(count("SearchableIntFilterInput"), 1);
        assert_eq!(count("SearchableBooleanFilterInput"), 1);
        assert_eq!(schema.object("Query").unwrap().fields.len(), 2);
    }

    #[test]
    fn synthesis_is_idempotent() {
        let mut schema = parse_schema("type Post @model @searchable { id: ID! title: String }").unwrap();
        let configs = collect(&schema, &Pluralizer::default()).unwrap();

        synthesize(&mut schema, &configs).unwrap();
        let once = schema.to_string();
        synthesize(&mut schema, &configs).unwrap();

        assert_eq!(schema.to_string(), once);
    }

    #[test]
    fn conflicting_existing_type_is_a_collision() {
        let mut schema = parse_schema(
            "type Post @model @searchable { id: ID! }\n\
             type SearchablePostConnection { items: [Post] }",
        )
        .unwrap();
        let configs = collect(&schema, &Pluralizer::default()).unwrap();

        assert!(matches!(
            synthesize(&mut schema, &configs),
            Err(TransformError::NameCollision { .. })
        ));
    }

    #[test]
    fn operator_sets_match_their_family() {
        let names = |kind| {
            scalar_filter_input(kind)
                .fields
                .into_iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
        };

        assert_eq!(names(ScalarKind::Boolean), vec!["eq", "ne"]);
        assert_eq!(names(ScalarKind::Float).len(), NUMERIC_OPERATORS.len());
        assert!(names(ScalarKind::String).contains(&"matchPhrase".to_string()));

        let text = scalar_filter_input(ScalarKind::Id);
        assert_eq!(text.field("exists").unwrap().ty.to_string(), "Boolean");
        assert_eq!(text.field("range").unwrap().ty.to_string(), "[ID]");
    }
}
