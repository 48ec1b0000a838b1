//! The `@searchable` pass: a search query per annotated model type, backed
//! by one shared search domain.

pub mod resources;
pub mod templates;
pub mod types;
pub mod validate;

use crate::{
    context::TransformContext, error::TransformError, model::QUERY, transform::TransformPass,
};
use searchgen_schema::types::{FieldKind, ScalarKind};
use searchgen_utils::resource_name;
use serde::Serialize;
use std::collections::BTreeMap;
use templates::StashTemplate;
use tracing::info;

pub const SEARCHABLE: &str = "searchable";

///
/// SearchableField
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchableField {
    pub name: String,
    pub kind: FieldKind,
    pub list: bool,

    /// Added by the model pass rather than declared.
    pub implicit: bool,

    /// Versioning bookkeeping such as `_version`.
    pub reserved: bool,

    /// `createdAt`, `updatedAt` or any `AWSDateTime` field.
    pub timestamp: bool,
}

impl SearchableField {
    #[must_use]
    pub fn filter_kind(&self) -> Option<ScalarKind> {
        if self.reserved {
            None
        } else {
            self.kind.filter_kind()
        }
    }

    #[must_use]
    pub fn is_filterable(&self) -> bool {
        self.filter_kind().is_some()
    }

    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.is_filterable() && !self.list
    }

    /// Indexed without a `.keyword` sub-field.
    #[must_use]
    pub fn is_non_keyword(&self) -> bool {
        match self.filter_kind() {
            Some(kind) => kind.is_non_keyword() || self.timestamp,
            None => false,
        }
    }
}

///
/// SearchableConfig
///
/// Validated settings for one `@searchable` type. Built once during
/// validation and only read afterwards.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchableConfig {
    pub type_name: String,
    pub query_field: String,
    pub fields: Vec<SearchableField>,
    pub key_fields: Vec<String>,
}

impl SearchableConfig {
    pub fn filterable_fields(&self) -> impl Iterator<Item = &SearchableField> {
        self.fields.iter().filter(|f| f.is_filterable())
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &SearchableField> {
        self.fields.iter().filter(|f| f.is_sortable())
    }

    #[must_use]
    pub fn non_keyword_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_non_keyword())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Index name in the search domain.
    #[must_use]
    pub fn index_name(&self) -> String {
        self.type_name.to_lowercase()
    }

    #[must_use]
    pub fn filter_input(&self) -> String {
        format!("{}FilterInput", self.type_name)
    }

    #[must_use]
    pub fn sortable_fields_enum(&self) -> String {
        format!("Searchable{}SortableFields", self.type_name)
    }

    #[must_use]
    pub fn sort_input(&self) -> String {
        format!("Searchable{}SortInput", self.type_name)
    }

    #[must_use]
    pub fn connection(&self) -> String {
        format!("Searchable{}Connection", self.type_name)
    }

    #[must_use]
    pub fn request_key(&self) -> String {
        format!("{QUERY}.{}.req.vtl", self.query_field)
    }

    #[must_use]
    pub fn response_key(&self) -> String {
        format!("{QUERY}.{}.res.vtl", self.query_field)
    }

    #[must_use]
    pub fn function_id(&self) -> String {
        format!("{QUERY}{}DataResolverFn", resource_name(&self.query_field))
    }

    #[must_use]
    pub fn resolver_id(&self) -> String {
        format!("{QUERY}{}Resolver", resource_name(&self.query_field))
    }
}

///
/// SearchableTransformer
///

#[derive(Debug, Default)]
pub struct SearchableTransformer {
    configs: Vec<SearchableConfig>,
    stash: BTreeMap<String, StashTemplate>,
}

impl SearchableTransformer {
    /// Configs from the most recent validation, in declaration order.
    #[must_use]
    pub fn configs(&self) -> &[SearchableConfig] {
        &self.configs
    }
}

impl TransformPass for SearchableTransformer {
    fn name(&self) -> &'static str {
        "SearchableModelTransformer"
    }

    fn directives(&self) -> &'static [&'static str] {
        &[SEARCHABLE]
    }

    fn validate(&mut self, ctx: &TransformContext) -> Result<(), TransformError> {
        self.configs = validate::collect(&ctx.schema, ctx.pluralizer())?;
        self.stash.clear();

        Ok(())
    }

    fn synthesize_types(&mut self, ctx: &mut TransformContext) -> Result<(), TransformError> {
        types::synthesize(&mut ctx.schema, &self.configs)
    }

    fn generate_templates(&mut self, ctx: &mut TransformContext) -> Result<(), TransformError> {
        let versioned = ctx.config().is_versioned();

        for config in &self.configs {
            ctx.add_resolver(config.request_key(), templates::request(config, versioned))?;
            ctx.add_resolver(config.response_key(), templates::response(versioned))?;
            self.stash
                .insert(config.query_field.clone(), templates::stash(config));
        }

        Ok(())
    }

    fn synthesize_resources(&mut self, ctx: &mut TransformContext) -> Result<(), TransformError> {
        resources::synthesize(ctx, &self.configs, &self.stash)?;

        if !self.configs.is_empty() {
            info!(
                types = self.configs.len(),
                queries = ?self.configs.iter().map(|c| c.query_field.as_str()).collect::<Vec<_>>(),
                "searchable resources synthesized"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, kind: FieldKind) -> SearchableField {
        SearchableField {
            name: name.to_string(),
            kind,
            list: false,
            implicit: false,
            reserved: false,
            timestamp: false,
        }
    }

    #[test]
    fn reserved_fields_are_neither_filterable_nor_sortable() {
        let mut version = field("_version", FieldKind::Scalar(ScalarKind::Int));
        version.reserved = true;

        assert!(!version.is_filterable());
        assert!(!version.is_sortable());
        assert!(!version.is_non_keyword());
    }

    #[test]
    fn lists_filter_but_do_not_sort() {
        let mut tags = field("tags", FieldKind::Scalar(ScalarKind::String));
        tags.list = true;

        assert!(tags.is_filterable());
        assert!(!tags.is_sortable());
    }

    #[test]
    fn timestamps_are_non_keyword() {
        let mut created = field("createdAt", FieldKind::Scalar(ScalarKind::String));
        assert!(!created.is_non_keyword());

        created.timestamp = true;
        assert!(created.is_non_keyword());
        assert!(field("views", FieldKind::Scalar(ScalarKind::Int)).is_non_keyword());
        assert!(!field("kind", FieldKind::Enum("Kind".into())).is_non_keyword());
    }

    #[test]
    fn names_derive_from_type_and_query() {
        let config = SearchableConfig {
            type_name: "BlogPost".to_string(),
            query_field: "searchBlogPosts".to_string(),
            fields: Vec::new(),
            key_fields: vec!["id".to_string()],
        };

        assert_eq!(config.index_name(), "blogpost");
        assert_eq!(config.filter_input(), "BlogPostFilterInput");
        assert_eq!(config.sort_input(), "SearchableBlogPostSortInput");
        assert_eq!(config.sortable_fields_enum(), "SearchableBlogPostSortableFields");
        assert_eq!(config.connection(), "SearchableBlogPostConnection");
        assert_eq!(config.request_key(), "Query.searchBlogPosts.req.vtl");
        assert_eq!(config.response_key(), "Query.searchBlogPosts.res.vtl");
        assert_eq!(config.function_id(), "QuerySearchBlogPostsDataResolverFn");
        assert_eq!(config.resolver_id(), "QuerySearchBlogPostsResolver");
    }
}
