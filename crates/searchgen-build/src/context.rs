use crate::{assets::AssetKeyGenerator, error::TransformError, resources::StackRegistry};
use searchgen_config_build::ResolvedConfig;
use searchgen_schema::node::Schema;
use searchgen_utils::Pluralizer;
use std::{collections::BTreeMap, sync::Arc};

///
/// TransformContext
///
/// Accumulators for a single run. Passes read the config and append to the
/// schema, the resolver template map and the stack registry.
///

pub struct TransformContext {
    pub schema: Schema,
    pub stacks: StackRegistry,
    resolvers: BTreeMap<String, String>,
    config: ResolvedConfig,
    pluralizer: Pluralizer,
    asset_keys: Arc<dyn AssetKeyGenerator>,
}

impl TransformContext {
    #[must_use]
    pub fn new(
        schema: Schema,
        config: ResolvedConfig,
        asset_keys: Arc<dyn AssetKeyGenerator>,
    ) -> Self {
        let pluralizer =
            Pluralizer::new(config.improve_pluralization()).with_overrides(config.plurals());

        Self {
            schema,
            stacks: StackRegistry::new(),
            resolvers: BTreeMap::new(),
            config,
            pluralizer,
            asset_keys,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    #[must_use]
    pub const fn pluralizer(&self) -> &Pluralizer {
        &self.pluralizer
    }

    #[must_use]
    pub fn asset_keys(&self) -> &dyn AssetKeyGenerator {
        self.asset_keys.as_ref()
    }

    #[must_use]
    pub const fn resolvers(&self) -> &BTreeMap<String, String> {
        &self.resolvers
    }

    /// Register a template under `key`. Re-adding identical text is a no-op.
    pub fn add_resolver(
        &mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<(), TransformError> {
        let key = key.into();
        let template = template.into();

        match self.resolvers.get(&key) {
            Some(existing) if *existing == template => Ok(()),
            Some(_) => Err(TransformError::NameCollision {
                existing: format!("template {key}"),
                synthesized: format!("template {key}"),
            }),
            None => {
                self.resolvers.insert(key, template);
                Ok(())
            }
        }
    }

    pub(crate) fn into_parts(self) -> (Schema, BTreeMap<String, String>, StackRegistry) {
        (self.schema, self.resolvers, self.stacks)
    }
}
