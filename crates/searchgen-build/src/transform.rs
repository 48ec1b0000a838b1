use crate::{
    assets::{AssetKeyGenerator, ContentHashKeys},
    context::TransformContext,
    error::TransformError,
    model::ModelTransformer,
    searchable::SearchableTransformer,
};
use searchgen_config_build::ResolvedConfig;
use searchgen_schema::{parse::parse_schema, validate::validate_schema};
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::{debug, info, info_span};

///
/// TransformPass
///
/// One directive transformer. The orchestrator runs each phase across all
/// passes before moving on, so a pass may rely on every earlier pass having
/// finished the same phase.
///

pub trait TransformPass {
    fn name(&self) -> &'static str;

    /// Directives owned by this pass; removed from the printed schema.
    fn directives(&self) -> &'static [&'static str] {
        &[]
    }

    fn validate(&mut self, _ctx: &TransformContext) -> Result<(), TransformError> {
        Ok(())
    }

    fn synthesize_types(&mut self, _ctx: &mut TransformContext) -> Result<(), TransformError> {
        Ok(())
    }

    fn generate_templates(&mut self, _ctx: &mut TransformContext) -> Result<(), TransformError> {
        Ok(())
    }

    fn synthesize_resources(&mut self, _ctx: &mut TransformContext) -> Result<(), TransformError> {
        Ok(())
    }
}

///
/// Phase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Validate,
    SynthesizeTypes,
    GenerateTemplates,
    SynthesizeResources,
}

impl Phase {
    const ORDER: [Self; 4] = [
        Self::Validate,
        Self::SynthesizeTypes,
        Self::GenerateTemplates,
        Self::SynthesizeResources,
    ];

    fn run(
        self,
        pass: &mut dyn TransformPass,
        ctx: &mut TransformContext,
    ) -> Result<(), TransformError> {
        match self {
            Self::Validate => pass.validate(ctx),
            Self::SynthesizeTypes => pass.synthesize_types(ctx),
            Self::GenerateTemplates => pass.generate_templates(ctx),
            Self::SynthesizeResources => pass.synthesize_resources(ctx),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validate => "validate",
            Self::SynthesizeTypes => "synthesize_types",
            Self::GenerateTemplates => "generate_templates",
            Self::SynthesizeResources => "synthesize_resources",
        })
    }
}

///
/// TransformOutput
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransformOutput {
    pub schema: String,
    pub resolvers: BTreeMap<String, String>,
    pub stacks: BTreeMap<String, Value>,
}

impl TransformOutput {
    #[must_use]
    pub fn resolver(&self, key: &str) -> Option<&str> {
        self.resolvers.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn stack(&self, name: &str) -> Option<&Value> {
        self.stacks.get(name)
    }
}

///
/// GraphQLTransform
///

pub struct GraphQLTransform {
    passes: Vec<Box<dyn TransformPass>>,
    config: ResolvedConfig,
    asset_keys: Arc<dyn AssetKeyGenerator>,
}

impl GraphQLTransform {
    /// An orchestrator with no passes.
    #[must_use]
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            passes: Vec::new(),
            config,
            asset_keys: Arc::new(ContentHashKeys),
        }
    }

    /// The model stand-in followed by the searchable pass.
    #[must_use]
    pub fn with_default_passes(config: ResolvedConfig) -> Self {
        Self::new(config)
            .with_pass(ModelTransformer::default())
            .with_pass(SearchableTransformer::default())
    }

    #[must_use]
    pub fn with_pass(mut self, pass: impl TransformPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    #[must_use]
    pub fn with_asset_keys(mut self, keys: impl AssetKeyGenerator + 'static) -> Self {
        self.asset_keys = Arc::new(keys);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn transform(&mut self, sdl: &str) -> Result<TransformOutput, TransformError> {
        let schema = parse_schema(sdl)?;
        let mut ctx = TransformContext::new(schema, self.config.clone(), Arc::clone(&self.asset_keys));

        for phase in Phase::ORDER {
            let _span = info_span!("phase", %phase).entered();

            for pass in &mut self.passes {
                debug!(pass = pass.name(), "running");
                phase.run(pass.as_mut(), &mut ctx)?;
            }
        }

        let owned: Vec<&str> = self
            .passes
            .iter()
            .flat_map(|pass| pass.directives().iter().copied())
            .collect();
        ctx.schema.strip_directives(&owned);

        validate_schema(&ctx.schema)?;

        let printed = ctx.schema.to_string();
        parse_schema(&printed)?;

        let (schema, resolvers, stacks) = ctx.into_parts();
        info!(
            types = schema.types.len(),
            resolvers = resolvers.len(),
            stacks = stacks.len(),
            "transform complete"
        );

        Ok(TransformOutput {
            schema: printed,
            resolvers,
            stacks: stacks.to_templates(),
        })
    }
}
