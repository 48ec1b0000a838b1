use crate::{ConflictDetection, ConflictHandler, SearchConfig, TransformConfig};
use std::collections::BTreeMap;

///
/// ResolvedConfig
///
/// Validated, read-only view handed to every transform pass.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedConfig {
    improve_pluralization: bool,
    conflict_handler: Option<ConflictHandler>,
    conflict_detection: ConflictDetection,
    search: SearchConfig,
    plurals: BTreeMap<String, String>,
}

impl ResolvedConfig {
    pub(crate) fn new(config: TransformConfig) -> Self {
        let project = config.resolver_config.project;

        Self {
            improve_pluralization: config.feature_flags.improve_pluralization,
            conflict_handler: project.map(|p| p.conflict_handler),
            conflict_detection: project.map(|p| p.conflict_detection).unwrap_or_default(),
            search: config.search,
            plurals: config.plurals,
        }
    }

    #[must_use]
    pub const fn improve_pluralization(&self) -> bool {
        self.improve_pluralization
    }

    #[must_use]
    pub const fn conflict_handler(&self) -> Option<ConflictHandler> {
        self.conflict_handler
    }

    /// `NONE` when no project resolver config was given.
    #[must_use]
    pub const fn conflict_detection(&self) -> ConflictDetection {
        self.conflict_detection
    }

    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        matches!(self.conflict_detection, ConflictDetection::Version)
    }

    #[must_use]
    pub const fn search(&self) -> &SearchConfig {
        &self.search
    }

    #[must_use]
    pub const fn plurals(&self) -> &BTreeMap<String, String> {
        &self.plurals
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

impl TryFrom<TransformConfig> for ResolvedConfig {
    type Error = crate::ConfigError;

    fn try_from(config: TransformConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}
