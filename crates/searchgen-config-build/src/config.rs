use crate::{ConfigError, ResolvedConfig};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

pub const DEFAULT_ENGINE_VERSION: &str = "7.10";
pub const DEFAULT_INSTANCE_TYPE: &str = "t3.small.elasticsearch";
pub const DEFAULT_INSTANCE_COUNT: u32 = 1;
pub const DEFAULT_EBS_VOLUME_GB: u32 = 10;
pub const DEFAULT_STACK_NAME: &str = "SearchableStack";

///
/// TransformConfig
///
/// Raw, user-facing configuration. Keys are camelCase to match the host
/// pipeline's JSON; snake_case aliases keep hand-written TOML readable.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformConfig {
    #[serde(alias = "feature_flags")]
    pub feature_flags: FeatureFlags,

    #[serde(alias = "resolver_config")]
    pub resolver_config: ResolverConfig,

    pub search: SearchConfig,

    /// Irregular plural overrides, singular to plural.
    pub plurals: BTreeMap<String, String>,
}

impl TransformConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from disk; `.json` files use the JSON loader, anything else TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    #[must_use]
    pub fn with_conflict_detection(mut self, detection: ConflictDetection) -> Self {
        let project = self.resolver_config.project.get_or_insert(ProjectConfig {
            conflict_handler: ConflictHandler::Automerge,
            conflict_detection: detection,
        });
        project.conflict_detection = detection;

        self
    }

    #[must_use]
    pub fn with_plural(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.plurals.insert(singular.into(), plural.into());
        self
    }

    /// Check every value once and freeze the result.
    pub fn validate(self) -> Result<ResolvedConfig, ConfigError> {
        self.search.validate()?;

        for (singular, plural) in &self.plurals {
            if !is_word(singular) || !is_word(plural) {
                return Err(ConfigError::invalid(
                    "plurals",
                    format!("'{singular}' = '{plural}' must both be alphabetic words"),
                ));
            }
        }

        Ok(ResolvedConfig::new(self))
    }
}

///
/// FeatureFlags
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureFlags {
    #[serde(alias = "improve_pluralization")]
    pub improve_pluralization: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            improve_pluralization: true,
        }
    }
}

///
/// ResolverConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverConfig {
    pub project: Option<ProjectConfig>,
}

///
/// ProjectConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ProjectConfig {
    pub conflict_handler: ConflictHandler,
    pub conflict_detection: ConflictDetection,
}

///
/// ConflictDetection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictDetection {
    #[default]
    #[display("NONE")]
    None,
    #[display("VERSION")]
    Version,
}

impl FromStr for ConflictDetection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "VERSION" => Ok(Self::Version),
            _ => Err(ConfigError::invalid(
                "ConflictDetection",
                format!("expected NONE or VERSION, got '{s}'"),
            )),
        }
    }
}

///
/// ConflictHandler
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictHandler {
    #[display("AUTOMERGE")]
    Automerge,
    #[display("LAMBDA")]
    Lambda,
    #[display("OPTIMISTIC_CONCURRENCY")]
    OptimisticConcurrency,
}

///
/// DeletionPolicy
/// what happens to the search domain when its stack goes away
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum DeletionPolicy {
    #[default]
    Delete,
    Retain,
    Snapshot,
}

///
/// SearchConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(alias = "engine_version")]
    pub engine_version: String,

    #[serde(alias = "instance_type")]
    pub instance_type: String,

    #[serde(alias = "instance_count")]
    pub instance_count: u32,

    #[serde(rename = "ebsVolumeGB", alias = "ebs_volume_gb")]
    pub ebs_volume_gb: u32,

    #[serde(alias = "deletion_policy")]
    pub deletion_policy: DeletionPolicy,

    #[serde(alias = "domain_name", skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(alias = "stack_name")]
    pub stack_name: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine_version: DEFAULT_ENGINE_VERSION.to_string(),
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            instance_count: DEFAULT_INSTANCE_COUNT,
            ebs_volume_gb: DEFAULT_EBS_VOLUME_GB,
            deletion_policy: DeletionPolicy::default(),
            domain_name: None,
            stack_name: DEFAULT_STACK_NAME.to_string(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !is_engine_version(&self.engine_version) {
            return Err(ConfigError::invalid(
                "search.engineVersion",
                format!("'{}' is not a MAJOR.MINOR version", self.engine_version),
            ));
        }
        if self.instance_type.is_empty() || self.instance_type.contains(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "search.instanceType",
                format!("'{}' is not an instance type", self.instance_type),
            ));
        }
        if self.instance_count == 0 {
            return Err(ConfigError::invalid(
                "search.instanceCount",
                "must be at least 1",
            ));
        }
        if self.ebs_volume_gb < DEFAULT_EBS_VOLUME_GB {
            return Err(ConfigError::invalid(
                "search.ebsVolumeGB",
                format!("must be at least {DEFAULT_EBS_VOLUME_GB}"),
            ));
        }
        if let Some(name) = &self.domain_name {
            if !is_domain_name(name) {
                return Err(ConfigError::invalid(
                    "search.domainName",
                    format!(
                        "'{name}' must be 3-28 lowercase letters, digits or hyphens, starting with a letter"
                    ),
                ));
            }
        }
        if self.stack_name.is_empty() || !self.stack_name.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::invalid(
                "search.stackName",
                format!("'{}' must be alphanumeric", self.stack_name),
            ));
        }

        Ok(())
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_engine_version(s: &str) -> bool {
    let mut parts = s.split('.');
    let numeric = |p: Option<&str>| p.is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));

    numeric(parts.next()) && numeric(parts.next()) && parts.next().is_none()
}

fn is_domain_name(s: &str) -> bool {
    (3..=28).contains(&s.len())
        && s.starts_with(|c: char| c.is_ascii_lowercase())
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = TransformConfig::from_toml_str("").unwrap();

        assert_eq!(config, TransformConfig::default());
        assert!(config.feature_flags.improve_pluralization);
        assert_eq!(config.search.engine_version, "7.10");
        assert_eq!(config.search.deletion_policy, DeletionPolicy::Delete);
        assert_eq!(config.search.stack_name, "SearchableStack");
    }

    #[test]
    fn toml_accepts_snake_case_keys() {
        let config = TransformConfig::from_toml_str(
            r#"
            [feature_flags]
            improve_pluralization = false

            [resolver_config.project]
            ConflictHandler = "AUTOMERGE"
            ConflictDetection = "VERSION"

            [search]
            engine_version = "7.9"
            instance_count = 3
            deletion_policy = "Retain"
            domain_name = "post-search"

            [plurals]
            Person = "People"
            "#,
        )
        .unwrap();

        assert!(!config.feature_flags.improve_pluralization);
        assert_eq!(
            config.resolver_config.project,
            Some(ProjectConfig {
                conflict_handler: ConflictHandler::Automerge,
                conflict_detection: ConflictDetection::Version,
            })
        );
        assert_eq!(config.search.instance_count, 3);
        assert_eq!(config.search.deletion_policy, DeletionPolicy::Retain);
        assert_eq!(config.plurals.get("Person").map(String::as_str), Some("People"));
    }

    #[test]
    fn json_matches_host_shape() {
        let config = TransformConfig::from_json_str(
            r#"{
                "featureFlags": { "improvePluralization": true },
                "resolverConfig": {
                    "project": {
                        "ConflictHandler": "OPTIMISTIC_CONCURRENCY",
                        "ConflictDetection": "NONE"
                    }
                },
                "search": { "ebsVolumeGB": 20 }
            }"#,
        )
        .unwrap();

        let project = config.resolver_config.project.unwrap();
        assert_eq!(
            project.conflict_handler,
            ConflictHandler::OptimisticConcurrency
        );
        assert_eq!(project.conflict_detection, ConflictDetection::None);
        assert_eq!(config.search.ebs_volume_gb, 20);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TransformConfig::from_toml_str("[search]\nshards = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));

        let err = TransformConfig::from_json_str(r#"{"resolverConfig": {"models": {}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn validate_rejects_bad_search_values() {
        let mut config = TransformConfig::default();
        config.search.domain_name = Some("Post_Search".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                key: "search.domainName",
                ..
            })
        ));

        let mut config = TransformConfig::default();
        config.search.engine_version = "latest".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                key: "search.engineVersion",
                ..
            })
        ));

        let mut config = TransformConfig::default();
        config.search.instance_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_word_plurals() {
        let config = TransformConfig::default().with_plural("Data", "");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "plurals", .. })
        ));
    }

    #[test]
    fn conflict_detection_parses_case_insensitively() {
        assert_eq!(
            "version".parse::<ConflictDetection>().unwrap(),
            ConflictDetection::Version
        );
        assert_eq!(ConflictDetection::None.to_string(), "NONE");
        assert!("OPTIMISTIC".parse::<ConflictDetection>().is_err());
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("transform.json");
        fs::File::create(&json)
            .unwrap()
            .write_all(br#"{"search": {"instanceCount": 2}}"#)
            .unwrap();
        assert_eq!(
            TransformConfig::from_path(&json).unwrap().search.instance_count,
            2
        );

        let toml = dir.path().join("searchgen.toml");
        fs::write(&toml, "[search]\ninstanceCount = 4\n").unwrap();
        assert_eq!(
            TransformConfig::from_path(&toml).unwrap().search.instance_count,
            4
        );

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            TransformConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
