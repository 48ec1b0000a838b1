pub mod intrinsic;

use crate::error::TransformError;
use searchgen_config_build::DeletionPolicy;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

///
/// Resource
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl Resource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Map::new(),
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn depends_on(mut self, id: &str) -> Self {
        self.depends_on.push(id.to_string());
        self
    }

    /// Applies to both stack deletion and replacement on update.
    #[must_use]
    pub fn with_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

///
/// Parameter
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn string(description: &str) -> Self {
        Self {
            kind: "String".to_string(),
            default: None,
            description: Some(description.to_string()),
        }
    }

    #[must_use]
    pub fn number(description: &str) -> Self {
        Self {
            kind: "Number".to_string(),
            ..Self::string(description)
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

///
/// Output
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: Value,
}

///
/// ResourceHandle
/// logical id of something already present in a group
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn reference(&self) -> Value {
        intrinsic::reference(&self.0)
    }

    #[must_use]
    pub fn get_att(&self, attribute: &str) -> Value {
        intrinsic::get_att(&self.0, attribute)
    }
}

///
/// ResourceGroup
///
/// One named stack. Shared infrastructure goes through the `ensure_*`
/// methods, which build a declaration only when its id is free and hand
/// back a handle either way. Per-type declarations go through `insert`,
/// where a taken id is a collision.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceGroup {
    name: String,
    parameters: BTreeMap<String, Parameter>,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ensure<F>(&mut self, id: &str, build: F) -> ResourceHandle
    where
        F: FnOnce() -> Resource,
    {
        if self.resources.contains_key(id) {
            debug!(stack = %self.name, id, "resource already declared");
        } else {
            self.resources.insert(id.to_string(), build());
        }

        ResourceHandle(id.to_string())
    }

    pub fn ensure_parameter<F>(&mut self, id: &str, build: F) -> ResourceHandle
    where
        F: FnOnce() -> Parameter,
    {
        self.parameters.entry(id.to_string()).or_insert_with(build);

        ResourceHandle(id.to_string())
    }

    pub fn ensure_output<F>(&mut self, id: &str, build: F)
    where
        F: FnOnce() -> Output,
    {
        self.outputs.entry(id.to_string()).or_insert_with(build);
    }

    pub fn insert(&mut self, id: &str, resource: Resource) -> Result<ResourceHandle, TransformError> {
        if let Some(existing) = self.resources.get(id) {
            return Err(TransformError::NameCollision {
                existing: format!("{} {id}", existing.kind),
                synthesized: format!("{} {id}", resource.kind),
            });
        }
        self.resources.insert(id.to_string(), resource);

        Ok(ResourceHandle(id.to_string()))
    }

    #[must_use]
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(id, r)| (id.as_str(), r))
    }

    #[must_use]
    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.get(id)
    }

    #[must_use]
    pub fn output(&self, id: &str) -> Option<&Output> {
        self.outputs.get(id)
    }

    #[must_use]
    pub fn count_of(&self, kind: &str) -> usize {
        self.resources.values().filter(|r| r.kind == kind).count()
    }

    /// Render as a CloudFormation template.
    #[must_use]
    pub fn to_template(&self) -> Value {
        let mut template = Map::new();
        template.insert("AWSTemplateFormatVersion".into(), json!("2010-09-09"));
        template.insert(
            "Description".into(),
            json!(format!("{}: search domain and resolvers", self.name)),
        );

        if !self.parameters.is_empty() {
            template.insert("Parameters".into(), json!(self.parameters));
        }
        template.insert("Resources".into(), json!(self.resources));
        if !self.outputs.is_empty() {
            template.insert("Outputs".into(), json!(self.outputs));
        }

        Value::Object(template)
    }
}

///
/// StackRegistry
/// every group produced by a run, keyed by stack name
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackRegistry {
    groups: BTreeMap<String, ResourceGroup>,
}

impl StackRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// The named group, created empty on first use.
    pub fn group(&mut self, name: &str) -> &mut ResourceGroup {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| ResourceGroup::new(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResourceGroup> {
        self.groups.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn to_templates(&self) -> BTreeMap<String, Value> {
        self.groups
            .iter()
            .map(|(name, group)| (name.clone(), group.to_template()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Resource {
        Resource::new("AWS::Elasticsearch::Domain").with_policy(DeletionPolicy::Delete)
    }

    #[test]
    fn ensure_builds_once_and_returns_a_handle_each_time() {
        let mut group = ResourceGroup::new("SearchableStack");
        let mut builds = 0;

        for _ in 0..3 {
            let handle = group.ensure("OpenSearchDomain", || {
                builds += 1;
                domain()
            });
            assert_eq!(handle.id(), "OpenSearchDomain");
        }

        assert_eq!(builds, 1);
        assert_eq!(group.count_of("AWS::Elasticsearch::Domain"), 1);
    }

    #[test]
    fn insert_rejects_taken_ids() {
        let mut group = ResourceGroup::new("SearchableStack");
        group.insert("QuerySearchPostsResolver", Resource::new("AWS::AppSync::Resolver")).unwrap();

        let err = group
            .insert("QuerySearchPostsResolver", Resource::new("AWS::AppSync::Resolver"))
            .unwrap_err();
        assert!(matches!(err, TransformError::NameCollision { .. }));
    }

    #[test]
    fn template_serializes_policies_and_skips_empty_sections() {
        let mut group = ResourceGroup::new("SearchableStack");
        group.ensure("OpenSearchDomain", domain);

        let template = group.to_template();

        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert!(template.get("Parameters").is_none());
        assert_eq!(
            template["Resources"]["OpenSearchDomain"],
            json!({
                "Type": "AWS::Elasticsearch::Domain",
                "DeletionPolicy": "Delete",
                "UpdateReplacePolicy": "Delete"
            })
        );
    }

    #[test]
    fn registry_creates_groups_on_demand() {
        let mut stacks = StackRegistry::new();
        assert!(stacks.is_empty());

        stacks.group("SearchableStack").ensure("OpenSearchDomain", domain);
        stacks.group("SearchableStack").ensure("OpenSearchDomain", domain);

        assert_eq!(stacks.len(), 1);
        assert_eq!(
            stacks
                .get("SearchableStack")
                .map(|g| g.count_of("AWS::Elasticsearch::Domain")),
            Some(1)
        );
        assert!(stacks.to_templates().contains_key("SearchableStack"));
    }
}
