use super::{
    SearchableConfig,
    templates::{self, Fragment, REQUEST_VERSION, StashTemplate},
};
use crate::{
    assets::resolver_location,
    context::TransformContext,
    error::TransformError,
    model::QUERY,
    resources::{
        Output, Parameter, Resource, ResourceGroup, ResourceHandle,
        intrinsic::{concat, join, select, split},
    },
};
use searchgen_config_build::SearchConfig;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const API_ID: &str = "AppSyncApiId";
pub const DEPLOYMENT_BUCKET: &str = "S3DeploymentBucket";
pub const DEPLOYMENT_ROOT_KEY: &str = "S3DeploymentRootKey";
pub const STASH_FUNCTION_ID: &str = "StashSetupFunctionId";
pub const INSTANCE_TYPE: &str = "OpenSearchInstanceType";
pub const INSTANCE_COUNT: &str = "OpenSearchInstanceCount";
pub const EBS_VOLUME_GB: &str = "OpenSearchEBSVolumeGB";

pub const STREAMING_ROLE: &str = "OpenSearchStreamingLambdaIAMRole";
pub const ACCESS_ROLE: &str = "OpenSearchAccessIAMRole";
pub const DOMAIN: &str = "OpenSearchDomain";
pub const DATA_SOURCE: &str = "OpenSearchDataSource";

pub const DOMAIN_ARN_OUTPUT: &str = "OpenSearchDomainArn";
pub const DOMAIN_ENDPOINT_OUTPUT: &str = "OpenSearchDomainEndpoint";

pub const ROLE_TYPE: &str = "AWS::IAM::Role";
pub const DOMAIN_TYPE: &str = "AWS::Elasticsearch::Domain";
pub const DATA_SOURCE_TYPE: &str = "AWS::AppSync::DataSource";
pub const FUNCTION_TYPE: &str = "AWS::AppSync::FunctionConfiguration";
pub const RESOLVER_TYPE: &str = "AWS::AppSync::Resolver";

const POLICY_VERSION: &str = "2012-10-17";
const STREAMING_ACTIONS: &[&str] = &["es:ESHttpPost", "es:ESHttpPut", "es:ESHttpDelete"];
const ACCESS_ACTIONS: &[&str] = &["es:ESHttpPost", "es:ESHttpGet", "es:ESHttpHead"];

///
/// SharedResources
/// handles to the per-group infrastructure every query hangs off
///

struct SharedResources {
    api_id: ResourceHandle,
    bucket: ResourceHandle,
    root_key: ResourceHandle,
    stash_function: ResourceHandle,
    domain: ResourceHandle,
    data_source: ResourceHandle,
}

/// Declare the search stack for every searchable type.
///
/// Nothing is declared when no type is searchable.
pub fn synthesize(
    ctx: &mut TransformContext,
    configs: &[SearchableConfig],
    stash: &BTreeMap<String, StashTemplate>,
) -> Result<(), TransformError> {
    if configs.is_empty() {
        return Ok(());
    }

    let segment = ctx.asset_keys().segment(ctx.resolvers());
    let search = ctx.config().search().clone();
    let group = ctx.stacks.group(&search.stack_name);

    let shared = ensure_shared(group, &search);

    for config in configs {
        let function = group.insert(
            &config.function_id(),
            function_configuration(config, &shared, &segment),
        )?;

        let request = stash
            .get(&config.query_field)
            .cloned()
            .unwrap_or_else(|| templates::stash(config));
        group.insert(
            &config.resolver_id(),
            pipeline_resolver(config, &shared, &function, &request),
        )?;
    }

    Ok(())
}

fn ensure_shared(group: &mut ResourceGroup, search: &SearchConfig) -> SharedResources {
    let api_id = group.ensure_parameter(API_ID, || {
        Parameter::string("The id of the AppSync API associated with this project.")
    });
    let bucket = group.ensure_parameter(DEPLOYMENT_BUCKET, || {
        Parameter::string("The S3 bucket containing all deployment assets for the project.")
    });
    let root_key = group.ensure_parameter(DEPLOYMENT_ROOT_KEY, || {
        Parameter::string("An S3 key relative to the deployment bucket that points to the root of the deployment directory.")
    });
    let stash_function = group.ensure_parameter(STASH_FUNCTION_ID, || {
        Parameter::string("The id of the pipeline function that prepares the resolver stash.")
    });
    let instance_type = group.ensure_parameter(INSTANCE_TYPE, || {
        Parameter::string("The type of instance to launch for the search domain.")
            .with_default(json!(search.instance_type))
    });
    let instance_count = group.ensure_parameter(INSTANCE_COUNT, || {
        Parameter::number("The number of instances to launch into the search domain.")
            .with_default(json!(search.instance_count))
    });
    let volume = group.ensure_parameter(EBS_VOLUME_GB, || {
        Parameter::number("The size in GB of the EBS volumes that contain the search data.")
            .with_default(json!(search.ebs_volume_gb))
    });

    let domain = group.ensure(DOMAIN, || {
        domain_resource(search, &instance_type, &instance_count, &volume)
    });
    let domain_arn = domain.get_att("Arn");

    group.ensure(STREAMING_ROLE, || {
        role(
            "lambda.amazonaws.com",
            "OpenSearchStreamingLambdaAccess",
            STREAMING_ACTIONS,
            vec![join("", vec![domain_arn.clone(), json!("/*")])],
        )
    });
    let access_role = group.ensure(ACCESS_ROLE, || {
        role(
            "appsync.amazonaws.com",
            "OpenSearchAccess",
            ACCESS_ACTIONS,
            vec![domain_arn.clone(), join("", vec![domain_arn.clone(), json!("/*")])],
        )
    });

    let data_source = group.ensure(DATA_SOURCE, || {
        Resource::new(DATA_SOURCE_TYPE)
            .with_property("ApiId", api_id.reference())
            .with_property("Name", json!(DATA_SOURCE))
            .with_property("Type", json!("AMAZON_ELASTICSEARCH"))
            .with_property("ServiceRoleArn", access_role.get_att("Arn"))
            .with_property(
                "ElasticsearchConfig",
                json!({
                    "AwsRegion": domain_region(&domain),
                    "Endpoint": domain_endpoint(&domain),
                }),
            )
            .depends_on(access_role.id())
    });

    group.ensure_output(DOMAIN_ARN_OUTPUT, || Output {
        description: "Search domain ARN.".to_string(),
        value: domain.get_att("Arn"),
    });
    group.ensure_output(DOMAIN_ENDPOINT_OUTPUT, || Output {
        description: "Search domain endpoint.".to_string(),
        value: domain_endpoint(&domain),
    });

    SharedResources {
        api_id,
        bucket,
        root_key,
        stash_function,
        domain,
        data_source,
    }
}

fn domain_resource(
    search: &SearchConfig,
    instance_type: &ResourceHandle,
    instance_count: &ResourceHandle,
    volume: &ResourceHandle,
) -> Resource {
    let mut domain = Resource::new(DOMAIN_TYPE)
        .with_property("ElasticsearchVersion", json!(search.engine_version))
        .with_property(
            "EBSOptions",
            json!({
                "EBSEnabled": true,
                "VolumeType": "gp2",
                "VolumeSize": volume.reference(),
            }),
        )
        .with_property(
            "ElasticsearchClusterConfig",
            json!({
                "InstanceType": instance_type.reference(),
                "InstanceCount": instance_count.reference(),
            }),
        )
        .with_policy(search.deletion_policy);

    if let Some(name) = &search.domain_name {
        domain = domain.with_property("DomainName", json!(name));
    }

    domain
}

fn role(principal: &str, policy_name: &str, actions: &[&str], resources: Vec<Value>) -> Resource {
    Resource::new(ROLE_TYPE)
        .with_property(
            "AssumeRolePolicyDocument",
            json!({
                "Version": POLICY_VERSION,
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": principal },
                    "Action": "sts:AssumeRole",
                }],
            }),
        )
        .with_property(
            "Policies",
            json!([{
                "PolicyName": policy_name,
                "PolicyDocument": {
                    "Version": POLICY_VERSION,
                    "Statement": [{
                        "Effect": "Allow",
                        "Action": actions,
                        "Resource": resources,
                    }],
                },
            }]),
        )
}

// region is the fourth segment of arn:aws:es:<region>:<account>:domain/<name>
fn domain_region(domain: &ResourceHandle) -> Value {
    select(3, split(":", domain.get_att("Arn")))
}

fn domain_endpoint(domain: &ResourceHandle) -> Value {
    join("", vec![json!("https://"), domain.get_att("DomainEndpoint")])
}

fn template_location(shared: &SharedResources, segment: &str, key: &str) -> Value {
    concat(vec![
        json!("s3://"),
        shared.bucket.reference(),
        json!("/"),
        shared.root_key.reference(),
        json!(format!("/{}", resolver_location(segment, key))),
    ])
}

fn function_configuration(
    config: &SearchableConfig,
    shared: &SharedResources,
    segment: &str,
) -> Resource {
    Resource::new(FUNCTION_TYPE)
        .with_property("ApiId", shared.api_id.reference())
        .with_property("DataSourceName", shared.data_source.get_att("Name"))
        .with_property("FunctionVersion", json!(REQUEST_VERSION))
        .with_property("Name", json!(config.function_id()))
        .with_property(
            "RequestMappingTemplateS3Location",
            template_location(shared, segment, &config.request_key()),
        )
        .with_property(
            "ResponseMappingTemplateS3Location",
            template_location(shared, segment, &config.response_key()),
        )
        .depends_on(shared.data_source.id())
}

fn pipeline_resolver(
    config: &SearchableConfig,
    shared: &SharedResources,
    function: &ResourceHandle,
    request: &StashTemplate,
) -> Resource {
    let parts = request
        .fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => json!(text),
            Fragment::DomainRegion => domain_region(&shared.domain),
            Fragment::DomainEndpoint => shared.domain.get_att("DomainEndpoint"),
        })
        .collect();

    Resource::new(RESOLVER_TYPE)
        .with_property("ApiId", shared.api_id.reference())
        .with_property("TypeName", json!(QUERY))
        .with_property("FieldName", json!(config.query_field))
        .with_property("Kind", json!("PIPELINE"))
        .with_property(
            "PipelineConfig",
            json!({
                "Functions": [
                    shared.stash_function.reference(),
                    function.get_att("FunctionId"),
                ],
            }),
        )
        .with_property("RequestMappingTemplate", concat(parts))
        .with_property(
            "ResponseMappingTemplate",
            json!(templates::pipeline_response()),
        )
        .depends_on(function.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assets::FixedAssetKey, searchable::validate::collect};
    use searchgen_config_build::{DeletionPolicy, ResolvedConfig, TransformConfig};
    use searchgen_schema::parse::parse_schema;
    use std::sync::Arc;

    fn synthesized(sdl: &str, config: ResolvedConfig) -> ResourceGroup {
        let schema = parse_schema(sdl).unwrap();
        let mut ctx = TransformContext::new(schema, config, Arc::new(FixedAssetKey("abc123".into())));
        let configs = collect(&ctx.schema, ctx.pluralizer()).unwrap();
        let stash = configs
            .iter()
            .map(|c| (c.query_field.clone(), templates::stash(c)))
            .collect();

        synthesize(&mut ctx, &configs, &stash).unwrap();
        ctx.stacks.get("SearchableStack").unwrap().clone()
    }

    #[test]
    fn single_type_stack_has_expected_shape() {
        let group = synthesized(
            "type Post @model @searchable { id: ID! title: String! }",
            ResolvedConfig::default(),
        );

        assert_eq!(group.count_of(ROLE_TYPE), 2);
        assert_eq!(group.count_of(DOMAIN_TYPE), 1);
        assert_eq!(group.count_of(DATA_SOURCE_TYPE), 1);
        assert_eq!(group.count_of(FUNCTION_TYPE), 1);
        assert_eq!(group.count_of(RESOLVER_TYPE), 1);

        let domain = group.resource(DOMAIN).unwrap();
        assert_eq!(domain.deletion_policy, Some(DeletionPolicy::Delete));
        assert_eq!(domain.update_replace_policy, Some(DeletionPolicy::Delete));
        assert_eq!(domain.property("ElasticsearchVersion"), Some(&json!("7.10")));
        assert!(domain.property("DomainName").is_none());

        let resolver = group.resource("QuerySearchPostsResolver").unwrap();
        assert_eq!(resolver.property("Kind"), Some(&json!("PIPELINE")));
        assert_eq!(
            resolver.property("PipelineConfig"),
            Some(&json!({
                "Functions": [
                    { "Ref": "StashSetupFunctionId" },
                    { "Fn::GetAtt": ["QuerySearchPostsDataResolverFn", "FunctionId"] },
                ]
            }))
        );
    }

    #[test]
    fn function_templates_live_in_the_deployment_bucket() {
        let group = synthesized(
            "type Post @model @searchable { id: ID! }",
            ResolvedConfig::default(),
        );
        let function = group.resource("QuerySearchPostsDataResolverFn").unwrap();

        assert_eq!(
            function.property("RequestMappingTemplateS3Location"),
            Some(&json!({
                "Fn::Join": ["", [
                    "s3://",
                    { "Ref": "S3DeploymentBucket" },
                    "/",
                    { "Ref": "S3DeploymentRootKey" },
                    "/resolvers/abc123/Query.searchPosts.req.vtl",
                ]]
            }))
        );
        assert!(function.property("RequestMappingTemplate").is_none());
    }

    #[test]
    fn data_source_derives_region_and_endpoint_from_the_domain() {
        let group = synthesized(
            "type Post @model @searchable { id: ID! }",
            ResolvedConfig::default(),
        );
        let data_source = group.resource(DATA_SOURCE).unwrap();

        assert_eq!(
            data_source.property("ElasticsearchConfig"),
            Some(&json!({
                "AwsRegion": {
                    "Fn::Select": [3, { "Fn::Split": [":", { "Fn::GetAtt": ["OpenSearchDomain", "Arn"] }] }]
                },
                "Endpoint": {
                    "Fn::Join": ["", ["https://", { "Fn::GetAtt": ["OpenSearchDomain", "DomainEndpoint"] }]]
                },
            }))
        );
        assert_eq!(data_source.property("Name"), Some(&json!("OpenSearchDataSource")));
    }

    #[test]
    fn shared_resources_are_declared_once_per_group() {
        let group = synthesized(
            "type Post @model @searchable { id: ID! }\ntype Todo @model @searchable { id: ID! }",
            ResolvedConfig::default(),
        );

        assert_eq!(group.count_of(DOMAIN_TYPE), 1);
        assert_eq!(group.count_of(DATA_SOURCE_TYPE), 1);
        assert_eq!(group.count_of(ROLE_TYPE), 2);
        assert_eq!(group.count_of(FUNCTION_TYPE), 2);
        assert_eq!(group.count_of(RESOLVER_TYPE), 2);
        assert!(group.resource("QuerySearchTodosResolver").is_some());
    }

    #[test]
    fn search_config_shapes_the_domain() {
        let mut raw = TransformConfig::default();
        raw.search.deletion_policy = DeletionPolicy::Retain;
        raw.search.domain_name = Some("posts".to_string());
        raw.search.instance_count = 3;
        raw.search.stack_name = "PostSearch".to_string();

        let schema = parse_schema("type Post @model @searchable { id: ID! }").unwrap();
        let mut ctx = TransformContext::new(
            schema,
            raw.validate().unwrap(),
            Arc::new(FixedAssetKey("x".into())),
        );
        let configs = collect(&ctx.schema, ctx.pluralizer()).unwrap();
        synthesize(&mut ctx, &configs, &BTreeMap::new()).unwrap();

        let group = ctx.stacks.get("PostSearch").unwrap();
        let domain = group.resource(DOMAIN).unwrap();
        assert_eq!(domain.deletion_policy, Some(DeletionPolicy::Retain));
        assert_eq!(domain.property("DomainName"), Some(&json!("posts")));
        assert_eq!(
            group.parameter(INSTANCE_COUNT).and_then(|p| p.default.clone()),
            Some(json!(3))
        );
    }

    #[test]
    fn nothing_is_declared_without_searchable_types() {
        let schema = parse_schema("type Post @model { id: ID! }").unwrap();
        let mut ctx = TransformContext::new(
            schema,
            ResolvedConfig::default(),
            Arc::new(FixedAssetKey("x".into())),
        );

        synthesize(&mut ctx, &[], &BTreeMap::new()).unwrap();
        assert!(ctx.stacks.is_empty());
    }
}
