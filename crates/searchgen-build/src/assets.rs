use searchgen_utils::hash_segment;
use std::collections::BTreeMap;

///
/// AssetKeyGenerator
///
/// Produces the opaque path segment templates are uploaded under. Callers
/// must not rely on how the segment is derived.
///

pub trait AssetKeyGenerator: Send + Sync {
    fn segment(&self, templates: &BTreeMap<String, String>) -> String;
}

///
/// ContentHashKeys
/// xxh3 over every template key and body in the run
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHashKeys;

impl AssetKeyGenerator for ContentHashKeys {
    fn segment(&self, templates: &BTreeMap<String, String>) -> String {
        hash_segment(
            templates
                .iter()
                .flat_map(|(key, body)| [key.as_bytes(), body.as_bytes()]),
        )
    }
}

///
/// FixedAssetKey
/// pins the segment, e.g. to a deployment id
///

#[derive(Clone, Debug)]
pub struct FixedAssetKey(pub String);

impl AssetKeyGenerator for FixedAssetKey {
    fn segment(&self, _templates: &BTreeMap<String, String>) -> String {
        self.0.clone()
    }
}

/// Bucket-relative suffix of an uploaded template.
#[must_use]
pub fn resolver_location(segment: &str, key: &str) -> String {
    format!("resolvers/{segment}/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(body: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Query.searchPosts.req.vtl".to_string(), body.to_string()),
            ("Query.searchPosts.res.vtl".to_string(), "$util.toJson({})".to_string()),
        ])
    }

    #[test]
    fn content_hash_is_stable_and_content_sensitive() {
        let keys = ContentHashKeys;

        assert_eq!(keys.segment(&templates("a")), keys.segment(&templates("a")));
        assert_ne!(keys.segment(&templates("a")), keys.segment(&templates("b")));
    }

    #[test]
    fn fixed_key_ignores_templates() {
        let keys = FixedAssetKey("build-42".to_string());

        assert_eq!(keys.segment(&templates("a")), "build-42");
        assert_eq!(
            resolver_location("build-42", "Query.searchPosts.req.vtl"),
            "resolvers/build-42/Query.searchPosts.req.vtl"
        );
    }
}
