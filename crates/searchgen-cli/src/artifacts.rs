use anyhow::{Context, Result, bail};
use searchgen::TransformOutput;
use std::{
    fs,
    path::{Component, Path},
};
use tracing::debug;

pub const SCHEMA_FILE: &str = "schema.graphql";
pub const RESOLVER_DIR: &str = "resolvers";
pub const STACK_DIR: &str = "stacks";

/// Write the schema, every resolver template and every stack template
/// under `out`. Returns the number of files written.
pub fn write(output: &TransformOutput, out: &Path) -> Result<usize> {
    let mut written = 0;

    write_file(&out.join(SCHEMA_FILE), output.schema.as_bytes())?;
    written += 1;

    for (key, text) in &output.resolvers {
        let path = out.join(RESOLVER_DIR).join(checked_name(key)?);
        write_file(&path, text.as_bytes())?;
        written += 1;
    }

    for (name, template) in &output.stacks {
        let mut json = serde_json::to_vec_pretty(template)?;
        json.push(b'\n');

        let path = out.join(STACK_DIR).join(format!("{}.json", checked_name(name)?));
        write_file(&path, &json)?;
        written += 1;
    }

    Ok(written)
}

// keys become file names, so they must stay a single normal component
fn checked_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => bail!("'{name}' is not a plain file name"),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn output() -> TransformOutput {
        TransformOutput {
            schema: "type Query {\n  ping: String\n}\n".to_string(),
            resolvers: BTreeMap::from([(
                "Query.searchPosts.req.vtl".to_string(),
                "$util.toJson({})\n".to_string(),
            )]),
            stacks: BTreeMap::from([(
                "SearchableStack".to_string(),
                json!({ "Resources": {} }),
            )]),
        }
    }

    #[test]
    fn writes_layout_under_out_dir() {
        let dir = tempfile::tempdir().unwrap();

        let written = write(&output(), dir.path()).unwrap();
        assert_eq!(written, 3);

        assert_eq!(
            fs::read_to_string(dir.path().join("schema.graphql")).unwrap(),
            "type Query {\n  ping: String\n}\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("resolvers/Query.searchPosts.req.vtl")).unwrap(),
            "$util.toJson({})\n"
        );

        let stack = fs::read_to_string(dir.path().join("stacks/SearchableStack.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&stack).unwrap();
        assert_eq!(value, json!({ "Resources": {} }));
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = output();
        out.resolvers
            .insert("../escape.vtl".to_string(), String::new());

        assert!(write(&out, dir.path()).is_err());
        assert!(checked_name("Query.searchPosts.res.vtl").is_ok());
        assert!(checked_name("a/b").is_err());
    }
}
