//! searchgen - expands `@searchable` model types into a search API.
//!
//! Reads an SDL file plus an optional TOML/JSON config and writes the
//! transformed schema, resolver templates and stack templates to a
//! directory.

mod artifacts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use searchgen::config::{ConflictDetection, TransformConfig};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SEARCHGEN_LOG";

#[derive(Parser, Debug)]
#[command(name = "searchgen", version = searchgen::VERSION)]
#[command(about = "Generate search queries and infrastructure for @searchable models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform a schema and write every artifact under --out
    Transform(TransformArgs),
}

#[derive(clap::Args, Debug)]
struct TransformArgs {
    /// Input GraphQL SDL
    #[arg(long)]
    schema: PathBuf,

    /// Transform config (.toml, or .json for the resolver-config shape)
    #[arg(long, env = "SEARCHGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory, created if missing
    #[arg(long)]
    out: PathBuf,

    /// Override the project conflict detection (NONE or VERSION)
    #[arg(long)]
    conflict_detection: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Transform(args) => transform(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn transform(args: &TransformArgs) -> Result<()> {
    let config = load_config(args)?;
    let sdl = fs::read_to_string(&args.schema)
        .with_context(|| format!("reading schema {}", args.schema.display()))?;

    let output = searchgen::transform(&sdl, config)
        .with_context(|| format!("transforming {}", args.schema.display()))?;

    let written = artifacts::write(&output, &args.out)?;
    info!(files = written, out = %args.out.display(), "artifacts written");

    Ok(())
}

fn load_config(args: &TransformArgs) -> Result<TransformConfig> {
    let mut config = match &args.config {
        Some(path) => TransformConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TransformConfig::default(),
    };

    if let Some(raw) = &args.conflict_detection {
        let detection: ConflictDetection = raw.parse()?;
        config = config.with_conflict_detection(detection);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn transform_args_parse() {
        let cli = Cli::try_parse_from([
            "searchgen",
            "transform",
            "--schema",
            "schema.graphql",
            "--out",
            "build",
            "--conflict-detection",
            "version",
        ])
        .unwrap();

        let Command::Transform(args) = cli.command;
        assert_eq!(args.schema, PathBuf::from("schema.graphql"));
        assert_eq!(args.out, PathBuf::from("build"));

        let config = load_config(&args).unwrap();
        assert!(config.validate().unwrap().is_versioned());
    }

    #[test]
    fn unknown_conflict_detection_is_an_error() {
        let args = TransformArgs {
            schema: PathBuf::from("schema.graphql"),
            config: None,
            out: PathBuf::from("build"),
            conflict_detection: Some("optimistic".to_string()),
        };

        assert!(load_config(&args).is_err());
    }

    #[test]
    fn transform_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.graphql");
        let config = dir.path().join("searchgen.toml");
        fs::write(&schema, "type Post @model @searchable { id: ID! title: String }").unwrap();
        fs::write(&config, "[search]\nstackName = \"PostSearch\"\n").unwrap();

        let out = dir.path().join("out");
        transform(&TransformArgs {
            schema,
            config: Some(config),
            out: out.clone(),
            conflict_detection: None,
        })
        .unwrap();

        assert!(out.join("schema.graphql").is_file());
        assert!(out.join("resolvers/Query.searchPosts.req.vtl").is_file());
        assert!(out.join("stacks/PostSearch.json").is_file());
    }
}
