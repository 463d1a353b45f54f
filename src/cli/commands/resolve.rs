//! Resolve command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("resolve")
        .about("Print a component schema with all references inlined")
        .arg(
            clap::Arg::new("spec")
                .help("OpenAPI document")
                .value_name("SPEC")
                .required(true),
        )
        .arg(
            clap::Arg::new("schema")
                .help("Component schema name")
                .value_name("NAME")
                .required(true),
        )
        .arg(
            clap::Arg::new("max-depth")
                .long("max-depth")
                .help("Override the configured resolution depth")
                .value_name("DEPTH")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("schema")
        .ok_or_else(|| anyhow!("Schema name is required"))?;

    let scope = utils::load_scope(matches).await?;
    let schema = match matches.get_one::<usize>("max-depth") {
        Some(depth) => crate::SchemaResolver::new(scope.components())
            .with_max_depth(*depth)
            .resolve_named(name)
            .ok_or_else(|| crate::ApiscopeError::UnknownSchema(name.clone()))?,
        None => scope.resolve_schema(name)?,
    };

    info!("Resolved schema {}", name);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
