//! Discover command implementation

use crate::cli::utils;
use crate::utils::truncate;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("discover")
        .about("Rank the endpoints of an OpenAPI document for a dashboard")
        .arg(
            clap::Arg::new("spec")
                .help("OpenAPI document")
                .value_name("SPEC")
                .required(true),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print endpoints as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("collections")
                .long("collections")
                .help("Only show entity collections")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let scope = utils::load_scope(matches).await?;
    let mut endpoints = scope.discover_endpoints();
    if matches.get_flag("collections") {
        endpoints.retain(|endpoint| endpoint.is_entity_collection);
    }

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&endpoints)?);
        return Ok(());
    }

    if endpoints.is_empty() {
        println!("No endpoints found.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<10}  {:<24}  {:<40}  {}",
        "PRIO", "CATEGORY", "RESOURCE", "PATH", "ICON"
    );
    for endpoint in &endpoints {
        println!(
            "{:>4}  {:<10}  {:<24}  {:<40}  {}",
            endpoint.priority,
            format!("{:?}", endpoint.category),
            truncate(&endpoint.resource_key, 24),
            truncate(&endpoint.path, 40),
            endpoint.icon
        );
    }
    println!(
        "\n{} endpoints, {} entity collections",
        endpoints.len(),
        endpoints.iter().filter(|e| e.is_entity_collection).count()
    );

    Ok(())
}
