//! Info command implementation

use crate::cli::utils;
use crate::ApiResource;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info")
        .about("Show tool information, or summarize an OpenAPI document")
        .arg(
            clap::Arg::new("spec")
                .help("OpenAPI document to summarize")
                .value_name("SPEC"),
        )
        .arg(
            clap::Arg::new("detailed")
                .short('d')
                .long("detailed")
                .help("Show detailed information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    if matches.contains_id("spec") {
        let scope = utils::load_scope(matches).await?;
        if let Some(document) = scope.document() {
            println!("Title: {}", document.info.title);
            if let Some(version) = &document.info.version {
                println!("API version: {}", version);
            }
            if let Some(version) = document.version.as_ref().or(document.swagger_version.as_ref()) {
                println!("Format version: {}", version);
            }
            println!("Paths: {}", document.paths.len());
        }
        println!("Component schemas: {}", scope.components().len());
        println!("\nResources:");
        for resource in scope.resources() {
            print_resource(resource, 1, detailed);
        }
        return Ok(());
    }

    println!("apiscope - OpenAPI introspection for generic dashboards");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Repository: {}", env!("CARGO_PKG_REPOSITORY"));

    if detailed {
        println!("\nDetailed Information:");
        println!("  - Inlines component $refs with cycle and depth protection");
        println!("  - Builds a resource tree from OpenAPI paths");
        println!("  - Ranks endpoints for dashboards and entity collections");
        println!("  - Normalizes wrapped and single-object payloads");
        println!("  - Detects date, id, type, description, actor and metric fields");
        println!("  - XDG-compliant configuration directory");
    }

    Ok(())
}

fn print_resource(resource: &ApiResource, depth: usize, detailed: bool) {
    let marker = if resource.requires_parent_id { " (needs parent id)" } else { "" };
    println!("{}{} [{}]{}", "  ".repeat(depth), resource.name, resource.key, marker);
    if detailed {
        for operation in &resource.operations {
            println!(
                "{}{} {} ({:?})",
                "  ".repeat(depth + 2),
                operation.http_method,
                operation.path_template,
                operation.operation_type
            );
        }
    }
    for child in &resource.children {
        print_resource(child, depth + 1, detailed);
    }
}
