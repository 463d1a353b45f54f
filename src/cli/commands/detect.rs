//! Detect command implementation

use crate::cli::utils;
use crate::{inspect_payload, Inspection};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;
use tracing::info;

pub fn command() -> Command {
    Command::new("detect")
        .about("Detect the field roles of a JSON response payload")
        .arg(
            clap::Arg::new("payload")
                .help("JSON payload file")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("spec")
                .short('s')
                .long("spec")
                .help("OpenAPI document describing the payload")
                .value_name("SPEC"),
        )
        .arg(
            clap::Arg::new("endpoint")
                .short('e')
                .long("endpoint")
                .help("Path template of the GET operation that returned the payload")
                .value_name("PATH")
                .requires("spec"),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let payload_path = matches
        .get_one::<String>("payload")
        .ok_or_else(|| anyhow!("Payload file is required"))?;

    let content = tokio::fs::read_to_string(payload_path).await?;
    let payload: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Payload {} is not valid JSON: {}", payload_path, e))?;

    let inspection: Inspection = if matches.contains_id("spec") {
        let scope = utils::load_scope(matches).await?;
        let endpoint = matches.get_one::<String>("endpoint").map(String::as_str);
        scope.inspect(endpoint, &payload)?
    } else {
        let config = utils::load_config(matches)?;
        inspect_payload(&payload, None, &config.detection)
    };

    match &inspection.items {
        Some(items) => info!("Inspected {} records", items.len()),
        None => println!("Payload does not contain a record collection."),
    }
    println!("{}", serde_json::to_string_pretty(&inspection.fields)?);

    Ok(())
}
