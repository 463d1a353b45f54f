//! Validate command implementation

use crate::cli::utils;
use crate::Config;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let config_path = utils::get_config_path(matches)?;
    let config = Config::from_file(&config_path)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!("Resolver max depth: {}", config.resolver.max_depth);
    println!("Detection sample size: {}", config.detection.sample_size);
    println!(
        "Type fallback cardinality: {}..={} (max {:.0}% of rows)",
        config.detection.type_min_cardinality,
        config.detection.type_max_cardinality,
        config.detection.type_max_row_ratio * 100.0
    );
    println!("Skipped resources: {}", config.discovery.skip_keys.join(", "));

    Ok(())
}
