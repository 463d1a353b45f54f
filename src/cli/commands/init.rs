//! Init command implementation

use crate::utils::ensure_directory;
use crate::Config;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".apiscope.yaml"),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = PathBuf::from(
        matches
            .get_one::<String>("output")
            .ok_or_else(|| anyhow!("Output path is required"))?,
    );

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "{:?} already exists. Use --force to overwrite it",
            output_path
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    Config::default().save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);
    println!("Configuration file created: {}", output_path.display());
    println!("Tune resolver depth, detection thresholds and skipped resources there.");

    Ok(())
}
