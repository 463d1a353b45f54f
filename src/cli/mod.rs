//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("apiscope")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Discover dashboard endpoints and field roles from OpenAPI products")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::info::command())
            .subcommand(commands::resolve::command())
            .subcommand(commands::discover::command())
            .subcommand(commands::detect::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            Some(("resolve", sub_matches)) => commands::resolve::run(sub_matches).await,
            Some(("discover", sub_matches)) => commands::discover::run(sub_matches).await,
            Some(("detect", sub_matches)) => commands::detect::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use clap::{Arg, ArgMatches};
    use std::path::PathBuf;
    use tracing::{debug, info};

    use crate::{Apiscope, Config};

    /// Default configuration file names, in lookup order
    pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
        ".apiscope.yaml",
        ".apiscope.yml",
        "apiscope.yaml",
        "apiscope.yml",
    ];

    /// The `--config` argument shared by commands
    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// Locate the configuration file: `--config`, the working directory, then
    /// the user config directory
    pub fn find_config_path(matches: &ArgMatches) -> Result<Option<PathBuf>> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Ok(Some(PathBuf::from(config_path)));
        }

        for name in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        let user_config = crate::utils::get_config_dir()?.join("config.yaml");
        Ok(user_config.exists().then_some(user_config))
    }

    /// Get configuration file path, failing when there is none
    pub fn get_config_path(matches: &ArgMatches) -> Result<PathBuf> {
        find_config_path(matches)?.ok_or_else(|| {
            anyhow!("No configuration file found. Use --config to specify a file or create one with 'apiscope init'")
        })
    }

    /// Load configuration from file, or the defaults when there is none
    pub fn load_config(matches: &ArgMatches) -> Result<Config> {
        match find_config_path(matches)? {
            Some(path) => {
                info!("Using configuration file: {:?}", path);
                Config::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Load the OpenAPI document named by the `spec` argument
    pub async fn load_scope(matches: &ArgMatches) -> Result<Apiscope> {
        let config = load_config(matches)?;
        let spec = matches
            .get_one::<String>("spec")
            .ok_or_else(|| anyhow!("An OpenAPI document is required"))?;
        Apiscope::load(config, &PathBuf::from(spec)).await
    }
}
