//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{DetectionPolicy, DiscoveryConfig, ResolverConfig};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Schema resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Field detection thresholds
    #[serde(default)]
    pub detection: DetectionPolicy,

    /// Endpoint discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        self.resolver.validate()?;
        self.detection.validate()?;
        self.discovery.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            resolver: ResolverConfig::default(),
            detection: DetectionPolicy::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}
