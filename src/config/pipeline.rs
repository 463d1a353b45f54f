//! Resolver and discovery settings

use anyhow::{anyhow, Result};
use apiscope_schema::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Schema resolution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest nesting level that is still expanded
    pub max_depth: usize,
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow!("resolver.max_depth must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Endpoint discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Resource keys that are never surfaced
    pub skip_keys: Vec<String>,
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(blank) = self.skip_keys.iter().find(|key| key.trim().is_empty()) {
            return Err(anyhow!("discovery.skip_keys contains a blank key: {:?}", blank));
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            skip_keys: vec!["health".to_string()],
        }
    }
}
