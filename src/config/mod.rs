//! Configuration management for apiscope

pub mod config;
pub mod pipeline;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use crate::fields::DetectionPolicy;
pub use config::Config;
pub use pipeline::{DiscoveryConfig, ResolverConfig};
