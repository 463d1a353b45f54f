//! Utility functions for apiscope

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(anyhow!("Path exists but is not a directory: {:?}", path));
    }
    Ok(())
}

/// Get the XDG config directory for apiscope
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("apiscope");

    Ok(config_dir)
}

/// Truncate text for single-line table cells
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
