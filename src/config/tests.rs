//! Configuration tests

use super::*;
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config, parsed);
}

#[test]
fn test_config_from_file() {
    let mut config = Config::default();
    config.resolver.max_depth = 4;
    config.detection.sample_size = 50;
    config.discovery.skip_keys.push("metrics".to_string());

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(loaded.resolver.max_depth, 4);
    assert_eq!(loaded.detection.sample_size, 50);
    assert_eq!(loaded.discovery.skip_keys, vec!["health", "metrics"]);
}

#[test]
fn test_partial_file_uses_defaults() {
    let config: Config = serde_yaml::from_str("version: \"1.0\"\nresolver:\n  max_depth: 3\n").unwrap();
    assert_eq!(config.resolver.max_depth, 3);
    assert_eq!(config.detection, DetectionPolicy::default());
    assert_eq!(config.discovery.skip_keys, vec!["health"]);
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_ok());

    let mut config = Config::default();
    config.version = "2.0".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.resolver.max_depth = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detection.type_max_row_ratio = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.discovery.skip_keys.push("  ".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "version: \"1.0\"\nresolver:\n  max_depth: 0\n").unwrap();
    assert!(Config::from_file(temp_file.path()).is_err());
}
