//! Thresholds used by the field detector

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Tunable constants of field-role detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionPolicy {
    /// Number of leading items inspected
    pub sample_size: usize,

    /// Share of sampled rows that must be numeric for a metric
    pub metric_ratio: f64,

    /// Largest `enum` that still hints at a type field
    pub schema_enum_max: usize,

    /// Average string length a fallback description must exceed
    pub description_min_avg_len: f64,

    /// Distinct-value bounds of the categorical fallback
    pub type_min_cardinality: usize,
    pub type_max_cardinality: usize,

    /// Largest distinct-values-to-rows ratio of the categorical fallback
    pub type_max_row_ratio: f64,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            sample_size: 10,
            metric_ratio: 0.8,
            schema_enum_max: 20,
            description_min_avg_len: 10.0,
            type_min_cardinality: 2,
            type_max_cardinality: 20,
            type_max_row_ratio: 0.2,
        }
    }
}

impl DetectionPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(anyhow!("Detection sample size must be at least 1"));
        }

        for (name, ratio) in [
            ("metric_ratio", self.metric_ratio),
            ("type_max_row_ratio", self.type_max_row_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(anyhow!("{} must be within (0, 1], got {}", name, ratio));
            }
        }

        if self.type_min_cardinality > self.type_max_cardinality {
            return Err(anyhow!(
                "type_min_cardinality ({}) exceeds type_max_cardinality ({})",
                self.type_min_cardinality,
                self.type_max_cardinality
            ));
        }

        if self.description_min_avg_len < 0.0 {
            return Err(anyhow!("description_min_avg_len cannot be negative"));
        }

        Ok(())
    }
}
