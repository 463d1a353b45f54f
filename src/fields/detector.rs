//! Layered field-role detection
//!
//! Detection runs as an ordered list of passes over a shared result. Each pass
//! only fills slots that are still empty, so earlier passes take precedence:
//!
//! 1. schema hints (`format`, `description`, `enum`)
//! 2. name patterns checked against the first sampled value
//! 3. numeric values (metrics)
//! 4. description fallback: longest average text
//! 5. type fallback: low-cardinality column

use apiscope_schema::JsonSchema;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use super::patterns;
use super::policy::DetectionPolicy;
use super::{DetectedFields, FieldRole};
use crate::normalize::Record;

/// Detect field roles with the default policy
pub fn detect_fields(items: &[Record], schema: Option<&JsonSchema>) -> DetectedFields {
    FieldDetector::default().detect(items, schema)
}

/// Infers the semantic role of each field of a collection
#[derive(Debug, Clone, Default)]
pub struct FieldDetector {
    policy: DetectionPolicy,
}

impl FieldDetector {
    pub fn new(policy: DetectionPolicy) -> Self {
        Self { policy }
    }

    /// Infer roles for `items`, optionally seeded by the item schema
    pub fn detect(&self, items: &[Record], schema: Option<&JsonSchema>) -> DetectedFields {
        if items.is_empty() {
            return DetectedFields::default();
        }

        let sample = &items[..items.len().min(self.policy.sample_size.max(1))];
        let mut pass = Detection::new(&self.policy, sample);

        if let Some(schema) = schema {
            pass.schema_hints(schema);
        }
        pass.name_patterns();
        pass.metric_values();
        if pass.result.description_field.is_none() {
            pass.description_fallback();
        }
        if pass.result.type_field.is_none() {
            pass.type_fallback();
        }

        let result = pass.result;
        debug!(
            "Detected fields: date={:?} id={:?} type={:?} description={:?} actor={:?} metrics={:?}",
            result.date_field,
            result.id_field,
            result.type_field,
            result.description_field,
            result.actor_field,
            result.metric_fields
        );
        result
    }
}

/// Working state of one detection run
struct Detection<'a> {
    policy: &'a DetectionPolicy,
    sample: &'a [Record],
    result: DetectedFields,
}

impl<'a> Detection<'a> {
    fn new(policy: &'a DetectionPolicy, sample: &'a [Record]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut all_fields = Vec::new();
        for key in sample.iter().flat_map(|record| record.keys()) {
            if seen.insert(key.as_str()) {
                all_fields.push(key.clone());
            }
        }

        Self {
            policy,
            sample,
            result: DetectedFields {
                all_fields,
                ..DetectedFields::default()
            },
        }
    }

    fn fields(&self) -> Vec<String> {
        self.result.all_fields.clone()
    }

    /// Whether the field already holds a singular role or is a metric
    fn is_taken(&self, field: &str) -> bool {
        self.result.role_of(field).is_some()
    }

    /// Fill `role` with `field` unless the slot or the field is taken
    fn assign(&mut self, role: FieldRole, field: &str) -> bool {
        if self.is_taken(field) {
            return false;
        }
        match self.result.slot_mut(role) {
            Some(slot) if slot.is_none() => {
                *slot = Some(field.to_string());
                true
            }
            _ => false,
        }
    }

    /// First non-null value of a field in the sample
    fn first_value(&self, field: &str) -> Option<&'a Value> {
        self.sample
            .iter()
            .filter_map(|record| record.get(field))
            .find(|value| !value.is_null())
    }

    fn schema_hints(&mut self, schema: &JsonSchema) {
        let Some(properties) = &schema.properties else {
            return;
        };

        for (name, property) in properties {
            if !self.result.all_fields.contains(name) {
                continue;
            }
            if property.format.as_deref() == Some("date-time") {
                self.assign(FieldRole::Date, name);
            } else if property
                .description
                .as_deref()
                .map(|text| text.to_lowercase().contains("identifier"))
                .unwrap_or(false)
            {
                self.assign(FieldRole::Id, name);
            } else if property
                .enum_values
                .as_ref()
                .map(|values| !values.is_empty() && values.len() <= self.policy.schema_enum_max)
                .unwrap_or(false)
            {
                self.assign(FieldRole::Type, name);
            }
        }
    }

    fn name_patterns(&mut self) {
        let fields = self.fields();

        if self.result.date_field.is_none() {
            if let Some(field) = fields
                .iter()
                .find(|f| !self.is_taken(f) && patterns::is_date_field(f, self.first_value(f)))
            {
                self.assign(FieldRole::Date, field);
            }
        }

        if self.result.id_field.is_none() {
            // Rank before field order: an exact `id` beats an earlier `order_id`
            let best = fields
                .iter()
                .filter(|f| !self.is_taken(f) && patterns::is_id_field(f, self.first_value(f)))
                .min_by_key(|f| patterns::id_rank(f));
            if let Some(field) = best {
                self.assign(FieldRole::Id, field);
            }
        }

        let ordered: [(FieldRole, fn(&str, Option<&Value>) -> bool); 3] = [
            (FieldRole::Type, patterns::is_type_field),
            (FieldRole::Description, patterns::is_description_field),
            (FieldRole::Actor, patterns::is_actor_field),
        ];
        for (role, is_match) in ordered {
            if self.result.slot(role).is_some() {
                continue;
            }
            if let Some(field) = fields
                .iter()
                .find(|f| !self.is_taken(f) && is_match(f, self.first_value(f)))
            {
                self.assign(role, field);
            }
        }
    }

    fn metric_values(&mut self) {
        let rows = self.sample.len() as f64;
        for field in self.fields() {
            if self.is_taken(&field) {
                continue;
            }
            let numeric = self
                .sample
                .iter()
                .filter(|record| matches!(record.get(&field), Some(Value::Number(_))))
                .count() as f64;
            if numeric / rows + f64::EPSILON >= self.policy.metric_ratio {
                self.result.metric_fields.push(field);
            }
        }
    }

    fn description_fallback(&mut self) {
        let mut best: Option<(String, f64)> = None;

        for field in self.fields() {
            if self.is_taken(&field) {
                continue;
            }
            let lengths: Vec<usize> = self
                .sample
                .iter()
                .filter_map(|record| record.get(&field).and_then(Value::as_str))
                .filter(|text| !text.is_empty())
                .map(|text| text.chars().count())
                .collect();
            if lengths.is_empty() {
                continue;
            }
            let average = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
            if average <= self.policy.description_min_avg_len {
                continue;
            }
            if best.as_ref().map(|(_, top)| average > *top).unwrap_or(true) {
                best = Some((field, average));
            }
        }

        if let Some((field, _)) = best {
            self.assign(FieldRole::Description, &field);
        }
    }

    fn type_fallback(&mut self) {
        let row_limit = self.policy.type_max_row_ratio * self.sample.len() as f64;

        for field in self.fields() {
            if self.is_taken(&field) {
                continue;
            }
            let distinct: HashSet<String> = self
                .sample
                .iter()
                .filter_map(|record| record.get(&field))
                .filter(|value| !value.is_null())
                .map(stringify)
                .collect();
            let cardinality = distinct.len();
            if cardinality >= self.policy.type_min_cardinality
                && cardinality <= self.policy.type_max_cardinality
                && cardinality as f64 <= row_limit + f64::EPSILON
            {
                self.assign(FieldRole::Type, &field);
                return;
            }
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
