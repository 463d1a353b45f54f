//! Semantic field-role detection

pub mod detector;
pub mod patterns;
pub mod policy;

pub use detector::{detect_fields, FieldDetector};
pub use policy::DetectionPolicy;

use serde::Serialize;

/// Role a field plays in a rendered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Date,
    Id,
    Type,
    Description,
    Actor,
    Metric,
}

/// Roles inferred for the fields of a collection.
///
/// A field name occupies at most one singular slot, and metric fields never
/// occupy a singular slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFields {
    pub date_field: Option<String>,
    pub description_field: Option<String>,
    pub type_field: Option<String>,
    pub id_field: Option<String>,
    pub actor_field: Option<String>,

    /// Numeric fields in field order, without duplicates
    pub metric_fields: Vec<String>,

    /// Every field observed in the sample, in first-seen order
    pub all_fields: Vec<String>,
}

impl DetectedFields {
    /// No role was inferred at all
    pub fn is_empty(&self) -> bool {
        self.singular_slots().all(|(_, slot)| slot.is_none()) && self.metric_fields.is_empty()
    }

    /// Role of a field, if any
    pub fn role_of(&self, field: &str) -> Option<FieldRole> {
        self.singular_slots()
            .find(|(_, slot)| slot.as_deref() == Some(field))
            .map(|(role, _)| role)
            .or_else(|| {
                self.metric_fields
                    .iter()
                    .any(|metric| metric == field)
                    .then_some(FieldRole::Metric)
            })
    }

    pub fn slot(&self, role: FieldRole) -> Option<&str> {
        match role {
            FieldRole::Date => self.date_field.as_deref(),
            FieldRole::Id => self.id_field.as_deref(),
            FieldRole::Type => self.type_field.as_deref(),
            FieldRole::Description => self.description_field.as_deref(),
            FieldRole::Actor => self.actor_field.as_deref(),
            FieldRole::Metric => None,
        }
    }

    pub(crate) fn slot_mut(&mut self, role: FieldRole) -> Option<&mut Option<String>> {
        match role {
            FieldRole::Date => Some(&mut self.date_field),
            FieldRole::Id => Some(&mut self.id_field),
            FieldRole::Type => Some(&mut self.type_field),
            FieldRole::Description => Some(&mut self.description_field),
            FieldRole::Actor => Some(&mut self.actor_field),
            FieldRole::Metric => None,
        }
    }

    fn singular_slots(&self) -> impl Iterator<Item = (FieldRole, &Option<String>)> {
        [
            (FieldRole::Date, &self.date_field),
            (FieldRole::Id, &self.id_field),
            (FieldRole::Type, &self.type_field),
            (FieldRole::Description, &self.description_field),
            (FieldRole::Actor, &self.actor_field),
        ]
        .into_iter()
    }
}
