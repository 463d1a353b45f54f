//! JSON-Schema node as found under `#/components/schemas`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Named component schemas of one OpenAPI document
pub type ComponentSchemas = HashMap<String, JsonSchema>;

/// A single schema node.
///
/// Only the keywords the introspection pipeline reads are typed. Every other
/// keyword (`minimum`, `example`, `nullable`, ...) is kept in `extra` so that
/// a resolved tree serializes back with nothing lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    /// Schema reference
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Schema type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Schema format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Schema description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Schema properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, JsonSchema>>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Schema items (for arrays)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<JsonSchema>>,

    /// Schema additional properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    /// Schema enum values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Keywords not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// `type` is a single name in OpenAPI 3.0 and may be a list in 3.1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// Check whether the given type name is part of this type
    pub fn includes(&self, name: &str) -> bool {
        match self {
            SchemaType::Single(t) => t == name,
            SchemaType::Multiple(types) => types.iter().any(|t| t == name),
        }
    }
}

/// `additionalProperties` is either a flag or a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<JsonSchema>),
}

impl JsonSchema {
    /// Create a schema that only holds a reference
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// Create a schema of the given type
    pub fn of_type(name: &str) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(name.to_string())),
            ..Self::default()
        }
    }

    /// Check whether this node declares the given type
    pub fn has_type(&self, name: &str) -> bool {
        self.schema_type
            .as_ref()
            .map(|t| t.includes(name))
            .unwrap_or(false)
    }

    pub fn is_array(&self) -> bool {
        self.has_type("array") || (self.schema_type.is_none() && self.items.is_some())
    }

    pub fn is_object(&self) -> bool {
        self.has_type("object") || (self.schema_type.is_none() && self.properties.is_some())
    }

    /// Look up a property schema by name
    pub fn property(&self, name: &str) -> Option<&JsonSchema> {
        self.properties.as_ref()?.get(name)
    }

    /// Whether this node or anything beneath it still carries a `$ref`
    pub fn contains_ref(&self) -> bool {
        if self.reference.is_some() {
            return true;
        }
        let nested = self
            .properties
            .iter()
            .flat_map(|props| props.values())
            .chain(self.items.as_deref())
            .chain(self.one_of.iter().flatten())
            .chain(self.any_of.iter().flatten())
            .chain(self.all_of.iter().flatten());
        for child in nested {
            if child.contains_ref() {
                return true;
            }
        }
        matches!(&self.additional_properties, Some(AdditionalProperties::Schema(s)) if s.contains_ref())
    }
}
