//! Response payload normalization
//!
//! Third-party APIs wrap their collections in many ways. Payloads are first
//! classified into a [`PayloadShape`] and then flattened into a list of
//! records, so lists and single-object detail responses feed the same
//! pipeline.

use apiscope_schema::JsonSchema;
use serde_json::{Map, Value};

/// One record of a collection
pub type Record = Map<String, Value>;

/// Conventional wrapper keys, in priority order
pub const WRAPPER_KEYS: [&str; 7] = [
    "points", "data", "items", "results", "records", "entries", "rows",
];

/// Recognized payload shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// Absent or JSON null
    Missing,
    /// An empty array
    Empty,
    /// An array whose first element is an object
    Records(&'a [Value]),
    /// An object carrying its records under a wrapper key
    Wrapped {
        key: &'static str,
        records: &'a [Value],
    },
    /// A plain object standing for a single record
    Single(&'a Record),
    /// Anything else: scalars, arrays of scalars
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    /// Classify a payload
    pub fn of(payload: Option<&'a Value>) -> Self {
        match payload {
            None | Some(Value::Null) => PayloadShape::Missing,
            Some(Value::Array(values)) if values.is_empty() => PayloadShape::Empty,
            Some(Value::Array(values)) if is_record_array(values) => {
                PayloadShape::Records(values)
            }
            Some(Value::Array(_)) => PayloadShape::Unrecognized,
            Some(Value::Object(object)) => wrapped_records(object)
                .map(|(key, records)| PayloadShape::Wrapped { key, records })
                .unwrap_or(PayloadShape::Single(object)),
            Some(_) => PayloadShape::Unrecognized,
        }
    }

    /// Records carried by this shape, `None` when it is not a record collection
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            PayloadShape::Missing | PayloadShape::Unrecognized => None,
            PayloadShape::Empty => Some(Vec::new()),
            PayloadShape::Records(values) | PayloadShape::Wrapped { records: values, .. } => {
                Some(objects(values))
            }
            PayloadShape::Single(object) => Some(vec![object.clone()]),
        }
    }
}

/// Extract the list of records a payload contains.
///
/// Elements of a record array that are not objects are dropped.
pub fn extract_items(payload: Option<&Value>) -> Option<Vec<Record>> {
    PayloadShape::of(payload).into_records()
}

/// Schema of one record of a response, mirroring [`extract_items`]
pub fn item_schema(response: &JsonSchema) -> &JsonSchema {
    if response.is_array() {
        if let Some(items) = &response.items {
            return items;
        }
    }

    if response.is_object() {
        for key in WRAPPER_KEYS {
            if let Some(wrapped) = response.property(key) {
                if wrapped.is_array() {
                    if let Some(items) = &wrapped.items {
                        return items;
                    }
                }
            }
        }
    }

    response
}

fn is_record_array(values: &[Value]) -> bool {
    matches!(values.first(), Some(Value::Object(_)))
}

fn wrapped_records(object: &Record) -> Option<(&'static str, &[Value])> {
    WRAPPER_KEYS.iter().find_map(|key| match object.get(*key) {
        Some(Value::Array(values)) if is_record_array(values) => Some((*key, values.as_slice())),
        _ => None,
    })
}

fn objects(values: &[Value]) -> Vec<Record> {
    values
        .iter()
        .filter_map(|value| value.as_object().cloned())
        .collect()
}
