//! OpenAPI component schemas and `$ref` resolution

pub mod resolver;
pub mod types;

pub use resolver::{resolve, SchemaResolver, COMPONENT_REF_PREFIX, DEFAULT_MAX_DEPTH};
pub use types::{AdditionalProperties, ComponentSchemas, JsonSchema, SchemaType};
