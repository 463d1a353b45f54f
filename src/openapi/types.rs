//! OpenAPI document type definitions

use apiscope_schema::{ComponentSchemas, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// OpenAPI document.
///
/// `paths` stays an ordered raw map so that resources keep the order in which
/// the document declares them; [`PathItem`]s are decoded on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    #[serde(rename = "openapi", default, deserialize_with = "lenient_string")]
    pub version: Option<String>,

    /// Swagger version (v2)
    #[serde(rename = "swagger", default, deserialize_with = "lenient_string")]
    pub swagger_version: Option<String>,

    /// API information
    #[serde(default)]
    pub info: ApiInfo,

    /// Servers (v3)
    #[serde(default)]
    pub servers: Option<Vec<Server>>,

    /// Paths/endpoints
    #[serde(default)]
    pub paths: serde_json::Map<String, serde_json::Value>,

    /// Definitions/schemas (v2)
    #[serde(default)]
    pub definitions: Option<ComponentSchemas>,

    /// Components (v3)
    #[serde(default)]
    pub components: Option<Components>,
}

/// Accept unquoted YAML versions such as `openapi: 3.1` or `version: 2`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    #[serde(default)]
    pub title: String,

    /// API version
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,

    /// API description
    #[serde(default)]
    pub description: Option<String>,
}

/// Server information (v3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,

    /// Server description
    #[serde(default)]
    pub description: Option<String>,
}

/// Path item (endpoint)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// HTTP methods
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,

    #[serde(default)]
    pub summary: Option<String>,
}

impl PathItem {
    /// Declared operations with their method names, in a fixed order
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("GET", &self.get),
            ("POST", &self.post),
            ("PUT", &self.put),
            ("PATCH", &self.patch),
            ("DELETE", &self.delete),
            ("HEAD", &self.head),
            ("OPTIONS", &self.options),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// API operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation summary
    #[serde(default)]
    pub summary: Option<String>,

    /// Operation description
    #[serde(default)]
    pub description: Option<String>,

    /// Operation ID
    #[serde(default)]
    pub operation_id: Option<String>,

    /// Operation tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Responses by status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// Status codes whose schema describes a successful read, in preference order
const SUCCESS_STATUSES: [&str; 5] = ["200", "201", "2XX", "2xx", "default"];

impl Operation {
    /// Schema of the preferred JSON success response
    pub fn success_schema(&self) -> Option<&JsonSchema> {
        SUCCESS_STATUSES
            .iter()
            .filter_map(|status| self.responses.get(*status))
            .find_map(Response::json_schema)
    }
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    #[serde(default)]
    pub description: Option<String>,

    /// Response content
    #[serde(default)]
    pub content: Option<BTreeMap<String, MediaType>>,

    /// Swagger 2 response schema
    #[serde(default)]
    pub schema: Option<JsonSchema>,
}

impl Response {
    /// Schema of `application/json`, else of any JSON-flavoured media type
    pub fn json_schema(&self) -> Option<&JsonSchema> {
        if let Some(content) = &self.content {
            let exact = content
                .get("application/json")
                .and_then(|media| media.schema.as_ref());
            return exact.or_else(|| {
                content
                    .iter()
                    .filter(|(media_type, _)| media_type.contains("json"))
                    .find_map(|(_, media)| media.schema.as_ref())
            });
        }
        self.schema.as_ref()
    }
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    /// Media type schema
    #[serde(default)]
    pub schema: Option<JsonSchema>,
}

/// Components (v3)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Component schemas
    #[serde(default)]
    pub schemas: Option<ComponentSchemas>,
}
