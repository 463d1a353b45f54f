//! apiscope library
//!
//! Introspects an OpenAPI document to find the endpoints worth showing on a
//! dashboard, and infers what the fields of their responses mean:
//!
//! - [`apiscope_schema`] inlines component `$ref`s into self-contained schemas
//! - [`apiscope_discovery`] ranks the resources of a product
//! - [`normalize`] flattens response payloads into records
//! - [`fields`] assigns semantic roles to record fields

pub mod cli;
pub mod config;
pub mod fields;
pub mod normalize;
pub mod openapi;
pub mod utils;

pub use apiscope_discovery::{
    discover_all_endpoints, ApiOperation, ApiResource, DiscoveredEndpoint, EndpointCategory,
    EndpointDiscoverer, OperationType,
};
pub use apiscope_schema::{resolve, ComponentSchemas, JsonSchema, SchemaResolver};
pub use config::Config;
pub use fields::{detect_fields, DetectedFields, DetectionPolicy, FieldDetector, FieldRole};
pub use normalize::{extract_items, item_schema, Record};
pub use openapi::{OpenApiDocument, OpenApiParser, ResourceTreeBuilder};

use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Introspection context for one product
#[derive(Debug)]
pub struct Apiscope {
    config: Config,
    document: Option<OpenApiDocument>,
    components: ComponentSchemas,
    resources: Vec<ApiResource>,
}

impl Apiscope {
    /// Load and index the OpenAPI document at `path`
    pub async fn load(config: Config, path: &Path) -> Result<Self> {
        info!("Loading OpenAPI document: {:?}", path);
        let mut parser = OpenApiParser::new();
        parser.parse_file(path).await?;
        Ok(Self::from_parser(config, parser))
    }

    /// Index an OpenAPI document given as JSON or YAML text
    pub fn from_content(config: Config, content: &str) -> ApiscopeResult<Self> {
        let mut parser = OpenApiParser::new();
        parser.parse_content(content)?;
        Ok(Self::from_parser(config, parser))
    }

    fn from_parser(config: Config, parser: OpenApiParser) -> Self {
        let paths = parser.path_items();
        let resources = ResourceTreeBuilder::new(parser.schemas())
            .with_max_depth(config.resolver.max_depth)
            .build(&paths);
        let (document, components) = parser.into_parts();

        debug!("Built {} root resources", resources.len());
        Self {
            config,
            document,
            components,
            resources,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> Option<&OpenApiDocument> {
        self.document.as_ref()
    }

    pub fn components(&self) -> &ComponentSchemas {
        &self.components
    }

    /// Root resources of the product
    pub fn resources(&self) -> &[ApiResource] {
        &self.resources
    }

    /// Ranked endpoints worth surfacing
    pub fn discover_endpoints(&self) -> Vec<DiscoveredEndpoint> {
        EndpointDiscoverer::new()
            .with_skip_keys(self.config.discovery.skip_keys.clone())
            .discover(&self.resources)
    }

    /// Fully resolved component schema
    pub fn resolve_schema(&self, name: &str) -> ApiscopeResult<JsonSchema> {
        SchemaResolver::new(&self.components)
            .with_max_depth(self.config.resolver.max_depth)
            .resolve_named(name)
            .ok_or_else(|| ApiscopeError::UnknownSchema(name.to_string()))
    }

    /// GET operation declared for an exact path template
    pub fn find_operation(&self, path_template: &str) -> Option<&ApiOperation> {
        apiscope_discovery::flatten(&self.resources)
            .into_iter()
            .flat_map(|resource| resource.operations.iter())
            .find(|operation| operation.is_get() && operation.path_template == path_template)
    }

    /// Normalize a payload and detect its field roles.
    ///
    /// With an endpoint path, detection is seeded by the record schema of its
    /// response.
    pub fn inspect(&self, path_template: Option<&str>, payload: &Value) -> ApiscopeResult<Inspection> {
        let schema = match path_template {
            Some(path) => {
                let operation = self
                    .find_operation(path)
                    .ok_or_else(|| ApiscopeError::UnknownEndpoint(path.to_string()))?;
                operation.response_schema.as_ref().map(item_schema)
            }
            None => None,
        };

        Ok(inspect_payload(payload, schema, &self.config.detection))
    }
}

/// Records extracted from a payload and the roles of their fields
#[derive(Debug, Clone)]
pub struct Inspection {
    /// `None` when the payload is not a record collection
    pub items: Option<Vec<Record>>,
    pub fields: DetectedFields,
}

/// Normalize `payload` and detect roles without an OpenAPI document
pub fn inspect_payload(
    payload: &Value,
    schema: Option<&JsonSchema>,
    policy: &DetectionPolicy,
) -> Inspection {
    let items = extract_items(Some(payload));
    let fields = FieldDetector::new(policy.clone()).detect(items.as_deref().unwrap_or(&[]), schema);
    Inspection { items, fields }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum ApiscopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

/// Result type for the main application
pub type ApiscopeResult<T> = Result<T, ApiscopeError>;
