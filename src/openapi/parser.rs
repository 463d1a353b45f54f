//! OpenAPI document loading

use apiscope_schema::ComponentSchemas;
use std::path::Path;
use tracing::{debug, info};

use super::types::*;
use crate::{ApiscopeError, ApiscopeResult};

/// Loads OpenAPI documents and exposes their component schemas
#[derive(Debug, Default)]
pub struct OpenApiParser {
    /// Parsed document
    document: Option<OpenApiDocument>,

    /// Component schemas (v3) merged with definitions (v2)
    schemas: ComponentSchemas,
}

impl OpenApiParser {
    /// Create a new OpenAPI parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an OpenAPI document file
    pub async fn parse_file(&mut self, file_path: &Path) -> ApiscopeResult<()> {
        let content = tokio::fs::read_to_string(file_path).await?;
        self.parse_content(&content)
    }

    /// Parse OpenAPI document content, JSON first then YAML
    pub fn parse_content(&mut self, content: &str) -> ApiscopeResult<()> {
        let raw: serde_json::Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(json_error) => {
                debug!("Content is not JSON ({}), trying YAML", json_error);
                serde_yaml::from_str(content).map_err(|yaml_error| {
                    ApiscopeError::Parse(format!(
                        "Failed to parse OpenAPI document. JSON error: {}, YAML error: {}",
                        json_error, yaml_error
                    ))
                })?
            }
        };

        if !raw.is_object() {
            return Err(ApiscopeError::Parse(
                "OpenAPI document must be a mapping at the top level".to_string(),
            ));
        }

        let document: OpenApiDocument = serde_json::from_value(raw)?;
        self.process_document(document);
        Ok(())
    }

    fn process_document(&mut self, document: OpenApiDocument) {
        self.schemas.clear();

        // Extract schemas from definitions (v2)
        if let Some(definitions) = &document.definitions {
            for (name, schema) in definitions {
                self.schemas.insert(name.clone(), schema.clone());
            }
        }

        // Extract schemas from components (v3)
        if let Some(schemas) = document
            .components
            .as_ref()
            .and_then(|components| components.schemas.as_ref())
        {
            for (name, schema) in schemas {
                self.schemas.insert(name.clone(), schema.clone());
            }
        }

        info!(
            "Loaded OpenAPI document '{}' with {} paths and {} component schemas",
            document.info.title,
            document.paths.len(),
            self.schemas.len()
        );
        self.document = Some(document);
    }

    /// Parsed document, if any
    pub fn document(&self) -> Option<&OpenApiDocument> {
        self.document.as_ref()
    }

    /// Get extracted schemas
    pub fn schemas(&self) -> &ComponentSchemas {
        &self.schemas
    }

    /// Decode the path items in document order.
    ///
    /// Entries that are not path items (for example `x-` extensions) are skipped.
    pub fn path_items(&self) -> Vec<(String, PathItem)> {
        let Some(document) = &self.document else {
            return Vec::new();
        };

        document
            .paths
            .iter()
            .filter(|(path, _)| path.starts_with('/'))
            .filter_map(
                |(path, value)| match serde_json::from_value::<PathItem>(value.clone()) {
                    Ok(item) => Some((path.clone(), item)),
                    Err(e) => {
                        debug!("Skipping path {}: {}", path, e);
                        None
                    }
                },
            )
            .collect()
    }

    /// Consume the parser, keeping the document and its schemas
    pub fn into_parts(self) -> (Option<OpenApiDocument>, ComponentSchemas) {
        (self.document, self.schemas)
    }
}
