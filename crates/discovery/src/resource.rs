//! Resource tree model

use apiscope_schema::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of an API operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationType {
    List,
    Detail,
    Create,
    Update,
    Delete,
    SubList,
    Other,
}

impl OperationType {
    /// Create, update and delete
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            OperationType::Create | OperationType::Update | OperationType::Delete
        )
    }

    /// List and sub-list
    pub fn is_listing(&self) -> bool {
        matches!(self, OperationType::List | OperationType::SubList)
    }
}

/// One HTTP operation on a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOperation {
    /// HTTP method, upper case
    pub http_method: String,

    /// Path template as written in the document, e.g. `/users/{id}`
    pub path_template: String,

    /// Names of the `{...}` parameters in the path template
    #[serde(default)]
    pub path_parameters: Vec<String>,

    pub operation_type: OperationType,

    /// Resolved success response schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<JsonSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ApiOperation {
    pub fn new(http_method: &str, path_template: &str, operation_type: OperationType) -> Self {
        Self {
            http_method: http_method.to_ascii_uppercase(),
            path_template: path_template.to_string(),
            path_parameters: path_parameters(path_template),
            operation_type,
            response_schema: None,
            summary: None,
        }
    }

    pub fn with_response_schema(mut self, schema: Option<JsonSchema>) -> Self {
        self.response_schema = schema;
        self
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    pub fn is_get(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("GET")
    }
}

/// A node of a product's resource tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    /// Stable identifier
    pub key: String,

    /// Display name
    pub name: String,

    pub path_segment: String,

    /// Sub-resources that need a parent id in their path
    #[serde(default)]
    pub requires_parent_id: bool,

    #[serde(default)]
    pub operations: Vec<ApiOperation>,

    #[serde(default)]
    pub children: Vec<ApiResource>,
}

impl ApiResource {
    pub fn new(key: &str, name: &str, path_segment: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            path_segment: path_segment.to_string(),
            requires_parent_id: false,
            operations: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_child(mut self, child: ApiResource) -> Self {
        self.children.push(child);
        self
    }

    /// First GET operation without path parameters
    pub fn parameterless_get(&self) -> Option<&ApiOperation> {
        self.operations
            .iter()
            .find(|op| op.is_get() && op.path_parameters.is_empty())
    }

    pub fn has_operation(&self, operation_type: OperationType) -> bool {
        self.operations
            .iter()
            .any(|op| op.operation_type == operation_type)
    }
}

/// Extract `{name}` placeholders from a path template
pub fn path_parameters(path_template: &str) -> Vec<String> {
    path_template
        .split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parameters() {
        assert!(path_parameters("/users").is_empty());
        assert_eq!(path_parameters("/users/{id}"), vec!["id"]);
        assert_eq!(
            path_parameters("/orgs/{orgId}/members/{memberId}"),
            vec!["orgId", "memberId"]
        );
    }

    #[test]
    fn test_parameterless_get_skips_detail() {
        let resource = ApiResource::new("users", "Users", "users")
            .with_operation(ApiOperation::new("get", "/users/{id}", OperationType::Detail))
            .with_operation(ApiOperation::new("post", "/users", OperationType::Create))
            .with_operation(ApiOperation::new("get", "/users", OperationType::List));

        let get = resource.parameterless_get().unwrap();
        assert_eq!(get.path_template, "/users");
        assert_eq!(get.http_method, "GET");
        assert!(resource.has_operation(OperationType::Create));
        assert!(!resource.has_operation(OperationType::Delete));
    }

    #[test]
    fn test_operation_type_serializes_kebab_case() {
        let value = serde_json::to_value(OperationType::SubList).unwrap();
        assert_eq!(value, serde_json::json!("sub-list"));
    }
}
