//! Dashboard endpoint discovery over a resource tree

use apiscope_schema::JsonSchema;
use serde::Serialize;
use tracing::{debug, info};

use crate::patterns;
use crate::resource::{ApiResource, OperationType};

/// Placement band of a discovered endpoint; each band maps to one priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointCategory {
    /// Stats, dashboards, summaries, overviews
    Stats,
    Trend,
    /// Activity feeds, events, audit trails
    Activity,
    /// Any other dashboard-type resource
    Dashboard,
    /// Read-only endpoint that is neither dashboard nor collection
    ReadOnly,
    /// CRUD-backed entity collection
    Collection,
}

impl EndpointCategory {
    /// Sort priority, lower is shown first
    pub fn priority(&self) -> u32 {
        match self {
            EndpointCategory::Stats => 1,
            EndpointCategory::Trend => 2,
            EndpointCategory::Activity => 3,
            EndpointCategory::Dashboard => 4,
            EndpointCategory::ReadOnly => 5,
            EndpointCategory::Collection => 10,
        }
    }
}

/// A parameterless read endpoint selected for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredEndpoint {
    pub path: String,
    pub resource_key: String,
    pub resource_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<JsonSchema>,
    pub priority: u32,
    pub is_entity_collection: bool,
    pub category: EndpointCategory,
    pub icon: &'static str,
}

/// Classifies and ranks the endpoints of a resource tree
#[derive(Debug, Clone)]
pub struct EndpointDiscoverer {
    /// Resource keys handled elsewhere
    skip_keys: Vec<String>,
}

impl Default for EndpointDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointDiscoverer {
    /// Create a discoverer that skips the `health` resource
    pub fn new() -> Self {
        Self {
            skip_keys: vec!["health".to_string()],
        }
    }

    pub fn with_skip_keys(mut self, skip_keys: Vec<String>) -> Self {
        self.skip_keys = skip_keys;
        self
    }

    /// Discover, classify and order all displayable endpoints
    pub fn discover(&self, tree: &[ApiResource]) -> Vec<DiscoveredEndpoint> {
        let mut endpoints: Vec<DiscoveredEndpoint> = flatten(tree)
            .into_iter()
            .filter_map(|resource| self.classify(resource))
            .collect();

        endpoints.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.resource_key.cmp(&b.resource_key))
        });

        info!(
            "Discovered {} endpoints ({} entity collections)",
            endpoints.len(),
            endpoints.iter().filter(|e| e.is_entity_collection).count()
        );
        endpoints
    }

    fn classify(&self, resource: &ApiResource) -> Option<DiscoveredEndpoint> {
        if resource.requires_parent_id {
            debug!("Skipping {}: requires a parent id", resource.key);
            return None;
        }
        if self.skip_keys.iter().any(|key| *key == resource.key) {
            debug!("Skipping {}: handled separately", resource.key);
            return None;
        }
        let Some(get) = resource.parameterless_get() else {
            debug!("Skipping {}: no parameterless GET", resource.key);
            return None;
        };

        let has_crud = resource
            .operations
            .iter()
            .any(|op| op.operation_type.is_mutation());
        let has_list = get.operation_type.is_listing();
        let has_detail = resource.has_operation(OperationType::Detail);
        let is_entity_collection = has_list && (has_crud || has_detail);

        let names = [resource.key.as_str(), resource.path_segment.as_str()];
        let category = if is_entity_collection {
            EndpointCategory::Collection
        } else if patterns::is_dashboard_name(&names) {
            patterns::dashboard_category(&names)
        } else {
            EndpointCategory::ReadOnly
        };

        Some(DiscoveredEndpoint {
            path: get.path_template.clone(),
            resource_key: resource.key.clone(),
            resource_name: resource.name.clone(),
            response_schema: get.response_schema.clone(),
            priority: category.priority(),
            is_entity_collection,
            category,
            icon: patterns::icon_for(&resource.key),
        })
    }
}

/// Discover endpoints with the default skip list
pub fn discover_all_endpoints(tree: &[ApiResource]) -> Vec<DiscoveredEndpoint> {
    EndpointDiscoverer::new().discover(tree)
}

/// Pre-order flattening: every parent precedes its children
pub fn flatten(tree: &[ApiResource]) -> Vec<&ApiResource> {
    let mut flat = Vec::new();
    for resource in tree {
        flat.push(resource);
        flat.extend(flatten(&resource.children));
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ApiOperation;

    fn read_only(key: &str) -> ApiResource {
        ApiResource::new(key, key, key).with_operation(ApiOperation::new(
            "GET",
            &format!("/{key}"),
            OperationType::Other,
        ))
    }

    fn crud(key: &str) -> ApiResource {
        let path = format!("/{key}");
        let item = format!("/{key}/{{id}}");
        ApiResource::new(key, key, key)
            .with_operation(ApiOperation::new("GET", &path, OperationType::List))
            .with_operation(ApiOperation::new("POST", &path, OperationType::Create))
            .with_operation(ApiOperation::new("PUT", &item, OperationType::Update))
            .with_operation(ApiOperation::new("DELETE", &item, OperationType::Delete))
    }

    #[test]
    fn test_dashboard_ordering() {
        let tree = vec![
            crud("users"),
            read_only("activity"),
            read_only("trends"),
            read_only("stats"),
        ];

        let endpoints = discover_all_endpoints(&tree);
        let keys: Vec<_> = endpoints.iter().map(|e| e.resource_key.as_str()).collect();
        let priorities: Vec<_> = endpoints.iter().map(|e| e.priority).collect();

        assert_eq!(keys, vec!["stats", "trends", "activity", "users"]);
        assert_eq!(priorities, vec![1, 2, 3, 10]);
        assert!(endpoints[3].is_entity_collection);
        assert_eq!(endpoints[3].category, EndpointCategory::Collection);
    }

    #[test]
    fn test_parent_dependent_resources_are_skipped() {
        let mut comments = crud("comments");
        comments.requires_parent_id = true;
        let tree = vec![crud("posts").with_child(comments)];

        let endpoints = discover_all_endpoints(&tree);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].resource_key, "posts");
    }

    #[test]
    fn test_health_and_parameterised_only_resources_are_skipped() {
        let detail_only = ApiResource::new("profile", "Profile", "profile").with_operation(
            ApiOperation::new("GET", "/profile/{id}", OperationType::Detail),
        );
        let tree = vec![read_only("health"), detail_only, read_only("config")];

        let endpoints = discover_all_endpoints(&tree);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].resource_key, "config");
        assert_eq!(endpoints[0].priority, 5);
        assert_eq!(endpoints[0].category, EndpointCategory::ReadOnly);
    }

    #[test]
    fn test_list_with_detail_is_entity_collection() {
        let products = ApiResource::new("products", "Products", "products")
            .with_operation(ApiOperation::new("GET", "/products", OperationType::List))
            .with_operation(ApiOperation::new(
                "GET",
                "/products/{id}",
                OperationType::Detail,
            ));

        let endpoints = discover_all_endpoints(&[products]);
        assert!(endpoints[0].is_entity_collection);
        assert_eq!(endpoints[0].priority, 10);
    }

    #[test]
    fn test_listing_without_crud_stays_dashboard() {
        let events = ApiResource::new("events", "Events", "events")
            .with_operation(ApiOperation::new("GET", "/events", OperationType::List));
        let reports = read_only("reports");

        let endpoints = discover_all_endpoints(&[reports, events]);
        assert_eq!(endpoints[0].resource_key, "events");
        assert_eq!(endpoints[0].priority, 3);
        assert!(!endpoints[0].is_entity_collection);
        assert_eq!(endpoints[1].resource_key, "reports");
        assert_eq!(endpoints[1].priority, 4);
    }

    #[test]
    fn test_ties_break_on_case_sensitive_key() {
        let tree = vec![read_only("b_config"), read_only("Z_config"), read_only("a_config")];
        let keys: Vec<_> = discover_all_endpoints(&tree)
            .into_iter()
            .map(|e| e.resource_key)
            .collect();
        assert_eq!(keys, vec!["Z_config", "a_config", "b_config"]);
    }

    #[test]
    fn test_path_segment_can_mark_dashboard() {
        let resource = ApiResource::new("daily", "Daily", "analytics").with_operation(
            ApiOperation::new("GET", "/analytics", OperationType::Other),
        );
        let endpoints = discover_all_endpoints(&[resource]);
        assert_eq!(endpoints[0].category, EndpointCategory::Dashboard);
        assert_eq!(endpoints[0].priority, 4);
    }

    #[test]
    fn test_custom_skip_keys() {
        let tree = vec![read_only("health"), read_only("config")];
        let endpoints = EndpointDiscoverer::new()
            .with_skip_keys(vec!["config".to_string()])
            .discover(&tree);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].resource_key, "health");
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = vec![
            read_only("a").with_child(read_only("a1").with_child(read_only("a1x"))),
            read_only("b"),
        ];
        let keys: Vec<_> = flatten(&tree).into_iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "a1", "a1x", "b"]);
    }
}
