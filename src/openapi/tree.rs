//! Builds the resource tree of a product from its OpenAPI paths

use apiscope_discovery::{ApiOperation, ApiResource, OperationType};
use apiscope_schema::{ComponentSchemas, SchemaResolver, DEFAULT_MAX_DEPTH};
use tracing::debug;

use super::types::PathItem;

/// One piece of a path template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Parameter,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.starts_with('{') && raw.ends_with('}') {
            Segment::Parameter
        } else {
            Segment::Literal(raw.to_string())
        }
    }
}

/// Turns `paths` into a tree of [`ApiResource`]s.
///
/// Literal segments become resources keyed by their dotted literal path; a
/// literal that follows a `{parameter}` becomes a sub-resource that needs a
/// parent id. A leading literal prefix shared by every path (`/api/v1`) is
/// dropped from keys.
#[derive(Debug)]
pub struct ResourceTreeBuilder<'a> {
    resolver: SchemaResolver<'a>,
}

impl<'a> ResourceTreeBuilder<'a> {
    pub fn new(components: &'a ComponentSchemas) -> Self {
        Self {
            resolver: SchemaResolver::new(components).with_max_depth(DEFAULT_MAX_DEPTH),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.resolver = self.resolver.with_max_depth(max_depth);
        self
    }

    /// Build the tree from path items in document order
    pub fn build(&self, paths: &[(String, PathItem)]) -> Vec<ApiResource> {
        let parsed: Vec<(&str, Vec<Segment>, &PathItem)> = paths
            .iter()
            .map(|(path, item)| {
                let segments = path
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(Segment::parse)
                    .collect();
                (path.as_str(), segments, item)
            })
            .collect();

        let prefix = common_prefix_len(parsed.iter().map(|(_, segments, _)| segments.as_slice()));
        let mut roots = Vec::new();

        for (path, segments, item) in &parsed {
            let mut literals = Vec::new();
            let mut after_parameter = false;
            for segment in &segments[prefix..] {
                match segment {
                    Segment::Literal(name) => literals.push((name.as_str(), after_parameter)),
                    Segment::Parameter => after_parameter = true,
                }
            }
            if literals.is_empty() {
                debug!("Skipping path {} without a resource segment", path);
                continue;
            }

            let ends_with_parameter = matches!(segments.last(), Some(Segment::Parameter));
            let operations = self.operations(path, item, ends_with_parameter);
            let mut key = Vec::new();
            attach(&mut roots, &literals, &mut key, operations);
        }

        roots
    }

    fn operations(
        &self,
        path: &str,
        item: &PathItem,
        ends_with_parameter: bool,
    ) -> Vec<ApiOperation> {
        item.operations()
            .into_iter()
            .map(|(method, operation)| {
                let mut api_operation = ApiOperation::new(method, path, OperationType::Other);
                api_operation.operation_type = operation_type(
                    method,
                    ends_with_parameter,
                    !api_operation.path_parameters.is_empty(),
                );
                let response_schema = if method == "GET" {
                    self.resolver.resolve(operation.success_schema())
                } else {
                    None
                };
                api_operation
                    .with_response_schema(response_schema)
                    .with_summary(operation.summary.clone().or_else(|| item.summary.clone()))
            })
            .collect()
    }
}

/// Classify an operation from its method and path shape
fn operation_type(method: &str, ends_with_parameter: bool, has_parameters: bool) -> OperationType {
    match method {
        "GET" if ends_with_parameter => OperationType::Detail,
        "GET" if has_parameters => OperationType::SubList,
        "GET" => OperationType::List,
        "POST" => OperationType::Create,
        "PUT" | "PATCH" => OperationType::Update,
        "DELETE" => OperationType::Delete,
        _ => OperationType::Other,
    }
}

/// Length of the literal prefix shared by all paths, leaving each path at
/// least one literal of its own
fn common_prefix_len<'s>(paths: impl Iterator<Item = &'s [Segment]> + Clone) -> usize {
    let Some(first) = paths.clone().next() else {
        return 0;
    };

    let mut len = 0;
    while let Some(Segment::Literal(candidate)) = first.get(len) {
        let shared = paths.clone().all(|segments| {
            matches!(segments.get(len), Some(Segment::Literal(name)) if name == candidate)
                && segments[len + 1..]
                    .iter()
                    .any(|s| matches!(s, Segment::Literal(_)))
        });
        if !shared {
            break;
        }
        len += 1;
    }
    len
}

fn attach<'p>(
    nodes: &mut Vec<ApiResource>,
    literals: &[(&'p str, bool)],
    key: &mut Vec<&'p str>,
    operations: Vec<ApiOperation>,
) {
    let Some(((segment, after_parameter), rest)) = literals.split_first() else {
        return;
    };
    key.push(*segment);
    let joined = key.join(".");

    let index = match nodes.iter().position(|node| node.key == joined) {
        Some(index) => index,
        None => {
            let mut node = ApiResource::new(&joined, &display_name(segment), segment);
            node.requires_parent_id = *after_parameter;
            nodes.push(node);
            nodes.len() - 1
        }
    };

    let node = &mut nodes[index];
    // A resource reachable without a parent id does not need one
    node.requires_parent_id &= *after_parameter;

    if rest.is_empty() {
        node.operations.extend(operations);
    } else {
        attach(&mut node.children, rest, key, operations);
    }
}

/// `user-groups` and `user_groups` both read as `User Groups`
pub fn display_name(segment: &str) -> String {
    segment
        .split(|c: char| c == '-' || c == '_' || c == '.')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::OpenApiParser;

    const DOCUMENT: &str = r##"
openapi: 3.0.3
info:
  title: Shop Admin
  version: "1.0"
paths:
  /api/v1/stats:
    get:
      summary: Shop statistics
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Stats'}
  /api/v1/users:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/User'}
    post:
      responses:
        '201': {description: Created}
  /api/v1/users/{id}:
    get:
      responses:
        '200': {description: OK}
    delete:
      responses:
        '204': {description: Deleted}
  /api/v1/users/{id}/sessions:
    get:
      responses:
        '200': {description: OK}
components:
  schemas:
    Stats:
      type: object
      properties:
        orders: {type: integer}
    User:
      type: object
      properties:
        id: {type: string}
"##;

    fn build() -> Vec<ApiResource> {
        let mut parser = OpenApiParser::new();
        parser.parse_content(DOCUMENT).unwrap();
        ResourceTreeBuilder::new(parser.schemas()).build(&parser.path_items())
    }

    #[test]
    fn test_tree_shape() {
        let tree = build();
        let keys: Vec<_> = tree.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["stats", "users"]);

        let users = &tree[1];
        assert_eq!(users.name, "Users");
        assert!(!users.requires_parent_id);
        assert_eq!(users.children.len(), 1);

        let sessions = &users.children[0];
        assert_eq!(sessions.key, "users.sessions");
        assert_eq!(sessions.path_segment, "sessions");
        assert!(sessions.requires_parent_id);
        assert_eq!(sessions.operations[0].operation_type, OperationType::SubList);
    }

    #[test]
    fn test_operation_types() {
        let tree = build();
        let users = &tree[1];
        let types: Vec<_> = users
            .operations
            .iter()
            .map(|op| (op.http_method.as_str(), op.path_template.as_str(), op.operation_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("GET", "/api/v1/users", OperationType::List),
                ("POST", "/api/v1/users", OperationType::Create),
                ("GET", "/api/v1/users/{id}", OperationType::Detail),
                ("DELETE", "/api/v1/users/{id}", OperationType::Delete),
            ]
        );
        assert_eq!(users.operations[2].path_parameters, vec!["id"]);
    }

    #[test]
    fn test_response_schemas_are_resolved() {
        let tree = build();
        let stats = &tree[0];
        let schema = stats.operations[0].response_schema.as_ref().unwrap();
        assert!(schema.reference.is_none());
        assert!(schema.property("orders").is_some());
        assert_eq!(stats.operations[0].summary.as_deref(), Some("Shop statistics"));

        let users = tree[1].operations[0].response_schema.as_ref().unwrap();
        assert!(users.items.as_ref().unwrap().property("id").is_some());
    }

    #[test]
    fn test_single_path_keeps_its_segment() {
        let paths = vec![("/reports".to_string(), PathItem::default())];
        let table = ComponentSchemas::new();
        let tree = ResourceTreeBuilder::new(&table).build(&paths);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].key, "reports");
        assert!(tree[0].operations.is_empty());
    }

    #[test]
    fn test_resource_reachable_without_parent() {
        let paths = vec![
            ("/tenants/{t}/audit".to_string(), PathItem::default()),
            ("/tenants/audit".to_string(), PathItem::default()),
            ("/health".to_string(), PathItem::default()),
        ];
        let table = ComponentSchemas::new();
        let tree = ResourceTreeBuilder::new(&table).build(&paths);
        let audit = &tree[0].children[0];
        assert_eq!(audit.key, "tenants.audit");
        assert!(!audit.requires_parent_id);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("users"), "Users");
        assert_eq!(display_name("user-groups"), "User Groups");
        assert_eq!(display_name("audit_log"), "Audit Log");
    }
}
