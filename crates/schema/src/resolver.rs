//! `$ref` resolution against a document's component schemas
//!
//! Resolution is best effort: references that cannot be followed (foreign
//! pointer forms, missing components, cycles, depth exhaustion) are left in
//! place rather than reported.

use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{AdditionalProperties, ComponentSchemas, JsonSchema};

/// The only reference form the resolver follows
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Default nesting depth after which resolution stops
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Resolve `schema` against `components` with the given depth limit.
///
/// An absent schema resolves to `None`.
pub fn resolve(
    schema: Option<&JsonSchema>,
    components: &ComponentSchemas,
    max_depth: usize,
) -> Option<JsonSchema> {
    SchemaResolver::new(components)
        .with_max_depth(max_depth)
        .resolve(schema)
}

/// Dereferences schemas against a component table
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    components: &'a ComponentSchemas,
    max_depth: usize,
}

impl<'a> SchemaResolver<'a> {
    /// Create a resolver with the default depth limit
    pub fn new(components: &'a ComponentSchemas) -> Self {
        Self {
            components,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve a schema, producing a new tree
    pub fn resolve(&self, schema: Option<&JsonSchema>) -> Option<JsonSchema> {
        let schema = schema?;
        let mut visiting = Vec::new();
        Some(self.resolve_node(schema, 0, &mut visiting))
    }

    /// Resolve the named component schema, if the table has it
    pub fn resolve_named(&self, name: &str) -> Option<JsonSchema> {
        let reference = JsonSchema::from_ref(format!("{COMPONENT_REF_PREFIX}{name}"));
        self.components.get(name)?;
        self.resolve(Some(&reference))
    }

    /// Extract the component name from a `#/components/schemas/<Name>` pointer
    pub fn component_name(reference: &str) -> Option<&str> {
        reference
            .strip_prefix(COMPONENT_REF_PREFIX)
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }

    fn resolve_node(
        &self,
        schema: &JsonSchema,
        depth: usize,
        visiting: &mut Vec<String>,
    ) -> JsonSchema {
        if depth > self.max_depth {
            debug!("Depth limit {} reached, leaving schema as-is", self.max_depth);
            return schema.clone();
        }

        if let Some(reference) = &schema.reference {
            return self.resolve_reference(schema, reference, depth, visiting);
        }

        let mut resolved = schema.clone();

        if let Some(properties) = &schema.properties {
            resolved.properties = Some(
                properties
                    .iter()
                    .map(|(name, prop)| (name.clone(), self.resolve_node(prop, depth + 1, visiting)))
                    .collect::<BTreeMap<_, _>>(),
            );
        }

        if let Some(items) = &schema.items {
            resolved.items = Some(Box::new(self.resolve_node(items, depth + 1, visiting)));
        }

        resolved.one_of = self.resolve_all(schema.one_of.as_deref(), depth, visiting);
        resolved.any_of = self.resolve_all(schema.any_of.as_deref(), depth, visiting);
        resolved.all_of = self.resolve_all(schema.all_of.as_deref(), depth, visiting);

        if let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties {
            resolved.additional_properties = Some(AdditionalProperties::Schema(Box::new(
                self.resolve_node(extra, depth + 1, visiting),
            )));
        }

        resolved
    }

    fn resolve_all(
        &self,
        variants: Option<&[JsonSchema]>,
        depth: usize,
        visiting: &mut Vec<String>,
    ) -> Option<Vec<JsonSchema>> {
        variants.map(|variants| {
            variants
                .iter()
                .map(|variant| self.resolve_node(variant, depth + 1, visiting))
                .collect()
        })
    }

    fn resolve_reference(
        &self,
        schema: &JsonSchema,
        reference: &str,
        depth: usize,
        visiting: &mut Vec<String>,
    ) -> JsonSchema {
        let Some(name) = Self::component_name(reference) else {
            debug!("Unsupported reference form: {}", reference);
            return schema.clone();
        };

        let Some(target) = self.components.get(name) else {
            debug!("Reference to missing component schema: {}", name);
            return schema.clone();
        };

        if visiting.iter().any(|seen| seen == name) {
            debug!("Cyclic reference to {} left unresolved", name);
            return schema.clone();
        }

        visiting.push(name.to_string());
        let resolved = self.resolve_node(target, depth, visiting);
        visiting.pop();

        let siblings = JsonSchema {
            reference: None,
            ..schema.clone()
        };
        let siblings = self.resolve_node(&siblings, depth, visiting);
        overlay_ref_siblings(siblings, resolved)
    }
}

/// Keywords written next to a `$ref` take precedence over the target's own
/// values. Every keyword is listed so that new fields cannot be skipped.
fn overlay_ref_siblings(siblings: JsonSchema, mut resolved: JsonSchema) -> JsonSchema {
    let JsonSchema {
        reference: _,
        schema_type,
        format,
        description,
        properties,
        required,
        items,
        one_of,
        any_of,
        all_of,
        additional_properties,
        enum_values,
        extra,
    } = siblings;

    fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    overlay(&mut resolved.schema_type, schema_type);
    overlay(&mut resolved.format, format);
    overlay(&mut resolved.description, description);
    overlay(&mut resolved.properties, properties);
    overlay(&mut resolved.required, required);
    overlay(&mut resolved.items, items);
    overlay(&mut resolved.one_of, one_of);
    overlay(&mut resolved.any_of, any_of);
    overlay(&mut resolved.all_of, all_of);
    overlay(&mut resolved.additional_properties, additional_properties);
    overlay(&mut resolved.enum_values, enum_values);
    resolved.extra.extend(extra);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(yaml: &str) -> ComponentSchemas {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn reference(name: &str) -> JsonSchema {
        JsonSchema::from_ref(format!("{COMPONENT_REF_PREFIX}{name}"))
    }

    #[test]
    fn test_absent_schema_passes_through() {
        let table = ComponentSchemas::new();
        assert_eq!(resolve(None, &table, DEFAULT_MAX_DEPTH), None);
    }

    #[test]
    fn test_resolves_nested_references() {
        let table = components(
            r##"
User:
  type: object
  properties:
    id: {type: string}
    address: {$ref: '#/components/schemas/Address'}
Address:
  type: object
  properties:
    city: {type: string}
"##,
        );

        let resolved = SchemaResolver::new(&table)
            .resolve(Some(&reference("User")))
            .unwrap();

        assert!(resolved.reference.is_none());
        assert!(!resolved.contains_ref());
        let address = resolved.property("address").unwrap();
        assert!(address.property("city").unwrap().has_type("string"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let table = components(
            r##"
Node:
  type: object
  properties:
    value: {type: integer}
    child: {$ref: '#/components/schemas/Node'}
"##,
        );

        let resolved = resolve(Some(&reference("Node")), &table, DEFAULT_MAX_DEPTH).unwrap();

        let child = resolved.property("child").unwrap();
        assert_eq!(
            child.reference.as_deref(),
            Some("#/components/schemas/Node")
        );
        assert!(resolved.property("value").unwrap().has_type("integer"));
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let table = components(
            r##"
A:
  type: object
  properties:
    b: {$ref: '#/components/schemas/B'}
B:
  type: array
  items: {$ref: '#/components/schemas/A'}
"##,
        );

        let resolved = resolve(Some(&reference("A")), &table, DEFAULT_MAX_DEPTH).unwrap();
        let b = resolved.property("b").unwrap();
        assert!(b.is_array());
        assert_eq!(
            b.items.as_ref().unwrap().reference.as_deref(),
            Some("#/components/schemas/A")
        );
    }

    #[test]
    fn test_sibling_branches_may_reuse_a_component() {
        let table = components(
            r##"
Money:
  type: object
  properties:
    amount: {type: number}
Order:
  type: object
  properties:
    total: {$ref: '#/components/schemas/Money'}
    tax: {$ref: '#/components/schemas/Money'}
"##,
        );

        let resolved = resolve(Some(&reference("Order")), &table, DEFAULT_MAX_DEPTH).unwrap();
        assert!(resolved.property("total").unwrap().reference.is_none());
        assert!(resolved.property("tax").unwrap().reference.is_none());
    }

    #[test]
    fn test_foreign_reference_forms_are_left_intact() {
        let table = components("Thing: {type: object}");
        let legacy = JsonSchema::from_ref("#/definitions/Thing");
        assert_eq!(resolve(Some(&legacy), &table, DEFAULT_MAX_DEPTH), Some(legacy));

        let missing = reference("Missing");
        assert_eq!(
            resolve(Some(&missing), &table, DEFAULT_MAX_DEPTH),
            Some(missing)
        );
    }

    #[test]
    fn test_depth_limit_stops_expansion() {
        let table = components(
            r##"
Leaf:
  type: string
"##,
        );
        let schema: JsonSchema = serde_yaml::from_str(
            r##"
type: object
properties:
  outer:
    type: object
    properties:
      inner: {$ref: '#/components/schemas/Leaf'}
"##,
        )
        .unwrap();

        let shallow = resolve(Some(&schema), &table, 1).unwrap();
        let inner = shallow
            .property("outer")
            .and_then(|outer| outer.property("inner"))
            .unwrap();
        assert!(inner.reference.is_some());

        let deep = resolve(Some(&schema), &table, DEFAULT_MAX_DEPTH).unwrap();
        let inner = deep
            .property("outer")
            .and_then(|outer| outer.property("inner"))
            .unwrap();
        assert!(inner.has_type("string"));
    }

    #[test]
    fn test_outer_fields_are_preserved() {
        let table = components("Tag: {type: string}");
        let schema: JsonSchema = serde_yaml::from_str(
            r##"
type: object
description: A labelled thing
required: [label]
additionalProperties: {$ref: '#/components/schemas/Tag'}
oneOf:
  - {$ref: '#/components/schemas/Tag'}
  - {type: integer}
"##,
        )
        .unwrap();

        let resolved = resolve(Some(&schema), &table, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(resolved.description.as_deref(), Some("A labelled thing"));
        assert_eq!(resolved.required, Some(vec!["label".to_string()]));
        assert!(resolved.one_of.as_ref().unwrap()[0].has_type("string"));
        match resolved.additional_properties {
            Some(AdditionalProperties::Schema(extra)) => assert!(extra.has_type("string")),
            other => panic!("unexpected additionalProperties: {other:?}"),
        }
    }

    #[test]
    fn test_ref_siblings_override_target() {
        let table = components("Stamp: {type: string, format: date-time, description: Generic}");
        let mut schema = reference("Stamp");
        schema.description = Some("When the order shipped".to_string());

        let resolved = resolve(Some(&schema), &table, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(resolved.description.as_deref(), Some("When the order shipped"));
        assert_eq!(resolved.format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_every_ref_sibling_is_kept() {
        let table = components(
            r##"
Status:
  type: string
  description: Target
Owner:
  type: object
  properties:
    name: {type: string}
"##,
        );
        let schema: JsonSchema = serde_json::from_value(serde_json::json!({
            "$ref": "#/components/schemas/Status",
            "enum": ["a", "b"],
            "required": ["x"],
            "description": "d",
            "nullable": true,
            "properties": {"owner": {"$ref": "#/components/schemas/Owner"}}
        }))
        .unwrap();

        let resolved = resolve(Some(&schema), &table, DEFAULT_MAX_DEPTH).unwrap();
        assert!(resolved.reference.is_none());
        assert!(resolved.has_type("string"));
        assert_eq!(resolved.description.as_deref(), Some("d"));
        assert_eq!(
            resolved.enum_values,
            Some(vec![serde_json::json!("a"), serde_json::json!("b")])
        );
        assert_eq!(resolved.required, Some(vec!["x".to_string()]));
        assert_eq!(resolved.extra.get("nullable"), Some(&serde_json::json!(true)));

        // Sibling subschemas are resolved too
        let owner = resolved.property("owner").unwrap();
        assert!(owner.property("name").is_some());
    }

    #[test]
    fn test_resolve_named() {
        let table = components("Plain: {type: boolean}");
        let resolver = SchemaResolver::new(&table);
        assert!(resolver.resolve_named("Plain").unwrap().has_type("boolean"));
        assert!(resolver.resolve_named("Other").is_none());
    }
}
