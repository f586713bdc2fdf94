//! Runtime validation schema and UI metadata
//!
//! The schema describes exactly the documents `from_document` can parse:
//! generated from the same property list and cardinalities as the document
//! codec. Validation runs before structural decoding so that shape errors
//! surface as [`DecodeError::SchemaMismatch`].

use crate::document::{ID_KEY, TYPE_KEY};
use crate::error::{DecodeError, DecodeResult};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Whether an object key must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Present and not `null`
    Required,
    /// May be absent or `null`
    Optional,
}

/// Structural description of a document value
#[derive(Debug, Clone)]
pub enum Schema {
    String,
    Boolean,
    Integer,
    Number,
    Date,
    DateTime,
    Identifier,
    Literal,
    Term,
    /// Exactly this value
    Const(Value),
    /// One of these values
    Enum(Vec<Value>),
    Array {
        items: Box<Schema>,
        min_items: usize,
    },
    Object(ObjectSchema),
    /// At least one alternative matches
    OneOf(Vec<Schema>),
    /// Alternative selected by the `type` key
    Discriminated {
        name: String,
        variants: Vec<(String, Schema)>,
    },
    /// Named schema resolved on use, for recursive types
    Lazy {
        name: &'static str,
        resolve: fn() -> Schema,
    },
}

/// Object schema with reserved identifier and discriminant keys
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    name: String,
    identifier: Presence,
    discriminants: Vec<String>,
    properties: Vec<PropertySchema>,
}

#[derive(Debug, Clone)]
struct PropertySchema {
    name: String,
    schema: Schema,
    presence: Presence,
}

impl ObjectSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: Presence::Optional,
            discriminants: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn identifier(mut self, presence: Presence) -> Self {
        self.identifier = presence;
        self
    }

    /// Allowed values of the `type` key; when set, the key is required
    pub fn discriminant(mut self, values: &[&str]) -> Self {
        self.discriminants = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn property(mut self, name: impl Into<String>, schema: Schema, presence: Presence) -> Self {
        self.properties.push(PropertySchema {
            name: name.into(),
            schema,
            presence,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}

/// A document location that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn violation(path: &str, message: impl Into<String>) -> SchemaViolation {
    SchemaViolation {
        path: path.to_string(),
        message: message.into(),
    }
}

impl Schema {
    pub fn array(items: Schema, min_items: usize) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_items,
        }
    }

    pub fn lazy(name: &'static str, resolve: fn() -> Schema) -> Self {
        Schema::Lazy { name, resolve }
    }

    /// Validate a document, reporting the first violation
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "$")
    }

    /// Validate and map a violation into a decode error for the named type
    pub fn validate_document(&self, shape: &str, value: &Value) -> DecodeResult<()> {
        self.validate(value).map_err(|v| DecodeError::SchemaMismatch {
            shape: shape.to_string(),
            path: v.path,
            message: v.message,
        })
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let expect = |ok: bool, what: &str| {
            if ok {
                Ok(())
            } else {
                Err(violation(path, format!("expected {}", what)))
            }
        };
        match self {
            Schema::String | Schema::Identifier => expect(value.is_string(), "string"),
            Schema::Boolean => expect(value.is_boolean(), "boolean"),
            Schema::Integer => expect(value.as_i64().is_some(), "integer"),
            Schema::Number => expect(value.is_number(), "number"),
            Schema::Date => expect(
                value
                    .as_str()
                    .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
                "date (YYYY-MM-DD)",
            ),
            Schema::DateTime => expect(
                value
                    .as_str()
                    .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
                "RFC 3339 date-time",
            ),
            Schema::Literal => expect(
                value
                    .get("@value")
                    .is_some_and(Value::is_string),
                "literal object with string @value",
            ),
            Schema::Term => expect(
                value.get(ID_KEY).is_some_and(Value::is_string) || value.get("@value").is_some(),
                "term object with @id or @value",
            ),
            Schema::Const(expected) => expect(value == expected, &expected.to_string()),
            Schema::Enum(allowed) => expect(
                allowed.contains(value),
                &format!(
                    "one of {}",
                    allowed
                        .iter()
                        .map(Value::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ),
            Schema::Array { items, min_items } => {
                let array = value
                    .as_array()
                    .ok_or_else(|| violation(path, "expected array"))?;
                if array.len() < *min_items {
                    return Err(violation(
                        path,
                        format!("expected at least {} item(s), found {}", min_items, array.len()),
                    ));
                }
                for (i, item) in array.iter().enumerate() {
                    items.validate_at(item, &format!("{}[{}]", path, i))?;
                }
                Ok(())
            }
            Schema::Object(object) => object.validate_at(value, path),
            Schema::OneOf(alternatives) => {
                if alternatives.iter().any(|s| s.validate_at(value, path).is_ok()) {
                    Ok(())
                } else {
                    Err(violation(path, "no alternative matched"))
                }
            }
            Schema::Discriminated { name, variants } => {
                let tag = value
                    .get(TYPE_KEY)
                    .and_then(Value::as_str)
                    .ok_or_else(|| violation(path, format!("{} requires a string type", name)))?;
                match variants.iter().find(|(variant, _)| variant == tag) {
                    Some((_, schema)) => schema.validate_at(value, path),
                    None => Err(violation(
                        path,
                        format!("{:?} is not a member of {}", tag, name),
                    )),
                }
            }
            Schema::Lazy { resolve, .. } => resolve().validate_at(value, path),
        }
    }

    /// JSON Schema rendering; lazy schemas become `definitions` references
    pub fn to_json_schema(&self) -> Value {
        let mut definitions = BTreeMap::new();
        let mut root = self.json_with(&mut definitions);
        if !definitions.is_empty() {
            if let Value::Object(object) = &mut root {
                let defs: Map<String, Value> = definitions.into_iter().collect();
                object.insert("definitions".to_string(), Value::Object(defs));
            }
        }
        root
    }

    fn json_with(&self, definitions: &mut BTreeMap<String, Value>) -> Value {
        match self {
            Schema::String => json!({"type": "string"}),
            Schema::Identifier => json!({"type": "string", "format": "iri-reference"}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Integer => json!({"type": "integer"}),
            Schema::Number => json!({"type": "number"}),
            Schema::Date => json!({"type": "string", "format": "date"}),
            Schema::DateTime => json!({"type": "string", "format": "date-time"}),
            Schema::Literal => json!({
                "type": "object",
                "properties": {
                    "@value": {"type": "string"},
                    "@language": {"type": "string"},
                    "@type": {"type": "string"}
                },
                "required": ["@value"]
            }),
            Schema::Term => json!({"type": "object"}),
            Schema::Const(value) => json!({"const": value}),
            Schema::Enum(values) => json!({"enum": values}),
            Schema::Array { items, min_items } => json!({
                "type": "array",
                "items": items.json_with(definitions),
                "minItems": min_items
            }),
            Schema::Object(object) => object.json_with(definitions),
            Schema::OneOf(alternatives) => json!({
                "oneOf": alternatives.iter().map(|s| s.json_with(definitions)).collect::<Vec<_>>()
            }),
            Schema::Discriminated { variants, .. } => json!({
                "oneOf": variants.iter().map(|(_, s)| s.json_with(definitions)).collect::<Vec<_>>()
            }),
            Schema::Lazy { name, resolve } => {
                if !definitions.contains_key(*name) {
                    definitions.insert(name.to_string(), Value::Null);
                    let resolved = resolve().json_with(definitions);
                    definitions.insert(name.to_string(), resolved);
                }
                json!({"$ref": format!("#/definitions/{}", name)})
            }
        }
    }
}

impl ObjectSchema {
    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let object = value
            .as_object()
            .ok_or_else(|| violation(path, format!("expected {} object", self.name)))?;
        let present = |key: &str| object.get(key).filter(|v| !v.is_null());

        match present(ID_KEY) {
            Some(id) if !id.is_string() => {
                return Err(violation(&format!("{}.{}", path, ID_KEY), "expected string"))
            }
            None if self.identifier == Presence::Required => {
                return Err(violation(path, format!("missing {}", ID_KEY)))
            }
            _ => {}
        }

        if !self.discriminants.is_empty() {
            let tag = present(TYPE_KEY).and_then(Value::as_str);
            if !tag.is_some_and(|t| self.discriminants.iter().any(|d| d == t)) {
                return Err(violation(
                    &format!("{}.{}", path, TYPE_KEY),
                    format!("expected one of {}", self.discriminants.join(", ")),
                ));
            }
        }

        for property in &self.properties {
            let child = format!("{}.{}", path, property.name);
            match present(&property.name) {
                Some(value) => property.schema.validate_at(value, &child)?,
                None if property.presence == Presence::Required => {
                    return Err(violation(&child, "missing required property"))
                }
                None => {}
            }
        }
        Ok(())
    }

    fn json_with(&self, definitions: &mut BTreeMap<String, Value>) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        properties.insert(ID_KEY.to_string(), json!({"type": "string"}));
        if self.identifier == Presence::Required {
            required.push(ID_KEY.to_string());
        }
        if !self.discriminants.is_empty() {
            properties.insert(TYPE_KEY.to_string(), json!({"enum": self.discriminants}));
            required.push(TYPE_KEY.to_string());
        }
        for property in &self.properties {
            properties.insert(property.name.clone(), property.schema.json_with(definitions));
            if property.presence == Presence::Required {
                required.push(property.name.clone());
            }
        }
        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

/// Runtime schema of a generated type
pub trait RuntimeSchema {
    fn runtime_schema() -> Schema;

    fn json_schema() -> Value {
        Self::runtime_schema().to_json_schema()
    }
}

/// Interactive form layout: one control per property, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    pub elements: Vec<UiControl>,
}

impl UiSchema {
    pub fn vertical(elements: Vec<UiControl>) -> Self {
        Self {
            kind: "VerticalLayout",
            elements,
        }
    }

    pub fn control(&self, name: &str) -> Option<&UiControl> {
        let scope = UiControl::scope_for(name);
        self.elements.iter().find(|c| c.scope == scope)
    }
}

/// One form control bound to a property scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiControl {
    #[serde(rename = "type")]
    kind: &'static str,
    pub scope: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<UiRule>,
}

/// Visibility rule; the discriminant control is always hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiRule {
    pub effect: &'static str,
    pub condition: Value,
}

impl UiControl {
    pub fn new(name: &str, label: impl Into<String>) -> Self {
        Self {
            kind: "Control",
            scope: Self::scope_for(name),
            label: label.into(),
            rule: None,
        }
    }

    /// Hidden control for the `type` key
    pub fn discriminant() -> Self {
        Self {
            rule: Some(UiRule {
                effect: "HIDE",
                condition: json!({}),
            }),
            ..Self::new(TYPE_KEY, "Type")
        }
    }

    pub fn scope_for(name: &str) -> String {
        format!("#/properties/{}", name)
    }

    pub fn is_hidden(&self) -> bool {
        self.rule.as_ref().is_some_and(|r| r.effect == "HIDE")
    }
}

/// UI metadata of a generated type
pub trait UiMetadata {
    fn ui_schema() -> UiSchema;
}
