//! JSON document codec helpers
//!
//! Documents are JSON objects with two reserved keys: `@id` (the identifier,
//! blank identifiers prefixed with `_:`) and `type` (the discriminant naming
//! the concrete generated type). Every other key is a property name.

use crate::error::{DecodeError, DecodeResult};
use crate::identifier::Identifier;
use crate::value::{DateTime, Literal};
use chrono::NaiveDate;
use fluree_graph_ir::{Datatype, LiteralValue, Term};
use serde_json::{Map, Value};

/// Identifier key
pub const ID_KEY: &str = "@id";
/// Discriminant key
pub const TYPE_KEY: &str = "type";

const VALUE_KEY: &str = "@value";
const LANGUAGE_KEY: &str = "@language";
const DATATYPE_KEY: &str = "@type";

/// Where a document value is being decoded from
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub focus: &'a str,
    pub key: &'a str,
}

impl<'a> DocumentContext<'a> {
    /// Context for a top-level document of the named type
    pub fn root(shape: &'a str) -> Self {
        Self {
            focus: shape,
            key: "$",
        }
    }

    pub fn mistyped(&self, expected: &str, actual: &Value) -> DecodeError {
        DecodeError::mistyped(self.focus, self.key, expected, describe(actual))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Conversion between a value and its document form
pub trait DocumentValue: Sized {
    fn to_document(&self) -> Value;

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self>;
}

/// Read access to one document object during decoding
pub struct DocumentReader<'a> {
    object: &'a Map<String, Value>,
    focus: String,
}

impl<'a> DocumentReader<'a> {
    pub fn new(value: &'a Value, shape: &str, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        let object = value.as_object().ok_or_else(|| cx.mistyped(shape, value))?;
        let focus = match object.get(ID_KEY).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => shape.to_string(),
        };
        Ok(Self { object, focus })
    }

    fn context<'k>(&'k self, key: &'k str) -> DocumentContext<'k> {
        DocumentContext {
            focus: &self.focus,
            key,
        }
    }

    /// Value of a key, with `null` treated as absent
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str) -> DecodeError {
        DecodeError::MissingRequiredValue {
            focus: self.focus.clone(),
            predicate: key.to_string(),
        }
    }

    pub fn discriminant(&self) -> DecodeResult<&'a str> {
        let value = self.get(TYPE_KEY).ok_or_else(|| self.missing(TYPE_KEY))?;
        value
            .as_str()
            .ok_or_else(|| self.context(TYPE_KEY).mistyped("string", value))
    }

    pub fn expect_discriminant(&self, expected: &str) -> DecodeResult<()> {
        let actual = self.discriminant()?;
        if actual == expected {
            Ok(())
        } else {
            Err(self.unknown_discriminant(actual, &[expected]))
        }
    }

    pub fn unknown_discriminant(&self, actual: &str, expected: &[&str]) -> DecodeError {
        DecodeError::mistyped(
            self.focus.clone(),
            TYPE_KEY,
            format!("one of {}", expected.join(", ")),
            actual,
        )
    }

    pub fn identifier(&self) -> DecodeResult<Option<Identifier>> {
        self.optional(ID_KEY)
    }

    pub fn required_identifier(&self) -> DecodeResult<Identifier> {
        self.required(ID_KEY)
    }

    pub fn required<T: DocumentValue>(&self, key: &str) -> DecodeResult<T> {
        self.optional(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional<T: DocumentValue>(&self, key: &str) -> DecodeResult<Option<T>> {
        match self.get(key) {
            Some(value) => T::from_document_value(value, &self.context(key)).map(Some),
            None => Ok(None),
        }
    }

    /// Array-valued key; absent means empty
    pub fn many<T: DocumentValue>(&self, key: &str) -> DecodeResult<Vec<T>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let cx = self.context(key);
        let items = value.as_array().ok_or_else(|| cx.mistyped("array", value))?;
        items
            .iter()
            .map(|item| T::from_document_value(item, &cx))
            .collect()
    }

    pub fn non_empty<T: DocumentValue>(&self, key: &str) -> DecodeResult<Vec<T>> {
        let values = self.many(key)?;
        if values.is_empty() {
            return Err(DecodeError::EmptyNonEmptySet {
                focus: self.focus.clone(),
                predicate: key.to_string(),
            });
        }
        Ok(values)
    }
}

/// Builder for one document object
pub struct DocumentWriter {
    object: Map<String, Value>,
}

impl DocumentWriter {
    pub fn new(discriminant: &str, identifier: &Identifier) -> Self {
        let mut object = Map::new();
        object.insert(ID_KEY.to_string(), identifier.to_document());
        object.insert(TYPE_KEY.to_string(), Value::String(discriminant.to_string()));
        Self { object }
    }

    pub fn value<T: DocumentValue>(&mut self, key: &str, value: &T) {
        self.object.insert(key.to_string(), value.to_document());
    }

    pub fn optional<T: DocumentValue>(&mut self, key: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.value(key, value);
        }
    }

    pub fn many<T: DocumentValue>(&mut self, key: &str, values: &[T]) {
        let items = values.iter().map(DocumentValue::to_document).collect();
        self.object.insert(key.to_string(), Value::Array(items));
    }

    pub fn finish(self) -> Value {
        Value::Object(self.object)
    }
}

impl DocumentValue for String {
    fn to_document(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| cx.mistyped("string", value))
    }
}

impl DocumentValue for bool {
    fn to_document(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value.as_bool().ok_or_else(|| cx.mistyped("boolean", value))
    }
}

impl DocumentValue for i64 {
    fn to_document(&self) -> Value {
        Value::from(*self)
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value.as_i64().ok_or_else(|| cx.mistyped("integer", value))
    }
}

impl DocumentValue for f64 {
    /// Non-finite numbers have no JSON form and render as `null`
    fn to_document(&self) -> Value {
        serde_json::Number::from_f64(*self)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value.as_f64().ok_or_else(|| cx.mistyped("number", value))
    }
}

impl DocumentValue for NaiveDate {
    fn to_document(&self) -> Value {
        Value::String(self.format("%Y-%m-%d").to_string())
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or_else(|| cx.mistyped("date", value))
    }
}

impl DocumentValue for DateTime {
    fn to_document(&self) -> Value {
        Value::String(self.to_rfc3339())
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .ok_or_else(|| cx.mistyped("date-time", value))
    }
}

impl DocumentValue for Literal {
    fn to_document(&self) -> Value {
        let mut object = Map::new();
        object.insert(VALUE_KEY.to_string(), Value::String(self.value.clone()));
        if let Some(language) = &self.language {
            object.insert(LANGUAGE_KEY.to_string(), Value::String(language.clone()));
        }
        if let Some(datatype) = &self.datatype {
            object.insert(DATATYPE_KEY.to_string(), Value::String(datatype.clone()));
        }
        Value::Object(object)
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        let mistyped = || cx.mistyped("literal object", value);
        let object = value.as_object().ok_or_else(mistyped)?;
        let lexical = object
            .get(VALUE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(mistyped)?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        Ok(Literal {
            value: lexical.to_string(),
            language: text(LANGUAGE_KEY),
            datatype: text(DATATYPE_KEY),
        })
    }
}

impl DocumentValue for Identifier {
    fn to_document(&self) -> Value {
        Value::String(self.to_document_string())
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        value
            .as_str()
            .map(Identifier::from_document_str)
            .ok_or_else(|| cx.mistyped("identifier string", value))
    }
}

impl DocumentValue for Term {
    fn to_document(&self) -> Value {
        let mut object = Map::new();
        match self {
            Term::Iri(_) | Term::BlankNode(_) => {
                if let Some(id) = Identifier::from_term(self) {
                    object.insert(ID_KEY.to_string(), id.to_document());
                }
            }
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                let native = match value {
                    LiteralValue::String(s) => Value::String(s.to_string()),
                    LiteralValue::Boolean(b) => Value::Bool(*b),
                    LiteralValue::Integer(i) => Value::from(*i),
                    LiteralValue::Double(d) => d.to_document(),
                };
                object.insert(VALUE_KEY.to_string(), native);
                object.insert(
                    DATATYPE_KEY.to_string(),
                    Value::String(datatype.as_iri().to_string()),
                );
                if let Some(language) = language {
                    object.insert(LANGUAGE_KEY.to_string(), Value::String(language.to_string()));
                }
            }
        }
        Value::Object(object)
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        let mistyped = || cx.mistyped("term object", value);
        let object = value.as_object().ok_or_else(mistyped)?;
        if let Some(id) = object.get(ID_KEY).and_then(Value::as_str) {
            return Ok(Identifier::from_document_str(id).to_term());
        }
        let native = object.get(VALUE_KEY).ok_or_else(mistyped)?;
        let language = object.get(LANGUAGE_KEY).and_then(Value::as_str);
        let (literal, implied) = match native {
            Value::String(s) if language.is_some() => {
                (LiteralValue::string(s), Datatype::rdf_lang_string())
            }
            Value::String(s) => (LiteralValue::string(s), Datatype::xsd_string()),
            Value::Bool(b) => (LiteralValue::Boolean(*b), Datatype::xsd_boolean()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => (LiteralValue::Integer(i), Datatype::xsd_integer()),
                None => (
                    LiteralValue::Double(n.as_f64().ok_or_else(mistyped)?),
                    Datatype::xsd_double(),
                ),
            },
            _ => return Err(mistyped()),
        };
        let datatype = object
            .get(DATATYPE_KEY)
            .and_then(Value::as_str)
            .map(Datatype::from_iri)
            .unwrap_or(implied);
        Ok(Term::literal(literal, datatype, language))
    }
}

impl<T: DocumentValue> DocumentValue for Box<T> {
    fn to_document(&self) -> Value {
        (**self).to_document()
    }

    fn from_document_value(value: &Value, cx: &DocumentContext<'_>) -> DecodeResult<Self> {
        T::from_document_value(value, cx).map(Box::new)
    }
}
