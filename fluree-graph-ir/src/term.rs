//! Terms: expanded IRIs, blank nodes and typed literals

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Label of a blank node, meaningful within one graph only
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// `label` without the `_:` prefix
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `_:label`
    pub fn to_ntriples(&self) -> String {
        format!("_:{}", self.0)
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Native value of a literal
///
/// Datatypes without a variant of their own (dates, decimals) keep their
/// lexical form in `String`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    String(Arc<str>),
    Boolean(bool),
    Integer(i64),
    Double(f64),
}

impl LiteralValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Lexical form, with XSD spellings for non-finite doubles
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() {
                        "INF".to_string()
                    } else {
                        "-INF".to_string()
                    }
                } else {
                    d.to_string()
                }
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen
    pub fn as_double(&self) -> Option<f64> {
        match self {
            LiteralValue::Double(d) => Some(*d),
            LiteralValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a == b,
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

/// Node or value in a triple
///
/// IRIs are always expanded. A literal with a language tag has the
/// `rdf:langString` datatype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Arc<str>),
    BlankNode(BlankId),
    Literal {
        value: LiteralValue,
        datatype: Datatype,
        language: Option<Arc<str>>,
    },
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// `xsd:string` literal
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::literal(LiteralValue::string(value), Datatype::xsd_string(), None)
    }

    pub fn boolean(value: bool) -> Self {
        Term::literal(LiteralValue::Boolean(value), Datatype::xsd_boolean(), None)
    }

    pub fn integer(value: i64) -> Self {
        Term::literal(LiteralValue::Integer(value), Datatype::xsd_integer(), None)
    }

    pub fn double(value: f64) -> Self {
        Term::literal(LiteralValue::Double(value), Datatype::xsd_double(), None)
    }

    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::literal(
            LiteralValue::string(value),
            Datatype::rdf_lang_string(),
            Some(lang.as_ref()),
        )
    }

    /// Literal kept in lexical form under `datatype`
    pub fn typed(value: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::literal(LiteralValue::string(value), datatype, None)
    }

    pub fn literal(value: LiteralValue, datatype: Datatype, language: Option<&str>) -> Self {
        Term::Literal {
            value,
            datatype,
            language: language.map(Arc::from),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// IRI or blank node: anything that can be a subject
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }

    /// For error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Iri(_) => "IRI",
            Term::BlankNode(_) => "blank node",
            Term::Literal { .. } => "literal",
        }
    }
}

fn write_escaped(f: &mut std::fmt::Formatter<'_>, lexical: &str) -> std::fmt::Result {
    for c in lexical.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

/// N-Triples rendering
impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "{}", id),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                f.write_str("\"")?;
                write_escaped(f, &value.lexical())?;
                f.write_str("\"")?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if !datatype.is_xsd_string() {
                    write!(f, "^^<{}>", datatype.as_iri())
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(id.to_ntriples(), "_:b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_term_constructors() {
        let iri = Term::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert!(iri.is_resource());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let blank = Term::blank("b0");
        assert!(blank.is_blank());
        assert!(blank.is_resource());

        let string = Term::string("hello");
        assert!(string.is_literal());
        assert!(!string.is_resource());

        assert_eq!(string.kind_name(), "literal");
        assert_eq!(blank.kind_name(), "blank node");
    }

    #[test]
    fn test_literal_constructor_matches_shorthands() {
        assert_eq!(
            Term::literal(LiteralValue::Integer(7), Datatype::xsd_integer(), None),
            Term::integer(7)
        );
        assert_eq!(
            Term::literal(LiteralValue::string("hi"), Datatype::rdf_lang_string(), Some("en")),
            Term::lang_string("hi", "en")
        );
    }

    #[test]
    fn test_literal_lexical_forms() {
        assert_eq!(LiteralValue::string("test").lexical(), "test");
        assert_eq!(LiteralValue::Boolean(true).lexical(), "true");
        assert_eq!(LiteralValue::Integer(42).lexical(), "42");
        assert_eq!(LiteralValue::Double(f64::NAN).lexical(), "NaN");
        assert_eq!(LiteralValue::Double(f64::INFINITY).lexical(), "INF");
        assert_eq!(LiteralValue::Double(f64::NEG_INFINITY).lexical(), "-INF");
        assert_eq!(LiteralValue::Integer(3).as_double(), Some(3.0));
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://example.org").to_string(), "<http://example.org>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::string("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(Term::lang_string("bonjour", "fr").to_string(), "\"bonjour\"@fr");
        assert_eq!(
            Term::integer(42).to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_double_equality_with_nan() {
        assert_eq!(LiteralValue::Double(f64::NAN), LiteralValue::Double(f64::NAN));
        assert_eq!(Term::double(f64::NAN), Term::double(f64::NAN));
    }
}
