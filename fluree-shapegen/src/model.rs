//! The type model: one [`ShapeType`] per compiled shape
//!
//! Built per shape by the Builder, completed by the Linker (references
//! resolved, inheritance flattened, recursive edges boxed), then read by
//! every emitter.

use fluree_graph_ir::Term;
use std::fmt;

/// What a shape compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Struct with private fields and accessors
    Record,
    /// Not instantiable; emitted as a sum over its concrete descendants
    Abstract,
    /// Struct with public fields
    Interface,
    /// Sum over the member shapes
    Union,
}

impl ShapeKind {
    pub fn is_record(self) -> bool {
        matches!(self, ShapeKind::Record | ShapeKind::Interface)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Record => "record",
            ShapeKind::Abstract => "abstract",
            ShapeKind::Interface => "interface",
            ShapeKind::Union => "union",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one
    Required,
    /// Zero or one
    Optional,
    /// Zero or more, unordered
    Set,
    /// One or more, unordered
    NonEmptySet,
    /// Zero or more, ordered, encoded as an RDF list
    List,
}

impl Cardinality {
    pub fn is_many(self) -> bool {
        matches!(
            self,
            Cardinality::Set | Cardinality::NonEmptySet | Cardinality::List
        )
    }

    /// `(min, max)` occurrence bounds; `None` is unbounded
    pub fn bounds(self) -> (u64, Option<u64>) {
        match self {
            Cardinality::Required => (1, Some(1)),
            Cardinality::Optional => (0, Some(1)),
            Cardinality::Set | Cardinality::List => (0, None),
            Cardinality::NonEmptySet => (1, None),
        }
    }

    /// Whether `self` admits only counts that `wider` admits
    pub fn narrows(self, wider: Cardinality) -> bool {
        if (self == Cardinality::List) != (wider == Cardinality::List) {
            return false;
        }
        let (min, max) = self.bounds();
        let (wider_min, wider_max) = wider.bounds();
        let max_ok = match (max, wider_max) {
            (_, None) => true,
            (Some(m), Some(w)) => m <= w,
            (None, Some(_)) => false,
        };
        min >= wider_min && max_ok
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cardinality::Required => "required",
            Cardinality::Optional => "optional",
            Cardinality::Set => "set",
            Cardinality::NonEmptySet => "non-empty set",
            Cardinality::List => "list",
        })
    }
}

/// Built-in value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    /// Text with optional language tag or datatype
    Literal,
    /// IRI or blank node reference
    Identifier,
    /// Any term
    Term,
}

impl Primitive {
    /// Variant name inside generated primitive unions
    pub fn variant_name(self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Integer => "Integer",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
            Primitive::Date => "Date",
            Primitive::DateTime => "DateTime",
            Primitive::Literal => "Literal",
            Primitive::Identifier => "Identifier",
            Primitive::Term => "Term",
        }
    }

    /// Copied out of accessors rather than borrowed
    pub fn is_copy(self) -> bool {
        matches!(
            self,
            Primitive::Integer
                | Primitive::Number
                | Primitive::Boolean
                | Primitive::Date
                | Primitive::DateTime
        )
    }
}

/// Reference to another shape by IRI, with the type name filled in by the Linker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRef {
    pub iri: String,
    pub name: Option<String>,
    /// Held behind `Box` because the edge closes a by-value cycle
    pub boxed: bool,
}

impl ShapeRef {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            name: None,
            boxed: false,
        }
    }

    /// Resolved type name; empty before linking
    pub fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Closed set of allowed values, from `sh:in`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl Enumeration {
    /// A one-member enumeration is emitted as a unit type
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub variant: String,
    pub term: Term,
    /// Document form: the IRI or the lexical value
    pub document: String,
}

/// Union of primitive alternatives, from `sh:or` of datatypes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveUnion {
    pub name: String,
    pub members: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Primitive(Primitive),
    Shape(ShapeRef),
    /// `sh:class` target; the Linker turns it into a shape or an identifier
    Class(String),
    Enumeration(Enumeration),
    PrimitiveUnion(PrimitiveUnion),
}

impl ValueType {
    pub fn shape_ref(&self) -> Option<&ShapeRef> {
        match self {
            ValueType::Shape(r) => Some(r),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ValueType::Primitive(p) => p.variant_name().to_lowercase(),
            ValueType::Shape(r) => format!("shape <{}>", r.iri),
            ValueType::Class(c) => format!("class <{}>", c),
            ValueType::Enumeration(e) => format!("enumeration {}", e.name),
            ValueType::PrimitiveUnion(u) => format!("union {}", u.name),
        }
    }
}

/// Constant substituted for an absent single-valued property
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    /// Year, month, day
    Date(i32, u32, u32),
    Identifier(String),
    /// Index into the enumeration's members
    Member(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyType {
    /// Document key and query variable stem (lowerCamelCase)
    pub name: String,
    /// Rust field and accessor name (snake_case)
    pub field: String,
    pub predicate: String,
    pub cardinality: Cardinality,
    pub value: ValueType,
    pub default: Option<DefaultValue>,
    /// Decoding looks for this value specifically
    pub has_value: Option<Term>,
    /// Accepted language ranges; empty accepts any
    pub language_in: Vec<String>,
    pub mutable: bool,
    pub visibility: Visibility,
    /// Declared `sh:order`
    pub order: Option<f64>,
    /// Position among the declaring shape's properties
    pub index: usize,
    pub label: String,
    pub description: Option<String>,
    /// Type name of the shape that declared the property
    pub declared_by: String,
}

impl PropertyType {
    /// Stored behind `Box` in its field
    pub fn is_boxed(&self) -> bool {
        !self.cardinality.is_many() && self.value.shape_ref().is_some_and(|r| r.boxed)
    }

    /// Sort key: declared rank, else declaration position
    pub fn rank(&self) -> (f64, usize) {
        (self.order.unwrap_or(self.index as f64), self.index)
    }
}

/// How identifiers of a record are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// Always supplied by the caller
    ExplicitOnly,
    /// Blank node unless supplied
    BlankOrNamed,
    /// Random UUID under the prefix
    MintedRandom { prefix: String },
    /// SHA-256 of the properties (never the identifier) under the prefix
    MintedContentHash { prefix: String },
    /// Supplied, and one of a fixed set of IRIs
    ConstrainedEnum { allowed: Vec<String> },
}

impl IdentifierStrategy {
    /// Whether the struct holds a lazily minted identifier
    pub fn is_lazy(&self) -> bool {
        matches!(
            self,
            IdentifierStrategy::BlankOrNamed
                | IdentifierStrategy::MintedRandom { .. }
                | IdentifierStrategy::MintedContentHash { .. }
        )
    }

    pub fn prefix(&self) -> Option<&str> {
        match self {
            IdentifierStrategy::MintedRandom { prefix }
            | IdentifierStrategy::MintedContentHash { prefix } => Some(prefix),
            _ => None,
        }
    }
}

impl fmt::Display for IdentifierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierStrategy::ExplicitOnly => f.write_str("explicit"),
            IdentifierStrategy::BlankOrNamed => f.write_str("blank-or-named"),
            IdentifierStrategy::MintedRandom { prefix } => write!(f, "uuid({})", prefix),
            IdentifierStrategy::MintedContentHash { prefix } => write!(f, "sha256({})", prefix),
            IdentifierStrategy::ConstrainedEnum { allowed } => {
                write!(f, "one of {} IRI(s)", allowed.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeType {
    pub iri: String,
    pub name: String,
    pub kind: ShapeKind,
    pub base: Option<ShapeRef>,
    pub identifier: IdentifierStrategy,
    /// Own properties after building; the flattened list after linking
    pub properties: Vec<PropertyType>,
    /// Declared RDF types
    pub rdf_types: Vec<String>,
    /// RDF types of ancestors, filled by the Linker
    pub inherited_types: Vec<String>,
    /// Union members as declared; concrete leaves after linking
    pub members: Vec<ShapeRef>,
    pub label: String,
    pub description: Option<String>,
    /// Position in the input
    pub index: usize,
}

impl ShapeType {
    /// Emitted as a sum type rather than a struct
    pub fn is_sum(&self) -> bool {
        matches!(self.kind, ShapeKind::Union | ShapeKind::Abstract)
    }

    /// Types a decoded node must assert: own types, else inherited ones
    pub fn check_types(&self) -> &[String] {
        if self.rdf_types.is_empty() {
            &self.inherited_types
        } else {
            &self.rdf_types
        }
    }

    /// Types written on encode: own then inherited
    pub fn write_types(&self) -> Vec<String> {
        let mut out = self.rdf_types.clone();
        for t in &self.inherited_types {
            if !out.contains(t) {
                out.push(t.clone());
            }
        }
        out
    }

    pub fn property(&self, name: &str) -> Option<&PropertyType> {
        self.properties.iter().find(|p| p.name == name)
    }
}

pub mod naming {
    //! Identifier conversions for generated names

    /// Last segment of an IRI after `#`, `/` or `:`
    pub fn local_name(iri: &str) -> &str {
        iri.rsplit(|c| c == '#' || c == '/' || c == ':')
            .next()
            .unwrap_or(iri)
    }

    fn words(s: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();
        let chars: Vec<char> = s.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if !c.is_alphanumeric() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            let boundary = c.is_uppercase()
                && !current.is_empty()
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || chars.get(i + 1).is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
        words
    }

    fn capitalize(word: &str) -> String {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }

    /// `first-name` → `FirstName`
    pub fn upper_camel(s: &str) -> String {
        words(s).iter().map(|w| capitalize(w)).collect()
    }

    /// `FirstName` → `firstName`
    pub fn lower_camel(s: &str) -> String {
        let upper = upper_camel(s);
        let mut chars = upper.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// `firstName` → `first_name`
    pub fn snake(s: &str) -> String {
        words(s)
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// `firstName` → `First name`
    pub fn title(s: &str) -> String {
        let words = words(s);
        let mut out = Vec::with_capacity(words.len());
        for (i, w) in words.iter().enumerate() {
            out.push(if i == 0 { capitalize(w) } else { w.to_lowercase() });
        }
        out.join(" ")
    }

    /// Type name for a shape IRI: local name, trailing `Shape` removed
    pub fn type_name_from_iri(iri: &str) -> String {
        let local = local_name(iri);
        let stem = local
            .strip_suffix("Shape")
            .filter(|s| !s.is_empty())
            .unwrap_or(local);
        upper_camel(stem)
    }

    const KEYWORDS: &[&str] = &[
        "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
        "true", "try", "type", "unsafe", "use", "where", "while", "yield", "abstract", "become",
        "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "gen",
    ];

    /// Valid field identifier: keywords get a trailing `_`, leading digits a `_`
    pub fn field_ident(s: &str) -> String {
        let mut name = snake(s);
        if name.is_empty() {
            name.push('_');
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        if KEYWORDS.contains(&name.as_str()) {
            name.push('_');
        }
        name
    }

    /// Valid type identifier, or `None` when nothing usable remains
    pub fn type_ident(s: &str) -> Option<String> {
        let name = upper_camel(s);
        if name.is_empty() {
            return None;
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(format!("V{}", name));
        }
        Some(name)
    }

    pub fn is_valid_type_name(s: &str) -> bool {
        s.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && s.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

#[cfg(test)]
mod tests {
    use super::naming::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names() {
        assert_eq!(type_name_from_iri("http://example.org/PersonShape"), "Person");
        assert_eq!(type_name_from_iri("http://example.org/shapes#blog-post"), "BlogPost");
        assert_eq!(type_name_from_iri("urn:x:Shape"), "Shape");
        assert_eq!(upper_camel("HTTPServer"), "HttpServer");
        assert_eq!(lower_camel("first_name"), "firstName");
        assert_eq!(snake("firstName"), "first_name");
        assert_eq!(snake("dateOfBirth2"), "date_of_birth2");
        assert_eq!(title("dateOfBirth"), "Date of birth");
        assert_eq!(field_ident("match"), "match_");
        assert_eq!(field_ident("3d"), "_3d");
        assert_eq!(type_ident("42"), Some("V42".to_string()));
        assert_eq!(type_ident("--"), None);
        assert!(is_valid_type_name("Person2"));
        assert!(!is_valid_type_name("person"));
    }

    #[test]
    fn test_cardinality_narrowing() {
        use Cardinality::*;
        assert!(Required.narrows(Optional));
        assert!(NonEmptySet.narrows(Set));
        assert!(Required.narrows(NonEmptySet));
        assert!(!Optional.narrows(Required));
        assert!(!Set.narrows(Optional));
        assert!(!List.narrows(Set));
        assert!(List.narrows(List));
    }

    #[test]
    fn test_types_checked_and_written() {
        let shape = ShapeType {
            iri: "http://example.org/CarShape".to_string(),
            name: "Car".to_string(),
            kind: ShapeKind::Record,
            base: None,
            identifier: IdentifierStrategy::BlankOrNamed,
            properties: vec![],
            rdf_types: vec![],
            inherited_types: vec!["http://example.org/Vehicle".to_string()],
            members: vec![],
            label: "Car".to_string(),
            description: None,
            index: 0,
        };
        assert_eq!(shape.check_types(), ["http://example.org/Vehicle".to_string()]);

        let typed = ShapeType {
            rdf_types: vec!["http://example.org/Car".to_string()],
            ..shape
        };
        assert_eq!(typed.check_types(), ["http://example.org/Car".to_string()]);
        assert_eq!(
            typed.write_types(),
            vec!["http://example.org/Car".to_string(), "http://example.org/Vehicle".to_string()]
        );
    }
}
