//! RDF vocabulary constants for shape-driven code generation
//!
//! This crate provides a centralized location for the IRIs read by the
//! shape compiler and written by generated code.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `shacl` - SHACL vocabulary (http://www.w3.org/ns/shacl#)
//! - `shapegen` - code generation directives (https://ns.flur.ee/shapegen#)

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:JSON IRI
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";

    /// rdf:first IRI (RDF list head)
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// rdf:rest IRI (RDF list tail)
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// rdf:nil IRI (RDF list terminator)
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// rdfs:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

    /// rdfs:subClassOf IRI
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:short IRI
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";

    /// xsd:byte IRI
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";

    /// xsd:unsignedInt IRI
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";

    /// xsd:unsignedShort IRI
    pub const UNSIGNED_SHORT: &str = "http://www.w3.org/2001/XMLSchema#unsignedShort";

    /// xsd:unsignedByte IRI
    pub const UNSIGNED_BYTE: &str = "http://www.w3.org/2001/XMLSchema#unsignedByte";

    /// xsd:nonNegativeInteger IRI
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";

    /// xsd:positiveInteger IRI
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";

    /// xsd:nonPositiveInteger IRI
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";

    /// xsd:negativeInteger IRI
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:float IRI
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:dateTimeStamp IRI
    pub const DATE_TIME_STAMP: &str = "http://www.w3.org/2001/XMLSchema#dateTimeStamp";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// xsd:normalizedString IRI
    pub const NORMALIZED_STRING: &str = "http://www.w3.org/2001/XMLSchema#normalizedString";

    /// xsd:token IRI
    pub const TOKEN: &str = "http://www.w3.org/2001/XMLSchema#token";

    /// xsd:language IRI
    pub const LANGUAGE: &str = "http://www.w3.org/2001/XMLSchema#language";

    /// Check if a datatype IRI is an integer-family type
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(
            datatype_iri,
            INTEGER
                | LONG
                | INT
                | SHORT
                | BYTE
                | UNSIGNED_INT
                | UNSIGNED_SHORT
                | UNSIGNED_BYTE
                | NON_NEGATIVE_INTEGER
                | POSITIVE_INTEGER
                | NON_POSITIVE_INTEGER
                | NEGATIVE_INTEGER
        )
    }

    /// Check if a datatype IRI is a floating or decimal type
    #[inline]
    pub fn is_float_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, DECIMAL | FLOAT | DOUBLE)
    }

    /// Check if a datatype IRI is a string-like type
    ///
    /// String-like types hold plain text and never carry a language tag.
    #[inline]
    pub fn is_string_like(datatype_iri: &str) -> bool {
        matches!(
            datatype_iri,
            STRING | NORMALIZED_STRING | TOKEN | LANGUAGE | ANY_URI
        )
    }

    /// Check if a datatype IRI is a date-time type
    #[inline]
    pub fn is_date_time(datatype_iri: &str) -> bool {
        matches!(datatype_iri, DATE_TIME | DATE_TIME_STAMP)
    }

    /// Get the local name portion of a datatype IRI (e.g., "integer" from xsd:integer)
    pub fn local_name(datatype_iri: &str) -> Option<&str> {
        datatype_iri.strip_prefix(NS)
    }
}

/// SHACL vocabulary constants
pub mod shacl {
    /// SHACL namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/shacl#";

    // ========================================================================
    // Shape Classes
    // ========================================================================

    /// sh:NodeShape IRI
    pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";

    /// sh:PropertyShape IRI
    pub const PROPERTY_SHAPE: &str = "http://www.w3.org/ns/shacl#PropertyShape";

    // ========================================================================
    // Targeting
    // ========================================================================

    /// sh:targetClass IRI
    pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";

    // ========================================================================
    // Property Shape
    // ========================================================================

    /// sh:property IRI
    pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";

    /// sh:path IRI
    pub const PATH: &str = "http://www.w3.org/ns/shacl#path";

    /// sh:order IRI
    pub const ORDER: &str = "http://www.w3.org/ns/shacl#order";

    /// sh:defaultValue IRI
    pub const DEFAULT_VALUE: &str = "http://www.w3.org/ns/shacl#defaultValue";

    /// sh:deactivated IRI
    pub const DEACTIVATED: &str = "http://www.w3.org/ns/shacl#deactivated";

    // ========================================================================
    // Cardinality Constraints
    // ========================================================================

    /// sh:minCount IRI
    pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";

    /// sh:maxCount IRI
    pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";

    // ========================================================================
    // Value Type Constraints
    // ========================================================================

    /// sh:datatype IRI
    pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";

    /// sh:nodeKind IRI
    pub const NODE_KIND: &str = "http://www.w3.org/ns/shacl#nodeKind";

    /// sh:class IRI
    pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";

    /// sh:node IRI
    pub const NODE: &str = "http://www.w3.org/ns/shacl#node";

    // ========================================================================
    // Value Constraints
    // ========================================================================

    /// sh:hasValue IRI
    pub const HAS_VALUE: &str = "http://www.w3.org/ns/shacl#hasValue";

    /// sh:in IRI
    pub const IN: &str = "http://www.w3.org/ns/shacl#in";

    /// sh:languageIn IRI
    pub const LANGUAGE_IN: &str = "http://www.w3.org/ns/shacl#languageIn";

    // ========================================================================
    // Logical Constraints
    // ========================================================================

    /// sh:or IRI
    pub const OR: &str = "http://www.w3.org/ns/shacl#or";

    /// sh:xone IRI
    pub const XONE: &str = "http://www.w3.org/ns/shacl#xone";

    // ========================================================================
    // Node Kind Values
    // ========================================================================

    /// sh:BlankNode IRI
    pub const BLANK_NODE: &str = "http://www.w3.org/ns/shacl#BlankNode";

    /// sh:IRI IRI
    pub const IRI: &str = "http://www.w3.org/ns/shacl#IRI";

    /// sh:Literal IRI
    pub const LITERAL: &str = "http://www.w3.org/ns/shacl#Literal";

    /// sh:BlankNodeOrIRI IRI
    pub const BLANK_NODE_OR_IRI: &str = "http://www.w3.org/ns/shacl#BlankNodeOrIRI";

    // ========================================================================
    // Non-validating Properties
    // ========================================================================

    /// sh:name IRI
    pub const NAME: &str = "http://www.w3.org/ns/shacl#name";

    /// sh:description IRI
    pub const DESCRIPTION: &str = "http://www.w3.org/ns/shacl#description";
}

/// Code generation directive vocabulary
///
/// These predicates annotate SHACL shapes with information SHACL itself
/// cannot express: type names, abstractness, identifier minting, mutability
/// and accessor visibility.
pub mod shapegen {
    /// shapegen namespace IRI
    pub const NS: &str = "https://ns.flur.ee/shapegen#";

    // ========================================================================
    // Shape Directives
    // ========================================================================

    /// shapegen:name IRI (explicit generated type or property name)
    pub const NAME: &str = "https://ns.flur.ee/shapegen#name";

    /// shapegen:abstract IRI
    pub const ABSTRACT: &str = "https://ns.flur.ee/shapegen#abstract";

    /// shapegen:interface IRI
    pub const INTERFACE: &str = "https://ns.flur.ee/shapegen#interface";

    /// shapegen:identifierMintingStrategy IRI
    pub const IDENTIFIER_MINTING_STRATEGY: &str =
        "https://ns.flur.ee/shapegen#identifierMintingStrategy";

    /// shapegen:identifierPrefix IRI
    pub const IDENTIFIER_PREFIX: &str = "https://ns.flur.ee/shapegen#identifierPrefix";

    // ========================================================================
    // Minting Strategies
    // ========================================================================

    /// shapegen:uuid IRI (random identifiers)
    pub const UUID: &str = "https://ns.flur.ee/shapegen#uuid";

    /// shapegen:sha256 IRI (content-hash identifiers)
    pub const SHA256: &str = "https://ns.flur.ee/shapegen#sha256";

    /// shapegen:blankNode IRI (anonymous identifiers)
    pub const BLANK_NODE: &str = "https://ns.flur.ee/shapegen#blankNode";

    // ========================================================================
    // Property Directives
    // ========================================================================

    /// shapegen:ordered IRI (property values form an RDF list)
    pub const ORDERED: &str = "https://ns.flur.ee/shapegen#ordered";

    /// shapegen:mutable IRI
    pub const MUTABLE: &str = "https://ns.flur.ee/shapegen#mutable";

    /// shapegen:visibility IRI
    pub const VISIBILITY: &str = "https://ns.flur.ee/shapegen#visibility";

    /// shapegen:Public IRI
    pub const PUBLIC: &str = "https://ns.flur.ee/shapegen#Public";

    /// shapegen:Protected IRI
    pub const PROTECTED: &str = "https://ns.flur.ee/shapegen#Protected";

    /// shapegen:Private IRI
    pub const PRIVATE: &str = "https://ns.flur.ee/shapegen#Private";
}
