//! Compiler error types
//!
//! Build errors are per shape and collected, so one run reports every
//! malformed shape. Link and parity errors abort the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenerateError>;

/// A shape whose constraints cannot be turned into a type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("{shape}: property {property} has malformed cardinality: {message}")]
    MalformedCardinality {
        shape: String,
        property: String,
        message: String,
    },

    #[error("{shape}: property {property} has conflicting value types: {message}")]
    ConflictingValueTypes {
        shape: String,
        property: String,
        message: String,
    },

    #[error("{shape}: property {property} uses unsupported datatype <{datatype}>")]
    UnresolvableDatatype {
        shape: String,
        property: String,
        datatype: String,
    },

    #[error("{shape}: property {property} has an invalid default: {message}")]
    InvalidDefault {
        shape: String,
        property: String,
        message: String,
    },

    #[error("{shape}: property {property} declares a default of a type that cannot be a constant")]
    UnsupportedDefault { shape: String, property: String },

    /// Only single-IRI `sh:path` values are supported
    #[error("{shape}: unsupported property path {path}")]
    UnsupportedPath { shape: String, path: String },

    #[error("blank node shape {shape} needs an explicit shapegen:name")]
    UnnamedShape { shape: String },

    #[error("{shape}: property name {name:?} is reserved")]
    ReservedPropertyName { shape: String, name: String },

    #[error("{shape}: more than one base shape ({bases})")]
    MultipleInheritance { shape: String, bases: String },

    #[error("{shape}: invalid identifier strategy: {message}")]
    InvalidIdentifierStrategy { shape: String, message: String },

    #[error("{shape}: a union shape cannot declare sh:property")]
    UnionWithProperties { shape: String },

    #[error("{shape}: malformed RDF list: {message}")]
    MalformedList { shape: String, message: String },

    /// A `shapegen:` or ranking directive with a value it cannot take
    #[error("{shape}: property {property} has an invalid directive: {message}")]
    InvalidDirective {
        shape: String,
        property: String,
        message: String,
    },

    #[error("{shape}: property {property} lists {member} more than once")]
    DuplicateEnumerationMember {
        shape: String,
        property: String,
        member: String,
    },
}

/// Cross-shape inconsistency found while linking
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    #[error("{referrer} references unknown shape <{target}>")]
    DanglingReference { referrer: String, target: String },

    /// Overrides may only narrow cardinality or value type
    #[error("{shape}.{property} widens the declaration inherited from {base}: {message}")]
    IllegalOverride {
        shape: String,
        property: String,
        base: String,
        message: String,
    },

    #[error("{union}: discriminant {discriminant:?} is used by more than one member")]
    DiscriminantCollision { union: String, discriminant: String },

    #[error("inheritance cycle through {shape}")]
    InheritanceCycle { shape: String },

    #[error("union {shape} contains itself")]
    UnionCycle { shape: String },

    #[error("type name {name} is generated for both {first} and {second}")]
    DuplicateTypeName {
        name: String,
        first: String,
        second: String,
    },

    #[error("{shape}: property name {name} is declared for both <{first}> and <{second}>")]
    DuplicatePropertyName {
        shape: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("{shape} extends {target}, which is not a record shape")]
    NotARecord { shape: String, target: String },

    #[error("{referrer} references abstract shape {shape}, which has no concrete subtypes")]
    AbstractWithoutSubtypes { referrer: String, shape: String },
}

/// The query fragment and graph decoder of a type disagree on predicates
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{shape}: query fragment and graph codec disagree (codec only: [{}], query only: [{}])", .codec_only.join(", "), .query_only.join(", "))]
pub struct ParityError {
    pub shape: String,
    pub codec_only: Vec<String>,
    pub query_only: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error of [`crate::Generator`]
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{} shape(s) failed to build: {}", .0.len(), .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Build(Vec<BuildError>),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Parity(#[from] ParityError),

    /// The emitted tokens did not parse back as a Rust file
    #[error("generated code does not parse: {0}")]
    Render(#[from] syn::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write generated module: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BuildError> for GenerateError {
    fn from(err: BuildError) -> Self {
        GenerateError::Build(vec![err])
    }
}
