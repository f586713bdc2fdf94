//! Decode errors returned by generated code

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Failure to decode a generated type from a graph or a document
///
/// Every variant carries the focus (identifier or document path) and the
/// offending predicate or key, so callers can report the failure without
/// re-deriving context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Document failed structural validation against the runtime schema
    #[error("Document does not match schema of {shape} at {path}: {message}")]
    SchemaMismatch {
        shape: String,
        path: String,
        message: String,
    },

    /// A required predicate or key has no value
    #[error("{focus}: missing required value for {predicate}")]
    MissingRequiredValue { focus: String, predicate: String },

    /// A value has the wrong term kind, datatype, or enumeration member
    #[error("{focus}: value of {predicate} is mistyped, expected {expected}, found {actual}")]
    MistypedValue {
        focus: String,
        predicate: String,
        expected: String,
        actual: String,
    },

    /// A non-empty set has zero values
    #[error("{focus}: {predicate} requires at least one value")]
    EmptyNonEmptySet { focus: String, predicate: String },

    /// The focus node lacks the expected rdf:type assertion
    #[error("{focus}: expected rdf:type {expected}, found [{actual}]")]
    UnrecognizedRdfType {
        focus: String,
        expected: String,
        actual: String,
    },

    /// A list value is not a well-formed first/rest/nil chain
    #[error("{focus}: malformed list for {predicate} at {node}: {message}")]
    MalformedList {
        focus: String,
        predicate: String,
        node: String,
        message: String,
    },

    /// No member of a union decoded successfully
    #[error("{focus}: no member of {union} matched [{}]", .attempts.join("; "))]
    UnmatchedUnion {
        union: String,
        focus: String,
        attempts: Vec<String>,
    },
}

impl DecodeError {
    /// Build a `MistypedValue` error
    pub fn mistyped(
        focus: impl Into<String>,
        predicate: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        DecodeError::MistypedValue {
            focus: focus.into(),
            predicate: predicate.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check whether this is a schema failure rather than a structural one
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, DecodeError::SchemaMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = DecodeError::mistyped("<http://example.org/a>", "ex:age", "integer", "\"x\"");
        assert_eq!(
            err.to_string(),
            "<http://example.org/a>: value of ex:age is mistyped, expected integer, found \"x\""
        );
        assert!(!err.is_schema_mismatch());

        let err = DecodeError::UnmatchedUnion {
            union: "Pet".into(),
            focus: "_:b0".into(),
            attempts: vec!["Dog: a".into(), "Cat: b".into()],
        };
        assert_eq!(err.to_string(), "_:b0: no member of Pet matched [Dog: a; Cat: b]");
    }
}
