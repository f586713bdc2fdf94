use crate::document::{DocumentContext, DocumentValue};
use crate::equals::StructuralEquals;
use crate::error::DecodeResult;
use crate::graph::{DecodeOptions, GraphValue};
use crate::hash::{sha256_hex, ContentHash};
use crate::identifier::Identifier;
use crate::query::QueryFragment;
use crate::schema::{RuntimeSchema, UiMetadata};
use fluree_graph_ir::{Graph, Term};
use serde_json::Value;

/// A generated shape type
///
/// Records, unions and hierarchies all implement this trait together with
/// the codec, equality, hashing, schema and query traits it requires.
pub trait Shape:
    StructuralEquals
    + ContentHash
    + GraphValue
    + DocumentValue
    + RuntimeSchema
    + UiMetadata
    + QueryFragment
{
    /// Generated type name, also the document discriminant of records
    const TYPE_NAME: &'static str;

    /// The supplied identifier, or the minted one (minting on first call)
    fn identifier(&self) -> Identifier;

    /// Decode the node `focus` of `graph`
    fn from_graph_with(graph: &Graph, focus: &Term, options: DecodeOptions) -> DecodeResult<Self>;

    fn from_graph(graph: &Graph, focus: &Term) -> DecodeResult<Self> {
        Self::from_graph_with(graph, focus, DecodeOptions::default())
    }

    /// Encode into a fresh graph
    fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        self.to_term(&mut graph);
        graph
    }

    /// Validate against the runtime schema, then decode
    fn from_document(value: &Value) -> DecodeResult<Self> {
        Self::runtime_schema().validate_document(Self::TYPE_NAME, value)?;
        Self::from_document_value(value, &DocumentContext::root(Self::TYPE_NAME))
    }

    /// Hex SHA-256 of the full content feed, identifier included
    fn content_digest(&self) -> String {
        sha256_hex(self)
    }
}
