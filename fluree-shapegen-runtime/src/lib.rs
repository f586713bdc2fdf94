//! Runtime support for code generated by `fluree-shapegen`
//!
//! Generated shape types implement the traits in this crate and delegate
//! all graph, document, hashing and schema mechanics to it. The generated
//! module imports the crate as `rt`:
//!
//! ```ignore
//! use ::fluree_shapegen_runtime as rt;
//! ```
//!
//! # Modules
//!
//! - `identifier` - node identifiers and lazy minting
//! - `equals` - structural equality with path-annotated inequalities
//! - `hash` - incremental content hashing
//! - `graph` - graph codec helpers (`Resource` reader, `ResourceWriter`)
//! - `document` - JSON document codec helpers
//! - `schema` - runtime validation schema and UI metadata
//! - `query` - composable query fragments and SPARQL rendering

pub mod document;
pub mod equals;
pub mod error;
pub mod graph;
pub mod hash;
pub mod identifier;
pub mod query;
pub mod schema;
mod shape;
pub mod value;

pub use document::{DocumentContext, DocumentReader, DocumentValue, DocumentWriter};
pub use equals::{EqualsResult, Inequality, StructuralEquals};
pub use error::{DecodeError, DecodeResult};
pub use graph::{DecodeOptions, GraphValue, Resource, ResourceWriter, ValueContext, ValueFilter};
pub use hash::{ContentHash, HashSink};
pub use identifier::{Identifier, LazyIdentifier};
pub use query::{
    Fragment, FragmentContext, Pattern, PatternTerm, PredicatePath, QueryCardinality,
    QueryFragment, TriplePattern, Variable,
};
pub use schema::{ObjectSchema, Presence, RuntimeSchema, Schema, UiControl, UiMetadata, UiSchema};
pub use shape::Shape;
pub use value::{DateTime, Literal};

pub use chrono::NaiveDate;
pub use fluree_graph_ir::{BlankId, Datatype, Graph, LiteralValue, Term, Triple};
pub use serde_json;
pub use serde_json::Value;
