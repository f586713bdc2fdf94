//! RDF graph model shared by the shape compiler and generated code
//!
//! The compiler reads shapes graphs through it; generated types encode to
//! and decode from it. IRIs are stored expanded and every literal carries a
//! datatype. A [`Graph`] keeps triples in insertion order, so "the first
//! value" of a property is deterministic.
//!
//! ```
//! use fluree_graph_ir::{Graph, Term};
//!
//! let mut graph = Graph::new();
//! let alice = Term::iri("http://example.org/alice");
//! graph.add_triple(
//!     alice.clone(),
//!     Term::iri("http://example.org/name"),
//!     Term::string("Alice"),
//! );
//!
//! let names: Vec<_> = graph.objects(&alice, "http://example.org/name").collect();
//! assert_eq!(names, vec![&Term::string("Alice")]);
//! ```

mod datatype;
mod graph;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;
