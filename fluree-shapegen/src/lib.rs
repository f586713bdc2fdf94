//! # Fluree Shapegen
//!
//! Compiles a SHACL shapes graph into a Rust module of typed data models.
//! Every generated type gets a constructor, structural equality, a content
//! hash, graph and document codecs, a runtime validation schema and a query
//! fragment, all implemented against `fluree-shapegen-runtime`.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`ShapeGraph`] exposes the shape nodes and their constraint values
//! 2. the builder resolves each node shape into a [`ShapeType`] (in
//!    parallel when configured)
//! 3. [`link`] resolves references, flattens inheritance and unions, and
//!    orders declarations
//! 4. the emitters turn each linked shape into token streams
//! 5. the assembler parses the tokens back and pretty-prints the module
//!
//! ## Example
//!
//! ```ignore
//! use fluree_shapegen::{Generator, ShapegenConfig, GraphAccessor};
//!
//! let accessor = GraphAccessor::new(shapes_graph);
//! let module = Generator::new(ShapegenConfig::default()).generate(&accessor)?;
//! module.write_to(out_dir.join("shapes.rs"))?;
//! ```

pub mod accessor;
pub mod assemble;
pub mod builder;
pub mod config;
pub mod dsl;
pub mod emit;
pub mod error;
pub mod generator;
pub mod link;
pub mod model;
pub mod parity;

pub use accessor::{GraphAccessor, ShapeGraph};
pub use builder::build_shapes;
pub use config::{IdentifierOverride, OverrideStrategy, ShapegenConfig};
pub use dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
pub use error::{BuildError, ConfigError, GenerateError, LinkError, ParityError, Result};
pub use generator::{GeneratedModule, Generator};
pub use link::{link, LinkedModel};
pub use model::{Cardinality, IdentifierStrategy, PropertyType, ShapeKind, ShapeType};
