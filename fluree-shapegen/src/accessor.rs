//! Read-only view over a shapes graph
//!
//! The Builder only ever asks two questions of its input: which shape nodes
//! exist, and which values a node has for a predicate. [`ShapeGraph`] captures
//! exactly that, so any store can feed the generator; [`GraphAccessor`] is
//! the in-memory implementation over a [`Graph`].

use fluree_graph_ir::{Graph, Term};
use fluree_vocab::{rdf, shacl};
use std::collections::{HashMap, HashSet};

/// Source of shape definitions
///
/// Implementations must return values in a stable order: the generated code
/// follows it for properties, union members and enumeration members.
pub trait ShapeGraph: Sync {
    /// Every node shape, in declaration order
    fn node_shapes(&self) -> Vec<Term>;

    /// The node shape named by `iri`, if the graph declares one
    fn shape_node(&self, iri: &str) -> Option<Term>;

    /// Values of `predicate` on `node`, in declaration order
    fn constraint_values(&self, node: &Term, predicate: &str) -> Vec<Term>;

    /// Members of the RDF list starting at `head`
    fn list_values(&self, head: &Term) -> Result<Vec<Term>, String> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut node = head.clone();
        while node.as_iri() != Some(rdf::NIL) {
            if node.is_literal() {
                return Err(format!("list cell {} is a literal", node));
            }
            if !seen.insert(node.clone()) {
                return Err(format!("list is cyclic at {}", node));
            }
            let mut first = self.constraint_values(&node, rdf::FIRST);
            let mut rest = self.constraint_values(&node, rdf::REST);
            if first.len() != 1 || rest.len() != 1 {
                return Err(format!(
                    "list cell {} needs exactly one rdf:first and one rdf:rest",
                    node
                ));
            }
            items.append(&mut first);
            node = rest.remove(0);
        }
        Ok(items)
    }
}

/// [`ShapeGraph`] over an in-memory graph, indexed by subject
#[derive(Debug, Clone)]
pub struct GraphAccessor {
    graph: Graph,
    by_subject: HashMap<Term, Vec<usize>>,
    shapes: Vec<Term>,
}

impl GraphAccessor {
    pub fn new(graph: Graph) -> Self {
        let mut by_subject: HashMap<Term, Vec<usize>> = HashMap::new();
        let mut shapes = Vec::new();
        for (index, triple) in graph.iter().enumerate() {
            by_subject.entry(triple.s.clone()).or_default().push(index);
            if triple.p.as_iri() == Some(rdf::TYPE)
                && triple.o.as_iri() == Some(shacl::NODE_SHAPE)
                && !shapes.contains(&triple.s)
            {
                shapes.push(triple.s.clone());
            }
        }
        Self {
            graph,
            by_subject,
            shapes,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl From<Graph> for GraphAccessor {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

impl ShapeGraph for GraphAccessor {
    fn node_shapes(&self) -> Vec<Term> {
        self.shapes.clone()
    }

    fn shape_node(&self, iri: &str) -> Option<Term> {
        self.shapes
            .iter()
            .find(|shape| shape.as_iri() == Some(iri))
            .cloned()
    }

    fn constraint_values(&self, node: &Term, predicate: &str) -> Vec<Term> {
        let Some(indexes) = self.by_subject.get(node) else {
            return Vec::new();
        };
        let triples = self.graph.triples();
        indexes
            .iter()
            .map(|&i| &triples[i])
            .filter(|t| t.p.as_iri() == Some(predicate))
            .map(|t| t.o.clone())
            .collect()
    }
}
