//! Triple store shared by the shape compiler and generated codecs
//!
//! Triples are kept in a `Vec` in the order they were added. Duplicates are
//! allowed, and every lookup scans in that order, so the first object of
//! `(s, p)` is the one written first.

use crate::{Term, Triple};
use std::collections::BTreeSet;

/// Ordered bag of triples
///
/// ```
/// use fluree_graph_ir::{Graph, Term};
///
/// let mut graph = Graph::new();
/// let shape = Term::iri("http://example.org/PersonShape");
/// graph.add_triple(
///     shape.clone(),
///     Term::iri("http://www.w3.org/ns/shacl#name"),
///     Term::string("Person"),
/// );
///
/// assert!(graph.has_predicate(&shape, "http://www.w3.org/ns/shacl#name"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Objects of `(subject, predicate)`, oldest first
    pub fn objects<'a, 'b>(
        &'a self,
        subject: &'b Term,
        predicate: &'b str,
    ) -> impl Iterator<Item = &'a Term> + 'b
    where
        'a: 'b,
    {
        self.triples
            .iter()
            .filter(move |t| t.matches(subject, predicate))
            .map(|t| &t.o)
    }

    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    pub fn has_predicate(&self, subject: &Term, predicate: &str) -> bool {
        self.object(subject, predicate).is_some()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Drop every copy of `triple`; returns how many went
    pub fn remove(&mut self, triple: &Triple) -> usize {
        let before = self.triples.len();
        self.triples.retain(|t| t != triple);
        before - self.triples.len()
    }

    /// Distinct predicate IRIs
    pub fn predicates(&self) -> BTreeSet<&str> {
        self.triples.iter().filter_map(|t| t.p.as_iri()).collect()
    }

    /// One N-Triples statement per line, in insertion order
    pub fn to_ntriples(&self) -> String {
        self.triples.iter().map(|t| format!("{}\n", t)).collect()
    }
}
