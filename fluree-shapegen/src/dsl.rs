//! Programmatic construction of shapes graphs
//!
//! Build scripts and tests describe shapes in code rather than parsing a
//! serialized graph:
//!
//! ```
//! use fluree_shapegen::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
//! use fluree_vocab::xsd;
//!
//! let mut shapes = ShapesGraphBuilder::new();
//! shapes.shape(
//!     NodeShape::new("http://example.org/PersonShape")
//!         .target_class("http://example.org/Person")
//!         .property(PropertyShape::new("http://example.org/name").datatype(xsd::STRING).required()),
//! );
//! let graph = shapes.into_graph();
//! assert!(!graph.is_empty());
//! ```
//!
//! Blank nodes are labelled from a counter, so the same calls always yield
//! the same graph.

use crate::accessor::GraphAccessor;
use fluree_graph_ir::{Graph, Term};
use fluree_vocab::{rdf, rdfs, shacl, shapegen};

#[derive(Debug, Clone)]
enum Object {
    Term(Term),
    List(Vec<Term>),
    /// `sh:or` list of anonymous shapes, one `sh:datatype` each
    DatatypeList(Vec<String>),
}

/// A node shape under construction
#[derive(Debug, Clone)]
pub struct NodeShape {
    subject: Option<Term>,
    statements: Vec<(String, Object)>,
    properties: Vec<PropertyShape>,
}

impl NodeShape {
    pub fn new(iri: &str) -> Self {
        Self {
            subject: Some(Term::iri(iri)),
            statements: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Shape with a fresh blank node subject
    pub fn anonymous() -> Self {
        Self {
            subject: None,
            statements: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, predicate: &str, object: Term) -> Self {
        self.statements.push((predicate.to_string(), Object::Term(object)));
        self
    }

    fn with_list(mut self, predicate: &str, items: Vec<Term>) -> Self {
        self.statements.push((predicate.to_string(), Object::List(items)));
        self
    }

    /// Explicit generated type name
    pub fn name(self, name: &str) -> Self {
        self.with(shapegen::NAME, Term::string(name))
    }

    pub fn target_class(self, class: &str) -> Self {
        self.with(shacl::TARGET_CLASS, Term::iri(class))
    }

    /// Declare the shape IRI itself an `rdfs:Class`
    pub fn implicit_class(self) -> Self {
        self.with(rdf::TYPE, Term::iri(rdfs::CLASS))
    }

    pub fn sub_class_of(self, base: &str) -> Self {
        self.with(rdfs::SUB_CLASS_OF, Term::iri(base))
    }

    pub fn abstract_shape(self) -> Self {
        self.with(shapegen::ABSTRACT, Term::boolean(true))
    }

    pub fn interface(self) -> Self {
        self.with(shapegen::INTERFACE, Term::boolean(true))
    }

    pub fn deactivated(self) -> Self {
        self.with(shacl::DEACTIVATED, Term::boolean(true))
    }

    /// `shapegen:uuid`, `shapegen:sha256` or `shapegen:blankNode`
    pub fn minting(self, strategy: &str) -> Self {
        self.with(shapegen::IDENTIFIER_MINTING_STRATEGY, Term::iri(strategy))
    }

    pub fn identifier_prefix(self, prefix: &str) -> Self {
        self.with(shapegen::IDENTIFIER_PREFIX, Term::string(prefix))
    }

    /// Identifiers restricted to these IRIs
    pub fn identifier_in(self, iris: &[&str]) -> Self {
        self.with_list(shacl::IN, iris.iter().map(Term::iri).collect())
    }

    /// Identifiers must be IRIs supplied by the caller
    pub fn iri_only(self) -> Self {
        self.with(shacl::NODE_KIND, Term::iri(shacl::IRI))
    }

    pub fn xone(self, members: &[&str]) -> Self {
        self.with_list(shacl::XONE, members.iter().map(Term::iri).collect())
    }

    pub fn or(self, members: &[&str]) -> Self {
        self.with_list(shacl::OR, members.iter().map(Term::iri).collect())
    }

    pub fn label(self, label: &str) -> Self {
        self.with(shacl::NAME, Term::string(label))
    }

    pub fn description(self, text: &str) -> Self {
        self.with(shacl::DESCRIPTION, Term::string(text))
    }

    pub fn property(mut self, property: PropertyShape) -> Self {
        self.properties.push(property);
        self
    }
}

/// A property shape under construction
#[derive(Debug, Clone)]
pub struct PropertyShape {
    path: Term,
    statements: Vec<(String, Object)>,
}

impl PropertyShape {
    pub fn new(path: &str) -> Self {
        Self::with_path(Term::iri(path))
    }

    /// Property with an arbitrary path term
    pub fn with_path(path: Term) -> Self {
        Self {
            path,
            statements: Vec::new(),
        }
    }

    pub fn with(mut self, predicate: &str, object: Term) -> Self {
        self.statements.push((predicate.to_string(), Object::Term(object)));
        self
    }

    fn with_list(mut self, predicate: &str, items: Vec<Term>) -> Self {
        self.statements.push((predicate.to_string(), Object::List(items)));
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.with(shapegen::NAME, Term::string(name))
    }

    pub fn min_count(self, n: i64) -> Self {
        self.with(shacl::MIN_COUNT, Term::integer(n))
    }

    pub fn max_count(self, n: i64) -> Self {
        self.with(shacl::MAX_COUNT, Term::integer(n))
    }

    /// `sh:minCount 1` and `sh:maxCount 1`
    pub fn required(self) -> Self {
        self.min_count(1).max_count(1)
    }

    /// `sh:maxCount 1`
    pub fn optional(self) -> Self {
        self.max_count(1)
    }

    pub fn datatype(self, datatype: &str) -> Self {
        self.with(shacl::DATATYPE, Term::iri(datatype))
    }

    pub fn class(self, class: &str) -> Self {
        self.with(shacl::CLASS, Term::iri(class))
    }

    pub fn node(self, shape: &str) -> Self {
        self.with(shacl::NODE, Term::iri(shape))
    }

    pub fn node_kind(self, kind: &str) -> Self {
        self.with(shacl::NODE_KIND, Term::iri(kind))
    }

    pub fn in_values(self, values: Vec<Term>) -> Self {
        self.with_list(shacl::IN, values)
    }

    pub fn in_iris(self, iris: &[&str]) -> Self {
        self.in_values(iris.iter().map(Term::iri).collect())
    }

    pub fn has_value(self, value: Term) -> Self {
        self.with(shacl::HAS_VALUE, value)
    }

    pub fn default_value(self, value: Term) -> Self {
        self.with(shacl::DEFAULT_VALUE, value)
    }

    pub fn language_in(self, languages: &[&str]) -> Self {
        self.with_list(shacl::LANGUAGE_IN, languages.iter().map(Term::string).collect())
    }

    pub fn order(self, order: i64) -> Self {
        self.with(shacl::ORDER, Term::integer(order))
    }

    /// Encode as an RDF list
    pub fn ordered(self) -> Self {
        self.with(shapegen::ORDERED, Term::boolean(true))
    }

    pub fn mutable(self) -> Self {
        self.with(shapegen::MUTABLE, Term::boolean(true))
    }

    /// `shapegen:Public`, `shapegen:Protected` or `shapegen:Private`
    pub fn visibility(self, visibility: &str) -> Self {
        self.with(shapegen::VISIBILITY, Term::iri(visibility))
    }

    pub fn label(self, label: &str) -> Self {
        self.with(shacl::NAME, Term::string(label))
    }

    pub fn description(self, text: &str) -> Self {
        self.with(shacl::DESCRIPTION, Term::string(text))
    }

    pub fn deactivated(self) -> Self {
        self.with(shacl::DEACTIVATED, Term::boolean(true))
    }

    /// Values may have any of these datatypes, tried in order
    pub fn or_datatypes(mut self, datatypes: &[&str]) -> Self {
        self.statements.push((
            shacl::OR.to_string(),
            Object::DatatypeList(datatypes.iter().map(|d| d.to_string()).collect()),
        ));
        self
    }
}

/// Accumulates shapes into a [`Graph`]
#[derive(Debug, Default)]
pub struct ShapesGraphBuilder {
    graph: Graph,
    next_blank: usize,
}

impl ShapesGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn blank(&mut self) -> Term {
        let term = Term::blank(format!("b{}", self.next_blank));
        self.next_blank += 1;
        term
    }

    fn add(&mut self, s: Term, p: &str, o: Term) {
        self.graph.add_triple(s, Term::iri(p), o);
    }

    fn list(&mut self, items: Vec<Term>) -> Term {
        let cells: Vec<Term> = items.iter().map(|_| self.blank()).collect();
        for (i, item) in items.into_iter().enumerate() {
            let rest = cells
                .get(i + 1)
                .cloned()
                .unwrap_or_else(|| Term::iri(rdf::NIL));
            self.add(cells[i].clone(), rdf::FIRST, item);
            self.add(cells[i].clone(), rdf::REST, rest);
        }
        cells
            .into_iter()
            .next()
            .unwrap_or_else(|| Term::iri(rdf::NIL))
    }

    fn statements(&mut self, subject: &Term, statements: Vec<(String, Object)>) {
        for (predicate, object) in statements {
            let object = match object {
                Object::Term(term) => term,
                Object::List(items) => self.list(items),
                Object::DatatypeList(datatypes) => {
                    let alternatives: Vec<Term> = datatypes
                        .into_iter()
                        .map(|datatype| {
                            let node = self.blank();
                            self.add(node.clone(), shacl::DATATYPE, Term::iri(datatype));
                            node
                        })
                        .collect();
                    self.list(alternatives)
                }
            };
            self.add(subject.clone(), &predicate, object);
        }
    }

    /// Add a node shape and its property shapes; returns the shape's subject
    pub fn shape(&mut self, shape: NodeShape) -> Term {
        let subject = match shape.subject {
            Some(subject) => subject,
            None => self.blank(),
        };
        self.add(subject.clone(), rdf::TYPE, Term::iri(shacl::NODE_SHAPE));
        self.statements(&subject, shape.statements);
        for property in shape.properties {
            let node = self.blank();
            self.add(subject.clone(), shacl::PROPERTY, node.clone());
            self.add(node.clone(), shacl::PATH, property.path);
            self.statements(&node, property.statements);
        }
        subject
    }

    /// Add an arbitrary triple
    pub fn triple(&mut self, s: Term, p: &str, o: Term) -> &mut Self {
        self.add(s, p, o);
        self
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn into_accessor(self) -> GraphAccessor {
        GraphAccessor::new(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::ShapeGraph;
    use fluree_vocab::xsd;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_property_shapes_are_blank_and_ordered() {
        let mut shapes = ShapesGraphBuilder::new();
        let person = shapes.shape(
            NodeShape::new("http://example.org/PersonShape")
                .property(PropertyShape::new("http://example.org/name").required())
                .property(PropertyShape::new("http://example.org/age").datatype(xsd::INTEGER)),
        );
        let accessor = shapes.into_accessor();
        let props = accessor.constraint_values(&person, shacl::PROPERTY);
        assert_eq!(props, vec![Term::blank("b0"), Term::blank("b1")]);
        assert_eq!(
            accessor.constraint_values(&props[1], shacl::PATH),
            vec![Term::iri("http://example.org/age")]
        );
    }

    #[test]
    fn test_lists() {
        let mut shapes = ShapesGraphBuilder::new();
        let union = shapes.shape(NodeShape::new("http://example.org/U").xone(&[
            "http://example.org/A",
            "http://example.org/B",
        ]));
        let accessor = shapes.into_accessor();
        let head = accessor.constraint_values(&union, shacl::XONE).remove(0);
        assert_eq!(
            accessor.list_values(&head).unwrap(),
            vec![Term::iri("http://example.org/A"), Term::iri("http://example.org/B")]
        );
    }

    #[test]
    fn test_datatype_alternatives() {
        let mut shapes = ShapesGraphBuilder::new();
        let node = shapes.shape(
            NodeShape::new("http://example.org/S").property(
                PropertyShape::new("http://example.org/v").or_datatypes(&[xsd::STRING, xsd::INTEGER]),
            ),
        );
        let accessor = shapes.into_accessor();
        let prop = accessor.constraint_values(&node, shacl::PROPERTY).remove(0);
        let head = accessor.constraint_values(&prop, shacl::OR).remove(0);
        let alternatives = accessor.list_values(&head).unwrap();
        let datatypes: Vec<Term> = alternatives
            .iter()
            .flat_map(|a| accessor.constraint_values(a, shacl::DATATYPE))
            .collect();
        assert_eq!(datatypes, vec![Term::iri(xsd::STRING), Term::iri(xsd::INTEGER)]);
    }

    #[test]
    fn test_anonymous_shape() {
        let mut shapes = ShapesGraphBuilder::new();
        let subject = shapes.shape(NodeShape::anonymous().name("Thing"));
        assert!(subject.is_blank());
        assert_eq!(shapes.into_accessor().node_shapes(), vec![subject]);
    }
}
