//! Graph codec helpers
//!
//! Generated `from_graph` bodies read through a [`Resource`]: one call per
//! property, each selecting candidate objects by predicate and filtering them
//! before decoding. Generated `to_graph` bodies write through a
//! [`ResourceWriter`]. Lists use the RDF `first`/`rest`/`nil` encoding.

use crate::error::{DecodeError, DecodeResult};
use crate::identifier::Identifier;
use crate::value::{lang_matches, DateTime, Literal};
use chrono::NaiveDate;
use fluree_graph_ir::{BlankId, Datatype, Graph, LiteralValue, Term, Triple};
use fluree_vocab::{rdf, xsd};
use std::collections::HashSet;

/// Options threaded through every nested graph decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Do not verify rdf:type assertions on decoded nodes
    pub skip_type_check: bool,
}

impl DecodeOptions {
    pub fn skip_type_check() -> Self {
        Self {
            skip_type_check: true,
        }
    }
}

/// Where a value is being decoded from
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    pub focus: &'a Term,
    pub predicate: &'a str,
    pub options: DecodeOptions,
}

impl ValueContext<'_> {
    pub fn mistyped(&self, expected: &str, actual: &Term) -> DecodeError {
        DecodeError::mistyped(
            self.focus.to_string(),
            self.predicate,
            expected,
            actual.to_string(),
        )
    }
}

/// Conversion between a value and a graph term
pub trait GraphValue: Sized {
    fn from_term(graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self>;

    /// Write any supporting triples into `graph` and return the term for this value
    fn to_term(&self, graph: &mut Graph) -> Term;
}

/// Candidate selection applied before decoding
#[derive(Debug, Clone, Default)]
pub struct ValueFilter {
    languages: &'static [&'static str],
    has_value: Option<Term>,
}

impl ValueFilter {
    /// Accept every candidate
    pub fn any() -> Self {
        Self::default()
    }

    /// Accept only literals whose language tag matches one of the ranges
    ///
    /// An empty list accepts any candidate.
    pub fn languages(mut self, languages: &'static [&'static str]) -> Self {
        self.languages = languages;
        self
    }

    /// Accept only the given sentinel term
    pub fn has_value(mut self, term: Term) -> Self {
        self.has_value = Some(term);
        self
    }

    pub fn accepts(&self, term: &Term) -> bool {
        if let Some(expected) = &self.has_value {
            if expected != term {
                return false;
            }
        }
        if self.languages.is_empty() {
            return true;
        }
        match term.as_literal() {
            Some((_, _, Some(tag))) => self.languages.iter().any(|range| lang_matches(tag, range)),
            _ => false,
        }
    }
}

/// Read access to one focus node during decoding
pub struct Resource<'a> {
    graph: &'a Graph,
    focus: &'a Term,
    identifier: Identifier,
    options: DecodeOptions,
}

impl<'a> Resource<'a> {
    /// Start decoding `focus`; literals cannot be decoded as shapes
    pub fn new(
        graph: &'a Graph,
        focus: &'a Term,
        shape: &str,
        options: DecodeOptions,
    ) -> DecodeResult<Self> {
        let identifier = Identifier::from_term(focus).ok_or_else(|| {
            DecodeError::mistyped(focus.to_string(), "@id", shape, focus.kind_name())
        })?;
        Ok(Self {
            graph,
            focus,
            identifier,
            options,
        })
    }

    pub fn identifier(&self) -> Identifier {
        self.identifier.clone()
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Verify that the focus asserts at least one of `expected` as its rdf:type
    ///
    /// Passes when `expected` is empty or the type check is suppressed.
    pub fn check_types(&self, expected: &[&str]) -> DecodeResult<()> {
        if self.options.skip_type_check || expected.is_empty() {
            return Ok(());
        }
        let actual: Vec<&str> = self
            .graph
            .objects(self.focus, rdf::TYPE)
            .filter_map(Term::as_iri)
            .collect();
        if expected.iter().any(|t| actual.contains(t)) {
            Ok(())
        } else {
            Err(DecodeError::UnrecognizedRdfType {
                focus: self.focus.to_string(),
                expected: expected.join(" | "),
                actual: actual.join(", "),
            })
        }
    }

    fn context<'p>(&'p self, predicate: &'p str) -> ValueContext<'p> {
        ValueContext {
            focus: self.focus,
            predicate,
            options: self.options,
        }
    }

    fn candidates<'p>(
        &'p self,
        predicate: &'p str,
        filter: &'p ValueFilter,
    ) -> impl Iterator<Item = &'a Term> + 'p {
        self.graph
            .objects(self.focus, predicate)
            .filter(move |term| filter.accepts(term))
    }

    /// Exactly one value is expected; the first accepted candidate is decoded
    pub fn required<T: GraphValue>(&self, predicate: &str, filter: &ValueFilter) -> DecodeResult<T> {
        self.optional(predicate, filter)?
            .ok_or_else(|| DecodeError::MissingRequiredValue {
                focus: self.focus.to_string(),
                predicate: predicate.to_string(),
            })
    }

    pub fn optional<T: GraphValue>(
        &self,
        predicate: &str,
        filter: &ValueFilter,
    ) -> DecodeResult<Option<T>> {
        let cx = self.context(predicate);
        match self.candidates(predicate, filter).next() {
            Some(term) => T::from_term(self.graph, term, &cx).map(Some),
            None => Ok(None),
        }
    }

    /// Every accepted candidate, in graph order; none yields an empty set
    pub fn set<T: GraphValue>(&self, predicate: &str, filter: &ValueFilter) -> DecodeResult<Vec<T>> {
        let cx = self.context(predicate);
        self.candidates(predicate, filter)
            .map(|term| T::from_term(self.graph, term, &cx))
            .collect()
    }

    /// Like [`Resource::set`], but zero accepted candidates is an error
    pub fn non_empty_set<T: GraphValue>(
        &self,
        predicate: &str,
        filter: &ValueFilter,
    ) -> DecodeResult<Vec<T>> {
        let values = self.set(predicate, filter)?;
        if values.is_empty() {
            return Err(DecodeError::EmptyNonEmptySet {
                focus: self.focus.to_string(),
                predicate: predicate.to_string(),
            });
        }
        Ok(values)
    }

    /// Decode an RDF list; an absent predicate or `rdf:nil` is the empty list
    ///
    /// Every cell must have exactly one `rdf:first` and one `rdf:rest`, and the
    /// chain must end in `rdf:nil` without revisiting a cell. Elements the
    /// filter rejects are skipped, as in [`Resource::set`]; the chain is still
    /// walked to the end.
    pub fn list<T: GraphValue>(&self, predicate: &str, filter: &ValueFilter) -> DecodeResult<Vec<T>> {
        let cx = self.context(predicate);
        let Some(head) = self.graph.object(self.focus, predicate) else {
            return Ok(Vec::new());
        };

        let malformed = |node: &Term, message: &str| DecodeError::MalformedList {
            focus: self.focus.to_string(),
            predicate: predicate.to_string(),
            node: node.to_string(),
            message: message.to_string(),
        };

        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut node = head;
        while node.as_iri() != Some(rdf::NIL) {
            if !node.is_resource() {
                return Err(malformed(node, "list cell is a literal"));
            }
            if !visited.insert(node) {
                return Err(malformed(node, "list is cyclic"));
            }
            let first = self.single(node, rdf::FIRST).map_err(|m| malformed(node, m))?;
            let rest = self.single(node, rdf::REST).map_err(|m| malformed(node, m))?;
            if filter.accepts(first) {
                items.push(T::from_term(self.graph, first, &cx)?);
            }
            node = rest;
        }
        Ok(items)
    }

    fn single(&self, node: &'a Term, predicate: &'a str) -> Result<&'a Term, &'static str> {
        let mut values = self.graph.objects(node, predicate);
        let value = values.next().ok_or(if predicate == rdf::FIRST {
            "missing rdf:first"
        } else {
            "missing rdf:rest"
        })?;
        if values.next().is_some() {
            return Err("list cell has more than one first or rest");
        }
        Ok(value)
    }
}

/// Report that no union member decoded the focus
pub fn unmatched_union(union: &str, focus: &Term, attempts: Vec<(&str, DecodeError)>) -> DecodeError {
    DecodeError::UnmatchedUnion {
        union: union.to_string(),
        focus: focus.to_string(),
        attempts: attempts
            .into_iter()
            .map(|(member, err)| format!("{}: {}", member, err))
            .collect(),
    }
}

/// Write access to one subject during encoding
///
/// Identical triples are written once, so shared nested values do not
/// duplicate their statements.
pub struct ResourceWriter<'g> {
    graph: &'g mut Graph,
    subject: Term,
}

impl<'g> ResourceWriter<'g> {
    pub fn new(graph: &'g mut Graph, subject: Term) -> Self {
        Self { graph, subject }
    }

    fn add(&mut self, predicate: &str, object: Term) {
        let triple = Triple::new(self.subject.clone(), Term::iri(predicate), object);
        if !self.graph.contains(&triple) {
            self.graph.add(triple);
        }
    }

    /// Assert rdf:type for each IRI
    pub fn types(&mut self, types: &[&str]) {
        for ty in types {
            self.add(rdf::TYPE, Term::iri(ty));
        }
    }

    pub fn value<T: GraphValue>(&mut self, predicate: &str, value: &T) {
        let object = value.to_term(self.graph);
        self.add(predicate, object);
    }

    pub fn optional<T: GraphValue>(&mut self, predicate: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.value(predicate, value);
        }
    }

    pub fn values<T: GraphValue>(&mut self, predicate: &str, values: &[T]) {
        for value in values {
            self.value(predicate, value);
        }
    }

    /// Write a first/rest/nil chain of fresh blank cells; an empty list writes nothing
    pub fn list<T: GraphValue>(&mut self, predicate: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let cells: Vec<Term> = values
            .iter()
            .map(|_| Term::BlankNode(BlankId::new(format!("l{}", uuid::Uuid::new_v4().simple()))))
            .collect();
        self.add(predicate, cells[0].clone());
        for (index, value) in values.iter().enumerate() {
            let item = value.to_term(self.graph);
            let rest = cells
                .get(index + 1)
                .cloned()
                .unwrap_or_else(|| Term::iri(rdf::NIL));
            let cell = &cells[index];
            self.graph
                .add_triple(cell.clone(), Term::iri(rdf::FIRST), item);
            self.graph.add_triple(cell.clone(), Term::iri(rdf::REST), rest);
        }
    }

    pub fn finish(self) -> Term {
        self.subject
    }
}

fn parse_lexical<T: std::str::FromStr>(value: &LiteralValue) -> Option<T> {
    value.as_str().and_then(|s| s.trim().parse().ok())
}

impl GraphValue for String {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        match term.as_literal() {
            Some((LiteralValue::String(s), dt, None)) if xsd::is_string_like(dt.as_iri()) => {
                Ok(s.to_string())
            }
            _ => Err(cx.mistyped("string", term)),
        }
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::string(self)
    }
}

impl GraphValue for bool {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        let parsed = match term.as_literal() {
            Some((LiteralValue::Boolean(b), _, _)) => Some(*b),
            Some((value, dt, _)) if dt.as_iri() == xsd::BOOLEAN => {
                match value.as_str().map(str::trim) {
                    Some("true") | Some("1") => Some(true),
                    Some("false") | Some("0") => Some(false),
                    _ => None,
                }
            }
            _ => None,
        };
        parsed.ok_or_else(|| cx.mistyped("boolean", term))
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::boolean(*self)
    }
}

impl GraphValue for i64 {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        let parsed = match term.as_literal() {
            Some((LiteralValue::Integer(i), _, _)) => Some(*i),
            Some((value, dt, _)) if dt.is_integer() => parse_lexical(value),
            _ => None,
        };
        parsed.ok_or_else(|| cx.mistyped("integer", term))
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::integer(*self)
    }
}

impl GraphValue for f64 {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        let parsed = match term.as_literal() {
            Some((LiteralValue::Double(d), _, _)) => Some(*d),
            Some((LiteralValue::Integer(i), _, _)) => Some(*i as f64),
            Some((value, dt, _)) if dt.is_numeric() => parse_lexical(value),
            _ => None,
        };
        parsed.ok_or_else(|| cx.mistyped("number", term))
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::double(*self)
    }
}

impl GraphValue for NaiveDate {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        match term.as_literal() {
            Some((value, dt, None)) if dt.as_iri() == xsd::DATE => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .ok_or_else(|| cx.mistyped("date", term)),
            _ => Err(cx.mistyped("date", term)),
        }
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::typed(self.format("%Y-%m-%d").to_string(), Datatype::xsd_date())
    }
}

impl GraphValue for DateTime {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        match term.as_literal() {
            Some((value, dt, None)) if xsd::is_date_time(dt.as_iri()) => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .ok_or_else(|| cx.mistyped("date-time", term)),
            _ => Err(cx.mistyped("date-time", term)),
        }
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Term::typed(self.to_rfc3339(), Datatype::xsd_date_time())
    }
}

impl GraphValue for Literal {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        Literal::from_term(term).ok_or_else(|| cx.mistyped("literal", term))
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Literal::to_term(self)
    }
}

impl GraphValue for Identifier {
    fn from_term(_graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        Identifier::from_term(term).ok_or_else(|| cx.mistyped("IRI or blank node", term))
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        Identifier::to_term(self)
    }
}

impl GraphValue for Term {
    fn from_term(_graph: &Graph, term: &Term, _cx: &ValueContext<'_>) -> DecodeResult<Self> {
        Ok(term.clone())
    }

    fn to_term(&self, _graph: &mut Graph) -> Term {
        self.clone()
    }
}

impl<T: GraphValue> GraphValue for Box<T> {
    fn from_term(graph: &Graph, term: &Term, cx: &ValueContext<'_>) -> DecodeResult<Self> {
        T::from_term(graph, term, cx).map(Box::new)
    }

    fn to_term(&self, graph: &mut Graph) -> Term {
        (**self).to_term(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EX: &str = "http://example.org/";
    const LABEL: &str = "http://example.org/label";
    const STEPS: &str = "http://example.org/steps";

    fn focus() -> Term {
        Term::iri(format!("{}a", EX))
    }

    #[test]
    fn test_required_and_missing() {
        let mut graph = Graph::new();
        graph.add_triple(focus(), Term::iri(LABEL), Term::string("x"));
        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();

        let label: String = resource.required(LABEL, &ValueFilter::any()).unwrap();
        assert_eq!(label, "x");

        let missing = resource.required::<String>(STEPS, &ValueFilter::any()).unwrap_err();
        assert!(matches!(missing, DecodeError::MissingRequiredValue { .. }));

        let absent: Option<i64> = resource.optional(STEPS, &ValueFilter::any()).unwrap();
        assert_eq!(absent, None);
        let none: Vec<i64> = resource.set(STEPS, &ValueFilter::any()).unwrap();
        assert!(none.is_empty());
        let err = resource.non_empty_set::<i64>(STEPS, &ValueFilter::any()).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyNonEmptySet { .. }));
    }

    #[test]
    fn test_mistyped_value_reports_context() {
        let mut graph = Graph::new();
        graph.add_triple(focus(), Term::iri(LABEL), Term::string("x"));
        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let err = resource.required::<i64>(LABEL, &ValueFilter::any()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MistypedValue {
                focus: "<http://example.org/a>".to_string(),
                predicate: LABEL.to_string(),
                expected: "integer".to_string(),
                actual: "\"x\"".to_string(),
            }
        );
    }

    #[test]
    fn test_language_filter_skips_non_matching() {
        let mut graph = Graph::new();
        graph.add_triple(focus(), Term::iri(LABEL), Term::lang_string("chat", "fr"));
        graph.add_triple(focus(), Term::iri(LABEL), Term::lang_string("cat", "en-GB"));
        graph.add_triple(focus(), Term::iri(LABEL), Term::string("untagged"));
        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();

        let english: Vec<Literal> = resource
            .set(LABEL, &ValueFilter::any().languages(&["en"]))
            .unwrap();
        assert_eq!(english, vec![Literal::tagged("cat", "en-GB")]);

        let all: Vec<Literal> = resource.set(LABEL, &ValueFilter::any()).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_has_value_searches_for_sentinel() {
        let mut graph = Graph::new();
        graph.add_triple(focus(), Term::iri(LABEL), Term::string("other"));
        graph.add_triple(focus(), Term::iri(LABEL), Term::string("fixed"));
        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let filter = ValueFilter::any().has_value(Term::string("fixed"));
        let value: String = resource.required(LABEL, &filter).unwrap();
        assert_eq!(value, "fixed");
    }

    #[test]
    fn test_check_types() {
        let mut graph = Graph::new();
        graph.add_triple(focus(), Term::iri(rdf::TYPE), Term::iri(format!("{}Dog", EX)));
        let f = focus();
        let dog = format!("{}Dog", EX);
        let cat = format!("{}Cat", EX);

        let resource = Resource::new(&graph, &f, "Dog", DecodeOptions::default()).unwrap();
        assert_eq!(resource.check_types(&[dog.as_str()]), Ok(()));
        let err = resource.check_types(&[cat.as_str()]).unwrap_err();
        assert!(matches!(err, DecodeError::UnrecognizedRdfType { .. }));

        let skipping = Resource::new(&graph, &f, "Cat", DecodeOptions::skip_type_check()).unwrap();
        assert_eq!(skipping.check_types(&[cat.as_str()]), Ok(()));
    }

    #[test]
    fn test_literal_focus_is_rejected() {
        let graph = Graph::new();
        let literal = Term::string("x");
        assert!(Resource::new(&graph, &literal, "Thing", DecodeOptions::default()).is_err());
    }

    #[test]
    fn test_list_roundtrip_preserves_order() {
        let mut graph = Graph::new();
        let mut writer = ResourceWriter::new(&mut graph, focus());
        writer.list(STEPS, &["c".to_string(), "a".to_string(), "b".to_string()]);
        writer.finish();

        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let steps: Vec<String> = resource.list(STEPS, &ValueFilter::any()).unwrap();
        assert_eq!(steps, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_list_filter_skips_elements_but_keeps_order() {
        let mut graph = Graph::new();
        let mut writer = ResourceWriter::new(&mut graph, focus());
        writer.list(
            LABEL,
            &[
                Literal::tagged("one", "en"),
                Literal::tagged("un", "fr"),
                Literal::tagged("two", "en-US"),
            ],
        );
        writer.finish();

        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let english: Vec<Literal> = resource
            .list(LABEL, &ValueFilter::any().languages(&["en"]))
            .unwrap();
        assert_eq!(
            english,
            vec![Literal::tagged("one", "en"), Literal::tagged("two", "en-US")]
        );
        let all: Vec<Literal> = resource.list(LABEL, &ValueFilter::any()).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_broken_list_fails() {
        let mut graph = Graph::new();
        let mut writer = ResourceWriter::new(&mut graph, focus());
        writer.list(STEPS, &[1_i64, 2, 3]);
        writer.finish();

        let rest = graph
            .iter()
            .find(|t| t.p.as_iri() == Some(rdf::REST) && t.o.as_iri() != Some(rdf::NIL))
            .cloned()
            .unwrap();
        graph.remove(&rest);

        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let err = resource.list::<i64>(STEPS, &ValueFilter::any()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedList { .. }));
    }

    #[test]
    fn test_cyclic_list_fails() {
        let mut graph = Graph::new();
        let cell = Term::blank("c0");
        graph.add_triple(focus(), Term::iri(STEPS), cell.clone());
        graph.add_triple(cell.clone(), Term::iri(rdf::FIRST), Term::integer(1));
        graph.add_triple(cell.clone(), Term::iri(rdf::REST), cell.clone());

        let f = focus();
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        let err = resource.list::<i64>(STEPS, &ValueFilter::any()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedList { ref message, .. } if message == "list is cyclic"));
    }

    #[test]
    fn test_empty_and_nil_lists() {
        let mut graph = Graph::new();
        let f = focus();
        {
            let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
            assert!(resource.list::<i64>(STEPS, &ValueFilter::any()).unwrap().is_empty());
        }
        graph.add_triple(focus(), Term::iri(STEPS), Term::iri(rdf::NIL));
        let resource = Resource::new(&graph, &f, "Thing", DecodeOptions::default()).unwrap();
        assert!(resource.list::<i64>(STEPS, &ValueFilter::any()).unwrap().is_empty());
    }

    #[test]
    fn test_writer_dedupes_identical_triples() {
        let mut graph = Graph::new();
        let mut writer = ResourceWriter::new(&mut graph, focus());
        writer.types(&["http://example.org/Thing"]);
        writer.types(&["http://example.org/Thing"]);
        writer.value(LABEL, &"x".to_string());
        writer.finish();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_primitive_terms_roundtrip() {
        let mut graph = Graph::new();
        let f = focus();
        let cx = ValueContext {
            focus: &f,
            predicate: LABEL,
            options: DecodeOptions::default(),
        };

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let term = date.to_term(&mut graph);
        assert_eq!(NaiveDate::from_term(&graph, &term, &cx).unwrap(), date);

        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap();
        let term = at.to_term(&mut graph);
        assert_eq!(DateTime::from_term(&graph, &term, &cx).unwrap(), at);

        let typed_int = Term::typed("42", Datatype::from_iri(xsd::INT));
        assert_eq!(i64::from_term(&graph, &typed_int, &cx).unwrap(), 42);
        assert_eq!(f64::from_term(&graph, &Term::integer(2), &cx).unwrap(), 2.0);
        assert!(bool::from_term(&graph, &Term::string("true"), &cx).is_err());
    }
}
