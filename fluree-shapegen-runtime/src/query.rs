//! Composable retrieval fragments
//!
//! A [`Fragment`] is the graph-pattern counterpart of a type's graph codec:
//! it matches the triples `from_graph` reads, with optional groups where the
//! codec tolerates absence. Fragments compose: a nested shape contributes its
//! own fragment at a derived variable prefix.
//!
//! Variables are named by property path: `?s_pets_name` is `name` of the
//! values of `pets`. Generated property names are alphanumeric, so `_` only
//! ever separates path segments, and list helpers take a `__` suffix that no
//! path can produce.
//!
//! Expansion stops only where a shape would repeat: a nested shape is spliced
//! in while fewer than [`FragmentContext::depth`] values of the same type
//! enclose it. Acyclic nesting therefore always expands completely.

use fluree_vocab::rdf;
use std::any::TypeId;
use std::collections::BTreeSet;
use std::fmt;

/// A query variable, rendered `?name`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

/// Letters and digits SPARQL accepts in a variable name
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || (c >= '\u{C0}' && c.is_alphanumeric() && !('\u{2190}'..='\u{2BFF}').contains(&c))
}

impl Variable {
    /// Characters a variable name cannot hold become `_`
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name
            .as_ref()
            .chars()
            .map(|c| if is_name_char(c) { c } else { '_' })
            .collect();
        Self(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Subject or object position of a pattern
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Var(Variable),
    Iri(String),
}

impl From<Variable> for PatternTerm {
    fn from(v: Variable) -> Self {
        PatternTerm::Var(v)
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Var(v) => write!(f, "{}", v),
            PatternTerm::Iri(iri) => write!(f, "<{}>", iri),
        }
    }
}

/// Predicate position: a plain IRI or a zero-or-more path over it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredicatePath {
    Iri(String),
    ZeroOrMore(String),
}

impl PredicatePath {
    pub fn iri(&self) -> &str {
        match self {
            PredicatePath::Iri(iri) | PredicatePath::ZeroOrMore(iri) => iri,
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, PredicatePath::ZeroOrMore(_))
    }
}

impl fmt::Display for PredicatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicatePath::Iri(iri) => write!(f, "<{}>", iri),
            PredicatePath::ZeroOrMore(iri) => write!(f, "<{}>*", iri),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub s: PatternTerm,
    pub p: PredicatePath,
    pub o: PatternTerm,
}

impl TriplePattern {
    pub fn new(s: impl Into<PatternTerm>, p: PredicatePath, o: impl Into<PatternTerm>) -> Self {
        Self {
            s: s.into(),
            p,
            o: o.into(),
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Triple(TriplePattern),
    /// Matches if present; bindings stay unbound otherwise
    Optional(Vec<Pattern>),
    /// One group per alternative
    Union(Vec<Vec<Pattern>>),
}

/// How a property participates in the enclosing group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryCardinality {
    Required,
    Optional,
    Set,
    NonEmptySet,
    List,
}

impl QueryCardinality {
    /// Everything but `Required` is matched present-if-exists
    pub fn is_optional(self) -> bool {
        !matches!(self, QueryCardinality::Required)
    }
}

/// Subject, variable prefix and enclosing shape types for a fragment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentContext {
    subject: PatternTerm,
    prefix: String,
    depth: usize,
    /// Types of the nested values enclosing this one, outermost first
    enclosing: Vec<TypeId>,
}

impl Default for FragmentContext {
    fn default() -> Self {
        Self::root()
    }
}

impl FragmentContext {
    pub const DEFAULT_DEPTH: usize = 3;

    /// Context rooted at `?s`
    pub fn root() -> Self {
        Self::with_prefix("s")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        let subject = Variable::new(prefix);
        Self {
            prefix: subject.name().to_string(),
            subject: PatternTerm::Var(subject),
            depth: Self::DEFAULT_DEPTH,
            enclosing: Vec::new(),
        }
    }

    /// Context bound to a concrete subject IRI
    pub fn for_iri(iri: impl Into<String>) -> Self {
        Self {
            subject: PatternTerm::Iri(iri.into()),
            ..Self::root()
        }
    }

    /// How many times one shape type may enclose itself before expansion stops
    ///
    /// Zero splices in no nested shape at all.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn subject(&self) -> &PatternTerm {
        &self.subject
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `?{prefix}_{name}`
    pub fn variable(&self, name: &str) -> Variable {
        Variable::new(format!("{}_{}", self.prefix, name))
    }

    /// `?{prefix}_{name}__{role}`, for list structure rather than values
    fn helper(&self, name: &str, role: &str) -> Variable {
        Variable::new(format!("{}_{}__{}", self.prefix, name, role))
    }

    /// Context for a `T` value of property `name`, or `None` once `T`
    /// already encloses it `depth` times
    pub fn nested<T: 'static>(&self, name: &str) -> Option<Self> {
        self.enter::<T>(self.variable(name))
    }

    fn enter<T: 'static>(&self, subject: Variable) -> Option<Self> {
        let ty = TypeId::of::<T>();
        if self.enclosing.iter().filter(|t| **t == ty).count() >= self.depth {
            return None;
        }
        let mut enclosing = self.enclosing.clone();
        enclosing.push(ty);
        Some(Self {
            prefix: subject.name().to_string(),
            subject: PatternTerm::Var(subject),
            depth: self.depth,
            enclosing,
        })
    }
}

/// Where-clause patterns plus the construct template they bind
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    patterns: Vec<Pattern>,
    template: Vec<TriplePattern>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn push_group(&mut self, cardinality: QueryCardinality, group: Vec<Pattern>) {
        if cardinality.is_optional() {
            self.patterns.push(Pattern::Optional(group));
        } else {
            self.patterns.extend(group);
        }
    }

    fn edge(cx: &FragmentContext, predicate: &str, object: &Variable) -> TriplePattern {
        TriplePattern::new(
            cx.subject().clone(),
            PredicatePath::Iri(predicate.to_string()),
            object.clone(),
        )
    }

    /// `rdf:type` assertion; nothing when `types` is empty
    pub fn types(mut self, cx: &FragmentContext, types: &[&str]) -> Self {
        if types.is_empty() {
            return self;
        }
        let edge = Self::edge(cx, rdf::TYPE, &cx.variable("type"));
        self.template.push(edge.clone());
        self.patterns.push(Pattern::Triple(edge));
        self
    }

    /// Property with a primitive value
    pub fn property(
        mut self,
        cx: &FragmentContext,
        name: &str,
        predicate: &str,
        cardinality: QueryCardinality,
    ) -> Self {
        let edge = Self::edge(cx, predicate, &cx.variable(name));
        self.template.push(edge.clone());
        self.push_group(cardinality, vec![Pattern::Triple(edge)]);
        self
    }

    /// Property whose value is another shape, expanded with that shape's fragment
    pub fn nested_property<T: QueryFragment + 'static>(
        mut self,
        cx: &FragmentContext,
        name: &str,
        predicate: &str,
        cardinality: QueryCardinality,
    ) -> Self {
        let edge = Self::edge(cx, predicate, &cx.variable(name));
        let mut group = vec![Pattern::Triple(edge.clone())];
        self.template.push(edge);
        if let Some(nested) = cx.nested::<T>(name) {
            let inner = T::query_fragment(&nested);
            group.extend(inner.patterns);
            self.template.extend(inner.template);
        }
        self.push_group(cardinality, group);
        self
    }

    fn list_group(cx: &FragmentContext, name: &str, predicate: &str) -> (Vec<TriplePattern>, Variable) {
        let head = cx.helper(name, "list");
        let cell = cx.helper(name, "cell");
        let item = cx.variable(name);
        let next = cx.helper(name, "next");
        let triples = vec![
            Self::edge(cx, predicate, &head),
            TriplePattern::new(head, PredicatePath::ZeroOrMore(rdf::REST.to_string()), cell.clone()),
            TriplePattern::new(cell.clone(), PredicatePath::Iri(rdf::FIRST.to_string()), item.clone()),
            TriplePattern::new(cell, PredicatePath::Iri(rdf::REST.to_string()), next),
        ];
        (triples, item)
    }

    fn push_list(&mut self, triples: Vec<TriplePattern>, inner: Option<Fragment>) {
        self.template
            .extend(triples.iter().filter(|t| !t.p.is_path()).cloned());
        let mut group: Vec<Pattern> = triples.into_iter().map(Pattern::Triple).collect();
        if let Some(inner) = inner {
            group.extend(inner.patterns);
            self.template.extend(inner.template);
        }
        self.patterns.push(Pattern::Optional(group));
    }

    /// Ordered property of primitives: head edge, `rdf:rest*` walk, then
    /// `rdf:first`/`rdf:rest` of each cell (the last `rest` binds `rdf:nil`)
    pub fn list_property(mut self, cx: &FragmentContext, name: &str, predicate: &str) -> Self {
        let (triples, _) = Self::list_group(cx, name, predicate);
        self.push_list(triples, None);
        self
    }

    /// Ordered property of shapes; each element is expanded at the item variable
    pub fn nested_list_property<T: QueryFragment + 'static>(
        mut self,
        cx: &FragmentContext,
        name: &str,
        predicate: &str,
    ) -> Self {
        let (triples, item) = Self::list_group(cx, name, predicate);
        let inner = cx.enter::<T>(item).map(|nested| T::query_fragment(&nested));
        self.push_list(triples, inner);
        self
    }

    /// Alternative branches, one per member fragment
    pub fn union(branches: Vec<Fragment>) -> Self {
        let mut fragment = Fragment::new();
        let mut groups = Vec::with_capacity(branches.len());
        for branch in branches {
            for t in branch.template {
                if !fragment.template.contains(&t) {
                    fragment.template.push(t);
                }
            }
            groups.push(branch.patterns);
        }
        fragment.patterns.push(Pattern::Union(groups));
        fragment
    }

    /// Every predicate IRI mentioned anywhere in the fragment
    pub fn predicates(&self) -> BTreeSet<String> {
        fn walk(patterns: &[Pattern], out: &mut BTreeSet<String>) {
            for pattern in patterns {
                match pattern {
                    Pattern::Triple(t) => {
                        out.insert(t.p.iri().to_string());
                    }
                    Pattern::Optional(group) => walk(group, out),
                    Pattern::Union(groups) => groups.iter().for_each(|g| walk(g, out)),
                }
            }
        }
        let mut out = BTreeSet::new();
        walk(&self.patterns, &mut out);
        out
    }

    /// Plain triples bound by the where clause, without duplicates
    pub fn construct_template(&self) -> Vec<TriplePattern> {
        let mut out: Vec<TriplePattern> = Vec::with_capacity(self.template.len());
        for t in &self.template {
            if !out.contains(t) {
                out.push(t.clone());
            }
        }
        out
    }

    /// SPARQL `CONSTRUCT` query retrieving the fragment's triples
    pub fn to_construct_query(&self) -> String {
        let mut out = String::from("CONSTRUCT {\n");
        for t in self.construct_template() {
            out.push_str("  ");
            out.push_str(&t.to_string());
            out.push('\n');
        }
        out.push_str("}\nWHERE {\n");
        write_group(&mut out, &self.patterns, 1);
        out.push_str("}\n");
        out
    }
}

fn write_group(out: &mut String, patterns: &[Pattern], depth: usize) {
    let indent = "  ".repeat(depth);
    for pattern in patterns {
        match pattern {
            Pattern::Triple(t) => {
                out.push_str(&indent);
                out.push_str(&t.to_string());
                out.push('\n');
            }
            Pattern::Optional(group) => {
                out.push_str(&indent);
                out.push_str("OPTIONAL {\n");
                write_group(out, group, depth + 1);
                out.push_str(&indent);
                out.push_str("}\n");
            }
            Pattern::Union(groups) => {
                for (i, group) in groups.iter().enumerate() {
                    out.push_str(&indent);
                    out.push_str(if i == 0 { "{\n" } else { "UNION {\n" });
                    write_group(out, group, depth + 1);
                    out.push_str(&indent);
                    out.push_str("}\n");
                }
            }
        }
    }
}

/// Retrieval fragment of a generated type
pub trait QueryFragment {
    fn query_fragment(cx: &FragmentContext) -> Fragment;

    /// `CONSTRUCT` query rooted at `?s`
    fn construct_query() -> String {
        Self::query_fragment(&FragmentContext::root()).to_construct_query()
    }

    /// `CONSTRUCT` query for one subject
    fn construct_query_for(iri: &str) -> String {
        Self::query_fragment(&FragmentContext::for_iri(iri)).to_construct_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NAME: &str = "http://example.org/name";
    const NEXT: &str = "http://example.org/next";
    const TAGS: &str = "http://example.org/tags";

    struct Node;

    impl QueryFragment for Node {
        fn query_fragment(cx: &FragmentContext) -> Fragment {
            Fragment::new()
                .types(cx, &["http://example.org/Node"])
                .property(cx, "name", NAME, QueryCardinality::Required)
                .nested_property::<Node>(cx, "next", NEXT, QueryCardinality::Optional)
        }
    }

    #[test]
    fn test_variables_are_sanitized_and_prefixed() {
        let cx = FragmentContext::root();
        assert_eq!(cx.variable("first-name").to_string(), "?s_first_name");
        let nested = cx.nested::<Node>("next").unwrap();
        assert_eq!(nested.variable("name").to_string(), "?s_next_name");
        assert_eq!(Variable::new("näme·x").to_string(), "?näme_x");
    }

    #[test]
    fn test_required_is_not_wrapped() {
        let cx = FragmentContext::root();
        let fragment = Fragment::new()
            .property(&cx, "name", NAME, QueryCardinality::Required)
            .property(&cx, "tags", TAGS, QueryCardinality::Set);
        assert!(matches!(fragment.patterns()[0], Pattern::Triple(_)));
        assert!(matches!(fragment.patterns()[1], Pattern::Optional(_)));
    }

    #[test]
    fn test_recursion_is_bounded_by_depth() {
        let fragment = Node::query_fragment(&FragmentContext::root().with_depth(2));
        let query = fragment.to_construct_query();
        assert!(query.contains("?s_next_next_name ."));
        assert!(query.contains("?s_next_next_next ."));
        assert!(!query.contains("?s_next_next_next_name"));
        assert_eq!(
            fragment.predicates().into_iter().collect::<Vec<_>>(),
            vec![NAME.to_string(), NEXT.to_string(), rdf::TYPE.to_string()]
        );
    }

    const INNER: &str = "http://example.org/inner";
    const LEAF: &str = "http://example.org/leaf";

    struct Wrap<T>(std::marker::PhantomData<T>);
    struct Leaf;

    impl<T: QueryFragment + 'static> QueryFragment for Wrap<T> {
        fn query_fragment(cx: &FragmentContext) -> Fragment {
            Fragment::new().nested_property::<T>(cx, "inner", INNER, QueryCardinality::Required)
        }
    }

    impl QueryFragment for Leaf {
        fn query_fragment(cx: &FragmentContext) -> Fragment {
            Fragment::new().property(cx, "leaf", LEAF, QueryCardinality::Required)
        }
    }

    type FiveLevels = Wrap<Wrap<Wrap<Wrap<Leaf>>>>;

    #[test]
    fn test_acyclic_nesting_expands_past_depth() {
        let fragment = FiveLevels::query_fragment(&FragmentContext::root().with_depth(1));
        let query = fragment.to_construct_query();
        let leaf = format!("?s_inner_inner_inner_inner <{}> ?s_inner_inner_inner_inner_leaf .", LEAF);
        assert!(query.contains(&leaf), "{}", query);
        assert_eq!(
            fragment.predicates().into_iter().collect::<Vec<_>>(),
            vec![INNER.to_string(), LEAF.to_string()]
        );

        let flat = FiveLevels::query_fragment(&FragmentContext::root().with_depth(0));
        assert_eq!(
            flat.predicates().into_iter().collect::<Vec<_>>(),
            vec![INNER.to_string()]
        );
    }

    #[test]
    fn test_list_helpers_do_not_collide_with_element_properties() {
        struct Stop;
        impl QueryFragment for Stop {
            fn query_fragment(cx: &FragmentContext) -> Fragment {
                Fragment::new().property(cx, "next", NEXT, QueryCardinality::Optional)
            }
        }
        let cx = FragmentContext::root();
        let fragment = Fragment::new().nested_list_property::<Stop>(&cx, "stops", TAGS);
        let query = fragment.to_construct_query();
        assert!(query.contains(&format!("?s_stops__cell <{}> ?s_stops__next .", rdf::REST)));
        assert!(query.contains(&format!("?s_stops <{}> ?s_stops_next .", NEXT)));
    }

    #[test]
    fn test_list_property_walks_cells() {
        let cx = FragmentContext::root();
        let fragment = Fragment::new().list_property(&cx, "tags", TAGS);
        let query = fragment.to_construct_query();
        assert!(query.contains(&format!("?s_tags__list <{}>* ?s_tags__cell .", rdf::REST)));
        assert!(query.contains(&format!("?s_tags__cell <{}> ?s_tags .", rdf::FIRST)));
        assert!(query.contains(&format!("?s_tags__cell <{}> ?s_tags__next .", rdf::REST)));
        // the path pattern never reaches the construct template
        assert!(fragment.construct_template().iter().all(|t| !t.p.is_path()));
        assert_eq!(fragment.construct_template().len(), 3);
    }

    #[test]
    fn test_union_renders_branches() {
        let cx = FragmentContext::for_iri("http://example.org/a");
        let fragment = Fragment::union(vec![
            Fragment::new().property(&cx, "name", NAME, QueryCardinality::Required),
            Fragment::new().property(&cx, "name", NAME, QueryCardinality::Required),
        ]);
        assert_eq!(
            fragment.to_construct_query(),
            format!(
                "CONSTRUCT {{\n  <http://example.org/a> <{n}> ?s_name .\n}}\nWHERE {{\n  {{\n    <http://example.org/a> <{n}> ?s_name .\n  }}\n  UNION {{\n    <http://example.org/a> <{n}> ?s_name .\n  }}\n}}\n",
                n = NAME
            )
        );
    }
}
