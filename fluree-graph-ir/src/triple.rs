//! RDF triple (subject, predicate, object)

use crate::Term;
use serde::{Deserialize, Serialize};

/// One statement; the predicate is always an IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub s: Term,
    pub p: Term,
    pub o: Term,
}

impl Triple {
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }

    /// Subject is `s` and predicate is the IRI `p`
    pub fn matches(&self, s: &Term, p: &str) -> bool {
        self.p.as_iri() == Some(p) && &self.s == s
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_display_is_ntriples() {
        let triple = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::lang_string("chat", "fr"),
        );
        assert_eq!(
            triple.to_string(),
            "<http://example.org/s> <http://example.org/p> \"chat\"@fr ."
        );
    }

    #[test]
    fn test_matches() {
        let s = Term::iri("http://example.org/s");
        let triple = Triple::new(s.clone(), Term::iri("http://example.org/p"), Term::integer(1));
        assert!(triple.matches(&s, "http://example.org/p"));
        assert!(!triple.matches(&s, "http://example.org/q"));
        assert!(!triple.matches(&Term::blank("s"), "http://example.org/p"));
    }
}
