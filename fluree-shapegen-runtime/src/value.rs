//! Value types used by generated fields that have no direct Rust primitive

use fluree_graph_ir::{Datatype, LiteralValue, Term};

/// Date-time with a fixed offset, compared by instant
pub type DateTime = chrono::DateTime<chrono::FixedOffset>;

/// Tagged text: a lexical value with an optional language tag or datatype
///
/// Plain `xsd:string` and `rdf:langString` are implied and stored as `None`
/// in `datatype`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    /// Untagged plain string
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged string
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Typed lexical value
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Read any literal term; returns `None` for IRIs and blank nodes
    pub fn from_term(term: &Term) -> Option<Self> {
        let (value, datatype, language) = term.as_literal()?;
        let datatype = if datatype.is_xsd_string() || datatype.is_lang_string() {
            None
        } else {
            Some(datatype.as_iri().to_string())
        };
        Some(Self {
            value: value.lexical(),
            language: language.map(str::to_string),
            datatype,
        })
    }

    pub fn to_term(&self) -> Term {
        match (&self.language, &self.datatype) {
            (Some(lang), _) => Term::lang_string(&self.value, lang),
            (None, Some(dt)) => Term::literal(
                LiteralValue::string(&self.value),
                Datatype::from_iri(dt),
                None,
            ),
            (None, None) => Term::string(&self.value),
        }
    }

    /// Basic-filtering language range match (RFC 4647 §3.3.1), case-insensitive
    pub fn lang_matches(&self, range: &str) -> bool {
        match &self.language {
            Some(tag) => lang_matches(tag, range),
            None => false,
        }
    }
}

/// Check a language tag against a language range; `*` matches any tag
pub fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range || (tag.starts_with(&range) && tag.as_bytes().get(range.len()) == Some(&b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_term_roundtrip() {
        let tagged = Literal::tagged("chat", "fr");
        assert_eq!(tagged.to_term(), Term::lang_string("chat", "fr"));
        assert_eq!(Literal::from_term(&tagged.to_term()), Some(tagged));

        let typed = Literal::typed("2024-01-01", fluree_vocab::xsd::DATE);
        assert_eq!(Literal::from_term(&typed.to_term()), Some(typed));

        let plain = Literal::plain("x");
        assert_eq!(Literal::from_term(&Term::string("x")), Some(plain));
        assert_eq!(Literal::from_term(&Term::iri("http://example.org")), None);
    }

    #[test]
    fn test_lang_matches() {
        assert!(lang_matches("en", "en"));
        assert!(lang_matches("en-US", "en"));
        assert!(lang_matches("EN-us", "en-US"));
        assert!(!lang_matches("eng", "en"));
        assert!(!lang_matches("fr", "en"));
        assert!(lang_matches("de", "*"));
    }
}
