//! Node identifiers and identifier minting
//!
//! Identifiers are either anonymous (blank) or named (a plain IRI string).
//! Types whose identifier may be minted hold a [`LazyIdentifier`]: the
//! minting closure only runs the first time an identifier is requested and
//! none was supplied.

use fluree_graph_ir::{BlankId, Term};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Prefix distinguishing blank identifiers from IRIs in documents
pub const BLANK_PREFIX: &str = "_:";

/// Identifier of a node: anonymous or a named IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Anonymous node, meaningful only within one graph or document
    Blank(BlankId),
    /// Named node
    Named(Arc<str>),
}

impl Identifier {
    /// Named identifier from an IRI
    pub fn named(iri: impl AsRef<str>) -> Self {
        Identifier::Named(Arc::from(iri.as_ref()))
    }

    /// Blank identifier from a label (without `_:`)
    pub fn blank(label: impl AsRef<str>) -> Self {
        Identifier::Blank(BlankId::new(label))
    }

    /// A fresh blank identifier, unique with overwhelming probability
    pub fn fresh_blank() -> Self {
        Identifier::blank(format!("b{}", uuid::Uuid::new_v4().simple()))
    }

    /// Identifier of a subject term; literals have none
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Iri(iri) => Some(Identifier::Named(iri.clone())),
            Term::BlankNode(id) => Some(Identifier::Blank(id.clone())),
            Term::Literal { .. } => None,
        }
    }

    /// Parse the document form, where blank identifiers carry the `_:` prefix
    pub fn from_document_str(s: &str) -> Self {
        match s.strip_prefix(BLANK_PREFIX) {
            Some(label) => Identifier::blank(label),
            None => Identifier::named(s),
        }
    }

    /// Document form of this identifier
    pub fn to_document_string(&self) -> String {
        match self {
            Identifier::Blank(id) => id.to_ntriples(),
            Identifier::Named(iri) => iri.to_string(),
        }
    }

    /// Graph term for this identifier
    pub fn to_term(&self) -> Term {
        match self {
            Identifier::Blank(id) => Term::BlankNode(id.clone()),
            Identifier::Named(iri) => Term::Iri(iri.clone()),
        }
    }

    /// The IRI of a named identifier
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Identifier::Named(iri) => Some(iri),
            Identifier::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Identifier::Blank(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Blank(id) => write!(f, "{}", id),
            Identifier::Named(iri) => write!(f, "<{}>", iri),
        }
    }
}

/// Identifier that is either supplied by the caller or minted on first use
///
/// A minted identifier is cached and shared by every clone, so a value and
/// its copies name the same node whichever of them mints first.
/// [`LazyIdentifier::reset`] detaches this value from that cache so the next
/// request mints again. A supplied identifier is never replaced.
#[derive(Clone, Debug, Default)]
pub struct LazyIdentifier {
    supplied: Option<Identifier>,
    minted: Arc<OnceCell<Identifier>>,
}

impl LazyIdentifier {
    pub fn new(supplied: Option<Identifier>) -> Self {
        Self {
            supplied,
            minted: Arc::default(),
        }
    }

    /// Return the supplied identifier, or the cached minted one, minting it if needed
    pub fn get_or_mint(&self, mint: impl FnOnce() -> Identifier) -> &Identifier {
        match &self.supplied {
            Some(id) => id,
            None => self.minted.get_or_init(mint),
        }
    }

    /// The identifier supplied at construction, if any
    pub fn supplied(&self) -> Option<&Identifier> {
        self.supplied.as_ref()
    }

    /// Whether an identifier has been minted and cached
    pub fn is_minted(&self) -> bool {
        self.minted.get().is_some()
    }

    /// Discard a cached minted identifier; clones keep theirs
    pub fn reset(&mut self) {
        self.minted = Arc::default();
    }
}

/// Mint a random named identifier: `prefix` followed by a UUID v4
pub fn mint_random(prefix: &str) -> Identifier {
    Identifier::named(format!("{}{}", prefix, uuid::Uuid::new_v4()))
}

/// Mint a content-addressed identifier
///
/// `feed` writes the instance's hashed properties (never its identifier) into
/// a SHA-256 sink; the identifier is `prefix` followed by the hex digest.
pub fn mint_content_hash(prefix: &str, feed: impl FnOnce(&mut Sha256)) -> Identifier {
    let mut hasher = Sha256::new();
    feed(&mut hasher);
    Identifier::named(format!("{}{}", prefix, hex::encode(hasher.finalize())))
}
