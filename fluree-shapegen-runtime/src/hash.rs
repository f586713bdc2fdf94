//! Incremental content hashing
//!
//! Generated types feed a [`HashSink`] with a deterministic byte sequence:
//! their identifier, then every property in declaration order. Set-valued
//! properties are fed in their current element order, so two structurally
//! equal instances whose sets are ordered differently produce different
//! byte sequences. Equality treats sets as multisets; hashing does not.

use crate::identifier::Identifier;
use crate::value::{DateTime, Literal};
use chrono::NaiveDate;
use fluree_graph_ir::Term;

/// Anything that accepts bytes and strings
pub trait HashSink {
    fn update(&mut self, bytes: &[u8]);

    /// Feed a string, length-prefixed so adjacent strings cannot run together
    fn update_str(&mut self, s: &str) {
        self.update(&(s.len() as u64).to_le_bytes());
        self.update(s.as_bytes());
    }
}

impl HashSink for sha2::Sha256 {
    fn update(&mut self, bytes: &[u8]) {
        sha2::Digest::update(self, bytes);
    }
}

/// Recording sink: the fed byte sequence itself
impl HashSink for Vec<u8> {
    fn update(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Deterministic content feed implemented by every generated type
pub trait ContentHash {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H);
}

/// Feed a named property
pub fn property<T: ContentHash + ?Sized, H: HashSink + ?Sized>(name: &str, value: &T, sink: &mut H) {
    sink.update_str(name);
    value.hash_content(sink);
}

/// Hex SHA-256 digest of a value's content feed
pub fn sha256_hex<T: ContentHash + ?Sized>(value: &T) -> String {
    use sha2::Digest;
    let mut hasher = sha2::Sha256::new();
    value.hash_content(&mut hasher);
    hex::encode(hasher.finalize())
}

impl ContentHash for str {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update_str(self);
    }
}

impl ContentHash for String {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update_str(self);
    }
}

impl ContentHash for bool {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update(&[u8::from(*self)]);
    }
}

impl ContentHash for i64 {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update(&self.to_le_bytes());
    }
}

impl ContentHash for f64 {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        // -0.0 == 0.0 and NaN == NaN under structural equality
        let normalized = if *self == 0.0 {
            0.0_f64
        } else if self.is_nan() {
            f64::NAN
        } else {
            *self
        };
        sink.update(&normalized.to_bits().to_le_bytes());
    }
}

impl ContentHash for NaiveDate {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update_str(&self.format("%Y-%m-%d").to_string());
    }
}

impl ContentHash for DateTime {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        // Instant only: equal instants in different offsets hash alike
        sink.update(&self.timestamp().to_le_bytes());
        sink.update(&self.timestamp_subsec_nanos().to_le_bytes());
    }
}

impl ContentHash for Literal {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update_str(&self.value);
        self.language.hash_content(sink);
        self.datatype.hash_content(sink);
    }
}

impl ContentHash for Identifier {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        match self {
            Identifier::Blank(id) => {
                sink.update(&[0]);
                sink.update_str(id.as_str());
            }
            Identifier::Named(iri) => {
                sink.update(&[1]);
                sink.update_str(iri);
            }
        }
    }
}

impl ContentHash for Term {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        match self {
            Term::Iri(iri) => {
                sink.update(&[1]);
                sink.update_str(iri);
            }
            Term::BlankNode(id) => {
                sink.update(&[0]);
                sink.update_str(id.as_str());
            }
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                sink.update(&[2]);
                sink.update_str(&value.lexical());
                sink.update_str(datatype.as_iri());
                sink.update_str(language.as_deref().unwrap_or(""));
            }
        }
    }
}

impl<T: ContentHash + ?Sized> ContentHash for Box<T> {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        (**self).hash_content(sink);
    }
}

impl<T: ContentHash> ContentHash for Option<T> {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        match self {
            None => sink.update(&[0]),
            Some(value) => {
                sink.update(&[1]);
                value.hash_content(sink);
            }
        }
    }
}

/// Elements are fed in iteration order
impl<T: ContentHash> ContentHash for [T] {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        sink.update(&(self.len() as u64).to_le_bytes());
        for item in self {
            item.hash_content(sink);
        }
    }
}

impl<T: ContentHash> ContentHash for Vec<T> {
    fn hash_content<H: HashSink + ?Sized>(&self, sink: &mut H) {
        self.as_slice().hash_content(sink);
    }
}
