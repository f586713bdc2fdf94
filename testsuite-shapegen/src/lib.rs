//! Types generated from the fixture shapes in `build.rs`
//!
//! Integration tests under `tests/` exercise the generated code against
//! the runtime contract: codec round-trips, equality and hashing, minting,
//! cardinality enforcement, union decoding and query/codec parity.

include!(concat!(env!("OUT_DIR"), "/shapes.rs"));

/// IRI under the fixture namespace
pub fn ex(local: &str) -> String {
    format!("http://example.org/{}", local)
}
