//! Literal datatypes
//!
//! Every literal carries one. A plain string is `xsd:string` and a
//! language-tagged one is `rdf:langString`.

use fluree_vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Datatype of a literal, held as its expanded IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    pub fn xsd_string() -> Self {
        Self::from_iri(xsd::STRING)
    }

    pub fn xsd_boolean() -> Self {
        Self::from_iri(xsd::BOOLEAN)
    }

    pub fn xsd_integer() -> Self {
        Self::from_iri(xsd::INTEGER)
    }

    pub fn xsd_double() -> Self {
        Self::from_iri(xsd::DOUBLE)
    }

    pub fn xsd_date() -> Self {
        Self::from_iri(xsd::DATE)
    }

    pub fn xsd_date_time() -> Self {
        Self::from_iri(xsd::DATE_TIME)
    }

    pub fn rdf_lang_string() -> Self {
        Self::from_iri(rdf::LANG_STRING)
    }

    pub fn as_iri(&self) -> &str {
        &self.0
    }

    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == xsd::STRING
    }

    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == rdf::LANG_STRING
    }

    /// `xsd:integer` or one of its derived types
    pub fn is_integer(&self) -> bool {
        xsd::is_integer_family(self.as_iri())
    }

    /// Integer family, decimal, float or double
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || xsd::is_float_family(self.as_iri())
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_iri())
    }
}
