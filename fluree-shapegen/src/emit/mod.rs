//! Code emitters
//!
//! Every emitter reads the same linked model and produces a
//! `proc_macro2::TokenStream`; nothing here renders text. Per shape the
//! output is an [`EmittedShape`] bundle:
//!
//! - `types` - type definition, constructor, accessors, setters, `Shape` impl
//! - `equality` - `StructuralEquals`
//! - `hash` - `ContentHash` and the identifier-free `hash_properties` feed
//! - `document` - `DocumentValue`
//! - `graph` - `GraphValue` and the graph decoder
//! - `query` - `QueryFragment`
//! - `schema` - `RuntimeSchema` and `UiMetadata`
//!
//! Auxiliary types (closed enumerations, primitive unions) come from
//! `values` and are emitted ahead of the shape that declares them.
//!
//! Generated code refers to the runtime crate only through the `rt` alias
//! and calls trait methods in fully qualified form, so it does not depend on
//! which traits the including module has in scope.

mod document;
mod equality;
mod graph;
mod hash;
mod query;
mod schema;
mod types;
mod values;

pub use graph::{reads as graph_reads, GraphRead};
pub use query::{reads as query_reads, QueryRead};

use crate::link::{Auxiliary, Entry, LinkedModel};
use crate::model::{
    Cardinality, DefaultValue, Primitive, PropertyType, ShapeType, ValueType, Visibility,
};
use fluree_graph_ir::{LiteralValue, Term};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;
use tracing::{debug, debug_span};

/// Everything emitted for one shape, one field per feature
#[derive(Debug, Clone)]
pub struct EmittedShape {
    pub name: String,
    pub types: TokenStream,
    pub equality: TokenStream,
    pub hash: TokenStream,
    pub document: TokenStream,
    pub graph: TokenStream,
    pub query: TokenStream,
    pub schema: TokenStream,
}

impl EmittedShape {
    pub fn emit(shape: &ShapeType) -> Self {
        Self {
            name: shape.name.clone(),
            types: types::emit(shape),
            equality: equality::emit(shape),
            hash: hash::emit(shape),
            document: document::emit(shape),
            graph: graph::emit(shape),
            query: query::emit(shape),
            schema: schema::emit(shape),
        }
    }

    pub fn into_tokens(self) -> TokenStream {
        let Self {
            types,
            equality,
            hash,
            document,
            graph,
            query,
            schema,
            ..
        } = self;
        quote! {
            #types
            #equality
            #hash
            #graph
            #document
            #schema
            #query
        }
    }
}

/// Auxiliary types of an entry, then the shape itself
pub fn emit_entry(entry: &Entry) -> TokenStream {
    let mut tokens = TokenStream::new();
    for auxiliary in &entry.auxiliaries {
        tokens.extend(match auxiliary {
            Auxiliary::Enumeration(e) => values::enumeration(e),
            Auxiliary::PrimitiveUnion(u) => values::primitive_union(u),
        });
    }
    tokens.extend(EmittedShape::emit(&entry.shape).into_tokens());
    debug!(
        shape = %entry.shape.name,
        kind = %entry.shape.kind,
        auxiliaries = entry.auxiliaries.len(),
        "emitted shape"
    );
    tokens
}

/// Emit the whole model in link order
///
/// `TokenStream` is not `Send`, so shapes are emitted on the calling thread.
pub fn emit_model(model: &LinkedModel) -> TokenStream {
    let _span = debug_span!("shapegen_emit", shapes = model.entries().len()).entered();
    model.entries().iter().map(emit_entry).collect()
}

// ---------------------------------------------------------------------------
// Shared token helpers
// ---------------------------------------------------------------------------

pub(crate) fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

pub(crate) fn type_ident(shape: &ShapeType) -> Ident {
    ident(&shape.name)
}

pub(crate) fn field_ident(property: &PropertyType) -> Ident {
    ident(&property.field)
}

/// `&["a", "b"]`
pub(crate) fn str_slice(items: &[String]) -> TokenStream {
    quote! { &[#(#items),*] }
}

/// `#[doc = " text"]` per line, rendered as `///` comments
pub(crate) fn doc(text: Option<&str>) -> TokenStream {
    let Some(text) = text else {
        return TokenStream::new();
    };
    text.lines()
        .map(|line| {
            let line = format!(" {}", line.trim_end());
            quote! { #[doc = #line] }
        })
        .collect()
}

pub(crate) fn int_lit(value: i64) -> TokenStream {
    let lit = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote! { -#lit }
    } else {
        quote! { #lit }
    }
}

pub(crate) fn float_lit(value: f64) -> TokenStream {
    if value.is_nan() {
        return quote! { f64::NAN };
    }
    if value.is_infinite() {
        return if value > 0.0 {
            quote! { f64::INFINITY }
        } else {
            quote! { f64::NEG_INFINITY }
        };
    }
    let lit = Literal::f64_unsuffixed(value.abs());
    if value.is_sign_negative() {
        quote! { -#lit }
    } else {
        quote! { #lit }
    }
}

pub(crate) fn visibility(visibility: Visibility) -> TokenStream {
    match visibility {
        Visibility::Public => quote! { pub },
        Visibility::Protected => quote! { pub(crate) },
        Visibility::Private => TokenStream::new(),
    }
}

pub(crate) fn primitive_type(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::String => quote! { String },
        Primitive::Integer => quote! { i64 },
        Primitive::Number => quote! { f64 },
        Primitive::Boolean => quote! { bool },
        Primitive::Date => quote! { rt::NaiveDate },
        Primitive::DateTime => quote! { rt::DateTime },
        Primitive::Literal => quote! { rt::Literal },
        Primitive::Identifier => quote! { rt::Identifier },
        Primitive::Term => quote! { rt::Term },
    }
}

/// Element type of a property, never boxed
pub(crate) fn element_type(value: &ValueType) -> TokenStream {
    match value {
        ValueType::Primitive(p) => primitive_type(*p),
        ValueType::Shape(r) => {
            let name = ident(r.type_name());
            quote! { #name }
        }
        ValueType::Enumeration(e) => {
            let name = ident(&e.name);
            quote! { #name }
        }
        ValueType::PrimitiveUnion(u) => {
            let name = ident(&u.name);
            quote! { #name }
        }
        // Unresolved classes are linked to identifiers
        ValueType::Class(_) => primitive_type(Primitive::Identifier),
    }
}

/// Element type, boxed when the property closes a by-value cycle
pub(crate) fn stored_element_type(property: &PropertyType) -> TokenStream {
    let element = element_type(&property.value);
    if property.is_boxed() {
        quote! { Box<#element> }
    } else {
        element
    }
}

/// Field type: element, `Option` of it, or `Vec` of it
pub(crate) fn field_type(property: &PropertyType) -> TokenStream {
    let element = stored_element_type(property);
    match property.cardinality {
        Cardinality::Required => element,
        Cardinality::Optional => quote! { Option<#element> },
        Cardinality::Set | Cardinality::NonEmptySet | Cardinality::List => {
            quote! { Vec<#element> }
        }
    }
}

/// Values copied out of accessors rather than borrowed
pub(crate) fn is_copy(value: &ValueType) -> bool {
    match value {
        ValueType::Primitive(p) => p.is_copy(),
        ValueType::Enumeration(_) => true,
        _ => false,
    }
}

/// Expression constructing `term` at runtime
pub(crate) fn term_tokens(term: &Term) -> TokenStream {
    match term {
        Term::Iri(iri) => {
            let iri: &str = iri;
            quote! { rt::Term::iri(#iri) }
        }
        Term::BlankNode(id) => {
            let label = id.as_str();
            quote! { rt::Term::blank(#label) }
        }
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let value = match value {
                LiteralValue::String(s) => {
                    let s: &str = s;
                    quote! { rt::LiteralValue::string(#s) }
                }
                LiteralValue::Boolean(b) => quote! { rt::LiteralValue::Boolean(#b) },
                LiteralValue::Integer(i) => {
                    let i = int_lit(*i);
                    quote! { rt::LiteralValue::Integer(#i) }
                }
                LiteralValue::Double(d) => {
                    let d = float_lit(*d);
                    quote! { rt::LiteralValue::Double(#d) }
                }
            };
            let datatype = datatype.as_iri();
            let language = match language {
                Some(tag) => {
                    let tag: &str = tag;
                    quote! { Some(#tag) }
                }
                None => quote! { None },
            };
            quote! { rt::Term::literal(#value, rt::Datatype::from_iri(#datatype), #language) }
        }
    }
}

/// Expression producing the default value of a property
pub(crate) fn default_value(property: &PropertyType, default: &DefaultValue) -> TokenStream {
    match default {
        DefaultValue::String(s) => quote! { #s.to_string() },
        _ => default_operand(property, default),
    }
}

/// Right-hand side for comparing the field against its default
pub(crate) fn default_operand(property: &PropertyType, default: &DefaultValue) -> TokenStream {
    match default {
        DefaultValue::String(s) => quote! { #s },
        DefaultValue::Integer(i) => int_lit(*i),
        DefaultValue::Number(n) => float_lit(*n),
        DefaultValue::Boolean(b) => quote! { #b },
        DefaultValue::Date(y, m, d) => {
            let y = int_lit(i64::from(*y));
            quote! { rt::NaiveDate::from_ymd_opt(#y, #m, #d).unwrap_or_default() }
        }
        DefaultValue::Identifier(iri) => quote! { rt::Identifier::named(#iri) },
        DefaultValue::Member(index) => match &property.value {
            ValueType::Enumeration(e) if e.is_singleton() => {
                let name = ident(&e.name);
                quote! { #name }
            }
            ValueType::Enumeration(e) => {
                let name = ident(&e.name);
                let variant = ident(&e.members[*index].variant);
                quote! { #name::#variant }
            }
            _ => quote! { Default::default() },
        },
    }
}
