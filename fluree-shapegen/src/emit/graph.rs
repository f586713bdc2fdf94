//! Graph codec: `GraphValue` impls and the `from_graph_with` bodies
//!
//! Decoding reads one predicate per property through `rt::Resource`;
//! unions try members in declaration order and keep the first success.
//! [`reads`] lists what a decoder touches and drives both the emitted calls
//! and the query parity check.

use super::{default_operand, default_value, field_ident, term_tokens, type_ident};
use super::types::{variants, wrap_variant};
use crate::model::{Cardinality, PropertyType, ShapeType};
use fluree_vocab::rdf;
use proc_macro2::TokenStream;
use quote::quote;

/// One read performed by a generated graph decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphRead {
    /// `rdf:type` of the focus, checked unless suppressed
    Types,
    /// Objects of a predicate; `shape` names the nested decoder
    Objects {
        predicate: String,
        shape: Option<String>,
    },
    /// `rdf:first`/`rdf:rest` chain under a predicate
    List {
        predicate: String,
        shape: Option<String>,
    },
    /// The whole focus handed to a member decoder
    Member(String),
}

impl GraphRead {
    pub fn predicates(&self) -> Vec<&str> {
        match self {
            GraphRead::Types => vec![rdf::TYPE],
            GraphRead::Objects { predicate, .. } => vec![predicate.as_str()],
            GraphRead::List { predicate, .. } => vec![predicate.as_str(), rdf::FIRST, rdf::REST],
            GraphRead::Member(_) => Vec::new(),
        }
    }

    /// Shape decoded from the read value, if any
    pub fn shape(&self) -> Option<&str> {
        match self {
            GraphRead::Types => None,
            GraphRead::Objects { shape, .. } | GraphRead::List { shape, .. } => shape.as_deref(),
            GraphRead::Member(name) => Some(name),
        }
    }
}

fn property_read(property: &PropertyType) -> GraphRead {
    let predicate = property.predicate.clone();
    let shape = property
        .value
        .shape_ref()
        .map(|r| r.type_name().to_string());
    if property.cardinality == Cardinality::List {
        GraphRead::List { predicate, shape }
    } else {
        GraphRead::Objects { predicate, shape }
    }
}

/// Reads of the decoder generated for `shape`, in call order
pub fn reads(shape: &ShapeType) -> Vec<GraphRead> {
    if shape.is_sum() {
        return shape
            .members
            .iter()
            .map(|m| GraphRead::Member(m.type_name().to_string()))
            .collect();
    }
    let mut out = Vec::with_capacity(shape.properties.len() + 1);
    if !shape.check_types().is_empty() {
        out.push(GraphRead::Types);
    }
    out.extend(shape.properties.iter().map(property_read));
    out
}

fn filter(property: &PropertyType) -> TokenStream {
    let mut filter = quote! { rt::ValueFilter::any() };
    if !property.language_in.is_empty() {
        let languages = &property.language_in;
        filter.extend(quote! { .languages(&[#(#languages),*]) });
    }
    if let Some(term) = &property.has_value {
        let term = term_tokens(term);
        filter.extend(quote! { .has_value(#term) });
    }
    filter
}

fn decode_argument(property: &PropertyType) -> TokenStream {
    let predicate = &property.predicate;
    let filter = filter(property);
    if let GraphRead::List { .. } = property_read(property) {
        return quote! { resource.list(#predicate, &#filter)? };
    }
    match property.cardinality {
        Cardinality::Required => match &property.default {
            Some(default) => {
                let value = default_value(property, default);
                quote! { resource.optional(#predicate, &#filter)?.unwrap_or_else(|| #value) }
            }
            None => quote! { resource.required(#predicate, &#filter)? },
        },
        Cardinality::Optional => quote! { resource.optional(#predicate, &#filter)? },
        Cardinality::Set => quote! { resource.set(#predicate, &#filter)? },
        Cardinality::NonEmptySet => quote! { resource.non_empty_set(#predicate, &#filter)? },
        Cardinality::List => quote! { resource.list(#predicate, &#filter)? },
    }
}

/// Body of `Shape::from_graph_with` for a record
pub(super) fn decode_record(shape: &ShapeType) -> TokenStream {
    let type_name = &shape.name;
    let check = if shape.check_types().is_empty() {
        TokenStream::new()
    } else {
        let types = shape.check_types();
        quote! { resource.check_types(&[#(#types),*])?; }
    };
    let identifier = if shape.identifier.is_lazy() {
        quote! { Some(resource.identifier()) }
    } else {
        quote! { resource.identifier() }
    };
    let arguments = shape.properties.iter().map(decode_argument);
    quote! {
        let resource = rt::Resource::new(graph, focus, #type_name, options)?;
        #check
        Self::new(
            #identifier,
            #(#arguments,)*
        )
    }
}

/// Body of `Shape::from_graph_with` for a sum: first member that decodes wins
pub(super) fn decode_sum(shape: &ShapeType) -> TokenStream {
    let type_name = &shape.name;
    let attempts = variants(shape).into_iter().map(|(variant, ty, boxed)| {
        let member = variant.to_string();
        let wrapped = wrap_variant(shape, &variant, boxed, quote! { value });
        quote! {
            match <#ty as rt::Shape>::from_graph_with(graph, focus, options) {
                Ok(value) => return Ok(#wrapped),
                Err(err) => attempts.push((#member, err)),
            }
        }
    });
    quote! {
        let mut attempts = Vec::new();
        #(#attempts)*
        Err(rt::graph::unmatched_union(#type_name, focus, attempts))
    }
}

fn encode_property(property: &PropertyType) -> TokenStream {
    let field = field_ident(property);
    let predicate = &property.predicate;
    match property.cardinality {
        Cardinality::Required => match &property.default {
            Some(default) => {
                let operand = default_operand(property, default);
                quote! {
                    if self.#field != #operand {
                        writer.value(#predicate, &self.#field);
                    }
                }
            }
            None => quote! { writer.value(#predicate, &self.#field); },
        },
        Cardinality::Optional => quote! { writer.optional(#predicate, self.#field.as_ref()); },
        Cardinality::Set | Cardinality::NonEmptySet => {
            quote! { writer.values(#predicate, &self.#field); }
        }
        Cardinality::List => quote! { writer.list(#predicate, &self.#field); },
    }
}

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let to_term = if shape.is_sum() {
        let arms = variants(shape).into_iter().map(|(variant, _, _)| {
            quote! { #name::#variant(value) => rt::GraphValue::to_term(value, graph) }
        });
        quote! {
            match self {
                #(#arms,)*
            }
        }
    } else {
        let writes = shape.properties.iter().map(encode_property);
        quote! {
            let mut writer = rt::ResourceWriter::new(graph, rt::Shape::identifier(self).to_term());
            writer.types(Self::RDF_TYPES);
            #(#writes)*
            writer.finish()
        }
    };

    quote! {
        impl rt::GraphValue for #name {
            fn from_term(
                graph: &rt::Graph,
                term: &rt::Term,
                cx: &rt::ValueContext<'_>,
            ) -> rt::DecodeResult<Self> {
                <Self as rt::Shape>::from_graph_with(graph, term, cx.options)
            }

            fn to_term(&self, graph: &mut rt::Graph) -> rt::Term {
                #to_term
            }
        }
    }
}
