//! Auxiliary value types: closed enumerations from `sh:in` and primitive
//! unions from `sh:or` of datatypes
//!
//! Both implement the value traits only (`GraphValue`, `DocumentValue`,
//! `StructuralEquals`, `ContentHash`, `RuntimeSchema`). They never carry an
//! identifier and are never queried on their own.

use super::schema::primitive_schema;
use super::{ident, primitive_type, term_tokens};
use crate::model::{Enumeration, Primitive, PrimitiveUnion};
use proc_macro2::TokenStream;
use quote::quote;

fn expected_members(enumeration: &Enumeration) -> String {
    let members: Vec<&str> = enumeration
        .members
        .iter()
        .map(|m| m.document.as_str())
        .collect();
    format!("one of {}", members.join(", "))
}

/// Shared trait impls; `Self` must provide `ALL`, `as_str`, `term` and
/// `from_document_str`
fn enumeration_traits(enumeration: &Enumeration) -> TokenStream {
    let name = ident(&enumeration.name);
    let expected = expected_members(enumeration);
    let schema = if enumeration.is_singleton() {
        let only = &enumeration.members[0].document;
        quote! { rt::Schema::Const(rt::Value::from(#only)) }
    } else {
        let documents = enumeration.members.iter().map(|m| &m.document);
        quote! { rt::Schema::Enum(vec![#(rt::Value::from(#documents)),*]) }
    };

    quote! {
        impl rt::GraphValue for #name {
            fn from_term(
                _graph: &rt::Graph,
                term: &rt::Term,
                cx: &rt::ValueContext<'_>,
            ) -> rt::DecodeResult<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.term() == *term)
                    .ok_or_else(|| cx.mistyped(#expected, term))
            }

            fn to_term(&self, _graph: &mut rt::Graph) -> rt::Term {
                self.term()
            }
        }

        impl rt::DocumentValue for #name {
            fn to_document(&self) -> rt::Value {
                rt::Value::from(self.as_str())
            }

            fn from_document_value(
                value: &rt::Value,
                cx: &rt::DocumentContext<'_>,
            ) -> rt::DecodeResult<Self> {
                value
                    .as_str()
                    .and_then(Self::from_document_str)
                    .ok_or_else(|| cx.mistyped(#expected, value))
            }
        }

        impl rt::StructuralEquals for #name {
            fn structural_equals(&self, other: &Self) -> rt::EqualsResult {
                if self == other {
                    Ok(())
                } else {
                    Err(rt::Inequality::values(self, other))
                }
            }
        }

        impl rt::ContentHash for #name {
            fn hash_content<H: rt::HashSink + ?Sized>(&self, sink: &mut H) {
                rt::ContentHash::hash_content(&self.term(), sink);
            }
        }

        impl rt::RuntimeSchema for #name {
            fn runtime_schema() -> rt::Schema {
                #schema
            }
        }
    }
}

/// Closed enumeration, or a unit struct when it has a single member
pub(super) fn enumeration(enumeration: &Enumeration) -> TokenStream {
    let name = ident(&enumeration.name);
    let traits = enumeration_traits(enumeration);

    if enumeration.is_singleton() {
        let member = &enumeration.members[0];
        let document = &member.document;
        let term = term_tokens(&member.term);
        let summary = format!(" The only allowed value, `{}`", document);
        return quote! {
            #[doc = #summary]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct #name;

            impl #name {
                pub const ALL: &'static [Self] = &[#name];

                pub fn as_str(self) -> &'static str {
                    #document
                }

                pub fn term(self) -> rt::Term {
                    #term
                }

                pub fn from_document_str(value: &str) -> Option<Self> {
                    (value == #document).then_some(#name)
                }
            }

            #traits
        };
    }

    let variants: Vec<_> = enumeration
        .members
        .iter()
        .map(|m| ident(&m.variant))
        .collect();
    let documents: Vec<&String> = enumeration.members.iter().map(|m| &m.document).collect();
    let terms = enumeration.members.iter().map(|m| term_tokens(&m.term));
    let definitions = variants.iter().zip(&documents).map(|(variant, document)| {
        let line = format!(" `{}`", document);
        quote! {
            #[doc = #line]
            #variant
        }
    });

    quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum #name {
            #(#definitions,)*
        }

        impl #name {
            pub const ALL: &'static [Self] = &[#(#name::#variants),*];

            /// Document form: the IRI or the lexical value
            pub fn as_str(self) -> &'static str {
                match self {
                    #(#name::#variants => #documents,)*
                }
            }

            pub fn term(self) -> rt::Term {
                match self {
                    #(#name::#variants => #terms,)*
                }
            }

            pub fn from_document_str(value: &str) -> Option<Self> {
                match value {
                    #(#documents => Some(#name::#variants),)*
                    _ => None,
                }
            }
        }

        #traits
    }
}

fn describe(members: &[Primitive]) -> String {
    let names: Vec<String> = members
        .iter()
        .map(|p| p.variant_name().to_lowercase())
        .collect();
    names.join(" or ")
}

/// Union of primitive alternatives, decoded by the first member that accepts
/// the value
pub(super) fn primitive_union(union: &PrimitiveUnion) -> TokenStream {
    let name = ident(&union.name);
    let expected = describe(&union.members);
    let variants: Vec<_> = union
        .members
        .iter()
        .map(|p| ident(p.variant_name()))
        .collect();
    let variant_names = union.members.iter().map(|p| p.variant_name());
    let types: Vec<_> = union.members.iter().map(|p| primitive_type(*p)).collect();
    let schemas = union.members.iter().map(|p| primitive_schema(*p));

    let graph_attempts = variants.iter().zip(&types).map(|(variant, ty)| {
        quote! {
            if let Ok(member) = <#ty as rt::GraphValue>::from_term(graph, term, cx) {
                return Ok(#name::#variant(member));
            }
        }
    });
    let document_attempts = variants.iter().zip(&types).map(|(variant, ty)| {
        quote! {
            if let Ok(member) = <#ty as rt::DocumentValue>::from_document_value(value, cx) {
                return Ok(#name::#variant(member));
            }
        }
    });

    quote! {
        #[derive(Debug, Clone, PartialEq)]
        pub enum #name {
            #(#variants(#types),)*
        }

        impl #name {
            pub fn variant_name(&self) -> &'static str {
                match self {
                    #(#name::#variants(_) => #variant_names,)*
                }
            }
        }

        #(
            impl From<#types> for #name {
                fn from(value: #types) -> Self {
                    #name::#variants(value)
                }
            }
        )*

        impl rt::GraphValue for #name {
            fn from_term(
                graph: &rt::Graph,
                term: &rt::Term,
                cx: &rt::ValueContext<'_>,
            ) -> rt::DecodeResult<Self> {
                #(#graph_attempts)*
                Err(cx.mistyped(#expected, term))
            }

            fn to_term(&self, graph: &mut rt::Graph) -> rt::Term {
                match self {
                    #(#name::#variants(value) => rt::GraphValue::to_term(value, graph),)*
                }
            }
        }

        impl rt::DocumentValue for #name {
            fn to_document(&self) -> rt::Value {
                match self {
                    #(#name::#variants(value) => rt::DocumentValue::to_document(value),)*
                }
            }

            fn from_document_value(
                value: &rt::Value,
                cx: &rt::DocumentContext<'_>,
            ) -> rt::DecodeResult<Self> {
                #(#document_attempts)*
                Err(cx.mistyped(#expected, value))
            }
        }

        impl rt::StructuralEquals for #name {
            fn structural_equals(&self, other: &Self) -> rt::EqualsResult {
                match (self, other) {
                    #(
                        (#name::#variants(left), #name::#variants(right)) => {
                            rt::StructuralEquals::structural_equals(left, right)
                        }
                    )*
                    _ => Err(rt::Inequality::values(self, other)),
                }
            }
        }

        impl rt::ContentHash for #name {
            fn hash_content<H: rt::HashSink + ?Sized>(&self, sink: &mut H) {
                rt::HashSink::update_str(sink, self.variant_name());
                match self {
                    #(#name::#variants(value) => rt::ContentHash::hash_content(value, sink),)*
                }
            }
        }

        impl rt::RuntimeSchema for #name {
            fn runtime_schema() -> rt::Schema {
                rt::Schema::OneOf(vec![#(#schemas),*])
            }
        }
    }
}
