//! `QueryFragment` impls
//!
//! The fragment mirrors the graph decoder read for read; [`reads`] describes
//! what it binds so the parity check can compare the two.

use super::types::variants;
use super::{element_type, type_ident};
use crate::model::{Cardinality, PropertyType, ShapeType};
use fluree_vocab::rdf;
use proc_macro2::TokenStream;
use quote::quote;

/// One binding made by a generated query fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRead {
    Types,
    Property {
        predicate: String,
        nested: Option<String>,
    },
    List {
        predicate: String,
        nested: Option<String>,
    },
    Branch(String),
}

impl QueryRead {
    pub fn predicates(&self) -> Vec<&str> {
        match self {
            QueryRead::Types => vec![rdf::TYPE],
            QueryRead::Property { predicate, .. } => vec![predicate.as_str()],
            QueryRead::List { predicate, .. } => vec![predicate.as_str(), rdf::FIRST, rdf::REST],
            QueryRead::Branch(_) => Vec::new(),
        }
    }

    /// Shape whose fragment is spliced in, if any
    pub fn shape(&self) -> Option<&str> {
        match self {
            QueryRead::Types => None,
            QueryRead::Property { nested, .. } | QueryRead::List { nested, .. } => {
                nested.as_deref()
            }
            QueryRead::Branch(name) => Some(name),
        }
    }
}

fn property_read(property: &PropertyType) -> QueryRead {
    let predicate = property.predicate.clone();
    let nested = property
        .value
        .shape_ref()
        .map(|r| r.type_name().to_string());
    match property.cardinality {
        Cardinality::List => QueryRead::List { predicate, nested },
        _ => QueryRead::Property { predicate, nested },
    }
}

/// Bindings of the fragment generated for `shape`, in call order
pub fn reads(shape: &ShapeType) -> Vec<QueryRead> {
    if shape.is_sum() {
        return shape
            .members
            .iter()
            .map(|m| QueryRead::Branch(m.type_name().to_string()))
            .collect();
    }
    let mut out = Vec::with_capacity(shape.properties.len() + 1);
    if !shape.check_types().is_empty() {
        out.push(QueryRead::Types);
    }
    out.extend(shape.properties.iter().map(property_read));
    out
}

fn cardinality(property: &PropertyType) -> TokenStream {
    match property.cardinality {
        Cardinality::Required if property.default.is_some() => {
            quote! { rt::QueryCardinality::Optional }
        }
        Cardinality::Required => quote! { rt::QueryCardinality::Required },
        Cardinality::Optional => quote! { rt::QueryCardinality::Optional },
        Cardinality::Set => quote! { rt::QueryCardinality::Set },
        Cardinality::NonEmptySet => quote! { rt::QueryCardinality::NonEmptySet },
        Cardinality::List => quote! { rt::QueryCardinality::List },
    }
}

fn property_call(property: &PropertyType) -> TokenStream {
    let name = &property.name;
    let predicate = &property.predicate;
    let nested = property.value.shape_ref().is_some();
    if property.cardinality == Cardinality::List {
        return if nested {
            let ty = element_type(&property.value);
            quote! { .nested_list_property::<#ty>(cx, #name, #predicate) }
        } else {
            quote! { .list_property(cx, #name, #predicate) }
        };
    }
    let cardinality = cardinality(property);
    if nested {
        let ty = element_type(&property.value);
        quote! { .nested_property::<#ty>(cx, #name, #predicate, #cardinality) }
    } else {
        quote! { .property(cx, #name, #predicate, #cardinality) }
    }
}

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let body = if shape.is_sum() {
        let branches = variants(shape).into_iter().map(|(_, ty, _)| {
            quote! { <#ty as rt::QueryFragment>::query_fragment(cx) }
        });
        quote! { rt::Fragment::union(vec![#(#branches),*]) }
    } else {
        let types = shape.check_types();
        let calls = shape.properties.iter().map(property_call);
        quote! {
            rt::Fragment::new()
                .types(cx, &[#(#types),*])
                #(#calls)*
        }
    };
    quote! {
        impl rt::QueryFragment for #name {
            fn query_fragment(cx: &rt::FragmentContext) -> rt::Fragment {
                #body
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        IdentifierStrategy, Primitive, ShapeKind, ShapeRef, ValueType, Visibility,
    };
    use pretty_assertions::assert_eq;

    fn property(name: &str, cardinality: Cardinality, value: ValueType) -> PropertyType {
        PropertyType {
            name: name.to_string(),
            field: name.to_string(),
            predicate: format!("http://example.org/{}", name),
            cardinality,
            value,
            default: None,
            has_value: None,
            language_in: Vec::new(),
            mutable: false,
            visibility: Visibility::Public,
            order: None,
            index: 0,
            label: name.to_string(),
            description: None,
            declared_by: "Tree".to_string(),
        }
    }

    fn tree() -> ShapeType {
        ShapeType {
            iri: "http://example.org/TreeShape".to_string(),
            name: "Tree".to_string(),
            kind: ShapeKind::Record,
            base: None,
            identifier: IdentifierStrategy::BlankOrNamed,
            properties: vec![
                property(
                    "label",
                    Cardinality::Required,
                    ValueType::Primitive(Primitive::String),
                ),
                property(
                    "children",
                    Cardinality::List,
                    ValueType::Shape(ShapeRef {
                        name: Some("Tree".to_string()),
                        boxed: true,
                        ..ShapeRef::new("http://example.org/TreeShape")
                    }),
                ),
            ],
            rdf_types: vec!["http://example.org/Tree".to_string()],
            inherited_types: Vec::new(),
            members: Vec::new(),
            label: "Tree".to_string(),
            description: None,
            index: 0,
        }
    }

    #[test]
    fn test_reads_name_nested_shapes() {
        let reads = reads(&tree());
        assert_eq!(reads[0], QueryRead::Types);
        assert_eq!(reads[2].shape(), Some("Tree"));
        assert_eq!(
            reads[2].predicates(),
            vec!["http://example.org/children", rdf::FIRST, rdf::REST]
        );
    }

    #[test]
    fn test_emit_nests_lists() {
        let tokens = emit(&tree()).to_string();
        assert!(tokens.contains(". nested_list_property :: < Tree > (cx , \"children\""));
        assert!(tokens.contains("rt :: QueryCardinality :: Required"));
    }
}
