//! `RuntimeSchema` and `UiMetadata` impls
//!
//! The object schema follows the document codec key for key: anything
//! `from_document_value` requires is `Presence::Required` here.

use super::types::variants;
use super::{ident, type_ident};
use crate::model::{Cardinality, Primitive, PropertyType, ShapeType, ValueType};
use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn primitive_schema(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::String => quote! { rt::Schema::String },
        Primitive::Integer => quote! { rt::Schema::Integer },
        Primitive::Number => quote! { rt::Schema::Number },
        Primitive::Boolean => quote! { rt::Schema::Boolean },
        Primitive::Date => quote! { rt::Schema::Date },
        Primitive::DateTime => quote! { rt::Schema::DateTime },
        Primitive::Literal => quote! { rt::Schema::Literal },
        Primitive::Identifier => quote! { rt::Schema::Identifier },
        Primitive::Term => quote! { rt::Schema::Term },
    }
}

fn value_schema(value: &ValueType) -> TokenStream {
    match value {
        ValueType::Primitive(p) => primitive_schema(*p),
        ValueType::Class(_) => primitive_schema(Primitive::Identifier),
        ValueType::Shape(r) => {
            let name = r.type_name();
            let ty = ident(name);
            quote! { rt::Schema::lazy(#name, <#ty as rt::RuntimeSchema>::runtime_schema) }
        }
        ValueType::Enumeration(e) => {
            let ty = ident(&e.name);
            quote! { <#ty as rt::RuntimeSchema>::runtime_schema() }
        }
        ValueType::PrimitiveUnion(u) => {
            let ty = ident(&u.name);
            quote! { <#ty as rt::RuntimeSchema>::runtime_schema() }
        }
    }
}

fn property_schema(property: &PropertyType) -> TokenStream {
    let key = &property.name;
    let item = value_schema(&property.value);
    let (schema, required) = match property.cardinality {
        Cardinality::Required => (item, property.default.is_none()),
        Cardinality::Optional => (item, false),
        Cardinality::Set | Cardinality::List => (quote! { rt::Schema::array(#item, 0) }, false),
        Cardinality::NonEmptySet => (quote! { rt::Schema::array(#item, 1) }, true),
    };
    let presence = if required {
        quote! { rt::Presence::Required }
    } else {
        quote! { rt::Presence::Optional }
    };
    quote! { .property(#key, #schema, #presence) }
}

fn record(shape: &ShapeType) -> (TokenStream, TokenStream) {
    let type_name = &shape.name;
    let identifier = if shape.identifier.is_lazy() {
        quote! { rt::Presence::Optional }
    } else {
        quote! { rt::Presence::Required }
    };
    let properties = shape.properties.iter().map(property_schema);
    let schema = quote! {
        rt::Schema::Object(
            rt::ObjectSchema::new(#type_name)
                .identifier(#identifier)
                .discriminant(&[#type_name])
                #(#properties)*
        )
    };

    let controls = shape.properties.iter().map(|p| {
        let key = &p.name;
        let label = &p.label;
        quote! { rt::UiControl::new(#key, #label) }
    });
    let ui = quote! {
        rt::UiSchema::vertical(vec![
            rt::UiControl::discriminant(),
            #(#controls,)*
        ])
    };
    (schema, ui)
}

fn sum(shape: &ShapeType) -> (TokenStream, TokenStream) {
    let type_name = &shape.name;
    let alternatives = variants(shape).into_iter().map(|(variant, ty, _)| {
        let tag = variant.to_string();
        quote! {
            (
                #tag.to_string(),
                rt::Schema::lazy(#tag, <#ty as rt::RuntimeSchema>::runtime_schema),
            )
        }
    });
    let schema = quote! {
        rt::Schema::Discriminated {
            name: #type_name.to_string(),
            variants: vec![#(#alternatives),*],
        }
    };
    let ui = quote! { rt::UiSchema::vertical(vec![rt::UiControl::discriminant()]) };
    (schema, ui)
}

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let (schema, ui) = if shape.is_sum() {
        sum(shape)
    } else {
        record(shape)
    };
    quote! {
        impl rt::RuntimeSchema for #name {
            fn runtime_schema() -> rt::Schema {
                #schema
            }
        }

        impl rt::UiMetadata for #name {
            fn ui_schema() -> rt::UiSchema {
                #ui
            }
        }
    }
}
