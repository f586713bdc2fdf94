//! Document codec: `DocumentValue` impls
//!
//! Records write `@id`, the `type` discriminant and one key per property;
//! sums delegate to the member and decode by dispatching on `type`.

use super::types::{variants, wrap_variant};
use super::{default_value, field_ident, type_ident};
use crate::model::{Cardinality, PropertyType, ShapeType};
use proc_macro2::TokenStream;
use quote::quote;

fn encode_property(property: &PropertyType) -> TokenStream {
    let field = field_ident(property);
    let key = &property.name;
    match property.cardinality {
        Cardinality::Required => quote! { writer.value(#key, &self.#field); },
        Cardinality::Optional => quote! { writer.optional(#key, self.#field.as_ref()); },
        Cardinality::Set | Cardinality::NonEmptySet | Cardinality::List => {
            quote! { writer.many(#key, &self.#field); }
        }
    }
}

fn decode_argument(property: &PropertyType) -> TokenStream {
    let key = &property.name;
    match property.cardinality {
        Cardinality::Required => match &property.default {
            Some(default) => {
                let value = default_value(property, default);
                quote! { reader.optional(#key)?.unwrap_or_else(|| #value) }
            }
            None => quote! { reader.required(#key)? },
        },
        Cardinality::Optional => quote! { reader.optional(#key)? },
        Cardinality::Set | Cardinality::List => quote! { reader.many(#key)? },
        Cardinality::NonEmptySet => quote! { reader.non_empty(#key)? },
    }
}

fn record(shape: &ShapeType) -> (TokenStream, TokenStream) {
    let type_name = &shape.name;
    let writes = shape.properties.iter().map(encode_property);
    let encode = quote! {
        let mut writer = rt::DocumentWriter::new(#type_name, &rt::Shape::identifier(self));
        #(#writes)*
        writer.finish()
    };

    let identifier = if shape.identifier.is_lazy() {
        quote! { reader.identifier()? }
    } else {
        quote! { reader.required_identifier()? }
    };
    let arguments = shape.properties.iter().map(decode_argument);
    let decode = quote! {
        let reader = rt::DocumentReader::new(value, #type_name, cx)?;
        reader.expect_discriminant(#type_name)?;
        Self::new(
            #identifier,
            #(#arguments,)*
        )
    };
    (encode, decode)
}

fn sum(shape: &ShapeType) -> (TokenStream, TokenStream) {
    let name = type_ident(shape);
    let type_name = &shape.name;
    let variants = variants(shape);

    let encode_arms = variants.iter().map(|(variant, _, _)| {
        quote! { #name::#variant(value) => rt::DocumentValue::to_document(value) }
    });
    let encode = quote! {
        match self {
            #(#encode_arms,)*
        }
    };

    let decode_arms = variants.iter().map(|(variant, ty, boxed)| {
        let tag = variant.to_string();
        let wrapped = wrap_variant(shape, variant, *boxed, quote! { member });
        quote! {
            #tag => <#ty as rt::DocumentValue>::from_document_value(value, cx)
                .map(|member| #wrapped)
        }
    });
    let decode = quote! {
        let reader = rt::DocumentReader::new(value, #type_name, cx)?;
        match reader.discriminant()? {
            #(#decode_arms,)*
            other => Err(reader.unknown_discriminant(other, Self::MEMBERS)),
        }
    };
    (encode, decode)
}

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let (encode, decode) = if shape.is_sum() {
        sum(shape)
    } else {
        record(shape)
    };
    quote! {
        impl rt::DocumentValue for #name {
            fn to_document(&self) -> rt::Value {
                #encode
            }

            fn from_document_value(
                value: &rt::Value,
                cx: &rt::DocumentContext<'_>,
            ) -> rt::DecodeResult<Self> {
                #decode
            }
        }
    }
}
