//! `ContentHash` and the identifier-free property feed
//!
//! `hash_properties` feeds every property in equality order and never the
//! identifier; content-hash minting calls it directly, so minting cannot
//! depend on the identifier it produces. `hash_content` prepends the
//! identifier. Sets are fed in element order (equality treats them as
//! multisets, hashing does not).

use super::types::variants;
use super::{field_ident, type_ident};
use crate::model::ShapeType;
use proc_macro2::TokenStream;
use quote::quote;

/// Inherent `hash_properties` of a record
pub(super) fn properties_fn(shape: &ShapeType) -> TokenStream {
    let feeds = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        let key = &p.name;
        quote! { rt::hash::property(#key, &self.#field, sink); }
    });
    let sink = if shape.properties.is_empty() {
        quote! { _sink }
    } else {
        quote! { sink }
    };
    quote! {
        /// Feed every property, never the identifier
        fn hash_properties<H: rt::HashSink + ?Sized>(&self, #sink: &mut H) {
            #(#feeds)*
        }
    }
}

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let body = if shape.is_sum() {
        let arms = variants(shape).into_iter().map(|(variant, _, _)| {
            quote! { #name::#variant(value) => rt::ContentHash::hash_content(value, sink) }
        });
        quote! {
            rt::HashSink::update_str(sink, self.discriminant());
            match self {
                #(#arms,)*
            }
        }
    } else {
        quote! {
            rt::hash::property("@id", &rt::Shape::identifier(self), sink);
            self.hash_properties(sink);
        }
    };
    quote! {
        impl rt::ContentHash for #name {
            fn hash_content<H: rt::HashSink + ?Sized>(&self, sink: &mut H) {
                #body
            }
        }
    }
}
