//! `StructuralEquals`: identifier first, then properties in declaration
//! order; sums compare discriminants before payloads

use super::types::variants;
use super::{field_ident, type_ident};
use crate::model::{Cardinality, ShapeType};
use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let body = if shape.is_sum() {
        sum_body(shape)
    } else {
        record_body(shape)
    };
    quote! {
        impl rt::StructuralEquals for #name {
            fn structural_equals(&self, other: &Self) -> rt::EqualsResult {
                #body
            }
        }
    }
}

fn record_body(shape: &ShapeType) -> TokenStream {
    let comparisons = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        let key = &p.name;
        match p.cardinality {
            Cardinality::Required | Cardinality::Optional => {
                quote! { rt::equals::property(#key, &self.#field, &other.#field)?; }
            }
            Cardinality::Set | Cardinality::NonEmptySet => {
                quote! { rt::equals::set(#key, &self.#field, &other.#field)?; }
            }
            Cardinality::List => quote! { rt::equals::list(#key, &self.#field, &other.#field)?; },
        }
    });
    quote! {
        rt::equals::property(
            "@id",
            &rt::Shape::identifier(self),
            &rt::Shape::identifier(other),
        )?;
        #(#comparisons)*
        Ok(())
    }
}

fn sum_body(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let variants = variants(shape);
    let arms = variants.iter().map(|(variant, _, _)| {
        quote! {
            (#name::#variant(left), #name::#variant(right)) => {
                rt::StructuralEquals::structural_equals(left, right)
            }
        }
    });
    let mismatch = if variants.len() > 1 {
        quote! {
            _ => Err(rt::Inequality::discriminant(
                self.discriminant(),
                other.discriminant(),
            )),
        }
    } else {
        TokenStream::new()
    };
    quote! {
        match (self, other) {
            #(#arms)*
            #mismatch
        }
    }
}
