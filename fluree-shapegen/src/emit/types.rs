//! Type definitions, constructors, accessors and the `Shape` impl

use super::{
    doc, element_type, field_ident, field_type, graph, hash, ident, is_copy, str_slice,
    type_ident, visibility,
};
use crate::model::{
    Cardinality, IdentifierStrategy, Primitive, PropertyType, ShapeKind, ShapeType, ValueType,
    Visibility,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Constructors with more parameters than this get a clippy allowance
const MANY_ARGUMENTS: usize = 7;

pub(super) fn emit(shape: &ShapeType) -> TokenStream {
    if shape.is_sum() {
        sum(shape)
    } else {
        record(shape)
    }
}

fn type_doc(shape: &ShapeType) -> TokenStream {
    let text = match &shape.description {
        Some(description) => format!("{}\n\nShape: <{}>", description, shape.iri),
        None => format!("{}\n\nShape: <{}>", shape.label, shape.iri),
    };
    doc(Some(&text))
}

fn record(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let docs = type_doc(shape);
    let interface = shape.kind == ShapeKind::Interface;

    let identifier_type = if shape.identifier.is_lazy() {
        quote! { rt::LazyIdentifier }
    } else {
        quote! { rt::Identifier }
    };
    let fields = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        let ty = field_type(p);
        let docs = doc(p.description.as_deref());
        let vis = if interface {
            visibility(p.visibility)
        } else {
            TokenStream::new()
        };
        quote! {
            #docs
            #vis #field: #ty
        }
    });

    let consts = constants(shape);
    let constructor = constructor(shape);
    let accessors = if interface {
        TokenStream::new()
    } else {
        shape.properties.iter().map(accessor).collect()
    };
    let setters: TokenStream = if interface {
        TokenStream::new()
    } else {
        shape
            .properties
            .iter()
            .filter(|p| p.mutable)
            .map(|p| setter(shape, p))
            .collect()
    };
    let hash_properties = hash::properties_fn(shape);
    let shape_impl = record_shape_impl(shape);

    quote! {
        #docs
        #[derive(Debug, Clone)]
        pub struct #name {
            identifier: #identifier_type,
            #(#fields,)*
        }

        impl #name {
            #consts
            #constructor
            #accessors
            #setters
            #hash_properties
        }

        #shape_impl
    }
}

fn constants(shape: &ShapeType) -> TokenStream {
    let types = str_slice(&shape.write_types());
    let mut tokens = quote! {
        /// RDF types asserted on encode
        pub const RDF_TYPES: &'static [&'static str] = #types;
    };
    match &shape.identifier {
        IdentifierStrategy::MintedRandom { prefix }
        | IdentifierStrategy::MintedContentHash { prefix } => tokens.extend(quote! {
            /// Prefix of minted identifiers
            pub const IDENTIFIER_PREFIX: &'static str = #prefix;
        }),
        IdentifierStrategy::ConstrainedEnum { allowed } => {
            let allowed = str_slice(allowed);
            tokens.extend(quote! {
                /// The only identifiers an instance may have
                pub const ALLOWED_IDENTIFIERS: &'static [&'static str] = #allowed;
            });
        }
        IdentifierStrategy::ExplicitOnly | IdentifierStrategy::BlankOrNamed => {}
    }
    tokens
}

/// Constructor parameter type: the field type without boxing
fn param_type(property: &PropertyType) -> TokenStream {
    let element = element_type(&property.value);
    match property.cardinality {
        Cardinality::Required => element,
        Cardinality::Optional => quote! { Option<#element> },
        Cardinality::Set | Cardinality::NonEmptySet | Cardinality::List => {
            quote! { Vec<#element> }
        }
    }
}

/// Convert an unboxed parameter named `value` into the stored field value
fn store(property: &PropertyType, value: &TokenStream) -> TokenStream {
    if !property.is_boxed() {
        return value.clone();
    }
    match property.cardinality {
        Cardinality::Optional => quote! { #value.map(Box::new) },
        _ => quote! { Box::new(#value) },
    }
}

fn non_empty_check(shape: &ShapeType, property: &PropertyType, value: &TokenStream) -> TokenStream {
    if property.cardinality != Cardinality::NonEmptySet {
        return TokenStream::new();
    }
    let type_name = &shape.name;
    let key = &property.name;
    quote! {
        if #value.is_empty() {
            return Err(rt::DecodeError::EmptyNonEmptySet {
                focus: #type_name.to_string(),
                predicate: #key.to_string(),
            });
        }
    }
}

fn constructor(shape: &ShapeType) -> TokenStream {
    let type_name = &shape.name;
    let identifier_param = if shape.identifier.is_lazy() {
        quote! { identifier: Option<rt::Identifier> }
    } else {
        quote! { identifier: rt::Identifier }
    };
    let identifier_init = if shape.identifier.is_lazy() {
        quote! { rt::LazyIdentifier::new(identifier) }
    } else {
        quote! { identifier }
    };
    let identifier_check = match &shape.identifier {
        IdentifierStrategy::ConstrainedEnum { .. } => quote! {
            if !identifier
                .as_iri()
                .is_some_and(|iri| Self::ALLOWED_IDENTIFIERS.contains(&iri))
            {
                return Err(rt::DecodeError::mistyped(
                    #type_name,
                    "@id",
                    format!("one of {}", Self::ALLOWED_IDENTIFIERS.join(", ")),
                    identifier.to_string(),
                ));
            }
        },
        _ => TokenStream::new(),
    };

    let params = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        let ty = param_type(p);
        quote! { #field: #ty }
    });
    let checks = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        non_empty_check(shape, p, &quote! { #field })
    });
    let inits = shape.properties.iter().map(|p| {
        let field = field_ident(p);
        if p.is_boxed() {
            let value = store(p, &quote! { #field });
            quote! { #field: #value }
        } else {
            quote! { #field }
        }
    });
    let allow = if shape.properties.len() + 1 > MANY_ARGUMENTS {
        quote! { #[allow(clippy::too_many_arguments)] }
    } else {
        TokenStream::new()
    };

    quote! {
        #allow
        pub fn new(
            #identifier_param,
            #(#params,)*
        ) -> Result<Self, rt::DecodeError> {
            #identifier_check
            #(#checks)*
            Ok(Self {
                identifier: #identifier_init,
                #(#inits,)*
            })
        }
    }
}

fn accessor_signature(property: &PropertyType) -> (TokenStream, TokenStream) {
    let field = field_ident(property);
    let element = element_type(&property.value);
    let string = property.value == ValueType::Primitive(Primitive::String);
    match property.cardinality {
        Cardinality::Required if is_copy(&property.value) => (element, quote! { self.#field }),
        Cardinality::Required if string => (quote! { &str }, quote! { &self.#field }),
        Cardinality::Required => (quote! { &#element }, quote! { &self.#field }),
        Cardinality::Optional if is_copy(&property.value) => {
            (quote! { Option<#element> }, quote! { self.#field })
        }
        Cardinality::Optional if string => {
            (quote! { Option<&str> }, quote! { self.#field.as_deref() })
        }
        Cardinality::Optional if property.is_boxed() => {
            (quote! { Option<&#element> }, quote! { self.#field.as_deref() })
        }
        Cardinality::Optional => (quote! { Option<&#element> }, quote! { self.#field.as_ref() }),
        Cardinality::Set | Cardinality::NonEmptySet | Cardinality::List => {
            (quote! { &[#element] }, quote! { &self.#field })
        }
    }
}

fn accessor(property: &PropertyType) -> TokenStream {
    let field = field_ident(property);
    let vis = visibility(property.visibility);
    let docs = doc(property.description.as_deref());
    let allow = if property.visibility == Visibility::Private {
        quote! { #[allow(dead_code)] }
    } else {
        TokenStream::new()
    };
    let (ret, body) = accessor_signature(property);
    quote! {
        #docs
        #allow
        #vis fn #field(&self) -> #ret {
            #body
        }
    }
}

fn setter(shape: &ShapeType, property: &PropertyType) -> TokenStream {
    let field = field_ident(property);
    let name = format_ident!("set_{}", property.field);
    let vis = visibility(property.visibility);
    let ty = param_type(property);
    let value = store(property, &quote! { value });
    let reset = match shape.identifier {
        IdentifierStrategy::MintedContentHash { .. } => quote! { self.identifier.reset(); },
        _ => TokenStream::new(),
    };
    let allow = if property.visibility == Visibility::Private {
        quote! { #[allow(dead_code)] }
    } else {
        TokenStream::new()
    };

    if property.cardinality == Cardinality::NonEmptySet {
        let check = non_empty_check(shape, property, &quote! { value });
        quote! {
            #allow
            #vis fn #name(&mut self, value: #ty) -> Result<(), rt::DecodeError> {
                #check
                self.#field = #value;
                #reset
                Ok(())
            }
        }
    } else {
        quote! {
            #allow
            #vis fn #name(&mut self, value: #ty) {
                self.#field = #value;
                #reset
            }
        }
    }
}

fn identifier_body(shape: &ShapeType) -> TokenStream {
    match &shape.identifier {
        IdentifierStrategy::ExplicitOnly | IdentifierStrategy::ConstrainedEnum { .. } => {
            quote! { self.identifier.clone() }
        }
        IdentifierStrategy::BlankOrNamed => quote! {
            self.identifier.get_or_mint(rt::Identifier::fresh_blank).clone()
        },
        IdentifierStrategy::MintedRandom { .. } => quote! {
            self.identifier
                .get_or_mint(|| rt::identifier::mint_random(Self::IDENTIFIER_PREFIX))
                .clone()
        },
        IdentifierStrategy::MintedContentHash { .. } => quote! {
            self.identifier
                .get_or_mint(|| {
                    rt::identifier::mint_content_hash(Self::IDENTIFIER_PREFIX, |sink| {
                        self.hash_properties(sink)
                    })
                })
                .clone()
        },
    }
}

fn record_shape_impl(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let type_name = &shape.name;
    let identifier = identifier_body(shape);
    let decode = graph::decode_record(shape);
    quote! {
        impl rt::Shape for #name {
            const TYPE_NAME: &'static str = #type_name;

            fn identifier(&self) -> rt::Identifier {
                #identifier
            }

            fn from_graph_with(
                graph: &rt::Graph,
                focus: &rt::Term,
                options: rt::DecodeOptions,
            ) -> rt::DecodeResult<Self> {
                #decode
            }
        }
    }
}

/// Variant identifier and payload type of each member
pub(super) fn variants(shape: &ShapeType) -> Vec<(proc_macro2::Ident, TokenStream, bool)> {
    shape
        .members
        .iter()
        .map(|member| {
            let variant = ident(member.type_name());
            let ty = quote! { #variant };
            (variant, ty, member.boxed)
        })
        .collect()
}

/// Wrap a member value named by `value` into the sum variant
pub(super) fn wrap_variant(
    shape: &ShapeType,
    variant: &proc_macro2::Ident,
    boxed: bool,
    value: TokenStream,
) -> TokenStream {
    let name = type_ident(shape);
    if boxed {
        quote! { #name::#variant(Box::new(#value)) }
    } else {
        quote! { #name::#variant(#value) }
    }
}

fn sum(shape: &ShapeType) -> TokenStream {
    let name = type_ident(shape);
    let type_name = &shape.name;
    let docs = type_doc(shape);
    let variants = variants(shape);
    let members: Vec<String> = shape
        .members
        .iter()
        .map(|m| m.type_name().to_string())
        .collect();
    let member_slice = str_slice(&members);

    let definitions = variants.iter().map(|(variant, ty, boxed)| {
        if *boxed {
            quote! { #variant(Box<#ty>) }
        } else {
            quote! { #variant(#ty) }
        }
    });
    let discriminants = variants.iter().map(|(variant, _, _)| {
        let tag = variant.to_string();
        quote! { #name::#variant(_) => #tag }
    });
    let identifiers = variants.iter().map(|(variant, _, boxed)| {
        let value = if *boxed {
            quote! { &**value }
        } else {
            quote! { value }
        };
        quote! { #name::#variant(value) => rt::Shape::identifier(#value) }
    });
    let conversions = variants.iter().map(|(variant, ty, boxed)| {
        let wrapped = wrap_variant(shape, variant, *boxed, quote! { value });
        quote! {
            impl From<#ty> for #name {
                fn from(value: #ty) -> Self {
                    #wrapped
                }
            }
        }
    });
    let decode = graph::decode_sum(shape);
    let kind_doc = match shape.kind {
        ShapeKind::Abstract => " Concrete subtypes, selected by the document `type` key",
        _ => " Member types, selected by the document `type` key",
    };

    quote! {
        #docs
        #[derive(Debug, Clone)]
        pub enum #name {
            #(#definitions,)*
        }

        impl #name {
            #[doc = #kind_doc]
            pub const MEMBERS: &'static [&'static str] = #member_slice;

            /// Type name of the held member
            pub fn discriminant(&self) -> &'static str {
                match self {
                    #(#discriminants,)*
                }
            }
        }

        #(#conversions)*

        impl rt::Shape for #name {
            const TYPE_NAME: &'static str = #type_name;

            fn identifier(&self) -> rt::Identifier {
                match self {
                    #(#identifiers,)*
                }
            }

            fn from_graph_with(
                graph: &rt::Graph,
                focus: &rt::Term,
                options: rt::DecodeOptions,
            ) -> rt::DecodeResult<Self> {
                #decode
            }
        }
    }
}
