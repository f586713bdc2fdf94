//! Module assembly: banner, runtime import, emitted items, pretty-printed
//!
//! The output is meant to be `include!`d, so it carries no inner attributes
//! and imports nothing but the runtime alias.

use crate::config::ShapegenConfig;
use crate::error::Result;
use proc_macro2::TokenStream;
use quote::quote;

pub const GENERATED_BANNER: &str = "// @generated by fluree-shapegen. Do not edit.";

fn runtime_path(config: &ShapegenConfig) -> Result<syn::Path> {
    let path = config.runtime_crate.trim();
    let path = if path.starts_with("::") || path.starts_with("crate") {
        path.to_string()
    } else {
        format!("::{}", path)
    };
    Ok(syn::parse_str(&path)?)
}

/// Render `items` into the text of a complete module
pub fn assemble(config: &ShapegenConfig, items: TokenStream) -> Result<String> {
    let runtime = runtime_path(config)?;
    let tokens = quote! {
        #[allow(unused_imports)]
        use #runtime as rt;

        #items
    };
    let file: syn::File = syn::parse2(tokens)?;

    let mut out = String::from(GENERATED_BANNER);
    out.push('\n');
    if let Some(header) = &config.header {
        for line in header.lines() {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&prettyplease::unparse(&file));
    Ok(out)
}
