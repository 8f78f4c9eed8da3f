//! Rust code emitters, one per construct kind.
//!
//! Every emitter is a pure function of the declaration, the analyzed IR and
//! the file's [`ImportSet`]: the same input always yields the same tokens.

pub mod aliases;
pub mod enums;
pub mod errors;
pub mod objects;
pub mod types;
pub mod unions;
pub mod visitors;

pub use aliases::AliasGenerator;
pub use enums::EnumGenerator;
pub use errors::ErrorGenerator;
pub use objects::ObjectGenerator;
pub use types::TypeMapper;
pub use unions::UnionGenerator;
pub use visitors::VisitorGenerator;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::GeneratorConfig;
use crate::imports::ImportSet;
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::SchemaIr;

/// Everything an emitter needs to know about the file it writes into.
#[derive(Clone, Copy)]
pub struct EmitContext<'a> {
    /// Analyzed IR.
    pub ir: &'a SchemaIr,
    /// Generator options.
    pub config: &'a GeneratorConfig,
    /// Path of the runtime crate.
    pub runtime: &'a syn::Path,
    /// Imports of the current file.
    pub imports: &'a ImportSet,
}

impl<'a> EmitContext<'a> {
    /// Returns a type mapper for this file.
    #[must_use]
    pub const fn types(&self) -> TypeMapper<'a> {
        TypeMapper::new(self.imports, self.runtime)
    }

    /// Returns the runtime path as a string usable inside serde attributes.
    #[must_use]
    pub fn runtime_str(&self) -> String {
        let runtime = self.runtime;
        quote!(#runtime).to_string().replace(' ', "")
    }
}

/// Emits one `#[doc]` attribute per documentation line.
#[must_use]
pub fn doc_attrs(docs: Option<&str>) -> TokenStream {
    let Some(docs) = docs.map(str::trim).filter(|d| !d.is_empty()) else {
        return TokenStream::new();
    };
    let lines = docs.lines().map(|line| format!(" {}", line.trim_end()));
    quote! { #(#[doc = #lines])* }
}

/// Emits the derive list shared by value types.
#[must_use]
pub fn value_derives(orderable: bool, default: bool, serde: bool) -> TokenStream {
    let mut derives = vec![quote!(Debug), quote!(Clone), quote!(PartialEq)];
    if orderable {
        derives.extend([quote!(Eq), quote!(PartialOrd), quote!(Ord), quote!(Hash)]);
    }
    if default {
        derives.push(quote!(Default));
    }
    if serde {
        derives.extend([quote!(serde::Serialize), quote!(serde::Deserialize)]);
    }
    quote! { #[derive(#(#derives),*)] }
}
