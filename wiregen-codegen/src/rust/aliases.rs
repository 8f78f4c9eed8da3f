//! Alias code generation.
//!
//! An alias is a distinct newtype, never an erased synonym. Its wire form is
//! the wire form of its target, one level down: an alias of an alias
//! delegates to the inner alias, which delegates to the leaf.

use super::{EmitContext, doc_attrs, value_derives};
use crate::naming::type_ident;
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::AliasDef;

/// Generator for alias definitions.
pub struct AliasGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> AliasGenerator<'a> {
    /// Creates a new alias generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates one alias newtype with its conversions.
    #[must_use]
    pub fn generate(&self, alias: &AliasDef) -> TokenStream {
        let name = type_ident(&alias.name.name);
        let docs = doc_attrs(alias.docs.as_deref());
        let boxed = self.ctx.ir.indirections().alias_needs_box(&alias.name);
        let target = self.ctx.types().stored(&alias.target, boxed);

        let orderable = self.ctx.ir.is_orderable(&alias.name);
        let default = self.ctx.ir.registry().is_collection(&alias.target);
        let derives = value_derives(orderable, default, true);

        quote! {
            #docs
            #derives
            #[serde(transparent)]
            pub struct #name(pub #target);

            impl #name {
                /// Wraps a value.
                #[must_use]
                pub fn new(value: impl ::std::convert::Into<#target>) -> Self {
                    Self(value.into())
                }

                /// Returns the wrapped value.
                #[must_use]
                pub fn into_inner(self) -> #target {
                    self.0
                }
            }

            impl ::std::convert::From<#target> for #name {
                fn from(value: #target) -> Self {
                    Self(value)
                }
            }

            impl ::std::ops::Deref for #name {
                type Target = #target;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl ::std::ops::DerefMut for #name {
                fn deref_mut(&mut self) -> &mut Self::Target {
                    &mut self.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GeneratorConfig;
    use crate::rust::testing::{document, render};

    #[test]
    fn test_alias_newtype() {
        let json = document(
            r#"{"type": "alias", "alias": {
                "typeName": {"name": "UserId", "package": "users"},
                "alias": {"type": "primitive", "primitive": "STRING"},
                "docs": "Opaque user identifier."}}"#,
            "",
        );
        let code = render(&json, &GeneratorConfig::new(), "users", "aliases");
        assert!(code.contains("/// Opaque user identifier."));
        assert!(code.contains("Hash"));
        assert!(code.contains("serde::Deserialize"));
        assert!(code.contains("#[serde(transparent)]"));
        assert!(code.contains("pub struct UserId(pub String);"));
        assert!(code.contains("impl ::std::convert::From<String> for UserId"));
        assert!(code.contains("impl ::std::ops::Deref for UserId"));
    }

    #[test]
    fn test_collection_alias_has_default() {
        let json = document(
            r#"{"type": "alias", "alias": {
                "typeName": {"name": "Scores", "package": "stats"},
                "alias": {"type": "list", "list": {"itemType":
                    {"type": "primitive", "primitive": "DOUBLE"}}}}}"#,
            "",
        );
        let code = render(&json, &GeneratorConfig::new(), "stats", "aliases");
        assert!(code.contains("PartialEq, Default"));
        assert!(!code.contains("Hash"));
        assert!(code.contains("pub struct Scores(pub Vec<f64>);"));
    }
}
