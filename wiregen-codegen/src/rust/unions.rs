//! Union code generation.
//!
//! A union is a native Rust enum with one variant per member plus an
//! `Unknown` variant that keeps an unrecognized tag and its raw value, so a
//! reader compiled against an older schema degrades instead of failing.
//! The dynamic visitor trait dispatches over the same arms.

use super::{EmitContext, doc_attrs, value_derives};
use crate::naming::{companion_ident, member_variant_ident, type_ident, visit_method_ident};
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::UnionDef;

/// Suffix of the dynamic visitor trait.
pub const VISITOR_SUFFIX: &str = "Visitor";

/// Generator for union definitions.
pub struct UnionGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> UnionGenerator<'a> {
    /// Creates a new union generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the union enum, its codec and its visitor trait.
    #[must_use]
    pub fn generate(&self, def: &UnionDef) -> TokenStream {
        let name = type_ident(&def.name.name);
        let visitor = companion_ident(&def.name.name, VISITOR_SUFFIX);
        let docs = doc_attrs(def.docs.as_deref());
        let derives = value_derives(false, false, false);
        let runtime = self.ctx.runtime;
        let types = self.ctx.types();
        let indirections = self.ctx.ir.indirections();

        let mut variants = Vec::with_capacity(def.members.len());
        let mut variant_defs = Vec::with_capacity(def.members.len());
        let mut methods = Vec::with_capacity(def.members.len());
        let mut method_defs = Vec::with_capacity(def.members.len());
        for member in &def.members {
            let boxed = indirections.needs_box(&def.name, &member.tag);
            let variant = member_variant_ident(&member.tag);
            let method = visit_method_ident(&member.tag);
            let stored = types.stored(&member.type_ref, boxed);
            let viewed = types.viewed(&member.type_ref, boxed);
            let member_docs = doc_attrs(member.docs.as_deref());

            variant_defs.push(quote! {
                #member_docs
                #variant(#stored),
            });
            method_defs.push(quote! {
                /// Visits the member.
                fn #method(&mut self, value: &#viewed);
            });
            variants.push(variant);
            methods.push(method);
        }
        let tags: Vec<&str> = def.members.iter().map(|m| m.tag.as_str()).collect();
        let visitor_doc = format!(" Dynamic visitor over [`{}`].", def.name.name);

        quote! {
            #docs
            #derives
            pub enum #name {
                #(#variant_defs)*
                /// A member unknown to this version of the schema.
                Unknown(#runtime::union::UnknownMember),
            }

            impl #name {
                /// Returns the discriminant tag.
                #[must_use]
                pub fn tag(&self) -> &str {
                    match self {
                        #(Self::#variants(_) => #tags,)*
                        Self::Unknown(unknown) => unknown.tag(),
                    }
                }

                /// Returns true if the member is not one of the known members.
                #[must_use]
                pub fn is_unknown(&self) -> bool {
                    matches!(self, Self::Unknown(_))
                }

                /// Dispatches to the visitor method of the populated member.
                pub fn accept(&self, visitor: &mut dyn #visitor) {
                    match self {
                        #(Self::#variants(value) => visitor.#methods(value),)*
                        Self::Unknown(unknown) => visitor.visit_unknown(unknown.tag()),
                    }
                }
            }

            #[doc = #visitor_doc]
            pub trait #visitor {
                #(#method_defs)*

                /// Receives the raw tag of a member unknown to this schema version.
                fn visit_unknown(&mut self, tag: &str);
            }

            impl serde::Serialize for #name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    match self {
                        #(Self::#variants(value) => #runtime::union::serialize_member(serializer, #tags, value),)*
                        Self::Unknown(unknown) => serde::Serialize::serialize(unknown, serializer),
                    }
                }
            }

            impl<'de> serde::Deserialize<'de> for #name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let member = <#runtime::union::TaggedMember as serde::Deserialize>::deserialize(deserializer)?;
                    match member.tag() {
                        #(#tags => #runtime::union::decode_member(member.into_value()).map(Self::#variants),)*
                        _ => Ok(Self::Unknown(#runtime::union::UnknownMember::from_unmatched(member))),
                    }
                }
            }
        }
    }
}
