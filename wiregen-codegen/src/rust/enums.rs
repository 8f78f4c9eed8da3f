//! Enum code generation.
//!
//! Enums are open sets. Decoding uppercases the input, so `legacyValue`
//! reads as the unknown value `LEGACYVALUE` and is written back exactly that
//! way. The unknown payload is a runtime type only `from_wire` builds, so
//! every value stays canonical.

use super::{EmitContext, doc_attrs, value_derives};
use crate::naming::{enum_variant_ident, type_ident};
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::EnumDef;

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates an enum definition with its string codec.
    #[must_use]
    pub fn generate(&self, def: &EnumDef) -> TokenStream {
        let name = type_ident(&def.name.name);
        let docs = doc_attrs(def.docs.as_deref());
        let derives = value_derives(self.ctx.ir.is_orderable(&def.name), false, false);

        let variants: Vec<_> = def
            .values
            .iter()
            .map(|v| enum_variant_ident(&v.value))
            .collect();
        let wire: Vec<&str> = def.values.iter().map(|v| v.value.as_str()).collect();
        let variant_docs = def.values.iter().map(|v| doc_attrs(v.docs.as_deref()));
        let runtime = self.ctx.runtime;

        quote! {
            #docs
            #derives
            pub enum #name {
                #(
                    #variant_docs
                    #variants,
                )*
                /// A value unknown to this version of the schema, uppercased.
                Unknown(#runtime::enums::UnknownValue),
            }

            impl #name {
                /// Returns every known value, in declaration order.
                #[must_use]
                pub fn values() -> Vec<Self> {
                    vec![#(Self::#variants),*]
                }

                /// Decodes a wire value; the input is uppercased first.
                #[must_use]
                pub fn from_wire(value: &str) -> Self {
                    let value = value.to_uppercase();
                    match value.as_str() {
                        #(#wire => Self::#variants,)*
                        _ => Self::Unknown(#runtime::enums::UnknownValue::from_unmatched(value)),
                    }
                }

                /// Returns the canonical wire value.
                #[must_use]
                pub fn as_str(&self) -> &str {
                    match self {
                        #(Self::#variants => #wire,)*
                        Self::Unknown(value) => value.as_str(),
                    }
                }

                /// Returns true if the value is not one of the known values.
                #[must_use]
                pub fn is_unknown(&self) -> bool {
                    matches!(self, Self::Unknown(_))
                }
            }

            impl ::std::fmt::Display for #name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl ::std::str::FromStr for #name {
                type Err = ::std::convert::Infallible;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    Ok(Self::from_wire(value))
                }
            }

            impl serde::Serialize for #name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> serde::Deserialize<'de> for #name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                    Ok(Self::from_wire(&value))
                }
            }
        }
    }
}
