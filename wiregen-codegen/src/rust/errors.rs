//! Error code generation.
//!
//! Each declared error becomes a parameter record plus an immutable holder.
//! The safe/unsafe split is exposed for logging only: every parameter is
//! part of the wire envelope. Decoding the envelope never fails because of
//! the parameters payload; a payload that does not fit leaves the holder
//! without parameters.

use super::objects::ObjectGenerator;
use super::{EmitContext, doc_attrs, value_derives};
use crate::naming::{companion_ident, field_ident, ident, type_ident};
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::ir::enum_variant_name;
use wiregen_schema::{ErrorDef, Safety};

/// Suffix of the parameter record.
pub const PARAMETERS_SUFFIX: &str = "Parameters";

/// Generator for error definitions.
pub struct ErrorGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> ErrorGenerator<'a> {
    /// Creates a new error generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the parameter record, the holder and its trait impls.
    #[must_use]
    pub fn generate(&self, def: &ErrorDef) -> TokenStream {
        let parameters = self.generate_parameters(def);
        let holder = self.generate_holder(def);
        let codec = self.generate_codec(def);
        let server = if self.ctx.config.emits_server_extras() {
            self.generate_server_extras(def)
        } else {
            TokenStream::new()
        };

        quote! {
            #parameters
            #holder
            #codec
            #server
        }
    }

    fn generate_parameters(&self, def: &ErrorDef) -> TokenStream {
        let name = companion_ident(&def.name.name, PARAMETERS_SUFFIX);
        let doc = format!(" Parameters of `{}`, safe ones first.", def.wire_name());
        let orderable = def
            .params
            .iter()
            .all(|p| self.ctx.ir.is_orderable_ref(&p.type_ref));
        let derives = value_derives(orderable, false, true);
        let objects = ObjectGenerator::new(self.ctx);
        let fields = def
            .params
            .iter()
            .map(|p| objects.field(&p.name, &p.type_ref, p.docs.as_deref(), false));

        quote! {
            #[doc = #doc]
            #derives
            pub struct #name {
                #(#fields)*
            }
        }
    }

    fn generate_holder(&self, def: &ErrorDef) -> TokenStream {
        let runtime = self.ctx.runtime;
        let name = type_ident(&def.name.name);
        let parameters = companion_ident(&def.name.name, PARAMETERS_SUFFIX);
        let docs = doc_attrs(def.docs.as_deref());
        let code = ident(&enum_variant_name(def.code.as_str()));
        let wire_name = def.wire_name();
        let types = self.ctx.types();

        let names_of = |safety: Safety| -> Vec<&str> {
            def.params
                .iter()
                .filter(|p| p.safety == safety)
                .map(|p| p.name.as_str())
                .collect()
        };
        let safe_args = names_of(Safety::Safe);
        let unsafe_args = names_of(Safety::Unsafe);

        let args: Vec<_> = def.params.iter().map(|p| field_ident(&p.name)).collect();
        let arg_types = def.params.iter().map(|p| types.stored(&p.type_ref, false));
        let too_many = if def.params.len() > 7 {
            quote! { #[allow(clippy::too_many_arguments)] }
        } else {
            TokenStream::new()
        };

        quote! {
            #docs
            #[derive(Debug, Clone, PartialEq)]
            pub struct #name {
                error_instance_id: #runtime::uuid::Uuid,
                parameters: Option<#parameters>,
            }

            impl #name {
                /// Error category.
                pub const CODE: #runtime::ErrorCode = #runtime::ErrorCode::#code;
                /// Namespaced error name.
                pub const NAME: &'static str = #wire_name;
                /// Parameters that may be logged in cleartext.
                pub const SAFE_ARGS: &'static [&'static str] = &[#(#safe_args),*];
                /// Parameters that must not be logged in cleartext.
                pub const UNSAFE_ARGS: &'static [&'static str] = &[#(#unsafe_args),*];

                /// Creates the error with a fresh instance identifier.
                #too_many
                #[must_use]
                pub fn new(#(#args: #arg_types),*) -> Self {
                    Self::from_parameters(#parameters { #(#args),* })
                }

                /// Creates the error from its parameter record with a fresh
                /// instance identifier.
                #[must_use]
                pub fn from_parameters(parameters: #parameters) -> Self {
                    Self {
                        error_instance_id: #runtime::uuid::Uuid::new_v4(),
                        parameters: Some(parameters),
                    }
                }

                /// Returns the instance identifier.
                #[must_use]
                pub fn error_instance_id(&self) -> #runtime::uuid::Uuid {
                    self.error_instance_id
                }

                /// Returns the typed parameters, if they were present and well formed.
                #[must_use]
                pub fn params(&self) -> Option<&#parameters> {
                    self.parameters.as_ref()
                }

                /// Returns the parameters that may be logged in cleartext.
                #[must_use]
                pub fn safe_params(&self) -> serde_json::Map<String, serde_json::Value> {
                    self.select(Self::SAFE_ARGS)
                }

                /// Returns the parameters that must not be logged in cleartext.
                #[must_use]
                pub fn unsafe_params(&self) -> serde_json::Map<String, serde_json::Value> {
                    self.select(Self::UNSAFE_ARGS)
                }

                fn select(&self, names: &[&str]) -> serde_json::Map<String, serde_json::Value> {
                    #runtime::ErrorType::parameters(self)
                        .into_iter()
                        .filter(|(key, _)| names.contains(&key.as_str()))
                        .collect()
                }
            }

            impl #runtime::ErrorType for #name {
                fn code(&self) -> #runtime::ErrorCode {
                    Self::CODE
                }

                fn name(&self) -> &str {
                    Self::NAME
                }

                fn instance_id(&self) -> #runtime::uuid::Uuid {
                    self.error_instance_id
                }

                fn safe_args(&self) -> &'static [&'static str] {
                    Self::SAFE_ARGS
                }

                fn parameters(&self) -> serde_json::Map<String, serde_json::Value> {
                    match self.parameters.as_ref().map(serde_json::to_value) {
                        Some(Ok(serde_json::Value::Object(map))) => map,
                        _ => serde_json::Map::new(),
                    }
                }
            }

            impl ::std::fmt::Display for #name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    #runtime::errors::fmt_error(self, f)
                }
            }

            impl ::std::error::Error for #name {}
        }
    }

    fn generate_codec(&self, def: &ErrorDef) -> TokenStream {
        let runtime = self.ctx.runtime;
        let name = type_ident(&def.name.name);

        quote! {
            impl serde::Serialize for #name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serde::Serialize::serialize(&#runtime::SerializableError::from_error(self), serializer)
                }
            }

            impl<'de> serde::Deserialize<'de> for #name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let envelope = <#runtime::SerializableError as serde::Deserialize>::deserialize(deserializer)?;
                    let error_instance_id = envelope.error_instance_id();
                    let parameters = serde_json::from_value(envelope.into_parameters()).ok();
                    Ok(Self {
                        error_instance_id,
                        parameters,
                    })
                }
            }
        }
    }

    fn generate_server_extras(&self, def: &ErrorDef) -> TokenStream {
        let runtime = self.ctx.runtime;
        let name = type_ident(&def.name.name);

        quote! {
            impl #name {
                /// Returns the HTTP status code of the error category.
                #[must_use]
                pub fn status_code(&self) -> u16 {
                    Self::CODE.status_code()
                }
            }

            impl ::std::convert::From<#name> for #runtime::SerializableError {
                fn from(error: #name) -> Self {
                    Self::from_error(&error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::rust::testing::{document, render};
    use wiregen_core::ErrorCode;

    const ERROR: &str = r#"{"errorName": {"name": "ShapeNotFound", "package": "shapes"},
        "namespace": "Shapes", "code": "NOT_FOUND", "docs": "No shape with that id.",
        "safeArgs": [{"fieldName": "shapeId", "type": {"type": "primitive", "primitive": "STRING"}}],
        "unsafeArgs": [{"fieldName": "owner", "type": {"type": "optional",
            "optional": {"itemType": {"type": "primitive", "primitive": "STRING"}}}}]}"#;

    #[test]
    fn test_every_code_maps_to_a_runtime_variant() {
        for code in ErrorCode::ALL {
            assert_eq!(enum_variant_name(code.as_str()), format!("{code:?}"));
        }
    }

    #[test]
    fn test_error_holder() {
        let json = document("", ERROR);
        let code = render(&json, &GeneratorConfig::new(), "shapes", "errors");
        assert!(code.contains("pub struct ShapeNotFoundParameters {"));
        assert!(code.contains("pub shape_id: String,"));
        assert!(code.contains("pub owner: Option<String>,"));
        assert!(code.contains("/// No shape with that id."));
        assert!(code.contains("pub struct ShapeNotFound {"));
        assert!(code.contains("wiregen_core::ErrorCode::NotFound"));
        assert!(code.contains("\"Shapes:ShapeNotFound\""));
        assert!(code.contains("&[\"shapeId\"]"));
        assert!(code.contains("&[\"owner\"]"));
        assert!(code.contains("pub fn new(shape_id: String, owner: Option<String>) -> Self"));
        assert!(code.contains("impl wiregen_core::ErrorType for ShapeNotFound"));
        assert!(!code.contains("status_code"));
    }

    #[test]
    fn test_parameters_are_safe_first() {
        let json = document("", ERROR);
        let code = render(&json, &GeneratorConfig::new(), "shapes", "errors");
        let safe = code.find("pub shape_id").expect("safe field");
        let unsafe_ = code.find("pub owner").expect("unsafe field");
        assert!(safe < unsafe_);
    }

    #[test]
    fn test_server_extras() {
        let json = document("", ERROR);
        let config = GeneratorConfig::new().server_extras(true);
        let code = render(&json, &config, "shapes", "errors");
        assert!(code.contains("pub fn status_code(&self) -> u16"));
        assert!(code.contains("impl ::std::convert::From<ShapeNotFound> for wiregen_core::SerializableError"));
    }

    #[test]
    fn test_custom_runtime_path() {
        let json = document("", ERROR);
        let config = GeneratorConfig::new().runtime_crate("::runtime::core");
        let code = render(&json, &config, "shapes", "errors");
        assert!(code.contains("::runtime::core::ErrorCode::NotFound"));
        assert!(!code.contains("wiregen_core"));
    }
}
