//! Object (record) code generation.

use super::{EmitContext, doc_attrs, value_derives};
use crate::naming::{field_ident, type_ident};
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::{ObjectDef, TypeReference};

/// Generator for object definitions.
pub struct ObjectGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> ObjectGenerator<'a> {
    /// Creates a new object generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates a record struct.
    #[must_use]
    pub fn generate(&self, def: &ObjectDef) -> TokenStream {
        let name = type_ident(&def.name.name);
        let docs = doc_attrs(def.docs.as_deref());
        let derives = value_derives(self.ctx.ir.is_orderable(&def.name), false, true);
        let indirections = self.ctx.ir.indirections();
        let fields = def.fields.iter().map(|field| {
            self.field(
                &field.name,
                &field.type_ref,
                field.docs.as_deref(),
                indirections.needs_box(&def.name, &field.name),
            )
        });

        quote! {
            #docs
            #derives
            pub struct #name {
                #(#fields)*
            }
        }
    }

    /// Generates one public record field.
    ///
    /// The wire name is always pinned with `rename`. Collection fields
    /// decode a missing or null value as empty; optional fields are left out
    /// when absent.
    #[must_use]
    pub fn field(
        &self,
        wire_name: &str,
        reference: &TypeReference,
        docs: Option<&str>,
        boxed: bool,
    ) -> TokenStream {
        let ident = field_ident(wire_name);
        let docs = doc_attrs(docs);
        let ty = self.ctx.types().stored(reference, boxed);

        let serde_attr = if self.ctx.ir.registry().is_collection(reference) {
            let canonicalize = format!("{}::collections::null_as_default", self.ctx.runtime_str());
            quote! {
                #[serde(rename = #wire_name, default, deserialize_with = #canonicalize)]
            }
        } else if matches!(reference, TypeReference::Optional(_)) {
            quote! {
                #[serde(rename = #wire_name, default, skip_serializing_if = "Option::is_none")]
            }
        } else {
            quote! { #[serde(rename = #wire_name)] }
        };

        quote! {
            #docs
            #serde_attr
            pub #ident: #ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GeneratorConfig;
    use crate::rust::testing::{document, render};

    const TYPES: &str = r#"
        {"type": "alias", "alias": {
            "typeName": {"name": "Tags", "package": "model"},
            "alias": {"type": "set", "set": {"itemType": {"type": "primitive", "primitive": "STRING"}}}}},
        {"type": "object", "object": {
            "typeName": {"name": "TreeNode", "package": "model"},
            "docs": "A node.",
            "fields": [
                {"fieldName": "label", "type": {"type": "primitive", "primitive": "STRING"}},
                {"fieldName": "createdAt", "type": {"type": "primitive", "primitive": "DATETIME"}},
                {"fieldName": "parent", "type": {"type": "optional", "optional": {"itemType":
                    {"type": "reference", "reference": {"name": "TreeNode", "package": "model"}}}}},
                {"fieldName": "children", "type": {"type": "list", "list": {"itemType":
                    {"type": "reference", "reference": {"name": "TreeNode", "package": "model"}}}}},
                {"fieldName": "tags", "type": {"type": "reference",
                    "reference": {"name": "Tags", "package": "model"}}},
                {"fieldName": "type", "type": {"type": "primitive", "primitive": "INTEGER"}}
            ]}}"#;

    fn code() -> String {
        render(&document(TYPES, ""), &GeneratorConfig::new(), "model", "objects")
    }

    #[test]
    fn test_field_names_and_types() {
        let code = code();
        assert!(code.contains("/// A node."));
        assert!(code.contains("pub struct TreeNode {"));
        assert!(code.contains("#[serde(rename = \"label\")]\n    pub label: String,"));
        assert!(code.contains("#[serde(rename = \"createdAt\")]"));
        assert!(code.contains("pub created_at: wiregen_core::chrono::DateTime<wiregen_core::chrono::Utc>,"));
        assert!(code.contains("pub r#type: i32,"));
    }

    #[test]
    fn test_recursive_optional_is_boxed() {
        let code = code();
        assert!(code.contains("pub parent: Option<Box<super::TreeNode>>,"));
        assert!(code.contains("pub children: Vec<super::TreeNode>,"));
    }

    #[test]
    fn test_collection_fields_read_null_as_empty() {
        let code = code();
        assert!(code.contains("deserialize_with = \"wiregen_core::collections::null_as_default\""));
        assert!(code.contains("pub tags: super::Tags,"));
        assert!(code.contains("skip_serializing_if = \"Option::is_none\""));
    }
}
