//! Generic-output visitor generation.
//!
//! These visitors return a value from every method. They live in their own
//! file, compiled only when the consumer enables the guarding feature, and
//! dispatch exactly like the dynamic visitor of the union file.

use super::EmitContext;
use crate::naming::{companion_ident, member_variant_ident, visit_method_ident};
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::UnionDef;

/// Suffix of the generic-output visitor trait.
pub const VISITOR_WITH_OUTPUT_SUFFIX: &str = "VisitorWithOutput";

/// Generator for generic-output union visitors.
pub struct VisitorGenerator<'a> {
    ctx: EmitContext<'a>,
}

impl<'a> VisitorGenerator<'a> {
    /// Creates a new visitor generator.
    #[must_use]
    pub const fn new(ctx: EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the visitor trait and the `accept_with` dispatcher.
    #[must_use]
    pub fn generate(&self, def: &UnionDef) -> TokenStream {
        let union_ty = self.ctx.imports.type_path(&def.name);
        let visitor = companion_ident(&def.name.name, VISITOR_WITH_OUTPUT_SUFFIX);
        let types = self.ctx.types();
        let indirections = self.ctx.ir.indirections();

        let variants: Vec<_> = def
            .members
            .iter()
            .map(|m| member_variant_ident(&m.tag))
            .collect();
        let methods: Vec<_> = def
            .members
            .iter()
            .map(|m| visit_method_ident(&m.tag))
            .collect();
        let method_defs = def.members.iter().zip(&methods).map(|(member, method)| {
            let viewed = types.viewed(
                &member.type_ref,
                indirections.needs_box(&def.name, &member.tag),
            );
            quote! {
                /// Visits the member.
                fn #method(&mut self, value: &#viewed) -> Self::Output;
            }
        });
        let visitor_doc = format!(
            " Visitor over `{}` returning a value from every method.",
            def.name.name
        );

        quote! {
            #[doc = #visitor_doc]
            pub trait #visitor {
                /// Value produced by the visit.
                type Output;

                #(#method_defs)*

                /// Receives the raw tag of a member unknown to this schema version.
                fn visit_unknown(&mut self, tag: &str) -> Self::Output;
            }

            impl #union_ty {
                /// Dispatches to the visitor method of the populated member and
                /// returns its output.
                pub fn accept_with<V: #visitor>(&self, visitor: &mut V) -> V::Output {
                    match self {
                        #(Self::#variants(value) => visitor.#methods(value),)*
                        Self::Unknown(unknown) => visitor.visit_unknown(unknown.tag()),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GeneratorConfig;
    use crate::rust::testing::{document, render};

    const TYPES: &str = r#"
        {"type": "union", "union": {
            "typeName": {"name": "Shape", "package": "draw.shapes"},
            "union": [
                {"fieldName": "square", "type": {"type": "primitive", "primitive": "DOUBLE"}},
                {"fieldName": "label", "type": {"type": "reference",
                    "reference": {"name": "Label", "package": "draw.text"}}}
            ]}},
        {"type": "alias", "alias": {
            "typeName": {"name": "Label", "package": "draw.text"},
            "alias": {"type": "primitive", "primitive": "STRING"}}}"#;

    fn code() -> String {
        render(&document(TYPES, ""), &GeneratorConfig::new(), "draw.shapes", "visitors")
    }

    #[test]
    fn test_visitor_file_is_feature_gated() {
        let code = code();
        assert!(code.contains("#![cfg(feature = \"generic-visitors\")]"));
        assert!(code.contains("use super::super::super::draw::text;"));
    }

    #[test]
    fn test_visitor_with_output() {
        let code = code();
        assert!(code.contains("pub trait ShapeVisitorWithOutput {"));
        assert!(code.contains("type Output;"));
        assert!(code.contains("fn visit_square(&mut self, value: &f64) -> Self::Output;"));
        assert!(code.contains("fn visit_label(&mut self, value: &text::Label) -> Self::Output;"));
        assert!(code.contains("impl super::Shape {"));
        assert!(code.contains("Self::Unknown(unknown) => visitor.visit_unknown(unknown.tag()),"));
    }
}
