//! Type reference mapping.

use crate::imports::ImportSet;
use proc_macro2::TokenStream;
use quote::quote;
use wiregen_schema::{PrimitiveKind, TypeReference};

/// Maps IR type references to Rust types for one file.
#[derive(Clone, Copy)]
pub struct TypeMapper<'a> {
    imports: &'a ImportSet,
    runtime: &'a syn::Path,
}

impl<'a> TypeMapper<'a> {
    /// Creates a new type mapper.
    #[must_use]
    pub const fn new(imports: &'a ImportSet, runtime: &'a syn::Path) -> Self {
        Self { imports, runtime }
    }

    /// Returns the stored type of a slot.
    ///
    /// When `boxed` is set, the declared type held by value (directly or
    /// inside `Option`) is wrapped in `Box`.
    #[must_use]
    pub fn stored(&self, reference: &TypeReference, boxed: bool) -> TokenStream {
        let runtime = self.runtime;
        match reference {
            TypeReference::Primitive(kind) => self.primitive(*kind),
            TypeReference::Binary => quote! { #runtime::Binary },
            TypeReference::Optional(inner) => {
                let inner = self.stored(inner, boxed);
                quote! { Option<#inner> }
            }
            TypeReference::List(inner) => {
                let inner = self.stored(inner, false);
                quote! { Vec<#inner> }
            }
            TypeReference::Set(inner) => {
                let inner = self.stored(inner, false);
                quote! { ::std::collections::BTreeSet<#inner> }
            }
            TypeReference::Map(key, value) => {
                let key = self.stored(key, false);
                let value = self.stored(value, false);
                quote! { ::std::collections::BTreeMap<#key, #value> }
            }
            TypeReference::Local(name) => {
                let path = self.imports.type_path(name);
                if boxed {
                    quote! { Box<#path> }
                } else {
                    path
                }
            }
            TypeReference::External { fallback, .. } => self.stored(fallback, boxed),
        }
    }

    /// Returns the type a visitor receives by reference for a slot.
    ///
    /// A directly boxed declared type is handed out unboxed; everything else
    /// is the stored type.
    #[must_use]
    pub fn viewed(&self, reference: &TypeReference, boxed: bool) -> TokenStream {
        match reference {
            TypeReference::Local(_) => self.stored(reference, false),
            TypeReference::External { fallback, .. } => self.viewed(fallback, boxed),
            _ => self.stored(reference, boxed),
        }
    }

    fn primitive(&self, kind: PrimitiveKind) -> TokenStream {
        let runtime = self.runtime;
        match kind {
            PrimitiveKind::String | PrimitiveKind::Rid | PrimitiveKind::Bearertoken => {
                quote! { String }
            }
            PrimitiveKind::Integer => quote! { i32 },
            PrimitiveKind::Safelong => quote! { i64 },
            PrimitiveKind::Double => quote! { f64 },
            PrimitiveKind::Boolean => quote! { bool },
            PrimitiveKind::Datetime => {
                quote! { #runtime::chrono::DateTime<#runtime::chrono::Utc> }
            }
            PrimitiveKind::Uuid => quote! { #runtime::uuid::Uuid },
            PrimitiveKind::Any => quote! { serde_json::Value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiregen_schema::QualifiedName;

    fn render(reference: &TypeReference, boxed: bool) -> String {
        let imports = ImportSet::new("com.example.shapes", ["com.example.common"], &[]);
        let runtime: syn::Path = syn::parse_str("wiregen_core").expect("valid path");
        TypeMapper::new(&imports, &runtime)
            .stored(reference, boxed)
            .to_string()
            .replace(' ', "")
    }

    fn local(module: &str, name: &str) -> TypeReference {
        TypeReference::Local(QualifiedName::new(module, name))
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            render(&TypeReference::Primitive(PrimitiveKind::Safelong), false),
            "i64"
        );
        assert_eq!(
            render(&TypeReference::Primitive(PrimitiveKind::Bearertoken), false),
            "String"
        );
        assert_eq!(
            render(&TypeReference::Primitive(PrimitiveKind::Datetime), false),
            "wiregen_core::chrono::DateTime<wiregen_core::chrono::Utc>"
        );
        assert_eq!(render(&TypeReference::Binary, false), "wiregen_core::Binary");
    }

    #[test]
    fn test_containers() {
        let reference = TypeReference::Map(
            Box::new(local("com.example.common", "Color")),
            Box::new(TypeReference::List(Box::new(TypeReference::Primitive(
                PrimitiveKind::Double,
            )))),
        );
        assert_eq!(
            render(&reference, false),
            "::std::collections::BTreeMap<common::Color,Vec<f64>>"
        );
    }

    #[test]
    fn test_boxing_applies_to_by_value_positions() {
        let node = local("com.example.shapes", "TreeNode");
        assert_eq!(render(&node, true), "Box<super::TreeNode>");
        assert_eq!(
            render(&TypeReference::Optional(Box::new(node.clone())), true),
            "Option<Box<super::TreeNode>>"
        );
        assert_eq!(
            render(&TypeReference::List(Box::new(node)), true),
            "Vec<super::TreeNode>"
        );
    }

    #[test]
    fn test_viewed_unboxes_direct_reference() {
        let imports = ImportSet::new("com.example.shapes", Vec::<&str>::new(), &[]);
        let runtime: syn::Path = syn::parse_str("wiregen_core").expect("valid path");
        let mapper = TypeMapper::new(&imports, &runtime);
        let node = local("com.example.shapes", "Expr");
        assert_eq!(
            mapper.viewed(&node, true).to_string().replace(' ', ""),
            "super::Expr"
        );
        let optional = TypeReference::Optional(Box::new(node));
        assert_eq!(
            mapper.viewed(&optional, true).to_string().replace(' ', ""),
            "Option<Box<super::Expr>>"
        );
    }
}
