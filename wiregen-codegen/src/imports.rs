//! Per-file import management.
//!
//! Every generated construct file imports the foreign modules it touches with
//! a relative `use super::...` path, so the output tree can be mounted under
//! any module of a consumer crate. Modules are bound to their last path
//! segment; when two modules share that segment, or the segment is reserved,
//! later modules (in sorted order) get a numeric suffix. The assignment only
//! depends on the set of referenced modules, so it is stable across runs.

use crate::naming::{module_ident, type_ident};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::{BTreeMap, BTreeSet};
use wiregen_schema::QualifiedName;
use wiregen_schema::ir::is_rust_keyword;

/// Names generated files already bind or rely on.
const RESERVED_ALIASES: &[&str] = &[
    "alloc", "core", "serde", "serde_json", "std", "self", "super", "crate",
];

/// Import aliases of one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSet {
    module: String,
    depth: usize,
    aliases: BTreeMap<String, String>,
}

impl ImportSet {
    /// Assigns aliases for the modules referenced from a file of `module`.
    ///
    /// # Arguments
    /// * `module` - Module path of the file's package
    /// * `referenced` - Modules mentioned by the file's declarations
    /// * `reserved` - Additional names the aliases must avoid
    #[must_use]
    pub fn new<'a>(
        module: &str,
        referenced: impl IntoIterator<Item = &'a str>,
        reserved: &[&str],
    ) -> Self {
        let foreign: BTreeSet<&str> = referenced.into_iter().filter(|m| *m != module).collect();

        let mut taken: BTreeSet<String> = RESERVED_ALIASES
            .iter()
            .chain(reserved)
            .map(|name| (*name).to_string())
            .collect();
        let mut aliases = BTreeMap::new();
        for other in foreign {
            let base = other.rsplit('.').next().unwrap_or(other);
            let mut candidate = base.to_string();
            let mut suffix = 0;
            while taken.contains(&candidate) || is_rust_keyword(&candidate) {
                suffix += 1;
                candidate = format!("{base}_{suffix}");
            }
            taken.insert(candidate.clone());
            aliases.insert(other.to_string(), candidate);
        }

        Self {
            module: module.to_string(),
            depth: module.split('.').count() + 1,
            aliases,
        }
    }

    /// Returns the alias bound to a foreign module.
    #[must_use]
    pub fn alias_of(&self, module: &str) -> Option<&str> {
        self.aliases.get(module).map(String::as_str)
    }

    /// Returns the number of imported modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if the file imports no foreign module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Returns the path of a declared type as seen from the file.
    ///
    /// Types of the file's own package are reached through its parent
    /// module, which re-exports every construct file.
    #[must_use]
    pub fn type_path(&self, name: &QualifiedName) -> TokenStream {
        let ty = type_ident(&name.name);
        if name.module == self.module {
            return quote! { super::#ty };
        }
        match self.alias_of(&name.module) {
            Some(alias) => {
                let alias = module_ident(alias);
                quote! { #alias::#ty }
            }
            // Not registered up front: spell out the full relative path.
            None => {
                let path = self.root_path(&name.module);
                quote! { #path::#ty }
            }
        }
    }

    /// Emits the `use` items, sorted by module path.
    #[must_use]
    pub fn use_items(&self) -> TokenStream {
        let items = self.aliases.iter().map(|(module, alias)| {
            let path = self.root_path(module);
            let base = module.rsplit('.').next().unwrap_or(module);
            if base == alias {
                quote! { use #path; }
            } else {
                let alias = module_ident(alias);
                quote! { use #path as #alias; }
            }
        });
        quote! { #(#items)* }
    }

    fn root_path(&self, module: &str) -> TokenStream {
        let supers = (0..self.depth).map(|_| quote! { super });
        let segments = module.split('.').map(module_ident);
        quote! { #(#supers::)* #(#segments)::* }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tokens: TokenStream) -> String {
        tokens.to_string()
    }

    #[test]
    fn test_local_types_use_parent_module() {
        let imports = ImportSet::new("com.example.shapes", ["com.example.shapes"], &[]);
        assert!(imports.is_empty());
        let path = imports.type_path(&QualifiedName::new("com.example.shapes", "Circle"));
        assert_eq!(text(path), "super :: Circle");
    }

    #[test]
    fn test_foreign_module_import() {
        let imports = ImportSet::new("com.example.shapes", ["com.example.common"], &[]);
        assert_eq!(imports.alias_of("com.example.common"), Some("common"));
        assert_eq!(
            text(imports.use_items()),
            "use super :: super :: super :: super :: com :: example :: common ;"
        );
        let path = imports.type_path(&QualifiedName::new("com.example.common", "Color"));
        assert_eq!(text(path), "common :: Color");
    }

    #[test]
    fn test_colliding_base_names_are_suffixed() {
        let imports = ImportSet::new(
            "com.example.shapes",
            ["com.example.v2.api", "com.example.v1.api"],
            &[],
        );
        assert_eq!(imports.alias_of("com.example.v1.api"), Some("api"));
        assert_eq!(imports.alias_of("com.example.v2.api"), Some("api_1"));
        let uses = text(imports.use_items());
        assert!(uses.contains("com :: example :: v1 :: api ;"));
        assert!(uses.contains("com :: example :: v2 :: api as api_1 ;"));
    }

    #[test]
    fn test_reserved_names_are_avoided() {
        let imports = ImportSet::new("app", ["lib.serde", "lib.wiregen_core"], &["wiregen_core"]);
        assert_eq!(imports.alias_of("lib.serde"), Some("serde_1"));
        assert_eq!(imports.alias_of("lib.wiregen_core"), Some("wiregen_core_1"));
    }

    #[test]
    fn test_assignment_is_order_independent() {
        let first = ImportSet::new("a", ["x.api", "y.api", "z.api"], &[]);
        let second = ImportSet::new("a", ["z.api", "x.api", "y.api"], &[]);
        assert_eq!(first, second);
        assert_eq!(text(first.use_items()), text(second.use_items()));
    }
}
