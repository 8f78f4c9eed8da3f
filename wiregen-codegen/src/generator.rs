//! Code generation driver.
//!
//! Turns an analyzed [`SchemaIr`] into a [`GeneratedTree`]: one node per
//! module path segment, each package node holding one parsed syntax tree
//! per non-empty construct group. Nothing is written here.

use crate::config::{GENERIC_VISITORS_FEATURE, GeneratorConfig};
use crate::error::CodegenError;
use crate::format::parse_file;
use crate::imports::ImportSet;
use crate::naming::{ident, module_ident};
use crate::rust::{
    AliasGenerator, EmitContext, EnumGenerator, ErrorGenerator, ObjectGenerator, UnionGenerator,
    VisitorGenerator,
};
use crate::writer::GeneratedTree;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use wiregen_schema::{SchemaIr, TypeDefinition};

/// Construct groups, each written to its own file of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstructKind {
    /// `aliases.rs`
    Aliases,
    /// `enums.rs`
    Enums,
    /// `objects.rs`
    Objects,
    /// `unions.rs`
    Unions,
    /// `errors.rs`
    Errors,
    /// `visitors.rs`, compiled only with the generic visitor feature.
    Visitors,
}

impl ConstructKind {
    /// Every construct kind, in file order.
    pub const ALL: [Self; 6] = [
        Self::Aliases,
        Self::Enums,
        Self::Objects,
        Self::Unions,
        Self::Errors,
        Self::Visitors,
    ];

    /// Returns the file stem.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Aliases => "aliases",
            Self::Enums => "enums",
            Self::Objects => "objects",
            Self::Unions => "unions",
            Self::Errors => "errors",
            Self::Visitors => "visitors",
        }
    }

    /// Returns the group a declaration is emitted into.
    #[must_use]
    pub const fn of(definition: &TypeDefinition) -> Self {
        match definition {
            TypeDefinition::Alias(_) => Self::Aliases,
            TypeDefinition::Enum(_) => Self::Enums,
            TypeDefinition::Object(_) => Self::Objects,
            TypeDefinition::Union(_) => Self::Unions,
            TypeDefinition::Error(_) => Self::Errors,
        }
    }

    /// Returns true if the file only compiles with a cargo feature.
    #[must_use]
    pub const fn is_feature_gated(self) -> bool {
        matches!(self, Self::Visitors)
    }

    /// Comment lines written under the file header.
    #[must_use]
    pub fn guard_comment(self) -> Vec<String> {
        if self.is_feature_gated() {
            vec![format!(
                "Compiled only with the `{GENERIC_VISITORS_FEATURE}` feature."
            )]
        } else {
            Vec::new()
        }
    }

    /// Outer attribute placed on the module declaration and its re-export.
    fn cfg_attr(self) -> TokenStream {
        if self.is_feature_gated() {
            quote! { #[cfg(feature = #GENERIC_VISITORS_FEATURE)] }
        } else {
            TokenStream::new()
        }
    }
}

/// One generated construct file.
pub struct ConstructFile {
    kind: ConstructKind,
    ast: syn::File,
}

impl ConstructFile {
    /// Returns the construct group.
    #[must_use]
    pub const fn kind(&self) -> ConstructKind {
        self.kind
    }

    /// Returns the syntax tree.
    #[must_use]
    pub const fn ast(&self) -> &syn::File {
        &self.ast
    }
}

/// A node of the output tree: one module path segment.
#[derive(Default)]
pub struct ModuleNode {
    children: BTreeMap<String, ModuleNode>,
    files: Vec<ConstructFile>,
    module_file: Option<syn::File>,
}

impl ModuleNode {
    /// Iterates the child segments, sorted by name.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ModuleNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns the construct files of this package, in file order.
    #[must_use]
    pub fn files(&self) -> &[ConstructFile] {
        &self.files
    }

    /// Returns the `mod.rs` syntax tree.
    #[must_use]
    pub fn module_file(&self) -> Option<&syn::File> {
        self.module_file.as_ref()
    }

    fn entry(&mut self, module: &str) -> &mut Self {
        module
            .split('.')
            .fold(self, |node, segment| node.children.entry(segment.to_string()).or_default())
    }

    /// Items declaring the children and re-exporting the construct files.
    fn declarations(&self) -> TokenStream {
        let children = self.children.keys().map(|name| module_ident(name));
        let files = self.files.iter().map(|file| {
            let stem = ident(file.kind.stem());
            let cfg = file.kind.cfg_attr();
            quote! {
                #cfg
                mod #stem;
                #cfg
                pub use self::#stem::*;
            }
        });
        quote! {
            #(pub mod #children;)*
            #(#files)*
        }
    }

    /// Checks stem collisions and builds every `mod.rs`, depth first.
    fn finish(&mut self, path: &str) -> Result<(), CodegenError> {
        for name in self.children.keys() {
            if let Some(file) = self.files.iter().find(|f| f.kind.stem() == name) {
                let module = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{path}.{name}")
                };
                return Err(CodegenError::ModuleCollision {
                    module,
                    file: file.kind.stem().to_string(),
                });
            }
        }
        for (name, child) in &mut self.children {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            child.finish(&child_path)?;
        }
        let context = if path.is_empty() {
            "mod.rs".to_string()
        } else {
            format!("{path}::mod.rs")
        };
        self.module_file = Some(parse_file(&context, self.declarations())?);
        Ok(())
    }

    /// Items of this node rendered as nested inline modules.
    pub(crate) fn inline_items(&self) -> TokenStream {
        let children = self.children.iter().map(|(name, child)| {
            let name = module_ident(name);
            let items = child.inline_items();
            quote! {
                pub mod #name {
                    #items
                }
            }
        });
        let files = self.files.iter().map(|file| {
            let stem = ident(file.kind.stem());
            let cfg = file.kind.cfg_attr();
            let attrs = &file.ast.attrs;
            let items = &file.ast.items;
            quote! {
                #cfg
                mod #stem {
                    #(#attrs)*
                    #(#items)*
                }
                #cfg
                pub use self::#stem::*;
            }
        });
        quote! {
            #(#children)*
            #(#files)*
        }
    }

    fn file_count(&self) -> usize {
        1 + self.files.len() + self.children.values().map(Self::file_count).sum::<usize>()
    }
}

/// Drives the emitters over every module of an analyzed IR.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
    runtime: syn::Path,
}

impl<'a> Generator<'a> {
    /// Creates a generator.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` if the runtime crate is not a valid path.
    pub fn new(ir: &'a SchemaIr, config: &'a GeneratorConfig) -> Result<Self, CodegenError> {
        let runtime = syn::parse_str::<syn::Path>(config.runtime_crate_path()).map_err(|e| {
            CodegenError::config(format!(
                "invalid runtime crate path '{}': {e}",
                config.runtime_crate_path()
            ))
        })?;
        Ok(Self {
            ir,
            config,
            runtime,
        })
    }

    /// Emits every module into an in-memory tree.
    ///
    /// # Errors
    /// Returns `CodegenError::ModuleCollision` if a child module is named
    /// like a construct file of its parent, or `CodegenError::Emission` if an
    /// emitter produced invalid code.
    pub fn generate(&self) -> Result<GeneratedTree, CodegenError> {
        let mut root = ModuleNode::default();
        for module in self.ir.modules() {
            let files = self.generate_module(module)?;
            debug!("Emitted module {} ({} files)", module, files.len());
            root.entry(module).files = files;
        }
        root.finish("")?;

        info!(
            "Generated {} modules into {} files",
            self.ir.modules().len(),
            root.file_count()
        );
        Ok(GeneratedTree::new(root))
    }

    fn generate_module(&self, module: &str) -> Result<Vec<ConstructFile>, CodegenError> {
        let mut groups: BTreeMap<ConstructKind, Vec<&TypeDefinition>> = BTreeMap::new();
        for definition in self.ir.module_definitions(module) {
            groups
                .entry(ConstructKind::of(definition))
                .or_default()
                .push(definition);
            if self.config.emits_generic_visitors() && matches!(definition, TypeDefinition::Union(_))
            {
                groups
                    .entry(ConstructKind::Visitors)
                    .or_default()
                    .push(definition);
            }
        }

        groups
            .into_iter()
            .map(|(kind, definitions)| self.generate_file(module, kind, &definitions))
            .collect()
    }

    fn generate_file(
        &self,
        module: &str,
        kind: ConstructKind,
        definitions: &[&TypeDefinition],
    ) -> Result<ConstructFile, CodegenError> {
        let mut referenced = BTreeSet::new();
        for definition in definitions {
            for (_, reference) in definition.references() {
                reference.for_each_local(&mut |name| {
                    referenced.insert(name.module.clone());
                });
            }
        }
        let runtime_root: Vec<String> = self
            .runtime
            .segments
            .first()
            .map(|segment| segment.ident.to_string())
            .into_iter()
            .collect();
        let reserved: Vec<&str> = runtime_root.iter().map(String::as_str).collect();
        let imports = ImportSet::new(module, referenced.iter().map(String::as_str), &reserved);

        let ctx = EmitContext {
            ir: self.ir,
            config: self.config,
            runtime: &self.runtime,
            imports: &imports,
        };
        let body = definitions
            .iter()
            .map(|definition| Self::emit(ctx, kind, definition));
        let inner = if kind.is_feature_gated() {
            quote! { #![cfg(feature = #GENERIC_VISITORS_FEATURE)] }
        } else {
            TokenStream::new()
        };
        let uses = imports.use_items();
        let tokens = quote! {
            #inner
            #uses
            #(#body)*
        };

        let context = format!("{}::{}.rs", module, kind.stem());
        let ast = parse_file(&context, tokens)?;
        debug!(
            "Emitted {} ({} declarations, {} imports)",
            context,
            definitions.len(),
            imports.len()
        );
        Ok(ConstructFile { kind, ast })
    }

    fn emit(ctx: EmitContext<'_>, kind: ConstructKind, definition: &TypeDefinition) -> TokenStream {
        match (kind, definition) {
            (ConstructKind::Visitors, TypeDefinition::Union(def)) => {
                VisitorGenerator::new(ctx).generate(def)
            }
            (_, TypeDefinition::Alias(def)) => AliasGenerator::new(ctx).generate(def),
            (_, TypeDefinition::Enum(def)) => EnumGenerator::new(ctx).generate(def),
            (_, TypeDefinition::Object(def)) => ObjectGenerator::new(ctx).generate(def),
            (_, TypeDefinition::Union(def)) => UnionGenerator::new(ctx).generate(def),
            (_, TypeDefinition::Error(def)) => ErrorGenerator::new(ctx).generate(def),
        }
    }
}
