//! Resolved intermediate representation for code generation.
//!
//! [`SchemaIr`] is the output of the analysis phase: a validated registry
//! plus the facts every emitter needs (module graph, boxed slots and
//! orderable types). It is immutable once built.

use crate::error::SchemaError;
use crate::graph::{Indirections, ModuleGraph};
use crate::registry::{TypeRegistry, is_orderable_ref};
use crate::types::{IrDocument, QualifiedName, TypeDefinition, TypeReference};
use crate::validation::{validate_document, validate_registry};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Rust keywords, strict and reserved.
pub const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
pub const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Returns true if `word` is a Rust keyword.
#[must_use]
pub fn is_rust_keyword(word: &str) -> bool {
    RUST_KEYWORDS.contains(&word)
}

/// Spells a name as a Rust identifier.
///
/// Keywords become raw identifiers (`r#type`) where Rust allows it and get a
/// trailing underscore (`self_`) where it does not.
#[must_use]
pub fn escape_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if is_rust_keyword(name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Rust identifier of a record field or error parameter.
#[must_use]
pub fn field_name(name: &str) -> String {
    escape_keyword(&to_snake_case(name))
}

/// Validated and analyzed schema, ready for emission.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Declared schema version.
    pub version: u64,
    registry: TypeRegistry,
    module_graph: ModuleGraph,
    indirections: Indirections,
    orderable: BTreeSet<QualifiedName>,
}

impl SchemaIr {
    /// Validates and analyzes a parsed document.
    ///
    /// Validation is total: every rule runs before any analysis result is
    /// exposed, and the first violation is returned.
    ///
    /// # Errors
    /// Returns `SchemaError` for invalid declarations, duplicate names,
    /// unresolved references, alias cycles or module cycles.
    pub fn from_document(document: IrDocument) -> Result<Self, SchemaError> {
        validate_document(&document)?;

        let version = document.version;
        let registry = TypeRegistry::build(document.definitions)?;
        let orderable = registry.orderable_types();
        validate_registry(&registry, &orderable)?;

        let module_graph = ModuleGraph::from_registry(&registry);
        module_graph.check_acyclic()?;

        let indirections = Indirections::analyze(&registry);
        for module in registry.modules() {
            debug!(
                "module {} depends on {:?}",
                module,
                module_graph.dependencies(module)
            );
        }
        info!(
            "analyzed {} declarations in {} modules ({} boxed slots)",
            registry.len(),
            module_graph.module_count(),
            indirections.len()
        );

        Ok(Self {
            version,
            registry,
            module_graph,
            indirections,
            orderable,
        })
    }

    /// Returns the type registry.
    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the module dependency graph.
    #[must_use]
    pub const fn module_graph(&self) -> &ModuleGraph {
        &self.module_graph
    }

    /// Returns the boxed slots.
    #[must_use]
    pub const fn indirections(&self) -> &Indirections {
        &self.indirections
    }

    /// Returns all module paths, sorted.
    #[must_use]
    pub fn modules(&self) -> Vec<&str> {
        self.registry.modules().into_iter().collect()
    }

    /// Iterates the declarations of one module, ordered by name.
    pub fn module_definitions<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.registry.module_definitions(module)
    }

    /// Returns true if the declaration has a total order.
    #[must_use]
    pub fn is_orderable(&self, name: &QualifiedName) -> bool {
        self.orderable.contains(name)
    }

    /// Returns true if values of the reference have a total order.
    #[must_use]
    pub fn is_orderable_ref(&self, reference: &TypeReference) -> bool {
        is_orderable_ref(reference, &self.orderable)
    }
}

/// Converts a string to snake_case.
///
/// Acronyms stay together (`MDEntryPx` becomes `md_entry_px`) and dashes are
/// treated like underscores.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    if result.ends_with('_') && !s.ends_with('_') {
        result.pop();
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts an UPPER_SNAKE enum value to a variant name (`NOT_FOUND` to `NotFound`).
#[must_use]
pub fn enum_variant_name(value: &str) -> String {
    value
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
