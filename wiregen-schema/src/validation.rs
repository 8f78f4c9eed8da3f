//! Schema validation.
//!
//! Validation runs in two passes. [`validate_document`] checks each
//! declaration on its own (names, member lists, nesting), and
//! [`validate_registry`] checks everything that needs the whole registry
//! (resolution, alias chains, ordering of set items and map keys, map keys
//! that encode as JSON object keys, generated name collisions).

use crate::error::SchemaError;
use crate::ir::{enum_variant_name, field_name, is_rust_keyword, to_pascal_case, to_snake_case};
use crate::registry::{TypeRegistry, is_orderable_ref};
use crate::types::{DefinitionKind, IrDocument, QualifiedName, TypeDefinition, TypeReference};
use std::collections::{BTreeSet, HashMap};
use wiregen_core::union::TAG_KEY;

/// Type names that would shadow prelude items used by generated code.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Box", "Err", "None", "Ok", "Option", "Result", "Some", "String", "Vec",
];

/// Validates every declaration of a parsed document in isolation.
///
/// # Arguments
/// * `document` - The parsed document
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first issue.
///
/// # Errors
/// Returns `SchemaError::Validation` if a declaration is malformed.
pub fn validate_document(document: &IrDocument) -> Result<(), SchemaError> {
    for definition in &document.definitions {
        validate_name(definition.name())?;
        match definition {
            TypeDefinition::Alias(_) => {}
            TypeDefinition::Enum(def) => {
                if def.values.is_empty() {
                    return Err(SchemaError::validation(format!(
                        "enum '{}' has no values",
                        def.name
                    )));
                }
                check_unique(
                    &def.name,
                    "enum value",
                    def.values.iter().map(|v| v.value.as_str()),
                    enum_variant_name,
                )?;
                for value in &def.values {
                    if !is_upper_snake(&value.value) {
                        return Err(SchemaError::validation(format!(
                            "enum value '{}' of '{}' must be UPPER_SNAKE_CASE",
                            value.value, def.name
                        )));
                    }
                }
            }
            TypeDefinition::Object(def) => {
                check_unique(
                    &def.name,
                    "field",
                    def.fields.iter().map(|f| f.name.as_str()),
                    field_name,
                )?;
            }
            TypeDefinition::Union(def) => {
                if def.members.is_empty() {
                    return Err(SchemaError::validation(format!(
                        "union '{}' has no members",
                        def.name
                    )));
                }
                check_unique(
                    &def.name,
                    "member tag",
                    def.members.iter().map(|m| m.tag.as_str()),
                    to_pascal_case,
                )?;
                check_unique(
                    &def.name,
                    "member tag",
                    def.members.iter().map(|m| m.tag.as_str()),
                    to_snake_case,
                )?;
                if def.members.iter().any(|m| m.tag == TAG_KEY) {
                    return Err(SchemaError::validation(format!(
                        "member tag '{TAG_KEY}' of '{}' collides with the union discriminant key",
                        def.name
                    )));
                }
            }
            TypeDefinition::Error(def) => {
                if !is_pascal_case(&def.namespace) {
                    return Err(SchemaError::validation(format!(
                        "error namespace '{}' of '{}' must be PascalCase",
                        def.namespace, def.name
                    )));
                }
                check_unique(
                    &def.name,
                    "parameter",
                    def.params.iter().map(|p| p.name.as_str()),
                    field_name,
                )?;
            }
        }

        for (member, reference) in definition.references() {
            if let Some(inner) = find_nested_optional(reference) {
                return Err(SchemaError::validation(format!(
                    "'{}' nests optional types ({inner}), which the wire format cannot distinguish",
                    site(definition.name(), member)
                )));
            }
        }
    }
    Ok(())
}

/// Validates the declarations against the whole registry.
///
/// # Arguments
/// * `registry` - The registry of all declarations
/// * `orderable` - Declarations whose values have a total order
///
/// # Errors
/// Returns `SchemaError::UnresolvedType` for dangling references,
/// `SchemaError::AliasCycle` for cyclic aliases and
/// `SchemaError::Validation` for the remaining rules.
pub fn validate_registry(
    registry: &TypeRegistry,
    orderable: &BTreeSet<QualifiedName>,
) -> Result<(), SchemaError> {
    for definition in registry.definitions() {
        for (member, reference) in definition.references() {
            let at = site(definition.name(), member);
            registry
                .resolve(reference)
                .map_err(|e| SchemaError::unresolved(e, at.clone()))?;

            let mut error_target = None;
            reference.for_each_local(&mut |target| {
                if registry
                    .get(target)
                    .is_some_and(|d| d.kind() == DefinitionKind::Error)
                {
                    error_target.get_or_insert_with(|| target.clone());
                }
            });
            if let Some(target) = error_target {
                return Err(SchemaError::validation(format!(
                    "'{at}' references error '{target}', errors cannot be used as types"
                )));
            }

            check_ordered_keys(registry, reference, orderable, &at)?;
        }

        if let TypeDefinition::Alias(alias) = definition {
            registry.resolve_alias(&alias.name)?;
        }
    }

    check_generated_names(registry)
}

/// Rejects declarations whose generated companion types collide with
/// another declaration of the same module.
fn check_generated_names(registry: &TypeRegistry) -> Result<(), SchemaError> {
    for definition in registry.definitions() {
        let name = definition.name();
        let companions: Vec<String> = match definition {
            TypeDefinition::Union(_) => vec![
                format!("{}Visitor", name.name),
                format!("{}VisitorWithOutput", name.name),
            ],
            TypeDefinition::Error(_) => vec![format!("{}Parameters", name.name)],
            _ => Vec::new(),
        };
        for companion in companions {
            let other = QualifiedName::new(name.module.clone(), companion);
            if registry.contains(&other) {
                return Err(SchemaError::validation(format!(
                    "'{other}' collides with a type generated for '{name}'"
                )));
            }
        }
    }
    Ok(())
}

fn check_ordered_keys(
    registry: &TypeRegistry,
    reference: &TypeReference,
    orderable: &BTreeSet<QualifiedName>,
    at: &str,
) -> Result<(), SchemaError> {
    match reference {
        TypeReference::Set(item) => {
            if !is_orderable_ref(item, orderable) {
                return Err(SchemaError::validation(format!(
                    "'{at}' uses set item type {item}, which has no total order"
                )));
            }
            check_ordered_keys(registry, item, orderable, at)
        }
        TypeReference::Map(key, value) => {
            if !is_orderable_ref(key, orderable) {
                return Err(SchemaError::validation(format!(
                    "'{at}' uses map key type {key}, which has no total order"
                )));
            }
            if !registry.is_string_key(key) {
                return Err(SchemaError::validation(format!(
                    "'{at}' uses map key type {key}, which does not encode as a JSON object key"
                )));
            }
            check_ordered_keys(registry, key, orderable, at)?;
            check_ordered_keys(registry, value, orderable, at)
        }
        TypeReference::Optional(inner) | TypeReference::List(inner) => {
            check_ordered_keys(registry, inner, orderable, at)
        }
        TypeReference::External { fallback, .. } => {
            check_ordered_keys(registry, fallback, orderable, at)
        }
        TypeReference::Primitive(_) | TypeReference::Binary | TypeReference::Local(_) => Ok(()),
    }
}

fn validate_name(name: &QualifiedName) -> Result<(), SchemaError> {
    if name.module.is_empty() {
        return Err(SchemaError::validation(format!(
            "declaration '{}' has an empty package",
            name.name
        )));
    }
    for segment in name.module_segments() {
        let lowercase_ident = segment
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !lowercase_ident || is_rust_keyword(segment) {
            return Err(SchemaError::validation(format!(
                "package segment '{segment}' of '{name}' must be a lowercase identifier and not a keyword"
            )));
        }
    }
    if !is_pascal_case(&name.name) {
        return Err(SchemaError::validation(format!(
            "type name '{name}' must be PascalCase"
        )));
    }
    if RESERVED_TYPE_NAMES.contains(&name.name.as_str()) {
        return Err(SchemaError::validation(format!(
            "type name '{name}' is reserved"
        )));
    }
    Ok(())
}

/// Checks names for duplicates, both as declared and after `convert`.
fn check_unique<'a>(
    owner: &QualifiedName,
    what: &str,
    names: impl Iterator<Item = &'a str>,
    convert: fn(&str) -> String,
) -> Result<(), SchemaError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for name in names {
        let identifier = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !identifier {
            return Err(SchemaError::validation(format!(
                "{what} '{name}' of '{owner}' is not a valid identifier"
            )));
        }
        if let Some(previous) = seen.insert(convert(name), name) {
            let message = if previous == name {
                format!("duplicate {what} '{name}' in '{owner}'")
            } else {
                format!("{what}s '{previous}' and '{name}' of '{owner}' map to the same identifier")
            };
            return Err(SchemaError::validation(message));
        }
    }
    Ok(())
}

fn find_nested_optional(reference: &TypeReference) -> Option<&TypeReference> {
    match reference {
        TypeReference::Optional(inner) => match inner.as_ref() {
            TypeReference::Optional(_) => Some(reference),
            other => find_nested_optional(other),
        },
        TypeReference::List(inner) | TypeReference::Set(inner) => find_nested_optional(inner),
        TypeReference::Map(key, value) => {
            find_nested_optional(key).or_else(|| find_nested_optional(value))
        }
        TypeReference::External { fallback, .. } => find_nested_optional(fallback),
        TypeReference::Primitive(_) | TypeReference::Binary | TypeReference::Local(_) => None,
    }
}

fn site(owner: &QualifiedName, member: &str) -> String {
    if member.is_empty() {
        owner.to_string()
    } else {
        format!("{owner}.{member}")
    }
}

fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_upper_snake(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && !value.ends_with('_')
        && !value.contains("__")
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
