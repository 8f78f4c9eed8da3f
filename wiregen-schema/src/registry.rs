//! Type registry and structural resolver.
//!
//! The registry indexes every declaration by its [`QualifiedName`]. Lookups
//! are exact and case-sensitive. Resolution walks container and optional
//! wrappers recursively and ends at a primitive, binary, declared or external
//! leaf.

use crate::error::{SchemaError, UnresolvedTypeError};
use crate::types::{DefinitionKind, PrimitiveKind, QualifiedName, TypeDefinition, TypeReference};
use std::collections::{BTreeMap, BTreeSet};

/// A type reference with every declared name looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// Primitive leaf.
    Primitive(PrimitiveKind),
    /// Binary payload.
    Binary,
    /// Value that may be absent.
    Optional(Box<ResolvedType>),
    /// Ordered sequence.
    List(Box<ResolvedType>),
    /// Set of distinct values.
    Set(Box<ResolvedType>),
    /// Key/value mapping.
    Map(Box<ResolvedType>, Box<ResolvedType>),
    /// Declared type of this IR.
    Declared {
        /// Qualified name of the declaration.
        name: QualifiedName,
        /// Kind of the declaration.
        kind: DefinitionKind,
    },
    /// External type, represented by its resolved fallback.
    External {
        /// Name of the external type.
        name: QualifiedName,
        /// Resolved fallback representation.
        fallback: Box<ResolvedType>,
    },
}

impl ResolvedType {
    /// Returns true for list, set and map.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(..))
    }
}

/// Index of all declarations by qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    definitions: BTreeMap<QualifiedName, TypeDefinition>,
}

impl TypeRegistry {
    /// Builds a registry from declarations.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDeclaration` if two declarations share a
    /// qualified name.
    pub fn build(definitions: Vec<TypeDefinition>) -> Result<Self, SchemaError> {
        let mut registry = Self::default();
        for definition in definitions {
            let name = definition.name().clone();
            if registry.definitions.contains_key(&name) {
                return Err(SchemaError::DuplicateDeclaration {
                    name: name.to_string(),
                });
            }
            registry.definitions.insert(name, definition);
        }
        Ok(registry)
    }

    /// Gets a declaration by qualified name.
    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    /// Returns true if a declaration exists under the name.
    #[must_use]
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.definitions.contains_key(name)
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the registry holds no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates declarations ordered by qualified name.
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.values()
    }

    /// Returns every module path holding at least one declaration, sorted.
    #[must_use]
    pub fn modules(&self) -> BTreeSet<&str> {
        self.definitions.keys().map(|n| n.module.as_str()).collect()
    }

    /// Iterates the declarations of one module, ordered by name.
    pub fn module_definitions<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.definitions
            .iter()
            .filter(move |(name, _)| name.module == module)
            .map(|(_, definition)| definition)
    }

    /// Resolves a type reference.
    ///
    /// # Arguments
    /// * `reference` - The reference to resolve
    ///
    /// # Returns
    /// The resolved form, with declared names looked up.
    ///
    /// # Errors
    /// Returns `UnresolvedTypeError` if any name inside the reference is not
    /// declared.
    pub fn resolve(&self, reference: &TypeReference) -> Result<ResolvedType, UnresolvedTypeError> {
        Ok(match reference {
            TypeReference::Primitive(kind) => ResolvedType::Primitive(*kind),
            TypeReference::Binary => ResolvedType::Binary,
            TypeReference::Optional(inner) => ResolvedType::Optional(Box::new(self.resolve(inner)?)),
            TypeReference::List(inner) => ResolvedType::List(Box::new(self.resolve(inner)?)),
            TypeReference::Set(inner) => ResolvedType::Set(Box::new(self.resolve(inner)?)),
            TypeReference::Map(key, value) => ResolvedType::Map(
                Box::new(self.resolve(key)?),
                Box::new(self.resolve(value)?),
            ),
            TypeReference::Local(name) => {
                let definition = self.get(name).ok_or_else(|| UnresolvedTypeError {
                    name: name.to_string(),
                })?;
                ResolvedType::Declared {
                    name: name.clone(),
                    kind: definition.kind(),
                }
            }
            TypeReference::External { name, fallback } => ResolvedType::External {
                name: name.clone(),
                fallback: Box::new(self.resolve(fallback)?),
            },
        })
    }

    /// Follows an alias chain to its ultimate non-alias target.
    ///
    /// A name that is not an alias resolves to itself as a `Declared` type.
    ///
    /// # Errors
    /// Returns `SchemaError::AliasCycle` if the chain leads back to an alias
    /// already visited, or `SchemaError::UnresolvedType` if a link is missing.
    pub fn resolve_alias(&self, name: &QualifiedName) -> Result<ResolvedType, SchemaError> {
        let mut visited: Vec<&QualifiedName> = Vec::new();
        let mut current = name;
        loop {
            let definition = self.get(current).ok_or_else(|| {
                SchemaError::unresolved(
                    UnresolvedTypeError {
                        name: current.to_string(),
                    },
                    name.to_string(),
                )
            })?;
            let TypeDefinition::Alias(alias) = definition else {
                return Ok(ResolvedType::Declared {
                    name: current.clone(),
                    kind: definition.kind(),
                });
            };
            if let Some(start) = visited.iter().position(|seen| *seen == current) {
                let mut path: Vec<String> = visited[start..].iter().map(|n| n.to_string()).collect();
                path.push(current.to_string());
                return Err(SchemaError::AliasCycle {
                    path: path.join(" -> "),
                });
            }
            visited.push(current);
            match &alias.target {
                TypeReference::Local(next) => current = next,
                other => {
                    return self
                        .resolve(other)
                        .map_err(|e| SchemaError::unresolved(e, alias.name.to_string()));
                }
            }
        }
    }

    /// Returns true if values of the reference are list, set or map,
    /// directly or through aliases.
    #[must_use]
    pub fn is_collection(&self, reference: &TypeReference) -> bool {
        match reference {
            TypeReference::List(_) | TypeReference::Set(_) | TypeReference::Map(..) => true,
            TypeReference::Local(name) => matches!(
                self.resolve_alias(name),
                Ok(ResolvedType::List(_) | ResolvedType::Set(_) | ResolvedType::Map(..))
            ),
            TypeReference::External { fallback, .. } => self.is_collection(fallback),
            _ => false,
        }
    }

    /// Returns true if values of the reference can be JSON object keys.
    ///
    /// Keys are primitives other than DOUBLE and ANY, binary, enums, and
    /// aliases or external fallbacks that end at one of those.
    #[must_use]
    pub fn is_string_key(&self, reference: &TypeReference) -> bool {
        self.is_string_key_within(reference, &mut Vec::new())
    }

    fn is_string_key_within<'a>(
        &'a self,
        reference: &'a TypeReference,
        visited: &mut Vec<&'a QualifiedName>,
    ) -> bool {
        match reference {
            TypeReference::Primitive(kind) => kind.is_string_key(),
            TypeReference::Binary => true,
            TypeReference::External { fallback, .. } => {
                self.is_string_key_within(fallback, visited)
            }
            TypeReference::Local(name) => {
                if visited.contains(&name) {
                    return false;
                }
                visited.push(name);
                match self.get(name) {
                    Some(TypeDefinition::Enum(_)) => true,
                    Some(TypeDefinition::Alias(alias)) => {
                        self.is_string_key_within(&alias.target, visited)
                    }
                    _ => false,
                }
            }
            TypeReference::Optional(_)
            | TypeReference::List(_)
            | TypeReference::Set(_)
            | TypeReference::Map(..) => false,
        }
    }

    /// Computes the set of declarations whose values have a total order.
    ///
    /// This is the greatest fixpoint: every declaration starts as orderable and
    /// is removed once it holds something that is not. Enums are always
    /// orderable, unions never are (their unknown member holds arbitrary JSON),
    /// and errors are not values.
    #[must_use]
    pub fn orderable_types(&self) -> BTreeSet<QualifiedName> {
        let mut orderable: BTreeSet<QualifiedName> = self
            .definitions
            .values()
            .filter(|d| !matches!(d.kind(), DefinitionKind::Union | DefinitionKind::Error))
            .map(|d| d.name().clone())
            .collect();

        loop {
            let demoted: Vec<QualifiedName> = orderable
                .iter()
                .filter(|name| {
                    self.get(name).is_some_and(|definition| {
                        definition
                            .references()
                            .iter()
                            .any(|(_, r)| !is_orderable_ref(r, &orderable))
                    })
                })
                .cloned()
                .collect();
            if demoted.is_empty() {
                return orderable;
            }
            for name in demoted {
                orderable.remove(&name);
            }
        }
    }
}

/// Returns true if a reference is orderable given the set of orderable declarations.
#[must_use]
pub fn is_orderable_ref(reference: &TypeReference, orderable: &BTreeSet<QualifiedName>) -> bool {
    match reference {
        TypeReference::Primitive(kind) => kind.is_orderable(),
        TypeReference::Binary => true,
        TypeReference::Optional(inner) | TypeReference::List(inner) | TypeReference::Set(inner) => {
            is_orderable_ref(inner, orderable)
        }
        TypeReference::Map(key, value) => {
            is_orderable_ref(key, orderable) && is_orderable_ref(value, orderable)
        }
        TypeReference::Local(name) => orderable.contains(name),
        TypeReference::External { fallback, .. } => is_orderable_ref(fallback, orderable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AliasDef, EnumDef, EnumValueDef, FieldDefinition, ObjectDef, UnionDef};
    use crate::types::MemberDefinition;

    fn name(n: &str) -> QualifiedName {
        QualifiedName::new("com.test", n)
    }

    fn local(n: &str) -> TypeReference {
        TypeReference::Local(name(n))
    }

    fn string() -> TypeReference {
        TypeReference::Primitive(PrimitiveKind::String)
    }

    fn alias(n: &str, target: TypeReference) -> TypeDefinition {
        TypeDefinition::Alias(AliasDef {
            name: name(n),
            target,
            docs: None,
        })
    }

    fn object(n: &str, fields: Vec<(&str, TypeReference)>) -> TypeDefinition {
        TypeDefinition::Object(ObjectDef {
            name: name(n),
            fields: fields
                .into_iter()
                .map(|(f, t)| FieldDefinition {
                    name: f.to_string(),
                    type_ref: t,
                    docs: None,
                    safety: None,
                })
                .collect(),
            docs: None,
        })
    }

    #[test]
    fn test_duplicate_declaration() {
        let result = TypeRegistry::build(vec![alias("A", string()), alias("A", string())]);
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateDeclaration { name }) if name == "com.test.A"
        ));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = TypeRegistry::build(vec![alias("Id", string())]).expect("Failed to build");
        assert!(registry.contains(&name("Id")));
        assert!(!registry.contains(&name("ID")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_structural() {
        let registry = TypeRegistry::build(vec![alias("Id", string())]).expect("Failed to build");
        let reference = TypeReference::Map(
            Box::new(local("Id")),
            Box::new(TypeReference::Optional(Box::new(TypeReference::Binary))),
        );
        let resolved = registry.resolve(&reference).expect("Failed to resolve");
        assert_eq!(
            resolved,
            ResolvedType::Map(
                Box::new(ResolvedType::Declared {
                    name: name("Id"),
                    kind: DefinitionKind::Alias,
                }),
                Box::new(ResolvedType::Optional(Box::new(ResolvedType::Binary))),
            )
        );
        assert!(resolved.is_container());
    }

    #[test]
    fn test_resolve_unresolved() {
        let registry = TypeRegistry::default();
        let error = registry
            .resolve(&TypeReference::List(Box::new(local("Missing"))))
            .expect_err("should fail");
        assert_eq!(error.name, "com.test.Missing");
    }

    #[test]
    fn test_resolve_alias_chain() {
        let registry = TypeRegistry::build(vec![
            alias("AccountId", local("UserId")),
            alias("UserId", string()),
        ])
        .expect("Failed to build");
        assert_eq!(
            registry.resolve_alias(&name("AccountId")).expect("Failed to resolve"),
            ResolvedType::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn test_resolve_alias_cycle() {
        let registry = TypeRegistry::build(vec![alias("A", local("B")), alias("B", local("A"))])
            .expect("Failed to build");
        let error = registry.resolve_alias(&name("A")).expect_err("should fail");
        match error {
            SchemaError::AliasCycle { path } => {
                assert_eq!(path, "com.test.A -> com.test.B -> com.test.A");
            }
            other => panic!("expected alias cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_is_collection_through_alias() {
        let registry = TypeRegistry::build(vec![
            alias("Names", TypeReference::List(Box::new(string()))),
            alias("MoreNames", local("Names")),
            alias("Id", string()),
        ])
        .expect("Failed to build");
        assert!(registry.is_collection(&local("MoreNames")));
        assert!(!registry.is_collection(&local("Id")));
        assert!(!registry.is_collection(&TypeReference::Optional(Box::new(local("Names")))));
    }

    #[test]
    fn test_string_keys() {
        let registry = TypeRegistry::build(vec![
            TypeDefinition::Enum(EnumDef {
                name: name("Color"),
                values: vec![EnumValueDef {
                    value: "RED".to_string(),
                    docs: None,
                }],
                docs: None,
            }),
            alias("Id", string()),
            alias("OtherId", local("Id")),
            alias("Ids", TypeReference::List(Box::new(string()))),
            alias("Loop", local("Loop")),
            object("Key", vec![("k", string())]),
        ])
        .expect("Failed to build");
        assert!(registry.is_string_key(&string()));
        assert!(registry.is_string_key(&TypeReference::Binary));
        assert!(registry.is_string_key(&local("Color")));
        assert!(registry.is_string_key(&local("OtherId")));
        assert!(registry.is_string_key(&TypeReference::External {
            name: name("Ext"),
            fallback: Box::new(local("Id")),
        }));
        assert!(!registry.is_string_key(&local("Key")));
        assert!(!registry.is_string_key(&local("Ids")));
        assert!(!registry.is_string_key(&local("Loop")));
        assert!(!registry.is_string_key(&TypeReference::Primitive(PrimitiveKind::Double)));
        assert!(!registry.is_string_key(&TypeReference::Optional(Box::new(string()))));
    }

    #[test]
    fn test_orderable_fixpoint() {
        let registry = TypeRegistry::build(vec![
            TypeDefinition::Enum(EnumDef {
                name: name("Color"),
                values: vec![EnumValueDef {
                    value: "RED".to_string(),
                    docs: None,
                }],
                docs: None,
            }),
            object("Point", vec![("x", TypeReference::Primitive(PrimitiveKind::Double))]),
            object("Tagged", vec![("color", local("Color")), ("label", string())]),
            object("Holder", vec![("point", local("Point"))]),
            object("Node", vec![("next", TypeReference::Optional(Box::new(local("Node"))))]),
            TypeDefinition::Union(UnionDef {
                name: name("Either"),
                members: vec![MemberDefinition {
                    tag: "color".to_string(),
                    type_ref: local("Color"),
                    docs: None,
                }],
                docs: None,
            }),
        ])
        .expect("Failed to build");

        let orderable = registry.orderable_types();
        assert!(orderable.contains(&name("Color")));
        assert!(orderable.contains(&name("Tagged")));
        assert!(orderable.contains(&name("Node")));
        assert!(!orderable.contains(&name("Point")));
        assert!(!orderable.contains(&name("Holder")));
        assert!(!orderable.contains(&name("Either")));
    }

    #[test]
    fn test_module_definitions() {
        let registry = TypeRegistry::build(vec![
            alias("B", string()),
            TypeDefinition::Alias(AliasDef {
                name: QualifiedName::new("com.other", "C"),
                target: string(),
                docs: None,
            }),
            alias("A", string()),
        ])
        .expect("Failed to build");
        let names: Vec<_> = registry
            .module_definitions("com.test")
            .map(|d| d.name().name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(
            registry.modules().into_iter().collect::<Vec<_>>(),
            vec!["com.other", "com.test"]
        );
    }
}
