//! Normalized type model.
//!
//! This module contains the data structures every later phase works on:
//! qualified names, type references and the five kinds of declarations.
//! The model is built once per run and never mutated afterwards.

use std::fmt;
use wiregen_core::ErrorCode;

/// Module path plus identifier, the unique key of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    /// Dotted module path, e.g. `com.example.shapes`.
    pub module: String,
    /// Identifier within the module.
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Returns the segments of the module path.
    pub fn module_segments(&self) -> impl Iterator<Item = &str> {
        self.module.split('.')
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// Primitive leaf types.
///
/// Binary payloads are modelled separately as [`TypeReference::Binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    /// UTF-8 text.
    String,
    /// Timestamp with offset.
    Datetime,
    /// Signed 32-bit integer.
    Integer,
    /// 64-bit floating point.
    Double,
    /// Signed integer safe to represent in a double.
    Safelong,
    /// Arbitrary JSON value.
    Any,
    /// Boolean.
    Boolean,
    /// UUID.
    Uuid,
    /// Resource identifier.
    Rid,
    /// Bearer token.
    Bearertoken,
}

impl PrimitiveKind {
    /// Returns the IR name of the primitive.
    #[must_use]
    pub const fn ir_name(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Datetime => "DATETIME",
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Safelong => "SAFELONG",
            Self::Any => "ANY",
            Self::Boolean => "BOOLEAN",
            Self::Uuid => "UUID",
            Self::Rid => "RID",
            Self::Bearertoken => "BEARERTOKEN",
        }
    }

    /// Parses a primitive from its IR name. `BINARY` is not a primitive kind.
    #[must_use]
    pub fn from_ir_name(name: &str) -> Option<Self> {
        match name {
            "STRING" => Some(Self::String),
            "DATETIME" => Some(Self::Datetime),
            "INTEGER" => Some(Self::Integer),
            "DOUBLE" => Some(Self::Double),
            "SAFELONG" => Some(Self::Safelong),
            "ANY" => Some(Self::Any),
            "BOOLEAN" => Some(Self::Boolean),
            "UUID" => Some(Self::Uuid),
            "RID" => Some(Self::Rid),
            "BEARERTOKEN" => Some(Self::Bearertoken),
            _ => None,
        }
    }

    /// Returns true if values have a total order (usable as set items and map keys).
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        !matches!(self, Self::Double | Self::Any)
    }

    /// Returns true if values encode as JSON object keys.
    #[must_use]
    pub const fn is_string_key(&self) -> bool {
        !matches!(self, Self::Double | Self::Any)
    }
}

/// A reference to a type from a field, member, parameter or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// Primitive leaf.
    Primitive(PrimitiveKind),
    /// Value that may be absent.
    Optional(Box<TypeReference>),
    /// Ordered sequence.
    List(Box<TypeReference>),
    /// Set of distinct values.
    Set(Box<TypeReference>),
    /// Key/value mapping.
    Map(Box<TypeReference>, Box<TypeReference>),
    /// Binary payload.
    Binary,
    /// Type declared in this IR.
    Local(QualifiedName),
    /// Type declared outside this IR, represented by its fallback.
    External {
        /// Name of the external type.
        name: QualifiedName,
        /// Representation used in generated code.
        fallback: Box<TypeReference>,
    },
}

impl TypeReference {
    /// Calls `f` for every declared type this reference mentions.
    pub fn for_each_local(&self, f: &mut impl FnMut(&QualifiedName)) {
        match self {
            Self::Primitive(_) | Self::Binary => {}
            Self::Optional(inner) | Self::List(inner) | Self::Set(inner) => inner.for_each_local(f),
            Self::Map(key, value) => {
                key.for_each_local(f);
                value.for_each_local(f);
            }
            Self::Local(name) => f(name),
            Self::External { fallback, .. } => fallback.for_each_local(f),
        }
    }

    /// Returns the declared type held by value, if any.
    ///
    /// Optional wrappers and external fallbacks store their content inline;
    /// lists, sets and maps store theirs on the heap and end the search.
    #[must_use]
    pub fn by_value_local(&self) -> Option<&QualifiedName> {
        match self {
            Self::Local(name) => Some(name),
            Self::Optional(inner) => inner.by_value_local(),
            Self::External { fallback, .. } => fallback.by_value_local(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.ir_name()),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Set(inner) => write!(f, "set<{inner}>"),
            Self::Map(key, value) => write!(f, "map<{key}, {value}>"),
            Self::Binary => f.write_str("BINARY"),
            Self::Local(name) => write!(f, "{name}"),
            Self::External { name, .. } => write!(f, "external {name}"),
        }
    }
}

/// Logging classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Safety {
    /// May be logged in cleartext.
    Safe,
    /// Must not be logged in cleartext.
    #[default]
    Unsafe,
}

/// A field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name exactly as declared (also the wire name).
    pub name: String,
    /// Field type.
    pub type_ref: TypeReference,
    /// Documentation.
    pub docs: Option<String>,
    /// Optional safety annotation.
    pub safety: Option<Safety>,
}

/// A member of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDefinition {
    /// Discriminant tag exactly as declared.
    pub tag: String,
    /// Member type.
    pub type_ref: TypeReference,
    /// Documentation.
    pub docs: Option<String>,
}

/// A parameter of an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDefinition {
    /// Parameter name exactly as declared.
    pub name: String,
    /// Parameter type.
    pub type_ref: TypeReference,
    /// Logging classification.
    pub safety: Safety,
    /// Documentation.
    pub docs: Option<String>,
}

/// A distinct named wrapper around another type.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDef {
    /// Qualified name.
    pub name: QualifiedName,
    /// Wrapped type.
    pub target: TypeReference,
    /// Documentation.
    pub docs: Option<String>,
}

/// A known enumeration value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    /// Wire value, upper snake case.
    pub value: String,
    /// Documentation.
    pub docs: Option<String>,
}

/// An open-set enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// Qualified name.
    pub name: QualifiedName,
    /// Known values in declaration order.
    pub values: Vec<EnumValueDef>,
    /// Documentation.
    pub docs: Option<String>,
}

/// A record type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    /// Qualified name.
    pub name: QualifiedName,
    /// Fields in declaration order.
    pub fields: Vec<FieldDefinition>,
    /// Documentation.
    pub docs: Option<String>,
}

/// A tagged union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDef {
    /// Qualified name.
    pub name: QualifiedName,
    /// Members in declaration order.
    pub members: Vec<MemberDefinition>,
    /// Documentation.
    pub docs: Option<String>,
}

/// A declared error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDef {
    /// Qualified name.
    pub name: QualifiedName,
    /// Namespace used in the wire name `Namespace:Name`.
    pub namespace: String,
    /// Fixed category.
    pub code: ErrorCode,
    /// Parameters, safe ones first, in declaration order.
    pub params: Vec<ParamDefinition>,
    /// Documentation.
    pub docs: Option<String>,
}

impl ErrorDef {
    /// Returns the namespaced wire name.
    #[must_use]
    pub fn wire_name(&self) -> String {
        format!("{}:{}", self.namespace, self.name.name)
    }
}

/// Kind of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefinitionKind {
    /// Alias.
    Alias,
    /// Enumeration.
    Enum,
    /// Record.
    Object,
    /// Tagged union.
    Union,
    /// Error.
    Error,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alias => "alias",
            Self::Enum => "enum",
            Self::Object => "object",
            Self::Union => "union",
            Self::Error => "error",
        })
    }
}

/// Any declaration of the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    /// Alias.
    Alias(AliasDef),
    /// Enumeration.
    Enum(EnumDef),
    /// Record.
    Object(ObjectDef),
    /// Tagged union.
    Union(UnionDef),
    /// Error.
    Error(ErrorDef),
}

impl TypeDefinition {
    /// Returns the qualified name of the declaration.
    #[must_use]
    pub fn name(&self) -> &QualifiedName {
        match self {
            Self::Alias(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Object(d) => &d.name,
            Self::Union(d) => &d.name,
            Self::Error(d) => &d.name,
        }
    }

    /// Returns the kind of the declaration.
    #[must_use]
    pub const fn kind(&self) -> DefinitionKind {
        match self {
            Self::Alias(_) => DefinitionKind::Alias,
            Self::Enum(_) => DefinitionKind::Enum,
            Self::Object(_) => DefinitionKind::Object,
            Self::Union(_) => DefinitionKind::Union,
            Self::Error(_) => DefinitionKind::Error,
        }
    }

    /// Returns the documentation of the declaration.
    #[must_use]
    pub fn docs(&self) -> Option<&str> {
        match self {
            Self::Alias(d) => d.docs.as_deref(),
            Self::Enum(d) => d.docs.as_deref(),
            Self::Object(d) => d.docs.as_deref(),
            Self::Union(d) => d.docs.as_deref(),
            Self::Error(d) => d.docs.as_deref(),
        }
    }

    /// Returns every `(member name, type)` pair the declaration holds.
    ///
    /// An alias reports its target under the empty member name; enums hold no
    /// type references.
    #[must_use]
    pub fn references(&self) -> Vec<(&str, &TypeReference)> {
        match self {
            Self::Alias(d) => vec![("", &d.target)],
            Self::Enum(_) => Vec::new(),
            Self::Object(d) => d
                .fields
                .iter()
                .map(|f| (f.name.as_str(), &f.type_ref))
                .collect(),
            Self::Union(d) => d
                .members
                .iter()
                .map(|m| (m.tag.as_str(), &m.type_ref))
                .collect(),
            Self::Error(d) => d
                .params
                .iter()
                .map(|p| (p.name.as_str(), &p.type_ref))
                .collect(),
        }
    }
}

/// A parsed and normalized IR document.
#[derive(Debug, Clone, PartialEq)]
pub struct IrDocument {
    /// Declared schema version.
    pub version: u64,
    /// All declarations in document order (types, then errors).
    pub definitions: Vec<TypeDefinition>,
}
