//! JSON IR document parser.
//!
//! This module deserializes the wire form of an IR document and normalizes it
//! into the [`crate::types`] model. Malformed JSON is a [`LoadError`]; JSON
//! that is well formed but does not describe a valid document is a
//! [`SchemaError`].

use crate::error::{LoadError, SchemaError};
use crate::types::{
    AliasDef, EnumDef, EnumValueDef, ErrorDef, FieldDefinition, IrDocument, MemberDefinition,
    ObjectDef, ParamDefinition, PrimitiveKind, QualifiedName, Safety, TypeDefinition,
    TypeReference, UnionDef,
};
use serde::Deserialize;
use serde_json::Value;
use wiregen_core::ErrorCode;

/// IR versions this parser understands.
pub const SUPPORTED_VERSIONS: &[u64] = &[1];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    types: Vec<RawTypeDefinition>,
    #[serde(default)]
    errors: Vec<RawErrorDefinition>,
    #[serde(default)]
    services: Vec<Value>,
    #[serde(default)]
    extensions: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeName {
    name: String,
    package: String,
}

impl From<RawTypeName> for QualifiedName {
    fn from(raw: RawTypeName) -> Self {
        Self::new(raw.package, raw.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawTypeDefinition {
    Alias { alias: RawAlias },
    Enum {
        #[serde(rename = "enum")]
        definition: RawEnum,
    },
    Object { object: RawObject },
    Union {
        #[serde(rename = "union")]
        definition: RawUnion,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAlias {
    type_name: RawTypeName,
    alias: RawType,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnum {
    type_name: RawTypeName,
    #[serde(default)]
    values: Vec<RawEnumValue>,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnumValue {
    value: String,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObject {
    type_name: RawTypeName,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnion {
    type_name: RawTypeName,
    #[serde(default)]
    union: Vec<RawField>,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    field_name: String,
    #[serde(rename = "type")]
    type_ref: RawType,
    #[serde(default)]
    docs: Option<String>,
    #[serde(default)]
    safety: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawErrorDefinition {
    error_name: RawTypeName,
    namespace: String,
    code: String,
    #[serde(default)]
    safe_args: Vec<RawField>,
    #[serde(default)]
    unsafe_args: Vec<RawField>,
    #[serde(default)]
    docs: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawType {
    Primitive { primitive: String },
    Optional { optional: RawItem },
    List { list: RawItem },
    Set { set: RawItem },
    Map { map: RawMap },
    Reference { reference: RawTypeName },
    External { external: RawExternal },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    item_type: Box<RawType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMap {
    key_type: Box<RawType>,
    value_type: Box<RawType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExternal {
    external_reference: RawTypeName,
    fallback: Box<RawType>,
}

/// Parses an IR document from JSON text.
///
/// # Arguments
/// * `json` - IR document content
///
/// # Returns
/// The normalized document.
///
/// # Errors
/// Returns `SchemaError::Load` if the text is not valid JSON, and another
/// `SchemaError` if the version is unsupported or the declarations are
/// structurally invalid.
pub fn parse_document(json: &str) -> Result<IrDocument, SchemaError> {
    let value: Value = serde_json::from_str(json).map_err(LoadError::Json)?;
    let version = check_version(&value)?;

    let raw: RawDocument = serde_json::from_value(value)
        .map_err(|e| SchemaError::validation(format!("invalid IR structure: {e}")))?;

    if !raw.services.is_empty() {
        tracing::debug!(
            "ignoring {} service declaration(s), services are not generated",
            raw.services.len()
        );
    }
    if raw.extensions.is_some() {
        tracing::debug!("ignoring IR extensions");
    }

    let mut definitions = Vec::with_capacity(raw.types.len() + raw.errors.len());
    for raw_type in raw.types {
        definitions.push(convert_type_definition(raw_type)?);
    }
    for raw_error in raw.errors {
        definitions.push(TypeDefinition::Error(convert_error(raw_error)?));
    }

    Ok(IrDocument {
        version,
        definitions,
    })
}

/// Reads and checks the declared schema version.
fn check_version(value: &Value) -> Result<u64, SchemaError> {
    let found = value.get("version").and_then(Value::as_u64);
    match found {
        Some(version) if SUPPORTED_VERSIONS.contains(&version) => Ok(version),
        _ => Err(SchemaError::UnsupportedVersion {
            found,
            supported: SUPPORTED_VERSIONS,
        }),
    }
}

fn convert_type_definition(raw: RawTypeDefinition) -> Result<TypeDefinition, SchemaError> {
    Ok(match raw {
        RawTypeDefinition::Alias { alias } => TypeDefinition::Alias(AliasDef {
            name: alias.type_name.into(),
            target: convert_type(alias.alias)?,
            docs: alias.docs,
        }),
        RawTypeDefinition::Enum { definition } => TypeDefinition::Enum(EnumDef {
            name: definition.type_name.into(),
            values: definition
                .values
                .into_iter()
                .map(|v| EnumValueDef {
                    value: v.value,
                    docs: v.docs,
                })
                .collect(),
            docs: definition.docs,
        }),
        RawTypeDefinition::Object { object } => TypeDefinition::Object(ObjectDef {
            name: object.type_name.into(),
            fields: object
                .fields
                .into_iter()
                .map(convert_field)
                .collect::<Result<_, _>>()?,
            docs: object.docs,
        }),
        RawTypeDefinition::Union { definition } => TypeDefinition::Union(UnionDef {
            name: definition.type_name.into(),
            members: definition
                .union
                .into_iter()
                .map(|m| {
                    Ok(MemberDefinition {
                        tag: m.field_name,
                        type_ref: convert_type(m.type_ref)?,
                        docs: m.docs,
                    })
                })
                .collect::<Result<_, SchemaError>>()?,
            docs: definition.docs,
        }),
    })
}

fn convert_field(raw: RawField) -> Result<FieldDefinition, SchemaError> {
    let safety = raw.safety.as_deref().map(parse_safety).transpose()?;
    Ok(FieldDefinition {
        name: raw.field_name,
        type_ref: convert_type(raw.type_ref)?,
        docs: raw.docs,
        safety,
    })
}

fn convert_error(raw: RawErrorDefinition) -> Result<ErrorDef, SchemaError> {
    let code: ErrorCode = raw.code.parse().map_err(|_| {
        SchemaError::validation(format!(
            "error '{}.{}' has unknown code '{}'",
            raw.error_name.package, raw.error_name.name, raw.code
        ))
    })?;

    let mut params = Vec::with_capacity(raw.safe_args.len() + raw.unsafe_args.len());
    for (args, safety) in [(raw.safe_args, Safety::Safe), (raw.unsafe_args, Safety::Unsafe)] {
        for arg in args {
            params.push(ParamDefinition {
                name: arg.field_name,
                type_ref: convert_type(arg.type_ref)?,
                safety,
                docs: arg.docs,
            });
        }
    }

    Ok(ErrorDef {
        name: raw.error_name.into(),
        namespace: raw.namespace,
        code,
        params,
        docs: raw.docs,
    })
}

fn convert_type(raw: RawType) -> Result<TypeReference, SchemaError> {
    Ok(match raw {
        RawType::Primitive { primitive } => {
            if primitive == "BINARY" {
                TypeReference::Binary
            } else {
                let kind = PrimitiveKind::from_ir_name(&primitive).ok_or_else(|| {
                    SchemaError::validation(format!("unknown primitive type '{primitive}'"))
                })?;
                TypeReference::Primitive(kind)
            }
        }
        RawType::Optional { optional } => {
            TypeReference::Optional(Box::new(convert_type(*optional.item_type)?))
        }
        RawType::List { list } => TypeReference::List(Box::new(convert_type(*list.item_type)?)),
        RawType::Set { set } => TypeReference::Set(Box::new(convert_type(*set.item_type)?)),
        RawType::Map { map } => TypeReference::Map(
            Box::new(convert_type(*map.key_type)?),
            Box::new(convert_type(*map.value_type)?),
        ),
        RawType::Reference { reference } => TypeReference::Local(reference.into()),
        RawType::External { external } => TypeReference::External {
            name: external.external_reference.into(),
            fallback: Box::new(convert_type(*external.fallback)?),
        },
    })
}

fn parse_safety(raw: &str) -> Result<Safety, SchemaError> {
    match raw {
        "SAFE" => Ok(Safety::Safe),
        "UNSAFE" | "DO_NOT_LOG" => Ok(Safety::Unsafe),
        other => Err(SchemaError::validation(format!(
            "unknown safety annotation '{other}'"
        ))),
    }
}
