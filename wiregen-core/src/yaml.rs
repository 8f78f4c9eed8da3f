//! YAML codec derived from the canonical JSON encoding.
//!
//! YAML is never produced by an independent serializer: values are encoded to
//! JSON first and the JSON document is converted to an ordered YAML mapping,
//! so the two formats cannot disagree on field names, null handling or
//! union shapes.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Encodes a value as YAML by way of its JSON encoding.
///
/// # Errors
/// Returns an error if the JSON encoding or the YAML conversion fails.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    Ok(serde_yaml::to_string(&json)?)
}

/// Decodes a value from YAML by converting the document to JSON first.
///
/// # Errors
/// Returns an error if the YAML is malformed or does not decode as `T`.
pub fn from_yaml<T: DeserializeOwned>(text: &str) -> Result<T> {
    let json: Value = serde_yaml::from_str(text)?;
    Ok(serde_json::from_value(json)?)
}

/// YAML encoding for every JSON-encodable type.
pub trait YamlCodec: Serialize + DeserializeOwned {
    /// Encodes `self` as YAML.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    fn to_yaml_string(&self) -> Result<String> {
        to_yaml(self)
    }

    /// Decodes a value from YAML text.
    ///
    /// # Errors
    /// Returns an error if decoding fails.
    fn from_yaml_str(text: &str) -> Result<Self> {
        from_yaml(text)
    }
}

impl<T: Serialize + DeserializeOwned> YamlCodec for T {}
