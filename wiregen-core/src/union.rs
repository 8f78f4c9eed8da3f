//! Tagged-union wire helpers.
//!
//! A union travels as `{"type": "<tag>", "<tag>": <value>}`. Members whose tag
//! was not known when the code was generated are kept as an
//! [`UnknownMember`] so they survive a decode/encode round trip.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key holding the union discriminant.
pub const TAG_KEY: &str = "type";

/// Serializes one union member in the tagged wire shape.
///
/// # Errors
/// Returns the serializer's error if writing the map fails.
pub fn serialize_member<S, T>(serializer: S, tag: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry(TAG_KEY, tag)?;
    map.serialize_entry(tag, value)?;
    map.end()
}

/// Decodes the value of a recognized member.
///
/// # Errors
/// Returns a custom error of the caller's deserializer if the value does not
/// match the member type.
pub fn decode_member<T, E>(value: Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: serde::de::Error,
{
    serde_json::from_value(value).map_err(E::custom)
}

/// A union read off the wire, split into discriminant and member value.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedMember {
    tag: String,
    value: Value,
}

impl TaggedMember {
    /// Returns the discriminant.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the member value, dropping the discriminant.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl<'de> Deserialize<'de> for TaggedMember {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let tag = match object.remove(TAG_KEY) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "union tag must be a string, found {other}"
                )));
            }
            None => return Err(D::Error::missing_field(TAG_KEY)),
        };
        // An absent member value reads as null so optional members decode.
        let value = object.remove(&tag).unwrap_or(Value::Null);
        Ok(Self { tag, value })
    }
}

/// A union member whose tag is not part of the generated contract.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownMember {
    tag: String,
    value: Value,
}

impl UnknownMember {
    /// Keeps a decoded member whose tag matched no generated member.
    ///
    /// Called by generated decoders only, so the tag is never one the
    /// union knows.
    #[doc(hidden)]
    #[must_use]
    pub fn from_unmatched(member: TaggedMember) -> Self {
        Self {
            tag: member.tag,
            value: member.value,
        }
    }

    /// Returns the unrecognized tag exactly as received.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the raw member value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

impl Serialize for UnknownMember {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_member(serializer, &self.tag, &self.value)
    }
}
