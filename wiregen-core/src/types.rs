//! Scalar wrapper types used by generated code.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;

/// Binary payload, encoded on the wire as standard base64 text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    /// Creates a binary value from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper and returns the raw bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Binary {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Binary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map(Self).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_base64() {
        let binary = Binary::new(b"hello".to_vec());
        let encoded = serde_json::to_string(&binary).expect("encode");
        assert_eq!(encoded, "\"aGVsbG8=\"");
        let decoded: Binary = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded.as_bytes(), b"hello");
    }

    #[test]
    fn test_binary_rejects_invalid_base64() {
        let result: Result<Binary, _> = serde_json::from_str("\"***\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_binary_empty() {
        let binary = Binary::default();
        assert_eq!(serde_json::to_string(&binary).expect("encode"), "\"\"");
        assert!(binary.is_empty());
    }
}
