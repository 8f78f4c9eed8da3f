//! Open-enum support.
//!
//! Generated enums keep values they do not know as an [`UnknownValue`].
//! Only a generated decoder creates one, after uppercasing the input and
//! ruling out every known value, so an unknown value never spells a known
//! one and always round-trips unchanged.

use std::fmt;

/// Uppercased text of an enum value unknown to the generated code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownValue(String);

impl UnknownValue {
    /// Wraps text that already failed to match every known value.
    ///
    /// Called by generated `from_wire` decoders; build enum values with
    /// `from_wire` instead.
    #[doc(hidden)]
    #[must_use]
    pub fn from_unmatched(value: String) -> Self {
        Self(value)
    }

    /// Returns the value exactly as it is written on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the wire text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
