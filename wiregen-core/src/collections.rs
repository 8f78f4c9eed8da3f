//! Collection canonicalization for generated records.
//!
//! A collection field never distinguishes "absent", "null" and "empty": all
//! three decode to the empty collection, and encoding always writes the
//! (possibly empty) collection literal.

use serde::{Deserialize, Deserializer};

/// Deserializes a collection, mapping an explicit `null` to the empty value.
///
/// Generated records pair this with `#[serde(default)]` so an absent field
/// takes the same path.
///
/// # Errors
/// Returns the deserializer's error if the value is neither `null` nor a
/// valid collection.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
