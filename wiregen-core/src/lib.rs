//! # wiregen Core
//!
//! Runtime support for code generated by wiregen.
//!
//! This crate provides:
//! - The fixed error category enumeration and the four-key error wire envelope
//! - The [`ErrorType`] trait implemented by every generated error
//! - Open-enum and tagged-union helpers that keep unrecognized members intact
//! - Collection null-canonicalization for generated records
//! - A base64 binary wrapper
//! - A YAML codec derived from the canonical JSON encoding

pub mod collections;
pub mod enums;
pub mod error;
pub mod errors;
pub mod types;
pub mod union;
pub mod yaml;

pub use error::{Error, Result};
pub use enums::UnknownValue;
pub use errors::{ErrorCode, ErrorType, SerializableError};
pub use types::Binary;
pub use union::UnknownMember;
pub use yaml::YamlCodec;

// Generated code reaches these through the runtime so consumers only depend
// on this crate, serde and serde_json.
pub use chrono;
pub use uuid;
