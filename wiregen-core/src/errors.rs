//! Error categories and the error wire envelope.
//!
//! Every generated error type implements [`ErrorType`] and travels on the wire
//! as a [`SerializableError`]: a fixed four-key object
//! `{errorCode, errorName, errorInstanceId, parameters}`.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed error category carried by every declared error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The caller is not allowed to perform the operation.
    PermissionDenied,
    /// The request was malformed.
    InvalidArgument,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with the current state.
    Conflict,
    /// The request payload is too large.
    RequestEntityTooLarge,
    /// The system is not in a state that allows the operation.
    FailedPrecondition,
    /// Unexpected server-side failure.
    Internal,
    /// The operation did not complete in time.
    Timeout,
    /// Client-side error with a custom meaning.
    CustomClient,
    /// Server-side error with a custom meaning.
    CustomServer,
}

impl ErrorCode {
    /// All categories in declaration order.
    pub const ALL: [Self; 10] = [
        Self::PermissionDenied,
        Self::InvalidArgument,
        Self::NotFound,
        Self::Conflict,
        Self::RequestEntityTooLarge,
        Self::FailedPrecondition,
        Self::Internal,
        Self::Timeout,
        Self::CustomClient,
        Self::CustomServer,
    ];

    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Internal => "INTERNAL",
            Self::Timeout => "TIMEOUT",
            Self::CustomClient => "CUSTOM_CLIENT",
            Self::CustomServer => "CUSTOM_SERVER",
        }
    }

    /// Returns the HTTP status code a server reports for this category.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PermissionDenied => 403,
            Self::InvalidArgument | Self::CustomClient => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::RequestEntityTooLarge => 413,
            Self::FailedPrecondition | Self::Internal | Self::Timeout | Self::CustomServer => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|code| code.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnknownErrorCode {
                code: s.to_string(),
            })
    }
}

/// Behavior shared by every generated error type.
///
/// The safe/unsafe partition only guides logging: both categories are part of
/// [`ErrorType::parameters`] and of the wire envelope.
pub trait ErrorType {
    /// Returns the error category.
    fn code(&self) -> ErrorCode;

    /// Returns the namespaced name, `Namespace:Name`.
    fn name(&self) -> &str;

    /// Returns the identifier assigned when the instance was created.
    fn instance_id(&self) -> Uuid;

    /// Returns the names of the parameters that are safe to log.
    fn safe_args(&self) -> &'static [&'static str];

    /// Returns every parameter, safe and unsafe, keyed by declared name.
    fn parameters(&self) -> Map<String, Value>;
}

/// Writes the standard one-line description of an error.
///
/// Only the category, name and instance identifier are written; parameters
/// may be unsafe to log.
///
/// # Errors
/// Returns `fmt::Error` if the formatter fails.
pub fn fmt_error<E: ErrorType + ?Sized>(error: &E, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "{} {} ({})",
        error.code(),
        error.name(),
        error.instance_id()
    )
}

/// The four-key error wire envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableError {
    error_code: ErrorCode,
    error_name: String,
    error_instance_id: Uuid,
    #[serde(default)]
    parameters: Value,
}

impl SerializableError {
    /// Creates an envelope from its parts.
    #[must_use]
    pub fn new(
        error_code: ErrorCode,
        error_name: impl Into<String>,
        error_instance_id: Uuid,
        parameters: Map<String, Value>,
    ) -> Self {
        Self {
            error_code,
            error_name: error_name.into(),
            error_instance_id,
            parameters: Value::Object(parameters),
        }
    }

    /// Creates the envelope for a declared error.
    #[must_use]
    pub fn from_error<E: ErrorType + ?Sized>(error: &E) -> Self {
        Self::new(
            error.code(),
            error.name(),
            error.instance_id(),
            error.parameters(),
        )
    }

    /// Returns the error category.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    /// Returns the namespaced error name.
    #[must_use]
    pub fn error_name(&self) -> &str {
        &self.error_name
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn error_instance_id(&self) -> Uuid {
        self.error_instance_id
    }

    /// Returns the raw parameters payload exactly as received.
    #[must_use]
    pub const fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Consumes the envelope and returns the raw parameters payload.
    #[must_use]
    pub fn into_parameters(self) -> Value {
        self.parameters
    }
}
