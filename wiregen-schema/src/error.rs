//! Error types for IR loading, validation and analysis.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for reading and parsing an IR document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read IR file '{path}': {source}")]
    Io {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not syntactically valid JSON.
    #[error("malformed IR document: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file does not carry a recognized extension.
    #[error("unsupported IR file extension for '{path}', expected '.json'")]
    UnsupportedExtension {
        /// Path of the input file.
        path: PathBuf,
    },
}

/// A type reference that names no declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unresolved type reference '{name}'")]
pub struct UnresolvedTypeError {
    /// The qualified name that failed to resolve.
    pub name: String,
}

/// A cross-module dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CycleError {
    /// Participating modules, sorted.
    pub modules: Vec<String>,
    /// References closing the cycle, one `from -> to` entry per module edge.
    pub chain: Vec<String>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cyclic dependency between modules [{}]",
            self.modules.join(", ")
        )?;
        if !self.chain.is_empty() {
            write!(f, " via {}", self.chain.join(", "))?;
        }
        Ok(())
    }
}

/// Error type for schema validation and analysis.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The declared schema version is missing or unsupported.
    #[error("unsupported IR version {found:?}, supported versions: {supported:?}")]
    UnsupportedVersion {
        /// Version found in the document.
        found: Option<u64>,
        /// Versions this loader accepts.
        supported: &'static [u64],
    },

    /// Two declarations share a qualified name.
    #[error("duplicate declaration of '{name}'")]
    DuplicateDeclaration {
        /// The colliding qualified name.
        name: String,
    },

    /// A reference names no declared type.
    #[error("unresolved type '{name}' referenced from '{site}'")]
    UnresolvedType {
        /// The qualified name that failed to resolve.
        name: String,
        /// Declaration (and member) holding the reference.
        site: String,
    },

    /// An alias chain leads back to itself.
    #[error("alias cycle detected: {path}")]
    AliasCycle {
        /// The aliases forming the cycle.
        path: String,
    },

    /// Modules depend on each other cyclically.
    #[error("{0}")]
    Cycle(#[from] CycleError),

    /// A declaration is structurally invalid.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an unresolved type error for a reference site.
    pub fn unresolved(error: UnresolvedTypeError, site: impl Into<String>) -> Self {
        Self::UnresolvedType {
            name: error.name,
            site: site.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_display() {
        let error = CycleError {
            modules: vec!["a".to_string(), "b".to_string()],
            chain: vec!["a.X -> b.Y".to_string(), "b.Y -> a.X".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "cyclic dependency between modules [a, b] via a.X -> b.Y, b.Y -> a.X"
        );
    }

    #[test]
    fn test_unresolved_with_site() {
        let error = SchemaError::unresolved(
            UnresolvedTypeError {
                name: "com.x.Missing".to_string(),
            },
            "com.x.Holder.field",
        );
        assert!(error.to_string().contains("com.x.Missing"));
        assert!(error.to_string().contains("com.x.Holder.field"));
    }
}
