//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Loading, validation or analysis of the IR failed.
    #[error("schema error: {0}")]
    Schema(#[from] wiregen_schema::SchemaError),

    /// The generator configuration is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// An emitter produced code that is not valid Rust.
    ///
    /// This is always a defect in the generator, never caused by the input.
    #[error("emission error in '{context}': {message}")]
    Emission {
        /// File or declaration being emitted.
        context: String,
        /// Error message.
        message: String,
    },

    /// A child module has the same name as a generated file of its parent.
    #[error("module '{module}' collides with the generated '{file}.rs' of its parent package")]
    ModuleCollision {
        /// The colliding module path.
        module: String,
        /// Stem of the generated file.
        file: String,
    },

    /// Writing an output file failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Path of the file or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates an emission error.
    pub fn emission(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Emission {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_names_path() {
        let error = CodegenError::Write {
            path: PathBuf::from("out/com/mod.rs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("out/com/mod.rs"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_schema_error_conversion() {
        let schema = wiregen_schema::SchemaError::validation("bad");
        let error: CodegenError = schema.into();
        assert!(matches!(error, CodegenError::Schema(_)));
    }
}
