//! # wiregen Codegen
//!
//! Rust code generation from wiregen IR documents.
//!
//! This crate provides:
//! - Emitters for aliases, enums, objects, unions, errors and generic visitors
//! - Per-file import management with stable aliasing
//! - Formatting with import normalization
//! - An atomic output writer and a single-file bundle for build scripts
//!
//! ```no_run
//! use wiregen_codegen::{GeneratorConfig, generate_from_file};
//!
//! let config = GeneratorConfig::new();
//! let tree = generate_from_file("api.ir.json".as_ref(), &config)?;
//! let bundle = tree.render_bundle()?;
//! # Ok::<(), wiregen_codegen::CodegenError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod imports;
pub mod naming;
pub mod rust;
pub mod writer;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{ConstructKind, Generator};
pub use writer::{GeneratedTree, RenderedFile};

use std::path::{Path, PathBuf};
use wiregen_schema::SchemaIr;

/// Generates the module tree for an analyzed IR.
///
/// # Errors
/// Returns `CodegenError` if the configuration is invalid or emission fails.
pub fn generate(ir: &SchemaIr, config: &GeneratorConfig) -> Result<GeneratedTree, CodegenError> {
    Generator::new(ir, config)?.generate()
}

/// Generates the module tree from IR JSON text.
///
/// # Errors
/// Returns `CodegenError` if loading, validation or generation fails.
pub fn generate_from_str(
    json: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedTree, CodegenError> {
    let ir = wiregen_schema::load_ir(json)?;
    generate(&ir, config)
}

/// Generates the module tree from an IR file.
///
/// # Errors
/// Returns `CodegenError` if reading, validation or generation fails.
pub fn generate_from_file(
    path: &Path,
    config: &GeneratorConfig,
) -> Result<GeneratedTree, CodegenError> {
    let ir = wiregen_schema::load_ir_file(path)?;
    generate(&ir, config)
}

/// Generates code from an IR file and writes it under `output`.
///
/// Nothing is written unless loading, validation and generation all succeed.
///
/// # Returns
/// The paths of all written files.
///
/// # Errors
/// Returns `CodegenError` if any phase fails; a failed write leaves `output`
/// as it was.
pub fn generate_to_dir(
    input: &Path,
    output: &Path,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>, CodegenError> {
    generate_from_file(input, config)?.write_to(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_ir_writes_nothing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = dir.path().join("broken.json");
        std::fs::write(&input, r#"{"version": 1, "types": [{"type": "enum", "enum": {
            "typeName": {"name": "Empty", "package": "a"}, "values": []}}]}"#)
            .expect("Failed to write input");
        let output = dir.path().join("out");

        let result = generate_to_dir(&input, &output, &GeneratorConfig::new());
        assert!(matches!(result, Err(CodegenError::Schema(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_generate_from_str_bundle() {
        let json = r#"{"version": 1, "types": [{"type": "enum", "enum": {
            "typeName": {"name": "Suit", "package": "cards"},
            "values": [{"value": "HEARTS"}, {"value": "SPADES"}]}}]}"#;
        let bundle = generate_from_str(json, &GeneratorConfig::new())
            .and_then(|tree| tree.render_bundle())
            .expect("Failed to generate");
        assert!(bundle.contains("pub mod cards {"));
        assert!(bundle.contains("pub enum Suit {"));
        assert!(bundle.contains("Unknown(wiregen_core::enums::UnknownValue),"));
    }
}
