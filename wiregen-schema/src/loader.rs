//! IR loading entry points.
//!
//! Loading runs the parser and the full analysis, so a successful load always
//! yields a [`SchemaIr`] that is safe to emit.

use crate::error::{LoadError, SchemaError};
use crate::ir::SchemaIr;
use crate::parser::parse_document;
use std::path::Path;
use tracing::{debug, info};

/// Loads and analyzes an IR document from JSON text.
///
/// # Arguments
/// * `json` - IR document content
///
/// # Returns
/// The validated and analyzed schema.
///
/// # Errors
/// Returns `SchemaError` if the document cannot be parsed or is invalid.
pub fn load_ir(json: &str) -> Result<SchemaIr, SchemaError> {
    let document = parse_document(json)?;
    debug!(
        "parsed IR version {} with {} declarations",
        document.version,
        document.definitions.len()
    );
    SchemaIr::from_document(document)
}

/// Loads and analyzes an IR document from a `.json` file.
///
/// # Arguments
/// * `path` - Path to the IR file
///
/// # Errors
/// Returns `SchemaError::Load` if the extension is not `.json` or the file
/// cannot be read, and any other `SchemaError` from [`load_ir`].
pub fn load_ir_file(path: &Path) -> Result<SchemaIr, SchemaError> {
    let has_json_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !has_json_extension {
        return Err(LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
        }
        .into());
    }

    info!("loading IR from {}", path.display());
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_ir(&json)
}
