//! Prelude module for convenient imports.
//!
//! ```ignore
//! use wiregen::prelude::*;
//! ```

// Runtime types
pub use wiregen_core::{
    Binary, ErrorCode, ErrorType, SerializableError, UnknownMember, UnknownValue,
};

// Schema types
pub use wiregen_schema::{SchemaError, SchemaIr, load_ir, load_ir_file};

// Codegen types
pub use wiregen_codegen::{
    CodegenError, GeneratedTree, Generator, GeneratorConfig, generate, generate_from_file,
    generate_from_str, generate_to_dir,
};
