//! # wiregen
//!
//! Schema-driven generator of typed Rust wire models.
//!
//! wiregen reads a language-neutral intermediate representation (IR) of a
//! service contract and emits Rust data types with exact JSON wire semantics:
//! aliases as distinct newtypes, open enums, records, tagged unions that
//! survive unknown members, and typed errors with a fixed wire envelope.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wiregen::prelude::*;
//!
//! let config = GeneratorConfig::new().server_extras(true);
//! let written = generate_to_dir("api.ir.json".as_ref(), "src/generated".as_ref(), &config)?;
//! println!("wrote {} files", written.len());
//! # Ok::<(), CodegenError>(())
//! ```
//!
//! From a build script, render the whole tree into one file instead:
//!
//! ```no_run
//! use wiregen::prelude::*;
//!
//! let tree = generate_from_file("api.ir.json".as_ref(), &GeneratorConfig::new())?;
//! std::fs::write("generated.rs", tree.render_bundle()?).expect("write");
//! # Ok::<(), CodegenError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Runtime support used by generated code
//! - [`schema`] - IR loading, validation and analysis
//! - [`codegen`] - Rust emitters and the output writer

pub mod cli;
pub mod prelude;

/// Runtime support used by generated code.
pub mod core {
    pub use wiregen_core::*;
}

/// IR loading, validation and analysis.
pub mod schema {
    pub use wiregen_schema::*;
}

/// Rust code generation from an analyzed IR.
pub mod codegen {
    pub use wiregen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use wiregen_codegen::{CodegenError, GeneratorConfig, generate_from_file, generate_to_dir};
pub use wiregen_schema::{SchemaIr, load_ir_file};
