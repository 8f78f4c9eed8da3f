//! # wiregen Schema
//!
//! IR loading and analysis for wiregen.
//!
//! This crate provides:
//! - JSON IR document parsing and schema-version checking
//! - The normalized type model (aliases, enums, objects, unions, errors)
//! - Total validation of declarations before any output is produced
//! - The type registry and structural type resolver
//! - The module dependency graph, cycle detection and recursive-field analysis
//! - The resolved, immutable [`SchemaIr`] consumed by code generation

pub mod error;
pub mod graph;
pub mod ir;
pub mod loader;
pub mod parser;
pub mod registry;
pub mod types;
pub mod validation;

pub use error::{CycleError, LoadError, SchemaError, UnresolvedTypeError};
pub use graph::{Indirections, ModuleCycle, ModuleGraph};
pub use ir::SchemaIr;
pub use loader::{load_ir, load_ir_file};
pub use registry::{ResolvedType, TypeRegistry};
pub use types::{
    AliasDef, DefinitionKind, EnumDef, EnumValueDef, ErrorDef, FieldDefinition, IrDocument,
    MemberDefinition, ObjectDef, ParamDefinition, PrimitiveKind, QualifiedName, Safety,
    TypeDefinition, TypeReference, UnionDef,
};
