//! # wiregen Conformance
//!
//! Types generated at build time from `fixtures/conformance.ir.json`, with
//! server extras enabled. The tests of this crate check the wire behavior of
//! the generated code, not the generator itself.

/// The generated module tree.
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}
