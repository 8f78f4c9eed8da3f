//! Generates the conformance types from the fixture IR.

use std::env;
use std::fs;
use std::path::PathBuf;
use wiregen_codegen::{GeneratorConfig, generate_from_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?)
        .join("fixtures")
        .join("conformance.ir.json");
    println!("cargo:rerun-if-changed={}", fixture.display());

    let config = GeneratorConfig::new().server_extras(true);
    let bundle = generate_from_file(&fixture, &config)?.render_bundle()?;
    fs::write(PathBuf::from(env::var("OUT_DIR")?).join("generated.rs"), bundle)?;
    Ok(())
}
