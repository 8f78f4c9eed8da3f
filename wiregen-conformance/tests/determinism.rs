use std::path::Path;
use wiregen_codegen::{GeneratorConfig, generate_from_file};

const BUILT: &str = include_str!(concat!(env!("OUT_DIR"), "/generated.rs"));

fn fixture() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/conformance.ir.json"
    ))
}

#[test]
fn test_regeneration_is_byte_identical() {
    let config = GeneratorConfig::new().server_extras(true);
    let bundle = generate_from_file(fixture(), &config)
        .and_then(|tree| tree.render_bundle())
        .expect("Failed to generate");
    assert_eq!(bundle, BUILT);
}

#[test]
fn test_colliding_module_names_get_stable_aliases() {
    let tree = generate_from_file(fixture(), &GeneratorConfig::new()).expect("Failed to generate");
    let files = tree.render_files();
    let batch = files
        .iter()
        .find(|f| f.path == Path::new("com/example/client/objects.rs"))
        .expect("missing client objects");

    assert!(
        batch
            .contents
            .contains("use super::super::super::super::com::example::v1::api;")
    );
    assert!(
        batch
            .contents
            .contains("use super::super::super::super::com::example::v2::api as api_1;")
    );
    assert!(batch.contents.contains("pub first: api::Request,"));
    assert!(batch.contents.contains("pub second: api_1::Request,"));
    assert_eq!(files, tree.render_files());
}
