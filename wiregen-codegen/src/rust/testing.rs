//! Helpers for emitter tests.

use crate::config::GeneratorConfig;
use crate::generate_from_str;
use std::path::Path;

/// Generates `json` and returns the rendered `<module>/<stem>.rs`.
pub(crate) fn render(json: &str, config: &GeneratorConfig, module: &str, stem: &str) -> String {
    let path = Path::new(&module.replace('.', "/")).join(format!("{stem}.rs"));
    generate_from_str(json, config)
        .expect("Failed to generate")
        .render_files()
        .into_iter()
        .find(|file| file.path == path)
        .map(|file| file.contents)
        .unwrap_or_else(|| panic!("no file {}", path.display()))
}

/// Wraps type declarations in a version 1 document.
pub(crate) fn document(types: &str, errors: &str) -> String {
    format!(r#"{{"version": 1, "types": [{types}], "errors": [{errors}]}}"#)
}
