//! Formatting of generated files.
//!
//! Emitters build a [`syn::File`]; `prettyplease` prints it and
//! [`normalize_imports`] then gathers the ordinary imports into one sorted,
//! deduplicated block.

use crate::error::CodegenError;
use proc_macro2::TokenStream;

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by wiregen. DO NOT EDIT.";

/// Parses emitter output into a syntax tree.
///
/// # Errors
/// Returns `CodegenError::Emission` if the tokens are not a valid Rust file.
pub fn parse_file(context: &str, tokens: TokenStream) -> Result<syn::File, CodegenError> {
    syn::parse2::<syn::File>(tokens).map_err(|e| CodegenError::emission(context, e.to_string()))
}

/// Prints a syntax tree as a complete generated file.
///
/// `guard` lines are written as comments right after the header.
#[must_use]
pub fn render_file(file: &syn::File, guard: &[&str]) -> String {
    let body = normalize_imports(&prettyplease::unparse(file));
    let mut output = String::with_capacity(body.len() + 128);
    output.push_str(HEADER);
    output.push('\n');
    for line in guard {
        output.push_str("// ");
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    output.push_str(&body);
    output
}

/// Collects ordinary top-level imports into one block.
///
/// An ordinary import is a top-level `use` item that is not `pub` and not
/// preceded by an attribute. Those are removed, deduplicated, sorted and
/// written as one block where the first of them stood. `pub use` items,
/// attribute-guarded imports, `extern crate` items and inner attributes keep
/// their original position.
#[must_use]
pub fn normalize_imports(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut imports: Vec<String> = Vec::new();
    let mut removed = vec![false; lines.len()];
    let mut first_import = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let guarded = i > 0 && lines[i - 1].starts_with("#[");
        if line.starts_with("use ") && !guarded {
            let start = i;
            while !lines[i].trim_end().ends_with(';') && i + 1 < lines.len() {
                i += 1;
            }
            let statement = lines[start..=i].join("\n");
            if !imports.contains(&statement) {
                imports.push(statement);
            }
            removed[start..=i].iter_mut().for_each(|r| *r = true);
            first_import.get_or_insert(start);
        }
        i += 1;
    }

    let Some(first_import) = first_import else {
        return source.to_string();
    };
    imports.sort_by(|a, b| import_key(a).cmp(&import_key(b)));

    let mut output = String::with_capacity(source.len());
    let mut previous_blank = false;
    for (index, line) in lines.iter().enumerate() {
        if index == first_import {
            for import in &imports {
                output.push_str(import);
                output.push('\n');
            }
            previous_blank = false;
        }
        if removed[index] {
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        output.push_str(line);
        output.push('\n');
        previous_blank = blank;
    }
    output
}

/// Sort key of an import, ignoring layout.
fn import_key(statement: &str) -> String {
    statement.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn test_imports_sorted_and_deduplicated() {
        let source = "use b::B;\nuse a::A;\n\nstruct X;\nuse b::B;\n";
        assert_eq!(normalize_imports(source), "use a::A;\nuse b::B;\n\nstruct X;\n");
    }

    #[test]
    fn test_special_imports_keep_position() {
        let source = "#![allow(dead_code)]\nextern crate alloc;\nuse z::Z;\npub use self::x::*;\n#[cfg(feature = \"f\")]\nuse y::Y;\nuse a::A;\n";
        let expected = "#![allow(dead_code)]\nextern crate alloc;\nuse a::A;\nuse z::Z;\npub use self::x::*;\n#[cfg(feature = \"f\")]\nuse y::Y;\n";
        assert_eq!(normalize_imports(source), expected);
    }

    #[test]
    fn test_multiline_import() {
        let source = "use super::{\n    a, b,\n};\nuse super::c;\n\nfn f() {}\n";
        let output = normalize_imports(source);
        assert_eq!(output, "use super::c;\nuse super::{\n    a, b,\n};\n\nfn f() {}\n");
    }

    #[test]
    fn test_nested_uses_untouched() {
        let source = "fn f() {\n    use b::B;\n    use a::A;\n}\n";
        assert_eq!(normalize_imports(source), source);
    }

    #[test]
    fn test_render_file_header_and_guard() {
        let file = parse_file("test", quote! { pub struct Unit; }).expect("Failed to parse");
        let rendered = render_file(&file, &["requires feature x"]);
        assert!(rendered.starts_with(HEADER));
        assert!(rendered.contains("// requires feature x\n"));
        assert!(rendered.contains("pub struct Unit;"));
    }

    #[test]
    fn test_parse_file_rejects_invalid_tokens() {
        let result = parse_file("broken", quote! { pub struct; });
        assert!(matches!(result, Err(CodegenError::Emission { .. })));
    }
}
