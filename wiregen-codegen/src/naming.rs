//! Identifier mapping from declared names to Rust identifiers.
//!
//! Wire names are never changed; only the Rust-side identifier is derived
//! here. Keywords become raw identifiers where Rust allows it and get a
//! trailing underscore where it does not.

use proc_macro2::{Ident, Span};
use wiregen_schema::ir::{enum_variant_name, escape_keyword, to_pascal_case, to_snake_case};

/// Variant name reserved for values and members unknown at generation time.
pub const UNKNOWN_VARIANT: &str = "Unknown";

/// Builds an identifier, escaping keywords.
#[must_use]
pub fn ident(name: &str) -> Ident {
    let escaped = escape_keyword(name);
    match escaped.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(&escaped, Span::call_site()),
    }
}

/// Identifier of a record field or function parameter.
#[must_use]
pub fn field_ident(name: &str) -> Ident {
    ident(&to_snake_case(name))
}

/// Name of a declared type.
#[must_use]
pub fn type_ident(name: &str) -> Ident {
    ident(name)
}

/// Identifier of a generated companion type, e.g. `ShapeVisitor`.
#[must_use]
pub fn companion_ident(name: &str, suffix: &str) -> Ident {
    ident(&format!("{name}{suffix}"))
}

/// Variant of an enum value (`NOT_FOUND` becomes `NotFound`).
#[must_use]
pub fn enum_variant_ident(value: &str) -> Ident {
    variant(enum_variant_name(value))
}

/// Variant of a union member (`myShape` becomes `MyShape`).
#[must_use]
pub fn member_variant_ident(tag: &str) -> Ident {
    variant(to_pascal_case(tag))
}

/// Visitor method for a union member (`myShape` becomes `visit_my_shape`).
///
/// `visit_unknown` is taken by the unknown-member callback.
#[must_use]
pub fn visit_method_ident(tag: &str) -> Ident {
    let method = format!("visit_{}", to_snake_case(tag));
    if method == "visit_unknown" {
        Ident::new("visit_unknown_", Span::call_site())
    } else {
        ident(&method)
    }
}

/// Identifier of a module path segment.
#[must_use]
pub fn module_ident(segment: &str) -> Ident {
    ident(segment)
}

fn variant(name: String) -> Ident {
    if name == UNKNOWN_VARIANT {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else {
        ident(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ident() {
        assert_eq!(field_ident("radius").to_string(), "radius");
        assert_eq!(field_ident("createdAt").to_string(), "created_at");
        assert_eq!(field_ident("type").to_string(), "r#type");
        assert_eq!(field_ident("self").to_string(), "self_");
    }

    #[test]
    fn test_variant_idents() {
        assert_eq!(enum_variant_ident("NOT_FOUND").to_string(), "NotFound");
        assert_eq!(enum_variant_ident("UNKNOWN").to_string(), "Unknown_");
        assert_eq!(member_variant_ident("circle").to_string(), "Circle");
        assert_eq!(member_variant_ident("unknown").to_string(), "Unknown_");
        assert_eq!(member_variant_ident("self").to_string(), "Self_");
    }

    #[test]
    fn test_visit_method_ident() {
        assert_eq!(visit_method_ident("myShape").to_string(), "visit_my_shape");
        assert_eq!(visit_method_ident("type").to_string(), "visit_type");
        assert_eq!(visit_method_ident("unknown").to_string(), "visit_unknown_");
    }

    #[test]
    fn test_companion_ident() {
        assert_eq!(
            companion_ident("Shape", "Visitor").to_string(),
            "ShapeVisitor"
        );
    }
}
