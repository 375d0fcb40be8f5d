//! Shape to Rust type mapping and identifier handling

use convgen_core::{BasicKind, Shape};
use heck::ToSnakeCase;

/// The Rust type for a shape
pub fn rust_type(shape: &Shape) -> String {
    match shape {
        Shape::Named(name) => name.clone(),
        Shape::Basic(kind) => basic_type(*kind).to_string(),
        Shape::Pointer(elem) => format!("Option<Box<{}>>", rust_type(elem)),
        Shape::List { elem, len: None } => format!("Vec<{}>", rust_type(elem)),
        Shape::List {
            elem,
            len: Some(len),
        } => format!("[{}; {}]", rust_type(elem), len),
        Shape::Map { key, value } => format!("HashMap<{}, {}>", rust_type(key), rust_type(value)),
    }
}

fn basic_type(kind: BasicKind) -> &'static str {
    match kind {
        BasicKind::Bool => "bool",
        BasicKind::Int | BasicKind::Int64 => "i64",
        BasicKind::Int8 => "i8",
        BasicKind::Int16 => "i16",
        BasicKind::Int32 => "i32",
        BasicKind::Uint | BasicKind::Uint64 => "u64",
        BasicKind::Uint8 => "u8",
        BasicKind::Uint16 => "u16",
        BasicKind::Uint32 => "u32",
        BasicKind::Float32 => "f32",
        BasicKind::Float64 => "f64",
        BasicKind::String => "String",
    }
}

/// Whether values of this kind are `Copy` in Rust
pub fn is_copy(kind: BasicKind) -> bool {
    kind != BasicKind::String
}

/// Whether a shape contains a map anywhere, so the module needs `HashMap` in scope
pub fn uses_map(shape: &Shape) -> bool {
    match shape {
        Shape::Map { .. } => true,
        Shape::Pointer(elem) | Shape::List { elem, .. } => uses_map(elem),
        Shape::Named(_) | Shape::Basic(_) => false,
    }
}

/// Sanitize a field name to be a valid Rust identifier
pub fn sanitize_field_name(name: &str) -> String {
    escape_ident(name.to_snake_case())
}

/// Escape an identifier that collides with a keyword
pub fn escape_ident(ident: String) -> String {
    if matches!(ident.as_str(), "self" | "Self" | "super" | "crate") {
        // these cannot be raw identifiers
        format!("{}_", ident)
    } else if is_rust_keyword(&ident) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Whether `path` is a plain Rust path such as `conv::int_to_string`
pub fn is_rust_path(path: &str) -> bool {
    let segments: Vec<&str> = path.split("::").collect();
    let Some((last, prefix)) = segments.split_last() else {
        return false;
    };
    is_identifier(last)
        && prefix.iter().enumerate().all(|(i, segment)| {
            is_identifier(segment)
                || *segment == "super"
                || (i == 0 && matches!(*segment, "crate" | "self"))
        })
}

/// Whether `s` is a non-keyword Rust identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    s != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) && !is_rust_keyword(s)
}

/// Keywords in use as of the 2021 edition
const STRICT_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while",
];

/// Reserved for future use; equally rejected as plain identifiers
const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

fn is_rust_keyword(s: &str) -> bool {
    STRICT_KEYWORDS.contains(&s) || RESERVED_KEYWORDS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_type_mapping() {
        let string = Shape::basic(BasicKind::String);
        assert_eq!(rust_type(&Shape::basic(BasicKind::Int)), "i64");
        assert_eq!(rust_type(&Shape::basic(BasicKind::Uint8)), "u8");
        assert_eq!(
            rust_type(&Shape::pointer(Shape::named("Address"))),
            "Option<Box<Address>>"
        );
        assert_eq!(rust_type(&Shape::list(string.clone())), "Vec<String>");
        assert_eq!(rust_type(&Shape::array(string.clone(), 4)), "[String; 4]");
        assert_eq!(
            rust_type(&Shape::map(string, Shape::list(Shape::basic(BasicKind::Float64)))),
            "HashMap<String, Vec<f64>>"
        );
    }

    #[test]
    fn test_sanitize_field_name() {
        assert_eq!(sanitize_field_name("ZipCode"), "zip_code");
        assert_eq!(sanitize_field_name("Type"), "r#type");
        assert_eq!(sanitize_field_name("Self"), "self_");
        assert_eq!(sanitize_field_name("Try"), "r#try");
        assert_eq!(sanitize_field_name("Union"), "union");
    }

    #[test]
    fn test_rust_path() {
        assert!(is_rust_path("int_to_string"));
        assert!(is_rust_path("crate::conv::int_to_string"));
        assert!(!is_rust_path("conv.IntToString"));
        assert!(!is_rust_path("conv::"));
        assert!(!is_rust_path("fn"));
    }

    #[test]
    fn test_uses_map() {
        let int = Shape::basic(BasicKind::Int);
        assert!(uses_map(&Shape::list(Shape::map(int.clone(), int.clone()))));
        assert!(!uses_map(&Shape::pointer(int)));
    }
}
