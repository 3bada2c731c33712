//! Declaration printers for each [`TypeDialect`]

use std::collections::HashSet;

use convert_case::{Case, Casing};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Declaration, Shape, TypeDialect, TypeSet};

static JS_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid identifier regex"));

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
    "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof",
    "unsized", "virtual", "yield", "try",
];

/// Keywords that cannot be written as raw identifiers
const RUST_PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Print every declaration of a type set in the given dialect
pub fn render(set: &TypeSet, dialect: TypeDialect, indent: &str) -> String {
    let mut blocks = Vec::new();

    // Non-object roots need an alias so the root name exists
    if set.root != Shape::Ref(set.name.clone()) {
        blocks.push(match dialect {
            TypeDialect::TypeScript => format!("export type {} = {};", set.name, ts_type(&set.root)),
            TypeDialect::Go => format!("type {} {}", set.name, go_type(&set.root)),
            TypeDialect::Rust => format!("pub type {} = {};", set.name, rust_type(&set.root)),
        });
    }

    for decl in &set.declarations {
        blocks.push(match dialect {
            TypeDialect::TypeScript => ts_interface(decl, indent),
            TypeDialect::Go => go_struct(decl, indent),
            TypeDialect::Rust => rust_struct(decl, indent),
        });
    }

    blocks.join("\n\n")
}

// =============================================================================
// TypeScript
// =============================================================================

fn ts_type(shape: &Shape) -> String {
    match shape {
        Shape::Any => "any".to_string(),
        Shape::Bool => "boolean".to_string(),
        Shape::Integer | Shape::Float => "number".to_string(),
        Shape::String => "string".to_string(),
        Shape::List(inner) => match inner.as_ref() {
            Shape::UnionList(_) | Shape::List(_) => format!("Array<{}>", ts_type(inner)),
            _ => format!("{}[]", ts_type(inner)),
        },
        Shape::UnionList(variants) => {
            let mut seen = HashSet::new();
            let names: Vec<String> = variants
                .iter()
                .map(ts_type)
                .filter(|name| seen.insert(name.clone()))
                .collect();
            if names.len() == 1 {
                format!("{}[]", names[0])
            } else {
                format!("({})[]", names.join(" | "))
            }
        }
        Shape::Ref(name) => name.clone(),
    }
}

fn ts_property_name(key: &str) -> String {
    if JS_IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
    }
}

fn ts_interface(decl: &Declaration, indent: &str) -> String {
    let mut out = format!("export interface {} {{\n", decl.name);
    for field in &decl.fields {
        out.push_str(&format!(
            "{}{}{}: {};\n",
            indent,
            ts_property_name(&field.key),
            if field.optional { "?" } else { "" },
            ts_type(&field.shape)
        ));
    }
    out.push('}');
    out
}

// =============================================================================
// Go
// =============================================================================

fn go_type(shape: &Shape) -> String {
    match shape {
        Shape::Any => "any".to_string(),
        Shape::Bool => "bool".to_string(),
        Shape::Integer => "int64".to_string(),
        Shape::Float => "float64".to_string(),
        Shape::String => "string".to_string(),
        Shape::List(inner) => format!("[]{}", go_type(inner)),
        Shape::UnionList(_) => "[]any".to_string(),
        Shape::Ref(name) => name.clone(),
    }
}

fn go_field_name(key: &str, used: &mut HashSet<String>) -> String {
    let mut name = key.to_case(Case::Pascal);
    name.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("Field{}", name);
    }
    unique(name, used)
}

fn go_struct(decl: &Declaration, indent: &str) -> String {
    let mut used = HashSet::new();
    let mut out = format!("type {} struct {{\n", decl.name);
    for field in &decl.fields {
        let mut ty = go_type(&field.shape);
        if field.optional && ty != "any" {
            ty = format!("*{}", ty);
        }
        let tag = if field.optional {
            format!("{},omitempty", field.key)
        } else {
            field.key.clone()
        };
        out.push_str(&format!(
            "{}{} {} `json:\"{}\"`\n",
            indent,
            go_field_name(&field.key, &mut used),
            ty,
            tag.replace('"', "\\\"")
        ));
    }
    out.push('}');
    out
}

// =============================================================================
// Rust
// =============================================================================

fn rust_type(shape: &Shape) -> String {
    match shape {
        Shape::Any => "serde_json::Value".to_string(),
        Shape::Bool => "bool".to_string(),
        Shape::Integer => "i64".to_string(),
        Shape::Float => "f64".to_string(),
        Shape::String => "String".to_string(),
        Shape::List(inner) => format!("Vec<{}>", rust_type(inner)),
        Shape::UnionList(_) => "Vec<serde_json::Value>".to_string(),
        Shape::Ref(name) => name.clone(),
    }
}

/// Field identifier plus whether a `rename` attribute is needed
fn rust_field_name(key: &str, used: &mut HashSet<String>) -> (String, bool) {
    let mut name = key.to_case(Case::Snake);
    name.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if name.is_empty()
        || name.starts_with(|c: char| c.is_ascii_digit())
        || RUST_PATH_KEYWORDS.contains(&name.as_str())
    {
        name = format!("field_{}", name);
    }
    let name = unique(name, used);
    let renamed = name != key;
    if RUST_KEYWORDS.contains(&name.as_str()) {
        return (format!("r#{}", name), renamed);
    }
    (name, renamed)
}

fn rust_struct(decl: &Declaration, indent: &str) -> String {
    let mut used = HashSet::new();
    let mut out = String::from("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {} {{\n", decl.name));
    for field in &decl.fields {
        let (name, renamed) = rust_field_name(&field.key, &mut used);
        if renamed {
            out.push_str(&format!(
                "{}#[serde(rename = {})]\n",
                indent,
                serde_json::to_string(&field.key).unwrap_or_else(|_| format!("\"{}\"", field.key))
            ));
        }
        let mut ty = rust_type(&field.shape);
        if field.optional {
            ty = format!("Option<{}>", ty);
        }
        out.push_str(&format!("{}pub {}: {},\n", indent, name, ty));
    }
    out.push('}');
    out
}

fn unique(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", name, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::super::{declarations_for, TypeDialect};
    use serde_json::json;

    #[test]
    fn test_typescript_interface() {
        let out = declarations_for(
            &json!({"id": 1, "first-name": "a", "bio": null, "tags": ["x"], "mixed": [1, "a"]}),
            "RequestBody",
            TypeDialect::TypeScript,
            "  ",
        );
        assert_eq!(
            out,
            "export interface RequestBody {\n  id: number;\n  \"first-name\": string;\n  bio?: any;\n  tags: string[];\n  mixed: (number | string)[];\n}"
        );
    }

    #[test]
    fn test_typescript_array_root() {
        let out = declarations_for(&json!([{"id": 1}]), "ResponseData", TypeDialect::TypeScript, "  ");
        assert!(out.starts_with("export type ResponseData = ResponseDataItem[];"));
        assert!(out.contains("export interface ResponseDataItem {\n  id: number;\n}"));
    }

    #[test]
    fn test_typescript_union_of_lists() {
        let out = declarations_for(&json!({"v": [[1], ["a"]]}), "T", TypeDialect::TypeScript, "  ");
        assert!(out.contains("v: (number[] | string[])[];"));
    }

    #[test]
    fn test_go_struct() {
        let out = declarations_for(&json!({"user_id": 7, "note": null, "score": 1.5}), "RequestBody", TypeDialect::Go, "\t");
        assert_eq!(
            out,
            "type RequestBody struct {\n\tUserId int64 `json:\"user_id\"`\n\tNote any `json:\"note,omitempty\"`\n\tScore float64 `json:\"score\"`\n}"
        );
    }

    #[test]
    fn test_rust_struct_renames_and_keywords() {
        let out = declarations_for(&json!({"userId": "u", "type": "x", "tags": null}), "RequestBody", TypeDialect::Rust, "    ");
        assert!(out.contains("    #[serde(rename = \"userId\")]\n    pub user_id: String,"));
        assert!(out.contains("    pub r#type: String,"));
        assert!(out.contains("    pub tags: Option<serde_json::Value>,"));
        assert!(out.starts_with("#[derive(Debug, Clone, Serialize, Deserialize)]\npub struct RequestBody {"));
    }

    #[test]
    fn test_rust_path_keywords_get_prefixed() {
        let out = declarations_for(&json!({"self": 1, "Self": 2, "super": 3, "crate": 4}), "RequestBody", TypeDialect::Rust, "    ");
        assert!(out.contains("    #[serde(rename = \"self\")]\n    pub field_self: i64,"));
        assert!(out.contains("    #[serde(rename = \"Self\")]\n    pub field_self2: i64,"));
        assert!(out.contains("    pub field_super: i64,"));
        assert!(out.contains("    pub field_crate: i64,"));
        assert!(!out.contains("r#"));
    }
}
