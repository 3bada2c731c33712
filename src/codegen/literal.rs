//! String escaping and JSON-to-literal rendering shared by the backends

use serde_json::Value as JsonValue;

/// Escape `s` for a quoted literal using `quote`, with C-style escapes
pub fn escape_quoted(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Single-quoted JavaScript/TypeScript string
pub fn js_string(s: &str) -> String {
    format!("'{}'", escape_quoted(s, '\''))
}

/// Double-quoted Python string
pub fn python_string(s: &str) -> String {
    format!("\"{}\"", escape_quoted(s, '"'))
}

/// Double-quoted Go string
pub fn go_string(s: &str) -> String {
    format!("\"{}\"", escape_quoted(s, '"'))
}

/// Double-quoted Rust string
pub fn rust_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Single-quoted PHP or Ruby string: only `\` and `'` are escaped
pub fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// How a JSON value is spelled in a target language
pub struct LiteralStyle {
    pub null: &'static str,
    pub truthy: &'static str,
    pub falsy: &'static str,
    pub object: (&'static str, &'static str),
    pub array: (&'static str, &'static str),
    pub key_separator: &'static str,
    pub string: fn(&str) -> String,
}

pub const JS_LITERAL: LiteralStyle = LiteralStyle {
    null: "null",
    truthy: "true",
    falsy: "false",
    object: ("{", "}"),
    array: ("[", "]"),
    key_separator: ": ",
    string: js_string,
};

pub const PYTHON_LITERAL: LiteralStyle = LiteralStyle {
    null: "None",
    truthy: "True",
    falsy: "False",
    object: ("{", "}"),
    array: ("[", "]"),
    key_separator: ": ",
    string: python_string,
};

pub const RUBY_LITERAL: LiteralStyle = LiteralStyle {
    null: "nil",
    truthy: "true",
    falsy: "false",
    object: ("{", "}"),
    array: ("[", "]"),
    key_separator: " => ",
    string: single_quoted,
};

pub const PHP_LITERAL: LiteralStyle = LiteralStyle {
    null: "null",
    truthy: "true",
    falsy: "false",
    object: ("[", "]"),
    array: ("[", "]"),
    key_separator: " => ",
    string: single_quoted,
};

/// JSON as it appears inside `serde_json::json!` (plain JSON)
pub const JSON_LITERAL: LiteralStyle = LiteralStyle {
    null: "null",
    truthy: "true",
    falsy: "false",
    object: ("{", "}"),
    array: ("[", "]"),
    key_separator: ": ",
    string: json_string,
};

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// Render `value` as a multi-line literal
///
/// The first line is not indented; nested lines are indented relative to
/// `level` levels of `unit`, so the result can be placed after `x = `.
pub fn render_value(value: &JsonValue, style: &LiteralStyle, unit: &str, level: usize) -> String {
    match value {
        JsonValue::Null => style.null.to_string(),
        JsonValue::Bool(true) => style.truthy.to_string(),
        JsonValue::Bool(false) => style.falsy.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => (style.string)(s),
        JsonValue::Array(items) if items.is_empty() => format!("{}{}", style.array.0, style.array.1),
        JsonValue::Object(map) if map.is_empty() => format!("{}{}", style.object.0, style.object.1),
        JsonValue::Array(items) => {
            let inner = unit.repeat(level + 1);
            let lines: Vec<String> = items
                .iter()
                .map(|item| format!("{}{}", inner, render_value(item, style, unit, level + 1)))
                .collect();
            format!("{}\n{},\n{}{}", style.array.0, lines.join(",\n"), unit.repeat(level), style.array.1)
        }
        JsonValue::Object(map) => {
            let inner = unit.repeat(level + 1);
            let lines: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}{}{}{}",
                        inner,
                        (style.string)(k),
                        style.key_separator,
                        render_value(v, style, unit, level + 1)
                    )
                })
                .collect();
            format!("{}\n{},\n{}{}", style.object.0, lines.join(",\n"), unit.repeat(level), style.object.1)
        }
    }
}

/// Strict JSON (no trailing commas) pretty-printed with the given indent
pub fn render_json(value: &JsonValue, unit: &str, level: usize) -> String {
    match value {
        JsonValue::Array(items) if !items.is_empty() => {
            let inner = unit.repeat(level + 1);
            let lines: Vec<String> = items
                .iter()
                .map(|item| format!("{}{}", inner, render_json(item, unit, level + 1)))
                .collect();
            format!("[\n{}\n{}]", lines.join(",\n"), unit.repeat(level))
        }
        JsonValue::Object(map) if !map.is_empty() => {
            let inner = unit.repeat(level + 1);
            let lines: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}{}: {}", inner, json_string(k), render_json(v, unit, level + 1)))
                .collect();
            format!("{{\n{}\n{}}}", lines.join(",\n"), unit.repeat(level))
        }
        other => render_value(other, &JSON_LITERAL, unit, level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_quoted() {
        assert_eq!(js_string("it's\n"), r"'it\'s\n'");
        assert_eq!(python_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(go_string("a\tb"), r#""a\tb""#);
    }

    #[test]
    fn test_rust_string_control_chars() {
        assert_eq!(rust_string("a\u{1}"), r#""a\u{1}""#);
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(single_quoted(r"it's a \ test"), r"'it\'s a \\ test'");
    }

    #[test]
    fn test_python_literal() {
        let out = render_value(&json!({"a": null, "b": [true, 1]}), &PYTHON_LITERAL, "    ", 0);
        assert_eq!(out, "{\n    \"a\": None,\n    \"b\": [\n        True,\n        1,\n    ],\n}");
    }

    #[test]
    fn test_php_literal_uses_arrays() {
        let out = render_value(&json!({"a": "x"}), &PHP_LITERAL, "  ", 1);
        assert_eq!(out, "[\n    'a' => 'x',\n  ]");
    }

    #[test]
    fn test_render_json_is_strict() {
        let out = render_json(&json!({"a": [1, 2], "b": {}}), "  ", 0);
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}");
        assert!(serde_json::from_str::<JsonValue>(&out).is_ok());
    }
}
