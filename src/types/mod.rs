//! Structural type inference from sample JSON
//!
//! [`infer`] turns a JSON value into a [`TypeSet`]: the shape of the root
//! value plus one [`Declaration`] per object encountered. [`render`] prints a
//! type set as TypeScript, Go or Rust source.
//!
//! Rules:
//! - scalars map to scalars, `null` maps to an open/any type
//! - arrays take the union of their element shapes; a single shape is a plain
//!   list, several shapes are a union list, object elements become a
//!   `<Name>Item` declaration
//! - nested objects become `<Parent><Field>` declarations
//! - a field is optional only when its sampled value is `null`. A field that
//!   happens to be present in this sample is always required, even if other
//!   payloads omit it.

mod render;

pub use render::render;

use convert_case::{Case, Casing};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Output language for declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDialect {
    TypeScript,
    Go,
    Rust,
}

/// Inferred shape of a JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Any,
    Bool,
    Integer,
    Float,
    String,
    List(Box<Shape>),
    /// Elements of differing shapes
    UnionList(Vec<Shape>),
    /// Reference to a named object declaration
    Ref(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Key exactly as it appears in the JSON
    pub key: String,
    pub shape: Shape,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Root shape plus every object declaration it references, parents first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet {
    pub name: String,
    pub root: Shape,
    pub declarations: Vec<Declaration>,
}

impl TypeSet {
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

/// Infer the type set of `value`, naming the root `name`
pub fn infer(value: &JsonValue, name: &str) -> TypeSet {
    let mut inferrer = Inferrer::default();
    let root = inferrer.shape_of(value, name);
    debug!(name, declarations = inferrer.declarations.len(), "Inferred types");
    TypeSet { name: name.to_string(), root, declarations: inferrer.declarations }
}

/// Infer and render in one step
pub fn declarations_for(value: &JsonValue, name: &str, dialect: TypeDialect, indent: &str) -> String {
    render(&infer(value, name), dialect, indent)
}

#[derive(Debug, Default)]
struct Inferrer {
    declarations: Vec<Declaration>,
}

impl Inferrer {
    fn shape_of(&mut self, value: &JsonValue, name: &str) -> Shape {
        match value {
            JsonValue::Null => Shape::Any,
            JsonValue::Bool(_) => Shape::Bool,
            JsonValue::Number(n) if n.is_f64() => Shape::Float,
            JsonValue::Number(_) => Shape::Integer,
            JsonValue::String(_) => Shape::String,
            JsonValue::Array(items) => self.array_shape(items, name),
            JsonValue::Object(map) => Shape::Ref(self.declare_object(map, name)),
        }
    }

    fn array_shape(&mut self, items: &[JsonValue], name: &str) -> Shape {
        if items.is_empty() {
            return Shape::List(Box::new(Shape::Any));
        }

        let item_name = format!("{}Item", name);
        let mut item_ref: Option<Shape> = None;
        let mut variants: Vec<Shape> = Vec::new();

        for item in items {
            let shape = match (item, &item_ref) {
                // All object elements share the declaration of the first one
                (JsonValue::Object(_), Some(existing)) => existing.clone(),
                (JsonValue::Object(_), None) => {
                    let shape = self.shape_of(item, &item_name);
                    item_ref = Some(shape.clone());
                    shape
                }
                _ => self.shape_of(item, &item_name),
            };
            if !variants.contains(&shape) {
                variants.push(shape);
            }
        }

        if variants.len() == 2 && variants.contains(&Shape::Integer) && variants.contains(&Shape::Float) {
            return Shape::List(Box::new(Shape::Float));
        }
        if variants.len() == 1 {
            Shape::List(Box::new(variants.remove(0)))
        } else {
            Shape::UnionList(variants)
        }
    }

    fn declare_object(&mut self, map: &Map<String, JsonValue>, name: &str) -> String {
        let name = self.unique_name(name);
        // Reserve the slot first so parents precede their children
        let slot = self.declarations.len();
        self.declarations.push(Declaration { name: name.clone(), fields: Vec::new() });

        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            let child_name = format!("{}{}", name, type_name_part(key));
            let shape = self.shape_of(value, &child_name);
            fields.push(Field { key: key.clone(), shape, optional: value.is_null() });
        }

        self.declarations[slot].fields = fields;
        name
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |candidate: &str| self.declarations.iter().any(|d| d.name == candidate);
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Pascal-cased key with anything outside `[A-Za-z0-9]` treated as a word break
fn type_name_part(key: &str) -> String {
    let spaced: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let part = spaced.trim().to_case(Case::Pascal);
    if part.is_empty() {
        "Field".to_string()
    } else {
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(infer(&json!("x"), "T").root, Shape::String);
        assert_eq!(infer(&json!(1), "T").root, Shape::Integer);
        assert_eq!(infer(&json!(1.5), "T").root, Shape::Float);
        assert_eq!(infer(&json!(true), "T").root, Shape::Bool);
        assert_eq!(infer(&json!(null), "T").root, Shape::Any);
    }

    #[test]
    fn test_object_fields_and_optional_null() {
        let set = infer(&json!({"name": "a", "nickname": null}), "User");
        assert_eq!(set.root, Shape::Ref("User".into()));
        let decl = set.declaration("User").unwrap();
        assert_eq!(decl.fields.len(), 2);
        assert!(!decl.fields[0].optional);
        assert!(decl.fields[1].optional);
        assert_eq!(decl.fields[1].shape, Shape::Any);
    }

    #[test]
    fn test_nested_object_gets_own_declaration() {
        let set = infer(&json!({"address": {"city": "Oslo"}}), "User");
        assert_eq!(set.declarations[0].name, "User");
        assert_eq!(set.declarations[1].name, "UserAddress");
        assert_eq!(set.declarations[0].fields[0].shape, Shape::Ref("UserAddress".into()));
    }

    #[test]
    fn test_punctuated_keys_give_valid_type_names() {
        let set = infer(&json!({"a.b": {"x": 1}, "$ref": {"y": 2}, "@": {"z": 3}}), "RequestBody");
        let names: Vec<_> = set.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["RequestBody", "RequestBodyAB", "RequestBodyRef", "RequestBodyField"]);
        assert_eq!(set.declarations[0].fields[1].shape, Shape::Ref("RequestBodyRef".into()));
        assert_eq!(set.declarations[0].fields[1].key, "$ref");
    }

    #[test]
    fn test_homogeneous_and_union_lists() {
        let set = infer(&json!({"tags": ["a", "b"], "mixed": ["a", 1]}), "T");
        let decl = set.declaration("T").unwrap();
        assert_eq!(decl.fields[0].shape, Shape::List(Box::new(Shape::String)));
        assert_eq!(decl.fields[1].shape, Shape::UnionList(vec![Shape::String, Shape::Integer]));
    }

    #[test]
    fn test_object_array_uses_item_declaration() {
        let set = infer(&json!([{"id": 1}, {"id": 2, "extra": true}]), "Users");
        assert_eq!(set.root, Shape::List(Box::new(Shape::Ref("UsersItem".into()))));
        assert_eq!(set.declarations.len(), 1);
        // Only the first element is sampled
        assert_eq!(set.declarations[0].fields.len(), 1);
    }

    #[test]
    fn test_int_and_float_widen() {
        let set = infer(&json!([1, 2.5]), "N");
        assert_eq!(set.root, Shape::List(Box::new(Shape::Float)));
    }

    #[test]
    fn test_empty_array_is_any_list() {
        assert_eq!(infer(&json!([]), "E").root, Shape::List(Box::new(Shape::Any)));
    }

    #[test]
    fn test_name_collisions_are_suffixed() {
        // "a_b" and "aB" both Pascal-case to "AB"
        let set = infer(&json!({"a_b": {"x": 1}, "aB": {"y": 2}}), "T");
        let names: Vec<_> = set.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["T", "TAB", "TAB2"]);
    }
}
