use serde::{Deserialize, Serialize};
use std::fmt;

/// A constant literal pinned by a discriminator property.
///
/// Connector specs use strings almost exclusively, but booleans and numbers
/// occur; null, arrays, and objects are not valid discriminator constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl ConstValue {
    /// Reads a constant from a raw JSON literal. `None` for shapes that
    /// cannot discriminate (null, arrays, objects).
    pub fn from_json(value: &serde_json::Value) -> Option<ConstValue> {
        match value {
            serde_json::Value::Bool(b) => Some(ConstValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(ConstValue::Integer)
                .or_else(|| n.as_f64().map(ConstValue::Number)),
            serde_json::Value::String(s) => Some(ConstValue::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Integer(i) => write!(f, "{i}"),
            ConstValue::Number(n) => write!(f, "{n}"),
            ConstValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ConstValue {
    fn from(value: &str) -> Self {
        ConstValue::String(value.to_string())
    }
}

impl From<String> for ConstValue {
    fn from(value: String) -> Self {
        ConstValue::String(value)
    }
}

impl From<bool> for ConstValue {
    fn from(value: bool) -> Self {
        ConstValue::Bool(value)
    }
}

impl From<i64> for ConstValue {
    fn from(value: i64) -> Self {
        ConstValue::Integer(value)
    }
}

/// Whether a compiled field renders as a single input or as a group of
/// conditionally visible children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    Group,
}

/// A compiled descriptor of one form field or field group.
///
/// The compiler guarantees that within one compilation every `(path,
/// parent_discriminator)` pair is unique and that every leaf is reachable by
/// walking `children` from a root spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Dot-delimited address into the eventual config object, e.g.
    /// `config.credentials.api_key`. For a group acting as a discriminator
    /// dropdown, the path addresses the discriminator property itself.
    pub path: String,
    pub kind: FieldKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    /// Resolved ordering key, a total order across siblings.
    pub order: i64,
    /// The constant that must be selected on the nearest enclosing
    /// discriminator for this field to be active. `None` for unconditional
    /// fields.
    pub parent_discriminator: Option<ConstValue>,
    /// For discriminator groups, the selectable variant constants in variant
    /// declaration order. Empty otherwise.
    #[serde(default)]
    pub enum_values: Vec<ConstValue>,
    /// Ordered children, only ever non-empty for group fields.
    #[serde(default)]
    pub children: Vec<FieldSpec>,
}

impl FieldSpec {
    pub fn is_group(&self) -> bool {
        self.kind == FieldKind::Group
    }

    /// Visits this spec and all descendants, depth-first, in render order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a FieldSpec)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// All scalar leaves under this spec, in render order.
    pub fn leaves(&self) -> Vec<&FieldSpec> {
        let mut out = Vec::new();
        self.walk(&mut |spec| {
            if !spec.is_group() {
                out.push(spec);
            }
        });
        out
    }
}

/// All scalar leaves across a compiled field list, in render order.
pub fn all_leaves(fields: &[FieldSpec]) -> Vec<&FieldSpec> {
    fields.iter().flat_map(FieldSpec::leaves).collect()
}
