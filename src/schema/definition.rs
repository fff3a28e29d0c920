/// A node in a connector specification schema, after conversion from its raw
/// wire form. This is the canonical input model of the compiler.
///
/// The three variants are closed: a node is either a scalar leaf, a plain
/// object of named properties, or a discriminated union of object variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Scalar(ScalarSchema),
    Object(ObjectSchema),
    Union(UnionSchema),
}

/// A scalar leaf: anything that is not an object (string, number, boolean, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarSchema {
    /// The declared scalar type name, e.g. `"string"` or `"integer"`.
    pub scalar_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Explicit ordering hint. Negative hints are treated as undeclared.
    pub order: Option<i64>,
    /// The constant this property is pinned to. Discriminator properties of
    /// union variants carry their variant's selector here.
    pub const_value: Option<serde_json::Value>,
}

/// An object of named properties.
///
/// Property declaration order is preserved: the compiler's ordering pass
/// depends on encounter order for properties without an explicit hint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub properties: Vec<(String, SchemaNode)>,
    /// The declared `required` list. `None` means the list was absent, which
    /// is a hard compile error when this object is a union variant.
    pub required: Option<Vec<String>>,
}

/// A discriminated union: mutually exclusive object variants selected by a
/// common constant-valued property. The discriminator is computed by the
/// compiler, never declared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub variants: Vec<ObjectSchema>,
}

impl SchemaNode {
    /// The explicit ordering hint declared on this node, if any.
    pub fn order(&self) -> Option<i64> {
        match self {
            SchemaNode::Scalar(s) => s.order,
            SchemaNode::Object(o) => o.order,
            SchemaNode::Union(u) => u.order,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SchemaNode::Scalar(s) => s.title.as_deref(),
            SchemaNode::Object(o) => o.title.as_deref(),
            SchemaNode::Union(u) => u.title.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Scalar(s) => s.description.as_deref(),
            SchemaNode::Object(o) => o.description.as_deref(),
            SchemaNode::Union(u) => u.description.as_deref(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl ObjectSchema {
    /// Whether `key` appears in this object's declared `required` list.
    /// An absent list counts as "nothing required".
    pub fn requires(&self, key: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|req| req.iter().any(|r| r == key))
    }

    /// Looks up a property node by name.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }
}
