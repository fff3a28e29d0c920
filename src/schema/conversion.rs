use super::definition::{ObjectSchema, ScalarSchema, SchemaNode, UnionSchema};
use crate::error::SchemaConversionError;
use serde_json::Value;

/// A trait for custom data models that can be converted into a [`SchemaNode`].
///
/// This is the extension point that keeps the compiler format-agnostic: any
/// connector-definition format can be compiled once a translation into the
/// canonical schema model exists. A blanket implementation for
/// `serde_json::Value` covers the common case of specs fetched straight off
/// the wire.
///
/// # Example
///
/// ```rust
/// use kanri::prelude::*;
///
/// let raw = serde_json::json!({
///     "type": "object",
///     "required": ["host"],
///     "properties": {
///         "host": { "type": "string", "title": "Host", "order": 0 }
///     }
/// });
///
/// let schema = raw.into_schema().expect("valid spec");
/// assert!(matches!(schema, SchemaNode::Object(_)));
/// ```
pub trait IntoSchema {
    /// Consumes the object and converts it into a canonical schema node.
    fn into_schema(self) -> Result<SchemaNode, SchemaConversionError>;
}

impl IntoSchema for Value {
    fn into_schema(self) -> Result<SchemaNode, SchemaConversionError> {
        convert_value(&self)
    }
}

impl IntoSchema for &Value {
    fn into_schema(self) -> Result<SchemaNode, SchemaConversionError> {
        convert_value(self)
    }
}

fn convert_value(value: &Value) -> Result<SchemaNode, SchemaConversionError> {
    let obj = value.as_object().ok_or_else(|| {
        SchemaConversionError::ValidationError(format!(
            "schema node must be a JSON object, found {value}"
        ))
    })?;

    if let Some(one_of) = obj.get("oneOf") {
        let raw_variants = one_of.as_array().ok_or_else(|| {
            SchemaConversionError::ValidationError("'oneOf' must be an array".to_string())
        })?;
        let mut variants = Vec::with_capacity(raw_variants.len());
        for raw in raw_variants {
            match convert_value(raw)? {
                SchemaNode::Object(variant) => variants.push(variant),
                other => {
                    return Err(SchemaConversionError::ValidationError(format!(
                        "every 'oneOf' variant must be an object schema, found {other:?}"
                    )));
                }
            }
        }
        return Ok(SchemaNode::Union(UnionSchema {
            title: string_field(obj, "title"),
            description: string_field(obj, "description"),
            order: order_field(obj),
            variants,
        }));
    }

    if type_name(obj).as_deref() == Some("object") || obj.contains_key("properties") {
        let mut properties = Vec::new();
        if let Some(props) = obj.get("properties") {
            let props = props.as_object().ok_or_else(|| {
                SchemaConversionError::ValidationError("'properties' must be an object".to_string())
            })?;
            // Map iteration preserves declaration order (serde_json is built
            // with `preserve_order`), which the ordering pass relies on.
            for (key, raw) in props {
                properties.push((key.clone(), convert_value(raw)?));
            }
        }
        let required = match obj.get("required") {
            None => None,
            Some(Value::Array(items)) => {
                let mut names = Vec::with_capacity(items.len());
                for item in items {
                    let name = item.as_str().ok_or_else(|| {
                        SchemaConversionError::ValidationError(format!(
                            "'required' entries must be strings, found {item}"
                        ))
                    })?;
                    names.push(name.to_string());
                }
                Some(names)
            }
            Some(other) => {
                return Err(SchemaConversionError::ValidationError(format!(
                    "'required' must be an array of strings, found {other}"
                )));
            }
        };
        return Ok(SchemaNode::Object(ObjectSchema {
            title: string_field(obj, "title"),
            description: string_field(obj, "description"),
            order: order_field(obj),
            properties,
            required,
        }));
    }

    Ok(SchemaNode::Scalar(ScalarSchema {
        scalar_type: type_name(obj).unwrap_or_else(|| "string".to_string()),
        title: string_field(obj, "title"),
        description: string_field(obj, "description"),
        order: order_field(obj),
        const_value: obj.get("const").cloned(),
    }))
}

/// Resolves the `type` keyword, tolerating the `["string", "null"]` nullable
/// form some connectors emit.
fn type_name(obj: &serde_json::Map<String, Value>) -> Option<String> {
    match obj.get("type") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(|n| n.as_str())
            .find(|n| *n != "null")
            .map(str::to_string),
        _ => None,
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn order_field(obj: &serde_json::Map<String, Value>) -> Option<i64> {
    obj.get("order").and_then(Value::as_i64)
}
