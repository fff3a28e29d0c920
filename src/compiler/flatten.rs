use crate::error::SchemaCompileError;
use crate::field::{ConstValue, FieldKind, FieldSpec};
use crate::schema::{ObjectSchema, SchemaNode, UnionSchema};
use ahash::AHashSet;
use itertools::Itertools;

use super::ordering::resolve_sibling_orders;

/// Context threaded through each recursive flattening call: the exclusion
/// set and the active discriminator constant travel as an explicit
/// parameter, never as shared mutable state.
#[derive(Clone, Copy, Default)]
pub(super) struct FlattenContext<'a> {
    /// Property names not emitted at this level: the enclosing union's
    /// discriminator, which is implicit in the variant choice.
    excluded: &'a [String],
    /// The constant selected on the nearest enclosing discriminator.
    discriminator: Option<&'a ConstValue>,
}

/// Flattens one object level into ordered field specs.
pub(super) fn flatten_object(
    schema: &ObjectSchema,
    base_path: &str,
    ctx: FlattenContext<'_>,
) -> Result<Vec<FieldSpec>, SchemaCompileError> {
    let orders = resolve_sibling_orders(&schema.properties);
    let mut fields = Vec::new();

    for ((key, node), order) in schema.properties.iter().zip(orders) {
        if ctx.excluded.iter().any(|excluded| excluded == key) {
            continue;
        }

        let path = format!("{base_path}.{key}");
        let required = schema.requires(key);

        let spec = match node {
            SchemaNode::Scalar(scalar) => FieldSpec {
                path,
                kind: FieldKind::Scalar,
                title: scalar.title.clone(),
                description: scalar.description.clone(),
                required,
                order,
                parent_discriminator: ctx.discriminator.cloned(),
                enum_values: Vec::new(),
                children: Vec::new(),
            },
            SchemaNode::Object(object) => {
                // A plain nested object is an unconditional group; its
                // children stay under the same enclosing discriminator.
                let children = flatten_object(
                    object,
                    &path,
                    FlattenContext {
                        excluded: &[],
                        discriminator: ctx.discriminator,
                    },
                )?;
                FieldSpec {
                    path,
                    kind: FieldKind::Group,
                    title: object.title.clone(),
                    description: object.description.clone(),
                    required,
                    order,
                    parent_discriminator: ctx.discriminator.cloned(),
                    enum_values: Vec::new(),
                    children,
                }
            }
            SchemaNode::Union(union) => flatten_union(union, &path, required, order, ctx)?,
        };

        fields.push(spec);
    }

    // Stable sort: equal orders keep declaration order.
    fields.sort_by_key(|field| field.order);
    Ok(fields)
}

/// Flattens a union property into one group spec with per-variant children.
fn flatten_union(
    union: &UnionSchema,
    path: &str,
    required: bool,
    order: i64,
    ctx: FlattenContext<'_>,
) -> Result<FieldSpec, SchemaCompileError> {
    if union.variants.is_empty() {
        return Err(SchemaCompileError::EmptyUnion {
            path: path.to_string(),
        });
    }

    if union.variants.len() == 1 {
        // A single variant carries no choice: treat it as the object's
        // unconditional passthrough and recurse without excluding anything.
        let children = flatten_object(
            &union.variants[0],
            path,
            FlattenContext {
                excluded: &[],
                discriminator: ctx.discriminator,
            },
        )?;
        return Ok(FieldSpec {
            path: path.to_string(),
            kind: FieldKind::Group,
            title: union.title.clone(),
            description: union.description.clone(),
            required,
            order,
            parent_discriminator: ctx.discriminator.cloned(),
            enum_values: Vec::new(),
            children,
        });
    }

    let discriminator = resolve_discriminator(path, &union.variants)?;
    let excluded = [discriminator.clone()];
    let mut enum_values = Vec::with_capacity(union.variants.len());
    let mut seen = AHashSet::new();
    let mut children = Vec::new();

    for (index, variant) in union.variants.iter().enumerate() {
        let constant = variant_constant(path, variant, index, &discriminator)?;
        if !seen.insert(format!("{constant:?}")) {
            return Err(SchemaCompileError::DuplicateVariantConst {
                path: path.to_string(),
                value: constant,
            });
        }
        let variant_fields = flatten_object(
            variant,
            path,
            FlattenContext {
                excluded: &excluded,
                discriminator: Some(&constant),
            },
        )?;
        children.extend(variant_fields);
        enum_values.push(constant);
    }

    Ok(FieldSpec {
        // The group renders as the discriminator dropdown, so its address is
        // the discriminator property's.
        path: format!("{path}.{discriminator}"),
        kind: FieldKind::Group,
        title: union.title.clone(),
        description: union.description.clone(),
        required,
        order,
        parent_discriminator: ctx.discriminator.cloned(),
        enum_values,
        children,
    })
}

/// Computes the common discriminator of a multi-variant union: the
/// order-preserving pairwise intersection of every variant's `required`
/// list, taken from the first variant.
///
/// When the intersection holds more than one name, the discriminator is the
/// single one that carries a constant in every variant; anything else is
/// rejected rather than compiled into an undefined field path.
fn resolve_discriminator(
    path: &str,
    variants: &[ObjectSchema],
) -> Result<String, SchemaCompileError> {
    let mut common: Vec<String> = match &variants[0].required {
        Some(required) => required.clone(),
        None => {
            return Err(SchemaCompileError::MissingRequiredList {
                path: path.to_string(),
                index: 0,
            });
        }
    };

    for (index, variant) in variants.iter().enumerate().skip(1) {
        let required = variant.required.as_ref().ok_or_else(|| {
            SchemaCompileError::MissingRequiredList {
                path: path.to_string(),
                index,
            }
        })?;
        common.retain(|name| required.contains(name));
    }

    if common.is_empty() {
        return Err(SchemaCompileError::NoCommonDiscriminator {
            path: path.to_string(),
        });
    }
    if common.len() == 1 {
        return Ok(common.remove(0));
    }

    let count = common.len();
    common
        .into_iter()
        .filter(|name| {
            variants.iter().all(|variant| {
                matches!(
                    variant.property(name),
                    Some(SchemaNode::Scalar(scalar)) if scalar.const_value.is_some()
                )
            })
        })
        .exactly_one()
        .map_err(|_| SchemaCompileError::AmbiguousDiscriminator {
            path: path.to_string(),
            count,
        })
}

/// Extracts a variant's discriminator constant.
fn variant_constant(
    path: &str,
    variant: &ObjectSchema,
    index: usize,
    discriminator: &str,
) -> Result<ConstValue, SchemaCompileError> {
    let property = variant.property(discriminator).ok_or_else(|| {
        SchemaCompileError::MissingDiscriminatorProperty {
            path: path.to_string(),
            index,
            name: discriminator.to_string(),
        }
    })?;
    match property {
        SchemaNode::Scalar(scalar) => scalar.const_value.as_ref().and_then(ConstValue::from_json),
        _ => None,
    }
    .ok_or_else(|| SchemaCompileError::MissingDiscriminatorConst {
        path: path.to_string(),
        index,
        name: discriminator.to_string(),
    })
}
