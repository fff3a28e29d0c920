use crate::schema::SchemaNode;

/// Resolves an integer order for every property of an object level, in two
/// passes.
///
/// Pass one keeps every explicit non-negative hint and records the highest
/// one. Pass two assigns `max + 1, max + 2, ...` to the remaining properties
/// in encounter order. Unhinted fields therefore sort after all hinted ones
/// while keeping their relative declaration order. A single pass that hands
/// out incrementing orders as properties are visited would misorder levels
/// that mix hinted and unhinted properties.
pub(super) fn resolve_sibling_orders(properties: &[(String, SchemaNode)]) -> Vec<i64> {
    let mut max_order: i64 = -1;
    let mut resolved: Vec<i64> = properties
        .iter()
        .map(|(_, node)| match node.order() {
            Some(order) if order >= 0 => {
                max_order = max_order.max(order);
                order
            }
            _ => -1,
        })
        .collect();

    for slot in &mut resolved {
        if *slot == -1 {
            max_order += 1;
            *slot = max_order;
        }
    }

    resolved
}
