use super::path::FieldPath;
use super::value::FieldValue;
use serde_json::Value;

/// Separator used when a path lands on an array.
pub const ARRAY_JOIN_SEPARATOR: &str = ", ";

/// Resolves `path` against `record`.
///
/// Returns `None` as soon as a segment cannot be followed: a null or missing
/// value, a scalar, or an out-of-range / non-numeric array index. Arrays at the
/// end of the path are joined with [`ARRAY_JOIN_SEPARATOR`]; objects and nulls
/// at the end of the path are not displayable and resolve to `None`.
pub fn resolve(record: &Value, path: &FieldPath) -> Option<FieldValue> {
    let mut current = record;
    for segment in path.segments() {
        current = step(current, segment)?;
    }

    match current {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => Some(FieldValue::Number(n.clone())),
        Value::Bool(b) => Some(FieldValue::Bool(*b)),
        Value::Array(items) => Some(FieldValue::Text(join_items(items, ARRAY_JOIN_SEPARATOR))),
        Value::Null | Value::Object(_) => None,
    }
}

/// Parses `raw` and resolves it; malformed paths resolve to `None`.
pub fn resolve_str(record: &Value, raw: &str) -> Option<FieldValue> {
    FieldPath::parse(raw)
        .ok()
        .and_then(|path| resolve(record, &path))
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    let next = match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }?;
    if next.is_null() { None } else { Some(next) }
}

fn join_items(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            // nested arrays flatten with a bare comma
            Value::Array(inner) => join_items(inner, ","),
            Value::Object(_) => item.to_string(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}
