use serde_json::Value;
use std::cmp::Ordering;

/// Orders two column values for sorting. Nulls sort first; numbers and
/// numeric strings compare numerically.
pub(crate) fn compare(lhs: Option<&Value>, rhs: Option<&Value>) -> Ordering {
    let lhs = lhs.filter(|v| !v.is_null());
    let rhs = rhs.filter(|v| !v.is_null());

    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => match (number(lhs), number(rhs)) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => text(lhs).cmp(&text(rhs)),
        },
    }
}

/// Returns `true` when two identities refer to the same record.
pub(crate) fn same_id(lhs: &Value, rhs: &Value) -> bool {
    match (number(lhs), number(rhs)) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
