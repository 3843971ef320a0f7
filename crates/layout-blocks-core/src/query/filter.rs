use serde_json::{Map, Value};

/// A row filter. Field names may be dotted paths into nested objects
/// (`meta.one_field`).
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
    Null(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::Eq(field.into(), value.into())
    }

    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Filter
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn null(field: impl Into<String>) -> Filter {
        Filter::Null(field.into())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
        Filter::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
        Filter::Or(filters.into_iter().collect())
    }

    /// Encodes the filter in the host's JSON filter syntax.
    pub fn to_json(&self) -> Value {
        match self {
            Filter::Eq(field, value) => nest(field, op("_eq", value.clone())),
            Filter::In(field, values) => nest(field, op("_in", Value::Array(values.clone()))),
            Filter::Null(field) => nest(field, op("_null", Value::Bool(true))),
            Filter::And(filters) => op("_and", filters.iter().map(Filter::to_json).collect()),
            Filter::Or(filters) => op("_or", filters.iter().map(Filter::to_json).collect()),
        }
    }

    /// Evaluates the filter against a record.
    ///
    /// Equality is loose across numbers and numeric strings, the way hosts
    /// coerce filter values against typed columns.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::Eq(field, value) => lookup(record, field).is_some_and(|v| loose_eq(v, value)),
            Filter::In(field, values) => {
                lookup(record, field).is_some_and(|v| values.iter().any(|value| loose_eq(v, value)))
            }
            Filter::Null(field) => lookup(record, field).map_or(true, Value::is_null),
            Filter::And(filters) => filters.iter().all(|filter| filter.matches(record)),
            Filter::Or(filters) => filters.iter().any(|filter| filter.matches(record)),
        }
    }
}

fn op(name: &str, operand: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), operand);
    Value::Object(map)
}

fn nest(path: &str, leaf: Value) -> Value {
    path.rsplit('.').fold(leaf, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.to_string(), inner);
        Value::Object(map)
    })
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |value, segment| value.as_object()?.get(segment))
}

fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        _ => lhs == rhs,
    }
}
