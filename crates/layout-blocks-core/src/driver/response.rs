use crate::{Error, Result};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Body of a successful call, unwrapped from the host's `{ data, meta }`
/// envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub data: Value,
    pub meta: Option<Value>,
}

impl Response {
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            meta: None,
        }
    }

    /// A response without a body (deletes, `204 No Content`).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Parses a raw response body. An empty body is an empty response.
    pub fn from_body(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::empty());
        }

        let mut envelope: Value = serde_json::from_str(body)?;
        let Some(envelope) = envelope.as_object_mut() else {
            return Err(Error::invalid_response("expected a JSON object envelope"));
        };

        Ok(Self {
            data: envelope.remove("data").unwrap_or(Value::Null),
            meta: envelope.remove("meta"),
        })
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// The body as a list of records. `null` is an empty list.
    pub fn into_rows(self) -> Result<Vec<Value>> {
        match self.data {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(vec![]),
            other => Err(Error::invalid_response(format!(
                "expected a list of records, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// The body as a single record.
    pub fn into_record(self) -> Result<Value> {
        match self.data {
            record @ Value::Object(_) => Ok(record),
            other => Err(Error::invalid_response(format!(
                "expected a record, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.data)?)
    }

    /// `meta.total_count`, when the host returned it.
    pub fn total_count(&self) -> Option<u64> {
        self.meta.as_ref()?.get("total_count")?.as_u64()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
