use crate::protocol::VALUE_PARAMETER;
use ahash::AHashMap;
use serde_json::Value;

/// The raw parts of a POST: its query map and JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    pub query: AHashMap<String, String>,
    pub body: Value,
}

impl RequestData {
    pub fn new(query: AHashMap<String, String>, body: Value) -> Self {
        Self { query, body }
    }

    /// A request carrying only a JSON body.
    pub fn from_body(body: Value) -> Self {
        Self {
            query: AHashMap::new(),
            body,
        }
    }

    /// Merges a choice path segment into the query so it is read like any other value.
    pub fn with_choice(mut self, choice: impl Into<String>) -> Self {
        self.query.insert(VALUE_PARAMETER.to_string(), choice.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// The submitted value, looked up in order: query `value`, body
    /// `data.value`, body `value`. Nulls count as absent.
    pub fn value(&self) -> Option<Value> {
        if let Some(value) = self.query.get(VALUE_PARAMETER) {
            return Some(Value::String(value.clone()));
        }
        self.body
            .get("data")
            .and_then(|data| data.get(VALUE_PARAMETER))
            .filter(|v| !v.is_null())
            .or_else(|| self.body.get(VALUE_PARAMETER).filter(|v| !v.is_null()))
            .cloned()
    }

    /// The wallet account: body `account`, falling back to query `account`.
    pub fn account(&self) -> Option<String> {
        self.body
            .get("account")
            .and_then(Value::as_str)
            .or_else(|| self.query.get("account").map(String::as_str))
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
    }
}

/// The text a value is validated as. Non-string scalars use their JSON form.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
