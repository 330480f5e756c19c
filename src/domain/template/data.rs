use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Loosely typed values interpolated into an email template.
///
/// Lookups treat JSON `null`, `false`, `0` and `""` as absent, so every
/// template field falls back to its default for any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateData(Map<String, Value>);

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` only when a value is given.
    pub fn with_some<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Sets `key` unless it already holds a usable value.
    pub fn insert_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.0.get(key).is_some_and(is_present) {
            self.insert(key, value);
        }
    }

    /// The value at `key` formatted for interpolation, or `default`.
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(value) if is_present(value) => match value {
                Value::Number(n) => format_number(n),
                other => other.to_string(),
            },
            _ => default.to_owned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for TemplateData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Whole floats print without a fraction, so `82.0` reads `82`.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
