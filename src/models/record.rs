use serde_json::{Map, Value};

use crate::types::RecordId;

/// Fields the store manages itself; never part of a write payload
const STORE_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Errors raised while turning a raw row into a typed record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Field '{field}' should be {expected}")]
    InvalidType { field: String, expected: &'static str },
}

/// A raw row as returned by the record store, before typed decoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create record from a JSON row
    pub fn from_json(json: Value) -> Result<Self, RecordError> {
        match json {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RecordError::InvalidJson(format!(
                "Expected JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Convert a JSON array of rows, failing on the first non-object
    pub fn from_json_array(json: Value) -> Result<Vec<Self>, RecordError> {
        match json {
            Value::Array(array) => array
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    Self::from_json(item)
                        .map_err(|e| RecordError::InvalidJson(format!("Item {}: {}", index, e)))
                })
                .collect(),
            _ => Err(RecordError::InvalidJson("Expected JSON array".to_string())),
        }
    }

    /// Get field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set field value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Drop store-managed fields so the record can be sent as a write body
    pub fn strip_store_fields(&mut self) -> &mut Self {
        for field in STORE_FIELDS {
            self.fields.remove(*field);
        }
        self
    }

    // ========================================
    // Typed accessors
    // ========================================

    /// Store-assigned identity; accepts string or numeric ids
    pub fn id(&self) -> Result<RecordId, RecordError> {
        match self.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Ok(RecordId::new(s.clone())),
            Some(Value::Number(n)) => Ok(RecordId::new(n.to_string())),
            None | Some(Value::Null) => Err(RecordError::MissingField("id".to_string())),
            Some(_) => Err(invalid("id", "a string or number")),
        }
    }

    pub fn require_str(&self, field: &str) -> Result<String, RecordError> {
        self.opt_str(field)?
            .ok_or_else(|| RecordError::MissingField(field.to_string()))
    }

    pub fn opt_str(&self, field: &str) -> Result<Option<String>, RecordError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(invalid(field, "a string")),
        }
    }

    pub fn opt_i64(&self, field: &str) -> Result<Option<i64>, RecordError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .map(Some)
                .ok_or_else(|| invalid(field, "an integer")),
            Some(_) => Err(invalid(field, "an integer")),
        }
    }

    pub fn require_i64(&self, field: &str) -> Result<i64, RecordError> {
        self.opt_i64(field)?
            .ok_or_else(|| RecordError::MissingField(field.to_string()))
    }

    pub fn opt_bool(&self, field: &str) -> Result<Option<bool>, RecordError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid(field, "a boolean")),
        }
    }

    /// Ordered list of strings; a missing or null column reads as empty
    pub fn str_list(&self, field: &str) -> Result<Vec<String>, RecordError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(field, "an array of strings"))
                })
                .collect(),
            Some(_) => Err(invalid(field, "an array of strings")),
        }
    }

    // ========================================
    // Serialization
    // ========================================

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

fn invalid(field: &str, expected: &'static str) -> RecordError {
    RecordError::InvalidType {
        field: field.to_string(),
        expected,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
