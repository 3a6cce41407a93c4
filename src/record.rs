use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors that can occur while building records from fetched JSON
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Collection entry {index} is not an object")]
    InvalidEntry { index: usize },
}

/// One domain entity (application, claim, certificate, ...) as a schema-less field map.
///
/// The engine never assumes a shape: anything that filters or sorts only asks
/// whether a field with a given name is readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Create record from a JSON object
    pub fn from_json(json: Value) -> Result<Self, RecordError> {
        match json {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(RecordError::InvalidJson("Expected JSON object".to_string())),
        }
    }

    /// Build a collection from a JSON array of objects, keeping fetch order
    pub fn collection_from_json(json: Value) -> Result<Vec<Record>, RecordError> {
        let items = match json {
            Value::Array(items) => items,
            _ => return Err(RecordError::InvalidJson("Expected JSON array".to_string())),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(Self { fields }),
                _ => Err(RecordError::InvalidEntry { index }),
            })
            .collect()
    }

    /// Get field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get field value as a string slice, if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Get field value as a number, if it is numeric
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// True when the field is present and not null
    pub fn has(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(v) if !v.is_null())
    }

    /// Set field value (chainable)
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(Record::from_json(json!("alias")).is_err());
        assert!(Record::from_json(json!({"alias": "a"})).is_ok());
    }

    #[test]
    fn test_collection_reports_bad_entry_index() {
        let err = Record::collection_from_json(json!([{"a": 1}, 2])).unwrap_err();
        assert!(matches!(err, RecordError::InvalidEntry { index: 1 }));
    }

    #[test]
    fn test_typed_accessors() {
        let record = Record::from_json(json!({"alias": "wso2carbon", "size": 2048, "expiry": null})).unwrap();
        assert_eq!(record.get_str("alias"), Some("wso2carbon"));
        assert_eq!(record.get_f64("size"), Some(2048.0));
        assert_eq!(record.get_str("size"), None);
        assert!(!record.has("expiry"));
        assert!(!record.has("issuer"));
    }
}
