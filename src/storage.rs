//! Storage-side values
//!
//! A driver-neutral view of a persisted column value, and the
//! [`TryReadString`] capability used to pull a stored hash out of one.

use serde_json::Value;

/// A column value as handed over by a storage layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for StorageValue {
    fn from(value: &str) -> Self {
        StorageValue::Text(value.to_owned())
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        StorageValue::Text(value)
    }
}

impl From<Option<String>> for StorageValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(StorageValue::Null, StorageValue::Text)
    }
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        StorageValue::Bool(value)
    }
}

impl From<i64> for StorageValue {
    fn from(value: i64) -> Self {
        StorageValue::Int(value)
    }
}

impl From<f64> for StorageValue {
    fn from(value: f64) -> Self {
        StorageValue::Float(value)
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        StorageValue::Bytes(value)
    }
}

/// Read a string out of a storage value, if it holds one.
///
/// Anything that is not string-typed yields `None`. Callers treat that as
/// "nothing to load" rather than as an error.
pub trait TryReadString {
    fn try_read_string(&self) -> Option<&str>;

    /// True when the value is missing altogether (SQL `NULL`, `None`).
    fn is_absent(&self) -> bool {
        false
    }

    /// Short type name, for diagnostics.
    fn kind(&self) -> &'static str;
}

impl TryReadString for str {
    fn try_read_string(&self) -> Option<&str> {
        Some(self)
    }

    fn kind(&self) -> &'static str {
        "text"
    }
}

impl TryReadString for String {
    fn try_read_string(&self) -> Option<&str> {
        Some(self.as_str())
    }

    fn kind(&self) -> &'static str {
        "text"
    }
}

impl<T: TryReadString> TryReadString for Option<T> {
    fn try_read_string(&self) -> Option<&str> {
        self.as_ref().and_then(TryReadString::try_read_string)
    }

    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, TryReadString::is_absent)
    }

    fn kind(&self) -> &'static str {
        self.as_ref().map_or("null", TryReadString::kind)
    }
}

impl TryReadString for StorageValue {
    fn try_read_string(&self) -> Option<&str> {
        match self {
            StorageValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, StorageValue::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            StorageValue::Null => "null",
            StorageValue::Bool(_) => "bool",
            StorageValue::Int(_) => "int",
            StorageValue::Float(_) => "float",
            StorageValue::Text(_) => "text",
            StorageValue::Bytes(_) => "bytes",
        }
    }
}

impl TryReadString for Value {
    fn try_read_string(&self) -> Option<&str> {
        self.as_str()
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "text",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_text_is_read() {
        assert_eq!(StorageValue::from("abc").try_read_string(), Some("abc"));
        assert_eq!(StorageValue::Int(7).try_read_string(), None);
        assert_eq!(StorageValue::Bytes(b"abc".to_vec()).try_read_string(), None);
        assert_eq!(StorageValue::Null.try_read_string(), None);
    }

    #[test]
    fn test_absent_values() {
        assert!(StorageValue::Null.is_absent());
        assert!(!StorageValue::Bool(false).is_absent());
        assert!(None::<String>.is_absent());
        assert!(Some(StorageValue::Null).is_absent());
        assert!(!Some("x".to_string()).is_absent());
        assert!(json!(null).is_absent());
    }

    #[test]
    fn test_option_reads_through() {
        assert_eq!(Some("hash".to_string()).try_read_string(), Some("hash"));
        assert_eq!(None::<String>.try_read_string(), None);
        assert_eq!(StorageValue::from(None::<String>), StorageValue::Null);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json!("hash").try_read_string(), Some("hash"));
        assert_eq!(json!(12).try_read_string(), None);
        assert_eq!(json!({"hash": "x"}).kind(), "object");
        assert_eq!(json!([1]).kind(), "array");
    }
}
