//! Values bound to and read from the record store
//!
//! Sequences are bound as compact JSON text and timestamps as fixed-width
//! RFC 3339 text (lexicographic order == chronological order). The store
//! never decodes them again; callers use [`decode_list`] and
//! [`decode_timestamp`] on the text they read back.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    List(Vec<String>),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into the representation SQLite stores
    pub fn to_sql(&self) -> Result<SqlValue, serde_json::Error> {
        Ok(match self {
            Self::Null => SqlValue::Null,
            Self::Integer(v) => SqlValue::Integer(*v),
            Self::Real(v) => SqlValue::Real(*v),
            Self::Text(s) => SqlValue::Text(s.clone()),
            Self::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Self::List(items) => SqlValue::Text(encode_list(items)?),
            Self::Timestamp(ts) => SqlValue::Text(encode_timestamp(ts)),
        })
    }

    /// Map a raw SQLite value back; no decoding of encoded text
    pub fn from_sql(raw: ValueRef<'_>) -> Self {
        match raw {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Self::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Compact JSON encoding of a string sequence
pub fn encode_list(items: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Inverse of [`encode_list`]
pub fn decode_list(text: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Canonical sortable form: UTC, microsecond precision, `Z` suffix
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inverse of [`encode_timestamp`]; accepts any RFC 3339 offset
pub fn decode_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}

/// A row as read from (or written to) the store, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces an existing column of the same name
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Store-assigned identity, if the row carries the `id` column
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_list_encoding_is_compact_json() {
        let items = vec!["tutorial".to_string(), "python".to_string()];
        let encoded = encode_list(&items).unwrap();
        assert_eq!(encoded, r#"["tutorial","python"]"#);
        assert_eq!(decode_list(&encoded).unwrap(), items);
    }

    #[test]
    fn test_timestamp_encoding_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 11, 25, 12, 0, 0).unwrap();

        let a = encode_timestamp(&early);
        let b = encode_timestamp(&late);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(decode_timestamp(&b).unwrap(), late);
    }

    #[test]
    fn test_to_sql_marshalling() {
        assert_eq!(Value::Bool(true).to_sql().unwrap(), SqlValue::Integer(1));
        assert_eq!(
            Value::from(vec!["a", "a"]).to_sql().unwrap(),
            SqlValue::Text(r#"["a","a"]"#.to_string())
        );
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_row_set_replaces_existing_column() {
        let row = Row::new().with("title", "a").with("views", 3).with("title", "b");
        assert_eq!(row.len(), 2);
        assert_eq!(row.text("title"), Some("b"));
        assert_eq!(row.integer("views"), Some(3));
        assert_eq!(row.id(), None);
    }
}
