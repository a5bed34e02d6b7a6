//! Static schema descriptors
//!
//! A record shape is declared once as a [`Schema`]: a shape name plus an
//! ordered list of fields. The store derives its DDL and validates every
//! bound value against it. The `id` identity column is implicit.

use super::error::{StoreError, StoreResult};
use super::value::{Row, Value};

/// Name of the store-assigned identity column
pub const ID_COLUMN: &str = "id";

/// Semantic type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Real,
    Boolean,
    /// Ordered sequence of strings, stored as JSON text
    TextList,
    /// UTC instant, stored as canonical RFC 3339 text
    Timestamp,
}

impl FieldType {
    /// Column affinity used in `CREATE TABLE`
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Text | Self::TextList | Self::Timestamp => "TEXT",
            Self::Integer | Self::Boolean => "INTEGER",
            Self::Real => "REAL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::TextList => "list",
            Self::Timestamp => "timestamp",
        }
    }

    /// Whether `value` may be bound to a column of this type.
    /// Null is accepted everywhere (absent optional fields). Boolean
    /// columns take integers only in their stored 0/1 form.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Text, Value::Text(_))
                | (Self::Integer, Value::Integer(_))
                | (Self::Real, Value::Real(_) | Value::Integer(_))
                | (Self::Boolean, Value::Bool(_) | Value::Integer(0 | 1))
                | (Self::TextList, Value::List(_))
                | (Self::Timestamp, Value::Timestamp(_))
        )
    }
}

/// One declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Declared record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Lower-cased shape name plus `s`
    pub fn table_name(&self) -> String {
        format!("{}s", self.name.to_lowercase())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this shape
    pub fn create_table_sql(&self) -> String {
        let mut columns = vec![format!("{ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
        columns.extend(
            self.fields
                .iter()
                .filter(|f| f.name != ID_COLUMN)
                .map(|f| format!("{} {}", f.name, f.ty.sql_type())),
        );
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_name(),
            columns.join(", ")
        )
    }

    /// Check a single column/value pair against the declaration
    pub fn check(&self, column: &str, value: &Value) -> StoreResult<()> {
        let field = self
            .field(column)
            .ok_or_else(|| StoreError::UnknownColumn(column.to_string()))?;
        if field.ty.accepts(value) {
            Ok(())
        } else {
            Err(StoreError::TypeMismatch {
                column: column.to_string(),
                expected: field.ty.name(),
                found: value.type_name(),
            })
        }
    }

    /// Check that a row is a full, well-typed instance of this shape
    /// (identity excluded)
    pub fn conform(&self, row: &Row) -> StoreResult<()> {
        for (column, value) in row.iter() {
            if column == ID_COLUMN {
                return Err(StoreError::TypeMismatch {
                    column: column.to_string(),
                    expected: "store-assigned identity",
                    found: value.type_name(),
                });
            }
            self.check(column, value)?;
        }
        for field in self.fields {
            if row.get(field.name).is_none() {
                return Err(StoreError::TypeMismatch {
                    column: field.name.to_string(),
                    expected: field.ty.name(),
                    found: "missing",
                });
            }
        }
        Ok(())
    }
}

/// A typed record that maps onto a declared [`Schema`]
pub trait Record {
    /// Shape this record type persists as
    fn schema() -> &'static Schema;

    /// All declared fields except identity, in declaration order
    fn to_row(&self) -> Row;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[Field] = &[
        Field::new("name", FieldType::Text),
        Field::new("age", FieldType::Integer),
        Field::new("score", FieldType::Real),
        Field::new("active", FieldType::Boolean),
        Field::new("tags", FieldType::TextList),
        Field::new("joined", FieldType::Timestamp),
    ];
    const USER: Schema = Schema::new("User", FIELDS);

    #[test]
    fn test_table_name_lowercase_plural() {
        assert_eq!(USER.table_name(), "users");
    }

    #[test]
    fn test_create_table_sql_uses_type_map() {
        assert_eq!(
            USER.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             name TEXT, age INTEGER, score REAL, active INTEGER, tags TEXT, joined TEXT)"
        );
    }

    #[test]
    fn test_check_rejects_wrong_type() {
        assert!(USER.check("age", &Value::Integer(3)).is_ok());
        assert!(USER.check("score", &Value::Integer(3)).is_ok());
        assert!(USER.check("joined", &Value::Null).is_ok());

        let err = USER.check("age", &Value::Text("old".into())).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                expected: "integer",
                found: "text",
                ..
            }
        ));

        let err = USER.check("height", &Value::Integer(1)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn(ref c) if c == "height"));
    }

    #[test]
    fn test_boolean_accepts_only_truth_values() {
        assert!(USER.check("active", &Value::Bool(true)).is_ok());
        assert!(USER.check("active", &Value::Integer(0)).is_ok());
        assert!(USER.check("active", &Value::Integer(1)).is_ok());

        for bad in [Value::Integer(7), Value::Integer(-1)] {
            let err = USER.check("active", &bad).unwrap_err();
            assert!(matches!(
                err,
                StoreError::TypeMismatch {
                    expected: "boolean",
                    found: "integer",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_conform_requires_every_field() {
        let row = Row::new().with("name", "ann").with("age", 30);
        let err = USER.conform(&row).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { found: "missing", .. }));
    }
}
