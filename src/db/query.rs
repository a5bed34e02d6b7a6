//! Fluent criteria builder for read and delete statements
//!
//! Builds `SELECT`/`DELETE` text plus a positional parameter list. Predicate
//! tokens must alternate comparison / connector, starting and ending on a
//! comparison; [`QueryBuilder::build`] rejects anything else.
//!
//! # Example
//! ```
//! use reelcast::db::{Comparison, Logical, QueryBuilder, QueryKind, Value};
//!
//! let (sql, params) = QueryBuilder::new()
//!     .where_compare("age", Comparison::GreaterThan, 18)
//!     .where_logical(Logical::And)
//!     .where_compare("country", Comparison::Equal, "USA")
//!     .build("users", QueryKind::Read)?;
//!
//! assert_eq!(sql, "SELECT * FROM users WHERE age > ? AND country = ?");
//! assert_eq!(params, vec![Value::Integer(18), Value::Text("USA".into())]);
//! # Ok::<(), reelcast::db::StoreError>(())
//! ```

use super::error::{StoreError, StoreResult};
use super::value::Value;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
        }
    }
}

/// Logical connector between predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    And,
    Or,
}

impl Logical {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Statement kinds the store issues. Only `Read` and `Delete` go through
/// the builder; the store writes `Create`/`Update` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
enum WhereToken {
    Compare(String),
    Connector(Logical),
}

/// Column selections accepted by [`QueryBuilder::select_columns`]
pub trait IntoColumns {
    fn into_columns(self) -> String;
}

impl IntoColumns for &str {
    fn into_columns(self) -> String {
        self.to_string()
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> String {
        self
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> String {
        self.join(", ")
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> String {
        self.join(", ")
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> String {
        self.join(", ")
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> String {
        self.join(", ")
    }
}

/// Mutable description of a future read or delete
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    columns: String,
    tokens: Vec<WhereToken>,
    params: Vec<Value>,
    order: Option<(String, OrderDirection)>,
    limit: Option<usize>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            tokens: Vec::new(),
            params: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected columns (default `*`)
    pub fn select_columns(mut self, columns: impl IntoColumns) -> Self {
        self.columns = columns.into_columns();
        self
    }

    /// Append `column <op> ?` and its parameter
    pub fn where_compare(
        mut self,
        column: &str,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.tokens.push(WhereToken::Compare(format!(
            "{} {} ?",
            column,
            comparison.as_sql()
        )));
        self.params.push(value.into());
        self
    }

    /// Append a connector, only directly after a comparison.
    /// A second connector in a row, or one with nothing before it, is dropped.
    pub fn where_logical(mut self, logical: Logical) -> Self {
        if matches!(self.tokens.last(), Some(WhereToken::Compare(_))) {
            self.tokens.push(WhereToken::Connector(logical));
        }
        self
    }

    /// Set the single order clause, replacing any previous one
    pub fn order_by(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Parameters collected so far, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Compile to statement text and parameters. Does not consume or
    /// mutate the builder.
    pub fn build(&self, table: &str, kind: QueryKind) -> StoreResult<(String, Vec<Value>)> {
        let mut sql = match kind {
            QueryKind::Read => format!("SELECT {} FROM {}", self.columns, table),
            QueryKind::Delete => format!("DELETE FROM {}", table),
            other => return Err(StoreError::UnsupportedQuery(other)),
        };

        // bundled SQLite lacks SQLITE_ENABLE_UPDATE_DELETE_LIMIT; dropping
        // the clauses would widen the delete
        if kind == QueryKind::Delete {
            let clause = match (&self.order, self.limit) {
                (Some(_), _) => Some("ORDER BY"),
                (None, Some(_)) => Some("LIMIT"),
                (None, None) => None,
            };
            if let Some(clause) = clause {
                return Err(StoreError::UnsupportedClause { kind, clause });
            }
        }

        self.push_where(&mut sql)?;

        if let Some((column, direction)) = &self.order {
            sql.push_str(&format!(" ORDER BY {} {}", column, direction.as_sql()));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        Ok((sql, self.params.clone()))
    }

    fn push_where(&self, sql: &mut String) -> StoreResult<()> {
        for (position, token) in self.tokens.iter().enumerate() {
            if position == 0 {
                sql.push_str(" WHERE");
            }
            match (position % 2, token) {
                (0, WhereToken::Compare(cmp)) => {
                    sql.push(' ');
                    sql.push_str(cmp);
                }
                (1, WhereToken::Connector(logical)) => {
                    sql.push(' ');
                    sql.push_str(logical.as_sql());
                }
                _ => return Err(StoreError::MalformedWhere { position }),
            }
        }

        // a dangling connector has no right-hand comparison
        if let Some(WhereToken::Connector(_)) = self.tokens.last() {
            return Err(StoreError::MalformedWhere {
                position: self.tokens.len() - 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_columns_list() {
        let qb = QueryBuilder::new().select_columns(["id", "name"]);
        let (query, params) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT id, name FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_columns_string() {
        let qb = QueryBuilder::new().select_columns("id");
        let (query, _) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT id FROM users");
    }

    #[test]
    fn test_select_columns_replaces_previous() {
        let qb = QueryBuilder::new()
            .select_columns(vec!["a".to_string(), "b".to_string()])
            .select_columns("keywords");
        let (query, _) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT keywords FROM users");
    }

    #[test]
    fn test_where_compare_single() {
        let qb = QueryBuilder::new()
            .select_columns("*")
            .where_compare("age", Comparison::GreaterThan, 18);
        let (query, params) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users WHERE age > ?");
        assert_eq!(params, vec![Value::Integer(18)]);
    }

    #[test]
    fn test_where_compare_multiple_with_and() {
        let qb = QueryBuilder::new()
            .select_columns("*")
            .where_compare("age", Comparison::GreaterThan, 18)
            .where_logical(Logical::And)
            .where_compare("country", Comparison::Equal, "USA");
        let (query, params) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users WHERE age > ? AND country = ?");
        assert_eq!(params, vec![Value::Integer(18), Value::from("USA")]);
    }

    #[test]
    fn test_all_comparison_operators() {
        let qb = QueryBuilder::new()
            .where_compare("a", Comparison::Equal, 1)
            .where_logical(Logical::Or)
            .where_compare("b", Comparison::NotEqual, 2)
            .where_logical(Logical::Or)
            .where_compare("c", Comparison::GreaterThanEqual, 3)
            .where_logical(Logical::And)
            .where_compare("d", Comparison::LessThan, 4)
            .where_logical(Logical::And)
            .where_compare("e", Comparison::LessThanEqual, 5);
        let (query, params) = qb.build("t", QueryKind::Read).unwrap();
        assert_eq!(
            query,
            "SELECT * FROM t WHERE a = ? OR b != ? OR c >= ? AND d < ? AND e <= ?"
        );
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_missing_connector_is_structural_error() {
        let qb = QueryBuilder::new()
            .select_columns("*")
            .where_compare("age", Comparison::GreaterThan, 18)
            .where_compare("country", Comparison::Equal, "USA");
        let err = qb.build("users", QueryKind::Read).unwrap_err();
        assert!(matches!(err, StoreError::MalformedWhere { position: 1 }));
    }

    #[test]
    fn test_duplicate_connector_is_dropped() {
        let qb = QueryBuilder::new()
            .where_compare("age", Comparison::GreaterThan, 18)
            .where_logical(Logical::And)
            .where_logical(Logical::Or)
            .where_compare("country", Comparison::Equal, "USA");
        let (query, _) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users WHERE age > ? AND country = ?");
    }

    #[test]
    fn test_leading_connector_is_dropped() {
        let qb = QueryBuilder::new()
            .where_logical(Logical::And)
            .where_compare("id", Comparison::Equal, 1);
        let (query, _) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users WHERE id = ?");
    }

    #[test]
    fn test_trailing_connector_is_rejected() {
        let qb = QueryBuilder::new()
            .where_compare("age", Comparison::GreaterThan, 18)
            .where_logical(Logical::And);
        let err = qb.build("users", QueryKind::Read).unwrap_err();
        assert!(matches!(err, StoreError::MalformedWhere { position: 1 }));
    }

    #[test]
    fn test_no_predicates_no_where() {
        let (query, params) = QueryBuilder::new()
            .order_by("views", OrderDirection::Descending)
            .build("users", QueryKind::Read)
            .unwrap();
        assert!(!query.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_order_by_and_limit() {
        let qb = QueryBuilder::new()
            .select_columns("keywords")
            .order_by("likes", OrderDirection::Ascending)
            .order_by("views", OrderDirection::Descending)
            .limit(20)
            .limit(10);
        let (query, _) = qb.build("videos", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT keywords FROM videos ORDER BY views DESC LIMIT 10");
    }

    #[test]
    fn test_order_by_defaults_ascending() {
        let qb = QueryBuilder::new().order_by("id", OrderDirection::default());
        let (query, _) = qb.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users ORDER BY id ASC");
    }

    #[test]
    fn test_delete_query() {
        let qb = QueryBuilder::new().where_compare("id", Comparison::Equal, 10);
        let (query, params) = qb.build("users", QueryKind::Delete).unwrap();
        assert_eq!(query, "DELETE FROM users WHERE id = ?");
        assert_eq!(params, vec![Value::Integer(10)]);
    }

    #[test]
    fn test_delete_rejects_order_and_limit() {
        let limited = QueryBuilder::new()
            .where_compare("age", Comparison::GreaterThan, 18)
            .limit(1);
        let err = limited.build("users", QueryKind::Delete).unwrap_err();
        assert!(err.is_usage());
        assert!(matches!(
            err,
            StoreError::UnsupportedClause {
                kind: QueryKind::Delete,
                clause: "LIMIT"
            }
        ));

        let ordered = QueryBuilder::new().order_by("age", OrderDirection::Descending);
        let err = ordered.build("users", QueryKind::Delete).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedClause {
                clause: "ORDER BY",
                ..
            }
        ));

        // the same criteria still compile as a read
        let (query, _) = limited.build("users", QueryKind::Read).unwrap();
        assert_eq!(query, "SELECT * FROM users WHERE age > ? LIMIT 1");
    }

    #[test]
    fn test_unsupported_query_kind() {
        let qb = QueryBuilder::new();
        for kind in [QueryKind::Create, QueryKind::Update] {
            let err = qb.build("users", kind).unwrap_err();
            assert!(matches!(err, StoreError::UnsupportedQuery(k) if k == kind));
        }
    }

    #[test]
    fn test_build_is_repeatable() {
        let qb = QueryBuilder::new().where_compare("id", Comparison::Equal, 7);
        let read = qb.build("a", QueryKind::Read).unwrap();
        let delete = qb.build("b", QueryKind::Delete).unwrap();
        assert_eq!(read.0, "SELECT * FROM a WHERE id = ?");
        assert_eq!(delete.0, "DELETE FROM b WHERE id = ?");
        assert_eq!(read.1, delete.1);
        assert_eq!(qb.params().len(), 1);
    }
}
