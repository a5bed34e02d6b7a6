//! Record store errors
//!
//! Usage errors are caller mistakes and fail immediately. Engine errors wrap
//! whatever SQLite reported and carry the statement that triggered them.

use thiserror::Error;

use super::query::QueryKind;

/// Errors from the record store and the criteria builder.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A data operation was attempted while no scope was acquired
    #[error("record store operation attempted outside of an acquired scope")]
    OutsideScope,

    /// A value does not match the declared column type
    #[error("column `{column}` expects {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A column name that the schema does not declare
    #[error("column `{0}` is not declared by the schema")]
    UnknownColumn(String),

    /// A record of a different shape than the one the store was built for
    #[error("record shape `{found}` does not match store shape `{expected}`")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Predicate tokens do not alternate comparison / connector
    #[error("invalid WHERE clause structure at token {position}")]
    MalformedWhere { position: usize },

    /// The builder only compiles read and delete statements
    #[error("unsupported query kind: {0:?}")]
    UnsupportedQuery(QueryKind),

    /// A clause the statement kind cannot carry, such as ORDER BY on DELETE
    #[error("{clause} is not supported on {kind:?} statements")]
    UnsupportedClause {
        kind: QueryKind,
        clause: &'static str,
    },

    /// Underlying SQLite failure
    #[error("sqlite error executing `{sql}`: {source}")]
    Engine {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Sequence value could not be encoded for binding
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// True for errors caused by caller misuse rather than the engine
    pub fn is_usage(&self) -> bool {
        !matches!(self, Self::Engine { .. } | Self::Encode(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
