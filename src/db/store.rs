//! Schema-driven record store over a single SQLite file
//!
//! All data operations run inside [`RecordStore::scope`]: the scope opens a
//! connection, begins a transaction and creates the table if it is absent.
//! When the closure returns `Ok` the transaction commits, otherwise it rolls
//! back, including when the closure panics; either way the connection is
//! released and the store goes inert until the next scope. Calling an
//! operation outside a scope fails with [`StoreError::OutsideScope`].
//!
//! Reads return [`Row`]s with sequence and timestamp columns still in their
//! encoded text form; decoding is the caller's job.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use super::error::{StoreError, StoreResult};
use super::query::{QueryBuilder, QueryKind};
use super::schema::{Record, Schema, ID_COLUMN};
use super::value::{Row, Value};

/// Rolls back a scope that is still acquired when dropped, which only
/// happens if the scope closure unwinds
struct ScopeGuard<'a> {
    store: &'a mut RecordStore,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if self.store.conn.is_none() {
            return;
        }
        error!(table = %self.store.table, "record store scope unwound; rolling back");
        if let Err(e) = self.store.release(false) {
            warn!(error = %e, "rollback failed; connection dropped");
        }
    }
}

/// Record store bound to one declared shape
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    schema: &'static Schema,
    table: String,
    conn: Option<Connection>,
}

impl RecordStore {
    /// Describe a store; nothing is opened until a scope is entered
    pub fn new<P: AsRef<Path>>(path: P, schema: &'static Schema) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema,
            table: schema.table_name(),
            conn: None,
        }
    }

    /// Store for the shape of record type `R`
    pub fn for_record<R: Record, P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, R::schema())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// True while a scope is active
    pub fn is_acquired(&self) -> bool {
        self.conn.is_some()
    }

    /// Run `f` inside a transactional scope.
    ///
    /// Commits when `f` returns `Ok`, rolls back and re-signals the error
    /// otherwise. The connection is released on every path. Scopes do not
    /// nest.
    pub fn scope<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError> + Display,
    {
        self.acquire()?;
        let mut guard = ScopeGuard { store: self };

        match f(&mut *guard.store) {
            Ok(value) => {
                guard.store.release(true)?;
                Ok(value)
            }
            Err(e) => {
                error!(table = %guard.store.table, error = %e, "record store transaction rollback");
                if let Err(rollback) = guard.store.release(false) {
                    warn!(error = %rollback, "rollback failed; connection dropped");
                }
                Err(e)
            }
        }
    }

    fn acquire(&mut self) -> StoreResult<()> {
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Engine {
            sql: format!("open {}", self.path.display()),
            source,
        })?;
        conn.execute_batch("BEGIN")
            .map_err(|source| engine_error("BEGIN", &[], source))?;
        self.conn = Some(conn);

        let ddl = self.schema.create_table_sql();
        if let Err(e) = self.execute(&ddl, &[]) {
            self.conn = None;
            return Err(e);
        }
        debug!(path = %self.path.display(), table = %self.table, "record store acquired");
        Ok(())
    }

    fn release(&mut self, commit: bool) -> StoreResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        let sql = if commit { "COMMIT" } else { "ROLLBACK" };
        // dropping the connection afterwards discards anything uncommitted
        conn.execute_batch(sql)
            .map_err(|source| engine_error(sql, &[], source))
    }

    /// Insert a typed record; returns the identity the store assigned
    pub fn create<R: Record>(&self, record: &R) -> StoreResult<i64> {
        let shape = R::schema();
        if shape != self.schema {
            return Err(StoreError::ShapeMismatch {
                expected: self.schema.name,
                found: shape.name,
            });
        }
        self.create_row(&record.to_row())
    }

    /// Insert a row that must conform to the declared shape
    pub fn create_row(&self, row: &Row) -> StoreResult<i64> {
        let conn = self.connection()?;
        self.schema.conform(row)?;

        let columns: Vec<&str> = row.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let values: Vec<Value> = row.iter().map(|(_, v)| v.clone()).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        self.execute(&sql, &values)?;
        Ok(conn.last_insert_rowid())
    }

    /// Run a read built from `criteria`
    pub fn read(&self, criteria: &QueryBuilder) -> StoreResult<Vec<Row>> {
        self.connection()?;
        let (sql, params) = criteria.build(&self.table, QueryKind::Read)?;
        self.query(&sql, &params)
    }

    /// Set exactly the supplied columns of row `id`
    pub fn update(&self, id: i64, updates: &Row) -> StoreResult<usize> {
        self.connection()?;
        if updates.is_empty() {
            return Ok(0);
        }
        for (column, value) in updates.iter() {
            self.schema.check(column, value)?;
        }

        let set_clause: Vec<String> = updates.columns().map(|c| format!("{c} = ?")).collect();
        let mut values: Vec<Value> = updates.iter().map(|(_, v)| v.clone()).collect();
        values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            set_clause.join(", "),
            ID_COLUMN
        );
        self.execute(&sql, &values)
    }

    /// Run a delete built from `criteria`; returns rows removed
    pub fn delete(&self, criteria: &QueryBuilder) -> StoreResult<usize> {
        self.connection()?;
        let (sql, params) = criteria.build(&self.table, QueryKind::Delete)?;
        self.execute(&sql, &params)
    }

    fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::OutsideScope)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StoreResult<usize> {
        let conn = self.connection()?;
        let bound = bind(params)?;
        conn.execute(sql, params_from_iter(bound.iter()))
            .map_err(|source| engine_error(sql, params, source))
    }

    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>> {
        let conn = self.connection()?;
        let bound = bind(params)?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|source| engine_error(sql, params, source))?;
        let names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        let rows = stmt
            .query_map(params_from_iter(bound.iter()), |raw| {
                let mut row = Row::new();
                for (idx, name) in names.iter().enumerate() {
                    row.set(name.as_str(), Value::from_sql(raw.get_ref(idx)?));
                }
                Ok(row)
            })
            .and_then(|mapped| mapped.collect::<Result<Vec<_>, _>>())
            .map_err(|source| engine_error(sql, params, source))?;

        Ok(rows)
    }
}

fn bind(params: &[Value]) -> StoreResult<Vec<SqlValue>> {
    params
        .iter()
        .map(|p| p.to_sql().map_err(StoreError::from))
        .collect()
}

fn engine_error(sql: &str, params: &[Value], source: rusqlite::Error) -> StoreError {
    error!(sql, params = ?params, error = %source, "record store statement failed");
    StoreError::Engine {
        sql: sql.to_string(),
        source,
    }
}
