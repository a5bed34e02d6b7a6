//! Persistence layer for reelcast
//!
//! A small type-driven record store over SQLite: a static [`Schema`] declares
//! the record shape, [`RecordStore`] derives the table from it and runs
//! create/read/update/delete inside a transactional scope, and
//! [`QueryBuilder`] compiles filters, ordering and limits for reads and
//! deletes.
//!
//! # Example
//! ```no_run
//! use reelcast::db::{Comparison, QueryBuilder, RecordStore};
//! use reelcast::storage::ENGAGEMENT_SCHEMA;
//!
//! let mut store = RecordStore::new("reelcast.db", &ENGAGEMENT_SCHEMA);
//! let rows = store.scope(|db| {
//!     db.read(&QueryBuilder::new().where_compare("views", Comparison::GreaterThan, 100))
//! })?;
//! println!("{} popular videos", rows.len());
//! # Ok::<(), reelcast::db::StoreError>(())
//! ```

pub mod error;
pub mod query;
pub mod schema;
pub mod store;
pub mod value;

pub use error::{StoreError, StoreResult};
pub use query::{Comparison, IntoColumns, Logical, OrderDirection, QueryBuilder, QueryKind};
pub use schema::{Field, FieldType, Record, Schema, ID_COLUMN};
pub use store::RecordStore;
pub use value::{decode_list, decode_timestamp, encode_list, encode_timestamp, Row, Value};
