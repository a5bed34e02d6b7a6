//! Domain records persisted by reelcast
//!
//! Each record type declares its [`crate::db::Schema`] and knows how to
//! turn itself into a row and back. The generic store in [`crate::db`]
//! does the SQL.

pub mod engagement;

pub use engagement::{Dimension, EngagementRecord, ENGAGEMENT_SCHEMA, UNSET_COUNT};
