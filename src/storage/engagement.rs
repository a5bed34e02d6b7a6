//! Engagement record: one published video and its metrics
//!
//! The store hands back encoded text for `urls`, `keywords` and
//! `published_at`; [`EngagementRecord::from_row`] decodes them. Columns
//! missing from a projected read fall back to empty values and
//! [`UNSET_COUNT`] for metrics.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{decode_list, decode_timestamp, Field, FieldType, Record, Row, Schema, Value};

/// Metric value meaning "not known" (0 means a known zero)
pub const UNSET_COUNT: i64 = -1;

const FIELDS: &[Field] = &[
    Field::new("published_at", FieldType::Timestamp),
    Field::new("title", FieldType::Text),
    Field::new("description", FieldType::Text),
    Field::new("urls", FieldType::TextList),
    Field::new("views", FieldType::Integer),
    Field::new("likes", FieldType::Integer),
    Field::new("comments", FieldType::Integer),
    Field::new("keywords", FieldType::TextList),
];

/// Persisted shape; table `videoengagementrecords`
pub static ENGAGEMENT_SCHEMA: Schema = Schema::new("VideoEngagementRecord", FIELDS);

/// Engagement dimension used for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Views,
    Likes,
    Comments,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Views, Self::Likes, Self::Comments];

    /// Column holding this dimension's counter
    pub fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementRecord {
    /// Assigned by the store on first create
    pub id: Option<i64>,
    /// Absent for drafts
    pub published_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    /// One URL per platform that accepted the upload
    pub urls: Vec<String>,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    /// Insertion order; duplicates carry weight
    pub keywords: Vec<String>,
}

impl EngagementRecord {
    /// Freshly published video with zeroed counters and no identity
    pub fn published(
        title: impl Into<String>,
        description: impl Into<String>,
        keywords: Vec<String>,
        urls: Vec<String>,
    ) -> Self {
        Self {
            id: None,
            published_at: Some(Utc::now()),
            title: title.into(),
            description: description.into(),
            urls,
            views: 0,
            likes: 0,
            comments: 0,
            keywords,
        }
    }

    pub fn count(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Views => self.views,
            Dimension::Likes => self.likes,
            Dimension::Comments => self.comments,
        }
    }

    /// Decode a row read from the store
    pub fn from_row(row: &Row) -> Result<Self> {
        let urls = match row.text("urls") {
            Some(text) => decode_list(text).context("Failed to decode urls column")?,
            None => Vec::new(),
        };
        let keywords = match row.text("keywords") {
            Some(text) => decode_list(text).context("Failed to decode keywords column")?,
            None => Vec::new(),
        };
        let published_at = match row.text("published_at") {
            Some(text) => Some(
                decode_timestamp(text)
                    .with_context(|| format!("Failed to decode timestamp '{}'", text))?,
            ),
            None => None,
        };

        Ok(Self {
            id: row.id(),
            published_at,
            title: row.text("title").unwrap_or_default().to_string(),
            description: row.text("description").unwrap_or_default().to_string(),
            urls,
            views: row.integer("views").unwrap_or(UNSET_COUNT),
            likes: row.integer("likes").unwrap_or(UNSET_COUNT),
            comments: row.integer("comments").unwrap_or(UNSET_COUNT),
            keywords,
        })
    }
}

impl Record for EngagementRecord {
    fn schema() -> &'static Schema {
        &ENGAGEMENT_SCHEMA
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("published_at", self.published_at.map(Value::Timestamp))
            .with("title", self.title.as_str())
            .with("description", self.description.as_str())
            .with("urls", self.urls.clone())
            .with("views", self.views)
            .with("likes", self.likes)
            .with("comments", self.comments)
            .with("keywords", self.keywords.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{QueryBuilder, RecordStore};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample() -> EngagementRecord {
        EngagementRecord {
            id: None,
            published_at: Some(Utc.with_ymd_and_hms(2025, 11, 25, 12, 0, 0).unwrap()),
            title: "Test Video A".to_string(),
            description: "A short description.".to_string(),
            urls: vec!["url_a1".to_string(), "url_a2".to_string()],
            views: 1000,
            likes: 50,
            comments: 5,
            keywords: vec!["tutorial".into(), "python".into(), "python".into()],
        }
    }

    #[test]
    fn test_table_name() {
        assert_eq!(ENGAGEMENT_SCHEMA.table_name(), "videoengagementrecords");
    }

    #[test]
    fn test_row_conforms_to_schema() {
        assert!(ENGAGEMENT_SCHEMA.conform(&sample().to_row()).is_ok());

        let mut draft = sample();
        draft.published_at = None;
        assert!(ENGAGEMENT_SCHEMA.conform(&draft.to_row()).is_ok());
    }

    #[test]
    fn test_round_trip_through_store() {
        let tmp = TempDir::new().unwrap();
        let mut store = RecordStore::for_record::<EngagementRecord, _>(tmp.path().join("v.db"));
        let record = sample();

        let rows = store
            .scope(|db| {
                db.create(&record)?;
                db.read(&QueryBuilder::new())
            })
            .unwrap();

        let back = EngagementRecord::from_row(&rows[0]).unwrap();
        assert_eq!(back.id, Some(1));
        assert_eq!(back, EngagementRecord { id: Some(1), ..record });
    }

    #[test]
    fn test_projection_leaves_unset_counts() {
        let row = Row::new().with("keywords", r#"["a","a"]"#);
        let record = EngagementRecord::from_row(&row).unwrap();
        assert_eq!(record.keywords, vec!["a", "a"]);
        assert_eq!(record.views, UNSET_COUNT);
        assert_eq!(record.count(Dimension::Comments), UNSET_COUNT);
        assert!(record.id.is_none());
        assert!(record.published_at.is_none());
    }

    #[test]
    fn test_bad_keyword_text_is_an_error() {
        let row = Row::new().with("keywords", "not json");
        assert!(EngagementRecord::from_row(&row).is_err());
    }

    #[test]
    fn test_published_starts_at_zero() {
        let record = EngagementRecord::published("t", "d", vec![], vec!["u".into()]);
        assert_eq!((record.views, record.likes, record.comments), (0, 0, 0));
        assert!(record.id.is_none());
        assert!(record.published_at.is_some());
    }
}
