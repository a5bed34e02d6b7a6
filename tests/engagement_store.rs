//! Integration tests for the engagement record store

use chrono::{TimeZone, Utc};
use reelcast::db::{
    Comparison, Logical, OrderDirection, QueryBuilder, RecordStore, Row, StoreError,
};
use reelcast::storage::EngagementRecord;
use tempfile::TempDir;

fn record(title: &str, views: i64, keywords: &[&str]) -> EngagementRecord {
    EngagementRecord {
        id: None,
        published_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 15).unwrap()),
        title: title.to_string(),
        description: format!("about {}", title),
        urls: vec![format!("https://www.youtube.com/watch?v={}", title)],
        views,
        likes: views / 10,
        comments: views / 100,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn store() -> (TempDir, RecordStore) {
    let tmp = TempDir::new().unwrap();
    let store = RecordStore::for_record::<EngagementRecord, _>(tmp.path().join("engagement.db"));
    (tmp, store)
}

#[test]
fn test_record_round_trip() {
    let (_tmp, mut store) = store();
    let original = record("intro", 3000, &["python", "python", "maximum"]);

    let rows = store
        .scope(|db| {
            db.create(&original)?;
            db.read(&QueryBuilder::new())
        })
        .unwrap();

    assert_eq!(store.table_name(), "videoengagementrecords");
    let loaded = EngagementRecord::from_row(&rows[0]).unwrap();
    assert_eq!(loaded.id, Some(1));
    assert_eq!(loaded.published_at, original.published_at);
    assert_eq!(loaded.keywords, original.keywords);
    assert_eq!(loaded.urls, original.urls);
    assert_eq!((loaded.views, loaded.likes, loaded.comments), (3000, 300, 30));
}

#[test]
fn test_failed_scope_leaves_nothing() {
    let (_tmp, mut store) = store();

    let result: anyhow::Result<()> = store.scope(|db| {
        db.create(&record("doomed", 1, &["x"]))?;
        anyhow::bail!("publish stage failed")
    });
    assert!(result.is_err());

    let rows = store.scope(|db| db.read(&QueryBuilder::new())).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_top_by_views_projection() {
    let (_tmp, mut store) = store();
    let rows = store
        .scope(|db| {
            for (title, views) in [("low", 10), ("high", 5000), ("mid", 700)] {
                db.create(&record(title, views, &[title]))?;
            }
            db.read(
                &QueryBuilder::new()
                    .select_columns("keywords")
                    .order_by("views", OrderDirection::Descending)
                    .limit(2),
            )
        })
        .unwrap();

    let keywords: Vec<Vec<String>> = rows
        .iter()
        .map(|r| EngagementRecord::from_row(r).unwrap().keywords)
        .collect();
    assert_eq!(keywords, vec![vec!["high"], vec!["mid"]]);
    // projected reads carry no counters
    assert_eq!(EngagementRecord::from_row(&rows[0]).unwrap().views, -1);
}

#[test]
fn test_update_and_delete() {
    let (_tmp, mut store) = store();
    let remaining = store
        .scope(|db| {
            let keep = db.create(&record("keep", 100, &["a"]))?;
            db.create(&record("drop", 5, &["b"]))?;

            db.update(keep, &Row::new().with("views", 3000))?;
            db.delete(
                &QueryBuilder::new()
                    .where_compare("views", Comparison::LessThan, 10)
                    .where_logical(Logical::Or)
                    .where_compare("title", Comparison::Equal, "nothing"),
            )?;
            db.read(&QueryBuilder::new())
        })
        .unwrap();

    assert_eq!(remaining.len(), 1);
    let kept = EngagementRecord::from_row(&remaining[0]).unwrap();
    assert_eq!(kept.title, "keep");
    assert_eq!(kept.views, 3000);
    assert_eq!(kept.likes, 10);
}

#[test]
fn test_usage_errors() {
    let (_tmp, mut store) = store();
    assert!(matches!(
        store.create(&record("early", 1, &[])),
        Err(StoreError::OutsideScope)
    ));

    let err = store
        .scope(|db| {
            db.read(
                &QueryBuilder::new()
                    .where_compare("views", Comparison::Equal, 1)
                    .where_compare("likes", Comparison::Equal, 2),
            )
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::MalformedWhere { .. }));
    assert!(err.is_usage());
}
