//! Keyword generator: rank history, then expand
//!
//! Ranking reads the top records per engagement dimension (each read in its
//! own store scope), tallies their keywords and merges the tallies. The
//! ranked list seeds a [`KeywordExpander`]; with a [`TextStrategy`] attached
//! the expanded keywords are also turned into a title and a description.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::ranking::{rank_keywords, KeywordFrequency};
use super::strategy::{KeywordExpander, TextStrategy};
use crate::config::GenerationSection;
use crate::db::{OrderDirection, QueryBuilder, RecordStore};
use crate::storage::{Dimension, EngagementRecord};

/// Length limits handed to the text strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub title_min: usize,
    pub title_max: usize,
    pub description_min: usize,
    pub description_max: usize,
}

impl From<&GenerationSection> for LengthBounds {
    fn from(section: &GenerationSection) -> Self {
        Self {
            title_min: section.title_min_length,
            title_max: section.title_max_length,
            description_min: section.description_min_length,
            description_max: section.description_max_length,
        }
    }
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self::from(&GenerationSection::default())
    }
}

/// Title, description and keywords for the next video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBrief {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

pub struct KeywordGenerator {
    expander: Box<dyn KeywordExpander>,
    writer: Option<Box<dyn TextStrategy>>,
    bounds: LengthBounds,
}

impl KeywordGenerator {
    /// Keyword-only generator
    pub fn new(expander: Box<dyn KeywordExpander>) -> Self {
        Self {
            expander,
            writer: None,
            bounds: LengthBounds::default(),
        }
    }

    /// Generator that also writes titles and descriptions
    pub fn with_writer(
        expander: Box<dyn KeywordExpander>,
        writer: Box<dyn TextStrategy>,
        bounds: LengthBounds,
    ) -> Self {
        Self {
            expander,
            writer: Some(writer),
            bounds,
        }
    }

    /// Keywords of the top `num_top_videos` records per dimension, ranked
    /// by summed occurrence count
    pub fn get_top_keywords(
        &self,
        store: &mut RecordStore,
        num_top_videos: usize,
    ) -> Result<Vec<String>> {
        let mut maps = Vec::with_capacity(Dimension::ALL.len());
        for dimension in Dimension::ALL {
            maps.push(top_records_keywords(store, dimension, num_top_videos)?);
        }
        let ranked = rank_keywords(maps);
        debug!(count = ranked.len(), "ranked keywords");
        Ok(ranked)
    }

    /// New keywords expanded from the ranked history
    pub fn generate_keywords(
        &self,
        store: &mut RecordStore,
        num_new_keywords: usize,
        num_top_videos: usize,
    ) -> Result<Vec<String>> {
        let top = self.get_top_keywords(store, num_top_videos)?;
        Ok(self.expander.generate_keywords(&top, num_new_keywords))
    }

    /// Keywords plus generated title and description.
    ///
    /// Words of a non-empty `prompt` are placed ahead of the ranked history
    /// before expansion.
    pub fn generate_description(
        &self,
        store: &mut RecordStore,
        num_new_keywords: usize,
        num_top_videos: usize,
        prompt: &str,
    ) -> Result<ContentBrief> {
        let mut seeds: Vec<String> = prompt.split_whitespace().map(str::to_string).collect();
        seeds.extend(self.get_top_keywords(store, num_top_videos)?);
        if seeds.is_empty() {
            warn!("no history and no prompt; keyword expansion has nothing to start from");
        }

        let keywords = self.expander.generate_keywords(&seeds, num_new_keywords);

        let (title, description) = match &self.writer {
            Some(writer) => {
                let b = self.bounds;
                (
                    writer.generate(&keywords, b.title_min, b.title_max),
                    writer.generate(&keywords, b.description_min, b.description_max),
                )
            }
            None => {
                warn!("no text strategy configured; using keywords as title and description");
                let joined = keywords.join(" ");
                (joined.clone(), joined)
            }
        };

        info!(keywords = keywords.len(), title = %title, "generated content brief");
        Ok(ContentBrief {
            title,
            description,
            keywords,
        })
    }
}

/// Frequency map over the keyword lists of the top records by `dimension`
fn top_records_keywords(
    store: &mut RecordStore,
    dimension: Dimension,
    num_records: usize,
) -> Result<KeywordFrequency> {
    let criteria = QueryBuilder::new()
        .select_columns("keywords")
        .order_by(dimension.column(), OrderDirection::Descending)
        .limit(num_records);

    let rows = store.scope(|db| db.read(&criteria))?;
    let records = rows
        .iter()
        .map(EngagementRecord::from_row)
        .collect::<Result<Vec<_>>>()?;

    Ok(KeywordFrequency::from_keyword_lists(
        records.iter().map(|r| r.keywords.as_slice()),
    ))
}
