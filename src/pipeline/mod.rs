//! Pipeline module - the generate, publish, persist cycle
//!
//! [`VideoAnalytics::generate_video`] runs four stages in order and aborts
//! on the first failure:
//!
//! 1. content brief from keyword history (plus an optional prompt)
//! 2. video synthesis from the description
//! 3. publish to every platform; at least one must accept
//! 4. persist an [`EngagementRecord`] with zeroed counters
//!
//! Nothing is written to the store unless all four stages run, so a failed
//! cycle leaves no record behind. [`VideoAnalytics::update_video_metrics`]
//! is the separate refresh of stored counters from the platforms.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{OrderDirection, QueryBuilder, RecordStore, Row, StoreError};
use crate::keywords::KeywordGenerator;
use crate::platforms::PlatformsFacade;
use crate::storage::{Dimension, EngagementRecord};
use crate::video::VideoSynthesizer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Video generation failed")]
    GenerationFailed,

    #[error("Video publishing failed")]
    PublishingFailed,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored row could not be decoded
    #[error("failed to decode engagement record: {0}")]
    Decode(anyhow::Error),
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StoreError>() {
            Ok(store) => Self::Store(store),
            Err(other) => Self::Decode(other),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Content orchestrator over the store and the external collaborators
pub struct VideoAnalytics {
    store: RecordStore,
    generator: KeywordGenerator,
    video: Box<dyn VideoSynthesizer>,
    platforms: PlatformsFacade,
    num_keywords: usize,
}

impl VideoAnalytics {
    pub fn new(
        store: RecordStore,
        generator: KeywordGenerator,
        video: Box<dyn VideoSynthesizer>,
        platforms: PlatformsFacade,
        num_keywords: usize,
    ) -> Self {
        Self {
            store,
            generator,
            video,
            platforms,
            num_keywords,
        }
    }

    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// Generate, publish and record one video. Returns the stored record.
    pub fn generate_video(
        &mut self,
        num_top_videos: usize,
        prompt: &str,
    ) -> PipelineResult<EngagementRecord> {
        let brief = self.generator.generate_description(
            &mut self.store,
            self.num_keywords,
            num_top_videos,
            prompt,
        )?;

        let Some(video_path) = self.video.create_video(&brief.description) else {
            return Err(PipelineError::GenerationFailed);
        };

        let urls = self.platforms.publish_to_all(
            &video_path,
            &brief.title,
            &brief.description,
            &brief.keywords,
        );
        // the file is no longer needed whatever the outcome
        self.video.delete_local_video(&video_path);

        if urls.is_empty() {
            return Err(PipelineError::PublishingFailed);
        }
        if urls.len() < self.platforms.len() {
            warn!(
                published = urls.len(),
                platforms = self.platforms.len(),
                "video published to some platforms only"
            );
        }

        let mut record =
            EngagementRecord::published(brief.title, brief.description, brief.keywords, urls);
        let id = self
            .store
            .scope(|db| db.create(&record).map_err(PipelineError::from))?;
        record.id = Some(id);

        info!(id, title = %record.title, urls = record.urls.len(), "video recorded");
        Ok(record)
    }

    /// Refresh counters of the `top_n` most viewed records from the platforms.
    ///
    /// Platform counts are cumulative, so the stored counters are replaced
    /// by the summed totals. Returns how many records were updated.
    pub fn update_video_metrics(&mut self, top_n: usize) -> PipelineResult<usize> {
        let criteria = QueryBuilder::new()
            .select_columns(["id", "urls"])
            .order_by(Dimension::Views.column(), OrderDirection::Descending)
            .limit(top_n);

        let rows = self
            .store
            .scope(|db| db.read(&criteria).map_err(PipelineError::from))?;
        let records = rows
            .iter()
            .map(EngagementRecord::from_row)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(PipelineError::Decode)?;

        // platform calls happen outside any transaction
        let mut updates: Vec<(i64, Row)> = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = record.id else { continue };
            if record.urls.is_empty() {
                debug!(id, "record has no urls; skipping");
                continue;
            }
            let totals = self.platforms.get_engagement_metrics_all(&record.urls);
            debug!(
                id,
                views = totals.views,
                likes = totals.likes,
                comments = totals.comments,
                "fetched metrics"
            );
            updates.push((
                id,
                Row::new()
                    .with("views", totals.views)
                    .with("likes", totals.likes)
                    .with("comments", totals.comments),
            ));
        }

        let updated = self.store.scope(|db| {
            for (id, row) in &updates {
                db.update(*id, row)?;
            }
            Ok::<_, PipelineError>(updates.len())
        })?;

        info!(updated, "engagement metrics refreshed");
        Ok(updated)
    }
}
