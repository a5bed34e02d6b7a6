//! Builds the store, generator and collaborators from config

use anyhow::{Context, Result};
use std::fs;
use tracing::warn;

use reelcast::config::AppConfig;
use reelcast::db::RecordStore;
use reelcast::keywords::{HuggingFaceStrategy, KeywordGenerator, LengthBounds, WordVectorStrategy};
use reelcast::platforms::{PlatformBridge, PlatformsFacade, YoutubeBridge};
use reelcast::storage::EngagementRecord;
use reelcast::video::GeminiVideoClient;
use reelcast::VideoAnalytics;

/// Engagement store at the configured path; parent directory is created
pub fn open_store(config: &AppConfig) -> Result<RecordStore> {
    let path = &config.database.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(RecordStore::for_record::<EngagementRecord, _>(path))
}

/// Word-vector expansion only
pub fn keyword_generator(config: &AppConfig) -> KeywordGenerator {
    let expander = WordVectorStrategy::load(&config.keywords.vectors_path);
    KeywordGenerator::new(Box::new(expander))
}

/// Word-vector expansion plus hosted title/description writing
pub fn content_generator(config: &AppConfig) -> Result<KeywordGenerator> {
    let expander = WordVectorStrategy::load(&config.keywords.vectors_path);
    let writer = HuggingFaceStrategy::new(&config.keywords)?;
    Ok(KeywordGenerator::with_writer(
        Box::new(expander),
        Box::new(writer),
        LengthBounds::from(&config.generation),
    ))
}

pub fn platforms(config: &AppConfig) -> Result<PlatformsFacade> {
    let mut bridges: Vec<Box<dyn PlatformBridge>> = Vec::new();
    if config.youtube.enabled {
        bridges.push(Box::new(YoutubeBridge::new(config.youtube.clone())?));
    }
    if bridges.is_empty() {
        warn!("no platforms enabled; publishing will fail");
    }
    Ok(PlatformsFacade::new(bridges))
}

pub fn analytics(config: &AppConfig) -> Result<VideoAnalytics> {
    Ok(VideoAnalytics::new(
        open_store(config)?,
        content_generator(config)?,
        Box::new(GeminiVideoClient::new(config.video.clone())?),
        platforms(config)?,
        config.generation.num_keywords,
    ))
}
