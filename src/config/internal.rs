//! Internal implementation for config module
//!
//! Handles reelcast.toml. Secrets never live in the file; sections only
//! name the environment variables that hold them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Config Types
// =============================================================================

/// Configuration stored in reelcast.toml
/// All sections are optional with defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub video: VideoSection,
    #[serde(default)]
    pub youtube: YoutubeSection,
    #[serde(default)]
    pub keywords: KeywordsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// SQLite file holding engagement history
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("reelcast.db")
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Keywords produced per video
    #[serde(default = "default_num_keywords")]
    pub num_keywords: usize,
    /// Records read per engagement dimension when ranking keywords
    #[serde(default = "default_num_top_videos")]
    pub num_top_videos: usize,
    #[serde(default = "default_title_min")]
    pub title_min_length: usize,
    #[serde(default = "default_title_max")]
    pub title_max_length: usize,
    #[serde(default = "default_description_min")]
    pub description_min_length: usize,
    #[serde(default = "default_description_max")]
    pub description_max_length: usize,
    /// Hours between cycles of `reelcast run`
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

fn default_num_keywords() -> usize {
    10
}
fn default_num_top_videos() -> usize {
    10
}
fn default_title_min() -> usize {
    5
}
fn default_title_max() -> usize {
    20
}
fn default_description_min() -> usize {
    50
}
fn default_description_max() -> usize {
    200
}
fn default_interval_hours() -> u64 {
    24
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            num_keywords: default_num_keywords(),
            num_top_videos: default_num_top_videos(),
            title_min_length: default_title_min(),
            title_max_length: default_title_max(),
            description_min_length: default_description_min(),
            description_max_length: default_description_max(),
            interval_hours: default_interval_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSection {
    #[serde(default = "default_video_model")]
    pub model: String,
    #[serde(default = "default_gemini_base")]
    pub api_base: String,
    /// Environment variable holding the Gemini API key
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_duration")]
    pub duration_seconds: u32,
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Where synthesized videos are written before upload
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_video_model() -> String {
    "veo-2.0-generate-001".to_string()
}
fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_aspect_ratio() -> String {
    "16:9".to_string()
}
fn default_duration() -> u32 {
    8
}
fn default_poll_attempts() -> u32 {
    50
}
fn default_poll_interval() -> u64 {
    5
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            model: default_video_model(),
            api_base: default_gemini_base(),
            api_key_env: default_gemini_key_env(),
            aspect_ratio: default_aspect_ratio(),
            duration_seconds: default_duration(),
            poll_attempts: default_poll_attempts(),
            poll_interval_secs: default_poll_interval(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Environment variable holding an OAuth access token
    #[serde(default = "default_youtube_token_env")]
    pub access_token_env: String,
    /// 24 = Entertainment
    #[serde(default = "default_category")]
    pub category_id: String,
    #[serde(default = "default_privacy")]
    pub privacy_status: String,
}

fn default_true() -> bool {
    true
}
fn default_youtube_token_env() -> String {
    "YOUTUBE_ACCESS_TOKEN".to_string()
}
fn default_category() -> String {
    "24".to_string()
}
fn default_privacy() -> String {
    "public".to_string()
}

impl Default for YoutubeSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            access_token_env: default_youtube_token_env(),
            category_id: default_category(),
            privacy_status: default_privacy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsSection {
    /// Word vectors in word2vec text format
    #[serde(default = "default_vectors_path")]
    pub vectors_path: PathBuf,
    /// Hosted text2text model for titles and descriptions
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_hf_base")]
    pub api_base: String,
    #[serde(default = "default_hf_token_env")]
    pub api_token_env: String,
}

fn default_vectors_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("reelcast").join("word-vectors.txt"))
        .unwrap_or_else(|| PathBuf::from("word-vectors.txt"))
}
fn default_text_model() -> String {
    "google/flan-t5-base".to_string()
}
fn default_hf_base() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}
fn default_hf_token_env() -> String {
    "HF_API_TOKEN".to_string()
}

impl Default for KeywordsSection {
    fn default() -> Self {
        Self {
            vectors_path: default_vectors_path(),
            text_model: default_text_model(),
            api_base: default_hf_base(),
            api_token_env: default_hf_token_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

// =============================================================================
// Config Load/Save
// =============================================================================

pub const CONFIG_FILE: &str = "reelcast.toml";
pub const DB_ENV_OVERRIDE: &str = "REELCAST_DB";

/// Load config; a missing file yields defaults
pub fn load(path: &Path) -> Result<AppConfig> {
    let mut config = if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    } else {
        AppConfig::default()
    };

    if let Some(db) = read_env(DB_ENV_OVERRIDE) {
        config.database.path = PathBuf::from(db);
    }
    Ok(config)
}

/// Write config as pretty TOML, creating parent directories
pub fn save(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

/// Non-empty value of an environment variable
pub fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
