//! Config module - reelcast.toml
//!
//! Database location, generation limits, and the settings of each external
//! collaborator. `REELCAST_DB` overrides the database path.
//!
//! # Example
//!
//! ```no_run
//! use reelcast::config;
//! use std::path::Path;
//!
//! let config = config::load(Path::new("reelcast.toml"))?;
//! println!("Database: {}", config.database.path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use internal::{
    AppConfig, DatabaseSection, GenerationSection, KeywordsSection, LoggingSection,
    VideoSection, YoutubeSection, CONFIG_FILE, DB_ENV_OVERRIDE,
};

/// Load config from `path`; returns defaults if the file doesn't exist
pub fn load(path: &Path) -> Result<AppConfig> {
    internal::load(path)
}

/// Save config to `path`
pub fn save(path: &Path, config: &AppConfig) -> Result<()> {
    internal::save(path, config)
}

/// Default config location (current directory)
pub fn default_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Read a secret from the named environment variable
///
/// Returns None when unset or blank.
pub fn secret(env_name: &str) -> Option<String> {
    internal::read_env(env_name)
}
