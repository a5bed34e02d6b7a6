pub mod config;
pub mod db;
pub mod keywords;
pub mod logging;
pub mod pipeline;
pub mod platforms;
pub mod storage;
pub mod video;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{QueryBuilder, RecordStore};
pub use pipeline::{PipelineError, VideoAnalytics};
pub use storage::EngagementRecord;
