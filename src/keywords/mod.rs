//! Keyword module - rank what performed, generate what comes next
//!
//! - [`ranking`]: per-dimension keyword tallies and their merge
//! - [`generator`]: reads history from the record store and drives a strategy
//! - [`word_vectors`], [`huggingface`]: concrete generation strategies
//!
//! # Example
//!
//! ```no_run
//! use reelcast::keywords::{KeywordGenerator, WordVectorStrategy};
//! use reelcast::db::RecordStore;
//! use reelcast::storage::EngagementRecord;
//! use std::path::Path;
//!
//! let mut store = RecordStore::for_record::<EngagementRecord, _>("reelcast.db");
//! let expander = WordVectorStrategy::load(Path::new("vectors.txt"));
//! let generator = KeywordGenerator::new(Box::new(expander));
//! let keywords = generator.generate_keywords(&mut store, 10, 10)?;
//! println!("{}", keywords.join(", "));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod generator;
pub mod huggingface;
pub mod ranking;
pub mod strategy;
pub mod word_vectors;

pub use generator::{ContentBrief, KeywordGenerator, LengthBounds};
pub use huggingface::HuggingFaceStrategy;
pub use ranking::{rank_keywords, KeywordFrequency};
pub use strategy::{KeywordExpander, TextStrategy};
pub use word_vectors::{cosine_similarity, WordVectorStrategy, WordVectors};
