//! Platforms module - publishing and engagement metrics
//!
//! Each platform is a [`PlatformBridge`]. [`PlatformsFacade`] fans a publish
//! out to every bridge and sums metrics back in. Bridges signal failure with
//! `None`; they do not return errors.

mod youtube;

pub use youtube::YoutubeBridge;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Engagement counters reported by a platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
}

impl Engagement {
    pub fn new(views: i64, likes: i64, comments: i64) -> Self {
        Self {
            views,
            likes,
            comments,
        }
    }

    pub fn add(&mut self, other: &Engagement) {
        self.views += other.views;
        self.likes += other.likes;
        self.comments += other.comments;
    }
}

pub trait PlatformBridge: Send + Sync {
    /// Platform name for logs
    fn name(&self) -> &str;

    /// Upload a video; the public URL on success
    fn publish_video(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Option<String>;

    /// Current counters for a URL this bridge published
    fn get_engagement_metrics(&self, url: &str) -> Option<Engagement>;

    /// True if `url` points at this platform
    fn owns_url(&self, url: &str) -> bool;
}

/// All configured platforms behind one interface
#[derive(Default)]
pub struct PlatformsFacade {
    bridges: Vec<Box<dyn PlatformBridge>>,
}

impl PlatformsFacade {
    pub fn new(bridges: Vec<Box<dyn PlatformBridge>>) -> Self {
        Self { bridges }
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    /// Publish to every bridge; URLs of the ones that accepted, in bridge order
    pub fn publish_to_all(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Vec<String> {
        let mut urls = Vec::with_capacity(self.bridges.len());
        for bridge in &self.bridges {
            info!(platform = bridge.name(), title = %title, "publishing video");
            match bridge.publish_video(path, title, description, tags) {
                Some(url) => urls.push(url),
                None => warn!(platform = bridge.name(), "publish failed"),
            }
        }
        urls
    }

    /// Metrics summed over `urls`; each URL is asked of the bridge that owns it
    pub fn get_engagement_metrics_all(&self, urls: &[String]) -> Engagement {
        let mut total = Engagement::default();
        for url in urls {
            let Some(bridge) = self.bridges.iter().find(|b| b.owns_url(url)) else {
                warn!(url = %url, "no platform owns url");
                continue;
            };
            if let Some(engagement) = bridge.get_engagement_metrics(url) {
                total.add(&engagement);
            }
        }
        total
    }
}
