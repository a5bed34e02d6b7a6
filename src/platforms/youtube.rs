//! YouTube Data API v3 bridge
//!
//! Uploads use the resumable protocol: a metadata POST opens a session, the
//! file bytes go to the returned `Location` in one PUT. The OAuth access
//! token is read from the configured environment variable; obtaining it is
//! left to the operator.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::LOCATION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{Engagement, PlatformBridge};
use crate::config::{self, YoutubeSection};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";
const WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Serialize)]
struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: Status<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    category_id: &'a str,
    tags: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status<'a> {
    privacy_status: &'a str,
    notify_subscribers: bool,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    statistics: Statistics,
}

/// Counters arrive as decimal strings and may be hidden
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

impl Statistics {
    fn engagement(&self) -> Engagement {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0)
        };
        Engagement::new(
            parse(&self.view_count),
            parse(&self.like_count),
            parse(&self.comment_count),
        )
    }
}

pub struct YoutubeBridge {
    http: HttpClient,
    settings: YoutubeSection,
    token: Option<String>,
}

impl YoutubeBridge {
    pub fn new(settings: YoutubeSection) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .context("Failed to create HTTP client")?;

        let token = config::secret(&settings.access_token_env);
        if token.is_none() {
            error!(
                env = %settings.access_token_env,
                "YouTube access token not set; uploads will fail"
            );
        }

        Ok(Self {
            http,
            settings,
            token,
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("YouTube access token unavailable")
    }

    fn upload(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Result<String> {
        if !path.is_file() {
            bail!("File not found: {}", path.display());
        }
        let token = self.token()?;
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        let metadata = VideoResource {
            snippet: Snippet {
                title,
                description,
                category_id: &self.settings.category_id,
                tags,
            },
            status: Status {
                privacy_status: &self.settings.privacy_status,
                notify_subscribers: true,
            },
        };

        let session = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .header("X-Upload-Content-Type", "video/*")
            .header("X-Upload-Content-Length", bytes.len().to_string())
            .json(&metadata)
            .send()
            .context("Failed to open upload session")?;

        if !session.status().is_success() {
            let status = session.status();
            let text = session.text().unwrap_or_default();
            bail!("upload session rejected ({}): {}", status, text);
        }
        let location = session
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .context("upload session returned no location")?
            .to_string();

        let response = self
            .http
            .put(&location)
            .bearer_auth(token)
            .header("Content-Type", "video/*")
            .body(bytes)
            .send()
            .context("Failed to upload video bytes")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            bail!("video upload failed ({}): {}", status, text);
        }
        let video: UploadedVideo = response.json().context("Failed to parse upload response")?;
        Ok(watch_url(&video.id))
    }

    fn statistics(&self, url: &str) -> Result<Option<Engagement>> {
        let id = video_id(url).with_context(|| format!("Not a YouTube watch URL: {}", url))?;
        let token = self.token()?;

        let response = self
            .http
            .get(format!("{}/videos", API_BASE))
            .bearer_auth(token)
            .query(&[("part", "statistics"), ("id", id)])
            .send()
            .context("Failed to fetch video statistics")?;

        if !response.status().is_success() {
            bail!("statistics request failed: {}", response.status());
        }
        let list: VideoList = response.json().context("Failed to parse statistics")?;
        Ok(list.items.first().map(|item| item.statistics.engagement()))
    }
}

impl PlatformBridge for YoutubeBridge {
    fn name(&self) -> &str {
        "youtube"
    }

    fn publish_video(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Option<String> {
        match self.upload(path, title, description, tags) {
            Ok(url) => {
                info!(url = %url, "published to YouTube");
                Some(url)
            }
            Err(e) => {
                error!(error = %e, "YouTube publish failed");
                None
            }
        }
    }

    fn get_engagement_metrics(&self, url: &str) -> Option<Engagement> {
        match self.statistics(url) {
            Ok(Some(engagement)) => Some(engagement),
            Ok(None) => {
                warn!(url = %url, "no YouTube video found");
                None
            }
            Err(e) => {
                error!(url = %url, error = %e, "YouTube statistics failed");
                None
            }
        }
    }

    fn owns_url(&self, url: &str) -> bool {
        video_id(url).is_some()
    }
}

fn watch_url(id: &str) -> String {
    format!("{}{}", WATCH_PREFIX, id)
}

fn video_id(url: &str) -> Option<&str> {
    url.strip_prefix(WATCH_PREFIX).filter(|id| !id.is_empty())
}
