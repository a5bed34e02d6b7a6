//! Gemini video synthesis over the Generative Language REST API
//!
//! A `predictLongRunning` request starts an operation; the operation is
//! polled until done within the configured [`PollPolicy`], then the first
//! generated sample is downloaded to `<output_dir>/<uuid>.mp4`.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{PollPolicy, VideoSynthesizer};
use crate::config::{self, VideoSection};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    aspect_ratio: &'a str,
    duration_seconds: u32,
}

/// Long-running operation as returned by start and poll
#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: VideoRef,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: String,
}

impl Operation {
    /// Download URI of the first sample, once the operation has finished
    fn video_uri(&self) -> Result<Option<&str>> {
        if let Some(err) = &self.error {
            bail!("API error {}: {}", err.code, err.message);
        }
        Ok(self
            .response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .and_then(|r| r.generated_samples.first())
            .map(|s| s.video.uri.as_str()))
    }
}

pub struct GeminiVideoClient {
    http: HttpClient,
    settings: VideoSection,
    api_key: Option<String>,
}

impl GeminiVideoClient {
    pub fn new(settings: VideoSection) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        let api_key = config::secret(&settings.api_key_env);
        if api_key.is_none() {
            error!(env = %settings.api_key_env, "video API key not set; synthesis will fail");
        }

        Ok(Self {
            http,
            settings,
            api_key,
        })
    }

    fn base(&self) -> &str {
        self.settings.api_base.trim_end_matches('/')
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            self.settings.poll_attempts,
            Duration::from_secs(self.settings.poll_interval_secs),
        )
    }

    fn synthesize(&self, description: &str) -> Result<PathBuf> {
        let key = self.api_key.as_deref().context("video API key unavailable")?;

        let mut operation = self.start(key, description)?;
        info!(operation = %operation.name, "video synthesis started");

        // the start response may already be done
        let uri = self.poll_policy().run(|attempt| {
            if !operation.done {
                debug!(attempt, "polling video operation");
                operation = self.fetch_operation(key, &operation.name)?;
            }
            if !operation.done {
                return Ok(None);
            }
            match operation.video_uri()? {
                Some(uri) => Ok(Some(uri.to_string())),
                None => bail!("operation completed without a generated video"),
            }
        })?;

        self.download(key, &uri)
    }

    fn start(&self, key: &str, description: &str) -> Result<Operation> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.base(),
            self.settings.model
        );
        let body = PredictRequest {
            instances: [Instance {
                prompt: description,
            }],
            parameters: Parameters {
                aspect_ratio: &self.settings.aspect_ratio,
                duration_seconds: self.settings.duration_seconds,
            },
        };

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            bail!("video request rejected ({}): {}", status, text);
        }
        response
            .json::<Operation>()
            .context("Failed to parse video operation")
    }

    fn fetch_operation(&self, key: &str, name: &str) -> Result<Operation> {
        let url = format!("{}/{}", self.base(), name);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, key)
            .send()
            .with_context(|| format!("Failed to poll {}", url))?;

        if !response.status().is_success() {
            bail!("operation poll failed: {}", response.status());
        }
        response
            .json::<Operation>()
            .context("Failed to parse video operation")
    }

    fn download(&self, key: &str, uri: &str) -> Result<PathBuf> {
        let response = self
            .http
            .get(uri)
            .header(API_KEY_HEADER, key)
            .send()
            .context("Failed to download generated video")?;

        if !response.status().is_success() {
            bail!("video download failed: {}", response.status());
        }
        let bytes = response.bytes().context("Failed to read video body")?;

        let dir = &self.settings.output_dir;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!("{}.mp4", Uuid::new_v4()));
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl VideoSynthesizer for GeminiVideoClient {
    fn create_video(&self, description: &str) -> Option<PathBuf> {
        match self.synthesize(description) {
            Ok(path) => {
                info!(path = %path.display(), "video synthesized");
                Some(path)
            }
            Err(e) => {
                error!(error = %e, "video synthesis failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(json: &str) -> Operation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = PredictRequest {
            instances: [Instance { prompt: "a cat" }],
            parameters: Parameters {
                aspect_ratio: "16:9",
                duration_seconds: 8,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "a cat");
        assert_eq!(json["parameters"]["aspectRatio"], "16:9");
        assert_eq!(json["parameters"]["durationSeconds"], 8);
    }

    #[test]
    fn test_pending_operation() {
        let op = operation(r#"{"name": "models/veo/operations/abc"}"#);
        assert!(!op.done);
        assert_eq!(op.video_uri().unwrap(), None);
    }

    #[test]
    fn test_finished_operation_uri() {
        let op = operation(
            r#"{
                "name": "models/veo/operations/abc",
                "done": true,
                "response": {
                    "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                    "generateVideoResponse": {
                        "generatedSamples": [
                            {"video": {"uri": "https://example.test/files/1:download"}},
                            {"video": {"uri": "https://example.test/files/2:download"}}
                        ]
                    }
                }
            }"#,
        );
        assert_eq!(
            op.video_uri().unwrap(),
            Some("https://example.test/files/1:download")
        );
    }

    #[test]
    fn test_operation_error() {
        let op = operation(
            r#"{"name": "x", "done": true, "error": {"code": 400, "message": "blocked"}}"#,
        );
        let err = op.video_uri().unwrap_err().to_string();
        assert!(err.contains("400"));
        assert!(err.contains("blocked"));
    }

    #[test]
    fn test_missing_key_yields_none() {
        let settings = VideoSection {
            api_key_env: "REELCAST_TEST_UNSET_VIDEO_KEY".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = GeminiVideoClient::new(settings).unwrap();
        assert!(client.create_video("a cat").is_none());
    }
}
