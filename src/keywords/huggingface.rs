//! Title/description generation through a hosted text2text model
//!
//! Posts the keywords, space-joined, to the inference endpoint of the
//! configured model. Any failure is logged and produces empty text.

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

use super::strategy::TextStrategy;
use crate::config::{self, KeywordsSection};

#[derive(Debug, Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: usize,
    min_length: usize,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

pub struct HuggingFaceStrategy {
    http: HttpClient,
    url: String,
    token: Option<String>,
}

impl HuggingFaceStrategy {
    pub fn new(settings: &KeywordsSection) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        let token = config::secret(&settings.api_token_env);
        if token.is_none() {
            error!(
                env = %settings.api_token_env,
                "text generation token not set; descriptions will be empty"
            );
        }

        Ok(Self {
            http,
            url: model_url(&settings.api_base, &settings.text_model),
            token,
        })
    }

    fn request(&self, keywords: &[String], min_length: usize, max_length: usize) -> Result<String> {
        let token = self
            .token
            .as_deref()
            .context("text generation model unavailable")?;

        let body = GenerationRequest {
            inputs: keywords.join(" "),
            parameters: GenerationParameters {
                max_new_tokens: max_length,
                min_length,
            },
            options: GenerationOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .with_context(|| format!("Failed to reach {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            anyhow::bail!("text generation failed ({}): {}", status, text);
        }

        let generated: Vec<GeneratedText> = response
            .json()
            .context("Failed to parse text generation response")?;
        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .context("text generation returned no candidates")
    }
}

impl TextStrategy for HuggingFaceStrategy {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn generate(&self, keywords: &[String], min_length: usize, max_length: usize) -> String {
        if keywords.is_empty() {
            warn!("no keywords to generate from");
            return String::new();
        }
        match self.request(keywords, min_length, max_length) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "text generation failed");
                String::new()
            }
        }
    }
}

fn model_url(base: &str, model: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), model)
}
