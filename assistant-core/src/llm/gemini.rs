use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ModelError, truncate_body};

use super::{GenerationOptions, LanguageModel};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for Gemini")?;

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn build_request<'a>(prompt: &'a str, options: &'a GenerationOptions) -> GenerateRequest<'a> {
    GenerateRequest {
        system_instruction: options.system_instruction.as_deref().map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        }),
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: options.max_output_tokens,
            temperature: options.temperature,
        },
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ModelError::NoCandidates)?;

    let text = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
        .unwrap_or_default();

    // A blocked or part-less candidate carries no text.
    if text.trim().is_empty() {
        return Err(ModelError::EmptyOutput);
    }

    Ok(text)
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ModelError> {
        let body = build_request(prompt, options);

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            warn!(%status, model = %self.model, "Gemini request failed");
            return Err(ModelError::Status {
                code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;

        let text = extract_text(parsed)?;
        debug!(model = %self.model, chars = text.len(), "Gemini response received");
        Ok(text)
    }
}
