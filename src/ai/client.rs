//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Uses blocking reqwest; calls run on background threads owned by the
//! dispatcher, never on the UI thread.

use std::time::Duration;

use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};

use super::image::ReceiptImage;
use super::{AiError, AiResult};
use crate::config::AiSettings;

/// Longest error body kept from a failed API response.
const MAX_ERROR_BODY: usize = 300;

/// A hosted text/vision generation backend.
pub trait GenerativeClient: Send + Sync {
    /// Generate free text for a prompt.
    fn generate_text(&self, prompt: &str) -> AiResult<String>;

    /// Generate a JSON document matching `schema` from an image and an
    /// instruction. Returns the raw response text.
    fn generate_structured(
        &self,
        image: &ReceiptImage,
        instruction: &str,
        schema: &Value,
    ) -> AiResult<String>;
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &AiSettings, api_key: String) -> AiResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AiError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn generate(&self, body: &Value) -> AiResult<String> {
        debug!("POST {}", self.url());
        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().unwrap_or_default();
            return Err(AiError::Api {
                status,
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .map_err(|e| AiError::Decode(format!("Failed to parse Gemini response: {}", e)))?;

        parsed.text().ok_or(AiError::EmptyResponse)
    }
}

impl GenerativeClient for GeminiClient {
    fn generate_text(&self, prompt: &str) -> AiResult<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        self.generate(&body)
    }

    fn generate_structured(
        &self,
        image: &ReceiptImage,
        instruction: &str,
        schema: &Value,
    ) -> AiResult<String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.to_base64() } },
                    { "text": instruction }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        self.generate(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}
