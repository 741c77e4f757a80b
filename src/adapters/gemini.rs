//! Google Gemini `generateContent` REST client.

use crate::config::AppConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{PlannerError, Result, MISSING_API_KEY_MESSAGE};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GenerateContentResponse {
    /// 串接第一個候選回應的所有文字片段；沒有文字則回傳 `None`
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PlannerError::ConfigError {
                message: MISSING_API_KEY_MESSAGE.to_string(),
            })?;

        let url = self.endpoint(model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!("Making Gemini request to: {}", url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer, key: Option<&str>) -> AppConfig {
        AppConfig {
            gemini_api_key: key.map(str::to_string),
            api_base_url: server.base_url(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generate_text_joins_parts() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent")
                .header("x-goog-api-key", "test-key")
                .body_contains("plan a weekend");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [
                                {"text": "thinking...", "thought": true},
                                {"text": "```json\n{\"movies\":"},
                                {"text": "[]}\n```"}
                            ]
                        }
                    }]
                }));
        });

        let client = GeminiClient::new(&config_for(&server, Some("test-key"))).unwrap();
        let text = client
            .generate_text("gemini-2.5-flash", "plan a weekend")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text.as_deref(), Some("```json\n{\"movies\":[]}\n```"));
    }

    #[tokio::test]
    async fn test_no_candidates_yields_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }));
        });

        let client = GeminiClient::new(&config_for(&server, Some("k"))).unwrap();
        let text = client.generate_text("gemini-2.5-flash", "x").await.unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(429).body("quota exceeded");
        });

        let client = GeminiClient::new(&config_for(&server, Some("k"))).unwrap();
        let err = client.generate_text("gemini-2.5-flash", "x").await.unwrap_err();
        match err {
            PlannerError::UpstreamStatus { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_key_never_hits_network() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = GeminiClient::new(&config_for(&server, None)).unwrap();
        let err = client.generate_text("gemini-2.5-flash", "x").await.unwrap_err();

        assert!(matches!(err, PlannerError::ConfigError { .. }));
        api_mock.assert_hits(0);
    }
}
