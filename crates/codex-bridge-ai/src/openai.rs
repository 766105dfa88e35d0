use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use codex_bridge_core::truncate_for_error;

use crate::request_id::new_request_id;
use crate::ApiError;

#[derive(Debug, Clone)]
/// Public struct `OpenAiConfig` used across codex-bridge components.
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// Thin client for the two text-generation endpoints. One request per call;
/// retries are the caller's business and the bridge never makes them.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| ApiError::InvalidConfig(format!("invalid API key header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_millis(
                config.request_timeout_ms.max(1),
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn chat_completions_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            return base.to_string();
        }
        if let Some(prefix) = base.strip_suffix("/responses") {
            return format!("{prefix}/chat/completions");
        }

        format!("{base}/chat/completions")
    }

    fn responses_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/responses") {
            return base.to_string();
        }
        if let Some(prefix) = base.strip_suffix("/chat/completions") {
            return format!("{prefix}/responses");
        }

        format!("{base}/responses")
    }

    /// `POST /responses` with a plain-text input.
    pub async fn create_response(&self, model: &str, prompt: &str) -> Result<Value, ApiError> {
        let body = json!({
            "model": model,
            "input": prompt,
        });
        self.post_json(&self.responses_url(), &body).await
    }

    /// `POST /chat/completions` with a single user message.
    pub async fn create_chat_completion(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
        });
        self.post_json(&self.chat_completions_url(), &body).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url)
            .header("x-codex-bridge-request-id", new_request_id())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body: truncate_for_error(raw.trim(), 800),
            });
        }
        Ok(serde_json::from_str(&raw)?)
    }
}
