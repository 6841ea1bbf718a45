//! Client side of `POST /api/translate`

use crate::error::{ClientError, ClientResult};
use crate::event::TranslationRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

/// Whatever answers the translator's requests
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> ClientResult<String>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    translated_text: String,
}

/// HTTP client for the translation proxy
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ProxyClient {
    pub const TRANSLATE_PATH: &'static str = "/api/translate";

    /// `base_url` is the proxy's origin, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let endpoint = reqwest::Url::parse(base_url)
            .and_then(|base| base.join(Self::TRANSLATE_PATH))
            .map_err(|e| ClientError::Network(format!("Invalid proxy URL '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl TranslateBackend for ProxyClient {
    async fn translate(&self, request: &TranslationRequest) -> ClientResult<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &response_text);
            error!(status = status.as_u16(), %message, "Translation failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SuccessBody = serde_json::from_str(&response_text)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Ok(body.translated_text)
    }
}

/// Message for a non-success proxy response
///
/// Prefers the `error` field of a JSON body, then the whole JSON body, then the raw text.
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(data) => match &data["error"] {
            Value::String(message) if !message.is_empty() => message.clone(),
            Value::Null | Value::Bool(false) | Value::String(_) => data.to_string(),
            other => other.to_string(),
        },
        Err(_) => {
            let detail = if body.is_empty() { "Unknown error" } else { body };
            format!("HTTP {}: {}", status, detail)
        }
    }
}
