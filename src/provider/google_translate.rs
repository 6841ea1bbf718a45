//! Google Translate API provider
//!
//! This module integrates with Google Translate API v2. The proxy uses it for every
//! request once a credential is configured.
//!
//! # Authentication
//!
//! The API key travels as the `key` query parameter. It is normally taken from the
//! `GOOGLE_TRANSLATE_API_KEY` environment variable through
//! [`ProviderConfig`](crate::config::ProviderConfig). Obtain a key from:
//! https://console.cloud.google.com/
//!
//! # Error bodies
//!
//! Google answers failures with `{"error": {"code": 400, "message": "..."}}`, but proxies
//! and load balancers in between may answer with plain text or an empty body. The
//! response body is read once as text and [`extract_error_message`] makes the best of
//! whatever arrived.

use crate::provider::error::{ProxyError, ProxyResult};
use crate::provider::translator::MachineTranslator;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error};

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://translation.googleapis.com/language/translate/v2";

    /// Create a provider for the public Google endpoint
    ///
    /// # Example
    ///
    /// ```ignore
    /// let provider = GoogleTranslateProvider::new("your-api-key".to_string())?;
    /// ```
    pub fn new(api_key: String) -> ProxyResult<Self> {
        Self::with_endpoint(api_key, Self::DEFAULT_ENDPOINT)
    }

    /// Create a provider that talks to `base_url` instead of the public endpoint
    ///
    /// Used for regional endpoints and for pointing tests at a local fake.
    pub fn with_endpoint(api_key: String, base_url: impl Into<String>) -> ProxyResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProxyError::not_configured());
        }

        // No timeout override: the client's defaults apply
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.into(),
        })
    }

    fn request_url(&self) -> ProxyResult<reqwest::Url> {
        reqwest::Url::parse_with_params(&self.base_url, &[("key", self.api_key.as_str())])
            .map_err(|e| ProxyError::Internal(format!("Invalid provider URL: {}", e)))
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(&self, text: &str, source: &str, target: &str) -> ProxyResult<String> {
        let body = json!({
            "q": text.trim(),
            "source": source,
            "target": target,
            "format": "text"
        });

        let response = self
            .client
            .post(self.request_url()?)
            .json(&body)
            .send()
            .await?;

        // Read the body exactly once; both branches below work from this text
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(status.as_u16(), &response_text);
            error!(status = status.as_u16(), %message, "Translation API error");
            return Err(ProxyError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = serde_json::from_str(&response_text)
            .map_err(|e| ProxyError::Internal(format!("Failed to parse API response: {}", e)))?;

        match first_translation(&data) {
            Some(translated) => {
                debug!(source, target, "Translation received");
                Ok(translated.to_string())
            }
            None => {
                error!(response = %response_text, "No translation returned");
                Err(ProxyError::EmptyResult)
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

/// `data.translations[0].translatedText`, if present and non-empty
fn first_translation(data: &Value) -> Option<&str> {
    data["data"]["translations"][0]["translatedText"]
        .as_str()
        .filter(|text| !text.is_empty())
}

/// Best-effort error message from a non-success provider response body
///
/// For a JSON body the candidates are tried in order: `error.message`, `error` as a
/// string, `error` serialized as JSON, and finally a generic `HTTP <status>` message.
/// A body that is not JSON is returned as-is unless it is empty.
pub fn extract_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) | Err(_) => {
            if body.is_empty() {
                format!("HTTP {}: Could not parse error", status)
            } else {
                body.to_string()
            }
        }
        Ok(data) => {
            let error = &data["error"];
            let message = &error["message"];
            if is_truthy(message) {
                match message.as_str() {
                    Some(text) => text.to_string(),
                    None => message.to_string(),
                }
            } else if let Some(text) = error.as_str() {
                text.to_string()
            } else if is_truthy(error) {
                error.to_string()
            } else {
                format!("HTTP {}: Unknown error", status)
            }
        }
    }
}

/// Whether a JSON value would count as "set" in the provider's loosely typed bodies
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
