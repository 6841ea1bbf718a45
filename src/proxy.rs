//! The translation proxy contract
//!
//! [`TranslationProxy`] is the stateless core of `POST /api/translate`: it checks the
//! configuration, validates the request, maps language codes, asks the provider, and
//! turns every outcome into either a [`TranslateResponse`] or a [`ProxyError`].
//! HTTP framing lives in `quanqua-web`; this module is transport-free.

use crate::config::ProviderConfig;
use crate::language::provider_code;
use crate::provider::{GoogleTranslateProvider, MachineTranslator, ProxyError, ProxyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Request body of `POST /api/translate`
///
/// Every field is optional on the wire so that a missing field is reported as a
/// validation error rather than a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
}

impl TranslateRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: Some(text.into()),
            source_lang: Some(source_lang.into()),
            target_lang: Some(target_lang.into()),
        }
    }
}

/// Success body of `POST /api/translate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
    /// Provider code the text was translated from
    pub source_lang: String,
    /// Provider code the text was translated to
    pub target_lang: String,
}

/// Error body of `POST /api/translate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ProxyError> for ErrorBody {
    fn from(err: &ProxyError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Stateless request handler in front of a translation provider
///
/// `translator` is `None` when no provider credential is configured; every request is
/// then answered with [`ProxyError::Config`].
#[derive(Clone)]
pub struct TranslationProxy {
    translator: Option<Arc<dyn MachineTranslator>>,
}

impl TranslationProxy {
    pub fn new(translator: Arc<dyn MachineTranslator>) -> Self {
        Self {
            translator: Some(translator),
        }
    }

    /// A proxy without a credential
    pub fn unconfigured() -> Self {
        Self { translator: None }
    }

    /// Build the proxy from provider configuration
    ///
    /// A missing key yields an unconfigured proxy, not an error.
    pub fn from_config(config: &ProviderConfig) -> ProxyResult<Self> {
        match &config.api_key {
            Some(key) => {
                let provider = GoogleTranslateProvider::with_endpoint(key.clone(), &config.endpoint)?;
                Ok(Self::new(Arc::new(provider)))
            }
            None => Ok(Self::unconfigured()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.translator.is_some()
    }

    /// Decode a raw JSON body and handle it
    ///
    /// Only a body that is not JSON at all is an internal error. Field types are looked
    /// at after the configuration check: a falsy field (absent, `null`, `false`, `0`,
    /// `""`) counts as missing.
    pub async fn handle_json(&self, body: &[u8]) -> ProxyResult<TranslateResponse> {
        let data: Value = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "Could not decode translation request");
            ProxyError::Internal(e.to_string())
        })?;

        if !self.is_configured() {
            return Err(ProxyError::not_configured());
        }

        let request = TranslateRequest {
            text: string_field(&data, "text")?,
            source_lang: string_field(&data, "sourceLang")?,
            target_lang: string_field(&data, "targetLang")?,
        };
        self.handle(request).await
    }

    /// Handle one translation request
    pub async fn handle(&self, request: TranslateRequest) -> ProxyResult<TranslateResponse> {
        let Some(translator) = &self.translator else {
            return Err(ProxyError::not_configured());
        };

        let (text, source_lang, target_lang) = validate(&request)?;

        let source = provider_code(source_lang);
        let target = provider_code(target_lang);

        info!(
            provider = translator.provider_name(),
            source,
            target,
            chars = text.chars().count(),
            "Translating"
        );

        let translated_text = translator.translate(text, source, target).await.map_err(|e| {
            error!(error = %e, status = e.status_code(), "Translation error");
            e
        })?;

        Ok(TranslateResponse {
            translated_text,
            source_lang: source.to_string(),
            target_lang: target.to_string(),
        })
    }
}

impl std::fmt::Debug for TranslationProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationProxy")
            .field(
                "provider",
                &self.translator.as_ref().map(|t| t.provider_name().to_string()),
            )
            .finish()
    }
}

/// Present, non-empty fields with distinct languages
fn validate(request: &TranslateRequest) -> ProxyResult<(&str, &str, &str)> {
    let (Some(text), Some(source), Some(target)) = (
        present(&request.text),
        present(&request.source_lang),
        present(&request.target_lang),
    ) else {
        return Err(ProxyError::missing_fields());
    };

    if source == target {
        return Err(ProxyError::same_language());
    }

    Ok((text, source, target))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Read a request field from an untyped body
///
/// Falsy values are `None`; any other non-string value is rejected.
fn string_field(data: &Value, name: &str) -> ProxyResult<Option<String>> {
    match data.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => {
            error!(field = name, value = %other, "Request field is not a string");
            Err(ProxyError::Internal(format!(
                "invalid type for `{}`: expected a string",
                name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockMode, MockTranslator};
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{body_json, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn proxy_with(mock: &Arc<MockTranslator>) -> TranslationProxy {
        TranslationProxy::new(mock.clone())
    }

    // ========== Validation ==========

    #[tokio::test]
    async fn test_same_language_never_calls_provider() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);

        for code in ["en", "am", "ti", "om", "fr"] {
            let err = proxy
                .handle(TranslateRequest::new("Hello", code, code))
                .await
                .unwrap_err();
            assert_eq!(err, ProxyError::same_language());
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);

        let cases = [
            TranslateRequest {
                text: None,
                ..TranslateRequest::new("", "en", "am")
            },
            TranslateRequest {
                source_lang: None,
                ..TranslateRequest::new("Hello", "", "am")
            },
            TranslateRequest {
                target_lang: None,
                ..TranslateRequest::new("Hello", "en", "")
            },
            TranslateRequest::new("", "en", "am"),
            TranslateRequest::default(),
        ];

        for request in cases {
            let err = proxy.handle(request).await.unwrap_err();
            assert_eq!(err, ProxyError::missing_fields());
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_always_config_error() {
        let proxy = TranslationProxy::unconfigured();
        let requests = [
            TranslateRequest::new("Hello", "en", "am"),
            TranslateRequest::new("Hello", "en", "en"),
            TranslateRequest::default(),
        ];
        for request in requests {
            let err = proxy.handle(request).await.unwrap_err();
            assert_eq!(err, ProxyError::not_configured());
            assert_eq!(err.status_code(), 500);
        }
    }

    #[test]
    fn test_from_config_without_key() {
        let config = ProviderConfig {
            api_key: None,
            endpoint: GoogleTranslateProvider::DEFAULT_ENDPOINT.to_string(),
        };
        assert!(!TranslationProxy::from_config(&config).unwrap().is_configured());
    }

    // ========== Provider Interaction ==========

    #[tokio::test]
    async fn test_success_returns_mapped_codes() {
        let mut map = HashMap::new();
        map.insert(("Hello".to_string(), "am".to_string()), "ሰላም".to_string());
        let mock = Arc::new(MockTranslator::new(MockMode::Mappings(map)));
        let proxy = proxy_with(&mock);

        let response = proxy
            .handle(TranslateRequest::new("Hello", "en", "am"))
            .await
            .unwrap();
        assert_eq!(
            response,
            TranslateResponse {
                translated_text: "ሰላም".to_string(),
                source_lang: "en".to_string(),
                target_lang: "am".to_string(),
            }
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_codes_pass_through() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);

        let response = proxy
            .handle(TranslateRequest::new("Hello", "en", "sw"))
            .await
            .unwrap();
        assert_eq!(response.translated_text, "Hello_sw");
        assert_eq!(response.target_lang, "sw");
    }

    #[tokio::test]
    async fn test_provider_errors_are_passed_through() {
        let err = ProxyError::Provider {
            status: 429,
            message: "Rate limit".to_string(),
        };
        let mock = Arc::new(MockTranslator::new(MockMode::Error(err.clone())));
        let proxy = proxy_with(&mock);

        assert_eq!(
            proxy
                .handle(TranslateRequest::new("Hello", "en", "om"))
                .await
                .unwrap_err(),
            err
        );
    }

    #[tokio::test]
    async fn test_empty_result() {
        let mock = Arc::new(MockTranslator::new(MockMode::Empty));
        let proxy = proxy_with(&mock);
        let err = proxy
            .handle(TranslateRequest::new("Hello", "en", "ti"))
            .await
            .unwrap_err();
        assert_eq!(err, ProxyError::EmptyResult);
        assert_eq!(err.status_code(), 500);
    }

    // ========== JSON Bodies ==========

    #[tokio::test]
    async fn test_handle_json_decodes_camel_case() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);
        let body = br#"{"text":"Hello","sourceLang":"en","targetLang":"ti"}"#;
        let response = proxy.handle_json(body).await.unwrap();
        assert_eq!(response.translated_text, "Hello_ti");
    }

    #[tokio::test]
    async fn test_handle_json_null_field_is_missing() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);
        let body = br#"{"text":null,"sourceLang":"en","targetLang":"ti"}"#;
        assert_eq!(
            proxy.handle_json(body).await.unwrap_err(),
            ProxyError::missing_fields()
        );
    }

    #[tokio::test]
    async fn test_handle_json_unconfigured_ignores_field_types() {
        let proxy = TranslationProxy::unconfigured();
        let bodies: [&[u8]; 4] = [
            br#"{"text":5,"sourceLang":"en","targetLang":"am"}"#,
            br#"{"text":"Hello","sourceLang":["en"],"targetLang":{"code":"am"}}"#,
            br#"{"text":0}"#,
            br#"[]"#,
        ];
        for body in bodies {
            assert_eq!(
                proxy.handle_json(body).await.unwrap_err(),
                ProxyError::not_configured()
            );
        }
    }

    #[tokio::test]
    async fn test_handle_json_falsy_fields_are_missing() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);
        let bodies: [&[u8]; 5] = [
            br#"{"text":0,"sourceLang":"en","targetLang":"am"}"#,
            br#"{"text":false,"sourceLang":"en","targetLang":"am"}"#,
            br#"{"text":"Hello","sourceLang":"","targetLang":"am"}"#,
            br#"{"text":"Hello","sourceLang":"en","targetLang":0.0}"#,
            br#"{}"#,
        ];
        for body in bodies {
            let err = proxy.handle_json(body).await.unwrap_err();
            assert_eq!(err, ProxyError::missing_fields());
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_json_truthy_non_string_is_internal() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);
        let err = proxy
            .handle_json(br#"{"text":5,"sourceLang":"en","targetLang":"am"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Internal(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_json_malformed_is_internal() {
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let proxy = proxy_with(&mock);
        let err = proxy.handle_json(b"{not json").await.unwrap_err();
        assert!(matches!(err, ProxyError::Internal(_)));
        assert!(err.to_string().starts_with("Internal server error: "));
    }

    #[test]
    fn test_response_wire_format() {
        let response = TranslateResponse {
            translated_text: "ሰላም".to_string(),
            source_lang: "en".to_string(),
            target_lang: "am".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"translatedText": "ሰላም", "sourceLang": "en", "targetLang": "am"})
        );
    }

    // ========== End to End with the Google Provider ==========

    #[tokio::test]
    async fn test_end_to_end_hello_to_amharic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({
                "q": "Hello",
                "source": "en",
                "target": "am",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"translations": [{"translatedText": "ሰላም"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig {
            api_key: Some("test-key".to_string()),
            endpoint: format!("{}/language/translate/v2", server.uri()),
        };
        let proxy = TranslationProxy::from_config(&config).unwrap();
        let response = proxy
            .handle(TranslateRequest::new("Hello", "en", "am"))
            .await
            .unwrap();
        assert_eq!(response.translated_text, "ሰላም");
    }
}
