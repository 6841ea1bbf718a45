//! Provider configuration
//!
//! Read once at startup and handed to [`TranslationProxy`](crate::proxy::TranslationProxy).
//! A missing key is not a startup error: the proxy keeps running and answers every
//! request with a configuration error.

use crate::provider::GoogleTranslateProvider;

pub const API_KEY_VAR: &str = "GOOGLE_TRANSLATE_API_KEY";
pub const ENDPOINT_VAR: &str = "GOOGLE_TRANSLATE_URL";

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Google Translate API key; `None` when unset or blank
    pub api_key: Option<String>,
    /// Translate v2 endpoint
    pub endpoint: String,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty()),
            endpoint: lookup(ENDPOINT_VAR)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| GoogleTranslateProvider::DEFAULT_ENDPOINT.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
