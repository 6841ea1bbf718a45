/// Error types for the translation proxy
///
/// Every variant maps to an HTTP status via [`ProxyError::status_code`] and its `Display`
/// text is what ends up in the `{"error": ...}` response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// Missing or inconsistent request fields
    #[error("{0}")]
    Validation(String),
    /// Provider credential is not configured
    #[error("{0}")]
    Config(String),
    /// The provider answered with a non-success status
    #[error("{message}")]
    Provider { status: u16, message: String },
    /// The provider answered successfully but without a translation
    #[error("No translation received from API")]
    EmptyResult,
    /// Anything else that went wrong while handling the request
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn missing_fields() -> Self {
        ProxyError::Validation("Missing required fields: text, sourceLang, or targetLang".to_string())
    }

    pub fn same_language() -> Self {
        ProxyError::Validation("Source and target languages cannot be the same".to_string())
    }

    pub fn not_configured() -> Self {
        ProxyError::Config("Translation API key not configured".to_string())
    }

    /// HTTP status this error is reported with
    ///
    /// Provider errors pass the provider's own status through.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Validation(_) => 400,
            ProxyError::Provider { status, .. } => *status,
            ProxyError::Config(_) | ProxyError::EmptyResult | ProxyError::Internal(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Internal(err.to_string())
    }
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;
