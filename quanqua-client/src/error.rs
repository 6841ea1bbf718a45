use crate::storage::StorageError;

/// Failures seen by the client while talking to the proxy
///
/// The `Display` text is what the translator shows as its error message.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received
    #[error("Network error: {0}")]
    Network(String),
    /// The proxy answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The proxy answered 2xx with a body we could not use
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ClientResult<T> = Result<T, ClientError>;
