//! Machine translation provider trait
//!
//! `MachineTranslator` is the seam between the proxy handler and whatever answers the
//! translation: Google Translate in production, [`MockTranslator`](super::MockTranslator)
//! in tests and offline runs.
//!
//! # Example
//!
//! ```ignore
//! use quanqua::provider::{GoogleTranslateProvider, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new("api-key".to_string())?;
//!     let result = provider.translate("Hello", "en", "am").await?;
//!     println!("{}", result); // "ሰላም"
//!     Ok(())
//! }
//! ```

use crate::provider::error::ProxyResult;
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Language codes are already mapped to the provider's codes when they reach this
/// trait. Implementations make at most one outbound call per invocation and never retry.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate `text` from `source` to `target`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The first translation the provider produced, never empty
    /// * `Err(ProxyError)` - `Provider` for non-success answers, `EmptyResult` when no
    ///   translation came back, `Internal` for transport or decoding failures
    async fn translate(&self, text: &str, source: &str, target: &str) -> ProxyResult<String>;

    /// Name used in log lines, e.g. "Google Translate"
    fn provider_name(&self) -> &str;
}
