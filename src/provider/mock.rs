//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, API-free translator for exercising the proxy
//! without an API key or network access. It also backs the `--mock` flag of the CLI.
//!
//! # Example
//!
//! ```ignore
//! use quanqua::provider::{MachineTranslator, MockMode, MockTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "am").await.unwrap();
//!     assert_eq!(result, "hello_am");
//! }
//! ```

use crate::provider::error::{ProxyError, ProxyResult};
use crate::provider::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_am"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Behave like a provider that answered without a translation
    Empty,

    /// Fail every call with the given error
    Error(ProxyError),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various provider behaviours
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `translate` calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn apply_translation(&self, text: &str, target: &str) -> ProxyResult<String> {
        let text = text.trim();
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Empty => Err(ProxyError::EmptyResult),
            MockMode::Error(err) => Err(err.clone()),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> ProxyResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.apply_translation(text, target)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
