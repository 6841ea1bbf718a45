//! # Quanqua client
//!
//! The translator front end without a UI: a reducer ([`Translator`]) holding everything
//! the screen shows, an async [`ClientRuntime`] that executes its effects, a history log
//! persisted through a [`KeyValueStore`], and a [`ProxyClient`] for `POST /api/translate`.
//!
//! ```no_run
//! use quanqua_client::{
//!     Capabilities, ClientRuntime, Event, MemoryStore, ProxyClient, SystemClipboard,
//!     TerminalPrompter, TranslatorSettings,
//! };
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(ProxyClient::new("http://127.0.0.1:3000")?);
//! let capabilities = Capabilities::basic(Arc::new(SystemClipboard), Arc::new(TerminalPrompter::new()));
//! let runtime = ClientRuntime::new(
//!     TranslatorSettings::default(),
//!     "quanqua-translation-history",
//!     backend,
//!     Arc::new(MemoryStore::new()),
//!     capabilities,
//! );
//! let handle = runtime.handle();
//! tokio::spawn(runtime.run());
//!
//! handle.send(Event::InputChanged("Hello".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod capability;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod translator;

pub use backend::{ProxyClient, TranslateBackend};
pub use capability::{
    Capabilities, Capability, CapabilityError, Clipboard, CommandSynthesizer, Prompter,
    RecognitionEvents, ShareTarget, SpeechRecognizer, SpeechSynthesizer, SystemClipboard,
    TerminalPrompter,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use event::{Effect, Event, PulseFlag, TranslationRequest};
pub use history::{HistoryEntry, HistoryLog};
pub use runtime::{ClientRuntime, RuntimeHandle};
pub use state::{Phase, TranslatorState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use translator::{Availability, Translator, TranslatorSettings};
