//! Quanqua translation core
//!
//! Language data for English, Amharic, Tigrigna and Afaan Oromo, plus the transport-free
//! half of the translation proxy: request validation, language code mapping, the
//! provider seam and the Google Translate v2 provider.

pub mod config;
pub mod language;
pub mod provider;
pub mod proxy;

pub use config::ProviderConfig;
pub use language::{LANGUAGES, Language, LanguageCode, UnknownLanguage, speech_locale};
pub use provider::{
    GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator, ProxyError,
    ProxyResult,
};
pub use proxy::{ErrorBody, TranslateRequest, TranslateResponse, TranslationProxy};
