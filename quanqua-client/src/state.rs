use crate::history::HistoryLog;
use quanqua::LanguageCode;

/// Coarse phase of the translator, derived from [`TranslatorState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Debounce armed or request in flight
    Pending,
    Success,
    Error,
}

/// Everything the UI renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorState {
    pub source_lang: LanguageCode,
    pub target_lang: LanguageCode,
    pub input_text: String,
    pub translated_text: String,
    /// A request is in flight
    pub loading: bool,
    /// A debounce timer is armed
    pub debounce_armed: bool,
    pub error: Option<String>,
    pub history: HistoryLog,

    pub copied: bool,
    pub shared: bool,
    pub listening: bool,
    pub history_open: bool,
    pub source_dropdown_open: bool,
    pub target_dropdown_open: bool,
}

impl TranslatorState {
    pub fn new(source_lang: LanguageCode, target_lang: LanguageCode, history: HistoryLog) -> Self {
        Self {
            source_lang,
            target_lang,
            input_text: String::new(),
            translated_text: String::new(),
            loading: false,
            debounce_armed: false,
            error: None,
            history,
            copied: false,
            shared: false,
            listening: false,
            history_open: false,
            source_dropdown_open: false,
            target_dropdown_open: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading || self.debounce_armed {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Error
        } else if !self.translated_text.is_empty() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

impl Default for TranslatorState {
    fn default() -> Self {
        Self::new(LanguageCode::En, LanguageCode::Ti, HistoryLog::new())
    }
}
