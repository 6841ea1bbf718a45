//! Inputs and outputs of the translator reducer

use crate::history::HistoryEntry;
use quanqua::{LanguageCode, TranslateRequest};
use std::time::Duration;

/// Message shown when speech recognition is missing
pub const VOICE_UNSUPPORTED: &str = "Voice input is not supported on this device.";

/// What the translator asks the proxy for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: LanguageCode,
    pub target_lang: LanguageCode,
}

impl TranslationRequest {
    pub fn to_wire(&self) -> TranslateRequest {
        TranslateRequest::new(
            self.text.clone(),
            self.source_lang.as_str(),
            self.target_lang.as_str(),
        )
    }
}

/// Transient indicators that switch themselves off after a while
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseFlag {
    Copied,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    ClearHistory,
}

impl ConfirmPrompt {
    pub fn message(self) -> &'static str {
        match self {
            ConfirmPrompt::ClearHistory => "Clear all translation history?",
        }
    }
}

/// Parameters of a speech recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub locale: &'static str,
    /// Keep listening after the first phrase
    pub continuous: bool,
    /// Report partial transcripts
    pub interim_results: bool,
}

impl RecognitionOptions {
    /// One phrase, final result only
    pub fn single_shot(locale: &'static str) -> Self {
        Self {
            locale,
            continuous: false,
            interim_results: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InputChanged(String),
    SourceLanguageSelected(LanguageCode),
    TargetLanguageSelected(LanguageCode),
    SwapLanguages,
    Clear,
    DebounceElapsed {
        ticket: u64,
    },
    TranslationSucceeded {
        request_id: u64,
        translated_text: String,
        /// Completion time in epoch milliseconds
        at_ms: i64,
    },
    TranslationFailed {
        request_id: u64,
        message: String,
    },

    ToggleHistory,
    ToggleSourceDropdown,
    ToggleTargetDropdown,
    /// A click landed outside both dropdowns
    CloseDropdowns,

    LoadFromHistory(String),
    DeleteHistoryItem(String),
    RequestClearHistory,
    ClearHistoryConfirmed(bool),

    VoiceInputPressed,
    RecognitionStarted,
    RecognitionResult(String),
    RecognitionFailed(String),
    RecognitionEnded,

    SpeakPressed,
    CopyPressed,
    CopySucceeded,
    CopyFailed(String),
    SharePressed,
    ShareSucceeded,
    ShareFailed(String),
    PulseElapsed {
        flag: PulseFlag,
        ticket: u64,
    },
}

/// Side effects requested by the reducer, executed by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fire `DebounceElapsed { ticket }` after `delay`, replacing any armed timer
    StartDebounce { ticket: u64, delay: Duration },
    CancelDebounce,
    Translate {
        request_id: u64,
        request: TranslationRequest,
    },
    PersistHistory(Vec<HistoryEntry>),
    RemoveHistory,
    Confirm(ConfirmPrompt),
    Notify(String),
    StartRecognition(RecognitionOptions),
    StopRecognition,
    Speak { text: String, locale: &'static str },
    CopyToClipboard(String),
    Share(String),
    /// Fire `PulseElapsed { flag, ticket }` after `delay`
    StartPulse {
        flag: PulseFlag,
        ticket: u64,
        delay: Duration,
    },
}
