//! Translator state machine
//!
//! [`Translator::handle`] is a reducer: it takes one [`Event`], updates the
//! [`TranslatorState`] and returns the [`Effect`]s the runtime has to carry out. No I/O
//! happens here, so every transition can be tested by feeding events and inspecting the
//! state and the returned effects.
//!
//! Two counters keep asynchronous results honest:
//!
//! - the debounce ticket: each keystroke arms a new timer and only the timer carrying
//!   the latest ticket may start a request;
//! - the request id: each request gets a new id and only the response to the latest id
//!   is applied, so a slow response for old input never overwrites newer state.

use crate::event::{
    ConfirmPrompt, Effect, Event, PulseFlag, RecognitionOptions, TranslationRequest,
    VOICE_UNSUPPORTED,
};
use crate::history::{HistoryLog, MAX_HISTORY_ITEMS};
use crate::state::TranslatorState;
use quanqua::LanguageCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorSettings {
    /// Quiet period after the last input change before translating
    pub debounce: Duration,
    /// How long the copied/shared indicators stay on
    pub pulse: Duration,
    pub max_history: usize,
    pub default_source: LanguageCode,
    pub default_target: LanguageCode,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            pulse: Duration::from_secs(2),
            max_history: MAX_HISTORY_ITEMS,
            default_source: LanguageCode::En,
            default_target: LanguageCode::Ti,
        }
    }
}

/// Which optional capabilities the host provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    pub speech_recognition: bool,
    pub speech_synthesis: bool,
    pub share: bool,
}

#[derive(Debug)]
pub struct Translator {
    state: TranslatorState,
    settings: TranslatorSettings,
    availability: Availability,
    debounce_ticket: u64,
    latest_request: u64,
    /// The request behind `latest_request`, while it is in flight
    in_flight: Option<TranslationRequest>,
    copied_ticket: u64,
    shared_ticket: u64,
}

impl Translator {
    pub fn new(settings: TranslatorSettings, availability: Availability, history: HistoryLog) -> Self {
        let state = TranslatorState::new(settings.default_source, settings.default_target, history);
        Self {
            state,
            settings,
            availability,
            debounce_ticket: 0,
            latest_request: 0,
            in_flight: None,
            copied_ticket: 0,
            shared_ticket: 0,
        }
    }

    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    pub fn settings(&self) -> &TranslatorSettings {
        &self.settings
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::InputChanged(text) => {
                self.state.input_text = text;
                vec![self.arm_debounce()]
            }
            Event::SourceLanguageSelected(code) => {
                self.state.source_dropdown_open = false;
                if self.state.source_lang == code {
                    return Vec::new();
                }
                self.state.source_lang = code;
                self.drop_in_flight();
                vec![self.arm_debounce()]
            }
            Event::TargetLanguageSelected(code) => {
                self.state.target_dropdown_open = false;
                if self.state.target_lang == code {
                    return Vec::new();
                }
                self.state.target_lang = code;
                self.drop_in_flight();
                vec![self.arm_debounce()]
            }
            Event::SwapLanguages => {
                let state = &mut self.state;
                std::mem::swap(&mut state.source_lang, &mut state.target_lang);
                std::mem::swap(&mut state.input_text, &mut state.translated_text);
                self.drop_in_flight();
                vec![self.arm_debounce()]
            }
            Event::Clear => {
                self.state.input_text.clear();
                self.state.translated_text.clear();
                self.state.error = None;
                vec![self.invalidate_pending()]
            }
            Event::DebounceElapsed { ticket } => self.debounce_elapsed(ticket),
            Event::TranslationSucceeded {
                request_id,
                translated_text,
                at_ms,
            } => self.translation_succeeded(request_id, translated_text, at_ms),
            Event::TranslationFailed {
                request_id,
                message,
            } => {
                if !self.is_current(request_id) {
                    return Vec::new();
                }
                warn!(request_id, error = %message, "Translation error");
                self.in_flight = None;
                self.state.loading = false;
                self.state.translated_text.clear();
                self.state.error = Some(message);
                Vec::new()
            }

            Event::ToggleHistory => {
                self.state.history_open = !self.state.history_open;
                Vec::new()
            }
            Event::ToggleSourceDropdown => {
                self.state.source_dropdown_open = !self.state.source_dropdown_open;
                self.state.target_dropdown_open = false;
                Vec::new()
            }
            Event::ToggleTargetDropdown => {
                self.state.target_dropdown_open = !self.state.target_dropdown_open;
                self.state.source_dropdown_open = false;
                Vec::new()
            }
            Event::CloseDropdowns => {
                self.state.source_dropdown_open = false;
                self.state.target_dropdown_open = false;
                Vec::new()
            }

            Event::LoadFromHistory(id) => self.load_from_history(&id),
            Event::DeleteHistoryItem(id) => match self.state.history.remove(&id) {
                Some(_) => vec![self.persist_history()],
                None => Vec::new(),
            },
            Event::RequestClearHistory => vec![Effect::Confirm(ConfirmPrompt::ClearHistory)],
            Event::ClearHistoryConfirmed(confirmed) => {
                if !confirmed {
                    return Vec::new();
                }
                self.state.history.clear();
                vec![Effect::RemoveHistory]
            }

            Event::VoiceInputPressed => self.voice_input_pressed(),
            Event::RecognitionStarted => {
                self.state.listening = true;
                Vec::new()
            }
            Event::RecognitionResult(transcript) => {
                self.state.listening = false;
                self.state.input_text = transcript;
                vec![self.arm_debounce()]
            }
            Event::RecognitionFailed(message) => {
                warn!(error = %message, "Speech recognition error");
                self.state.listening = false;
                Vec::new()
            }
            Event::RecognitionEnded => {
                self.state.listening = false;
                Vec::new()
            }

            Event::SpeakPressed => {
                if self.state.translated_text.is_empty() || !self.availability.speech_synthesis {
                    return Vec::new();
                }
                vec![Effect::Speak {
                    text: self.state.translated_text.clone(),
                    locale: self.state.target_lang.speech_locale(),
                }]
            }
            Event::CopyPressed => {
                if self.state.translated_text.is_empty() {
                    return Vec::new();
                }
                vec![Effect::CopyToClipboard(self.state.translated_text.clone())]
            }
            Event::CopySucceeded => {
                self.state.copied = true;
                self.copied_ticket += 1;
                vec![self.pulse(PulseFlag::Copied, self.copied_ticket)]
            }
            Event::CopyFailed(message) => {
                warn!(error = %message, "Copy to clipboard failed");
                Vec::new()
            }
            Event::SharePressed => {
                if self.state.translated_text.is_empty() {
                    return Vec::new();
                }
                if !self.availability.share {
                    return self.handle(Event::CopyPressed);
                }
                vec![Effect::Share(self.state.translated_text.clone())]
            }
            Event::ShareSucceeded => {
                self.state.shared = true;
                self.shared_ticket += 1;
                vec![self.pulse(PulseFlag::Shared, self.shared_ticket)]
            }
            Event::ShareFailed(message) => {
                warn!(error = %message, "Error sharing");
                Vec::new()
            }
            Event::PulseElapsed { flag, ticket } => {
                match flag {
                    PulseFlag::Copied if ticket == self.copied_ticket => self.state.copied = false,
                    PulseFlag::Shared if ticket == self.shared_ticket => self.state.shared = false,
                    _ => {}
                }
                Vec::new()
            }
        }
    }

    fn arm_debounce(&mut self) -> Effect {
        self.debounce_ticket += 1;
        self.state.debounce_armed = true;
        Effect::StartDebounce {
            ticket: self.debounce_ticket,
            delay: self.settings.debounce,
        }
    }

    /// Drop the armed timer and any in-flight response
    fn invalidate_pending(&mut self) -> Effect {
        self.debounce_ticket += 1;
        self.state.debounce_armed = false;
        self.drop_in_flight();
        Effect::CancelDebounce
    }

    /// The response to the current request, if any, will be discarded
    fn drop_in_flight(&mut self) {
        self.latest_request += 1;
        self.in_flight = None;
        self.state.loading = false;
    }

    fn is_current(&self, request_id: u64) -> bool {
        let current = request_id == self.latest_request && self.in_flight.is_some();
        if !current {
            debug!(request_id, latest = self.latest_request, "Discarding stale response");
        }
        current
    }

    fn debounce_elapsed(&mut self, ticket: u64) -> Vec<Effect> {
        if ticket != self.debounce_ticket {
            return Vec::new();
        }
        self.state.debounce_armed = false;

        if self.state.input_text.trim().is_empty() {
            self.latest_request += 1;
            self.in_flight = None;
            self.state.loading = false;
            self.state.translated_text.clear();
            self.state.error = None;
            return Vec::new();
        }

        self.latest_request += 1;
        let request = TranslationRequest {
            text: self.state.input_text.clone(),
            source_lang: self.state.source_lang,
            target_lang: self.state.target_lang,
        };
        self.in_flight = Some(request.clone());
        self.state.loading = true;
        self.state.error = None;

        vec![Effect::Translate {
            request_id: self.latest_request,
            request,
        }]
    }

    fn translation_succeeded(&mut self, request_id: u64, translated_text: String, at_ms: i64) -> Vec<Effect> {
        if !self.is_current(request_id) {
            return Vec::new();
        }
        let Some(request) = self.in_flight.take() else {
            return Vec::new();
        };

        self.state.loading = false;
        self.state.translated_text = translated_text.clone();

        if translated_text.is_empty() {
            return Vec::new();
        }

        let entry = self.state.history.record(
            request.source_lang,
            request.target_lang,
            request.text,
            translated_text,
            at_ms,
            self.settings.max_history,
        );
        info!(id = %entry.id, "Translation added to history");
        vec![self.persist_history()]
    }

    fn load_from_history(&mut self, id: &str) -> Vec<Effect> {
        let Some(entry) = self.state.history.get(id).cloned() else {
            return Vec::new();
        };

        self.state.source_lang = entry.source_lang;
        self.state.target_lang = entry.target_lang;
        self.state.input_text = entry.source_text;
        self.state.translated_text = entry.translated_text;
        self.state.error = None;
        self.state.history_open = false;
        // The stored translation is shown as-is; nothing is re-requested
        vec![self.invalidate_pending()]
    }

    fn voice_input_pressed(&mut self) -> Vec<Effect> {
        if !self.availability.speech_recognition {
            return vec![Effect::Notify(VOICE_UNSUPPORTED.to_string())];
        }
        if self.state.listening {
            self.state.listening = false;
            return vec![Effect::StopRecognition];
        }
        vec![Effect::StartRecognition(RecognitionOptions::single_shot(
            self.state.source_lang.speech_locale(),
        ))]
    }

    fn persist_history(&self) -> Effect {
        Effect::PersistHistory(self.state.history.entries().to_vec())
    }

    fn pulse(&self, flag: PulseFlag, ticket: u64) -> Effect {
        Effect::StartPulse {
            flag,
            ticket,
            delay: self.settings.pulse,
        }
    }
}
