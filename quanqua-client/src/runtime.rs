//! Async driver for the [`Translator`] reducer
//!
//! The runtime owns the translator and feeds it events from an unbounded channel. Every
//! effect the reducer returns is executed here: timers and network calls run as spawned
//! tasks that report back with new events, storage writes happen inline. After each
//! event the new state is published on a `watch` channel.

use crate::backend::TranslateBackend;
use crate::capability::{Capabilities, Capability, RecognitionEvents, SHARE_TITLE};
use crate::error::ClientResult;
use crate::event::{Effect, Event, PulseFlag};
use crate::history::{self, HistoryEntry};
use crate::state::TranslatorState;
use crate::storage::KeyValueStore;
use crate::translator::{Translator, TranslatorSettings};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Cloneable entry point for front ends
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    events: UnboundedSender<Event>,
    state: watch::Receiver<TranslatorState>,
    shutdown: Arc<Notify>,
}

impl RuntimeHandle {
    pub fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            debug!("Event dropped, runtime has stopped");
        }
    }

    /// Latest published state
    pub fn state(&self) -> TranslatorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TranslatorState> {
        self.state.clone()
    }

    /// Ask [`ClientRuntime::run`] to return
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

pub struct ClientRuntime {
    translator: Translator,
    backend: Arc<dyn TranslateBackend>,
    store: Arc<dyn KeyValueStore>,
    capabilities: Capabilities,
    history_key: String,

    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    state_tx: watch::Sender<TranslatorState>,
    shutdown: Arc<Notify>,

    debounce: Option<JoinHandle<()>>,
    pulses: HashMap<PulseFlag, JoinHandle<()>>,
}

impl ClientRuntime {
    /// Build the runtime, restoring history from `store`
    pub fn new(
        settings: TranslatorSettings,
        history_key: impl Into<String>,
        backend: Arc<dyn TranslateBackend>,
        store: Arc<dyn KeyValueStore>,
        capabilities: Capabilities,
    ) -> Self {
        let history_key = history_key.into();
        let history = history::load(store.as_ref(), &history_key, settings.max_history);
        info!(entries = history.len(), key = %history_key, "Loaded translation history");

        let translator = Translator::new(settings, capabilities.availability(), history);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(translator.state().clone());

        Self {
            translator,
            backend,
            store,
            capabilities,
            history_key,
            events_tx,
            events_rx,
            state_tx,
            shutdown: Arc::new(Notify::new()),
            debounce: None,
            pulses: HashMap::new(),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            events: self.events_tx.clone(),
            state: self.state_tx.subscribe(),
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    pub fn state(&self) -> &TranslatorState {
        self.translator.state()
    }

    /// Process events until [`RuntimeHandle::shutdown`] is called
    pub async fn run(mut self) {
        let shutdown = Arc::clone(&self.shutdown);
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    info!("Client runtime stopping");
                    break;
                }
                Some(event) = self.events_rx.recv() => self.step(event),
            }
        }
        self.cancel_timers();
    }

    /// Apply one event and execute the resulting effects
    ///
    /// Must be called from within a tokio runtime.
    pub fn step(&mut self, event: Event) {
        debug!(?event, "Handling event");
        let effects = self.translator.handle(event);
        for effect in effects {
            self.execute(effect);
        }
        self.state_tx.send_replace(self.translator.state().clone());
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StartDebounce { ticket, delay } => {
                let handle = self.after(delay, Event::DebounceElapsed { ticket });
                if let Some(previous) = self.debounce.replace(handle) {
                    previous.abort();
                }
            }
            Effect::CancelDebounce => {
                if let Some(previous) = self.debounce.take() {
                    previous.abort();
                }
            }
            Effect::Translate {
                request_id,
                request,
            } => {
                let backend = Arc::clone(&self.backend);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match backend.translate(&request).await {
                        Ok(translated_text) => Event::TranslationSucceeded {
                            request_id,
                            translated_text,
                            at_ms: chrono::Utc::now().timestamp_millis(),
                        },
                        Err(e) => Event::TranslationFailed {
                            request_id,
                            message: e.to_string(),
                        },
                    };
                    let _ = tx.send(event);
                });
            }
            Effect::PersistHistory(entries) => {
                if let Err(e) = self.persist_history(&entries) {
                    error!(error = %e, "Failed to save translation history");
                }
            }
            Effect::RemoveHistory => {
                if let Err(e) = self.store.remove(&self.history_key) {
                    error!(error = %e, "Failed to clear translation history");
                }
            }
            Effect::Confirm(prompt) => {
                let prompter = Arc::clone(&self.capabilities.prompter);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let confirmed = prompter.confirm(prompt.message()).await;
                    let _ = tx.send(Event::ClearHistoryConfirmed(confirmed));
                });
            }
            Effect::Notify(message) => {
                let prompter = Arc::clone(&self.capabilities.prompter);
                tokio::spawn(async move { prompter.notify(&message).await });
            }
            Effect::StartRecognition(options) => match &self.capabilities.recognizer {
                Capability::Available(recognizer) => {
                    let events = RecognitionEvents::new(self.events_tx.clone());
                    if let Err(e) = recognizer.start(options, events) {
                        let _ = self.events_tx.send(Event::RecognitionFailed(e.to_string()));
                    }
                }
                Capability::Unavailable => warn!("Speech recognition requested but unavailable"),
            },
            Effect::StopRecognition => {
                if let Some(recognizer) = self.capabilities.recognizer.get() {
                    recognizer.stop();
                }
            }
            Effect::Speak { text, locale } => match &self.capabilities.synthesizer {
                Capability::Available(synthesizer) => {
                    let synthesizer = Arc::clone(synthesizer);
                    tokio::spawn(async move {
                        if let Err(e) = synthesizer.speak(&text, locale).await {
                            warn!(error = %e, locale, "Speech synthesis failed");
                        }
                    });
                }
                Capability::Unavailable => warn!("Speech synthesis requested but unavailable"),
            },
            Effect::CopyToClipboard(text) => {
                let clipboard = Arc::clone(&self.capabilities.clipboard);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match clipboard.write_text(&text).await {
                        Ok(()) => Event::CopySucceeded,
                        Err(e) => Event::CopyFailed(e.to_string()),
                    };
                    let _ = tx.send(event);
                });
            }
            Effect::Share(text) => match &self.capabilities.share {
                Capability::Available(target) => {
                    let target = Arc::clone(target);
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let event = match target.share(SHARE_TITLE, &text).await {
                            Ok(()) => Event::ShareSucceeded,
                            Err(e) => Event::ShareFailed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
                Capability::Unavailable => warn!("Share requested but unavailable"),
            },
            Effect::StartPulse {
                flag,
                ticket,
                delay,
            } => {
                let handle = self.after(delay, Event::PulseElapsed { flag, ticket });
                if let Some(previous) = self.pulses.insert(flag, handle) {
                    previous.abort();
                }
            }
        }
    }

    fn persist_history(&self, entries: &[HistoryEntry]) -> ClientResult<()> {
        history::persist(self.store.as_ref(), &self.history_key, entries)?;
        Ok(())
    }

    /// Send `event` back into the loop after `delay`
    fn after(&self, delay: Duration, event: Event) -> JoinHandle<()> {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        })
    }

    fn cancel_timers(&mut self) {
        if let Some(debounce) = self.debounce.take() {
            debounce.abort();
        }
        for (_, pulse) in self.pulses.drain() {
            pulse.abort();
        }
    }
}

impl std::fmt::Debug for ClientRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRuntime")
            .field("translator", &self.translator)
            .field("capabilities", &self.capabilities)
            .field("history_key", &self.history_key)
            .finish_non_exhaustive()
    }
}
