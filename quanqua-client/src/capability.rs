//! Host services the translator can use when they exist
//!
//! Each service sits behind a trait so the runtime can be driven with test doubles. A
//! missing service is expressed as [`Capability::Unavailable`] rather than a stub.

use crate::event::{Event, RecognitionOptions};
use crate::translator::Availability;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

#[derive(Debug)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Capability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Capability::Available(inner) => Some(inner),
            Capability::Unavailable => None,
        }
    }
}

impl<T> Clone for Capability<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Capability::Available(inner) => Capability::Available(inner.clone()),
            Capability::Unavailable => Capability::Unavailable,
        }
    }
}

/// Channel a recognizer reports its session through
#[derive(Debug, Clone)]
pub struct RecognitionEvents {
    tx: UnboundedSender<Event>,
}

impl RecognitionEvents {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    pub fn started(&self) {
        self.send(Event::RecognitionStarted);
    }

    pub fn result(&self, transcript: impl Into<String>) {
        self.send(Event::RecognitionResult(transcript.into()));
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.send(Event::RecognitionFailed(message.into()));
    }

    pub fn ended(&self) {
        self.send(Event::RecognitionEnded);
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("Recognition event dropped, runtime has stopped");
        }
    }
}

pub trait SpeechRecognizer: Send + Sync {
    /// Begin a session; progress is reported through `events`
    fn start(&self, options: RecognitionOptions, events: RecognitionEvents) -> CapabilityResult<()>;
    fn stop(&self);
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, locale: &str) -> CapabilityResult<()>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> CapabilityResult<()>;
}

#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> CapabilityResult<()>;
}

/// Confirmation dialogs and notices
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
    async fn notify(&self, message: &str);
}

/// Title attached to shared translations
pub const SHARE_TITLE: &str = "Translation";

#[derive(Clone)]
pub struct Capabilities {
    pub recognizer: Capability<Arc<dyn SpeechRecognizer>>,
    pub synthesizer: Capability<Arc<dyn SpeechSynthesizer>>,
    pub clipboard: Arc<dyn Clipboard>,
    pub share: Capability<Arc<dyn ShareTarget>>,
    pub prompter: Arc<dyn Prompter>,
}

impl Capabilities {
    /// Only the required services; every optional one is unavailable
    pub fn basic(clipboard: Arc<dyn Clipboard>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            recognizer: Capability::Unavailable,
            synthesizer: Capability::Unavailable,
            clipboard,
            share: Capability::Unavailable,
            prompter,
        }
    }

    pub fn availability(&self) -> Availability {
        Availability {
            speech_recognition: self.recognizer.is_available(),
            speech_synthesis: self.synthesizer.is_available(),
            share: self.share.is_available(),
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("availability", &self.availability())
            .finish_non_exhaustive()
    }
}

// ========== Terminal implementations ==========

/// System clipboard through `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> CapabilityResult<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| CapabilityError::new(format!("Clipboard unavailable: {}", e)))?;
            clipboard
                .set_text(text)
                .map_err(|e| CapabilityError::new(format!("Failed to copy: {}", e)))
        })
        .await
        .map_err(|e| CapabilityError::new(e.to_string()))?
    }
}

/// Speaks by running an external program
///
/// The program receives the locale as `--lang <locale>`, then `--` and the text, which
/// fits `espeak-ng` and similar tools. Text starting with `-` is never taken as a flag.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str, locale: &str) -> CapabilityResult<()> {
        let status = tokio::process::Command::new(&self.program)
            .arg("--lang")
            .arg(locale)
            .arg("--")
            .arg(text)
            .status()
            .await
            .map_err(|e| CapabilityError::new(format!("Failed to run '{}': {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(CapabilityError::new(format!(
                "'{}' exited with {}",
                self.program, status
            )))
        }
    }
}

/// Prompts on stdout; answers arrive from whoever owns stdin
///
/// A line-oriented front end reads stdin itself and offers each line to
/// [`TerminalPrompter::answer`] first, so a pending confirmation gets the next line.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.lock().map(|p| p.is_some()).unwrap_or(false)
    }

    /// Resolve the pending confirmation with `line`; returns false when none is pending
    pub fn answer(&self, line: &str) -> bool {
        let sender = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };
        match sender {
            Some(sender) => {
                let _ = sender.send(is_yes(line));
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        let (tx, rx) = oneshot::channel();
        match self.pending.lock() {
            Ok(mut pending) => *pending = Some(tx),
            Err(_) => return false,
        }

        let mut stdout = tokio::io::stdout();
        let prompt = format!("{} [y/N] ", message);
        if stdout.write_all(prompt.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    async fn notify(&self, message: &str) {
        let mut stdout = tokio::io::stdout();
        let line = format!("{}\n", message);
        let _ = stdout.write_all(line.as_bytes()).await;
        let _ = stdout.flush().await;
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct NoopClipboard;

    #[async_trait]
    impl Clipboard for NoopClipboard {
        async fn write_text(&self, _text: &str) -> CapabilityResult<()> {
            Ok(())
        }
    }

    struct NoopSynth;

    #[async_trait]
    impl SpeechSynthesizer for NoopSynth {
        async fn speak(&self, _text: &str, _locale: &str) -> CapabilityResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_availability_reflects_capabilities() {
        let mut caps =
            Capabilities::basic(Arc::new(NoopClipboard), Arc::new(TerminalPrompter::new()));
        assert_eq!(caps.availability(), Availability::default());

        caps.synthesizer = Capability::Available(Arc::new(NoopSynth));
        let availability = caps.availability();
        assert!(availability.speech_synthesis);
        assert!(!availability.speech_recognition);
        assert!(!availability.share);
    }

    #[test]
    fn test_recognition_events_forward_to_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = RecognitionEvents::new(tx);
        events.started();
        events.result("hello");
        events.ended();

        assert_eq!(rx.try_recv().unwrap(), Event::RecognitionStarted);
        assert_eq!(rx.try_recv().unwrap(), Event::RecognitionResult("hello".into()));
        assert_eq!(rx.try_recv().unwrap(), Event::RecognitionEnded);
    }

    #[test]
    fn test_recognition_events_after_shutdown() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Must not panic
        RecognitionEvents::new(tx).failed("aborted");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[tokio::test]
    async fn test_terminal_prompter_takes_next_answer() {
        let prompter = Arc::new(TerminalPrompter::new());
        assert!(!prompter.answer("y"));

        let waiting = Arc::clone(&prompter);
        let confirm = tokio::spawn(async move { waiting.confirm("Clear all translation history?").await });
        while !prompter.is_waiting() {
            tokio::task::yield_now().await;
        }
        assert!(prompter.answer("yes\n"));
        assert!(confirm.await.unwrap());
        assert!(!prompter.is_waiting());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_synthesizer_ends_options_before_text() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("speak.sh");
        let args_file = dir.path().join("args.txt");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n", args_file.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let synth = CommandSynthesizer::new(script.to_string_lossy());
        synth.speak("-5 ዲግሪ", "am-ET").await.unwrap();

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.lines().collect::<Vec<_>>(), vec!["--lang", "am-ET", "--", "-5 ዲግሪ"]);
    }

    #[tokio::test]
    async fn test_command_synthesizer_missing_program() {
        let synth = CommandSynthesizer::new("quanqua-definitely-not-a-program");
        let err = synth.speak("ሰላም", "am-ET").await.unwrap_err();
        assert!(err.to_string().contains("quanqua-definitely-not-a-program"));
    }
}
