use clap::Parser;
use quanqua::{LANGUAGES, LanguageCode};
use quanqua_client::{
    Capabilities, Capability, ClientConfig, ClientRuntime, CommandSynthesizer, Event, FileStore,
    ProxyClient, RuntimeHandle, SystemClipboard, TerminalPrompter, TranslatorState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;

/// Interactive translator for English, Amharic, Tigrigna and Afaan Oromo
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Origin of the translation proxy
    #[arg(long, env = "QUANQUA_PROXY_URL")]
    proxy_url: Option<String>,

    /// Directory for persisted history
    #[arg(long, env = "QUANQUA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Program used to speak translations, e.g. espeak-ng
    #[arg(long)]
    speak_command: Option<String>,

    /// Initial source language
    #[arg(long)]
    from: Option<LanguageCode>,

    /// Initial target language
    #[arg(long)]
    to: Option<LanguageCode>,
}

const HELP: &str = "\
Type text to translate it. Commands:
  :from <code>       set source language
  :to <code>         set target language
  :swap              swap languages and texts
  :clear             clear input and result
  :history           list saved translations
  :load <id>         restore a saved translation
  :delete <id>       delete a saved translation
  :clear-history     delete all saved translations
  :copy              copy the translation
  :share             share the translation
  :speak             read the translation aloud
  :listen            voice input
  :languages         list supported languages
  :help              show this help
  :quit              exit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quanqua_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(proxy_url) = args.proxy_url {
        config.proxy_url = proxy_url;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(source) = args.from {
        config.settings.default_source = source;
    }
    if let Some(target) = args.to {
        config.settings.default_target = target;
    }

    let backend = ProxyClient::new(&config.proxy_url)?;
    let store = FileStore::new(&config.data_dir);
    info!(proxy = %backend.endpoint(), data_dir = %store.dir().display(), "Starting client");

    let prompter = Arc::new(TerminalPrompter::new());
    let mut capabilities = Capabilities::basic(Arc::new(SystemClipboard), prompter.clone());
    if let Some(program) = args.speak_command {
        capabilities.synthesizer = Capability::Available(Arc::new(CommandSynthesizer::new(program)));
    }

    let runtime = ClientRuntime::new(
        config.settings,
        config.history_key,
        Arc::new(backend),
        Arc::new(store),
        capabilities,
    );
    let handle = runtime.handle();
    let runtime_task = tokio::spawn(runtime.run());
    let render_task = tokio::spawn(render(handle.subscribe()));

    print_languages_line(&handle.state());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if prompter.answer(&line) {
            continue;
        }
        if !dispatch(&handle, line.trim_end()) {
            break;
        }
    }

    handle.shutdown();
    render_task.abort();
    runtime_task.await?;
    Ok(())
}

/// Turn one input line into events; false means quit
fn dispatch(handle: &RuntimeHandle, line: &str) -> bool {
    let Some(command) = line.strip_prefix(':') else {
        handle.send(Event::InputChanged(line.to_string()));
        return true;
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "from" | "to" => match argument.parse::<LanguageCode>() {
            Ok(code) if name == "from" => handle.send(Event::SourceLanguageSelected(code)),
            Ok(code) => handle.send(Event::TargetLanguageSelected(code)),
            Err(e) => eprintln!("{}", e),
        },
        "swap" => handle.send(Event::SwapLanguages),
        "clear" => handle.send(Event::Clear),
        "history" => print_history(&handle.state()),
        "load" => handle.send(Event::LoadFromHistory(argument.to_string())),
        "delete" => handle.send(Event::DeleteHistoryItem(argument.to_string())),
        "clear-history" => handle.send(Event::RequestClearHistory),
        "copy" => handle.send(Event::CopyPressed),
        "share" => handle.send(Event::SharePressed),
        "speak" => handle.send(Event::SpeakPressed),
        "listen" => handle.send(Event::VoiceInputPressed),
        "languages" => {
            for language in &LANGUAGES {
                println!(
                    "{} {}  {} ({})",
                    language.flag(),
                    language.code,
                    language.display_name,
                    language.native_name
                );
            }
        }
        "help" => println!("{}", HELP),
        "quit" | "q" => return false,
        other => eprintln!("Unknown command ':{}', try :help", other),
    }
    true
}

/// Print results and errors as the state changes
async fn render(mut state: watch::Receiver<TranslatorState>) {
    let mut last = state.borrow().clone();
    while state.changed().await.is_ok() {
        let current = state.borrow_and_update().clone();

        if current.source_lang != last.source_lang || current.target_lang != last.target_lang {
            print_languages_line(&current);
        }
        if current.loading && !last.loading {
            println!("Translating...");
        }
        if current.translated_text != last.translated_text && !current.translated_text.is_empty() {
            println!("→ {}", current.translated_text);
        }
        if current.error != last.error {
            if let Some(error) = &current.error {
                println!("⚠ {}", error);
            }
        }
        if current.copied && !last.copied {
            println!("Copied!");
        }
        if current.shared && !last.shared {
            println!("Shared!");
        }
        if current.listening && !last.listening {
            println!("Listening...");
        }

        last = current;
    }
}

fn print_languages_line(state: &TranslatorState) {
    let source = state.source_lang.language();
    let target = state.target_lang.language();
    println!(
        "{} {} → {} {}",
        source.flag(),
        source.display_name,
        target.flag(),
        target.display_name
    );
}

fn print_history(state: &TranslatorState) {
    if state.history.is_empty() {
        println!("No history yet");
        return;
    }
    for entry in state.history.entries() {
        let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "[{}] {} {} → {}  {} → {}",
            entry.id, when, entry.source_lang, entry.target_lang, entry.source_text, entry.translated_text
        );
    }
}
