use clap::{Arg, Command};
use quanqua::{
    LANGUAGES, MockMode, MockTranslator, ProviderConfig, TranslateRequest, TranslationProxy,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quanqua=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("quanqua")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate text between English, Amharic, Tigrigna and Afaan Oromo")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required_unless_present("languages")
                .index(1),
        )
        .arg(
            Arg::new("target")
                .help("Target language code (en, am, ti, om)")
                .required_unless_present("languages")
                .index(2),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code")
                .default_value("en"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of Google Translate")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("languages")
                .long("languages")
                .short('l')
                .help("List supported languages and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("languages") {
        for language in &LANGUAGES {
            println!(
                "{} {}  {} ({})",
                language.flag(),
                language.code,
                language.display_name,
                language.native_name
            );
        }
        return Ok(());
    }

    let text = matches.get_one::<String>("text").cloned().unwrap_or_default();
    let target = matches.get_one::<String>("target").cloned().unwrap_or_default();
    let source = matches.get_one::<String>("source").cloned().unwrap_or_default();

    let proxy = if matches.get_flag("mock") {
        TranslationProxy::new(Arc::new(MockTranslator::new(MockMode::Suffix)))
    } else {
        let config = ProviderConfig::from_env();
        if !config.is_configured() {
            eprintln!("❌ {} environment variable not set", quanqua::config::API_KEY_VAR);
            eprintln!("   Or use --mock to use mock translator");
        }
        TranslationProxy::from_config(&config)?
    };

    match proxy.handle(TranslateRequest::new(text, source, target)).await {
        Ok(response) => {
            println!("{}", response.translated_text);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {} (status {})", e, e.status_code());
            Err(e.into())
        }
    }
}
