/// Translation providers
///
/// The proxy forwards every validated request to a [`MachineTranslator`]. The
/// production implementation is [`GoogleTranslateProvider`]; [`MockTranslator`] answers
/// deterministically for tests and offline use.
///
/// # Example
///
/// ```ignore
/// use quanqua::provider::{GoogleTranslateProvider, MachineTranslator};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = GoogleTranslateProvider::new(std::env::var("GOOGLE_TRANSLATE_API_KEY")?)?;
///     let translated = provider.translate("Good morning", "en", "ti").await?;
///     println!("{}", translated);
///     Ok(())
/// }
/// ```
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod translator;

pub use error::{ProxyError, ProxyResult};
pub use google_translate::{GoogleTranslateProvider, extract_error_message};
pub use mock::{MockMode, MockTranslator};
pub use translator::MachineTranslator;
