//! Client runtime against a real proxy server backed by a fake Google endpoint

use quanqua::{ProviderConfig, TranslationProxy};
use quanqua_client::{
    Capabilities, ClientRuntime, Clipboard, Event, HistoryLog, KeyValueStore, MemoryStore, Phase,
    Prompter, ProxyClient, RuntimeHandle, TranslatorState,
};
use quanqua_client::capability::CapabilityResult;
use quanqua_client::translator::TranslatorSettings;
use quanqua_web::{AppState, router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "quanqua-translation-history";

struct NoClipboard;

#[async_trait::async_trait]
impl Clipboard for NoClipboard {
    async fn write_text(&self, _text: &str) -> CapabilityResult<()> {
        Ok(())
    }
}

struct Decline;

#[async_trait::async_trait]
impl Prompter for Decline {
    async fn confirm(&self, _message: &str) -> bool {
        false
    }

    async fn notify(&self, _message: &str) {}
}

/// Serve the proxy on an ephemeral port and return its origin
async fn start_proxy(google: &MockServer) -> String {
    let config = ProviderConfig {
        api_key: Some("test-key".to_string()),
        endpoint: format!("{}/language/translate/v2", google.uri()),
    };
    let proxy = TranslationProxy::from_config(&config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(AppState::new(proxy))).await.unwrap();
    });
    format!("http://{}", addr)
}

fn start_client(proxy_url: &str, store: Arc<MemoryStore>) -> RuntimeHandle {
    let settings = TranslatorSettings {
        debounce: Duration::from_millis(50),
        ..TranslatorSettings::default()
    };
    let runtime = ClientRuntime::new(
        settings,
        KEY,
        Arc::new(ProxyClient::new(proxy_url).unwrap()),
        store,
        Capabilities::basic(Arc::new(NoClipboard), Arc::new(Decline)),
    );
    let handle = runtime.handle();
    tokio::spawn(runtime.run());
    handle
}

/// Wait until the translator settles into a non-pending phase
async fn settled(handle: &RuntimeHandle) -> TranslatorState {
    let mut state = handle.subscribe();
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        state.wait_for(|s| !matches!(s.phase(), Phase::Pending | Phase::Idle)),
    )
    .await
    .expect("translator did not settle");
    result.expect("runtime stopped").clone()
}

#[tokio::test]
async fn test_hello_to_amharic_through_proxy() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "q": "Hello",
            "source": "en",
            "target": "am",
            "format": "text"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"translations": [{"translatedText": "ሰላም"}]}
        })))
        .expect(1)
        .mount(&google)
        .await;

    let proxy_url = start_proxy(&google).await;
    let store = Arc::new(MemoryStore::new());
    let handle = start_client(&proxy_url, store.clone());

    handle.send(Event::TargetLanguageSelected(quanqua::LanguageCode::Am));
    handle.send(Event::InputChanged("Hello".to_string()));

    let state = settled(&handle).await;
    assert_eq!(state.translated_text, "ሰላም");
    assert_eq!(state.error, None);
    assert_eq!(state.history.len(), 1);

    let stored = HistoryLog::from_bytes(&store.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.entries()[0].source_text, "Hello");
    assert_eq!(stored.entries()[0].translated_text, "ሰላም");
}

#[tokio::test]
async fn test_provider_error_reaches_client() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": {"message": "API key not valid"}})),
        )
        .mount(&google)
        .await;

    let proxy_url = start_proxy(&google).await;
    let handle = start_client(&proxy_url, Arc::new(MemoryStore::new()));
    handle.send(Event::InputChanged("Hello".to_string()));

    let state = settled(&handle).await;
    assert_eq!(state.error.as_deref(), Some("API key not valid"));
    assert_eq!(state.translated_text, "");
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_unreachable_proxy_reports_error() {
    let store = Arc::new(MemoryStore::new());
    let handle = start_client("http://127.0.0.1:9", store.clone());
    handle.send(Event::InputChanged("Hello".to_string()));

    let state = settled(&handle).await;
    assert!(!state.error.as_deref().unwrap_or_default().is_empty());
    assert_eq!(state.translated_text, "");
    assert!(state.history.is_empty());
    assert!(store.get(KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_empty_input_never_calls_proxy() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&google)
        .await;

    let proxy_url = start_proxy(&google).await;
    let handle = start_client(&proxy_url, Arc::new(MemoryStore::new()));
    handle.send(Event::InputChanged("   ".to_string()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(handle.state().phase(), Phase::Idle);
}
