//! Shared helpers for integration tests: an in-process mock Parse upstream
//! plus request recording.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use parsebridge_mcp::registry::ToolRegistry;
use parsebridge_rest::client::{HEADER_APP_ID, HEADER_MASTER_KEY, HEADER_REST_KEY, ParseClient};
use parsebridge_rest::config::ParseConfig;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_APP_ID: &str = "it-app-id";
pub const TEST_REST_KEY: &str = "it-rest-key";
pub const TEST_MASTER_KEY: &str = "it-master-key";

/// One captured upstream request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub app_id: Option<String>,
    pub master_key: Option<String>,
    pub rest_key: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn capture(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            method: method.as_str().to_string(),
            path: uri.path().to_string(),
            query: uri.query().unwrap_or("").to_string(),
            app_id: header(HEADER_APP_ID),
            master_key: header(HEADER_MASTER_KEY),
            rest_key: header(HEADER_REST_KEY),
            body: serde_json::from_slice(body).ok(),
        }
    }

    /// Decoded query pairs, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

pub fn recorder() -> Recorder {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(recorder: &Recorder) -> Vec<RecordedRequest> {
    recorder.lock().expect("recorder lock").clone()
}

/// Mock upstream; shuts down when dropped.
pub struct MockUpstream {
    pub base_url: String,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(app: axum::Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(shutdown_tx),
        }
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Registry wired to a mock upstream, with both credential tiers configured.
pub fn registry_for(base_url: &str) -> ToolRegistry {
    let config = ParseConfig {
        server_url: base_url.to_string(),
        app_id: TEST_APP_ID.to_string(),
        rest_key: Some(TEST_REST_KEY.to_string()),
        master_key: Some(TEST_MASTER_KEY.to_string()),
        allow_insecure_tls: false,
    };
    ToolRegistry::new(ParseClient::new(config).expect("client"))
}

/// Parse the uniform text-content envelope back into JSON.
pub fn result_json(result: &CallToolResult) -> Value {
    let value = serde_json::to_value(result).expect("CallToolResult serializes");
    let text = value
        .get("content")
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .expect("content[0].text");
    serde_json::from_str(text).expect("text content is JSON")
}
