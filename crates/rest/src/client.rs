//! Request dispatch against the Parse Server REST API.
//!
//! One [`ParseClient`] is built at startup from a validated [`ParseConfig`]
//! and shared by every tool invocation. It is stateless apart from the
//! underlying `reqwest` connection pool; no retries, no caching.

use crate::config::ParseConfig;
use crate::error::{ParseRestError, Result};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

pub const HEADER_APP_ID: &str = "X-Parse-Application-Id";
pub const HEADER_MASTER_KEY: &str = "X-Parse-Master-Key";
pub const HEADER_REST_KEY: &str = "X-Parse-REST-API-Key";

/// Method and body for a single dispatch. Consumed exactly once.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            body: None,
        }
    }
}

/// HTTP client bound to one Parse Server deployment.
#[derive(Debug, Clone)]
pub struct ParseClient {
    config: ParseConfig,
    client: Client,
}

impl ParseClient {
    /// Build a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: ParseConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if config.allow_insecure_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Credential tier used when a call site does not force the master key:
    /// the master key is the default only when no REST key is configured.
    #[must_use]
    pub fn default_use_master_key(&self) -> bool {
        self.config.rest_key.is_none() && self.config.master_key.is_some()
    }

    /// Issue one request and return the parsed JSON response body.
    ///
    /// Always sends the application-id and JSON content-type headers, plus at
    /// most one secret header: the master key when requested and configured,
    /// otherwise the REST key when configured.
    ///
    /// # Errors
    ///
    /// - [`ParseRestError::Upstream`] for any non-2xx response (status + raw
    ///   body text, no retry);
    /// - [`ParseRestError::Transport`] for connection-level failures;
    /// - [`ParseRestError::InvalidResponse`] when a 2xx body is not JSON.
    pub async fn dispatch(
        &self,
        path: &str,
        options: RequestOptions,
        use_master_key: bool,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.server_url.trim_end_matches('/'), path);

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .header(HEADER_APP_ID, &self.config.app_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if use_master_key && let Some(master_key) = &self.config.master_key {
            request = request.header(HEADER_MASTER_KEY, master_key);
        } else if let Some(rest_key) = &self.config.rest_key {
            request = request.header(HEADER_REST_KEY, rest_key);
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        debug!(method = %options.method, path, use_master_key, "dispatching parse request");

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ParseRestError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        // Parse returns `{}` for deletes; tolerate fully empty bodies too.
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| {
            ParseRestError::InvalidResponse(format!("{status} response was not JSON: {e}"))
        })
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.dispatch(path, RequestOptions::get(), self.default_use_master_key())
            .await
    }

    pub async fn get_master(&self, path: &str) -> Result<Value> {
        self.dispatch(path, RequestOptions::get(), true).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.dispatch(
            path,
            RequestOptions::post(body),
            self.default_use_master_key(),
        )
        .await
    }

    pub async fn post_master(&self, path: &str, body: Value) -> Result<Value> {
        self.dispatch(path, RequestOptions::post(body), true).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.dispatch(
            path,
            RequestOptions::put(body),
            self.default_use_master_key(),
        )
        .await
    }

    pub async fn put_master(&self, path: &str, body: Value) -> Result<Value> {
        self.dispatch(path, RequestOptions::put(body), true).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.dispatch(
            path,
            RequestOptions::delete(),
            self.default_use_master_key(),
        )
        .await
    }

    pub async fn delete_master(&self, path: &str) -> Result<Value> {
        self.dispatch(path, RequestOptions::delete(), true).await
    }
}

#[cfg(test)]
mod tests {
    use super::{HEADER_APP_ID, HEADER_MASTER_KEY, HEADER_REST_KEY, ParseClient, RequestOptions};
    use crate::config::ParseConfig;
    use crate::error::ParseRestError;
    use axum::Router;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, StatusCode, Uri};
    use axum::routing::any;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    fn config_for(base_url: String) -> ParseConfig {
        ParseConfig {
            server_url: base_url,
            app_id: "test-app-id".to_string(),
            rest_key: Some("test-rest-key".to_string()),
            master_key: Some("test-master-key".to_string()),
            allow_insecure_tls: false,
        }
    }

    async fn spawn_echo() -> (String, tokio::sync::oneshot::Sender<()>) {
        async fn echo_handler(
            method: Method,
            uri: Uri,
            headers: HeaderMap,
            body: Bytes,
        ) -> axum::Json<Value> {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            axum::Json(json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query().unwrap_or(""),
                "appId": header(HEADER_APP_ID),
                "masterKey": header(HEADER_MASTER_KEY),
                "restKey": header(HEADER_REST_KEY),
                "contentType": header("content-type"),
                "body": String::from_utf8_lossy(&body),
            }))
        }

        let app = Router::new().route("/{*path}", any(echo_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        (format!("http://{addr}"), shutdown_tx)
    }

    #[tokio::test]
    async fn dispatch_sends_app_id_and_rest_key_by_default() {
        let (base_url, shutdown) = spawn_echo().await;
        let client = ParseClient::new(config_for(base_url)).expect("client");

        let echoed = client.get("/classes/Thing").await.expect("dispatch");

        assert_eq!(echoed["method"], "GET");
        assert_eq!(echoed["path"], "/classes/Thing");
        assert_eq!(echoed["appId"], "test-app-id");
        assert_eq!(echoed["restKey"], "test-rest-key");
        assert_eq!(echoed["masterKey"], Value::Null);
        assert_eq!(echoed["contentType"], "application/json");

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn dispatch_master_tier_sends_only_master_key() {
        let (base_url, shutdown) = spawn_echo().await;
        let client = ParseClient::new(config_for(base_url)).expect("client");

        let echoed = client.get_master("/schemas").await.expect("dispatch");

        assert_eq!(echoed["masterKey"], "test-master-key");
        assert_eq!(echoed["restKey"], Value::Null);

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn dispatch_falls_back_to_rest_key_when_master_missing() {
        let (base_url, shutdown) = spawn_echo().await;
        let config = ParseConfig {
            master_key: None,
            ..config_for(base_url)
        };
        let client = ParseClient::new(config).expect("client");

        let echoed = client.get_master("/schemas").await.expect("dispatch");

        assert_eq!(echoed["masterKey"], Value::Null);
        assert_eq!(echoed["restKey"], "test-rest-key");

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn dispatch_defaults_to_master_key_without_rest_key() {
        let (base_url, shutdown) = spawn_echo().await;
        let config = ParseConfig {
            rest_key: None,
            ..config_for(base_url)
        };
        let client = ParseClient::new(config).expect("client");
        assert!(client.default_use_master_key());

        let echoed = client.get("/classes/Thing").await.expect("dispatch");
        assert_eq!(echoed["masterKey"], "test-master-key");

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn dispatch_serializes_post_body() {
        let (base_url, shutdown) = spawn_echo().await;
        let client = ParseClient::new(config_for(base_url)).expect("client");

        let echoed = client
            .post("/classes/Thing", json!({"score": 7}))
            .await
            .expect("dispatch");

        assert_eq!(echoed["method"], "POST");
        let body: Value =
            serde_json::from_str(echoed["body"].as_str().expect("body string")).expect("json");
        assert_eq!(body, json!({"score": 7}));

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn dispatch_surfaces_upstream_status_and_body() {
        async fn not_found_handler() -> (StatusCode, axum::Json<Value>) {
            (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({"code": 101, "error": "object not found"})),
            )
        }

        let app = Router::new().route("/{*path}", any(not_found_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        let client = ParseClient::new(config_for(format!("http://{addr}"))).expect("client");
        let err = client
            .get("/classes/Thing/missing")
            .await
            .expect_err("must fail");

        match err {
            ParseRestError::Upstream { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("object not found"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn dispatch_tolerates_empty_success_body() {
        async fn empty_handler() -> StatusCode {
            StatusCode::OK
        }

        let app = Router::new().route("/{*path}", any(empty_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        let client = ParseClient::new(config_for(format!("http://{addr}"))).expect("client");
        let value = client
            .dispatch("/classes/Thing/x", RequestOptions::delete(), false)
            .await
            .expect("dispatch");
        assert_eq!(value, serde_json::json!({}));

        let _ = shutdown_tx.send(());
    }
}
