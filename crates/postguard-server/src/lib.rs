//! Postguard Server - HTTP API server.
//!
//! This crate exposes the moderation pipeline over HTTP.
//!
//! ## Endpoints
//!
//! - `POST /api/moderate` - Moderate a post
//! - `GET /api/config` - Get the active moderation config
//! - `PUT /api/config` - Replace the moderation config
//! - `GET /api/rules` - List custom rules (`?platform=` to filter)
//! - `POST /api/rules` - Add or replace a custom rule
//! - `GET /api/rules/{id}` - Get a custom rule
//! - `DELETE /api/rules/{id}` - Remove a custom rule
//! - `PUT /api/rules/{id}/enabled` - Enable or disable a custom rule
//! - `GET /api/health` - Liveness check
//!
//! ## Example
//!
//! ```no_run
//! use postguard_core::ModerationConfig;
//! use postguard_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default(), ModerationConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod handlers;
pub mod models;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, post, put};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use postguard_core::ModerationConfig;

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default server host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 3000).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, ServerError> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("{}:{}", host, self.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/moderate", post(handlers::moderate))
        .route(
            "/api/config",
            get(handlers::get_config).put(handlers::update_config),
        )
        .route(
            "/api/rules",
            get(handlers::get_rules).post(handlers::save_rule),
        )
        .route(
            "/api/rules/{id}",
            get(handlers::get_rule).delete(handlers::delete_rule),
        )
        .route("/api/rules/{id}/enabled", put(handlers::set_rule_enabled))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given moderation configuration.
    pub fn new(
        config: ServerConfig,
        moderation: ModerationConfig,
    ) -> std::result::Result<Self, ServerError> {
        Self::with_state(config, AppState::new(moderation))
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let addr = config.socket_addr()?;
        Ok(Self {
            router: router(state),
            addr,
        })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    fn bind(&self) -> std::result::Result<tokio::net::TcpListener, ServerError> {
        let bind_err = |e| ServerError::BindError(self.addr, e);

        let socket = Socket::new(
            Domain::for_address(self.addr),
            Type::STREAM,
            Some(Protocol::TCP),
        )
        .map_err(bind_err)?;

        // Allow rebinding while old sockets linger in TIME_WAIT
        socket.set_reuse_address(true).map_err(bind_err)?;
        socket.bind(&self.addr.into()).map_err(bind_err)?;
        socket.listen(128).map_err(bind_err)?;
        socket.set_nonblocking(true).map_err(bind_err)?;

        let std_listener: std::net::TcpListener = socket.into();
        tokio::net::TcpListener::from_std(std_listener).map_err(bind_err)
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the server until `shutdown` resolves, then drains connections.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::result::Result<(), ServerError> {
        let listener = self.bind()?;
        info!("Starting Postguard API server on {}", self.addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        info!("Postguard API server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        router(AppState::default())
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn brand_rule() -> Value {
        json!({
            "id": "brand",
            "name": "Brand safety",
            "patterns": ["acme", "/compet(itor|ition)/"],
            "severity": "high",
            "platforms": ["twitter", "linkedin"]
        })
    }

    #[test]
    fn server_config_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");

        let config = ServerConfig::default().with_host("::1").with_port(8080);
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::1]:8080");

        assert!(ServerConfig::default()
            .with_host("not a host")
            .socket_addr()
            .is_err());
    }

    #[tokio::test]
    async fn test_moderate_safe_content() {
        let (status, json) = send(
            create_test_app(),
            "POST",
            "/api/moderate",
            Some(json!({"content": "Excited to share our quarterly update", "platform": "facebook"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_flagged"], false);
        assert_eq!(json["safe_to_post"], true);
        assert_eq!(json["overall_severity"], "low");
        assert_eq!(json["confidence_score"], 1.0);
        assert!(json["flags"].as_array().unwrap().is_empty());
        assert!(json["processing_time_ms"].is_number());
    }

    #[tokio::test]
    async fn test_moderate_spam() {
        let (status, json) = send(
            create_test_app(),
            "POST",
            "/api/moderate",
            Some(json!({
                "content": "BUY NOW!!! LIMITED TIME OFFER!!! FREE MONEY!!!",
                "content_type": "text",
                "platform": "twitter"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_flagged"], true);
        let flags = json["flags"].as_array().unwrap();
        assert!(flags.iter().any(|f| f["type"] == "spam"));
    }

    #[tokio::test]
    async fn test_moderate_validation_errors() {
        let cases = [
            (json!({"content": "   ", "platform": "twitter"}), "empty_content"),
            (
                json!({"content": "a".repeat(10_001), "platform": "twitter"}),
                "content_too_long",
            ),
            (
                json!({"content": "hi", "content_type": "gif", "platform": "twitter"}),
                "invalid_content_type",
            ),
            (json!({"content": "hi", "platform": "myspace"}), "invalid_platform"),
        ];

        for (body, code) in cases {
            let (status, json) = send(create_test_app(), "POST", "/api/moderate", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["code"], code);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_shape() {
        let mut rule = brand_rule();
        rule.as_object_mut().unwrap().remove("platforms");

        let cases = [
            ("POST", "/api/moderate", json!({"content": "hi", "platform": 5})),
            ("POST", "/api/rules", rule),
            ("PUT", "/api/config", json!({"enable_spam_detection": "yes"})),
        ];

        for (method, uri, body) in cases {
            let (status, json) = send(create_test_app(), method, uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
            assert_eq!(json["code"], "bad_request");
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_config_threshold_kept_as_sent() {
        let app = create_test_app();

        let (status, json) = send(
            app.clone(),
            "PUT",
            "/api/config",
            Some(json!({"sensitivity_threshold": 3.5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "bad_request");

        let (status, _) = send(
            app.clone(),
            "PUT",
            "/api/config",
            Some(json!({"sensitivity_threshold": 0.25})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(app, "GET", "/api/config", None).await;
        assert_eq!(json["sensitivity_threshold"], 0.25);
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let app = create_test_app();

        let (status, json) = send(app.clone(), "GET", "/api/config", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["enable_spam_detection"], true);
        assert!((json["sensitivity_threshold"].as_f64().unwrap() - 0.7).abs() < 1e-6);

        let (status, json) = send(
            app.clone(),
            "PUT",
            "/api/config",
            Some(json!({
                "enable_spam_detection": false,
                "rules": [{
                    "id": "bad",
                    "name": "Bad",
                    "patterns": ["/[oops/"],
                    "severity": "low",
                    "platforms": ["twitter"]
                }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["pattern_errors"][0]["rule_id"], "bad");

        let (_, json) = send(app, "GET", "/api/config", None).await;
        assert_eq!(json["enable_spam_detection"], false);
        assert_eq!(json["rules"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rule_lifecycle() {
        let app = create_test_app();

        let (status, json) = send(app.clone(), "POST", "/api/rules", Some(brand_rule())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["pattern_errors"].as_array().unwrap().is_empty());

        let (status, json) = send(app.clone(), "GET", "/api/rules/brand", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Brand safety");
        assert_eq!(json["enabled"], true);

        let (_, json) = send(app.clone(), "GET", "/api/rules?platform=linkedin", None).await;
        assert_eq!(json["total"], 1);
        let (_, json) = send(app.clone(), "GET", "/api/rules?platform=tiktok", None).await;
        assert_eq!(json["total"], 0);

        let (_, json) = send(
            app.clone(),
            "POST",
            "/api/moderate",
            Some(json!({"content": "Way better than our competitor", "platform": "twitter"})),
        )
        .await;
        let flags = json["flags"].as_array().unwrap();
        let custom = flags
            .iter()
            .find(|f| f["type"] == "custom_rule_brand")
            .unwrap();
        assert_eq!(custom["severity"], "high");
        assert_eq!(custom["flagged_text"], "competitor");
        assert_eq!(json["safe_to_post"], false);

        let (status, json) = send(
            app.clone(),
            "PUT",
            "/api/rules/brand/enabled",
            Some(json!({"enabled": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["enabled"], false);

        let (_, json) = send(
            app.clone(),
            "POST",
            "/api/moderate",
            Some(json!({"content": "Way better than our competitor", "platform": "twitter"})),
        )
        .await;
        let flags = json["flags"].as_array().unwrap();
        assert!(!flags.iter().any(|f| f["type"] == "custom_rule_brand"));

        let (status, _) = send(app.clone(), "DELETE", "/api/rules/brand", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(app, "GET", "/api/rules", None).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_rule_is_404() {
        let app = create_test_app();

        let (status, json) = send(app.clone(), "GET", "/api/rules/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "not_found");

        let (status, _) = send(app.clone(), "DELETE", "/api/rules/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            app,
            "PUT",
            "/api/rules/missing/enabled",
            Some(json!({"enabled": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rules_invalid_platform_filter() {
        let (status, json) = send(create_test_app(), "GET", "/api/rules?platform=myspace", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_platform");
    }

    #[tokio::test]
    async fn test_save_rule_requires_id() {
        let mut rule = brand_rule();
        rule["id"] = json!(" ");
        let (status, json) = send(create_test_app(), "POST", "/api/rules", Some(rule)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(create_test_app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["timestamp"].is_string());
    }
}
