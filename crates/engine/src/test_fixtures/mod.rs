//! Shared test data and a capturing HTTP server standing in for Discord.
//!
//! # Usage
//!
//! ```rust,ignore
//! let server = CaptureServer::start(|_method, _path| (StatusCode::OK, json!({"id": "1"}))).await;
//! let sink = WebhookSink::new(&server.url("/webhook"), clock);
//! sink.deliver(&test_fixtures::submission()).await?;
//! assert_eq!(server.requests().await.len(), 1);
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use rushroyale_domain::{
    CardSlot, Catalog, Community, PlayerBuild, RegistrationContext, Submission,
};
use serde_json::Value;
use tokio::sync::Mutex;

// =============================================================================
// Registrations
// =============================================================================

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::default())
}

pub fn context() -> RegistrationContext {
    RegistrationContext {
        discord_id: "123456789012345678".to_string(),
        username: "royal#0001".to_string(),
        guild_id: Some("998877665544332211".to_string()),
    }
}

/// Complete build with Phoenix and Twins: adjusted crit 70, total 44, Lightweight.
pub fn build() -> PlayerBuild {
    PlayerBuild {
        game_username: "RoyalPlayer".to_string(),
        game_id: "987654".to_string(),
        crit_level: Some(50),
        legendarity: Some(30),
        perks_level: Some(20),
        community: Some(Community::Listed("Ronin Gaming".to_string())),
        hero: "Zeus (Legendary)".to_string(),
        hero_level: Some(9),
        hero_item: Some("Star Gaze".to_string()),
        hero_item_level: Some(4),
        cards: [
            CardSlot::new("Phoenix", 12),
            CardSlot::new("Archer", 15),
            CardSlot::new("Twins", 16),
            CardSlot::new("Bard", 10),
            CardSlot::new("Hunter", 11),
        ],
        ..PlayerBuild::default()
    }
}

/// # Panics
///
/// Panics if the fixture build stops passing validation.
pub fn submission() -> Submission {
    Submission::prepare(context(), build(), &Catalog::default())
        .expect("fixture submission should be valid")
}

// =============================================================================
// Capture Server
// =============================================================================

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

type Responder = Arc<dyn Fn(&Method, &str) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct CaptureState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    respond: Responder,
}

/// Local HTTP server on an ephemeral port that records every request.
pub struct CaptureServer {
    base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CaptureServer {
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(
        respond: impl Fn(&Method, &str) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = CaptureState {
            requests: requests.clone(),
            respond: Arc::new(respond),
        };
        let router = Router::new().fallback(capture).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind capture server");
        let addr = listener.local_addr().expect("capture server address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn capture(
    State(state): State<CaptureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (status, response) = (state.respond)(&method, &path);
    state.requests.lock().await.push(CapturedRequest {
        method,
        path,
        authorization,
        body,
    });
    (status, Json(response))
}
