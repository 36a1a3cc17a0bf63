//! Fake admin API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `POST /api/v1/admin/participants/invite-bulk` and records
//! every request. By default it answers the way the real service does:
//! per-participant email checks, `success` when at least one invite was
//! created, and `errors` only when something was rejected.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeInviteApi::start().await.unwrap();
//! api.reply_with(StatusCode::FORBIDDEN, json!({ "detail": "Admin only" })).await;
//! // Point the client at api.base_url()
//! ```

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const BULK_INVITE_ROUTE: &str = "/api/v1/admin/participants/invite-bulk";

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone, Default)]
enum Reply {
    /// Behave like the real service.
    #[default]
    Emulate,
    Canned(StatusCode, Value),
    Stall(Duration),
}

#[derive(Default)]
struct ApiState {
    requests: Vec<RecordedRequest>,
    reply: Reply,
}

/// Handle to the running fake admin API.
pub struct FakeInviteApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeInviteApi {
    /// Start the fake API on a random port. Returns once the server is
    /// listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route(BULK_INVITE_ROUTE, post(invite_bulk))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// API base URL (e.g. `http://127.0.0.1:PORT/api/v1`).
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Full bulk-invite endpoint URL.
    pub fn bulk_invite_url(&self) -> String {
        format!("http://{}{}", self.addr, BULK_INVITE_ROUTE)
    }

    /// Answer every following request with a fixed status and body.
    pub async fn reply_with(&self, status: StatusCode, body: Value) {
        self.state.lock().await.reply = Reply::Canned(status, body);
    }

    /// Hold every following request for `delay` before answering.
    pub async fn stall_for(&self, delay: Duration) {
        self.state.lock().await.reply = Reply::Stall(delay);
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn invite_bulk(
    State(state): State<Arc<Mutex<ApiState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let reply = {
        let mut state = state.lock().await;
        state.requests.push(RecordedRequest {
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: body.clone(),
        });
        state.reply.clone()
    };

    match reply {
        Reply::Emulate => emulate(&body),
        Reply::Canned(status, body) => (status, Json(body)),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            emulate(&body)
        }
    }
}

fn emulate(body: &Value) -> (StatusCode, Json<Value>) {
    let participants = body["participants"].as_array().cloned().unwrap_or_default();
    if participants.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "No participants provided" })),
        );
    }

    let mut errors = Vec::new();
    let mut count = 0u64;
    for (idx, participant) in participants.iter().enumerate() {
        let email = participant["email"].as_str().unwrap_or("").trim();
        if email.is_empty() || !email.contains('@') {
            errors.push(format!("Participant {}: Invalid email", idx + 1));
        } else {
            count += 1;
        }
    }

    let mut result = json!({
        "success": count > 0,
        "count": count,
        "emails_sent": count,
        "total_requested": participants.len(),
    });
    if !errors.is_empty() {
        result["error_count"] = json!(errors.len());
        result["errors"] = json!(errors);
    }
    (StatusCode::OK, Json(result))
}
