//! Request handlers, grouped by endpoint family.

mod appointments;
mod automation;
mod docs;
mod documents;
mod donations;
mod email;
mod forms;

pub use appointments::{appointments_get, appointments_post};
pub use automation::{automation_get, automation_post};
pub use docs::api_docs;
pub use documents::generate_documents;
pub use donations::{donation_analytics, process_donation};
pub use email::{email_free, email_gmail, send_email};
pub use forms::submit_form;

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use haven_mailer::provider::Mailer;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::server::AppState;

/// `GET /health` liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /api/hello` canned greeting.
pub async fn hello(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": format!("Hello from {} API", state.org.name),
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/status` uptime and service configuration summary.
pub async fn server_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.start_time.elapsed().as_secs(),
        "services": {
            "emailProviders": state.chain.configured_count(),
            "gmail": state.gmail.is_configured(),
            "webhook": state.webhook.is_some(),
        },
        "timestamp": Utc::now(),
    }))
}

/// Fallback for registered routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
pub(crate) fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(crate::server::ServerConfig::default()))
}
