//! Welcome document package generation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use haven_core::letters;
use haven_core::validate::{is_valid_email, missing_fields, sanitize_opt};
use haven_core::Error;
use haven_mailer::Message;

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::{ApiJson, DocumentRequest};

/// `POST /api/documents`.
///
/// Generates the welcome letter, housing agreement, and intake checklist
/// for a new resident, plus the notification email ready to send. Nothing
/// is stored; the documents live only in the response.
pub async fn generate_documents(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DocumentRequest>,
) -> ApiResult<Json<Value>> {
    let name = sanitize_opt(request.name.as_deref());
    let email = sanitize_opt(request.email.as_deref());

    let missing = missing_fields(&[("name", name.as_deref()), ("email", email.as_deref())]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(name), Some(email)) = (name, email) else {
        return Err(ApiError::Internal);
    };

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }

    let move_in_date = sanitize_opt(request.move_in_date.as_deref());
    let documents = json!({
        "welcomeLetter": letters::welcome_letter(&state.org, &name),
        "housingAgreement": letters::housing_agreement(&name, move_in_date.as_deref()),
        "intakeChecklist": letters::intake_checklist(&name),
    });

    let email_data = Message::new(
        &email,
        format!("Welcome to {} - {name}", state.org.name),
        format!(
            "Dear {name}, your document package has been generated and will be sent \
             shortly. We look forward to supporting you on your journey."
        ),
    );

    tracing::info!(resident = %name, "Document package generated");

    Ok(Json(json!({
        "success": true,
        "message": format!("Document package generated for {name}"),
        "documents": documents,
        "emailData": email_data,
        "timestamp": Utc::now(),
    })))
}
