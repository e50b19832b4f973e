//! Contact form submission.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use haven_core::letters::wrap_html;
use haven_core::validate::{is_valid_email, missing_fields, sanitize_opt};
use haven_core::Error;
use haven_mailer::Message;

use crate::error::{ApiError, ApiResult};
use crate::ratelimit::{client_key, Decision};
use crate::server::AppState;
use crate::wire::{ApiJson, ContactForm};

/// `POST /api/submit-form`.
///
/// Validates and rate-limits the submission, dispatches the confirmation
/// and admin notification through the mailer chain, and fires the
/// automation webhook when one is configured. Email failures never fail
/// the request; the response carries per-email status flags instead.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(form): ApiJson<ContactForm>,
) -> ApiResult<Json<Value>> {
    let key = client_key(&headers);
    if let Decision::Limited { retry_after } = state.limiter.check(&key) {
        tracing::warn!(client = %key, "Contact form rate limited");
        return Err(ApiError::RateLimited {
            retry_after: retry_after.as_secs().max(1),
        });
    }

    let first_name = sanitize_opt(form.first_name.as_deref());
    let last_name = sanitize_opt(form.last_name.as_deref());
    let email = sanitize_opt(form.email.as_deref());
    let message = sanitize_opt(form.message.as_deref());

    let missing = missing_fields(&[
        ("firstName", first_name.as_deref()),
        ("lastName", last_name.as_deref()),
        ("email", email.as_deref()),
        ("message", message.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(first_name), Some(last_name), Some(email), Some(message)) =
        (first_name, last_name, email, message)
    else {
        return Err(ApiError::Internal);
    };

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if message.chars().count() < 10 {
        return Err(ApiError::bad_request(
            "Message must be at least 10 characters long",
        ));
    }

    let name = format!("{first_name} {last_name}");
    let phone =
        sanitize_opt(form.phone.as_deref()).unwrap_or_else(|| "Not provided".to_string());
    let service =
        sanitize_opt(form.service.as_deref()).unwrap_or_else(|| "General Inquiry".to_string());
    let timestamp = Utc::now();

    let submission = json!({
        "name": name,
        "email": email,
        "phone": phone,
        "service": service,
        "message": message,
        "consent": form.consent_given(),
        "timestamp": timestamp,
    });

    let confirmation_body = format!(
        "Dear {first_name},\n\nThank you for reaching out to {org}. We have received \
         your message and will respond within 24 hours.\n\nYour Message:\n{message}\n\n\
         Service Requested: {service}\n\nBest regards,\n{org} Team\n{phone_line}",
        org = state.org.name,
        phone_line = state.org.phone,
    );
    let confirmation = Message::new(
        &email,
        format!(
            "Thank you for contacting {}, {first_name}",
            state.org.name
        ),
        &confirmation_body,
    )
    .with_html(wrap_html(&state.org, &confirmation_body));

    let admin_body = format!(
        "New contact form submission received:\n\nName: {name}\nEmail: {email}\n\
         Phone: {phone}\nService: {service}\n\nMessage:\n{message}\n\n\
         Consent to contact: {consent}\nSubmitted: {timestamp}",
        consent = if form.consent_given() { "Yes" } else { "No" },
    );
    let admin = Message::new(
        state.org.admin_email(),
        format!("New Contact Form Submission from {name}"),
        &admin_body,
    )
    .with_html(wrap_html(&state.org, &admin_body));

    let confirmation_sent = state.chain.dispatch(&confirmation).await.is_sent();
    let admin_sent = state.chain.dispatch(&admin).await.is_sent();

    if let Some(url) = &state.webhook {
        let payload = json!({ "body": submission });
        match state.http.post(url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = %response.status(), "Automation webhook rejected submission");
            }
            Err(err) => tracing::warn!(error = %err, "Automation webhook failed"),
            Ok(_) => {}
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Thank you! We will contact you within 24 hours.",
        "received": true,
        "submission": {
            "name": name,
            "service": service,
            "timestamp": timestamp,
        },
        "emailStatus": {
            "confirmation": confirmation_sent,
            "admin": admin_sent,
        },
    })))
}
