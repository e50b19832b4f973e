//! Email endpoints: the free-tier chain, the Gmail path, and the
//! provider-neutral queue stub.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use haven_core::validate::missing_fields;
use haven_core::Error;
use haven_mailer::provider::Mailer;
use haven_mailer::{DispatchOutcome, Message};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::{ApiJson, EmailRequest};

fn build_message(request: EmailRequest) -> ApiResult<Message> {
    let missing = missing_fields(&[
        ("to", request.to.as_deref()),
        ("subject", request.subject.as_deref()),
        ("body", request.body.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(to), Some(subject), Some(body)) = (request.to, request.subject, request.body)
    else {
        return Err(ApiError::Internal);
    };

    let mut message = Message::new(to, subject, body);
    message.html = request.html;
    message.from = request.from;
    Ok(message)
}

fn default_html(body: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; \
         margin: 0 auto; padding: 20px;\">{}</div>",
        body.replace('\n', "<br>")
    )
}

/// `POST /api/email-free`.
///
/// Runs the full fallback chain. Exhausting every provider is still a 200;
/// the body carries the prepared message and setup options instead.
pub async fn email_free(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<EmailRequest>,
) -> ApiResult<Json<Value>> {
    let message = build_message(request)?;

    match state.chain.dispatch(&message).await {
        DispatchOutcome::Sent(delivery) => Ok(Json(json!({
            "success": true,
            "message": delivery.message,
            "recipient": delivery.recipient,
            "provider": delivery.provider,
            "timestamp": delivery.timestamp,
        }))),
        DispatchOutcome::Unsent(report) => Ok(Json(json!({
            "success": false,
            "message": "No free email service configured - email content prepared",
            "emailPrepared": report.email_prepared,
            "freeOptions": report.free_options,
            "timestamp": Utc::now(),
        }))),
    }
}

/// `POST /api/email-gmail`.
///
/// Without credentials, returns the prepared content and the app-password
/// setup steps. With credentials the provider only prepares the message;
/// real SMTP is out of scope here.
pub async fn email_gmail(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<EmailRequest>,
) -> ApiResult<Json<Value>> {
    let message = build_message(request)?;

    if !state.gmail.is_configured() {
        return Ok(Json(json!({
            "success": false,
            "message": "Gmail not configured - but email content ready",
            "emailContent": {
                "to": message.to,
                "subject": message.subject,
                "body": message.body,
                "html": message.html.clone().unwrap_or_else(|| message.body.clone()),
            },
            "setup": {
                "step1": "Enable 2-Factor Authentication on the Gmail account",
                "step2": "Generate an App Password under Google Account Settings > Security",
                "step3": "Set these environment variables:",
                "variables": {
                    "GMAIL_USER": "your-email@gmail.com",
                    "GMAIL_APP_PASSWORD": "your-16-digit-app-password",
                },
                "note": "Gmail allows 500 free emails per day",
            },
        })));
    }

    match state.gmail.send(&message).await {
        Ok(delivery) => Ok(Json(json!({
            "success": true,
            "message": delivery.message,
            "recipient": delivery.recipient,
            "provider": "Gmail (Free)",
            "timestamp": delivery.timestamp,
        }))),
        Err(err) => {
            tracing::warn!(error = %err, "Gmail send failed");
            Ok(Json(json!({
                "success": false,
                "message": "Gmail configured but sending failed",
                "emailContent": message,
                "troubleshooting": {
                    "check1": "Verify the app password is correct (16 digits, no spaces)",
                    "check2": "Ensure 2FA is enabled on the account",
                    "check3": "Check the app password was created for Mail",
                },
            })))
        }
    }
}

/// `POST /api/send-email`.
///
/// Provider-neutral: validates and echoes the prepared content with
/// integration options, without touching any provider.
pub async fn send_email(ApiJson(request): ApiJson<EmailRequest>) -> ApiResult<Json<Value>> {
    let message = build_message(request)?;
    let html = message
        .html
        .clone()
        .unwrap_or_else(|| default_html(&message.body));

    Ok(Json(json!({
        "success": true,
        "message": "Email queued for delivery",
        "recipient": message.to,
        "subject": message.subject,
        "timestamp": Utc::now(),
        "provider": "Ready for integration",
        "integration": {
            "note": "Email content prepared but actual sending requires a provider",
            "options": [
                {
                    "provider": "Web3Forms",
                    "setup": "Set the WEB3FORMS_ACCESS_KEY environment variable",
                    "cost": "Free",
                },
                {
                    "provider": "Resend",
                    "setup": "Set the RESEND_API_KEY environment variable",
                    "cost": "3,000 emails/month free",
                },
                {
                    "provider": "Gmail",
                    "setup": "Set GMAIL_USER and GMAIL_APP_PASSWORD",
                    "cost": "Free for low volume",
                },
            ],
        },
        "emailContent": {
            "to": message.to,
            "from": message.from,
            "subject": message.subject,
            "body": message.body,
            "html": html,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;

    fn request(value: Value) -> EmailRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_email_free_without_providers_reports_options() {
        let response = email_free(
            State(test_state()),
            ApiJson(request(json!({
                "to": "user@example.com",
                "subject": "Welcome",
                "body": "Hello there",
            }))),
        )
        .await
        .unwrap();

        assert_eq!(response.0["success"], json!(false));
        assert_eq!(
            response.0["emailPrepared"]["to"],
            json!("user@example.com")
        );
        assert_eq!(response.0["freeOptions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_email_free_missing_fields() {
        let err = email_free(
            State(test_state()),
            ApiJson(request(json!({ "to": "user@example.com" }))),
        )
        .await
        .unwrap_err();
        match err {
            ApiError::BadRequest { message } => {
                assert_eq!(message, "Missing required fields: subject, body");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_email_gmail_unconfigured_returns_setup_steps() {
        let response = email_gmail(
            State(test_state()),
            ApiJson(request(json!({
                "to": "user@example.com",
                "subject": "Welcome",
                "body": "Hello there",
            }))),
        )
        .await
        .unwrap();

        assert_eq!(response.0["success"], json!(false));
        assert!(response.0["setup"]["variables"]["GMAIL_USER"].is_string());
        // The HTML falls back to the plain body.
        assert_eq!(response.0["emailContent"]["html"], json!("Hello there"));
    }

    #[tokio::test]
    async fn test_send_email_queues_and_wraps_body() {
        let response = send_email(ApiJson(request(json!({
            "to": "user@example.com",
            "subject": "Welcome",
            "body": "line one\nline two",
        }))))
        .await
        .unwrap();

        assert_eq!(response.0["success"], json!(true));
        assert_eq!(response.0["message"], json!("Email queued for delivery"));
        let html = response.0["emailContent"]["html"].as_str().unwrap();
        assert!(html.contains("line one<br>line two"));
    }
}
