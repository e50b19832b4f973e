//! Donation processing and analytics.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use haven_core::validate::{is_valid_email, missing_fields, parse_amount, sanitize_opt};
use haven_core::{letters, timestamp_id, Error};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::{ApiJson, DonationForm};

/// `POST /api/donations`.
///
/// Generates the thank-you letter and tax receipt for a donation. The
/// amount arrives as a string from web forms and as a number from API
/// clients; both are accepted, anything non-positive is rejected.
pub async fn process_donation(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<DonationForm>,
) -> ApiResult<Json<Value>> {
    let donor_name = sanitize_opt(form.donor_name.as_deref());
    let email = sanitize_opt(form.email.as_deref());
    let raw_amount = match &form.amount {
        Some(Value::String(s)) => sanitize_opt(Some(s)),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let missing = missing_fields(&[
        ("donorName", donor_name.as_deref()),
        ("email", email.as_deref()),
        ("amount", raw_amount.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(donor_name), Some(email), Some(raw_amount)) = (donor_name, email, raw_amount)
    else {
        return Err(ApiError::Internal);
    };

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    let amount = parse_amount(&raw_amount)?;

    let receipt_number = timestamp_id("HH");
    let thank_you = letters::thank_you_letter(&state.org, &donor_name, amount);
    let tax_receipt = letters::tax_receipt(&state.org, &donor_name, amount, &receipt_number);

    tracing::info!(donor = %donor_name, amount, %receipt_number, "Donation processed");

    Ok(Json(json!({
        "success": true,
        "message": format!("Thank you package generated for {donor_name}"),
        "documents": {
            "thankYouLetter": thank_you,
            "taxReceipt": {
                "title": tax_receipt.title,
                "content": tax_receipt.content,
                "receiptNumber": receipt_number,
                "amount": amount,
                "generated": tax_receipt.generated,
            },
        },
        "receiptNumber": receipt_number,
        "donationAmount": amount,
        "timestamp": Utc::now(),
    })))
}

/// `GET /api/donations` static analytics snapshot.
pub async fn donation_analytics() -> Json<Value> {
    Json(json!({
        "totalDonors": 247,
        "totalDonations": 85420,
        "averageDonation": 346,
        "monthlyGrowth": 12.5,
        "lastUpdated": Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;

    fn form(value: Value) -> DonationForm {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_string_amount_is_coerced() {
        let response = process_donation(
            State(test_state()),
            ApiJson(form(json!({
                "donorName": "Sarah Johnson",
                "email": "sarah@example.com",
                "amount": "100",
            }))),
        )
        .await
        .unwrap();

        assert_eq!(response.0["success"], json!(true));
        assert_eq!(response.0["donationAmount"], json!(100.0));
        let receipt = response.0["receiptNumber"].as_str().unwrap();
        assert!(receipt.starts_with("HH-"));
        assert_eq!(
            response.0["documents"]["taxReceipt"]["receiptNumber"],
            json!(receipt)
        );
    }

    #[tokio::test]
    async fn test_numeric_amount_accepted() {
        let response = process_donation(
            State(test_state()),
            ApiJson(form(json!({
                "donorName": "Mike Chen",
                "email": "mike@example.com",
                "amount": 500,
            }))),
        )
        .await
        .unwrap();
        assert!(response.0["documents"]["thankYouLetter"]["content"]
            .as_str()
            .unwrap()
            .contains("Mike Chen"));
    }

    #[tokio::test]
    async fn test_non_numeric_amount_rejected() {
        let err = process_donation(
            State(test_state()),
            ApiJson(form(json!({
                "donorName": "A",
                "email": "a@example.com",
                "amount": "lots",
            }))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let err = process_donation(
            State(test_state()),
            ApiJson(form(json!({
                "donorName": "A",
                "email": "a@example.com",
                "amount": "-5",
            }))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_missing_amount_listed() {
        let err = process_donation(
            State(test_state()),
            ApiJson(form(json!({ "donorName": "A", "email": "a@example.com" }))),
        )
        .await
        .unwrap_err();
        match err {
            ApiError::BadRequest { message } => {
                assert_eq!(message, "Missing required fields: amount");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_analytics_shape() {
        let response = donation_analytics().await;
        assert_eq!(response.0["totalDonors"], json!(247));
    }
}
