//! Appointment scheduling endpoint.
//!
//! The action is carried in the query string; `upcoming` and `stats`
//! return representative sample data, no bookings are stored here.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use haven_core::validate::{missing_fields, sanitize_opt};
use haven_core::{timestamp_id, Error};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::{ApiJson, AppointmentForm, AppointmentQuery};

fn unknown_action() -> ApiError {
    ApiError::with_body(json!({
        "error": "Invalid action or method",
        "availableActions": ["schedule", "upcoming", "stats"],
        "examples": {
            "schedule": "POST /api/appointments?action=schedule",
            "upcoming": "GET /api/appointments?action=upcoming",
            "stats": "GET /api/appointments?action=stats",
        },
    }))
}

/// `POST /api/appointments?action=schedule`.
pub async fn appointments_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentQuery>,
    ApiJson(form): ApiJson<AppointmentForm>,
) -> ApiResult<Json<Value>> {
    if query.action.as_deref() != Some("schedule") {
        return Err(unknown_action());
    }

    let veteran_name = sanitize_opt(form.veteran_name.as_deref());
    let email = sanitize_opt(form.email.as_deref());
    let scheduled_time = sanitize_opt(form.scheduled_time.as_deref());

    let missing = missing_fields(&[
        ("veteranName", veteran_name.as_deref()),
        ("email", email.as_deref()),
        ("scheduledTime", scheduled_time.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(veteran_name), Some(email), Some(scheduled_time)) =
        (veteran_name, email, scheduled_time)
    else {
        return Err(ApiError::Internal);
    };

    let when: DateTime<Utc> = scheduled_time
        .parse::<DateTime<Utc>>()
        .map_err(|_| {
            ApiError::bad_request("Invalid scheduledTime; expected an RFC 3339 timestamp")
        })?;

    let phone = sanitize_opt(form.phone.as_deref());
    let appointment_type = sanitize_opt(form.appointment_type.as_deref())
        .unwrap_or_else(|| "Initial Consultation".to_string());
    let id = timestamp_id("APT");

    tracing::info!(appointment = %id, resident = %veteran_name, "Appointment scheduled");

    Ok(Json(json!({
        "success": true,
        "message": format!("Appointment scheduled for {veteran_name}"),
        "appointment": {
            "id": id,
            "veteranName": veteran_name,
            "email": email,
            "phone": phone.as_deref().unwrap_or("Not provided"),
            "scheduledTime": when,
            "appointmentType": appointment_type,
            "status": "scheduled",
        },
        "confirmationEmail": format!("Confirmation sent to {email}"),
        "confirmationSMS": match &phone {
            Some(phone) => format!("SMS reminder sent to {phone}"),
            None => "No phone provided".to_string(),
        },
        "timestamp": Utc::now(),
    })))
}

/// `GET /api/appointments?action=upcoming|stats`.
pub async fn appointments_get(
    State(_state): State<Arc<AppState>>,
    Query(query): Query<AppointmentQuery>,
) -> ApiResult<Json<Value>> {
    match query.action.as_deref() {
        Some("upcoming") => {
            let days = query.days.unwrap_or(7);
            Ok(Json(json!({
                "upcomingAppointments": [
                    {
                        "id": "APT-001",
                        "veteranName": "John Smith",
                        "scheduledTime": "2025-03-01T14:00:00Z",
                        "appointmentType": "Initial Consultation",
                        "status": "confirmed",
                    },
                    {
                        "id": "APT-002",
                        "veteranName": "Jane Doe",
                        "scheduledTime": "2025-03-02T10:30:00Z",
                        "appointmentType": "Follow-up",
                        "status": "pending",
                    },
                ],
                "daysAhead": days,
                "totalCount": 2,
            })))
        }
        Some("stats") => Ok(Json(json!({
            "totalAppointments": 156,
            "thisWeek": 12,
            "thisMonth": 43,
            "completionRate": 94.5,
            "averageWaitTime": "3.2 days",
            "mostCommonType": "Initial Consultation",
            "lastUpdated": Utc::now(),
        }))),
        _ => Err(unknown_action()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;
    use axum::response::IntoResponse;

    fn schedule_query() -> Query<AppointmentQuery> {
        Query(AppointmentQuery {
            action: Some("schedule".to_string()),
            days: None,
        })
    }

    #[tokio::test]
    async fn test_schedule_returns_confirmation() {
        let form: AppointmentForm = serde_json::from_value(json!({
            "veteranName": "Mike Rodriguez",
            "email": "mike@example.com",
            "phone": "(555) 987-6543",
            "scheduledTime": "2025-03-10T10:00:00Z",
        }))
        .unwrap();

        let response = appointments_post(State(test_state()), schedule_query(), ApiJson(form))
            .await
            .unwrap();

        let appointment = &response.0["appointment"];
        assert!(appointment["id"].as_str().unwrap().starts_with("APT-"));
        assert_eq!(appointment["status"], json!("scheduled"));
        assert_eq!(appointment["appointmentType"], json!("Initial Consultation"));
        assert_eq!(
            response.0["confirmationSMS"],
            json!("SMS reminder sent to (555) 987-6543")
        );
    }

    #[tokio::test]
    async fn test_schedule_without_phone_notes_it() {
        let form: AppointmentForm = serde_json::from_value(json!({
            "veteranName": "Ana",
            "email": "ana@example.com",
            "scheduledTime": "2025-03-10T10:00:00Z",
        }))
        .unwrap();
        let response = appointments_post(State(test_state()), schedule_query(), ApiJson(form))
            .await
            .unwrap();
        assert_eq!(response.0["confirmationSMS"], json!("No phone provided"));
        assert_eq!(response.0["appointment"]["phone"], json!("Not provided"));
    }

    #[tokio::test]
    async fn test_schedule_missing_fields_listed() {
        let form: AppointmentForm =
            serde_json::from_value(json!({ "email": "ana@example.com" })).unwrap();
        let err = appointments_post(State(test_state()), schedule_query(), ApiJson(form))
            .await
            .unwrap_err();
        match err {
            ApiError::BadRequest { message } => {
                assert_eq!(
                    message,
                    "Missing required fields: veteranName, scheduledTime"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schedule_rejects_garbage_time() {
        let form: AppointmentForm = serde_json::from_value(json!({
            "veteranName": "Ana",
            "email": "ana@example.com",
            "scheduledTime": "next tuesday",
        }))
        .unwrap();
        let err = appointments_post(State(test_state()), schedule_query(), ApiJson(form))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_unknown_action_lists_available() {
        let err = appointments_get(
            State(test_state()),
            Query(AppointmentQuery {
                action: Some("cancel".to_string()),
                days: None,
            }),
        )
        .await
        .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upcoming_defaults_to_seven_days() {
        let response = appointments_get(
            State(test_state()),
            Query(AppointmentQuery {
                action: Some("upcoming".to_string()),
                days: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0["daysAhead"], json!(7));
        assert_eq!(response.0["totalCount"], json!(2));
    }
}
