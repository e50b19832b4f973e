//! Unified automation endpoint: volunteers, crisis, beds, social.
//!
//! The sub-system and action are carried in the query string. GET
//! responses are served through the TTL cache; POST actions validate and
//! echo a processed record without storing anything.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use haven_core::validate::{missing_fields, sanitize_opt};
use haven_core::{timestamp_id, Error};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::{
    ApiJson, AutomationQuery, BedReservationForm, CrisisForm, SocialPostForm, VolunteerForm,
};

fn invalid_system() -> ApiError {
    ApiError::with_body(json!({
        "error": "Invalid system or action",
        "usage": "Use ?system=volunteers|crisis|beds|social&action=...",
        "help": "/api/automation?system=help",
    }))
}

fn help_catalog(org_name: &str) -> Value {
    json!({
        "message": format!("{org_name} Automation Suite"),
        "availableSystems": {
            "volunteers": {
                "endpoints": [
                    "GET /api/automation?system=volunteers&action=list",
                    "POST /api/automation?system=volunteers&action=register",
                ],
            },
            "crisis": {
                "endpoints": [
                    "GET /api/automation?system=crisis&action=active",
                    "POST /api/automation?system=crisis&action=report",
                ],
            },
            "beds": {
                "endpoints": [
                    "GET /api/automation?system=beds&action=availability",
                    "POST /api/automation?system=beds&action=reserve",
                ],
            },
            "social": {
                "endpoints": [
                    "GET /api/automation?system=social&action=analytics",
                    "POST /api/automation?system=social&action=schedule",
                ],
            },
        },
        "timestamp": Utc::now(),
    })
}

/// `GET /api/automation?system=...&action=...`.
pub async fn automation_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AutomationQuery>,
) -> ApiResult<Json<Value>> {
    let system = query.system.as_deref().unwrap_or("help");
    let action = query.action.as_deref().unwrap_or("");

    if system == "help" {
        return Ok(Json(help_catalog(&state.org.name)));
    }

    let cache_key = format!("{system}-{action}");
    if let Some(hit) = state.cache.get(&cache_key) {
        tracing::debug!(key = %cache_key, "Automation cache hit");
        return Ok(Json(hit));
    }

    let body = match (system, action) {
        ("volunteers", "list") => volunteers_list(),
        ("crisis", "active") => crisis_active(),
        ("beds", "availability") => beds_availability(&state.org.name),
        ("social", "analytics") => social_analytics(),
        _ => return Err(invalid_system()),
    };

    state.cache.insert(cache_key, body.clone());
    Ok(Json(body))
}

/// `POST /api/automation?system=...&action=...`.
pub async fn automation_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AutomationQuery>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    let system = query.system.as_deref().unwrap_or("help");
    let action = query.action.as_deref().unwrap_or("");

    match (system, action) {
        ("volunteers", "register") => volunteers_register(&state, parse_body(body)?),
        ("crisis", "report") => crisis_report(parse_body(body)?),
        ("beds", "reserve") => beds_reserve(parse_body(body)?),
        ("social", "schedule") => social_schedule(parse_body(body)?),
        ("help", _) => Ok(Json(help_catalog(&state.org.name))),
        _ => Err(invalid_system()),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}

// === Volunteers ===

fn volunteers_register(state: &AppState, form: VolunteerForm) -> ApiResult<Json<Value>> {
    let first_name = sanitize_opt(form.first_name.as_deref());
    let last_name = sanitize_opt(form.last_name.as_deref());
    let email = sanitize_opt(form.email.as_deref());

    let missing = missing_fields(&[
        ("firstName", first_name.as_deref()),
        ("lastName", last_name.as_deref()),
        ("email", email.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(first_name), Some(last_name), Some(email)) = (first_name, last_name, email) else {
        return Err(ApiError::Internal);
    };

    let id = timestamp_id("VOL");
    let full_name = format!("{first_name} {last_name}");
    tracing::info!(volunteer = %id, name = %full_name, "Volunteer registered");

    Ok(Json(json!({
        "success": true,
        "message": format!("Volunteer registration completed for {full_name}"),
        "volunteer": {
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "fullName": full_name,
            "email": email,
            "phone": sanitize_opt(form.phone.as_deref()).as_deref().unwrap_or("Not provided"),
            "skills": form.skills.unwrap_or_default(),
            "availability": form.availability.as_deref().unwrap_or("Flexible"),
            "status": "pending-approval",
            "registeredDate": Utc::now(),
            "totalHours": 0,
        },
        "welcomeEmail": {
            "to": email,
            "subject": format!("Welcome to {} Volunteers - {first_name}", state.org.name),
            "body": format!(
                "Dear {first_name}, thank you for registering as a volunteer. \
                 We'll contact you within 2-3 business days."
            ),
        },
        "timestamp": Utc::now(),
    })))
}

fn volunteers_list() -> Value {
    json!({
        "volunteers": [
            {
                "id": "VOL-001",
                "fullName": "Sarah Johnson",
                "email": "sarah.j@example.com",
                "skills": ["Counseling", "Event Planning"],
                "status": "active",
                "totalHours": 156,
            },
            {
                "id": "VOL-002",
                "fullName": "Mike Chen",
                "email": "mike.chen@example.com",
                "skills": ["IT Support", "Transportation"],
                "status": "active",
                "totalHours": 89,
            },
        ],
        "totalCount": 2,
        "lastUpdated": Utc::now(),
    })
}

// === Crisis ===

const SEVERITIES: [&str; 4] = ["low", "medium", "high", "critical"];

fn crisis_report(form: CrisisForm) -> ApiResult<Json<Value>> {
    let reporter_name = sanitize_opt(form.reporter_name.as_deref());
    let resident_name = sanitize_opt(form.resident_name.as_deref());
    let incident_type = sanitize_opt(form.incident_type.as_deref());
    let severity = sanitize_opt(form.severity.as_deref());

    let missing = missing_fields(&[
        ("reporterName", reporter_name.as_deref()),
        ("residentName", resident_name.as_deref()),
        ("incidentType", incident_type.as_deref()),
        ("severity", severity.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(reporter_name), Some(resident_name), Some(incident_type), Some(severity)) =
        (reporter_name, resident_name, incident_type, severity)
    else {
        return Err(ApiError::Internal);
    };

    if !SEVERITIES.contains(&severity.as_str()) {
        return Err(ApiError::bad_request(
            "Invalid severity; expected low, medium, high, or critical",
        ));
    }

    let critical = severity == "critical";
    let response_time = match severity.as_str() {
        "critical" => "Immediate (0-5 minutes)",
        "high" => "15 minutes",
        "medium" => "30 minutes",
        _ => "2 hours",
    };

    let id = timestamp_id("CRISIS");
    tracing::warn!(incident = %id, %severity, "Crisis incident reported");

    Ok(Json(json!({
        "success": true,
        "message": format!("Crisis incident {id} reported and response initiated"),
        "incident": {
            "id": id,
            "reporterName": reporter_name,
            "residentName": resident_name,
            "incidentType": incident_type,
            "severity": severity,
            "description": sanitize_opt(form.description.as_deref()),
            "status": if critical { "emergency-response" } else { "under-review" },
            "reportedDate": Utc::now(),
        },
        "responseTime": response_time,
        "notifications": {
            "emergency": if critical {
                json!(["Crisis manager alerted", "Emergency services contacted"])
            } else {
                json!([])
            },
            "staff": ["House manager notified", "Case worker assigned"],
        },
        "timestamp": Utc::now(),
    })))
}

fn crisis_active() -> Value {
    json!({
        "activeIncidents": [
            {
                "id": "CRISIS-001",
                "residentName": "John D.",
                "incidentType": "mental-health",
                "severity": "high",
                "status": "under-review",
                "reportedDate": "2025-02-28T14:30:00Z",
            },
        ],
        "totalActive": 1,
        "criticalCount": 0,
        "lastUpdated": Utc::now(),
    })
}

// === Beds ===

fn beds_availability(org_name: &str) -> Value {
    json!({
        "facility": {
            "name": org_name,
            "totalBeds": 48,
            "occupiedBeds": 41,
            "availableBeds": 7,
            "occupancyRate": 85.4,
        },
        "byUnit": [
            {
                "unitName": "Wing A",
                "totalBeds": 16,
                "occupied": 14,
                "available": 2,
                "notes": "2 beds available - male only",
            },
            {
                "unitName": "Wing B",
                "totalBeds": 16,
                "occupied": 15,
                "available": 1,
                "notes": "1 bed available - female only",
            },
        ],
        "waitlist": {
            "totalWaiting": 23,
            "averageWaitTime": "14 days",
        },
        "lastUpdated": Utc::now(),
    })
}

fn beds_reserve(form: BedReservationForm) -> ApiResult<Json<Value>> {
    let applicant_name = sanitize_opt(form.applicant_name.as_deref());
    let applicant_type = sanitize_opt(form.applicant_type.as_deref());
    let contact_info = sanitize_opt(form.contact_info.as_deref());

    let missing = missing_fields(&[
        ("applicantName", applicant_name.as_deref()),
        ("applicantType", applicant_type.as_deref()),
        ("contactInfo", contact_info.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(applicant_name), Some(applicant_type), Some(contact_info)) =
        (applicant_name, applicant_type, contact_info)
    else {
        return Err(ApiError::Internal);
    };

    let urgency = form.urgency_level.as_deref().unwrap_or("standard");
    let emergency = urgency == "emergency";
    let id = timestamp_id("BED");
    tracing::info!(reservation = %id, %urgency, "Bed reservation processed");

    Ok(Json(json!({
        "success": true,
        "message": format!("Bed reservation processed for {applicant_name}"),
        "reservation": {
            "id": id,
            "applicantName": applicant_name,
            "applicantType": applicant_type,
            "contactInfo": contact_info,
            "urgencyLevel": urgency,
            "status": "pending",
            "reservedDate": Utc::now(),
            "waitlistPosition": if emergency { 1 } else { 5 },
            "estimatedAvailability": if emergency { "1-3 days" } else { "14-21 days" },
        },
        "nextSteps": [
            "Complete intake assessment",
            "Submit required documentation",
            "Await bed assignment confirmation",
        ],
        "timestamp": Utc::now(),
    })))
}

// === Social media ===

fn social_schedule(form: SocialPostForm) -> ApiResult<Json<Value>> {
    let content = sanitize_opt(form.content.as_deref());
    let scheduled_date = sanitize_opt(form.scheduled_date.as_deref());
    let platforms = form.platforms.unwrap_or_default();

    let mut missing = missing_fields(&[("content", content.as_deref())]);
    if platforms.is_empty() {
        missing.push("platforms".to_string());
    }
    if scheduled_date.is_none() {
        missing.push("scheduledDate".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields { fields: missing }.into());
    }
    let (Some(content), Some(scheduled_date)) = (content, scheduled_date) else {
        return Err(ApiError::Internal);
    };

    let when: DateTime<Utc> = scheduled_date.parse().map_err(|_| {
        ApiError::bad_request("Invalid scheduledDate; expected an RFC 3339 timestamp")
    })?;

    let id = timestamp_id("SOCIAL");
    let reach = platforms.len() * 800;
    tracing::info!(post = %id, platforms = platforms.len(), "Social post scheduled");

    Ok(Json(json!({
        "success": true,
        "message": format!("Social media post scheduled for {}", when.format("%-m/%-d/%Y")),
        "scheduledPost": {
            "id": id,
            "content": content,
            "platforms": platforms,
            "scheduledDate": when,
            "postType": form.post_type.as_deref().unwrap_or("general"),
            "status": "scheduled",
            "createdDate": Utc::now(),
            "estimatedReach": reach,
        },
        "timestamp": Utc::now(),
    })))
}

fn social_analytics() -> Value {
    json!({
        "performance": {
            "postsPublished": 28,
            "totalReach": 45670,
            "totalEngagement": 3420,
            "engagementRate": 7.5,
            "newFollowers": 156,
        },
        "byPlatform": {
            "facebook": { "posts": 12, "reach": 18900, "engagement": 1890 },
            "instagram": { "posts": 8, "reach": 12450, "engagement": 1020 },
            "twitter": { "posts": 6, "reach": 8900, "engagement": 380 },
        },
        "lastUpdated": Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;
    use axum::response::IntoResponse;

    fn query(system: &str, action: &str) -> Query<AutomationQuery> {
        Query(AutomationQuery {
            system: Some(system.to_string()),
            action: Some(action.to_string()),
        })
    }

    #[tokio::test]
    async fn test_get_responses_are_cached() {
        let state = test_state();
        let first = automation_get(State(state.clone()), query("beds", "availability"))
            .await
            .unwrap();
        assert_eq!(state.cache.len(), 1);

        // Second call must serve the identical cached body, timestamp included.
        let second = automation_get(State(state), query("beds", "availability"))
            .await
            .unwrap();
        assert_eq!(first.0, second.0);
    }

    #[tokio::test]
    async fn test_help_catalog_for_missing_system() {
        let state = test_state();
        let response = automation_get(
            State(state.clone()),
            Query(AutomationQuery::default()),
        )
        .await
        .unwrap();
        assert!(response.0["availableSystems"]["beds"].is_object());
        // The catalog is not cached.
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_system_rejected() {
        let err = automation_get(State(test_state()), query("parking", "list"))
            .await
            .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_volunteer_registration() {
        let response = automation_post(
            State(test_state()),
            query("volunteers", "register"),
            ApiJson(json!({
                "firstName": "Sarah",
                "lastName": "Johnson",
                "email": "sarah@example.com",
                "skills": ["Counseling"],
            })),
        )
        .await
        .unwrap();

        let volunteer = &response.0["volunteer"];
        assert!(volunteer["id"].as_str().unwrap().starts_with("VOL-"));
        assert_eq!(volunteer["fullName"], json!("Sarah Johnson"));
        assert_eq!(volunteer["status"], json!("pending-approval"));
        assert_eq!(volunteer["availability"], json!("Flexible"));
        assert_eq!(response.0["welcomeEmail"]["to"], json!("sarah@example.com"));
    }

    #[tokio::test]
    async fn test_critical_crisis_gets_emergency_response() {
        let response = automation_post(
            State(test_state()),
            query("crisis", "report"),
            ApiJson(json!({
                "reporterName": "Staff Member",
                "residentName": "John D.",
                "incidentType": "medical",
                "severity": "critical",
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.0["incident"]["status"], json!("emergency-response"));
        assert_eq!(response.0["responseTime"], json!("Immediate (0-5 minutes)"));
        assert_eq!(
            response.0["notifications"]["emergency"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_medium_crisis_stays_under_review() {
        let response = automation_post(
            State(test_state()),
            query("crisis", "report"),
            ApiJson(json!({
                "reporterName": "Staff Member",
                "residentName": "John D.",
                "incidentType": "behavioral",
                "severity": "medium",
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.0["incident"]["status"], json!("under-review"));
        assert_eq!(response.0["responseTime"], json!("30 minutes"));
        assert!(response.0["notifications"]["emergency"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_severity_rejected() {
        let err = automation_post(
            State(test_state()),
            query("crisis", "report"),
            ApiJson(json!({
                "reporterName": "Staff",
                "residentName": "John D.",
                "incidentType": "other",
                "severity": "catastrophic",
            })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_emergency_reservation_jumps_waitlist() {
        let response = automation_post(
            State(test_state()),
            query("beds", "reserve"),
            ApiJson(json!({
                "applicantName": "James Wilson",
                "applicantType": "veteran",
                "contactInfo": "james@example.com",
                "urgencyLevel": "emergency",
            })),
        )
        .await
        .unwrap();

        let reservation = &response.0["reservation"];
        assert_eq!(reservation["waitlistPosition"], json!(1));
        assert_eq!(reservation["estimatedAvailability"], json!("1-3 days"));
    }

    #[tokio::test]
    async fn test_standard_reservation_waits() {
        let response = automation_post(
            State(test_state()),
            query("beds", "reserve"),
            ApiJson(json!({
                "applicantName": "James Wilson",
                "applicantType": "recovery",
                "contactInfo": "james@example.com",
            })),
        )
        .await
        .unwrap();

        let reservation = &response.0["reservation"];
        assert_eq!(reservation["waitlistPosition"], json!(5));
        assert_eq!(reservation["urgencyLevel"], json!("standard"));
    }

    #[tokio::test]
    async fn test_social_reach_scales_with_platforms() {
        let response = automation_post(
            State(test_state()),
            query("social", "schedule"),
            ApiJson(json!({
                "content": "Open house this weekend",
                "platforms": ["facebook", "instagram", "twitter"],
                "scheduledDate": "2025-03-05T18:00:00Z",
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.0["scheduledPost"]["estimatedReach"], json!(2400));
        assert_eq!(
            response.0["message"],
            json!("Social media post scheduled for 3/5/2025")
        );
    }

    #[tokio::test]
    async fn test_social_requires_platforms() {
        let err = automation_post(
            State(test_state()),
            query("social", "schedule"),
            ApiJson(json!({
                "content": "Open house",
                "scheduledDate": "2025-03-05T18:00:00Z",
            })),
        )
        .await
        .unwrap_err();
        match err {
            ApiError::BadRequest { message } => {
                assert_eq!(message, "Missing required fields: platforms");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
