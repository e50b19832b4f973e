//! Static API documentation endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::wire::DocsQuery;

/// `GET /api/docs?section=overview|core-apis|automation`.
pub async fn api_docs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocsQuery>,
) -> ApiResult<Json<Value>> {
    match query.section.as_deref() {
        None | Some("overview") => Ok(Json(overview(&state.org.name))),
        Some("core-apis") => Ok(Json(core_apis())),
        Some("automation") => Ok(Json(automation_docs())),
        Some(_) => Err(ApiError::with_body(json!({
            "error": "Invalid documentation section",
            "availableSections": ["overview", "core-apis", "automation"],
            "usage": "/api/docs?section={section}",
        }))),
    }
}

fn overview(org_name: &str) -> Value {
    json!({
        "title": format!("{org_name} Automation API Documentation"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Automation suite for transitional housing operations",
        "quickStart": {
            "description": "The most common operations",
            "examples": [
                {
                    "title": "Generate Welcome Documents",
                    "method": "POST",
                    "endpoint": "/api/documents",
                },
                {
                    "title": "Process Donation",
                    "method": "POST",
                    "endpoint": "/api/donations",
                },
                {
                    "title": "Schedule Appointment",
                    "method": "POST",
                    "endpoint": "/api/appointments?action=schedule",
                },
            ],
        },
        "automationSuite": {
            "endpoint": "/api/automation",
            "usage": "/api/automation?system={system}&action={action}",
            "systems": ["volunteers", "crisis", "beds", "social"],
        },
        "errorHandling": {
            "standardErrors": {
                "400": "Bad Request - Missing required fields",
                "405": "Method Not Allowed - Wrong HTTP method",
                "429": "Too Many Requests - Rate limit exceeded",
                "500": "Internal Server Error - Server processing error",
            },
            "errorFormat": {
                "success": false,
                "error": "Human readable error message",
            },
        },
        "moreInfo": {
            "sections": ["overview", "core-apis", "automation"],
            "usage": "/api/docs?section={section}",
        },
        "timestamp": Utc::now(),
    })
}

fn core_apis() -> Value {
    json!({
        "title": "Core API Endpoints",
        "apis": {
            "contact": {
                "endpoint": "/api/submit-form",
                "method": "POST",
                "required": ["firstName", "lastName", "email", "message"],
                "optional": ["phone", "service", "consent"],
                "rateLimit": "3 submissions per 10 minutes per client",
            },
            "documents": {
                "endpoint": "/api/documents",
                "method": "POST",
                "required": ["name", "email"],
                "optional": ["phone", "moveInDate"],
            },
            "donations": {
                "endpoint": "/api/donations",
                "methods": { "POST": "Process new donation", "GET": "View donation analytics" },
                "postRequired": ["donorName", "email", "amount"],
            },
            "appointments": {
                "endpoint": "/api/appointments",
                "actions": {
                    "schedule": {
                        "method": "POST",
                        "required": ["veteranName", "email", "scheduledTime"],
                        "optional": ["phone", "appointmentType"],
                    },
                    "upcoming": { "method": "GET", "optional": ["days"] },
                    "stats": { "method": "GET" },
                },
            },
            "status": {
                "endpoint": "/api/status",
                "method": "GET",
            },
        },
    })
}

fn automation_docs() -> Value {
    json!({
        "title": "Automation Suite APIs",
        "baseEndpoint": "/api/automation",
        "usage": "?system={system}&action={action}",
        "systems": {
            "volunteers": {
                "actions": {
                    "register": {
                        "method": "POST",
                        "required": ["firstName", "lastName", "email"],
                        "optional": ["phone", "skills", "availability"],
                    },
                    "list": { "method": "GET" },
                },
            },
            "crisis": {
                "actions": {
                    "report": {
                        "method": "POST",
                        "required": ["reporterName", "residentName", "incidentType", "severity"],
                        "optional": ["description"],
                    },
                    "active": { "method": "GET" },
                },
            },
            "beds": {
                "actions": {
                    "availability": { "method": "GET" },
                    "reserve": {
                        "method": "POST",
                        "required": ["applicantName", "applicantType", "contactInfo"],
                        "optional": ["urgencyLevel"],
                    },
                },
            },
            "social": {
                "actions": {
                    "schedule": {
                        "method": "POST",
                        "required": ["content", "platforms", "scheduledDate"],
                        "optional": ["postType"],
                    },
                    "analytics": { "method": "GET" },
                },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_default_section_is_overview() {
        let response = api_docs(State(test_state()), Query(DocsQuery::default()))
            .await
            .unwrap();
        assert!(response.0["title"].as_str().unwrap().contains("Haven House"));
        assert!(response.0["quickStart"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_section_rejected() {
        let err = api_docs(
            State(test_state()),
            Query(DocsQuery {
                section: Some("billing".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_automation_section_lists_all_systems() {
        let response = api_docs(
            State(test_state()),
            Query(DocsQuery {
                section: Some("automation".to_string()),
            }),
        )
        .await
        .unwrap();
        let systems = response.0["systems"].as_object().unwrap();
        assert_eq!(systems.len(), 4);
    }
}
