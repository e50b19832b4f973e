//! Request payload types.
//!
//! Every field is optional at the serde layer; required-field checks run in
//! the handlers after sanitization so clients get the flat
//! "Missing required fields" message instead of a deserialization error.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// JSON body extractor whose rejections stay in the error envelope.
///
/// Axum's `Json` rejects missing or malformed bodies with a plain-text
/// response; wrapping it keeps those failures in the same
/// `{"success": false, "error": ...}` shape as every other 400.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

/// Contact form body for `POST /api/submit-form`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    /// Submitter's first name.
    pub first_name: Option<String>,
    /// Submitter's last name.
    pub last_name: Option<String>,
    /// Reply-to address.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Requested service, defaults to "General Inquiry".
    pub service: Option<String>,
    /// Free-text message.
    pub message: Option<String>,
    /// Consent checkbox; HTML forms post the string "on".
    pub consent: Option<Value>,
}

impl ContactForm {
    /// Whether the submitter ticked the consent box.
    #[must_use]
    pub fn consent_given(&self) -> bool {
        match &self.consent {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "on" || s == "true",
            _ => false,
        }
    }
}

/// Body for `POST /api/documents`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Resident name interpolated into every document.
    pub name: Option<String>,
    /// Address the package notification goes to.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional move-in date, "TBD" when absent.
    pub move_in_date: Option<String>,
}

/// Body for `POST /api/donations`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonationForm {
    /// Donor display name.
    pub donor_name: Option<String>,
    /// Donor email.
    pub email: Option<String>,
    /// Amount as either a JSON number or a numeric string.
    pub amount: Option<Value>,
}

/// Query string for `/api/appointments`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentQuery {
    /// One of `schedule`, `upcoming`, `stats`.
    pub action: Option<String>,
    /// Horizon for `upcoming`, in days.
    pub days: Option<i64>,
}

/// Body for `POST /api/appointments?action=schedule`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentForm {
    /// Resident the appointment is for.
    pub veteran_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Optional phone for the SMS reminder.
    pub phone: Option<String>,
    /// RFC 3339 appointment time.
    pub scheduled_time: Option<String>,
    /// Defaults to "Initial Consultation".
    pub appointment_type: Option<String>,
}

/// Query string for `/api/automation`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutomationQuery {
    /// One of `volunteers`, `crisis`, `beds`, `social`, `help`.
    pub system: Option<String>,
    /// System-specific action.
    pub action: Option<String>,
}

/// Body for `POST /api/automation?system=volunteers&action=register`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolunteerForm {
    /// Volunteer's first name.
    pub first_name: Option<String>,
    /// Volunteer's last name.
    pub last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Declared skills.
    pub skills: Option<Vec<String>>,
    /// Availability, defaults to "Flexible".
    pub availability: Option<String>,
}

/// Body for `POST /api/automation?system=crisis&action=report`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrisisForm {
    /// Staff member filing the report.
    pub reporter_name: Option<String>,
    /// Resident involved.
    pub resident_name: Option<String>,
    /// medical, mental-health, behavioral, safety, or other.
    pub incident_type: Option<String>,
    /// low, medium, high, or critical.
    pub severity: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Body for `POST /api/automation?system=beds&action=reserve`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BedReservationForm {
    /// Applicant name.
    pub applicant_name: Option<String>,
    /// Applicant category (veteran, recovery, reentry, ...).
    pub applicant_type: Option<String>,
    /// Phone or email to reach the applicant.
    pub contact_info: Option<String>,
    /// standard or emergency; drives waitlist position.
    pub urgency_level: Option<String>,
}

/// Body for `POST /api/automation?system=social&action=schedule`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialPostForm {
    /// Post text.
    pub content: Option<String>,
    /// Target platforms.
    pub platforms: Option<Vec<String>>,
    /// RFC 3339 publish time.
    pub scheduled_date: Option<String>,
    /// Defaults to "general".
    pub post_type: Option<String>,
}

/// Body for the email endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    /// Recipient address.
    pub to: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain-text body.
    pub body: Option<String>,
    /// Optional HTML body.
    pub html: Option<String>,
    /// Optional sender override.
    pub from: Option<String>,
}

/// Query string for `/api/docs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocsQuery {
    /// Documentation section, `overview` when absent.
    pub section: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_tolerates_missing_fields() {
        let form: ContactForm = serde_json::from_str("{}").unwrap();
        assert!(form.first_name.is_none());
        assert!(!form.consent_given());
    }

    #[test]
    fn test_consent_accepts_bool_and_checkbox_string() {
        let form: ContactForm = serde_json::from_str(r#"{"consent": true}"#).unwrap();
        assert!(form.consent_given());
        let form: ContactForm = serde_json::from_str(r#"{"consent": "on"}"#).unwrap();
        assert!(form.consent_given());
        let form: ContactForm = serde_json::from_str(r#"{"consent": "off"}"#).unwrap();
        assert!(!form.consent_given());
    }

    #[tokio::test]
    async fn test_malformed_body_rejected_in_envelope_format() {
        use axum::body::Body;
        use axum::response::IntoResponse;

        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = ApiJson::<ContactForm>::from_request(request, &())
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_json::json!(false));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_body_rejected_in_envelope_format() {
        use axum::body::Body;
        use axum::response::IntoResponse;

        let request = axum::http::Request::builder()
            .method("POST")
            .body(Body::empty())
            .unwrap();

        let err = ApiJson::<ContactForm>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_donation_amount_accepts_number_or_string() {
        let form: DonationForm = serde_json::from_str(r#"{"amount": 50}"#).unwrap();
        assert!(matches!(form.amount, Some(Value::Number(_))));
        let form: DonationForm = serde_json::from_str(r#"{"amount": "50"}"#).unwrap();
        assert!(matches!(form.amount, Some(Value::String(_))));
    }
}
