//! Email message and delivery types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An email to be delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Optional HTML body; providers fall back to wrapping the text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Optional sender override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Message {
    /// Creates a plain-text message.
    #[must_use]
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            html: None,
            from: None,
        }
    }

    /// Attaches an HTML body.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// A successful delivery (or queue acceptance) by one provider.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    /// Provider that accepted the message.
    pub provider: String,
    /// Recipient address.
    pub recipient: String,
    /// Human-readable status line.
    pub message: String,
    /// Delivery timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Delivery {
    /// Creates a delivery record stamped now.
    #[must_use]
    pub fn accepted(provider: impl Into<String>, recipient: impl Into<String>) -> Self {
        let provider = provider.into();
        Self {
            message: format!("Email sent successfully via {provider}"),
            provider,
            recipient: recipient.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A free-tier provider the operator could configure.
#[derive(Debug, Clone, Serialize)]
pub struct SetupOption {
    /// Provider display name.
    pub name: String,
    /// Free-tier limit description.
    pub limit: String,
    /// One-line setup instruction naming the environment variable.
    pub setup: String,
}

/// Report returned when no provider delivered the message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsentReport {
    /// The message as it would have been sent, for manual handling.
    pub email_prepared: Message,
    /// Configuration options, cheapest-to-set-up first.
    pub free_options: Vec<SetupOption>,
}

impl UnsentReport {
    /// Builds the standard report for an undeliverable message.
    #[must_use]
    pub fn for_message(prepared: Message) -> Self {
        Self {
            email_prepared: prepared,
            free_options: vec![
                SetupOption {
                    name: "Web3Forms".to_string(),
                    limit: "Unlimited FREE (with their branding)".to_string(),
                    setup: "Get an access key from web3forms.com and set WEB3FORMS_ACCESS_KEY"
                        .to_string(),
                },
                SetupOption {
                    name: "Resend Free Tier".to_string(),
                    limit: "3,000 emails/month FREE".to_string(),
                    setup: "Sign up at resend.com and set RESEND_API_KEY".to_string(),
                },
                SetupOption {
                    name: "EmailJS".to_string(),
                    limit: "200 emails/month FREE".to_string(),
                    setup: "Sign up at emailjs.com and set EMAILJS_SERVICE_ID, \
                            EMAILJS_TEMPLATE_ID, EMAILJS_USER_ID"
                        .to_string(),
                },
            ],
        }
    }
}
