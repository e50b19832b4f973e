//! EmailJS backend (template-based JSON API).

use async_trait::async_trait;
use haven_core::{Error, Result};
use serde_json::json;

use crate::message::{Delivery, Message};
use crate::provider::Mailer;

const API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS delivery. 200 emails/month on the free tier.
pub struct EmailJs {
    client: reqwest::Client,
    service_id: Option<String>,
    template_id: String,
    user_id: Option<String>,
}

impl EmailJs {
    /// Reads `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID` (default
    /// `"default"`), and `EMAILJS_USER_ID` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            service_id: std::env::var("EMAILJS_SERVICE_ID").ok(),
            template_id: std::env::var("EMAILJS_TEMPLATE_ID")
                .unwrap_or_else(|_| "default".to_string()),
            user_id: std::env::var("EMAILJS_USER_ID").ok(),
        }
    }
}

#[async_trait]
impl Mailer for EmailJs {
    fn name(&self) -> &str {
        "emailjs"
    }

    fn is_configured(&self) -> bool {
        self.service_id.is_some()
    }

    async fn send(&self, message: &Message) -> Result<Delivery> {
        let service_id = self.service_id.as_deref().ok_or(Error::NotConfigured {
            provider: "emailjs".to_string(),
        })?;

        let payload = json!({
            "service_id": service_id,
            "template_id": self.template_id,
            "user_id": self.user_id,
            "template_params": {
                "to_email": message.to,
                "subject": message.subject,
                "message": message.body,
                "html_message": message.html.as_deref().unwrap_or(&message.body),
            },
        });

        let response = self
            .client
            .post(API_URL)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider("emailjs", e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "emailjs",
                format!("API error: {}", response.status()),
            ));
        }

        Ok(Delivery::accepted("EmailJS Free Tier", &message.to))
    }
}
