//! Resend backend (JSON API, bearer auth).

use async_trait::async_trait;
use haven_core::{Error, Result};
use serde_json::json;

use crate::message::{Delivery, Message};
use crate::provider::Mailer;

const API_URL: &str = "https://api.resend.com/emails";

/// Resend delivery. 3,000 emails/month on the free tier.
pub struct Resend {
    client: reqwest::Client,
    api_key: Option<String>,
    default_from: String,
}

impl Resend {
    /// Reads `RESEND_API_KEY` from the environment.
    #[must_use]
    pub fn from_env(default_from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: std::env::var("RESEND_API_KEY").ok(),
            default_from: default_from.into(),
        }
    }
}

#[async_trait]
impl Mailer for Resend {
    fn name(&self) -> &str {
        "resend"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, message: &Message) -> Result<Delivery> {
        let api_key = self.api_key.as_deref().ok_or(Error::NotConfigured {
            provider: "resend".to_string(),
        })?;

        let payload = json!({
            "from": message.from.as_deref().unwrap_or(&self.default_from),
            "to": [message.to],
            "subject": message.subject,
            "html": message.html.as_deref().unwrap_or(&message.body),
            "text": message.body,
        });

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider("resend", e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "resend",
                format!("API error: {}", response.status()),
            ));
        }

        Ok(Delivery::accepted("Resend Free Tier", &message.to))
    }
}
