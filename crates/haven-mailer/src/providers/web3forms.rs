//! Web3Forms backend (form-encoded submit API).

use async_trait::async_trait;
use haven_core::{Error, Result};

use crate::message::{Delivery, Message};
use crate::provider::Mailer;

const SUBMIT_URL: &str = "https://api.web3forms.com/submit";

/// Web3Forms delivery. Unlimited free tier, so it sits first in the chain.
pub struct Web3Forms {
    client: reqwest::Client,
    access_key: Option<String>,
    from_name: String,
}

impl Web3Forms {
    /// Reads `WEB3FORMS_ACCESS_KEY` from the environment.
    #[must_use]
    pub fn from_env(from_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key: std::env::var("WEB3FORMS_ACCESS_KEY").ok(),
            from_name: from_name.into(),
        }
    }
}

#[async_trait]
impl Mailer for Web3Forms {
    fn name(&self) -> &str {
        "web3forms"
    }

    fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    async fn send(&self, message: &Message) -> Result<Delivery> {
        let access_key = self.access_key.as_deref().ok_or(Error::NotConfigured {
            provider: "web3forms".to_string(),
        })?;

        let form = [
            ("access_key", access_key),
            ("email", &message.to),
            ("subject", &message.subject),
            (
                "message",
                message.html.as_deref().unwrap_or(&message.body),
            ),
            ("from_name", &self.from_name),
        ];

        let response = self
            .client
            .post(SUBMIT_URL)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::provider("web3forms", e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "web3forms",
                format!("API error: {}", response.status()),
            ));
        }

        Ok(Delivery::accepted("Web3Forms (Free)", &message.to))
    }
}
