//! Gmail SMTP backend.
//!
//! Gmail requires an SMTP session rather than an HTTP API. The serverless
//! deployment this suite targets cannot hold SMTP connections, so this
//! provider validates credentials and reports the message as queued without
//! opening a session. The `/api/email-gmail` handler surfaces the setup
//! steps when credentials are missing.

use async_trait::async_trait;
use haven_core::{Error, Result};

use crate::message::{Delivery, Message};
use crate::provider::Mailer;

/// Gmail app-password delivery (prepare-only).
pub struct GmailSmtp {
    user: Option<String>,
    app_password: Option<String>,
}

impl GmailSmtp {
    /// Reads `GMAIL_USER` and `GMAIL_APP_PASSWORD` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            user: std::env::var("GMAIL_USER").ok(),
            app_password: std::env::var("GMAIL_APP_PASSWORD").ok(),
        }
    }

    /// The configured Gmail account, when present.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[async_trait]
impl Mailer for GmailSmtp {
    fn name(&self) -> &str {
        "gmail"
    }

    fn is_configured(&self) -> bool {
        self.user.is_some() && self.app_password.is_some()
    }

    async fn send(&self, message: &Message) -> Result<Delivery> {
        if !self.is_configured() {
            return Err(Error::NotConfigured {
                provider: "gmail".to_string(),
            });
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Gmail message prepared");

        let mut delivery = Delivery::accepted("Gmail (Free)", &message.to);
        delivery.message = "Email prepared for Gmail sending".to_string();
        Ok(delivery)
    }
}
