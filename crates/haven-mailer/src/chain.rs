//! Ordered provider fallback chain.

use std::sync::Arc;
use std::time::Duration;

use haven_core::OrgProfile;

use crate::message::{Delivery, Message, UnsentReport};
use crate::provider::Mailer;
use crate::providers::{EmailJs, Resend, Web3Forms};
use crate::retry::with_backoff;

/// Outcome of a dispatch through the chain.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A provider accepted the message.
    Sent(Delivery),
    /// No provider delivered; the message and setup options are returned.
    Unsent(Box<UnsentReport>),
}

impl DispatchOutcome {
    /// Whether the message was accepted by some provider.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// Tries providers in order until one accepts the message.
///
/// The first configured provider is attempted with exponential-backoff
/// retry; every later provider gets a single attempt. Failures are logged
/// and swallowed; the chain never errors, it reports.
pub struct MailerChain {
    mailers: Vec<Arc<dyn Mailer>>,
    retry_attempts: u32,
    base_delay: Duration,
}

impl MailerChain {
    /// Builds a chain over the given providers, in priority order.
    #[must_use]
    pub fn new(mailers: Vec<Arc<dyn Mailer>>) -> Self {
        Self {
            mailers,
            retry_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }

    /// The free-tier chain used by the form and email endpoints:
    /// Web3Forms, then Resend, then EmailJS.
    #[must_use]
    pub fn free_tier(org: &OrgProfile) -> Self {
        let default_from = format!("{} <noreply@{}>", org.name, org.website);
        Self::new(vec![
            Arc::new(Web3Forms::from_env(org.name.clone())),
            Arc::new(Resend::from_env(default_from)),
            Arc::new(EmailJs::from_env()),
        ])
    }

    /// Number of providers with credentials present.
    #[must_use]
    pub fn configured_count(&self) -> usize {
        self.mailers.iter().filter(|m| m.is_configured()).count()
    }

    /// Overrides the retry policy for the primary provider.
    #[must_use]
    pub fn with_retry(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.base_delay = base_delay;
        self
    }

    /// Dispatches a message through the chain.
    pub async fn dispatch(&self, message: &Message) -> DispatchOutcome {
        let mut attempted_primary = false;

        for mailer in &self.mailers {
            if !mailer.is_configured() {
                tracing::debug!(provider = mailer.name(), "Skipping unconfigured provider");
                continue;
            }

            let attempts = if attempted_primary {
                1
            } else {
                self.retry_attempts
            };
            attempted_primary = true;

            let result =
                with_backoff(attempts, self.base_delay, || mailer.send(message)).await;

            match result {
                Ok(delivery) => {
                    tracing::info!(
                        provider = mailer.name(),
                        to = %message.to,
                        "Email dispatched"
                    );
                    return DispatchOutcome::Sent(delivery);
                }
                Err(err) => {
                    tracing::warn!(
                        provider = mailer.name(),
                        error = %err,
                        "Provider failed, trying next option"
                    );
                }
            }
        }

        tracing::warn!(to = %message.to, "No email provider delivered the message");
        DispatchOutcome::Unsent(Box::new(UnsentReport::for_message(message.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use haven_core::{Error, Result};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubMailer {
        name: &'static str,
        configured: bool,
        fail_first: u32,
        calls: AtomicU32,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StubMailer {
        fn new(
            name: &'static str,
            configured: bool,
            fail_first: u32,
            log: Arc<Mutex<Vec<&'static str>>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                name,
                configured,
                fail_first,
                calls: AtomicU32::new(0),
                log,
            })
        }
    }

    #[async_trait]
    impl Mailer for StubMailer {
        fn name(&self) -> &str {
            self.name
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn send(&self, message: &Message) -> Result<Delivery> {
            self.log.lock().push(self.name);
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(Error::provider(self.name, "stub failure"))
            } else {
                Ok(Delivery::accepted(self.name, &message.to))
            }
        }
    }

    fn chain_of(mailers: Vec<Arc<dyn Mailer>>) -> MailerChain {
        MailerChain::new(mailers).with_retry(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = StubMailer::new("first", true, 0, Arc::clone(&log));
        let second = StubMailer::new("second", true, 0, Arc::clone(&log));
        let chain = chain_of(vec![first, second]);

        let outcome = chain.dispatch(&Message::new("a@b.com", "s", "b")).await;
        assert!(outcome.is_sent());
        assert_eq!(*log.lock(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_skips_unconfigured_providers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let missing = StubMailer::new("missing", false, 0, Arc::clone(&log));
        let backup = StubMailer::new("backup", true, 0, Arc::clone(&log));
        let chain = chain_of(vec![missing, backup]);

        let outcome = chain.dispatch(&Message::new("a@b.com", "s", "b")).await;
        assert!(outcome.is_sent());
        assert_eq!(*log.lock(), vec!["backup"]);
    }

    #[tokio::test]
    async fn test_primary_retried_fallback_single_attempt() {
        let log = Arc::new(Mutex::new(Vec::new()));
        // Primary fails all 3 retry attempts; fallback fails its single
        // attempt, so the flaky third provider is reached once.
        let primary = StubMailer::new("primary", true, 10, Arc::clone(&log));
        let fallback = StubMailer::new("fallback", true, 10, Arc::clone(&log));
        let last = StubMailer::new("last", true, 0, Arc::clone(&log));
        let chain = chain_of(vec![primary, fallback, last]);

        let outcome = chain.dispatch(&Message::new("a@b.com", "s", "b")).await;
        assert!(outcome.is_sent());
        assert_eq!(
            *log.lock(),
            vec!["primary", "primary", "primary", "fallback", "last"]
        );
    }

    #[tokio::test]
    async fn test_all_failed_yields_unsent_report() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let only = StubMailer::new("only", true, 10, Arc::clone(&log));
        let chain = chain_of(vec![only]);

        let message = Message::new("a@b.com", "subject line", "body text");
        match chain.dispatch(&message).await {
            DispatchOutcome::Unsent(report) => {
                assert_eq!(report.email_prepared.to, "a@b.com");
                assert_eq!(report.email_prepared.subject, "subject line");
                assert_eq!(report.free_options.len(), 3);
            }
            DispatchOutcome::Sent(_) => panic!("expected unsent"),
        }
    }

    #[tokio::test]
    async fn test_nothing_configured_yields_unsent_report() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = StubMailer::new("a", false, 0, Arc::clone(&log));
        let b = StubMailer::new("b", false, 0, Arc::clone(&log));
        let chain = chain_of(vec![a, b]);

        let outcome = chain.dispatch(&Message::new("a@b.com", "s", "b")).await;
        assert!(!outcome.is_sent());
        assert!(log.lock().is_empty());
    }
}
