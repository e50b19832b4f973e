//! The provider seam.

use async_trait::async_trait;
use haven_core::Result;

use crate::message::{Delivery, Message};

/// A single email delivery backend.
///
/// Implementations are stateless beyond their credentials; a provider with
/// no credentials reports `is_configured() == false` and the chain skips it
/// without an attempt.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short provider name used in logs and responses.
    fn name(&self) -> &str;

    /// Whether the provider has the credentials it needs to attempt a send.
    fn is_configured(&self) -> bool;

    /// Attempts to deliver the message.
    ///
    /// # Errors
    ///
    /// Returns [`haven_core::Error::Provider`] when the backend rejects the
    /// message or the transport fails.
    async fn send(&self, message: &Message) -> Result<Delivery>;
}
