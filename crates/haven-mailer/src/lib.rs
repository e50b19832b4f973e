//! # Haven Mailer
//!
//! Outbound email for the Haven suite.
//!
//! Delivery goes through an ordered chain of providers: the primary is
//! attempted with exponential-backoff retry, then each remaining configured
//! provider gets one attempt. When every provider fails or none is
//! configured, the chain returns a structured "unsent" report carrying the
//! prepared message and free-tier setup options instead of an error, so
//! callers never block end users on notification plumbing.
//!
//! There is no idempotency key; a caller that retries after a partial
//! failure may produce duplicate sends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod message;
pub mod provider;
pub mod providers;
pub mod retry;

pub use chain::{DispatchOutcome, MailerChain};
pub use message::{Delivery, Message, SetupOption, UnsentReport};
pub use provider::Mailer;
pub use retry::with_backoff;
