//! Concrete delivery backends.
//!
//! Each provider reads its credentials from the environment at construction
//! time and is skipped by the chain when unconfigured.

mod emailjs;
mod gmail;
mod resend;
mod web3forms;

pub use emailjs::EmailJs;
pub use gmail::GmailSmtp;
pub use resend::Resend;
pub use web3forms::Web3Forms;
