//! # Haven Workflows
//!
//! Standalone automation systems that outlive a single request: the
//! appointment book and the donor ledger.
//!
//! Persistence is deliberately primitive: each system owns one flat JSON
//! file, read fully into memory at open and rewritten wholesale on every
//! mutation. There is no locking, no schema versioning, and no partial
//! update; two processes sharing a file will clobber each other. That is
//! an accepted property of the deployment, not something callers should
//! work around here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod appointments;
pub mod donors;
pub mod store;

pub use appointments::{Appointment, AppointmentBook, AppointmentStatus};
pub use donors::{Donor, DonorLedger};
