//! # Haven Server
//!
//! HTTP API for the Haven automation suite: contact form intake with
//! sliding-window rate limiting, document and donation packages,
//! appointment scheduling, the unified automation endpoint with a TTL
//! response cache, and the free-tier email endpoints.
//!
//! All responses are JSON envelopes; failures carry
//! `{"success": false, "error": "..."}` and nothing else leaves the
//! process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod error;
pub mod handlers;
pub mod ratelimit;
pub mod server;
pub mod wire;

pub use error::{ApiError, ApiResult};
pub use server::{AppState, Server, ServerConfig};
