//! # Haven Core
//!
//! Core types and helpers shared across the Haven automation suite.
//!
//! This crate provides the foundational pieces used by every other component:
//! - Common error types
//! - Input sanitization and field validation
//! - Document and email text templates
//! - The organization profile (contact details interpolated into letters)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod letters;
pub mod org;
pub mod validate;

pub use error::{Error, Result};
pub use ids::timestamp_id;
pub use letters::Document;
pub use org::OrgProfile;
