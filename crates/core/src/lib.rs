//! `cmms-core`
//!
//! **Responsibility:** shared identifiers and validation errors for the CMMS client.
//!
//! This crate has no IO and no knowledge of roles or sessions.

pub mod error;
pub mod id;

pub use error::{ValidationError, ValidationResult};
pub use id::{OrganizationId, UserId};
