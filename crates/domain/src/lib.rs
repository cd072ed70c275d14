//! # idpkit Domain
//!
//! Domain types for the identity-management API client.
//!
//! This crate contains:
//! - Client configuration structures
//! - Domain error types and Result definitions
//! - Wire constants (origin template, auth scheme)
//! - User and group resource models
//!
//! ## Architecture
//! - No dependencies on other idpkit crates
//! - No I/O; pure data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
