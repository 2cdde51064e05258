//! # PM Dashboard Domain
//!
//! Business domain types and models for the PM Dashboard client.
//!
//! This crate contains:
//! - Wire types mirrored from the dashboard REST API (projects, tasks, ...)
//! - The credential pair issued by the authentication endpoints
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Endpoint paths and other constants
//!
//! ## Architecture
//! - No dependencies on other pmdash crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
