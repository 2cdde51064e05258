//! # PM Dashboard Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP transport and the authenticated API client (bearer decoration,
//!   refresh-on-401 coordination, typed endpoint groups)
//! - Credential storage backends (JSON file, OS keychain behind the
//!   `native-keychain` feature)
//! - The configuration loader (environment, JSON, TOML)
//!
//! ## Architecture
//! - Implements traits defined in `pmdash-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiClientConfig, ApiRequest, AuthApi, NotificationsApi,
    ProjectsApi, TasksApi,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{open_storage, FileCredentialStorage};
#[cfg(feature = "native-keychain")]
pub use storage::KeychainCredentialStorage;
