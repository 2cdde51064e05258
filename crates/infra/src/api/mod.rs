//! Dashboard API client
//!
//! One [`ApiClient`] per process handles bearer decoration and the
//! refresh-on-401 protocol; the endpoint groups are thin typed wrappers that
//! all share it.

pub mod auth;
pub mod client;
pub mod notifications;
pub mod projects;
pub mod request;
pub mod tasks;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use notifications::NotificationsApi;
pub use projects::ProjectsApi;
pub use request::ApiRequest;
pub use tasks::TasksApi;
