//! Port interface for the authentication endpoints
//!
//! Implemented in infrastructure by the HTTP-backed auth API; mocked in tests.

use async_trait::async_trait;
use pmdash_domain::{ApiError, CredentialPair, LoginRequest, RegisterRequest, RegisteredAccount, UserProfile};

/// Remote authentication operations
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange username/password for a credential pair
    async fn login(&self, request: &LoginRequest) -> Result<CredentialPair, ApiError>;

    /// Create an account
    async fn register(&self, request: &RegisterRequest) -> Result<RegisteredAccount, ApiError>;

    /// Profile of the signed-in user
    async fn me(&self) -> Result<UserProfile, ApiError>;

    /// Invalidate `refresh` server-side
    async fn logout(&self, refresh: &str) -> Result<(), ApiError>;
}
