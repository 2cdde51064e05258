//! Session service - login / logout orchestration
//!
//! Ties the authentication gateway to the credential store: a successful
//! login stores the issued pair before fetching the profile, and logout always
//! ends with the store cleared, whatever the server says.

pub mod ports;

use std::sync::Arc;

use pmdash_domain::{ApiError, LoginRequest, RegisterRequest, RegisteredAccount, UserProfile};
use tracing::{info, instrument, warn};

use self::ports::AuthGateway;
use crate::credentials::CredentialStore;

/// Session lifecycle service
pub struct SessionService {
    gateway: Arc<dyn AuthGateway>,
    credentials: Arc<CredentialStore>,
}

impl SessionService {
    pub fn new(gateway: Arc<dyn AuthGateway>, credentials: Arc<CredentialStore>) -> Self {
        Self { gateway, credentials }
    }

    /// Sign in and return the signed-in user's profile.
    ///
    /// Credentials are stored as soon as the login call succeeds; a failing
    /// profile fetch afterwards is returned but does not undo the login.
    ///
    /// # Errors
    /// Returns the login or profile error, or a local error if the
    /// credentials cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ApiError> {
        let pair = self.gateway.login(&LoginRequest::new(username, password)).await?;
        self.credentials.set_credentials(Some(pair))?;
        info!(username = %username, "Signed in");

        self.gateway.me().await
    }

    /// Create an account without signing in
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisteredAccount, ApiError> {
        let account = self.gateway.register(request).await?;
        info!(user_id = account.user.id, "Account registered");
        Ok(account)
    }

    /// Profile of the signed-in user
    pub async fn current_profile(&self) -> Result<UserProfile, ApiError> {
        self.gateway.me().await
    }

    /// Sign out.
    ///
    /// The server-side logout is best effort; local credentials are cleared
    /// regardless of its outcome.
    ///
    /// # Errors
    /// Returns a local error only if the persisted record cannot be removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh) = self.credentials.refresh_token() {
            if let Err(err) = self.gateway.logout(&refresh).await {
                warn!(error = %err, "Server-side logout failed; clearing local session anyway");
            }
        }

        self.credentials.set_credentials(None)?;
        info!("Signed out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }
}
