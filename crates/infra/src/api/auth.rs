//! Authentication endpoints
//!
//! Login, register and refresh are anonymous: they never carry a bearer
//! header and a 401 from them is final.

use std::sync::Arc;

use async_trait::async_trait;
use pmdash_core::AuthGateway;
use pmdash_domain::constants::{AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_ME_PATH, AUTH_REGISTER_PATH};
use pmdash_domain::{
    ApiError, CredentialPair, Detail, LoginRequest, LogoutRequest, RegisterRequest,
    RegisteredAccount, UserProfile,
};
use tracing::instrument;

use super::client::ApiClient;
use super::request::ApiRequest;

/// `/auth/*` endpoint group
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for AuthApi {
    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn login(&self, request: &LoginRequest) -> Result<CredentialPair, ApiError> {
        self.client.execute(ApiRequest::post(AUTH_LOGIN_PATH).json(request)?.anonymous()).await
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn register(&self, request: &RegisterRequest) -> Result<RegisteredAccount, ApiError> {
        self.client.execute(ApiRequest::post(AUTH_REGISTER_PATH).json(request)?.anonymous()).await
    }

    async fn me(&self) -> Result<UserProfile, ApiError> {
        self.client.get(AUTH_ME_PATH).await
    }

    #[instrument(skip_all)]
    async fn logout(&self, refresh: &str) -> Result<(), ApiError> {
        let body = LogoutRequest { refresh: refresh.to_string() };
        let _: Option<Detail> = self.client.post(AUTH_LOGOUT_PATH, &body).await?;
        Ok(())
    }
}
