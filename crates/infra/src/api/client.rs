//! API client with transparent token refresh
//!
//! Every call goes through the same pipeline:
//!
//! 1. The request is decorated with `Authorization: Bearer <access>` read from
//!    the credential store at send time (anonymous requests are left alone).
//! 2. Any response other than 401 is classified and returned.
//! 3. A 401 on an authenticated call, with a refresh credential present,
//!    enters the [`RefreshCoordinator`]: the first such call leads a single
//!    `POST /auth/refresh/`, later ones wait for its outcome.
//! 4. On success every participant retries once with the new access
//!    credential; on failure the credentials are cleared and every
//!    participant fails with its original 401.

use std::sync::Arc;
use std::time::Duration;

use pmdash_core::{CredentialStore, RefreshCoordinator, RefreshOutcome, RefreshTicket};
use pmdash_domain::constants::{API_PREFIX, AUTH_REFRESH_PATH};
use pmdash_domain::{ApiConfig, ApiError, HttpFailure, PmDashError, RefreshRequest, RefreshResponse};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::request::ApiRequest;
use crate::errors::transport_error;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API calls, including the `/api` prefix
    /// (e.g., "http://127.0.0.1:8000/api")
    pub base_url: String,
    /// Timeout for a whole request
    pub timeout: Duration,
    /// Timeout for establishing the connection
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    /// Explicit proxy; `None` follows the system proxy environment
    pub proxy: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: format!("{}{}", config.base_url.trim_end_matches('/'), API_PREFIX),
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            user_agent: config.user_agent.clone(),
            proxy: config.proxy.clone(),
        }
    }
}

/// Authenticated client for the dashboard API
pub struct ApiClient {
    http_client: HttpClient,
    config: ApiClientConfig,
    credentials: Arc<CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created
    pub fn new(
        config: ApiClientConfig,
        credentials: Arc<CredentialStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|e| {
            PmDashError::Config(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }
        let http_client = builder.build()?;

        Ok(Self { http_client, config, credentials, coordinator })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a request and decode its JSON response
    ///
    /// 204/205 responses decode from JSON `null`, so `()` and `Option<T>`
    /// work as response types.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the final attempt; see the module
    /// documentation for how 401 responses are handled.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.perform(&request).await?;
        let status = response.status();

        let result: R = if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    status.as_u16()
                ))
            })?
        } else {
            let bytes = response.bytes().await.map_err(transport_error)?;
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}")))?
        };

        debug!(status = %status, "Request successful");
        Ok(result)
    }

    /// GET `path`
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(ApiRequest::get(path)).await
    }

    /// POST `body` to `path`
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// PUT `body` to `path`
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    /// DELETE `path`, discarding any response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<serde_json::Value>(ApiRequest::delete(path)).await.map(|_| ())
    }

    async fn perform(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let access = self.decorate(request);
        let original = match self.attempt(request, access.as_deref()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if !original.is_auth_expired() || request.is_anonymous() {
            return Err(original);
        }

        if self.credentials.refresh_token().is_none() {
            debug!("Authorization failed and no refresh credential is held");
            return Err(original);
        }

        let outcome = match self.coordinator.begin() {
            RefreshTicket::Leader(lease) => {
                let outcome = self.refresh().await;
                let released = lease.settle(outcome.clone());
                debug!(released = ?released, "Released calls waiting on refresh");
                outcome
            }
            RefreshTicket::Waiter(waiter) => {
                let id = waiter.id();
                debug!(waiter = id, "Waiting for in-flight token refresh");
                waiter.wait().await
            }
        };

        match outcome {
            // The retry's outcome is final: a second 401 surfaces as is.
            RefreshOutcome::Refreshed(access) => self.attempt(request, Some(&access)).await,
            RefreshOutcome::Failed => Err(original),
        }
    }

    /// Access credential to attach, read from the store at call time
    fn decorate(&self, request: &ApiRequest) -> Option<String> {
        if request.is_anonymous() {
            return None;
        }
        self.credentials.access_token()
    }

    /// Send once and classify the status
    async fn attempt(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.url_for(request.path());
        let mut builder = self.http_client.request(request.method().clone(), &url);
        if !request.headers().is_empty() {
            builder = builder.headers(request.headers().clone());
        }
        if let Some(access) = access {
            builder = builder.bearer_auth(access);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = self.http_client.send(builder).await?;
        ensure_success(response, &url).await
    }

    /// Leader side of the refresh protocol.
    ///
    /// Always leaves the store consistent with the outcome: updated with the
    /// new access credential on success, cleared on any failure.
    async fn refresh(&self) -> RefreshOutcome {
        let Some(current) = self.credentials.current() else {
            return RefreshOutcome::Failed;
        };

        let result = match self.request_refresh(&current.refresh).await {
            Ok(access) => self
                .credentials
                .set_credentials(Some(current.with_access(access.as_str())))
                .map(|()| access)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(access) => {
                info!("Access credential refreshed");
                RefreshOutcome::Refreshed(access)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed; signing out");
                if let Err(clear_err) = self.credentials.set_credentials(None) {
                    warn!(error = %clear_err, "Failed to remove persisted credentials");
                }
                RefreshOutcome::Failed
            }
        }
    }

    /// `POST /auth/refresh/`, never decorated and never re-entering the
    /// refresh protocol
    async fn request_refresh(&self, refresh: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post(AUTH_REFRESH_PATH)
            .json(&RefreshRequest { refresh: refresh.to_string() })?
            .anonymous();

        let response = self
            .attempt(&request, None)
            .await
            .map_err(|e| ApiError::RefreshRejected(e.to_string()))?;

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::RefreshRejected(format!("unreadable refresh response: {e}")))?;

        body.into_access().ok_or_else(|| {
            ApiError::RefreshRejected("refresh response carried no access credential".into())
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

async fn ensure_success(response: Response, url: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = %status, url = %url, "Request failed");
    Err(ApiError::from_status(HttpFailure::new(status.as_u16(), url, body)))
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    credentials: Option<Arc<CredentialStore>>,
    coordinator: Option<Arc<RefreshCoordinator>>,
}

impl ApiClientBuilder {
    /// Set configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store
    pub fn credentials(mut self, credentials: Arc<CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Share a refresh coordinator (a fresh one is created otherwise)
    pub fn coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns error if the credential store is not set or client creation
    /// fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let credentials = self
            .credentials
            .ok_or_else(|| PmDashError::Config("Credential store is required".into()))?;
        let config = self.config.unwrap_or_default();
        let coordinator = self.coordinator.unwrap_or_default();

        ApiClient::new(config, credentials, coordinator)
    }
}
