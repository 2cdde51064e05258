//! Authentication types
//!
//! The credential pair, request bodies for the `/auth/*` endpoints and the
//! user profile returned by `/auth/me/`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Access + refresh credentials issued by the login endpoint.
///
/// Replaced wholesale on refresh or logout, never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access: String,
    pub refresh: String,
}

impl CredentialPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self { access: access.into(), refresh: refresh.into() }
    }

    /// A new pair carrying `access` and this pair's refresh credential.
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self { access: access.into(), refresh: self.refresh.clone() }
    }
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Collaborator,
    #[default]
    Viewer,
}

impl_domain_status_conversions!(Role {
    Admin => "admin",
    Collaborator => "collaborator",
    Viewer => "viewer",
});

/// Profile of the signed-in user (`GET /auth/me/`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// `POST /auth/login/`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /auth/register/`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub password: String,
    pub password2: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

/// Response of `POST /auth/register/`.
///
/// The server may issue tokens alongside the profile; they are exposed but
/// not stored, registration does not sign the user in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAccount {
    pub user: UserProfile,
    #[serde(default, skip_serializing)]
    pub access: Option<String>,
    #[serde(default, skip_serializing)]
    pub refresh: Option<String>,
}

impl RegisteredAccount {
    /// Issued credentials, if the server returned both halves.
    pub fn credentials(&self) -> Option<CredentialPair> {
        match (&self.access, &self.refresh) {
            (Some(access), Some(refresh)) => Some(CredentialPair::new(access, refresh)),
            _ => None,
        }
    }
}

impl fmt::Debug for RegisteredAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAccount")
            .field("user", &self.user)
            .field("issued_tokens", &self.credentials().is_some())
            .finish()
    }
}

/// `POST /auth/refresh/` and `POST /auth/logout/` body
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Logout carries the same body as a refresh
pub type LogoutRequest = RefreshRequest;

/// Response of `POST /auth/refresh/`.
///
/// `access` is optional on purpose: a 2xx without a usable access credential
/// is handled as a rejected refresh rather than a decode error.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
}

impl RefreshResponse {
    /// The new access credential, if present and non-empty
    pub fn into_access(self) -> Option<String> {
        self.access.filter(|access| !access.is_empty())
    }
}
