//! Session commands

use pmdash_domain::{ApiError, RegisterRequest, RegisteredAccount, UserProfile};
use tracing::info;

use crate::context::AppContext;
use crate::utils::execute_command;

/// Sign in and return the signed-in profile
pub async fn login(ctx: &AppContext, username: &str, password: &str) -> Result<UserProfile, ApiError> {
    info!(command = "auth::login", username = %username, "Signing in");
    execute_command("auth::login", || ctx.session.login(username, password)).await
}

pub async fn register(
    ctx: &AppContext,
    request: &RegisterRequest,
) -> Result<RegisteredAccount, ApiError> {
    execute_command("auth::register", || ctx.session.register(request)).await
}

/// Sign out; local credentials are cleared even if the server call fails
pub async fn logout(ctx: &AppContext) -> Result<(), ApiError> {
    execute_command("auth::logout", || ctx.session.logout()).await
}

pub async fn me(ctx: &AppContext) -> Result<UserProfile, ApiError> {
    execute_command("auth::me", || ctx.session.current_profile()).await
}
