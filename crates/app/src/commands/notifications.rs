//! Notification commands

use pmdash_domain::{ApiError, Detail, Notification};

use crate::context::AppContext;
use crate::utils::execute_command;

pub async fn list(ctx: &AppContext) -> Result<Vec<Notification>, ApiError> {
    execute_command("notifications::list", || ctx.notifications.list()).await
}

pub async fn mark_read(ctx: &AppContext, id: i64) -> Result<Detail, ApiError> {
    execute_command("notifications::mark_read", || ctx.notifications.mark_read(id)).await
}

pub async fn mark_unread(ctx: &AppContext, id: i64) -> Result<Detail, ApiError> {
    execute_command("notifications::mark_unread", || ctx.notifications.mark_unread(id)).await
}
