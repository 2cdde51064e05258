//! Project management commands

use pmdash_domain::{ApiError, MembershipInput, Project, ProjectInput, ProjectMembership};

use crate::context::AppContext;
use crate::utils::execute_command;

pub async fn list(ctx: &AppContext) -> Result<Vec<Project>, ApiError> {
    execute_command("projects::list", || ctx.projects.list()).await
}

pub async fn create(ctx: &AppContext, input: &ProjectInput) -> Result<Project, ApiError> {
    execute_command("projects::create", || ctx.projects.create(input)).await
}

pub async fn update(ctx: &AppContext, id: i64, input: &ProjectInput) -> Result<Project, ApiError> {
    execute_command("projects::update", || ctx.projects.update(id, input)).await
}

pub async fn remove(ctx: &AppContext, id: i64) -> Result<(), ApiError> {
    execute_command("projects::remove", || ctx.projects.remove(id)).await
}

/// Memberships of one project, or every visible membership when
/// `project_id` is `None`
pub async fn memberships(
    ctx: &AppContext,
    project_id: Option<i64>,
) -> Result<Vec<ProjectMembership>, ApiError> {
    match project_id {
        Some(id) => execute_command("projects::memberships", || ctx.projects.memberships(id)).await,
        None => execute_command("projects::list_memberships", || ctx.projects.list_memberships()).await,
    }
}

pub async fn add_member(
    ctx: &AppContext,
    input: &MembershipInput,
) -> Result<ProjectMembership, ApiError> {
    execute_command("projects::create_membership", || ctx.projects.create_membership(input)).await
}

pub async fn remove_member(ctx: &AppContext, membership_id: i64) -> Result<(), ApiError> {
    execute_command("projects::remove_membership", || {
        ctx.projects.remove_membership(membership_id)
    })
    .await
}
