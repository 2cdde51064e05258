//! Task commands

use pmdash_domain::{ApiError, Comment, Task, TaskInput};

use crate::context::AppContext;
use crate::utils::execute_command;

pub async fn list(ctx: &AppContext) -> Result<Vec<Task>, ApiError> {
    execute_command("tasks::list", || ctx.tasks.list()).await
}

pub async fn create(ctx: &AppContext, input: &TaskInput) -> Result<Task, ApiError> {
    execute_command("tasks::create", || ctx.tasks.create(input)).await
}

pub async fn update(ctx: &AppContext, id: i64, input: &TaskInput) -> Result<Task, ApiError> {
    execute_command("tasks::update", || ctx.tasks.update(id, input)).await
}

pub async fn remove(ctx: &AppContext, id: i64) -> Result<(), ApiError> {
    execute_command("tasks::remove", || ctx.tasks.remove(id)).await
}

pub async fn comments(ctx: &AppContext, task_id: i64) -> Result<Vec<Comment>, ApiError> {
    execute_command("tasks::comments", || ctx.tasks.comments(task_id)).await
}

pub async fn add_comment(ctx: &AppContext, task_id: i64, content: &str) -> Result<Comment, ApiError> {
    execute_command("tasks::add_comment", || ctx.tasks.add_comment(task_id, content)).await
}
