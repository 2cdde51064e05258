//! Task and comment endpoints

use std::sync::Arc;

use pmdash_domain::constants::{task_comments_path, task_path, TASKS_PATH};
use pmdash_domain::{ApiError, Comment, CommentInput, ListResponse, Task, TaskInput};

use super::client::ApiClient;

/// `/tasks/*` endpoint group
#[derive(Clone)]
pub struct TasksApi {
    client: Arc<ApiClient>,
}

impl TasksApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let page: ListResponse<Task> = self.client.get(TASKS_PATH).await?;
        Ok(page.into_items())
    }

    pub async fn create(&self, input: &TaskInput) -> Result<Task, ApiError> {
        self.client.post(TASKS_PATH, input).await
    }

    pub async fn update(&self, id: i64, input: &TaskInput) -> Result<Task, ApiError> {
        self.client.put(&task_path(id), input).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&task_path(id)).await
    }

    pub async fn comments(&self, task_id: i64) -> Result<Vec<Comment>, ApiError> {
        let page: ListResponse<Comment> = self.client.get(&task_comments_path(task_id)).await?;
        Ok(page.into_items())
    }

    pub async fn add_comment(&self, task_id: i64, content: &str) -> Result<Comment, ApiError> {
        let body = CommentInput { content: content.to_string() };
        self.client.post(&task_comments_path(task_id), &body).await
    }
}
