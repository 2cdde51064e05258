//! Project and membership endpoints

use std::sync::Arc;

use pmdash_domain::constants::{
    membership_path, project_memberships_path, project_path, MEMBERSHIPS_PATH, PROJECTS_PATH,
};
use pmdash_domain::{
    ApiError, ListResponse, MembershipInput, Project, ProjectInput, ProjectMembership,
};

use super::client::ApiClient;

/// `/projects/*` endpoint group
#[derive(Clone)]
pub struct ProjectsApi {
    client: Arc<ApiClient>,
}

impl ProjectsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Projects visible to the signed-in user
    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let page: ListResponse<Project> = self.client.get(PROJECTS_PATH).await?;
        Ok(page.into_items())
    }

    pub async fn create(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        self.client.post(PROJECTS_PATH, input).await
    }

    pub async fn update(&self, id: i64, input: &ProjectInput) -> Result<Project, ApiError> {
        self.client.put(&project_path(id), input).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&project_path(id)).await
    }

    /// Memberships of one project
    pub async fn memberships(&self, project_id: i64) -> Result<Vec<ProjectMembership>, ApiError> {
        let page: ListResponse<ProjectMembership> =
            self.client.get(&project_memberships_path(project_id)).await?;
        Ok(page.into_items())
    }

    /// Every membership visible to the signed-in user
    pub async fn list_memberships(&self) -> Result<Vec<ProjectMembership>, ApiError> {
        let page: ListResponse<ProjectMembership> = self.client.get(MEMBERSHIPS_PATH).await?;
        Ok(page.into_items())
    }

    pub async fn create_membership(
        &self,
        input: &MembershipInput,
    ) -> Result<ProjectMembership, ApiError> {
        self.client.post(MEMBERSHIPS_PATH, input).await
    }

    pub async fn remove_membership(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&membership_path(id)).await
    }
}
