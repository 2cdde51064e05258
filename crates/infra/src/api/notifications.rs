//! Notification endpoints

use std::sync::Arc;

use pmdash_domain::constants::{
    notification_mark_read_path, notification_mark_unread_path, NOTIFICATIONS_PATH,
};
use pmdash_domain::{ApiError, Detail, ListResponse, Notification};

use super::client::ApiClient;
use super::request::ApiRequest;

/// `/notifications/*` endpoint group
#[derive(Clone)]
pub struct NotificationsApi {
    client: Arc<ApiClient>,
}

impl NotificationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        let page: ListResponse<Notification> = self.client.get(NOTIFICATIONS_PATH).await?;
        Ok(page.into_items())
    }

    pub async fn mark_read(&self, id: i64) -> Result<Detail, ApiError> {
        self.action(notification_mark_read_path(id)).await
    }

    pub async fn mark_unread(&self, id: i64) -> Result<Detail, ApiError> {
        self.action(notification_mark_unread_path(id)).await
    }

    // Body-less POST; an empty 204 reads as an empty detail.
    async fn action(&self, path: String) -> Result<Detail, ApiError> {
        let detail: Option<Detail> = self.client.execute(ApiRequest::post(path)).await?;
        Ok(detail.unwrap_or_default())
    }
}
