//! Application context - dependency injection container

use std::sync::Arc;

use pmdash_core::{CredentialStorage, CredentialStore, RefreshCoordinator, SessionService};
use pmdash_domain::{ApiError, Config};
use pmdash_infra::{
    open_storage, ApiClient, ApiClientConfig, AuthApi, NotificationsApi, ProjectsApi, TasksApi,
};
use tracing::info;

/// Application context - holds all services and dependencies
///
/// Every endpoint group shares one [`ApiClient`], and therefore one
/// credential store and one refresh coordinator.
pub struct AppContext {
    pub config: Config,
    pub credentials: Arc<CredentialStore>,
    pub client: Arc<ApiClient>,
    pub session: SessionService,
    pub projects: ProjectsApi,
    pub tasks: TasksApi,
    pub notifications: NotificationsApi,
}

impl AppContext {
    /// Wire the application using the configured storage backend
    ///
    /// # Errors
    /// Returns an error if the storage backend or the API client cannot be
    /// created.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let storage = open_storage(&config.storage)?;
        Self::with_storage(config, storage)
    }

    /// Wire the application over an explicit storage backend
    pub fn with_storage(
        config: Config,
        storage: Arc<dyn CredentialStorage>,
    ) -> Result<Self, ApiError> {
        let credentials = Arc::new(CredentialStore::open(storage, config.storage.key.clone()));
        let coordinator = Arc::new(RefreshCoordinator::new());

        let client = Arc::new(
            ApiClient::builder()
                .config(ApiClientConfig::from(&config.api))
                .credentials(credentials.clone())
                .coordinator(coordinator)
                .build()?,
        );

        let session =
            SessionService::new(Arc::new(AuthApi::new(client.clone())), credentials.clone());

        info!(
            base_url = %client.base_url(),
            backend = %config.storage.backend,
            authenticated = credentials.is_authenticated(),
            "Application context ready"
        );

        Ok(Self {
            projects: ProjectsApi::new(client.clone()),
            tasks: TasksApi::new(client.clone()),
            notifications: NotificationsApi::new(client.clone()),
            config,
            credentials,
            client,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use pmdash_core::MemoryCredentialStorage;
    use pmdash_domain::{CredentialPair, StorageBackend};

    use super::*;

    #[test]
    fn context_picks_up_persisted_credentials() {
        let storage = Arc::new(MemoryCredentialStorage::with_record(
            "tokens",
            r#"{"access": "A1", "refresh": "R1"}"#,
        ));

        let ctx = AppContext::with_storage(Config::default(), storage).unwrap();

        assert!(ctx.session.is_authenticated());
        assert_eq!(ctx.credentials.current(), Some(CredentialPair::new("A1", "R1")));
        assert_eq!(ctx.client.base_url(), "http://127.0.0.1:8000/api");
    }

    #[test]
    fn memory_backend_starts_signed_out() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let ctx = AppContext::new(config).unwrap();

        assert!(!ctx.session.is_authenticated());
    }
}
