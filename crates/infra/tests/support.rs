//! Shared fixtures for the API integration suites

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use pmdash_core::{CredentialStorage, CredentialStore, MemoryCredentialStorage};
use pmdash_domain::CredentialPair;
use pmdash_infra::{ApiClient, ApiClientConfig};
use wiremock::MockServer;

/// Client wired to a mock server, with its storage exposed for assertions
pub struct TestClient {
    pub client: Arc<ApiClient>,
    pub credentials: Arc<CredentialStore>,
    pub storage: Arc<MemoryCredentialStorage>,
}

impl TestClient {
    pub fn new(server: &MockServer, pair: Option<CredentialPair>) -> Self {
        Self::with_timeout(server, pair, Duration::from_secs(5))
    }

    pub fn with_timeout(server: &MockServer, pair: Option<CredentialPair>, timeout: Duration) -> Self {
        let storage = Arc::new(MemoryCredentialStorage::new());
        let credentials = Arc::new(CredentialStore::open(storage.clone(), "tokens"));
        credentials.set_credentials(pair).expect("seed credentials");

        let client = ApiClient::builder()
            .config(ApiClientConfig {
                base_url: format!("{}/api", server.uri()),
                timeout,
                connect_timeout: Duration::from_secs(2),
                user_agent: Some("pmdash-tests".into()),
                proxy: None,
            })
            .credentials(credentials.clone())
            .build()
            .expect("api client");

        Self { client: Arc::new(client), credentials, storage }
    }

    /// Raw persisted credential record
    pub fn persisted(&self) -> Option<String> {
        self.storage.read("tokens").expect("memory storage read")
    }

    pub fn refreshes_started(&self) -> u64 {
        self.client.coordinator().refreshes_started()
    }
}

/// Install a test subscriber once so `RUST_LOG` works when debugging
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn pair(access: &str, refresh: &str) -> CredentialPair {
    CredentialPair::new(access, refresh)
}
