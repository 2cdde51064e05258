//! Notification inbox types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification about an event relevant to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user: i64,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// `{"detail": "..."}` acknowledgement returned by action endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(default)]
    pub detail: String,
}
