//! Application constants
//!
//! Endpoint paths and defaults shared by the client, the config loader and
//! the command-line front-end. Paths are relative to `<base_url>/api`.

// Connection defaults
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// Credential persistence
pub const DEFAULT_CREDENTIALS_KEY: &str = "tokens";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "pmdash";

// Authentication endpoints
pub const AUTH_LOGIN_PATH: &str = "/auth/login/";
pub const AUTH_REGISTER_PATH: &str = "/auth/register/";
pub const AUTH_ME_PATH: &str = "/auth/me/";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout/";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh/";

// Resource collections
pub const PROJECTS_PATH: &str = "/projects/projects/";
pub const MEMBERSHIPS_PATH: &str = "/projects/memberships/";
pub const TASKS_PATH: &str = "/tasks/tasks/";
pub const NOTIFICATIONS_PATH: &str = "/notifications/notifications/";

/// Path of a single project.
pub fn project_path(id: i64) -> String {
    format!("{PROJECTS_PATH}{id}/")
}

/// Memberships nested under a project.
pub fn project_memberships_path(project_id: i64) -> String {
    format!("{PROJECTS_PATH}{project_id}/memberships/")
}

/// Path of a single membership.
pub fn membership_path(id: i64) -> String {
    format!("{MEMBERSHIPS_PATH}{id}/")
}

/// Path of a single task.
pub fn task_path(id: i64) -> String {
    format!("{TASKS_PATH}{id}/")
}

/// Comments nested under a task.
pub fn task_comments_path(task_id: i64) -> String {
    format!("{TASKS_PATH}{task_id}/comments/")
}

/// `mark_read` action of a notification.
pub fn notification_mark_read_path(id: i64) -> String {
    format!("{NOTIFICATIONS_PATH}{id}/mark_read/")
}

/// `mark_unread` action of a notification.
pub fn notification_mark_unread_path(id: i64) -> String {
    format!("{NOTIFICATIONS_PATH}{id}/mark_unread/")
}
