use std::time::Duration;

use pmdash_domain::{ApiError, PmDashError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"projects::list"`).
/// * `elapsed` - Duration the command execution took.
/// * `error_type` - [`error_label`] of the failure, `None` on success.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&str>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error_type {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => warn!(command, duration_ms, error_type, "command_execution_failure"),
    }
}

/// Convert an `ApiError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ApiError) -> &'static str {
    match error {
        ApiError::Network(_) => "network",
        ApiError::AuthExpired(_) => "auth_expired",
        ApiError::RefreshRejected(_) => "refresh_rejected",
        ApiError::Validation(_) => "validation",
        ApiError::Server(_) => "server",
        ApiError::Decode(_) => "decode",
        ApiError::Local(PmDashError::Config(_)) => "config",
        ApiError::Local(PmDashError::Storage(_)) => "storage",
        ApiError::Local(PmDashError::Serialization(_)) => "serialization",
        ApiError::Local(PmDashError::Internal(_)) => "internal",
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `PMDASH_LOG_FORMAT`; anything other than `json` is pretty
    pub fn from_env() -> Self {
        match std::env::var("PMDASH_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `default_level`. Logs go to
/// stderr so command output on stdout stays machine-readable.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use pmdash_domain::HttpFailure;

    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&ApiError::Network("reset".into())), "network");
        assert_eq!(
            error_label(&ApiError::from_status(HttpFailure::new(401, "/auth/me/", ""))),
            "auth_expired"
        );
        assert_eq!(
            error_label(&ApiError::from_status(HttpFailure::new(400, "/tasks/tasks/", ""))),
            "validation"
        );
        assert_eq!(error_label(&ApiError::Local(PmDashError::Storage("ro".into()))), "storage");
    }

    #[test]
    fn log_command_execution_accepts_both_outcomes() {
        log_command_execution("projects::list", Duration::from_millis(12), None);
        log_command_execution("projects::list", Duration::from_millis(12), Some("network"));
    }
}
