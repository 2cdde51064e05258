//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

#[cfg(feature = "native-keychain")]
use keyring::Error as KeyringError;
use pmdash_domain::{ApiError, PmDashError};
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PmDashError);

impl From<InfraError> for PmDashError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        ApiError::Local(value.0)
    }
}

impl From<PmDashError> for InfraError {
    fn from(value: PmDashError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPmDashError {
    fn into_pmdash(self) -> PmDashError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → PmDashError */
/* -------------------------------------------------------------------------- */

#[cfg(feature = "native-keychain")]
impl IntoPmDashError for KeyringError {
    fn into_pmdash(self) -> PmDashError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => PmDashError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                PmDashError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => PmDashError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                PmDashError::Config(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => PmDashError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                PmDashError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => PmDashError::Storage(description),
        }
    }
}

#[cfg(feature = "native-keychain")]
impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_pmdash())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → PmDashError */
/* -------------------------------------------------------------------------- */

impl IntoPmDashError for IoError {
    fn into_pmdash(self) -> PmDashError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::PermissionDenied => {
                PmDashError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::NotFound => PmDashError::Storage(format!("path not found: {self}")),
            _ => PmDashError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_pmdash())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PmDashError */
/* -------------------------------------------------------------------------- */

impl IntoPmDashError for JsonError {
    fn into_pmdash(self) -> PmDashError {
        PmDashError::Serialization(self.to_string())
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_pmdash())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PmDashError / ApiError */
/* -------------------------------------------------------------------------- */

impl IntoPmDashError for HttpError {
    fn into_pmdash(self) -> PmDashError {
        if self.is_builder() {
            return PmDashError::Config(format!("invalid HTTP client configuration: {self}"));
        }
        PmDashError::Internal(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_pmdash())
    }
}

/// Map a failed send or body read to the API error taxonomy.
///
/// Anything that prevented a complete response from arriving is a network
/// failure; a body that arrived but could not be decoded is a decode failure.
pub fn transport_error(err: HttpError) -> ApiError {
    if err.is_timeout() {
        return ApiError::Network(format!("HTTP request timed out: {err}"));
    }

    if err.is_connect() {
        return ApiError::Network(format!("HTTP connection failure: {err}"));
    }

    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }

    if err.is_builder() {
        return ApiError::Local(PmDashError::Internal(format!("invalid request: {err}")));
    }

    ApiError::Network(err.to_string())
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
