//! Request descriptor
//!
//! An [`ApiRequest`] captures everything needed to send a call again: the
//! JSON body is serialized up front and extra headers are kept alongside, so
//! the authorization retry can resend the identical request.

use pmdash_domain::{ApiError, PmDashError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A call against the dashboard API, relative to `<base_url>/api`
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: HeaderMap,
    anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: HeaderMap::new(), anonymous: false }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    ///
    /// # Errors
    /// Returns `ApiError::Local` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            PmDashError::Serialization(format!("Failed to serialize request body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add an extra header to every attempt of this call
    ///
    /// `Authorization` is owned by credential decoration and is ignored here.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if name != AUTHORIZATION {
            self.headers.insert(name, value);
        }
        self
    }

    /// Send without an `Authorization` header and never enter the refresh
    /// protocol on 401.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_body_is_captured_for_resend() {
        let request =
            ApiRequest::post("/tasks/tasks/3/comments/").json(&json!({"content": "hi"})).unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), Some(&json!({"content": "hi"})));
        assert!(!request.is_anonymous());
    }

    #[test]
    fn authorization_cannot_be_set_by_hand() {
        let request = ApiRequest::get("/auth/me/")
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"))
            .header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("42"));

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers().get("x-request-id").unwrap(), "42");
    }

    #[test]
    fn anonymous_flag_is_opt_in() {
        assert!(ApiRequest::post("/auth/login/").anonymous().is_anonymous());
        assert!(!ApiRequest::get("/auth/me/").is_anonymous());
    }
}
