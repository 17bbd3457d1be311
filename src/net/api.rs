//! REST collaborators for authentication and tenant inventory.
//!
//! Client-side (`csr`): real HTTP calls via `gloo-net`.
//! Native builds: [`HttpApi`] returns [`ApiError::Network`] since these
//! endpoints are only meaningful in the browser. Tests substitute their own
//! [`AuthApi`] / [`TenantApi`] implementations.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns a typed [`ApiError`]: a server-side refusal
//! (`success: false`) is kept distinct from a transport failure so callers
//! can show a validation message or a retry prompt respectively.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;

use super::types::{LoginData, NewTenant, RegisterRequest, Tenant};
use crate::util::storage::PersistedStore;

/// Failure reported by an API collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered and refused the request (bad credentials,
    /// validation failure). `field_errors` maps form fields to messages.
    #[error("{message}")]
    Rejected { message: String, field_errors: BTreeMap<String, String> },
    /// The request never produced a usable answer.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a body that does not match the envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into(), field_errors: BTreeMap::new() }
    }
}

/// Authentication endpoints.
#[async_trait::async_trait(?Send)]
pub trait AuthApi {
    /// Exchange credentials for a token and user record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for invalid credentials and
    /// [`ApiError::Network`] when the server cannot be reached.
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<LoginData, ApiError>;

    /// Create a new account. Returns the server's payload on success.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] (with per-field messages when the
    /// server supplies them) or [`ApiError::Network`].
    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError>;
}

/// Tenant (library) inventory endpoints.
#[async_trait::async_trait(?Send)]
pub trait TenantApi {
    /// Fetch every tenant visible to the current user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or is refused.
    async fn list_all(&self) -> Result<Vec<Tenant>, ApiError>;

    /// Create a tenant and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or is refused.
    async fn create(&self, fields: &NewTenant) -> Result<Tenant, ApiError>;
}

#[cfg(any(test, feature = "csr"))]
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(any(test, feature = "csr"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "csr"))]
fn status_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

/// Parse a response body into the payload. Server errors are transport
/// failures whatever the body says; otherwise the HTTP status is the fallback
/// when the body is not an envelope.
#[cfg(any(test, feature = "csr"))]
fn decode_response<T: serde::de::DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if status >= 500 || status == 0 {
        return Err(ApiError::Network(status_failed_message(status)));
    }
    match serde_json::from_str::<super::types::ApiEnvelope<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(e) if (200..300).contains(&status) => Err(ApiError::MalformedResponse(e.to_string())),
        Err(_) => Err(ApiError::rejected(status_failed_message(status))),
    }
}

/// HTTP implementation of [`AuthApi`] and [`TenantApi`].
///
/// Requests are authenticated with the token held in the persisted store, so
/// the client never needs to be rebuilt after login or logout.
#[derive(Clone, Debug)]
pub struct HttpApi {
    base: String,
    #[cfg_attr(not(feature = "csr"), allow(dead_code))]
    store: PersistedStore,
}

impl HttpApi {
    pub fn new(base: impl Into<String>, store: PersistedStore) -> Self {
        Self { base: base.into(), store }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    #[cfg(feature = "csr")]
    fn token(&self) -> Option<String> {
        self.store.read_parsed(crate::util::storage::StorageKey::AuthToken)
    }

    #[cfg(feature = "csr")]
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: Result<gloo_net::http::Request, gloo_net::Error>,
    ) -> Result<T, ApiError> {
        let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        decode_response(status, &body)
    }

    #[cfg(feature = "csr")]
    fn builder(&self, method: gloo_net::http::Method, path: &str) -> gloo_net::http::RequestBuilder {
        let builder = gloo_net::http::RequestBuilder::new(&endpoint(&self.base, path)).method(method);
        match self.token() {
            Some(token) => builder.header("Authorization", &bearer(&token)),
            None => builder,
        }
    }
}

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl AuthApi for HttpApi {
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<LoginData, ApiError> {
        let body = super::types::LoginRequest { email, password, remember_me };
        let request = self.builder(gloo_net::http::Method::POST, "auth/login").json(&body);
        self.send(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        let request = self.builder(gloo_net::http::Method::POST, "auth/register").json(request);
        self.send(request).await
    }
}

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl TenantApi for HttpApi {
    async fn list_all(&self) -> Result<Vec<Tenant>, ApiError> {
        let request = self.builder(gloo_net::http::Method::GET, "libraries").build();
        self.send(request).await
    }

    async fn create(&self, fields: &NewTenant) -> Result<Tenant, ApiError> {
        let request = self.builder(gloo_net::http::Method::POST, "libraries").json(fields);
        self.send(request).await
    }
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> ApiError {
    ApiError::Network("not available outside the browser".to_owned())
}

#[cfg(not(feature = "csr"))]
#[async_trait::async_trait(?Send)]
impl AuthApi for HttpApi {
    async fn login(&self, _email: &str, _password: &str, _remember_me: bool) -> Result<LoginData, ApiError> {
        Err(unavailable())
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        Err(unavailable())
    }
}

#[cfg(not(feature = "csr"))]
#[async_trait::async_trait(?Send)]
impl TenantApi for HttpApi {
    async fn list_all(&self) -> Result<Vec<Tenant>, ApiError> {
        Err(unavailable())
    }

    async fn create(&self, _fields: &NewTenant) -> Result<Tenant, ApiError> {
        Err(unavailable())
    }
}
