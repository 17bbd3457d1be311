//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types double as the persisted representation: the user record and
//! the selected tenant snapshot are written to storage with the same serde
//! shape the server sends, so a restored value is indistinguishable from a
//! freshly fetched one.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::api::ApiError;

/// User role as reported by the server.
///
/// Known roles get their own variant; anything else is carried verbatim so a
/// newer server can introduce roles without breaking session restore.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SystemAdmin,
    OrgAdmin,
    Staff,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::OrgAdmin => "org_admin",
            Self::Staff => "staff",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "system_admin" => Self::SystemAdmin,
            "org_admin" => Self::OrgAdmin,
            "staff" => Self::Staff,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user as returned by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

/// Identifier that the server sends either as a JSON number or as a string.
///
/// Two ids are equal when both carry the same integer value, whatever their
/// encoding; non-numeric ids compare as text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Integer value of the id, if it has one.
    pub fn numeric_value(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.to_string() == other.to_string(),
            _ => false,
        }
    }
}

impl Eq for RecordId {}

pub type UserId = RecordId;
pub type TenantId = RecordId;

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Operational status of a tenant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TenantStatus {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl From<String> for TenantStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::Other(raw),
        }
    }
}

impl From<TenantStatus> for String {
    fn from(status: TenantStatus) -> Self {
        match status {
            TenantStatus::Active => "active".to_owned(),
            TenantStatus::Inactive => "inactive".to_owned(),
            TenantStatus::Other(raw) => raw,
        }
    }
}

/// A library / tuition center that scopes all CRUD data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TenantStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seat_limit: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_members: u32,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Treat an explicit JSON `null` like a missing key. Backends send `null`
/// for empty columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields accepted by the tenant create endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub name: String,
    pub code: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub seat_limit: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Payload of a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

/// Login request body.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// Registration request body.
///
/// The registration wizard collects organization details beyond the account
/// fields; those travel in `details` and are flattened into the body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

/// Standard response envelope used by every REST endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, String>>,
}

impl<T> ApiEnvelope<T> {
    /// Convert the envelope into the payload or a typed rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the server reports `success: false`
    /// and [`ApiError::MalformedResponse`] when a successful envelope carries
    /// no data.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.message.unwrap_or_else(|| "request failed".to_owned()),
                field_errors: self.errors.unwrap_or_default(),
            });
        }
        self.data.ok_or_else(|| ApiError::MalformedResponse("missing data".to_owned()))
    }
}
