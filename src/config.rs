//! Client configuration.
//!
//! A browser bundle has no process environment, so values are baked in at
//! build time (`option_env!`) and fall back to defaults that match a server
//! hosting the API under `/api` on the same origin.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_STORAGE_PREFIX: &str = "";

pub const API_BASE_VAR: &str = "FEEDESK_API_BASE";
pub const STORAGE_PREFIX_VAR: &str = "FEEDESK_STORAGE_PREFIX";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an absolute path or http(s) URL, got {value:?}")]
    InvalidApiBase { var: &'static str, value: String },
    #[error("{var} may only contain ASCII letters, digits, '.', '_' or '-', got {value:?}")]
    InvalidStoragePrefix { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base: String,
    /// Prefix applied to every persisted storage key.
    pub storage_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base: DEFAULT_API_BASE.to_owned(), storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned() }
    }
}

impl ClientConfig {
    /// Build config from values captured when the bundle was compiled.
    ///
    /// Optional:
    /// - `FEEDESK_API_BASE`: default `/api`
    /// - `FEEDESK_STORAGE_PREFIX`: default empty
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a captured value is malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| match var {
            API_BASE_VAR => option_env!("FEEDESK_API_BASE").map(str::to_owned),
            STORAGE_PREFIX_VAR => option_env!("FEEDESK_STORAGE_PREFIX").map(str::to_owned),
            _ => None,
        })
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = parse_api_base(lookup(API_BASE_VAR).as_deref())?;
        let storage_prefix = parse_storage_prefix(lookup(STORAGE_PREFIX_VAR).as_deref())?;
        Ok(Self { api_base, storage_prefix })
    }
}

fn parse_api_base(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = raw.map_or(DEFAULT_API_BASE, str::trim);
    if value.is_empty() {
        return Ok(DEFAULT_API_BASE.to_owned());
    }
    let valid = value.starts_with('/') || value.starts_with("http://") || value.starts_with("https://");
    if !valid {
        return Err(ConfigError::InvalidApiBase { var: API_BASE_VAR, value: value.to_owned() });
    }
    let trimmed = value.trim_end_matches('/');
    Ok(if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() })
}

fn parse_storage_prefix(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = raw.unwrap_or(DEFAULT_STORAGE_PREFIX).trim();
    let valid = value.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(ConfigError::InvalidStoragePrefix { var: STORAGE_PREFIX_VAR, value: value.to_owned() });
    }
    Ok(value.to_owned())
}
