//! Secrets read from the process environment.
//!
//! Everything is resolved once at startup and handed to the clients that
//! need it; nothing here is global or mutated afterwards.

use std::fmt;
use std::path::PathBuf;

use super::errors::{OnpullError, Result};

pub const PINATA_JWT: &str = "PINATA_JWT";
pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_KEY: &str = "SUPABASE_KEY";
const ENCRYPTION_KEY_PREFIX: &str = "ENCRYPTION_KEY_";

/// What happened when looking for `.env`
#[derive(Debug)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

impl DotenvStatus {
    /// Report the outcome; call once the subscriber is installed
    pub fn log(&self) {
        match self {
            DotenvStatus::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            DotenvStatus::Missing => {}
            DotenvStatus::Unreadable(error) => tracing::warn!(error = %error, "ignoring unreadable .env"),
        }
    }
}

/// Load `.env` from the working directory into the process environment.
/// A missing file is not an error. Runs before argument parsing so that
/// `.env` can supply clap `env` defaults and `RUST_LOG`.
pub fn load_dotenv() -> DotenvStatus {
    match dotenvy::dotenv() {
        Ok(path) => DotenvStatus::Loaded(path),
        Err(e) if e.not_found() => DotenvStatus::Missing,
        Err(e) => DotenvStatus::Unreadable(e.to_string()),
    }
}

/// A secret string that never shows up in Debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([{} chars])", self.0.len())
    }
}

/// Bearer credential for the pinning service
#[derive(Debug, Clone)]
pub struct PinataCredentials {
    pub jwt: Secret,
}

/// Connection details for the relational store
#[derive(Debug, Clone)]
pub struct SupabaseCredentials {
    pub url: String,
    pub key: Secret,
}

impl PinataCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt = required(&lookup, PINATA_JWT)?;
        Ok(Self {
            jwt: Secret::new(jwt),
        })
    }
}

impl SupabaseCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = required(&lookup, SUPABASE_URL)?;
        let key = required(&lookup, SUPABASE_KEY)?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key: Secret::new(key),
        })
    }
}

/// Name of the environment variable holding the key for `ai_id`
pub fn encryption_key_var(ai_id: &str) -> String {
    format!("{}{}", ENCRYPTION_KEY_PREFIX, ai_id.to_uppercase())
}

/// Per-identity encryption key, if one is configured
pub fn encryption_key_from_env(ai_id: &str) -> Option<Secret> {
    std::env::var(encryption_key_var(ai_id))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Secret::new)
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(OnpullError::config(format!(
            "{} is not set (add it to .env or the environment)",
            name
        ))),
    }
}
