use std::path::PathBuf;

use thiserror::Error;

use crate::pinning::files::Visibility;

/// Typed errors for onpull operations.
/// The binary wraps these in `anyhow` for CLI reporting,
/// but library modules stay precise about what failed.
#[derive(Debug, Error)]
pub enum OnpullError {
    /// Required configuration or credential is missing or invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Listing endpoint answered with a non-success status.
    /// Fatal for the scope being cleaned.
    #[error("Listing {visibility} files failed with status {status}: {detail}")]
    Listing {
        visibility: Visibility,
        status: u16,
        detail: String,
    },

    /// Request never produced a response
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Content gateway answered with a non-success status
    #[error("Gateway {url} returned status {status}")]
    Gateway { url: String, status: u16 },

    /// Pinning service rejected an upload
    #[error("Pinning failed with status {status}: {detail}")]
    Pin { status: u16, detail: String },

    /// Relational store rejected an insert or query
    #[error("Index request failed with status {status}: {detail}")]
    Index { status: u16, detail: String },

    /// Encryption, decryption or key parsing failed
    #[error("Crypto error: {message}")]
    Crypto { message: String },

    /// User-supplied input failed a presence check
    #[error("{message}")]
    Validation { message: String },

    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OnpullError>;

impl OnpullError {
    pub fn config(message: impl Into<String>) -> Self {
        OnpullError::Config {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        OnpullError::Validation {
            message: message.into(),
        }
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        OnpullError::Crypto {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OnpullError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts a cleanup scope (as opposed to a
    /// configuration problem that should stop the whole run)
    pub fn is_scope_fatal(&self) -> bool {
        matches!(
            self,
            OnpullError::Listing { .. } | OnpullError::Transport { .. } | OnpullError::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_error_message() {
        let err = OnpullError::Listing {
            visibility: Visibility::Private,
            status: 401,
            detail: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Listing private files failed with status 401: unauthorized"
        );
        assert!(err.is_scope_fatal());
    }

    #[test]
    fn test_gateway_error_message() {
        let err = OnpullError::Gateway {
            url: "https://gw.example/ipfs/bafy".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Gateway https://gw.example/ipfs/bafy returned status 404"
        );
        assert!(!err.is_scope_fatal());
    }

    #[test]
    fn test_config_error_not_scope_fatal() {
        let err = OnpullError::config("PINATA_JWT is not set");
        assert!(err.to_string().contains("PINATA_JWT"));
        assert!(!err.is_scope_fatal());
    }
}
