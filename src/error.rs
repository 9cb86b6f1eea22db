//! Centralized error types for mailcollect.

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::ApiError;

/// All errors produced by the mailcollect library.
///
/// Callers branch on the variant, never on the message text.
#[derive(Error, Debug)]
pub enum CollectError {
    /// Pre-flight configuration problem. Always raised before any remote call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The mail service refused or could not be reached for the probe lookup.
    #[error(
        "Unable to query the mailbox. Connect with the following permission scopes and retry: {}",
        .scopes.join(", ")
    )]
    Auth {
        /// Permission scopes the operator must consent to.
        scopes: &'static [&'static str],
        source: ApiError,
    },

    /// A message could not be resolved or its content fetched.
    #[error("Could not collect message '{id}': {source}")]
    Lookup { id: String, source: ApiError },

    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, CollectError>`.
pub type Result<T> = std::result::Result<T, CollectError>;

impl CollectError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Lookup` variant for the given message identifier.
    pub fn lookup(id: impl Into<String>, source: ApiError) -> Self {
        Self::Lookup {
            id: id.into(),
            source,
        }
    }

    /// Create a `Config` variant.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_lists_scopes() {
        let err = CollectError::Auth {
            scopes: &["Mail.Read", "Mail.ReadBasic"],
            source: ApiError::NotConnected,
        };
        let msg = err.to_string();
        assert!(msg.contains("Mail.Read, Mail.ReadBasic"), "got: {msg}");
    }

    #[test]
    fn test_lookup_message_names_identifier() {
        let err = CollectError::lookup("<abc@example.com>", ApiError::NotFound);
        assert!(err.to_string().contains("<abc@example.com>"));
    }
}
