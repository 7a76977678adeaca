//! Error types for the Tienda application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Tienda application.
///
/// Catalog and engine failures are expected at runtime and are absorbed by
/// the component that produced them; they travel as values so the caller can
/// turn them into a user-facing notice.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TiendaError {
    /// Fetching or parsing the catalog feed failed.
    #[error("Catalog feed unavailable: {0}")]
    FeedUnavailable(String),

    /// The reasoning engine failed or returned malformed output.
    #[error("Reasoning engine failure: {message}")]
    EngineFailure { message: String, retryable: bool },

    /// A required setting (credential, feed URL) is absent.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// A chat turn is already awaiting a response for this session.
    #[error("A message is already being answered, wait for the reply")]
    TurnInFlight,

    /// The user submitted an empty chat message.
    #[error("Message is empty")]
    EmptyMessage,

    /// A catalog row index that does not exist in the current snapshot.
    #[error("Catalog row not found: {row}")]
    RowNotFound { row: usize },

    /// A row index taken from a catalog listing that has since been replaced.
    #[error("Catalog changed since row {row} was listed")]
    CatalogChanged { row: usize },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "CSV"
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TiendaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn feed_unavailable(message: impl Into<String>) -> Self {
        Self::FeedUnavailable(message.into())
    }

    pub fn engine_failure(message: impl Into<String>, retryable: bool) -> Self {
        Self::EngineFailure {
            message: message.into(),
            retryable,
        }
    }

    pub fn configuration_missing(what: impl Into<String>) -> Self {
        Self::ConfigurationMissing(what.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_feed_unavailable(&self) -> bool {
        matches!(self, Self::FeedUnavailable(_))
    }

    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::EngineFailure { .. })
    }

    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_))
    }

    /// Errors that leave the system usable and only warrant a notice.
    ///
    /// Returns false for missing configuration, which disables a capability
    /// until the process is restarted with the setting present.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigurationMissing(_) | Self::Internal(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TiendaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TiendaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TiendaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TiendaError>`.
pub type Result<T> = std::result::Result<T, TiendaError>;
