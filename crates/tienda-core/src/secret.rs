//! Secret management service trait.
//!
//! Defines the interface for loading provider credentials.

use crate::config::{GeminiConfig, SecretConfig};
use crate::error::{Result, TiendaError};

/// Service for managing secret configuration.
///
/// Implementations must never log or embed secret values in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration. A missing source yields an empty
    /// `SecretConfig`, not an error.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Loads the Gemini credential, failing with `ConfigurationMissing`
    /// when it is absent or blank.
    async fn gemini_credentials(&self) -> Result<GeminiConfig> {
        self.load_secrets()
            .await?
            .gemini
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                TiendaError::configuration_missing(
                    "Gemini API key (GOOGLE_API_KEY or secret.json)",
                )
            })
    }
}
