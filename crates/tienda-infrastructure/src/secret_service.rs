//! Secret service implementation.
//!
//! Credentials come from the environment (`GOOGLE_API_KEY`, then
//! `GEMINI_API_KEY`) or from `secret.json`:
//!
//! ```json
//! { "gemini": { "api_key": "...", "model": "gemini-1.5-flash" } }
//! ```

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tienda_core::config::{GeminiConfig, SecretConfig};
use tienda_core::secret::SecretService;
use tienda_core::{Result, TiendaError};

use crate::config_service::{EnvLookup, process_env};
use crate::paths::TiendaPaths;

const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Loads secrets once and caches them.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: Option<PathBuf>,
    env: EnvLookup,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Uses `path` when given, otherwise the platform `secret.json`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self::with_env(path, process_env())
    }

    pub fn with_env(path: Option<PathBuf>, env: EnvLookup) -> Self {
        Self {
            path,
            env,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        {
            let cached = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref secrets) = *cached {
                return Ok(secrets.clone());
            }
        }

        let mut loaded = self.read_file()?;
        if let Some(api_key) = API_KEY_ENV_VARS
            .iter()
            .find_map(|key| (self.env)(key).filter(|value| !value.trim().is_empty()))
        {
            let model = loaded.gemini.as_ref().and_then(|g| g.model.clone());
            loaded.gemini = Some(GeminiConfig { api_key, model });
        }

        *self.secrets.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    fn read_file(&self) -> Result<SecretConfig> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => match TiendaPaths::secret_file() {
                Ok(path) => path,
                Err(_) => return Ok(SecretConfig::default()),
            },
        };
        if !path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        // serde_json errors can quote input; keep the file contents out of the message.
        serde_json::from_str(&content).map_err(|e| TiendaError::Serialization {
            format: "JSON".to_string(),
            message: format!(
                "{} is not valid secret JSON (line {}, column {})",
                path.display(),
                e.line(),
                e.column()
            ),
        })
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }
}
