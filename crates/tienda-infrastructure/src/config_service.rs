//! Configuration service implementation.
//!
//! Loads `ShopConfig` from a TOML file (default `~/.config/tienda/config.toml`)
//! and applies environment overrides on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tienda_core::config::ShopConfig;
use tienda_core::{Result, TiendaError};

use crate::paths::TiendaPaths;

/// Environment variable that overrides `feed.url`.
pub const FEED_URL_ENV: &str = "TIENDA_FEED_URL";

/// Reads an environment variable. Injected so tests never touch the
/// process environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub fn process_env() -> EnvLookup {
    Arc::new(|key| std::env::var(key).ok())
}

pub struct ConfigService {
    path: Option<PathBuf>,
    env: EnvLookup,
}

impl ConfigService {
    /// Uses `path` when given, otherwise the platform config file.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self::with_env(path, process_env())
    }

    pub fn with_env(path: Option<PathBuf>, env: EnvLookup) -> Self {
        Self { path, env }
    }

    /// Loads the configuration.
    ///
    /// A missing default file means "all defaults". A missing file that was
    /// named explicitly is an error, as is invalid TOML.
    pub fn load(&self) -> Result<ShopConfig> {
        let mut config = match &self.path {
            Some(path) => Self::read_file(path)?,
            None => match TiendaPaths::config_file() {
                Ok(path) if path.exists() => Self::read_file(&path)?,
                Ok(path) => {
                    tracing::debug!(
                        path = %path.display(),
                        "[ConfigService] No config file, using defaults"
                    );
                    ShopConfig::default()
                }
                Err(_) => ShopConfig::default(),
            },
        };

        if let Some(url) = (self.env)(FEED_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.feed.url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ShopConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TiendaError::config(format!("Cannot read {}: {e}", path.display()))
        })?;
        let config = ShopConfig::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "[ConfigService] Configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> EnvLookup {
        Arc::new(|_| None)
    }

    #[test]
    fn test_loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[feed]\nurl = \"https://example.com/feed.csv\"\n\n[catalog]\nbrowse_limit = 12"
        )
        .unwrap();

        let config = ConfigService::with_env(Some(file.path().to_path_buf()), no_env())
            .load()
            .unwrap();

        assert_eq!(config.feed_url().unwrap(), "https://example.com/feed.csv");
        assert_eq!(config.catalog.browse_limit, 12);
    }

    #[test]
    fn test_env_overrides_feed_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\nurl = \"https://example.com/old.csv\"").unwrap();

        let env: EnvLookup = Arc::new(|key| {
            (key == FEED_URL_ENV).then(|| "/srv/catalogo.csv".to_string())
        });
        let config = ConfigService::with_env(Some(file.path().to_path_buf()), env)
            .load()
            .unwrap();

        assert_eq!(config.feed_url().unwrap(), "/srv/catalogo.csv");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            ConfigService::with_env(Some(dir.path().join("nope.toml")), no_env()).load();
        assert!(matches!(result, Err(TiendaError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed\nurl = ").unwrap();

        let result = ConfigService::with_env(Some(file.path().to_path_buf()), no_env()).load();
        assert!(matches!(result, Err(TiendaError::Serialization { .. })));
    }
}
