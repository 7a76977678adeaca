//! Configuration model.
//!
//! `ShopConfig` is read from `config.toml`; every section has defaults so an
//! empty file is valid except for the feed URL, which must come from the file
//! or from the environment. Secrets live separately in `SecretConfig`.

use crate::catalog::ColumnMapping;
use crate::error::{Result, TiendaError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_BROWSE_LIMIT: usize = 20;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ShopConfig {
    pub feed: FeedConfig,
    pub catalog: CatalogConfig,
    pub assistant: AssistantConfig,
    pub handoff: HandoffConfig,
}

impl ShopConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShopConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the shop unusable.
    pub fn validate(&self) -> Result<()> {
        if self.feed.refresh_interval_secs == 0 {
            return Err(TiendaError::config(
                "feed.refresh_interval_secs must be greater than zero",
            ));
        }
        if self.catalog.browse_limit == 0 {
            return Err(TiendaError::config(
                "catalog.browse_limit must be greater than zero",
            ));
        }
        Ok(())
    }

    /// The catalog feed location. Startup cannot proceed without it.
    pub fn feed_url(&self) -> Result<&str> {
        match self.feed.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(TiendaError::configuration_missing(
                "catalog feed URL (feed.url or TIENDA_FEED_URL)",
            )),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    /// `http(s)://` URL or local path (`file://` prefix optional) of the CSV feed.
    pub url: Option<String>,
    /// How long a fetched snapshot is served before the feed is hit again.
    pub refresh_interval_secs: u64,
    pub columns: ColumnMapping,
}

impl FeedConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            columns: ColumnMapping::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Number of products listed when the search box is empty.
    pub browse_limit: usize,
    /// Shown when a non-empty query matches nothing.
    pub no_results_message: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            browse_limit: DEFAULT_BROWSE_LIMIT,
            no_results_message: "No encontré productos con ese nombre.".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub persona_name: String,
    pub store_name: String,
    pub model: String,
    /// First assistant message of every session.
    pub greeting: String,
    /// Shown instead of a reply when the engine call fails.
    pub apology: String,
    pub request_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona_name: "Lucho".to_string(),
            store_name: "Pedro Bravin S.A.".to_string(),
            model: "gemini-1.5-flash".to_string(),
            greeting: "Hola 👋. A la derecha tenés la lista de precios. Podés agregar cosas al carrito o preguntarme si tenés dudas técnicas.".to_string(),
            apology: "Lucho está descansando un segundo. Intentá de nuevo.".to_string(),
            request_timeout_secs: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HandoffConfig {
    pub base_url: String,
    pub phone: String,
    pub greeting: String,
    pub closing: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wa.me".to_string(),
            phone: "5493401527780".to_string(),
            greeting: "Hola Martín! Quiero comprar esto que armé en la web:".to_string(),
            closing: "Revisame el stock y precio final.".to_string(),
        }
    }
}

/// Provider credentials, stored apart from `ShopConfig`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Overrides `assistant.model` when set.
    #[serde(default)]
    pub model: Option<String>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
