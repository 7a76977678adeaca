//! Path management for tienda configuration files.
//!
//! ```text
//! ~/.config/tienda/            # Config directory (platform config dir)
//! ├── config.toml              # Shop configuration
//! └── secret.json              # API keys
//! ```

use std::path::PathBuf;

use tienda_core::{Result, TiendaError};

const APP_DIR: &str = "tienda";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";

pub struct TiendaPaths;

impl TiendaPaths {
    /// Returns the tienda configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| TiendaError::config("Cannot determine the user config directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SECRET_FILE))
    }
}
