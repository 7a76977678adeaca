//! Catalog feed adapters.
//!
//! - `HttpCsvFeed`: pulls a published spreadsheet (or any CSV URL) over HTTP
//! - `FileCsvFeed`: reads a local CSV file, for offline use and tests

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tienda_core::catalog::{CatalogFeed, CatalogTable};
use tienda_core::{Result, TiendaError};

use crate::csv_catalog::parse_catalog_csv;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the adapter matching `location`: `http://` and `https://` go over
/// the network, `file://` or anything else is treated as a local path.
pub fn catalog_feed_for(location: &str) -> Result<Arc<dyn CatalogFeed>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpCsvFeed::new(location)?))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Ok(Arc::new(FileCsvFeed::new(path)))
    }
}

#[derive(Clone)]
pub struct HttpCsvFeed {
    client: Client,
    url: String,
}

impl HttpCsvFeed {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TiendaError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogFeed for HttpCsvFeed {
    async fn fetch(&self) -> Result<CatalogTable> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TiendaError::feed_unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TiendaError::feed_unavailable(format!(
                "feed answered HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TiendaError::feed_unavailable(format!("failed to read body: {e}")))?;

        parse_catalog_csv(&body)
    }

    fn describe(&self) -> String {
        // Published sheet URLs are long; the host is enough for logs.
        let host = reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.url.clone());
        format!("http:{host}")
    }
}

#[derive(Debug, Clone)]
pub struct FileCsvFeed {
    path: PathBuf,
}

impl FileCsvFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogFeed for FileCsvFeed {
    async fn fetch(&self) -> Result<CatalogTable> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TiendaError::feed_unavailable(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))
        })?;
        parse_catalog_csv(&text)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
