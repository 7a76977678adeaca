use async_trait::async_trait;

use crate::catalog::CatalogTable;
use crate::error::Result;

/// Source of raw catalog tables.
///
/// Implementations must return every cell as text, exactly as delivered.
/// Numeric-looking values (SKUs with leading zeros, prices) are never
/// reinterpreted.
#[async_trait]
pub trait CatalogFeed: Send + Sync {
    /// Pulls the full table. Any failure is reported as
    /// `TiendaError::FeedUnavailable`.
    async fn fetch(&self) -> Result<CatalogTable>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}
