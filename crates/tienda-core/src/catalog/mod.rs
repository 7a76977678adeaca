//! Catalog domain module.
//!
//! - `model`: `Product`, `CatalogSnapshot`, `CatalogTable`, `ColumnMapping`
//! - `feed`: the `CatalogFeed` trait implemented by infrastructure adapters
//! - `store`: `CatalogStore`, the cached, non-destructive snapshot holder

mod feed;
mod model;
mod store;

pub use feed::CatalogFeed;
pub use model::{CatalogSnapshot, CatalogTable, ColumnMapping, Product};
pub use store::{CatalogStatus, CatalogStore};
