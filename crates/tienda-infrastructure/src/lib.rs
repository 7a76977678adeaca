//! Infrastructure adapters: catalog feeds, CSV decoding, configuration and
//! secret loading.

pub mod catalog_feed;
pub mod config_service;
pub mod csv_catalog;
pub mod paths;
pub mod secret_service;

pub use catalog_feed::{FileCsvFeed, HttpCsvFeed, catalog_feed_for};
pub use config_service::ConfigService;
pub use secret_service::SecretServiceImpl;
