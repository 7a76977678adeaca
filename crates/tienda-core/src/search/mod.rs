//! Catalog search.

mod engine;
pub mod model;

pub use engine::SearchEngine;
pub use model::{SearchHit, SearchOptions, SearchResult};
