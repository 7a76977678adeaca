//! Search domain models.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::config::DEFAULT_BROWSE_LIMIT;

/// Options that shape a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Number of products returned for an empty query.
    pub browse_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            browse_limit: DEFAULT_BROWSE_LIMIT,
        }
    }
}

/// A matching product together with its snapshot row index.
///
/// The row index is the stable key for the product within its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub row: usize,
    pub product: &'a Product,
}

/// Result of a search over one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'a> {
    /// The query as given.
    pub query: String,
    /// Matches in snapshot row order.
    pub hits: Vec<SearchHit<'a>>,
    /// Number of rows that matched. Larger than `hits.len()` only when an
    /// empty query was capped by the browse limit.
    pub total_matches: usize,
}

impl<'a> SearchResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn products(&self) -> impl Iterator<Item = &'a Product> + '_ {
        self.hits.iter().map(|hit| hit.product)
    }
}
