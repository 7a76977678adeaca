//! What a front-end renders after each user action.
//!
//! Views are derived from session and catalog state on demand and own their
//! data, so a renderer never holds a lock or a snapshot reference.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tienda_core::cart::{ApproximateTotal, Cart, CartItem};
use tienda_core::config::HandoffConfig;
use tienda_core::handoff::OrderHandoff;
use tienda_core::search::SearchResult;
use tienda_core::session::{ChatMessage, MessageRole};

/// A product as listed in the catalog panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    /// Row index in the snapshot; the key used by `UserAction::Add`
    /// together with the page's `generation`.
    pub row: usize,
    pub sku: String,
    pub name: String,
    pub price: String,
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub query: String,
    pub cards: Vec<ProductCard>,
    /// Number of matching rows, which may exceed `cards.len()` when browsing.
    pub total_matches: usize,
    /// The cards come from the last good snapshot after a failed refresh.
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
    /// Snapshot the row indexes belong to.
    pub generation: u64,
}

impl CatalogPage {
    pub(crate) fn from_result(
        result: &SearchResult<'_>,
        stale: bool,
        fetched_at: DateTime<Utc>,
        generation: u64,
    ) -> Self {
        let cards = result
            .hits
            .iter()
            .map(|hit| ProductCard {
                row: hit.row,
                sku: hit.product.sku.clone(),
                name: hit.product.display_name().to_string(),
                price: hit.product.display_price().to_string(),
                stock: hit.product.display_stock().to_string(),
            })
            .collect();
        Self {
            query: result.query.clone(),
            cards,
            total_matches: result.total_matches,
            stale,
            fetched_at,
            generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartPanel {
    pub items: Vec<CartItem>,
    pub order_text: String,
    /// Shown labelled as an estimate; never part of the order message.
    pub estimate: ApproximateTotal,
    /// `None` while the cart is empty.
    pub handoff: Option<OrderHandoff>,
}

impl CartPanel {
    pub(crate) fn from_cart(cart: &Cart, handoff: &HandoffConfig) -> Self {
        Self {
            items: cart.items().to_vec(),
            order_text: cart.render_order_text(),
            estimate: cart.approximate_total(),
            handoff: OrderHandoff::build(handoff, cart),
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything a front-end needs after one action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopView {
    pub session_id: String,
    /// Present for actions that list products (search, refresh).
    pub catalog: Option<CatalogPage>,
    pub cart: CartPanel,
    /// Committed history, followed by the staged user message while a turn
    /// is in flight.
    pub transcript: Vec<ChatMessage>,
    /// The assistant reply produced by this action, if any. Shown even when
    /// notices are present.
    pub reply: Option<String>,
    pub awaiting_response: bool,
    pub chat_enabled: bool,
    pub notices: Vec<Notice>,
}

impl ShopView {
    /// The latest assistant message, if the transcript ends with one.
    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.transcript
            .last()
            .filter(|message| message.role == MessageRole::Assistant)
    }
}
