//! Outbound order handoff.
//!
//! Builds the message a customer sends to the store through an external
//! messaging client, and the deep link that carries it.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::config::HandoffConfig;

/// Order message plus the deep link that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandoff {
    pub message: String,
    pub url: String,
}

impl OrderHandoff {
    /// Returns `None` for an empty cart: there is nothing to order.
    pub fn build(config: &HandoffConfig, cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let message = format!(
            "{}\n{}\n{}",
            config.greeting,
            cart.render_order_text(),
            config.closing
        );
        // Every byte outside A-Z a-z 0-9 - _ . ~ is escaped, newlines included.
        let url = format!(
            "{}/{}?text={}",
            config.base_url.trim_end_matches('/'),
            config.phone,
            urlencoding::encode(&message)
        );
        Some(Self { message, url })
    }
}
