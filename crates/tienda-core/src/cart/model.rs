//! Cart domain models.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// A product as it was when added to the cart.
///
/// Independent copy: later catalog refreshes never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    pub price_text: String,
}

impl CartItem {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price_text: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            price_text: price_text.into(),
        }
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            price_text: product.price_text.clone(),
        }
    }
}

/// Acknowledgement produced by a cart mutation.
///
/// Returned to the caller rather than pushed anywhere, so a headless caller
/// can simply drop it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded { name: String, item_count: usize },
    Cleared { removed: usize },
}

impl CartEvent {
    /// Text for a toast or status line.
    pub fn message(&self) -> String {
        match self {
            Self::ItemAdded { name, .. } => format!("✅ {name} agregado al carrito"),
            Self::Cleared { .. } => "🗑️ Carrito vaciado".to_string(),
        }
    }
}

/// Best-effort sum of cart prices. Informational only.
///
/// Price text is free-form, so the sum is an estimate: it can be wrong for
/// any locale other than "1.500,50" style, and unparseable prices are
/// skipped and counted in `unpriced_items`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproximateTotal {
    pub amount: f64,
    pub priced_items: usize,
    pub unpriced_items: usize,
}
