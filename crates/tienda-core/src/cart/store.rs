use serde::{Deserialize, Serialize};

use crate::cart::{ApproximateTotal, CartEvent, CartItem};

/// Session-scoped, insertion-ordered collection of cart items.
///
/// Items are only ever appended one at a time or removed all at once.
/// Duplicates are kept as separate lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: CartItem) -> CartEvent {
        let name = item.name.clone();
        self.items.push(item);
        CartEvent::ItemAdded {
            name,
            item_count: self.items.len(),
        }
    }

    pub fn clear(&mut self) -> CartEvent {
        let removed = self.items.len();
        self.items.clear();
        CartEvent::Cleared { removed }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One `- {name} (${price})` line per item, each newline-terminated.
    ///
    /// This is the exact text handed to the messaging client.
    pub fn render_order_text(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("- {} (${})\n", item.name, item.price_text))
            .collect()
    }

    /// Item names joined by `", "`, for the assistant briefing.
    pub fn summary_line(&self) -> String {
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn approximate_total(&self) -> ApproximateTotal {
        let mut total = ApproximateTotal {
            amount: 0.0,
            priced_items: 0,
            unpriced_items: 0,
        };
        for item in &self.items {
            match parse_price_estimate(&item.price_text) {
                Some(value) => {
                    total.amount += value;
                    total.priced_items += 1;
                }
                None => total.unpriced_items += 1,
            }
        }
        total
    }
}

/// Reads "$1.500,50" as 1500.5: drops `$` and `.`, then `,` is the decimal mark.
fn parse_price_estimate(text: &str) -> Option<f64> {
    let cleaned = text.replace('$', "").replace('.', "").replace(',', ".");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_exact_copy() {
        let mut cart = Cart::new();
        cart.add(CartItem::new("A1", "Perfil C", "200"));
        let before = cart.len();

        let item = CartItem::new("007", "Chapa 10mm", "1500");
        let event = cart.add(item.clone());

        assert_eq!(cart.len(), before + 1);
        assert_eq!(cart.items().last(), Some(&item));
        assert_eq!(
            event,
            CartEvent::ItemAdded {
                name: "Chapa 10mm".to_string(),
                item_count: 2
            }
        );
        assert_eq!(event.message(), "✅ Chapa 10mm agregado al carrito");
    }

    #[test]
    fn test_duplicates_are_separate_lines() {
        let mut cart = Cart::new();
        let item = CartItem::new("B2", "Malla", "800");
        cart.add(item.clone());
        cart.add(item);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_clear_is_total_and_idempotent() {
        let mut cart = Cart::new();
        cart.add(CartItem::new("A1", "Perfil C", "200"));
        cart.add(CartItem::new("B2", "Malla", "300"));

        assert_eq!(cart.clear(), CartEvent::Cleared { removed: 2 });
        assert!(cart.items().is_empty());
        assert_eq!(cart.clear(), CartEvent::Cleared { removed: 0 });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_render_order_text_exact_format() {
        let mut cart = Cart::new();
        cart.add(CartItem::new("", "Chapa 10mm", "1500"));
        cart.add(CartItem::new("", "Malla", "800"));

        assert_eq!(
            cart.render_order_text(),
            "- Chapa 10mm ($1500)\n- Malla ($800)\n"
        );
        assert_eq!(Cart::new().render_order_text(), "");
    }

    #[test]
    fn test_summary_line() {
        let mut cart = Cart::new();
        assert_eq!(cart.summary_line(), "");
        cart.add(CartItem::new("", "Chapa 10mm", "1500"));
        cart.add(CartItem::new("", "Malla", "800"));
        assert_eq!(cart.summary_line(), "Chapa 10mm, Malla");
    }

    #[test]
    fn test_approximate_total_skips_unparseable_prices() {
        let mut cart = Cart::new();
        cart.add(CartItem::new("", "Chapa", "$1.500,50"));
        cart.add(CartItem::new("", "Malla", "800"));
        cart.add(CartItem::new("", "Perfil", "consultar"));

        let total = cart.approximate_total();

        assert!((total.amount - 2300.5).abs() < f64::EPSILON);
        assert_eq!(total.priced_items, 2);
        assert_eq!(total.unpriced_items, 1);
    }
}
