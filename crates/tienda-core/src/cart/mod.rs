//! Session cart.

mod model;
mod store;

pub use model::{ApproximateTotal, CartEvent, CartItem};
pub use store::Cart;
