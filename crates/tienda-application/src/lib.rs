//! Application layer for the shop.
//!
//! Coordinates the catalog store, search, carts and the chat assistant behind
//! a single `ShopService::dispatch` entry point and derives the view a
//! front-end renders after every user action.

pub mod refresher;
pub mod session;
pub mod shop_service;
pub mod view;

pub use refresher::CatalogRefresher;
pub use session::SessionRegistry;
pub use shop_service::{ShopService, UserAction};
pub use view::{CartPanel, CatalogPage, Notice, NoticeLevel, ProductCard, ShopView};
