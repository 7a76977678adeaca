//! Session domain module.
//!
//! - `message`: `MessageRole`, `ChatMessage`
//! - `history`: `ChatHistory`, the append-only transcript
//! - `model`: `ShopSession` (cart + history + turn gate), `TurnGuard`

mod history;
mod message;
mod model;

pub use history::ChatHistory;
pub use message::{ChatMessage, MessageRole};
pub use model::{SessionState, ShopSession, TurnGuard, TurnState};
