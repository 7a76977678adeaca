//! Domain core of Tienda: catalog snapshots and search, the session cart,
//! chat history with its turn gate, and the seams to the external catalog
//! feed and reasoning engine.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod search;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{Result, TiendaError};
