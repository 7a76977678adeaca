//! Session lifecycle.

mod registry;

pub use registry::SessionRegistry;
