//! Conversation layer: briefing assembly, the chat turn protocol and the
//! Gemini-backed reasoning engine.

pub mod assembler;
pub mod briefing;
pub mod gemini_api_engine;

pub use assembler::{ContextAssembler, TurnOutcome};
pub use briefing::BriefingBuilder;
pub use gemini_api_engine::GeminiApiEngine;
