//! Reasoning engine seam.
//!
//! The engine is an opaque text-completion capability: it receives the
//! briefing as a system instruction plus the ordered message history and
//! answers with text or an error.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::TiendaError;
use crate::session::ChatMessage;

/// Errors reported by engine adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The remote service answered with an error or could not be reached.
    #[error("{message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The request could not be built or the response had no usable text.
    #[error("{0}")]
    ExecutionFailed(String),

    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProcessError {
                is_retryable: true,
                ..
            }
        )
    }
}

impl From<EngineError> for TiendaError {
    fn from(err: EngineError) -> Self {
        let retryable = err.is_retryable();
        TiendaError::engine_failure(err.to_string(), retryable)
    }
}

#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Produces the assistant reply for `history`, whose last entry is the
    /// user message being answered.
    async fn complete(
        &self,
        briefing: &str,
        history: &[ChatMessage],
    ) -> Result<String, EngineError>;

    /// Short description for logs (provider and model).
    fn describe(&self) -> String;
}
