//! Chat turn protocol.
//!
//! A turn moves the session from `Idle` to `AwaitingResponse` and back:
//!
//! 1. stage the user message (rejected if another turn is in flight)
//! 2. build a fresh briefing from the current cart and catalog
//! 3. send briefing + full history to the reasoning engine
//! 4. on success commit user message and reply together; on failure commit
//!    nothing and hand back the configured apology instead

use std::sync::Arc;

use tienda_core::catalog::CatalogSnapshot;
use tienda_core::config::AssistantConfig;
use tienda_core::engine::ReasoningEngine;
use tienda_core::session::ShopSession;
use tienda_core::{Result, TiendaError};

use crate::briefing::BriefingBuilder;

/// How a submitted chat message ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The reply was appended to the history.
    Replied { reply: String },
    /// The engine call failed; history is unchanged and `notice` should be
    /// shown in place of a reply.
    Failed { notice: String, error: TiendaError },
    /// The message was not accepted (empty, turn in flight, no credential).
    Rejected { error: TiendaError },
}

impl TurnOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, Self::Replied { .. })
    }
}

/// Builds briefings and runs chat turns against the reasoning engine.
///
/// Holds no per-session state: the session is passed into every call.
pub struct ContextAssembler {
    engine: std::result::Result<Arc<dyn ReasoningEngine>, TiendaError>,
    briefing: BriefingBuilder,
    apology: String,
}

impl ContextAssembler {
    /// `engine` is the configuration outcome: when the credential was
    /// missing, pass the `ConfigurationMissing` error and every turn will be
    /// rejected with it while the rest of the shop keeps working.
    pub fn new(
        engine: std::result::Result<Arc<dyn ReasoningEngine>, TiendaError>,
        config: &AssistantConfig,
    ) -> Result<Self> {
        Ok(Self {
            engine,
            briefing: BriefingBuilder::new(config)?,
            apology: config.apology.clone(),
        })
    }

    /// Whether chat is usable at all.
    pub fn engine_status(&self) -> std::result::Result<(), &TiendaError> {
        self.engine.as_ref().map(|_| ())
    }

    /// The briefing the next turn would send, for inspection.
    pub fn briefing_for(
        &self,
        session: &ShopSession,
        catalog: Option<&CatalogSnapshot>,
    ) -> Result<String> {
        self.briefing.build(&session.cart(), catalog)
    }

    pub async fn submit(
        &self,
        session: &ShopSession,
        catalog: Option<&CatalogSnapshot>,
        message: &str,
    ) -> TurnOutcome {
        if message.trim().is_empty() {
            return TurnOutcome::Rejected {
                error: TiendaError::EmptyMessage,
            };
        }

        let engine = match &self.engine {
            Ok(engine) => engine,
            Err(err) => {
                return TurnOutcome::Rejected { error: err.clone() };
            }
        };

        let turn = match session.begin_turn(message) {
            Ok(turn) => turn,
            Err(error) => {
                tracing::debug!(
                    session_id = %session.id(),
                    "[ContextAssembler] Turn rejected: {}",
                    error
                );
                return TurnOutcome::Rejected { error };
            }
        };

        let briefing = match self.briefing.build(&session.cart(), catalog) {
            Ok(briefing) => briefing,
            Err(error) => return self.failed(session, error),
        };
        let messages = turn.request_messages();

        tracing::info!(
            session_id = %session.id(),
            engine = %engine.describe(),
            briefing_chars = briefing.len(),
            history_len = messages.len(),
            catalog_rows = catalog.map(|c| c.len()),
            "[ContextAssembler] Sending turn"
        );

        match engine.complete(&briefing, &messages).await {
            Ok(reply) if !reply.trim().is_empty() => {
                turn.commit(reply.clone());
                TurnOutcome::Replied { reply }
            }
            Ok(_) => self.failed(
                session,
                TiendaError::engine_failure("engine returned an empty reply", false),
            ),
            Err(err) => self.failed(session, err.into()),
        }
    }

    fn failed(&self, session: &ShopSession, error: TiendaError) -> TurnOutcome {
        tracing::warn!(
            session_id = %session.id(),
            error = %error,
            "[ContextAssembler] Turn failed, history left unchanged"
        );
        TurnOutcome::Failed {
            notice: self.apology.clone(),
            error,
        }
    }
}
