//! Shop use cases.
//!
//! `ShopService` is the single entry point front-ends call. Each user action
//! is applied to one session and answered with a freshly derived `ShopView`.
//! Catalog and engine failures are absorbed into notices; no action leaves
//! the cart or transcript half-updated.

use std::sync::Arc;

use tienda_core::cart::CartItem;
use tienda_core::catalog::{CatalogSnapshot, CatalogStore};
use tienda_core::config::{HandoffConfig, ShopConfig};
use tienda_core::engine::ReasoningEngine;
use tienda_core::search::{SearchEngine, SearchOptions};
use tienda_core::session::ShopSession;
use tienda_core::{Result, TiendaError};
use tienda_interaction::{ContextAssembler, TurnOutcome};

use crate::session::SessionRegistry;
use crate::view::{CartPanel, CatalogPage, Notice, ShopView};

/// A user intent, as produced by any front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// List products matching the query; an empty query browses.
    Search(String),
    /// Add the product at `row` of the listing tagged `generation`. Rejected
    /// if the catalog has been refreshed since that listing was shown.
    Add { row: usize, generation: u64 },
    ClearCart,
    SendMessage(String),
    /// Show the order handoff for the current cart.
    Checkout,
    /// Fetch the catalog now, ignoring the refresh interval.
    RefreshCatalog,
}

pub struct ShopService {
    catalog: Arc<CatalogStore>,
    search: SearchEngine,
    no_results_message: String,
    assembler: ContextAssembler,
    handoff: HandoffConfig,
    sessions: SessionRegistry,
}

impl ShopService {
    /// Wires the shop together.
    ///
    /// `engine` is `Err(ConfigurationMissing)` when no credential was found;
    /// the shop then runs with chat disabled.
    pub fn new(
        catalog: Arc<CatalogStore>,
        engine: std::result::Result<Arc<dyn ReasoningEngine>, TiendaError>,
        config: &ShopConfig,
    ) -> Result<Self> {
        Ok(Self {
            catalog,
            search: SearchEngine::new(SearchOptions {
                browse_limit: config.catalog.browse_limit,
            }),
            no_results_message: config.catalog.no_results_message.clone(),
            assembler: ContextAssembler::new(engine, &config.assistant)?,
            handoff: config.handoff.clone(),
            sessions: SessionRegistry::new(config.assistant.greeting.clone()),
        })
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn chat_enabled(&self) -> bool {
        self.assembler.engine_status().is_ok()
    }

    /// Applies `action` to `session` and returns the resulting view.
    pub async fn dispatch(&self, session: &ShopSession, action: UserAction) -> ShopView {
        tracing::debug!(session_id = %session.id(), ?action, "[ShopService] Dispatch");

        let mut notices = Vec::new();
        let mut catalog = None;
        let mut reply = None;

        match action {
            UserAction::Search(query) => {
                catalog = self.catalog_page(&query, &mut notices).await;
            }
            UserAction::Add { row, generation } => {
                self.add_row(session, row, generation, &mut notices).await;
            }
            UserAction::ClearCart => {
                let event = session.clear_cart();
                notices.push(Notice::info(event.message()));
            }
            UserAction::SendMessage(text) => {
                let snapshot = self.cached_snapshot(&mut notices).await;
                let outcome = self
                    .assembler
                    .submit(session, snapshot.as_deref(), &text)
                    .await;
                match outcome {
                    TurnOutcome::Replied { reply: text } => reply = Some(text),
                    TurnOutcome::Failed { notice, .. } => notices.push(Notice::warning(notice)),
                    TurnOutcome::Rejected { error } => notices.push(rejection_notice(&error)),
                }
            }
            UserAction::Checkout => {
                if session.cart().is_empty() {
                    notices.push(Notice::info("El carrito está vacío."));
                } else {
                    notices.push(Notice::success("Pedido listo para enviar por WhatsApp."));
                }
            }
            UserAction::RefreshCatalog => match self.catalog.force_refresh().await {
                Ok(snapshot) => {
                    notices.push(Notice::success(format!(
                        "Catálogo actualizado: {} productos.",
                        snapshot.len()
                    )));
                    catalog = self.catalog_page("", &mut notices).await;
                }
                Err(err) => notices.push(feed_notice(&err, self.catalog.current().await.is_some())),
            },
        }

        self.view(session, catalog, reply, notices)
    }

    /// The view of `session` with no action applied.
    pub fn render(&self, session: &ShopSession) -> ShopView {
        self.view(session, None, None, Vec::new())
    }

    fn view(
        &self,
        session: &ShopSession,
        catalog: Option<CatalogPage>,
        reply: Option<String>,
        notices: Vec<Notice>,
    ) -> ShopView {
        let state = session.snapshot();
        let mut transcript = state.history.messages().to_vec();
        let awaiting_response = state.pending.is_some();
        transcript.extend(state.pending);

        ShopView {
            session_id: session.id().to_string(),
            catalog,
            cart: CartPanel::from_cart(&state.cart, &self.handoff),
            transcript,
            reply,
            awaiting_response,
            chat_enabled: self.chat_enabled(),
            notices,
        }
    }

    async fn catalog_page(&self, query: &str, notices: &mut Vec<Notice>) -> Option<CatalogPage> {
        let snapshot = self.cached_snapshot(notices).await?;
        let result = self.search.search(&snapshot, query);
        if !query.is_empty() && result.is_empty() {
            notices.push(Notice::info(self.no_results_message.clone()));
        }
        Some(CatalogPage::from_result(
            &result,
            self.catalog.is_stale(),
            snapshot.fetched_at(),
            snapshot.generation(),
        ))
    }

    async fn add_row(
        &self,
        session: &ShopSession,
        row: usize,
        generation: u64,
        notices: &mut Vec<Notice>,
    ) {
        let Some(snapshot) = self.catalog.current().await else {
            notices.push(feed_notice(
                &TiendaError::feed_unavailable("no catalog loaded"),
                false,
            ));
            return;
        };
        if snapshot.generation() != generation {
            tracing::debug!(
                session_id = %session.id(),
                row,
                listed = generation,
                current = snapshot.generation(),
                "[ShopService] Add against a replaced listing"
            );
            notices.push(rejection_notice(&TiendaError::CatalogChanged { row }));
            return;
        }
        match snapshot.get(row) {
            Some(product) => {
                let event = session.add_to_cart(CartItem::from(product));
                notices.push(Notice::success(event.message()));
            }
            None => notices.push(rejection_notice(&TiendaError::RowNotFound { row })),
        }
    }

    /// Snapshot for reading, refreshed if the interval has elapsed.
    ///
    /// A failed refresh falls back to the last good snapshot, if any, and
    /// records a notice.
    async fn cached_snapshot(&self, notices: &mut Vec<Notice>) -> Option<Arc<CatalogSnapshot>> {
        match self.catalog.refresh().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                let current = self.catalog.current().await;
                notices.push(feed_notice(&err, current.is_some()));
                current
            }
        }
    }
}

fn feed_notice(error: &TiendaError, has_snapshot: bool) -> Notice {
    tracing::warn!(error = %error, has_snapshot, "[ShopService] Catalog unavailable");
    if has_snapshot {
        Notice::warning("No se pudo actualizar el catálogo; mostrando la última lista cargada.")
    } else {
        Notice::error("El catálogo no está disponible en este momento.")
    }
}

fn rejection_notice(error: &TiendaError) -> Notice {
    match error {
        TiendaError::TurnInFlight => {
            Notice::info("Esperá la respuesta anterior antes de mandar otro mensaje.")
        }
        TiendaError::EmptyMessage => Notice::info("Escribí un mensaje."),
        TiendaError::RowNotFound { row } => {
            Notice::warning(format!("No existe el producto {row} en la lista actual."))
        }
        TiendaError::CatalogChanged { .. } => Notice::warning(
            "La lista de precios se actualizó; buscá el producto de nuevo para agregarlo.",
        ),
        TiendaError::ConfigurationMissing(what) => {
            Notice::error(format!("El chat no está disponible: falta {what}."))
        }
        other if other.is_recoverable() => Notice::warning(other.to_string()),
        other => Notice::error(other.to_string()),
    }
}
