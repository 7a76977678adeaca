use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Cart, CartEvent, CartItem};
use crate::error::{Result, TiendaError};
use crate::session::{ChatHistory, ChatMessage};

/// Cart and chat transcript of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub cart: Cart,
    pub history: ChatHistory,
    /// User message of the turn in flight, not yet part of `history`.
    pub pending: Option<ChatMessage>,
}

/// Turn-taking state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// One user's shopping session.
///
/// Owns its cart and chat history exclusively; nothing is shared with other
/// sessions and nothing outlives the value. All mutations take the state lock
/// briefly and never across an await point.
#[derive(Debug)]
pub struct ShopSession {
    id: String,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl ShopSession {
    /// Starts a session whose transcript opens with `greeting`.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), greeting)
    }

    pub fn with_id(id: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                cart: Cart::new(),
                history: ChatHistory::with_greeting(greeting),
                pending: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of the current state, for rendering.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn add_to_cart(&self, item: CartItem) -> CartEvent {
        let event = self.lock().cart.add(item);
        tracing::debug!(session_id = %self.id, ?event, "[ShopSession] Cart updated");
        event
    }

    pub fn clear_cart(&self) -> CartEvent {
        let event = self.lock().cart.clear();
        tracing::debug!(session_id = %self.id, ?event, "[ShopSession] Cart cleared");
        event
    }

    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    pub fn history(&self) -> ChatHistory {
        self.lock().history.clone()
    }

    pub fn turn_state(&self) -> TurnState {
        if self.in_flight.load(Ordering::Acquire) {
            TurnState::AwaitingResponse
        } else {
            TurnState::Idle
        }
    }

    /// Moves the session to `AwaitingResponse` and stages `message`.
    ///
    /// Fails with `TurnInFlight` if another turn has not finished; in that
    /// case nothing is staged. The returned guard must be committed for the
    /// turn to reach the history; dropping it abandons the turn.
    pub fn begin_turn(&self, message: impl Into<String>) -> Result<TurnGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TiendaError::TurnInFlight);
        }

        self.lock().pending = Some(ChatMessage::user(message));
        Ok(TurnGuard {
            session: self,
            committed: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive right to complete the current turn of a session.
///
/// Dropping the guard without `commit` discards the staged user message and
/// returns the session to `Idle`, leaving the history as it was.
#[derive(Debug)]
pub struct TurnGuard<'a> {
    session: &'a ShopSession,
    committed: bool,
}

impl TurnGuard<'_> {
    /// Committed history followed by the staged user message.
    pub fn request_messages(&self) -> Vec<ChatMessage> {
        let state = self.session.lock();
        let mut messages = state.history.messages().to_vec();
        messages.extend(state.pending.iter().cloned());
        messages
    }

    /// Appends the staged user message and `reply` to the history together.
    pub fn commit(mut self, reply: impl Into<String>) {
        let mut state = self.session.lock();
        if let Some(user) = state.pending.take() {
            state.history.push_turn(user, ChatMessage::assistant(reply));
        }
        self.committed = true;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.session.lock().pending = None;
        }
        self.session.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    #[test]
    fn test_new_session_is_idle_with_greeting() {
        let session = ShopSession::new("Hola");
        assert_eq!(session.turn_state(), TurnState::Idle);
        assert_eq!(session.history().len(), 1);
        assert!(session.cart().is_empty());
        assert!(!session.id().is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let a = ShopSession::new("Hola");
        let b = ShopSession::new("Hola");
        a.add_to_cart(CartItem::new("A1", "Perfil C", "200"));

        assert_ne!(a.id(), b.id());
        assert_eq!(a.cart().len(), 1);
        assert!(b.cart().is_empty());
    }

    #[test]
    fn test_committed_turn_appends_user_and_reply() {
        let session = ShopSession::new("Hola");
        let guard = session.begin_turn("¿Tenés malla?").unwrap();
        assert_eq!(session.turn_state(), TurnState::AwaitingResponse);

        let request = guard.request_messages();
        assert_eq!(request.len(), 2);
        assert_eq!(request[1], ChatMessage::user("¿Tenés malla?"));
        assert_eq!(session.history().len(), 1);

        guard.commit("Sí, malla 6mm");

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert!(history.is_alternating());
        assert_eq!(history.messages()[2].role, MessageRole::Assistant);
        assert_eq!(session.turn_state(), TurnState::Idle);
        assert!(session.snapshot().pending.is_none());
    }

    #[test]
    fn test_abandoned_turn_leaves_history_untouched() {
        let session = ShopSession::new("Hola");
        let before = session.history();

        let guard = session.begin_turn("hola?").unwrap();
        assert!(session.snapshot().pending.is_some());
        drop(guard);

        assert_eq!(session.history(), before);
        assert!(session.snapshot().pending.is_none());
        assert_eq!(session.turn_state(), TurnState::Idle);
    }

    #[test]
    fn test_second_turn_rejected_while_first_in_flight() {
        let session = ShopSession::new("Hola");
        let guard = session.begin_turn("primero").unwrap();

        let err = session.begin_turn("segundo").unwrap_err();
        assert_eq!(err, TiendaError::TurnInFlight);
        assert_eq!(
            session.snapshot().pending,
            Some(ChatMessage::user("primero"))
        );

        drop(guard);
        assert!(session.begin_turn("tercero").is_ok());
    }

    #[test]
    fn test_cart_changes_during_turn_are_kept() {
        let session = ShopSession::new("Hola");
        let guard = session.begin_turn("¿Qué me falta?").unwrap();
        session.add_to_cart(CartItem::new("B2", "Malla", "800"));
        drop(guard);

        assert_eq!(session.cart().len(), 1);
    }
}
