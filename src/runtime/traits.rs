//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::gateway::GatewayError;
use crate::state_machine::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Per-contact session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session of a contact, if any
    async fn get(&self, contact_id: &str) -> Option<Session>;

    /// Store (create or replace) the session of a contact
    async fn set(&self, contact_id: &str, session: Session);

    /// Forget a contact; returns whether a session existed
    async fn delete(&self, contact_id: &str) -> bool;

    /// Whether the contact's conversation is closed (absent counts as open)
    #[allow(dead_code)] // API completeness
    async fn is_finalized(&self, contact_id: &str) -> bool {
        self.get(contact_id).await.is_some_and(|s| s.finalized)
    }
}

/// Outbound side of the chat transport
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver a text message to a contact
    async fn send_text(&self, contact_id: &str, text: &str) -> Result<(), GatewayError>;

    /// Show the "typing" indicator in the contact's chat
    async fn send_typing(&self, contact_id: &str) -> Result<(), GatewayError>;

    /// Pin the contact's chat
    async fn pin_chat(&self, contact_id: &str) -> Result<(), GatewayError>;

    /// Display name the contact chose for themselves
    async fn display_name(&self, contact_id: &str) -> Result<Option<String>, GatewayError>;

    /// Check that the transport is up
    async fn health(&self) -> Result<(), GatewayError>;

    /// Ask the transport to re-establish its connection
    async fn reconnect(&self) -> Result<(), GatewayError>;
}

/// Cosmetic delays between outbound actions
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, contact_id: &str) -> Option<Session> {
        (**self).get(contact_id).await
    }

    async fn set(&self, contact_id: &str, session: Session) {
        (**self).set(contact_id, session).await;
    }

    async fn delete(&self, contact_id: &str) -> bool {
        (**self).delete(contact_id).await
    }

    async fn is_finalized(&self, contact_id: &str) -> bool {
        (**self).is_finalized(contact_id).await
    }
}

#[async_trait]
impl<T: MessageGateway + ?Sized> MessageGateway for Arc<T> {
    async fn send_text(&self, contact_id: &str, text: &str) -> Result<(), GatewayError> {
        (**self).send_text(contact_id, text).await
    }

    async fn send_typing(&self, contact_id: &str) -> Result<(), GatewayError> {
        (**self).send_typing(contact_id).await
    }

    async fn pin_chat(&self, contact_id: &str) -> Result<(), GatewayError> {
        (**self).pin_chat(contact_id).await
    }

    async fn display_name(&self, contact_id: &str) -> Result<Option<String>, GatewayError> {
        (**self).display_name(contact_id).await
    }

    async fn health(&self) -> Result<(), GatewayError> {
        (**self).health().await
    }

    async fn reconnect(&self) -> Result<(), GatewayError> {
        (**self).reconnect().await
    }
}

#[async_trait]
impl<T: Pacer + ?Sized> Pacer for Arc<T> {
    async fn pause(&self, duration: Duration) {
        (**self).pause(duration).await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Process-lifetime session store
///
/// Sessions are never expired or evicted; a restart forgets everyone.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contacts with a stored session
    #[allow(dead_code)] // Used by tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, contact_id: &str) -> Option<Session> {
        self.sessions.read().await.get(contact_id).cloned()
    }

    async fn set(&self, contact_id: &str, session: Session) {
        self.sessions
            .write()
            .await
            .insert(contact_id.to_string(), session);
    }

    async fn delete(&self, contact_id: &str) -> bool {
        self.sessions.write().await.remove(contact_id).is_some()
    }
}

/// Real wall-clock pauses
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
