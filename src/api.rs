//! HTTP API
//!
//! Receives bridge events on the webhook and exposes a few operator
//! endpoints for inspecting or resetting a contact's session.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::gateway::GatewayEvent;
use crate::runtime::SessionStore;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Queue feeding the bot runtime, one event at a time
    pub events: mpsc::Sender<GatewayEvent>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(events: mpsc::Sender<GatewayEvent>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { events, sessions }
    }
}
