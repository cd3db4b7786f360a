//! Runtime for executing conversation turns
//!
//! Owns all I/O around the pure state machine: session storage, the chat
//! gateway, and cosmetic pacing.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{BotRuntime, TurnError};
pub use traits::*;

/// Runtime wired to the production adapters
pub type ProductionRuntime =
    BotRuntime<InMemorySessionStore, crate::gateway::BridgeGateway, TokioPacer>;
