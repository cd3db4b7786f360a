//! Message gateway adapter
//!
//! Boundary between the WhatsApp Web bridge and the conversation runtime:
//! event decoding, the ignore filter, outbound calls, and the start-up
//! connection check.

mod bridge;
mod error;
mod event;

pub use bridge::BridgeGateway;
pub use error::{GatewayError, GatewayErrorKind};
pub use event::{normalize, GatewayEvent};
#[allow(unused_imports)] // Public API re-exports
pub use event::RawMessage;

use crate::runtime::{MessageGateway, Pacer};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("gateway unreachable after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: GatewayError },
}

/// Probe the gateway until it answers, with a fixed backoff between attempts
pub async fn connect_with_retries<G, P>(
    gateway: &G,
    pacer: &P,
    attempts: u32,
    backoff: Duration,
) -> Result<(), StartupError>
where
    G: MessageGateway + ?Sized,
    P: Pacer + ?Sized,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        tracing::info!(attempt, attempts, "Connecting to gateway");
        match gateway.health().await {
            Ok(()) => {
                tracing::info!(attempt, "Gateway connected");
                return Ok(());
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, error = %e, backoff = ?backoff, "Gateway not ready, retrying");
                pacer.pause(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempts, error = %e, "Giving up on gateway");
                return Err(StartupError::Exhausted { attempts, last: e });
            }
        }
    }
}
