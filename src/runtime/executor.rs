//! Bot runtime executor

use super::traits::{MessageGateway, Pacer, SessionStore};
use crate::gateway::{normalize, GatewayError, GatewayEvent};
use crate::messages;
use crate::state_machine::{transition, Effect, InboundMessage, Session, Stage, TurnContext};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// A turn that could not be completed
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("failed to deliver reply: {0}")]
    Reply(#[from] GatewayError),
}

/// Runs turns against a session store and a gateway
///
/// Events are handled strictly one at a time, so a contact's turn always
/// completes before their next message is looked at.
pub struct BotRuntime<S, G, P>
where
    S: SessionStore + ?Sized,
    G: MessageGateway + ?Sized,
    P: Pacer,
{
    context: TurnContext,
    store: Arc<S>,
    gateway: Arc<G>,
    pacer: P,
}

impl<S, G, P> BotRuntime<S, G, P>
where
    S: SessionStore + ?Sized,
    G: MessageGateway + ?Sized,
    P: Pacer,
{
    pub fn new(context: TurnContext, store: Arc<S>, gateway: Arc<G>, pacer: P) -> Self {
        Self {
            context,
            store,
            gateway,
            pacer,
        }
    }

    pub async fn run(self, mut events: mpsc::Receiver<GatewayEvent>) {
        tracing::info!(policy = ?self.context.policy, "Starting bot runtime");

        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }

        tracing::info!("Bot runtime stopped");
    }

    pub async fn handle_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Message(raw) => {
                let Some(msg) = normalize(&raw) else {
                    tracing::debug!(from = %raw.from, "Ignoring group, broadcast or own message");
                    return;
                };
                // Failures are logged and answered inside handle_turn
                let _ = self.handle_turn(&msg).await;
            }
            GatewayEvent::Qr { code } => {
                tracing::info!(code = %code, "Pairing code issued, scan it with the phone");
            }
            GatewayEvent::Ready => tracing::info!("Gateway online"),
            GatewayEvent::Authenticated => tracing::info!("Gateway authenticated"),
            GatewayEvent::Disconnected { reason } => {
                tracing::warn!(reason = %reason, "Gateway disconnected, requesting reconnect");
                if let Err(e) = self.gateway.reconnect().await {
                    tracing::error!(error = %e, "Reconnect request failed");
                }
            }
        }
    }

    /// Process one inbound message
    ///
    /// The new session is stored only after every required effect went
    /// through. If a reply fails, the contact gets a single apology attempt
    /// and keeps the session they had before the turn.
    pub async fn handle_turn(&self, msg: &InboundMessage) -> Result<(), TurnError> {
        let contact = msg.sender_id.as_str();
        let current = self.store.get(contact).await;
        let stage = current.as_ref().and_then(|s| s.stage).map(Stage::name);

        tracing::info!(contact = %contact, text = %msg.text, stage = ?stage, "Inbound message");
        if matches!(
            current.as_ref().and_then(|s| s.stage),
            Some(Stage::CollectingForm { .. })
        ) {
            tracing::info!(contact = %contact, body = %msg.raw_text, "Form submission received");
        }

        let result = transition(current.as_ref(), &self.context, msg);

        if let Err(e) = self.execute_effects(contact, &result.effects).await {
            tracing::error!(contact = %contact, error = %e, "Turn failed, session left unchanged");
            if let Err(e) = self.gateway.send_text(contact, &messages::apology()).await {
                tracing::error!(contact = %contact, error = %e, "Failed to send apology");
            }
            return Err(e);
        }

        self.commit(contact, current, result.new_session).await;
        Ok(())
    }

    async fn execute_effects(&self, contact: &str, effects: &[Effect]) -> Result<(), TurnError> {
        for effect in effects {
            let outcome = match effect {
                Effect::Reply(text) => self.gateway.send_text(contact, text).await,
                Effect::SendMenu => {
                    let name = self.display_name(contact).await;
                    self.gateway
                        .send_text(contact, &messages::menu(&name))
                        .await
                }
                Effect::Typing => self.gateway.send_typing(contact).await,
                Effect::PinChat => self.gateway.pin_chat(contact).await,
                Effect::Pause(duration) => {
                    if !duration.is_zero() {
                        self.pacer.pause(*duration).await;
                    }
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => {}
                Err(e) if effect.is_required() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(contact = %contact, effect = ?effect, error = %e, "Best-effort action failed");
                }
            }
        }
        Ok(())
    }

    async fn display_name(&self, contact: &str) -> String {
        match self.gateway.display_name(contact).await {
            Ok(Some(name)) => name,
            Ok(None) => messages::DEFAULT_NAME.to_string(),
            Err(e) => {
                tracing::warn!(contact = %contact, error = %e, "Display name lookup failed");
                messages::DEFAULT_NAME.to_string()
            }
        }
    }

    async fn commit(&self, contact: &str, old: Option<Session>, new: Option<Session>) {
        if old == new {
            return;
        }
        // An operator reset during the turn's pauses wins over this turn
        if self.store.get(contact).await != old {
            tracing::warn!(contact = %contact, "Session changed during turn, discarding update");
            return;
        }
        tracing::debug!(
            contact = %contact,
            from = ?old.as_ref().and_then(|s| s.stage).map(Stage::name),
            to = ?new.as_ref().and_then(|s| s.stage).map(Stage::name),
            "Session updated"
        );
        match new {
            Some(session) => self.store.set(contact, session).await,
            None => {
                self.store.delete(contact).await;
            }
        }
    }
}
