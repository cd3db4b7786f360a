//! Mock implementations for testing
//!
//! These mocks enable integration testing without a live transport.

use super::traits::*;
use super::BotRuntime;
use crate::gateway::GatewayError;
use crate::state_machine::{FlowPolicy, Pacing, PaymentDetails, TurnContext};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Gateway that records every outbound action
#[derive(Default)]
pub struct MockGateway {
    /// (contact, text) of every delivered message
    pub sent: Mutex<Vec<(String, String)>>,
    pub typing: Mutex<Vec<String>>,
    pub pinned: Mutex<Vec<String>>,
    names: HashMap<String, String>,
    /// Number of upcoming `send_text` calls that fail
    failing_sends: Mutex<usize>,
    failing_side_effects: bool,
    /// Number of upcoming `health` calls that fail
    failing_health: Mutex<u32>,
    health_checks: Mutex<u32>,
    reconnects: Mutex<u32>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, contact: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(contact.into(), name.into());
        self
    }

    /// Make typing, pinning and name lookups fail
    pub fn with_failing_side_effects(mut self) -> Self {
        self.failing_side_effects = true;
        self
    }

    pub fn with_health_failures(self, count: u32) -> Self {
        *self.failing_health.lock().unwrap() = count;
        self
    }

    /// Make the next `count` sends fail
    pub fn fail_next_sends(&self, count: usize) {
        *self.failing_sends.lock().unwrap() = count;
    }

    /// Texts delivered to one contact, in order
    pub fn texts_to(&self, contact: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == contact)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_text_to(&self, contact: &str) -> Option<String> {
        self.texts_to(contact).pop()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn health_checks(&self) -> u32 {
        *self.health_checks.lock().unwrap()
    }

    pub fn reconnects(&self) -> u32 {
        *self.reconnects.lock().unwrap()
    }

    fn side_effect(&self, log: &Mutex<Vec<String>>, contact: &str) -> Result<(), GatewayError> {
        if self.failing_side_effects {
            return Err(GatewayError::network("side effect unavailable"));
        }
        log.lock().unwrap().push(contact.to_string());
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    async fn send_text(&self, contact_id: &str, text: &str) -> Result<(), GatewayError> {
        {
            let mut failing = self.failing_sends.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(GatewayError::network("send failed"));
            }
        }
        self.sent
            .lock()
            .unwrap()
            .push((contact_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_typing(&self, contact_id: &str) -> Result<(), GatewayError> {
        self.side_effect(&self.typing, contact_id)
    }

    async fn pin_chat(&self, contact_id: &str) -> Result<(), GatewayError> {
        self.side_effect(&self.pinned, contact_id)
    }

    async fn display_name(&self, contact_id: &str) -> Result<Option<String>, GatewayError> {
        if self.failing_side_effects {
            return Err(GatewayError::rejected("contact lookup failed"));
        }
        Ok(self.names.get(contact_id).cloned())
    }

    async fn health(&self) -> Result<(), GatewayError> {
        *self.health_checks.lock().unwrap() += 1;
        let mut failing = self.failing_health.lock().unwrap();
        if *failing > 0 {
            *failing -= 1;
            return Err(GatewayError::network("bridge not ready"));
        }
        Ok(())
    }

    async fn reconnect(&self) -> Result<(), GatewayError> {
        *self.reconnects.lock().unwrap() += 1;
        Ok(())
    }
}

// ============================================================================
// Recording Pacer
// ============================================================================

/// Pacer that returns immediately and remembers what it was asked to wait
#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

pub fn test_payment_details() -> PaymentDetails {
    PaymentDetails {
        pix_key: "00000000000".to_string(),
        holder: "Test Holder".to_string(),
        institution: "Test Bank".to_string(),
    }
}

pub type TestBotRuntime = BotRuntime<InMemorySessionStore, MockGateway, Arc<RecordingPacer>>;

pub struct TestBot {
    pub runtime: TestBotRuntime,
    pub store: Arc<InMemorySessionStore>,
    pub gateway: Arc<MockGateway>,
    pub pacer: Arc<RecordingPacer>,
}

pub struct TestBotBuilder {
    policy: FlowPolicy,
    pacing: Pacing,
    gateway: MockGateway,
}

impl TestBot {
    pub fn builder() -> TestBotBuilder {
        TestBotBuilder {
            policy: FlowPolicy::AwaitPayment,
            pacing: Pacing::default(),
            gateway: MockGateway::new(),
        }
    }
}

impl TestBotBuilder {
    pub fn policy(mut self, policy: FlowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn gateway(mut self, gateway: MockGateway) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn build(self) -> TestBot {
        let store = Arc::new(InMemorySessionStore::new());
        let gateway = Arc::new(self.gateway);
        let pacer = Arc::new(RecordingPacer::default());
        let context = TurnContext::new(self.policy, test_payment_details(), self.pacing);
        let runtime = BotRuntime::new(
            context,
            Arc::clone(&store),
            Arc::clone(&gateway),
            Arc::clone(&pacer),
        );
        TestBot {
            runtime,
            store,
            gateway,
            pacer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayEvent, RawMessage};
    use crate::messages;
    use crate::state_machine::{FormVariant, InboundMessage, Session, Stage};
    use tokio::sync::mpsc;

    const ANA: &str = "5511911112222@c.us";
    const BRUNO: &str = "5511933334444@c.us";

    const FORM: &str = "CPALEXANDRE: ana01\nLINK: https://example.com/ana\nDEPOSITANTES: 10\n\
        META: 5000\nMÉDIA: 60\nMONTANTE: 500\nPRAZO: 7 dias";

    async fn say(bot: &TestBot, contact: &str, body: &str) {
        bot.runtime
            .handle_turn(&InboundMessage::text(contact, body))
            .await
            .unwrap();
    }

    fn raw(from: &str, body: &str) -> RawMessage {
        RawMessage {
            from: from.to_string(),
            body: Some(body.to_string()),
            ..RawMessage::default()
        }
    }

    #[tokio::test]
    async fn test_mock_gateway_fails_requested_sends() {
        let gateway = MockGateway::new();
        gateway.fail_next_sends(1);
        assert!(gateway.send_text(ANA, "a").await.is_err());
        assert!(gateway.send_text(ANA, "b").await.is_ok());
        assert_eq!(gateway.texts_to(ANA), vec!["b".to_string()]);
    }

    /// Integration test: the whole deposit funnel with the payment step
    #[tokio::test]
    async fn test_full_funnel_with_payment() {
        let bot = TestBot::builder()
            .gateway(MockGateway::new().with_name(ANA, "Ana"))
            .build();

        say(&bot, ANA, "oi").await;
        let menu = bot.gateway.last_text_to(ANA).unwrap();
        assert!(menu.contains("Olá Ana!"));
        assert!(menu.contains("Escolha"));
        assert_eq!(*bot.gateway.typing.lock().unwrap(), vec![ANA.to_string()]);

        say(&bot, ANA, "1").await;
        assert!(bot.gateway.last_text_to(ANA).unwrap().contains("FORMULÁRIO"));

        say(&bot, ANA, FORM).await;
        let texts = bot.gateway.texts_to(ANA);
        let tail = &texts[texts.len() - 2..];
        assert!(tail[0].contains("Dados recebidos"));
        assert!(tail[1].contains("PIX: 00000000000"));
        assert_eq!(*bot.gateway.pinned.lock().unwrap(), vec![ANA.to_string()]);

        let session = bot.store.get(ANA).await.unwrap();
        assert_eq!(session.stage, Some(Stage::AwaitingPayment));
        assert_eq!(session.submission.as_deref(), Some(FORM));

        // Chatter while waiting is ignored
        let before = bot.gateway.texts_to(ANA).len();
        say(&bot, ANA, "ok, vou fazer").await;
        assert_eq!(bot.gateway.texts_to(ANA).len(), before);

        bot.runtime
            .handle_turn(&InboundMessage::media(ANA, ""))
            .await
            .unwrap();
        assert_eq!(
            bot.gateway.last_text_to(ANA),
            Some(messages::payment_pending_confirmation())
        );
        assert_eq!(bot.store.get(ANA).await, Some(Session::closed()));

        // Closed: no replies until a restart keyword
        let before = bot.gateway.texts_to(ANA).len();
        say(&bot, ANA, "1").await;
        assert_eq!(bot.gateway.texts_to(ANA).len(), before);

        // Cosmetic pauses were requested in order: typing, pin, payment
        assert_eq!(
            bot.pacer.recorded(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(800),
                Duration::from_millis(500),
            ]
        );
    }

    #[tokio::test]
    async fn test_finalize_on_submit_policy() {
        let bot = TestBot::builder()
            .policy(FlowPolicy::FinalizeOnSubmit)
            .build();

        say(&bot, ANA, "menu").await;
        say(&bot, ANA, "3").await;
        say(&bot, ANA, FORM).await;

        assert_eq!(
            bot.gateway.last_text_to(ANA),
            Some(messages::form_received_handoff())
        );
        assert_eq!(bot.store.get(ANA).await, Some(Session::closed()));
    }

    #[tokio::test]
    async fn test_menu_defaults_name_when_lookup_fails() {
        let bot = TestBot::builder()
            .gateway(MockGateway::new().with_failing_side_effects())
            .build();

        say(&bot, ANA, "ola").await;
        assert_eq!(bot.gateway.last_text_to(ANA), Some(messages::menu("amigo")));
        assert!(bot.gateway.typing.lock().unwrap().is_empty());
        assert_eq!(bot.store.get(ANA).await, Some(Session::at_menu()));

        // Pin failures do not block form acceptance either
        say(&bot, ANA, "1").await;
        say(&bot, ANA, FORM).await;
        assert_eq!(
            bot.store.get(ANA).await.and_then(|s| s.stage),
            Some(Stage::AwaitingPayment)
        );
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_previous_session() {
        let bot = TestBot::builder().build();
        say(&bot, ANA, "oi").await;
        bot.gateway.clear();

        bot.gateway.fail_next_sends(1);
        let result = bot.runtime.handle_turn(&InboundMessage::text(ANA, "1")).await;
        assert!(result.is_err());

        // Apology went out, stage did not move
        assert_eq!(bot.gateway.texts_to(ANA), vec![messages::apology()]);
        assert_eq!(bot.store.get(ANA).await, Some(Session::at_menu()));

        // Retrying the same choice works
        say(&bot, ANA, "1").await;
        assert_eq!(
            bot.store.get(ANA).await.and_then(|s| s.stage),
            Some(Stage::CollectingForm {
                variant: FormVariant::Deposit
            })
        );
    }

    #[tokio::test]
    async fn test_failed_apology_is_swallowed() {
        let bot = TestBot::builder().build();
        bot.gateway.fail_next_sends(2);

        let result = bot.runtime.handle_turn(&InboundMessage::text(ANA, "oi")).await;
        assert!(result.is_err());
        assert!(bot.gateway.texts_to(ANA).is_empty());
        assert_eq!(bot.store.get(ANA).await, None);
    }

    #[tokio::test]
    async fn test_restart_twice_sends_same_menu() {
        let bot = TestBot::builder().build();
        say(&bot, ANA, "oi").await;
        say(&bot, ANA, "oi").await;
        let texts = bot.gateway.texts_to(ANA);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], texts[1]);
        assert_eq!(bot.store.get(ANA).await, Some(Session::at_menu()));
    }

    #[tokio::test]
    async fn test_contacts_are_isolated() {
        let bot = TestBot::builder().build();
        say(&bot, ANA, "oi").await;
        say(&bot, BRUNO, "1").await;

        assert_eq!(bot.gateway.last_text_to(BRUNO), Some(messages::fallback()));
        assert_eq!(bot.store.get(BRUNO).await, None);

        say(&bot, ANA, "4").await;
        assert!(bot.store.is_finalized(ANA).await);
        assert!(!bot.store.is_finalized(BRUNO).await);
    }

    #[tokio::test]
    async fn test_run_loop_filters_and_serializes_events() {
        let bot = TestBot::builder().build();
        let TestBot {
            runtime,
            store,
            gateway,
            ..
        } = bot;
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(runtime.run(rx));

        let mut own = raw(ANA, "oi");
        own.from_me = true;
        let events = vec![
            GatewayEvent::Ready,
            GatewayEvent::Message(raw("status@broadcast", "oi")),
            GatewayEvent::Message(raw("120363000@g.us", "oi")),
            GatewayEvent::Message(own),
            GatewayEvent::Message(raw(ANA, "oi")),
            GatewayEvent::Message(raw(ANA, "2")),
            GatewayEvent::Disconnected {
                reason: "NAVIGATION".to_string(),
            },
        ];
        for event in events {
            tx.send(event).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(gateway.sent.lock().unwrap().len(), 2);
        assert_eq!(
            store.get(ANA).await.and_then(|s| s.stage),
            Some(Stage::CollectingForm {
                variant: FormVariant::PriceTable
            })
        );
        assert_eq!(store.len().await, 1);
        assert_eq!(gateway.reconnects(), 1);
    }

    /// Pacer that resets a contact's session while the turn is paused
    struct ResettingPacer {
        store: Arc<InMemorySessionStore>,
        contact: &'static str,
    }

    #[async_trait]
    impl Pacer for ResettingPacer {
        async fn pause(&self, _duration: Duration) {
            self.store.delete(self.contact).await;
        }
    }

    #[tokio::test]
    async fn test_reset_during_turn_is_not_overwritten() {
        let store = Arc::new(InMemorySessionStore::new());
        let gateway = Arc::new(MockGateway::new());
        let pacer = ResettingPacer {
            store: Arc::clone(&store),
            contact: ANA,
        };
        let context = TurnContext::new(
            FlowPolicy::AwaitPayment,
            test_payment_details(),
            Pacing::default(),
        );
        let runtime = BotRuntime::new(context, Arc::clone(&store), Arc::clone(&gateway), pacer);

        store
            .set(
                ANA,
                Session::with_stage(Stage::CollectingForm {
                    variant: FormVariant::Deposit,
                }),
            )
            .await;

        runtime
            .handle_turn(&InboundMessage::text(ANA, FORM))
            .await
            .unwrap();

        assert!(gateway.last_text_to(ANA).unwrap().contains("PIX"));
        assert_eq!(store.get(ANA).await, None);
    }
}
