//! Pure turn transition function
//!
//! Given the stored session and one inbound message, decide the next session
//! and the outbound effects. No I/O happens here; the runtime executes the
//! effects and commits the session afterwards.

use super::{Effect, FlowPolicy, FormVariant, InboundMessage, Session, Stage, TurnContext};
use crate::form;
use crate::messages;

/// Greetings that (re)open the main menu from any state
pub const RESTART_KEYWORDS: [&str; 5] = ["oi", "olá", "ola", "menu", "amigo"];

/// Closes the conversation from any state
pub const EXIT_COMMAND: &str = "sair";

/// Menu option that hands the contact straight to an attendant
pub const ATTENDANT_CHOICE: &str = "4";

/// Substrings accepted as proof of payment
pub const PAYMENT_KEYWORDS: [&str; 4] = ["comprovante", "pago", "pagamento", "transferi"];

/// Result of a turn
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// Session to store after the effects succeed; `None` leaves the contact absent
    pub new_session: Option<Session>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

pub fn is_restart_keyword(text: &str) -> bool {
    RESTART_KEYWORDS.contains(&text)
}

pub fn is_payment_proof(msg: &InboundMessage) -> bool {
    msg.has_media || PAYMENT_KEYWORDS.iter().any(|kw| msg.text.contains(kw))
}

/// Pure transition function
///
/// Rules are tried in order and the first match wins: finalized gate, exit
/// command, restart keyword, then the handler of the current stage, then the
/// fallback prompt.
pub fn transition(
    session: Option<&Session>,
    ctx: &TurnContext,
    msg: &InboundMessage,
) -> TransitionResult {
    let restart = is_restart_keyword(&msg.text);

    if session.is_some_and(|s| s.finalized) && !restart {
        return TransitionResult::new(session.cloned());
    }

    if msg.text == EXIT_COMMAND {
        return TransitionResult::new(Some(Session::closed()))
            .with_effect(Effect::reply(messages::closed()));
    }

    if restart {
        return TransitionResult::new(Some(Session::at_menu())).with_effects([
            Effect::Typing,
            Effect::Pause(ctx.pacing.typing),
            Effect::SendMenu,
        ]);
    }

    let handled = match session.and_then(|s| s.stage) {
        Some(Stage::Menu) => handle_menu_choice(msg),
        Some(Stage::CollectingForm { .. }) => Some(handle_form_submission(session, ctx, msg)),
        Some(Stage::AwaitingPayment) => Some(handle_awaiting_payment(session, msg)),
        None => None,
    };

    handled.unwrap_or_else(|| fallback(session, msg))
}

fn handle_menu_choice(msg: &InboundMessage) -> Option<TransitionResult> {
    if let Some(variant) = FormVariant::from_choice(&msg.text) {
        return Some(
            TransitionResult::new(Some(Session::with_stage(Stage::CollectingForm { variant })))
                .with_effect(Effect::reply(messages::option(variant))),
        );
    }

    if msg.text == ATTENDANT_CHOICE {
        return Some(
            TransitionResult::new(Some(Session::closed()))
                .with_effect(Effect::reply(messages::attendant_handoff())),
        );
    }

    None
}

fn handle_form_submission(
    session: Option<&Session>,
    ctx: &TurnContext,
    msg: &InboundMessage,
) -> TransitionResult {
    if !form::validate(&msg.raw_text) {
        // Stage stays as it is; the contact can simply resend the form
        return TransitionResult::new(session.cloned())
            .with_effect(Effect::reply(messages::incomplete_form()));
    }

    let accepted = [Effect::Pause(ctx.pacing.pin), Effect::PinChat];

    match ctx.policy {
        FlowPolicy::AwaitPayment => TransitionResult::new(Some(Session {
            stage: Some(Stage::AwaitingPayment),
            finalized: false,
            submission: Some(msg.raw_text.clone()),
        }))
        .with_effects(accepted)
        .with_effects([
            Effect::reply(messages::form_received_await_payment()),
            Effect::Pause(ctx.pacing.payment),
            Effect::reply(messages::payment_instructions(&ctx.payment)),
        ]),
        FlowPolicy::FinalizeOnSubmit => TransitionResult::new(Some(Session::closed()))
            .with_effects(accepted)
            .with_effect(Effect::reply(messages::form_received_handoff())),
    }
}

fn handle_awaiting_payment(session: Option<&Session>, msg: &InboundMessage) -> TransitionResult {
    if is_payment_proof(msg) {
        return TransitionResult::new(Some(Session::closed()))
            .with_effect(Effect::reply(messages::payment_pending_confirmation()));
    }

    // Still waiting; stay quiet
    TransitionResult::new(session.cloned())
}

fn fallback(session: Option<&Session>, msg: &InboundMessage) -> TransitionResult {
    let result = TransitionResult::new(session.cloned());
    if msg.text.is_empty() && !msg.has_media {
        return result;
    }
    result.with_effect(Effect::reply(messages::fallback()))
}
