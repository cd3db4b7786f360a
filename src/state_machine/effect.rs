//! Effects produced by a turn

use std::time::Duration;

/// Outbound actions the runtime executes, in order, after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reply to the contact with a fixed text
    Reply(String),

    /// Reply with the main menu, greeting the contact by display name
    SendMenu,

    /// Show the "typing" indicator (best-effort)
    Typing,

    /// Cosmetic pause before the next effect
    Pause(Duration),

    /// Pin the contact's chat (best-effort)
    PinChat,
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(text.into())
    }

    /// Whether a failure of this effect must abort the turn
    pub fn is_required(&self) -> bool {
        matches!(self, Effect::Reply(_) | Effect::SendMenu)
    }
}
