//! Events delivered by the WhatsApp Web bridge
//!
//! The bridge posts one JSON object per event to the webhook. Message events
//! are filtered and normalized here before they reach the state machine.

use crate::state_machine::InboundMessage;
use serde::{Deserialize, Serialize};

const BROADCAST_MARKER: &str = "status@broadcast";
const GROUP_SUFFIX: &str = "@g.us";

/// Raw transport event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    Message(RawMessage),
    /// Pairing code to be scanned from the phone
    Qr {
        code: String,
    },
    Ready,
    Authenticated,
    Disconnected {
        #[serde(default)]
        reason: String,
    },
}

/// Inbound chat message as the bridge reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub from: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub is_broadcast: bool,
    #[serde(default)]
    pub from_me: bool,
}

impl RawMessage {
    pub fn is_broadcast(&self) -> bool {
        self.is_broadcast || self.from.contains(BROADCAST_MARKER)
    }

    pub fn is_group(&self) -> bool {
        self.is_group || self.from.contains(GROUP_SUFFIX)
    }

    /// Status updates, groups and the bot's own messages never reach the funnel
    pub fn is_ignored(&self) -> bool {
        self.is_broadcast() || self.is_group() || self.from_me
    }
}

/// Turn a raw message into a turn input, or `None` if it must be ignored
pub fn normalize(raw: &RawMessage) -> Option<InboundMessage> {
    if raw.is_ignored() {
        return None;
    }
    Some(InboundMessage::new(
        raw.from.clone(),
        raw.body.clone().unwrap_or_default(),
        raw.has_media,
    ))
}
