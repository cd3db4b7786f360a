//! Inbound messages that drive a turn

/// A message from a contact that survived the gateway's ignore filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: String,
    /// Trimmed, lowercased body used for command matching
    pub text: String,
    /// Body exactly as received, used for form validation
    pub raw_text: String,
    pub has_media: bool,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, body: impl Into<String>, has_media: bool) -> Self {
        let raw_text = body.into();
        Self {
            sender_id: sender_id.into(),
            text: raw_text.trim().to_lowercase(),
            raw_text,
            has_media,
        }
    }

    #[cfg(test)]
    pub fn text(sender_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(sender_id, body, false)
    }

    #[cfg(test)]
    pub fn media(sender_id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self::new(sender_id, caption, true)
    }
}
