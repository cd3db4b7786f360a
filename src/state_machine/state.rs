//! Per-contact session state types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which menu option led the contact into form collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    /// Depositors + amount (the deposit form itself)
    Deposit,
    /// Commission table
    PriceTable,
    /// Supported platforms
    Platforms,
}

impl FormVariant {
    /// Map a menu choice ("1", "2", "3") to its variant
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Self::Deposit),
            "2" => Some(Self::PriceTable),
            "3" => Some(Self::Platforms),
            _ => None,
        }
    }
}

/// Position of a contact within the scripted conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    /// Main menu was shown, waiting for an option
    Menu,
    /// Waiting for a filled-in deposit form
    CollectingForm { variant: FormVariant },
    /// Form accepted, waiting for proof of payment
    AwaitingPayment,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Menu => "menu",
            Stage::CollectingForm { .. } => "collecting_form",
            Stage::AwaitingPayment => "awaiting_payment",
        }
    }
}

/// Stored state for one contact
///
/// `stage` is `None` once the conversation was closed; `finalized` then
/// gates everything except the restart keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub stage: Option<Stage>,
    pub finalized: bool,
    /// Last accepted form submission (kept only while awaiting payment)
    pub submission: Option<String>,
}

impl Session {
    /// Fresh session sitting at the main menu
    pub fn at_menu() -> Self {
        Self {
            stage: Some(Stage::Menu),
            finalized: false,
            submission: None,
        }
    }

    /// Closed conversation; only a restart keyword reopens it
    pub fn closed() -> Self {
        Self {
            stage: None,
            finalized: true,
            submission: None,
        }
    }

    pub fn with_stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            finalized: false,
            submission: None,
        }
    }
}

/// What happens once a form submission is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPolicy {
    /// Send PIX instructions and wait for proof of payment
    #[default]
    AwaitPayment,
    /// Hand off to the team immediately and close the conversation
    FinalizeOnSubmit,
}

/// Payment instructions sent after a form is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub pix_key: String,
    pub holder: String,
    pub institution: String,
}

/// Cosmetic pauses between outbound actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Between the typing indicator and the menu
    pub typing: Duration,
    /// Before pinning the chat of an accepted submission
    pub pin: Duration,
    /// Between the confirmation and the payment instructions
    pub payment: Duration,
}

impl Pacing {
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            typing: Duration::ZERO,
            pin: Duration::ZERO,
            payment: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            typing: Duration::from_millis(1000),
            pin: Duration::from_millis(800),
            payment: Duration::from_millis(500),
        }
    }
}

/// Immutable configuration shared by every turn
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub policy: FlowPolicy,
    pub payment: PaymentDetails,
    pub pacing: Pacing,
}

impl TurnContext {
    pub fn new(policy: FlowPolicy, payment: PaymentDetails, pacing: Pacing) -> Self {
        Self {
            policy,
            payment,
            pacing,
        }
    }
}
