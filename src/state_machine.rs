//! Conversation state machine
//!
//! Pure per-turn transitions over a contact's session. The runtime owns all
//! I/O: it executes the returned effects and stores the new session.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::InboundMessage;
pub use state::{FlowPolicy, FormVariant, Pacing, PaymentDetails, Session, Stage, TurnContext};
pub use transition::{transition, TransitionResult};
