//! API request and response types

use crate::state_machine::Session;
use serde::Serialize;

/// Response for an accepted webhook event
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response with one contact's session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub contact_id: String,
    pub session: Session,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
