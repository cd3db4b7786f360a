//! HTTP request handlers

use super::types::{ErrorResponse, QueuedResponse, SessionResponse, SuccessResponse};
use super::AppState;
use crate::gateway::GatewayEvent;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Bridge events
        .route("/webhook", post(receive_event))
        // Liveness
        .route("/health", get(health))
        // Operator tools
        .route(
            "/api/sessions/:id",
            get(get_session).delete(delete_session),
        )
        .with_state(state)
}

async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<GatewayEvent>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    state.events.send(event).await.map_err(|_| {
        tracing::error!("Runtime is not accepting events");
        AppError::Unavailable("Bot runtime stopped".to_string())
    })?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No session for {id}")))?;
    Ok(Json(SessionResponse {
        contact_id: id,
        session,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.sessions.delete(&id).await {
        return Err(AppError::NotFound(format!("No session for {id}")));
    }
    tracing::info!(contact = %id, "Session reset by operator");
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
