use super::error::ApiError;
use super::page;
use crate::agent::Assistant;
use crate::session::{ConversationSession, Message, Role, SessionStore};
use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/health", get(get_health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(delete_session))
        .route(
            "/api/sessions/{id}/messages",
            get(list_messages).post(post_message),
        )
        .route("/api/sessions/{id}/reply", post(retry_reply))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
            created_at: message.created_at(),
        }
    }
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: MessageResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected: Option<String>,
}

async fn get_page() -> Html<&'static str> {
    Html(page::CHAT_PAGE)
}

async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionCreated> {
    let handle = state.sessions.create().await;
    let id = handle.lock().await.id();
    Json(SessionCreated { id })
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.sessions.remove(id).await {
        return Err(ApiError::SessionNotFound(id));
    }
    Ok(Json(json!({ "deleted": true })))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let session = handle.lock().await;
    Ok(Json(
        session.transcript().iter().map(MessageResponse::from).collect(),
    ))
}

/// One full turn: append the user message and generate the reply.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let mut session = handle.lock().await;

    let reply = state.assistant.respond(&mut session, &request.message).await?;
    persist(&state, &session).await;

    Ok(Json(ChatResponse {
        reply: MessageResponse::from(&reply.message),
        corrected: reply.corrected,
    }))
}

/// Retry generation after a failed turn left the session awaiting a reply.
async fn retry_reply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let mut session = handle.lock().await;

    let message = state.assistant.retry_reply(&mut session).await?;
    persist(&state, &session).await;

    Ok(Json(ChatResponse {
        reply: MessageResponse::from(&message),
        corrected: None,
    }))
}

/// The reply is already committed in memory; a persistence failure is logged
/// rather than failing the request.
async fn persist(state: &AppState, session: &ConversationSession) {
    if let Err(e) = state.sessions.save(session).await {
        warn!("Failed to persist session {}: {}", session.id(), e);
    }
}
