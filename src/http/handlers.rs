use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::AppState;
use crate::error::ChatError;
use crate::providers::SpeechResult;
use crate::session::Role;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session key; omitted means the shared "default" session
    pub user_id: Option<String>,

    /// The user's message; must be non-empty
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The model's text reply
    pub response: String,

    /// Base64-encoded MPEG audio of the reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_blob: Option<String>,

    /// Set only when synthesis failed and the client should speak the
    /// reply with the browser's own voice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_browser_tts: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat
/// Relay one user message: append to history, fetch a reply, synthesize it
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    let user_id = req.user_id.unwrap_or_else(|| "default".to_string());

    // Validate before touching the store so bad requests never create sessions
    let message = match req.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => return Err(ChatError::EmptyMessage),
    };

    info!("Chat message from user: {}", user_id);

    let session = state.store.checkout(&user_id).await;

    // Hold the lock across the whole read-call-append cycle so concurrent
    // requests for one user serialize instead of racing on the history.
    let mut conversation = session.lock().await;
    let reply = state.gemini.reply(conversation.turns(), &message).await?;
    conversation.push(Role::User, message);
    conversation.push(Role::Model, reply.clone());
    drop(conversation);

    match state.elevenlabs.synthesize(&reply).await? {
        SpeechResult::Audio(audio) => Ok(Json(ChatResponse {
            response: reply,
            audio_blob: Some(STANDARD.encode(audio)),
            use_browser_tts: None,
        })),
        SpeechResult::Unavailable { .. } => Ok(Json(ChatResponse {
            response: reply,
            audio_blob: None,
            use_browser_tts: Some(true),
        })),
    }
}

/// GET /test
/// Liveness check used while wiring up the frontend
pub async fn test() -> impl IntoResponse {
    (StatusCode::OK, "Backend is working!")
}
