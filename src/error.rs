use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failure while talking to an upstream provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure: connect, timeout, body read
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A well-formed response with no usable text in it
    #[error("provider returned an empty reply")]
    EmptyReply,
}

/// Everything the chat endpoint can fail with.
///
/// Validation failures carry their own status and body; provider and internal
/// failures collapse to an opaque 500 so upstream details never reach the
/// client. The real cause is logged here, at the edge.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Message cannot be empty".to_string(),
                }),
            )
                .into_response(),
            ChatError::Provider(e) => {
                error!("Provider call failed: {}", e);
                internal_error()
            }
            ChatError::Internal(e) => {
                error!("Internal error: {:#}", e);
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        }),
    )
        .into_response()
}
