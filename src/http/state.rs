use std::sync::Arc;

use crate::providers::{ElevenLabsClient, GeminiClient};
use crate::session::SessionStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Conversation storage; injectable, in-memory by default
    pub store: Arc<dyn SessionStore>,

    /// Text reply provider
    pub gemini: GeminiClient,

    /// Speech synthesis provider
    pub elevenlabs: ElevenLabsClient,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        gemini: GeminiClient,
        elevenlabs: ElevenLabsClient,
    ) -> Self {
        Self {
            store,
            gemini,
            elevenlabs,
        }
    }
}
