pub mod config;
pub mod error;
pub mod http;
pub mod providers;
pub mod session;

pub use config::Settings;
pub use error::{ChatError, ErrorResponse, ProviderError};
pub use http::{create_router, AppState, ChatRequest, ChatResponse};
pub use providers::{ElevenLabsClient, GeminiClient, SpeechResult};
pub use session::{Conversation, EvictionPolicy, MemoryStore, Role, SessionStore, Turn};
