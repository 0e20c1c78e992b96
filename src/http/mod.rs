//! HTTP surface for the browser chat widget
//!
//! - GET  /      - chat page (index.html from the working directory)
//! - GET  /test  - liveness probe
//! - POST /chat  - relay a message, return the reply text plus audio
//!
//! Remaining paths fall through to the static frontend directory.

mod handlers;
mod routes;
mod state;

pub use handlers::{ChatRequest, ChatResponse};
pub use routes::create_router;
pub use state::AppState;
