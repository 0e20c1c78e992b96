//! Outbound provider clients
//!
//! Thin HTTP clients for the two upstream services:
//! - `GeminiClient` turns stored history plus a new message into a text reply
//! - `ElevenLabsClient` turns a text reply into MPEG audio
//!
//! Both take their base URL from configuration so tests can point them at a
//! local mock server.

mod elevenlabs;
mod gemini;

pub use elevenlabs::{ElevenLabsClient, SpeechResult};
pub use gemini::GeminiClient;
