//! Conversation session management
//!
//! This module provides per-user chat history and the store that holds it:
//! - `Conversation` accumulates alternating user/model turns with activity
//!   timestamps
//! - `SessionStore` is the injectable storage seam behind the HTTP layer
//! - `MemoryStore` keeps sessions in memory with idle-timeout and
//!   least-recently-active eviction

mod history;
mod store;

pub use history::{Conversation, Role, Turn};
pub use store::{EvictionPolicy, MemoryStore, SessionStore};
