use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn. Values match the generative-language wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single utterance in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker of this turn
    pub role: Role,

    /// Text content; one entry per part, in practice exactly one
    pub parts: Vec<String>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![text.into()],
        }
    }
}

/// One user's chat history, plus the timestamps eviction relies on.
///
/// This is the only copy of the history: provider requests are built from
/// these turns, and the chat handler appends exactly once per side.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Ordered turns, alternating user/model starting with user
    turns: Vec<Turn>,

    /// When the session was created
    created_at: DateTime<Utc>,

    /// Refreshed on every append; drives idle eviction
    last_active: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            turns: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Append a turn and refresh the activity timestamp
    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
        self.last_active = Utc::now();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
