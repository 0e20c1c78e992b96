use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::Conversation;

/// Eviction rules for the in-memory store
#[derive(Debug, Clone)]
pub struct EvictionPolicy {
    /// Hard cap on live sessions; past it, least-recently-active go first
    pub max_sessions: usize,

    /// Sessions idle longer than this are dropped
    pub idle_timeout: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_timeout: Duration::from_secs(1800), // 30 minutes
        }
    }
}

/// Keyed conversation storage behind the HTTP layer.
///
/// `checkout` hands back a per-user handle; the caller holds its lock across
/// the whole read-call-append cycle, so appends to one user's history
/// serialize while different users proceed concurrently.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the session for `user_id`, creating it on first use
    async fn checkout(&self, user_id: &str) -> Arc<Mutex<Conversation>>;

    /// Number of live sessions
    async fn session_count(&self) -> usize;

    /// Evict idle and over-cap sessions; returns how many were dropped
    async fn sweep(&self) -> usize;
}

/// Default `SessionStore`: a guarded map of per-user conversations
pub struct MemoryStore {
    /// Live sessions (user_id → conversation)
    sessions: RwLock<HashMap<String, Arc<Mutex<Conversation>>>>,

    /// Eviction rules applied by `sweep`
    policy: EvictionPolicy,
}

impl MemoryStore {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(EvictionPolicy::default())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn checkout(&self, user_id: &str) -> Arc<Mutex<Conversation>> {
        // Fast path: the session already exists
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(user_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                info!("Creating session for user: {}", user_id);
                Arc::new(Mutex::new(Conversation::new()))
            });
        Arc::clone(session)
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn sweep(&self) -> usize {
        let now = Utc::now();
        let idle_limit = chrono::Duration::seconds(self.policy.idle_timeout.as_secs() as i64);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        // Drop idle sessions. `try_lock` failing means a request is mid-flight
        // on that session, so it stays no matter how old its timestamp is.
        sessions.retain(|_, session| match session.try_lock() {
            Ok(conversation) => now.signed_duration_since(conversation.last_active()) < idle_limit,
            Err(_) => true,
        });

        // Still over the cap: shed least-recently-active first, again
        // skipping anything currently locked.
        if sessions.len() > self.policy.max_sessions {
            let mut by_age: Vec<(String, chrono::DateTime<Utc>)> = sessions
                .iter()
                .filter_map(|(user_id, session)| {
                    session
                        .try_lock()
                        .ok()
                        .map(|conversation| (user_id.clone(), conversation.last_active()))
                })
                .collect();
            by_age.sort_by_key(|(_, last_active)| *last_active);

            let excess = sessions.len() - self.policy.max_sessions;
            for (user_id, _) in by_age.into_iter().take(excess) {
                sessions.remove(&user_id);
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} session(s), {} remain", evicted, sessions.len());
        }
        evicted
    }
}
