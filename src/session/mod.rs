//! In-memory session store with idle TTL and LRU eviction.
//!
//! The store only holds state; cookies and request plumbing live in the web
//! layer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::Conversation;

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Error,
    Info,
}

/// One-shot notice shown on the next chat page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Everything a session remembers between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    /// `None` until the chat page is first visited, and again after a clear.
    pub conversation: Option<Conversation>,
    pub flashes: Vec<Flash>,
}

impl SessionData {
    /// The conversation, creating an empty one on first use.
    pub fn conversation_mut(&mut self) -> &mut Conversation {
        self.conversation.get_or_insert_with(Conversation::new)
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
    }

    /// Remove and return pending flashes.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}

/// Shared map of session id to [`SessionData`].
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<StoreInner>>,
}

struct StoreInner {
    entries: HashMap<Uuid, SessionEntry>,
    max_entries: usize,
    ttl: Duration,
}

struct SessionEntry {
    data: SessionData,
    last_accessed: Instant,
}

impl SessionStore {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                entries: HashMap::new(),
                max_entries: max_entries.max(1),
                ttl,
            })),
        }
    }

    /// Load a session's data, returning `None` if unknown or idle past the TTL.
    pub fn load(&self, id: &Uuid) -> Option<SessionData> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = inner.ttl;

        let expired = inner
            .entries
            .get(id)
            .map(|e| e.last_accessed.elapsed() > ttl);
        match expired {
            Some(true) => {
                inner.entries.remove(id);
                None
            }
            Some(false) => inner.entries.get_mut(id).map(|entry| {
                entry.last_accessed = Instant::now();
                entry.data.clone()
            }),
            None => None,
        }
    }

    /// Store a session's data.
    ///
    /// Only a new session arriving at a full store triggers cleanup: expired
    /// entries go first, then the least recently used one if still full.
    pub fn save(&self, id: Uuid, data: SessionData) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if !inner.entries.contains_key(&id) && inner.entries.len() >= inner.max_entries {
            let ttl = inner.ttl;
            inner.entries.retain(|_, e| e.last_accessed.elapsed() <= ttl);

            if inner.entries.len() >= inner.max_entries {
                if let Some(lru_id) = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_accessed)
                    .map(|(k, _)| *k)
                {
                    tracing::debug!(session = %lru_id, "Evicting least recently used session");
                    inner.entries.remove(&lru_id);
                }
            }
        }

        inner.entries.insert(
            id,
            SessionEntry {
                data,
                last_accessed: Instant::now(),
            },
        );
    }

    /// Current number of live sessions.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
