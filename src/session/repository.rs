use super::Session;
use super::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Typed access to sessions keyed by (form, account).
///
/// Every failure, including a record that no longer deserializes, reads as
/// "no session". Nothing here ever returns an error.
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn SessionStore>,
    prefix: String,
    ttl: Duration,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn SessionStore>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl,
        }
    }

    pub fn key(&self, form_id: &str, account: &str) -> String {
        format!("{}:{}:{}", self.prefix, form_id, account)
    }

    pub async fn load(&self, form_id: &str, account: &str) -> Option<Session> {
        let key = self.key(form_id, account);
        let raw = self.store.get(&key).await?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(%key, error = %e, "discarding unreadable session record");
                None
            }
        }
    }

    /// Writes the session and refreshes its TTL. Returns whether the store accepted it.
    pub async fn save(&self, form_id: &str, account: &str, session: &Session) -> bool {
        let key = self.key(form_id, account);
        let value = match serde_json::to_string(session) {
            Ok(value) => value,
            Err(e) => {
                warn!(%key, error = %e, "could not serialize session");
                return false;
            }
        };
        let saved = self.store.set(&key, value, Some(self.ttl)).await.is_some();
        if !saved {
            warn!(%key, "session store rejected write");
        }
        saved
    }

    /// Removes the session. Returns whether the store answered.
    pub async fn clear(&self, form_id: &str, account: &str) -> bool {
        let key = self.key(form_id, account);
        match self.store.del(&key).await {
            Some(removed) => {
                debug!(%key, removed, "session cleared");
                true
            }
            None => {
                warn!(%key, "session store failed to delete");
                false
            }
        }
    }
}
