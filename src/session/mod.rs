//! Per-(form, account) progress records kept in an external key-value store.

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;
pub mod repository;
pub mod store;

pub use memory::MemorySessionStore;
#[cfg(feature = "redis-store")]
pub use self::redis::RedisSessionStore;
pub use repository::SessionRepository;
pub use store::SessionStore;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored answers keyed by node id. Values are kept exactly as submitted.
pub type Answers = AHashMap<String, Value>;

/// Where an account stands in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub current_node_id: String,
    #[serde(default)]
    pub answers: Answers,
}

impl Session {
    pub fn at(node_id: impl Into<String>) -> Self {
        Self {
            current_node_id: node_id.into(),
            answers: Answers::new(),
        }
    }
}
