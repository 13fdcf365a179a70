use super::store::SessionStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::warn;

/// Session store backed by Redis. Expiry is delegated to Redis key TTLs.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "redis GET failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Option<()> {
        let mut conn = self.conn.clone();
        let result: redis::RedisResult<()> = match ttl {
            Some(ttl) => conn.set_ex(key, value, ttl.as_secs().max(1)).await,
            None => conn.set(key, value).await,
        };
        match result {
            Ok(()) => Some(()),
            Err(e) => {
                warn!(key, error = %e, "redis SET failed");
                None
            }
        }
    }

    async fn del(&self, key: &str) -> Option<u64> {
        let mut conn = self.conn.clone();
        match conn.del::<_, u64>(key).await {
            Ok(removed) => Some(removed),
            Err(e) => {
                warn!(key, error = %e, "redis DEL failed");
                None
            }
        }
    }
}
