use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ApiError;

/// Abstraction over the key-value store holding server-side sessions.
///
/// Backed by Redis when `REDIS_URL` is configured, and by an in-memory map
/// in tests and single-process dev setups.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError>;
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    async fn del(&self, key: &str) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// Process-local store. TTLs are not enforced; entries live until deleted
/// or the process exits, which matches a dev session's lifetime closely
/// enough for local use.
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_ex(&self, key: &str, value: &str, _ttl_secs: u64) -> Result<(), ApiError> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn del(&self, key: &str) -> Result<(), ApiError> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Redis implementation
// ---------------------------------------------------------------------------

/// Redis-backed store. Sessions expire server-side via Redis TTLs.
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Self {
        let client = redis::Client::open(redis_url).expect("invalid REDIS_URL");
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .expect("failed to connect to Redis");

        tracing::info!("redis session store connected");

        Self { conn }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| {
                tracing::error!(?e, "redis set failed");
                ApiError::internal("Session store unavailable")
            })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(|e| {
            tracing::error!(?e, "redis get failed");
            ApiError::internal("Session store unavailable")
        })
    }

    async fn del(&self, key: &str) -> Result<(), ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(|e| {
            tracing::error!(?e, "redis del failed");
            ApiError::internal("Session store unavailable")
        })
    }
}
