//! Server-side sessions keyed by an opaque cookie token.
//!
//! The cookie carries nothing but a random token; the principal lives in the
//! key-value store under that token for [`SESSION_TTL_SECS`], so logout and
//! expiry revoke it without any client cooperation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::db::kv::KeyValueStore;
use crate::error::ApiError;

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "sid";

/// Session TTL in seconds (24 hours).
pub const SESSION_TTL_SECS: u64 = 86_400;

/// Principal stored server-side for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub is_dev: bool,
}

/// Generate an opaque session token (`sess_` prefix, 32 random bytes).
pub fn generate_session_token() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    let mut buf = vec![0u8; 32];
    rand::thread_rng().fill(&mut buf[..]);
    format!("sess_{}", URL_SAFE_NO_PAD.encode(&buf))
}

fn session_key(token: &str) -> String {
    format!("sess:{token}")
}

/// Store a principal under the session token.
pub async fn store_session(
    kv: &dyn KeyValueStore,
    token: &str,
    principal: &Principal,
) -> Result<(), ApiError> {
    let value =
        serde_json::to_string(principal).map_err(|_| ApiError::internal("serialization"))?;
    kv.set_ex(&session_key(token), &value, SESSION_TTL_SECS).await
}

/// Look up the principal for a session token.
pub async fn lookup_session(
    kv: &dyn KeyValueStore,
    token: &str,
) -> Result<Option<Principal>, ApiError> {
    match kv.get(&session_key(token)).await? {
        Some(v) => {
            let principal: Principal =
                serde_json::from_str(&v).map_err(|_| ApiError::internal("corrupt session data"))?;
            Ok(Some(principal))
        }
        None => Ok(None),
    }
}

/// Delete a session. Safe to call for tokens that no longer exist.
pub async fn delete_session(kv: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    kv.del(&session_key(token)).await
}

/// `Set-Cookie` value establishing the session cookie.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}")
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from a `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}
