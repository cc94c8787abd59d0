//! Session endpoints: login, logout, whoami.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::CurrentUser;
use crate::auth::password::verify_password;
use crate::auth::session::{self, Principal};
use crate::db::schema::users;
use crate::error::ApiError;
use crate::models::user::User;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

// ---------------------------------------------------------------------------
// POST /login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let mut conn = state.db.get().await?;

    let user: Option<User> = users::table
        .filter(users::username.eq(&body.username))
        .select(User::as_select())
        .first(&mut conn)
        .await
        .optional()?;

    let authenticated = match &user {
        Some(user) => verify_password(&body.password, &user.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| authenticated) else {
        // One rejection path for unknown usernames and bad passwords alike.
        tracing::info!(username = %body.username, "login rejected");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                error: Some("Invalid username or password".to_string()),
            }),
        )
            .into_response());
    };

    let token = session::generate_session_token();
    let principal = Principal {
        user_id: user.id,
        username: user.username.clone(),
        is_dev: user.is_dev,
    };
    session::store_session(state.kv.as_ref(), &token, &principal).await?;

    tracing::info!(user_id = user.id, username = %user.username, is_dev = user.is_dev, "login succeeded");

    Ok((
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(LoginResponse {
            success: true,
            error: None,
        }),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// POST /logout
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Destroys the session unconditionally; succeeds even when no session
/// existed.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session::token_from_cookie_header)
    {
        // A store hiccup here still logs the caller out client-side; the
        // orphaned entry expires on its own.
        session::delete_session(state.kv.as_ref(), token).await.ok();
    }

    (
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(LogoutResponse { success: true }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /me
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "isDev", skip_serializing_if = "Option::is_none")]
    pub is_dev: Option<bool>,
}

/// Public fields of the current principal, or an empty object for
/// anonymous callers.
async fn me(CurrentUser(principal): CurrentUser) -> Json<MeResponse> {
    match principal {
        Some(p) => Json(MeResponse {
            username: Some(p.username),
            is_dev: Some(p.is_dev),
        }),
        None => Json(MeResponse {
            username: None,
            is_dev: None,
        }),
    }
}
