use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use crate::auth::session::{self, Principal};
use crate::error::ApiError;
use crate::AppState;

/// Session principal extracted from the session cookie, if any.
///
/// Never rejects on a missing or unknown session: handlers that only shape
/// their payload by privilege (`GET /apartments`, `GET /me`) use this and
/// treat `None` as an anonymous caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(session::token_from_cookie_header);

        let Some(token) = token else {
            return Ok(CurrentUser(None));
        };

        let principal = session::lookup_session(state.kv.as_ref(), token).await?;
        Ok(CurrentUser(principal))
    }
}

/// Session principal required to carry the dev flag.
///
/// Write endpoints use this extractor; an absent session or a non-dev
/// principal rejects with 403 before the handler runs, so no side effect is
/// possible.
#[derive(Debug, Clone)]
pub struct DevUser(pub Principal);

impl FromRequestParts<AppState> for DevUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;

        match principal {
            Some(p) if p.is_dev => Ok(DevUser(p)),
            _ => Err(ApiError::forbidden("Dev privileges required")),
        }
    }
}
