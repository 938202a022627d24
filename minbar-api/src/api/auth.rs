//! Session authentication middleware
//!
//! Enforcement happens here, at the trusted boundary. The `login_url`
//! carried in 401 bodies (with the original destination as the `next`
//! parameter) exists so the UI can redirect; it is UX, not the security
//! control.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use minbar_common::auth::{verify_session, Session};

use crate::AppState;

/// Require a valid session; attaches the verified `Session` as a request
/// extension for downstream handlers
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let login_url = login_redirect(&state, &request);
    let token = bearer_token(&request).map(str::to_owned);
    let session = authenticate(&state, token, login_url).await?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Require a valid session with the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let login_url = login_redirect(&state, &request);
    let token = bearer_token(&request).map(str::to_owned);
    let session = authenticate(&state, token, login_url).await?;
    if !session.is_admin() {
        warn!(user_id = %session.user_id, path = %request.uri().path(), "Admin route denied");
        return Err(AuthError::Forbidden);
    }
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// `token` and `login_url` are materialized as owned values by the callers
// before this future is awaited: `&Request` is `!Send` (axum's `Body` is
// `!Sync`), so holding the request borrow across the `verify_session`
// `.await` would make the middleware future `!Send` and unusable as a
// tower `Service`.
async fn authenticate(
    state: &AppState,
    token: Option<String>,
    login_url: String,
) -> Result<Session, AuthError> {
    let Some(token) = token else {
        return Err(AuthError::MissingCredentials { login_url });
    };

    match verify_session(&state.db, &token).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(AuthError::InvalidSession { login_url }),
        Err(e) => Err(AuthError::Internal(e.to_string())),
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Login URL carrying the original destination as the return parameter
fn login_redirect(state: &AppState, request: &Request) -> String {
    format!("{}?next={}", state.config.login_url, request.uri().path())
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials { login_url: String },
    InvalidSession { login_url: String },
    Forbidden,
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials { login_url } => {
                let body = Json(json!({
                    "error": { "code": "UNAUTHORIZED", "message": "Sign in required" },
                    "login_url": login_url,
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            AuthError::InvalidSession { login_url } => {
                let body = Json(json!({
                    "error": { "code": "SESSION_INVALID", "message": "Session missing or expired" },
                    "login_url": login_url,
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            AuthError::Forbidden => {
                let body = Json(json!({
                    "error": { "code": "FORBIDDEN", "message": "Admin access required" },
                }));
                (StatusCode::FORBIDDEN, body).into_response()
            }
            AuthError::Internal(msg) => {
                let body = Json(json!({
                    "error": { "code": "INTERNAL_ERROR", "message": msg },
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
