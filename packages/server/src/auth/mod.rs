//! Admin authentication: the [`SessionGate`] behind `POST /api/auth` and
//! `POST /api/auth/logout`, and the [`require_admin`] Route Guard middleware.

mod gate;
mod guard;

pub use gate::{AdminCredentials, SessionGate, SESSION_COOKIE, SESSION_TTL, SESSION_VALUE};
pub use guard::{
    guard, has_valid_marker, is_protected, require_admin, session_marker, GuardDecision,
    ADMIN_PATH, LOGIN_PATH,
};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::AuthError;

/// Body of `POST /api/auth`. `username` may be left out by single-secret deployments.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    pub password: String,
}

pub fn router(gate: SessionGate) -> Router {
    Router::new()
        .route("/api/auth", post(login))
        .route("/api/auth/logout", post(logout))
        .with_state(gate)
}

async fn login(State(gate): State<SessionGate>, body: Bytes) -> Result<Response, AuthError> {
    let request: LoginRequest = serde_json::from_slice(&body)
        .map_err(|err| AuthError::Backend(format!("unreadable login body: {err}")))?;

    let cookie = gate.authenticate(&request.username, &request.password)?;
    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response())
}

async fn logout(State(gate): State<SessionGate>) -> Response {
    (
        [(SET_COOKIE, gate.logout().to_string())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
