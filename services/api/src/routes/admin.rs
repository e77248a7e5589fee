//! Admin session routes

use auth::Claims;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Exchange admin credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let issued = state
        .authenticator
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "token": issued.token,
        "tokenType": "Bearer",
        "expiresIn": issued.expires_in,
    })))
}

/// Tokens are stateless; the client drops its copy
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true }))
}

/// The decoded token payload, with `sub` surfaced as `adminId`
pub async fn me(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "admin": {
            "adminId": claims.sub,
            "isAdmin": claims.is_admin,
            "iat": claims.iat,
            "exp": claims.exp,
        },
    }))
}
