//! Admin access guard

use auth::{Claims, JwtError};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Require a bearer token carrying admin rights
///
/// Runs as a route layer, so a rejected request never reaches body
/// extraction or the handler. The decoded [`Claims`] are inserted into the
/// request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        warn!("Admin route {} requested without credentials", req.uri().path());
        return Err(ApiError::Unauthorized);
    };

    let claims = state
        .authenticator
        .jwt_service()
        .authorize_admin(bearer.token())
        .map_err(|e| {
            match &e {
                JwtError::NotAdmin => warn!("Non-admin token rejected on {}", req.uri().path()),
                other => warn!("Token rejected on {}: {}", req.uri().path(), other),
            }
            ApiError::from(e)
        })?;

    req.extensions_mut().insert::<Claims>(claims);

    Ok(next.run(req).await)
}
