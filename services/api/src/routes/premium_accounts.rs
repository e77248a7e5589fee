//! Premium account routes
//!
//! The public listing and slug lookup answer with bare JSON values; the
//! admin routes wrap records in `{success, account}`.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::info;

use super::parse_id;
use crate::{error::ApiError, models::AccountFilter, sanitize, state::AppState};

const DUPLICATE_SLUG: &str = "Slug already exists. Choose a different slug.";
const NOT_FOUND: &str = "Account not found";
const INVALID_ID: &str = "Invalid account ID";

/// Repeated or unknown query keys never fail the request. A malformed query
/// string lists everything.
pub async fn list_accounts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let filter = AccountFilter::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let accounts = state.premium_accounts.list(&filter).await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .premium_accounts
        .find_by_slug(&slug.trim().to_lowercase())
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(account))
}

pub async fn get_account_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let account = state
        .premium_accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(json!({ "success": true, "account": account })))
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(raw) = payload?;
    let new_account = sanitize::new_premium_account(&raw)?;

    let account = state
        .premium_accounts
        .create(&new_account)
        .await
        .map_err(ApiError::conflict_as(DUPLICATE_SLUG))?;
    info!("Created premium account {} ({})", account.slug, account.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Account created successfully",
            "account": account,
        })),
    ))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let Json(raw) = payload?;
    let patch = sanitize::premium_account_patch(&raw)?;

    let account = if patch.is_empty() {
        state.premium_accounts.find_by_id(id).await?
    } else {
        state
            .premium_accounts
            .update(id, &patch)
            .await
            .map_err(ApiError::conflict_as(DUPLICATE_SLUG))?
    };
    let account = account.ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    info!("Updated premium account {}", account.id);

    Ok(Json(json!({
        "success": true,
        "message": "Account updated successfully",
        "account": account,
    })))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    if !state.premium_accounts.delete(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    info!("Deleted premium account {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Account deleted successfully",
    })))
}
