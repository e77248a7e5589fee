//! Contact form routes

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::info;

use super::parse_id;
use crate::{error::ApiError, sanitize, state::AppState};

const NOT_FOUND: &str = "Message not found";
const INVALID_ID: &str = "Invalid message ID";

pub async fn submit_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(raw) = payload?;
    let new_message = sanitize::new_contact_message(&raw)?;

    let message = state.contacts.create(&new_message).await?;
    info!("Contact message {} received", message.id);

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully! We'll reply soon.",
    })))
}

pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let contacts = state.contacts.list().await?;
    Ok(Json(json!({ "success": true, "contacts": contacts })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let contact = state
        .contacts
        .mark_read(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(json!({ "success": true, "contact": contact })))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    if !state.contacts.delete(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    Ok(Json(json!({ "success": true, "message": "Message deleted" })))
}
