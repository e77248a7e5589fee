//! Product catalogue routes

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::info;

use super::parse_id;
use crate::{error::ApiError, sanitize, state::AppState};

const DUPLICATE_SLUG: &str = "This slug already exists. Try a different one.";
const NOT_FOUND: &str = "Product not found";
const INVALID_ID: &str = "Invalid product ID";

pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.products.list().await?;
    Ok(Json(json!({ "success": true, "products": products })))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .products
        .find_by_slug(&slug.trim().to_lowercase())
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(json!({ "success": true, "product": product })))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(raw) = payload?;
    let new_product = sanitize::new_product(&raw)?;

    let product = state
        .products
        .create(&new_product)
        .await
        .map_err(ApiError::conflict_as(DUPLICATE_SLUG))?;
    info!("Created product {} ({})", product.slug, product.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Product created successfully",
            "product": product,
        })),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let Json(raw) = payload?;
    let patch = sanitize::product_patch(&raw)?;

    let product = if patch.is_empty() {
        state.products.find_by_id(id).await?
    } else {
        state
            .products
            .update(id, &patch)
            .await
            .map_err(ApiError::conflict_as(DUPLICATE_SLUG))?
    };
    let product = product.ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    info!("Updated product {}", product.id);

    Ok(Json(json!({
        "success": true,
        "message": "Product updated successfully",
        "product": product,
    })))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    if !state.products.delete(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    info!("Deleted product {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully",
    })))
}
