//! Order routes

use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use super::parse_id;
use crate::{error::ApiError, models::OrderStatusUpdate, sanitize, state::AppState};

const NOT_FOUND: &str = "Order not found";
const INVALID_ID: &str = "Invalid order ID";

/// Place an order from a JSON body, without a screenshot
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(raw) = payload?;
    let new_order = sanitize::new_order(&raw)?;

    let order = state.orders.create(&new_order).await?;
    info!("Order {} placed for {}", order.id, order.product_name);

    Ok(Json(json!({ "success": true, "order": order })))
}

/// Place an order from a multipart form with a payment screenshot
///
/// The file and the text fields are both validated before the file is
/// written. If the order cannot be recorded the written file is removed.
pub async fn create_order_with_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = state.uploads.read_form(multipart).await?;
    let mut new_order = sanitize::new_order(&form.fields)?;

    let stored = state.uploads.save(&form.file).await?;
    new_order.screenshot = Some(stored.public_path.clone());

    let order = match state.orders.create(&new_order).await {
        Ok(order) => order,
        Err(e) => {
            error!("Order insert failed, discarding {}", stored.public_path);
            state.uploads.discard(&stored).await;
            return Err(e.into());
        }
    };
    info!(
        "Order {} placed for {} with screenshot {}",
        order.id, order.product_name, stored.public_path
    );

    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state.orders.list().await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// `PUT /orders/payment/:id` with `{status}`
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let Json(raw) = payload?;
    let update = sanitize::payment_status_update(&raw)?;
    apply_status(&state, id, update).await
}

/// `PUT /orders/status/:id` with `{paymentStatus?, orderStatus?}`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let Json(raw) = payload?;
    let update = sanitize::status_update(&raw)?;
    apply_status(&state, id, update).await
}

async fn apply_status(
    state: &AppState,
    id: Uuid,
    update: OrderStatusUpdate,
) -> Result<Json<Value>, ApiError> {
    let order = state
        .orders
        .update_status(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    info!(
        "Order {} now payment={:?} order={:?}",
        order.id, order.payment_status, order.order_status
    );

    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    if !state.orders.delete(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    info!("Deleted order {}", id);

    Ok(Json(json!({ "success": true })))
}
