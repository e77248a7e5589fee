//! API service routes
//!
//! Public and admin routes are built as two routers and merged. Admin routes
//! carry the [`require_admin`] route layer, so a path such as `/orders`
//! can be public for `POST` and admin-only for `GET`.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::ServerConfig,
    error::ApiError,
    middleware::require_admin,
    state::AppState,
    upload::{PUBLIC_PREFIX, UPLOAD_BODY_LIMIT},
};

pub mod admin;
pub mod contact;
pub mod orders;
pub mod premium_accounts;
pub mod products;

/// Create the router for the API service
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let admin_routes = Router::new()
        .route("/admin/me", get(admin::me))
        .route("/contact", get(contact::list_messages))
        .route("/contact/read/:id", put(contact::mark_read))
        .route("/contact/:id", delete(contact::delete_message))
        .route("/orders", get(orders::list_orders))
        .route("/orders/payment/:id", put(orders::update_payment_status))
        .route("/orders/status/:id", put(orders::update_status))
        .route("/orders/:id", delete(orders::delete_order))
        .route("/products", post(products::create_product))
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route(
            "/premium-accounts/admin",
            post(premium_accounts::create_account),
        )
        .route(
            "/premium-accounts/admin/id/:id",
            get(premium_accounts::get_account_by_id),
        )
        .route(
            "/premium-accounts/admin/:id",
            put(premium_accounts::update_account).delete(premium_accounts::delete_account),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(health_check))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/contact", post(contact::submit_message))
        .route("/orders", post(orders::create_order))
        .route(
            "/orders/upload",
            post(orders::create_order_with_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/products", get(products::list_products))
        // The public segment is a slug; admin methods on the same path take an id
        .route("/products/:id", get(products::get_product))
        .route("/premium-accounts", get(premium_accounts::list_accounts))
        .route("/premium-accounts/:slug", get(premium_accounts::get_account))
        .merge(admin_routes)
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(cors_layer(&server.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = state.health.is_healthy().await;
    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "ok" } else { "degraded" },
            "service": "magicworld-api",
            "database": if database_up { "up" } else { "down" },
        })),
    )
}

/// Parse an id path segment, answering 400 with `message` when malformed
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(message.to_string()))
}
