//! MagicWorld storefront API
//!
//! HTTP surface for the product catalogue, premium account listings, orders
//! with payment screenshots and the contact form. Admin routes are guarded
//! by bearer tokens issued from the `auth` crate.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod upload;

pub use config::{AppConfig, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, HealthProbe};
