//! Application state shared across handlers

use async_trait::async_trait;
use auth::Authenticator;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    repositories::{
        ContactRepository, OrderRepository, PremiumAccountRepository, ProductRepository,
    },
    upload::UploadStore,
};

/// Backing store reachability, reported by `/health`
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for PgPool {
    async fn is_healthy(&self) -> bool {
        common::database::health_check(self).await.unwrap_or(false)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Authenticator,
    pub products: Arc<dyn ProductRepository>,
    pub premium_accounts: Arc<dyn PremiumAccountRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub uploads: UploadStore,
    pub health: Arc<dyn HealthProbe>,
}
