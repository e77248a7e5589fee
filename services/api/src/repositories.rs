//! Repositories for database operations
//!
//! Handlers talk to these traits; the Postgres implementations live in the
//! submodules.

use async_trait::async_trait;
use common::error::StoreResult;
use uuid::Uuid;

use crate::models::{
    AccountFilter, ContactMessage, NewContactMessage, NewOrder, NewPremiumAccount, NewProduct,
    Order, OrderStatusUpdate, PremiumAccount, PremiumAccountPatch, PremiumAccountSummary, Product,
    ProductPatch,
};

pub mod contact;
pub mod order;
pub mod premium_account;
pub mod product;

pub use contact::PgContactRepository;
pub use order::PgOrderRepository;
pub use premium_account::PgPremiumAccountRepository;
pub use product::PgProductRepository;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &NewProduct) -> StoreResult<Product>;

    /// All products, newest first
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Product>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Apply the present fields of `patch`; `None` if no such product
    async fn update(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait PremiumAccountRepository: Send + Sync {
    async fn create(&self, account: &NewPremiumAccount) -> StoreResult<PremiumAccount>;

    /// Listing projection, newest first
    async fn list(&self, filter: &AccountFilter) -> StoreResult<Vec<PremiumAccountSummary>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PremiumAccount>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PremiumAccount>>;

    async fn update(
        &self,
        id: Uuid,
        patch: &PremiumAccountPatch,
    ) -> StoreResult<Option<PremiumAccount>>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &NewOrder) -> StoreResult<Order>;

    /// All orders, newest first
    async fn list(&self) -> StoreResult<Vec<Order>>;

    async fn update_status(
        &self,
        id: Uuid,
        update: &OrderStatusUpdate,
    ) -> StoreResult<Option<Order>>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: &NewContactMessage) -> StoreResult<ContactMessage>;

    /// All messages, newest first
    async fn list(&self) -> StoreResult<Vec<ContactMessage>>;

    async fn mark_read(&self, id: Uuid) -> StoreResult<Option<ContactMessage>>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
