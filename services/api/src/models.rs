//! Storefront models: stored records and the sanitized payloads that create
//! or update them

pub mod contact;
pub mod order;
pub mod premium_account;
pub mod product;

pub use contact::{ContactMessage, NewContactMessage};
pub use order::{NewOrder, Order, OrderStatus, OrderStatusUpdate, PaymentStatus};
pub use premium_account::{
    AccountFilter, AccountType, NewPremiumAccount, PremiumAccount, PremiumAccountPatch,
    PremiumAccountSummary,
};
pub use product::{FeatureSection, FeaturesData, NewProduct, Prices, Product, ProductPatch};

/// A string-backed enum with a closed, case-sensitive set of values
pub trait Choice: Sized + 'static {
    const VARIANTS: &'static [&'static str];

    fn from_variant(value: &str) -> Option<Self>;
}
