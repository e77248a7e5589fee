//! Orders placed by buyers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Choice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl Choice for PaymentStatus {
    const VARIANTS: &'static [&'static str] = &["pending", "paid", "failed"];

    fn from_variant(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
    Cancelled,
}

impl Choice for OrderStatus {
    const VARIANTS: &'static [&'static str] = &["pending", "delivered", "cancelled"];

    fn from_variant(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub product_name: String,
    pub plan: String,
    pub price: f64,
    pub email: String,
    pub telegram: Option<String>,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Public path of the payment screenshot, e.g. `/uploads/<file>`
    pub screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Buyer-supplied order fields. Statuses always start as pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub product_name: String,
    pub plan: String,
    pub price: f64,
    pub email: String,
    pub telegram: Option<String>,
    pub screenshot: Option<String>,
}

/// Admin status change; the two statuses move independently
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrderStatusUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub order_status: Option<OrderStatus>,
}
