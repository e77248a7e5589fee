//! Product models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One titled block of feature bullet points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureSection {
    pub title: String,
    pub items: Vec<String>,
}

/// Feature sections grouped by category name
pub type FeaturesData = BTreeMap<String, Vec<FeatureSection>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Prices {
    #[sqlx(rename = "price_day")]
    pub day: f64,
    #[sqlx(rename = "price_week")]
    pub week: f64,
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub image: String,
    pub version: String,
    pub size: String,
    /// Free-text display string, not a timestamp
    pub updated: String,
    pub category: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub status_enabled: bool,
    pub status_label: String,
    #[sqlx(flatten)]
    pub prices: Prices,
    pub download_link: String,
    pub features_enabled: bool,
    #[sqlx(json)]
    pub features_data: FeaturesData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitized product creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub version: String,
    pub size: String,
    pub updated: String,
    pub category: String,
    pub product_type: String,
    pub status_enabled: bool,
    pub status_label: String,
    pub prices: Prices,
    pub download_link: String,
    pub features_enabled: bool,
    pub features_data: FeaturesData,
}

/// Sanitized partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub version: Option<String>,
    pub size: Option<String>,
    pub updated: Option<String>,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub status_enabled: Option<bool>,
    pub status_label: Option<String>,
    pub price_day: Option<f64>,
    pub price_week: Option<f64>,
    pub download_link: Option<String>,
    pub features_enabled: Option<bool>,
    pub features_data: Option<FeaturesData>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
