//! Premium account listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::Choice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type")]
pub enum AccountType {
    Social,
    Game,
}

impl Choice for AccountType {
    const VARIANTS: &'static [&'static str] = &["Social", "Game"];

    fn from_variant(value: &str) -> Option<Self> {
        match value {
            "Social" => Some(Self::Social),
            "Game" => Some(Self::Game),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Social => f.write_str("Social"),
            Self::Game => f.write_str("Game"),
        }
    }
}

/// Full premium account record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PremiumAccount {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub img: String,
    pub gallery: Vec<String>,
    #[serde(rename = "desc")]
    pub description: String,
    pub price: f64,
    pub is_available: bool,
    pub badges: Vec<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection, without gallery and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PremiumAccountSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub img: String,
    pub badges: Vec<String>,
    pub price: f64,
    pub is_available: bool,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl From<PremiumAccount> for PremiumAccountSummary {
    fn from(account: PremiumAccount) -> Self {
        Self {
            id: account.id,
            title: account.title,
            slug: account.slug,
            description: account.description,
            img: account.img,
            badges: account.badges,
            price: account.price,
            is_available: account.is_available,
            account_type: account.account_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPremiumAccount {
    pub title: String,
    pub slug: String,
    pub img: String,
    pub gallery: Vec<String>,
    pub description: String,
    pub price: f64,
    pub is_available: bool,
    pub badges: Vec<String>,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PremiumAccountPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub img: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
    pub badges: Option<Vec<String>>,
    pub account_type: Option<AccountType>,
}

impl PremiumAccountPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Public listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountFilter {
    pub account_type: Option<AccountType>,
    /// Full-text query over title and description
    pub search: Option<String>,
}

impl AccountFilter {
    /// Build a filter from raw query pairs. The first recognised `type` and
    /// the first non-blank `search` win; anything else is ignored rather
    /// than rejected.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key {
                "type" if filter.account_type.is_none() => {
                    filter.account_type = AccountType::from_variant(value.trim());
                }
                "search" if filter.search.is_none() => {
                    let value = value.trim();
                    if !value.is_empty() {
                        filter.search = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }
        filter
    }
}
