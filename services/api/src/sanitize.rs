//! Request field sanitizers
//!
//! Handlers hand the raw JSON (or multipart text fields collected into a JSON
//! object) to one of the per-entity sanitizers below. Each returns a typed,
//! trimmed payload or the full list of field errors; nothing reaches a store
//! unsanitized.
//!
//! A JSON `null` is treated the same as an omitted field.

pub mod contact;
pub mod order;
pub mod premium_account;
pub mod product;

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::models::{Choice, FeatureSection, FeaturesData};

pub use contact::new_contact_message;
pub use order::{new_order, payment_status_update, status_update};
pub use premium_account::{new_premium_account, premium_account_patch};
pub use product::{new_product, product_patch};

/// Create requires every mandatory field; update only checks what is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Reads typed values out of an untyped field bag, collecting errors
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    mode: Mode,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(raw: &'a Value, mode: Mode) -> Result<Self, ValidationErrors> {
        match raw {
            Value::Object(fields) => Ok(Self {
                fields,
                mode,
                errors: ValidationErrors::default(),
            }),
            _ => Err(ValidationErrors::single(
                "body",
                "Request body must be a JSON object",
            )),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Optional free text, trimmed. Numbers and booleans are stringified.
    pub fn text(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => {
                self.error(key, format!("{} must be a string", key));
                None
            }
        }
    }

    /// Text that must be non-empty after trimming, and present on create
    pub fn required_text(&mut self, key: &str) -> Option<String> {
        match self.text(key) {
            Some(s) if s.is_empty() => {
                self.error(key, format!("{} is required", key));
                None
            }
            Some(s) => Some(s),
            None => {
                if self.mode == Mode::Create && !self.errors.has(key) {
                    self.error(key, format!("{} is required", key));
                }
                None
            }
        }
    }

    /// Optional text where an empty value means "not provided"
    pub fn optional_text(&mut self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.is_empty())
    }

    /// Required, lowercased, URL-safe identifier
    pub fn slug(&mut self, key: &str) -> Option<String> {
        let slug = self.required_text(key)?.to_lowercase();
        let url_safe = slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !url_safe {
            self.error(
                key,
                format!("{} may only contain letters, digits, '-', '_' and '.'", key),
            );
            return None;
        }
        Some(slug)
    }

    /// Required, lowercased email address
    pub fn email(&mut self, key: &str) -> Option<String> {
        let email = self.required_text(key)?.to_lowercase();
        if let Err(message) = auth::validation::validate_email(&email) {
            self.error(key, message);
            return None;
        }
        Some(email)
    }

    /// Non-negative finite number, accepted as a JSON number or numeric string
    pub fn price(&mut self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        self.non_negative(key, value)
    }

    /// Like [`price`](Self::price) but present on create
    pub fn required_price(&mut self, key: &str) -> Option<f64> {
        let price = self.price(key);
        if price.is_none() && self.mode == Mode::Create && !self.errors.has(key) {
            self.error(key, format!("{} is required", key));
        }
        price
    }

    fn non_negative(&mut self, field: &str, value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(n) if n.is_finite() && n >= 0.0 => Some(n),
            _ => {
                self.error(field, format!("{} must be a non-negative number", field));
                None
            }
        }
    }

    /// Prices nested under one object, e.g. `prices: { day, week }`
    pub fn nested_prices<const N: usize>(
        &mut self,
        key: &str,
        names: [&str; N],
    ) -> [Option<f64>; N] {
        let mut out = [None; N];
        let Some(value) = self.get(key) else {
            return out;
        };
        let Value::Object(nested) = value else {
            self.error(key, format!("{} must be an object", key));
            return out;
        };
        for (slot, name) in out.iter_mut().zip(names) {
            if let Some(v) = nested.get(name).filter(|v| !v.is_null()) {
                *slot = self.non_negative(&format!("{}.{}", key, name), v);
            }
        }
        out
    }

    /// Boolean accepted as a JSON bool or the strings "true"/"false"
    pub fn flag(&mut self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => {
                    self.error(key, format!("{} must be true or false", key));
                    None
                }
            },
            _ => {
                self.error(key, format!("{} must be true or false", key));
                None
            }
        }
    }

    /// One of a closed set of values, matched case-sensitively after trimming
    pub fn choice<C: Choice>(&mut self, key: &str) -> Option<C> {
        let raw = self.text(key)?;
        match C::from_variant(&raw) {
            Some(choice) => Some(choice),
            None => {
                self.error(
                    key,
                    format!("{} must be one of: {}", key, C::VARIANTS.join(", ")),
                );
                None
            }
        }
    }

    /// Like [`choice`](Self::choice) but present on create
    pub fn required_choice<C: Choice>(&mut self, key: &str) -> Option<C> {
        let choice = self.choice(key);
        if choice.is_none() && self.mode == Mode::Create && !self.errors.has(key) {
            self.error(key, format!("{} is required", key));
        }
        choice
    }

    /// List of strings with blank and null entries dropped
    pub fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let value = self.get(key)?;
        let Value::Array(items) = value else {
            self.error(key, format!("{} must be a list", key));
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Null | Value::Bool(false) => {}
                Value::String(s) => {
                    let s = s.trim();
                    if !s.is_empty() {
                        out.push(s.to_string());
                    }
                }
                Value::Number(n) => out.push(n.to_string()),
                _ => {
                    self.error(key, format!("{} must be a list of strings", key));
                    return None;
                }
            }
        }
        Some(out)
    }

    /// Feature sections keyed by category. Sections without a usable title
    /// are dropped, as are blank items.
    pub fn features(&mut self, key: &str) -> Option<FeaturesData> {
        let value = self.get(key)?;
        let Value::Object(categories) = value else {
            self.error(key, format!("{} must be an object", key));
            return None;
        };

        let features = categories
            .iter()
            .map(|(category, sections)| (category.clone(), feature_sections(sections)))
            .collect();
        Some(features)
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn feature_sections(sections: &Value) -> Vec<FeatureSection> {
    let Value::Array(sections) = sections else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| {
            let title = section.get("title")?.as_str()?.trim();
            if title.is_empty() {
                return None;
            }
            let items = section
                .get("items")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::String(s) => Some(s.trim().to_string()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            Some(FeatureSection {
                title: title.to_string(),
                items,
            })
        })
        .collect()
}
