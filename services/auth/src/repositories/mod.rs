//! Credential store

pub mod admin;

pub use admin::{AdminRepository, PgAdminRepository};
