//! Authentication models

pub mod admin;

pub use admin::Admin;
