//! Admin authentication for the MagicWorld backend
//!
//! Holds the admin credential store, password hashing, HS256 session tokens
//! and the login flow that ties them together. The API service consumes this
//! crate; the `seed-admin` binary uses it to provision admin accounts.

pub mod authenticator;
pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod rate_limiter;
pub mod repositories;
pub mod validation;

pub use authenticator::{Authenticator, IssuedToken, provision_admin};
pub use error::AuthError;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use models::Admin;
pub use repositories::{AdminRepository, PgAdminRepository};
