//! Error type for the login and seeding flows

use common::error::StoreError;
use thiserror::Error;

use crate::jwt::JwtError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The login throttle rejected the attempt
    #[error("Too many login attempts")]
    TooManyAttempts,

    /// Submitted input failed validation
    #[error("{0}")]
    InvalidInput(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
