//! JWT service for admin session tokens
//!
//! Tokens are signed with HS256 using a server-held secret and carry the
//! admin id plus an `isAdmin` flag. There is no revocation list: a token is
//! valid until it expires.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Minimum secret length in bytes (256 bits)
pub const MIN_SECRET_LEN: usize = 32;

/// Session lifetime: 24 hours
pub const SESSION_TTL_SECONDS: u64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT_SECRET environment variable not set")]
    MissingSecret,

    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signature and expiry are fine but the token does not grant admin access
    #[error("Token does not carry admin privileges")]
    NotAdmin,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("System clock error: {0}")]
    Clock(String),
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by issuer and verifier
    pub secret: String,
    /// Token lifetime in seconds
    pub token_expiry: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC signing secret, at least 32 bytes (required)
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| JwtError::MissingSecret)?;
        Self::new(secret)
    }

    pub fn new(secret: impl Into<String>) -> Result<Self, JwtError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::WeakSecret);
        }

        Ok(JwtConfig {
            secret,
            token_expiry: SESSION_TTL_SECONDS,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin ID
    pub sub: Uuid,
    /// Admin flag; tokens without it are rejected by the access guard
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Result<Self, JwtError> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::WeakSecret);
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
        })
    }

    /// Issue a session token for an admin
    pub fn issue_admin_token(&self, admin_id: Uuid) -> Result<String, JwtError> {
        let now = now_secs()?;
        let claims = Claims {
            sub: admin_id,
            is_admin: true,
            iat: now,
            exp: now + self.token_expiry,
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(JwtError::Signing)
    }

    /// Validate signature and expiry and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    JwtError::Expired
                } else {
                    JwtError::Invalid(e)
                }
            })
    }

    /// Validate a token and require the admin flag
    pub fn authorize_admin(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if !claims.is_admin {
            return Err(JwtError::NotAdmin);
        }
        Ok(claims)
    }

    /// Get the token expiry time in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}

fn now_secs() -> Result<u64, JwtError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| JwtError::Clock(e.to_string()))
}
