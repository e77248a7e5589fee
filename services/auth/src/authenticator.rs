//! Admin login and provisioning

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AuthError,
    jwt::JwtService,
    models::Admin,
    password::{hash_password, verify_password},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::AdminRepository,
    validation::{validate_email, validate_password},
};

/// A freshly issued session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub admin_id: Uuid,
    pub token: String,
    pub expires_in: u64,
}

/// Verifies admin credentials and issues session tokens
#[derive(Clone)]
pub struct Authenticator {
    admins: Arc<dyn AdminRepository>,
    jwt_service: JwtService,
    rate_limiter: RateLimiter,
    /// Verified against when the email is unknown so both failure paths cost the same
    dummy_hash: Arc<str>,
}

impl Authenticator {
    pub fn new(admins: Arc<dyn AdminRepository>, jwt_service: JwtService) -> Result<Self, AuthError> {
        Self::with_rate_limiter(
            admins,
            jwt_service,
            RateLimiter::new(RateLimiterConfig::default()),
        )
    }

    pub fn with_rate_limiter(
        admins: Arc<dyn AdminRepository>,
        jwt_service: JwtService,
        rate_limiter: RateLimiter,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hash_password("timing-equalizer-not-a-real-password")?;
        Ok(Self {
            admins,
            jwt_service,
            rate_limiter,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Check an email/password pair and issue a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        if !self.rate_limiter.is_allowed(&email).await {
            warn!("Login throttled for {}", email);
            return Err(AuthError::TooManyAttempts);
        }

        let admin = self.admins.find_by_email(&email).await?;

        let verified = match &admin {
            Some(admin) => verify_off_thread(password, &admin.password_hash).await?,
            None => {
                verify_off_thread(password, &self.dummy_hash).await?;
                false
            }
        };

        let admin = match admin {
            Some(admin) if verified && admin.is_admin => admin,
            _ => {
                warn!("Rejected admin login for {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.rate_limiter.reset(&email).await;

        let token = self.jwt_service.issue_admin_token(admin.id)?;
        info!("Admin {} logged in", admin.id);

        Ok(IssuedToken {
            admin_id: admin.id,
            token,
            expires_in: self.jwt_service.token_expiry(),
        })
    }

    /// Create an admin or rotate the password of an existing one
    pub async fn provision(&self, email: &str, password: &str) -> Result<Admin, AuthError> {
        provision_admin(self.admins.as_ref(), email, password).await
    }
}

/// Validate and store admin credentials, rotating the password if the email exists
pub async fn provision_admin(
    admins: &dyn AdminRepository,
    email: &str,
    password: &str,
) -> Result<Admin, AuthError> {
    let email = email.trim().to_lowercase();
    validate_email(&email).map_err(AuthError::InvalidInput)?;
    validate_password(password).map_err(AuthError::InvalidInput)?;

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {e}")))??;
    let admin = admins.upsert(&email, &password_hash).await?;
    info!("Provisioned admin {} ({})", admin.id, admin.email);
    Ok(admin)
}

/// Argon2 is CPU-bound; keep it off the async workers
async fn verify_off_thread(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {e}")))?
}
