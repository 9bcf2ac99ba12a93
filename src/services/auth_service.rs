//! Domain service for login and request authentication.

use serde::Serialize;
use thiserror::Error;

use crate::db::ProfileRow;
use crate::services::token::{Claims, TokenError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token not provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => Self::InvalidToken,
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub claims: Claims,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials, migrating a legacy plaintext password on success,
    /// and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] when a field is empty and
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong password.
    async fn login(&self, correo: &str, clave: &str) -> Result<LoginResult, AuthError>;

    /// Resolves the value of an `Authorization` header into the acting identity.
    async fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AuthError>;

    /// Current state of the account behind `claims`, if it still exists.
    async fn profile(&self, claims: &Claims) -> Result<Option<ProfileRow>, AuthError>;
}
