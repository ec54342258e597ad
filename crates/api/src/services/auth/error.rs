//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password or unknown login. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token signature or structure is invalid.
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its `exp` claim.
    #[error("token expired")]
    ExpiredToken,

    /// No token was presented on a route that requires one.
    #[error("missing token")]
    MissingToken,

    /// Shared secret missing or wrong.
    #[error("forbidden")]
    Forbidden,

    /// Registration or login input rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
