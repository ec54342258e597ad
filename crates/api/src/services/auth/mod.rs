//! Authentication service.
//!
//! Password login and registration backed by the credential store, issuing
//! signed access tokens.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenService};

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use retail_core::UserId;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{NewUser, Registration, User};

/// Hash verified against when the login is unknown, so both failure paths
/// cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("retail-api-dummy-password").ok());

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user and issue their first access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the login or password is empty.
    /// Returns `AuthError::Repository` with `Conflict` if the login is taken.
    pub async fn register(&self, registration: &Registration) -> Result<(UserId, String), AuthError> {
        validate_registration(registration)?;

        let password_hash = hash_password(&registration.password)?;
        let new_user = NewUser::from_registration(registration, password_hash);

        let user_id = self.users.create(&new_user).await?;
        let token = self.tokens.issue(user_id)?;

        tracing::info!(user_id = %user_id, login = %new_user.login, "User registered");
        Ok((user_id, token))
    }

    /// Login with login name and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the login is unknown or the
    /// password is wrong.
    pub async fn login(&self, login: &str, password: &str) -> Result<(User, String), AuthError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some((user, password_hash)) = self.users.get_password_hash(login).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            tracing::debug!(login, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(user.user_id)?;
        Ok((user, token))
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` with `NotFound` if the user does not exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get(&crate::db::UserKey::Id(user_id))
            .await
            .map_err(AuthError::from)
    }
}

fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
    if registration.login.trim().is_empty() {
        return Err(AuthError::Validation("login must not be empty".to_owned()));
    }
    if registration.password.is_empty() {
        return Err(AuthError::Validation("password must not be empty".to_owned()));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| {
        AuthError::Repository(RepositoryError::DataCorruption(
            "stored password hash is not a PHC string".to_owned(),
        ))
    })?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
