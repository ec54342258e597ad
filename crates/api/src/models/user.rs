//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retail_core::UserId;

/// A registered user.
///
/// The password hash never leaves the credential store; it is not part of
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request body.
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Login request body.
#[derive(Clone, Deserialize)]
pub struct Login {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A user row ready to insert: the password is already hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Build from a registration and the PHC hash of its password.
    #[must_use]
    pub fn from_registration(registration: &Registration, password_hash: String) -> Self {
        Self {
            first_name: registration.first_name.trim().to_owned(),
            last_name: registration.last_name.trim().to_owned(),
            login: registration.login.trim().to_owned(),
            password_hash,
            phone_number: registration
                .phone_number
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned),
        }
    }
}

/// Users have no patch route; this type has no values.
#[derive(Debug, Deserialize)]
pub enum UserPatch {}
