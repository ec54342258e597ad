//! Credential store: user records looked up by id or login.

use sqlx::PgPool;

use retail_core::{ListQuery, ListResult, UserId};

use super::RepositoryError;
use super::repository::{Entity, Repository};
use crate::models::{NewUser, User};

/// Lookup key for a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(UserId),
    Login(String),
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
    rows: Repository<'a, User>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            rows: Repository::new(pool),
        }
    }

    /// Insert a user whose password has already been hashed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the login already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<UserId, RepositoryError> {
        self.rows.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                RepositoryError::Conflict("login already exists".to_owned())
            }
            other => other,
        })
    }

    /// Get a user by id or by login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user matches.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, key: &UserKey) -> Result<User, RepositoryError> {
        match key {
            UserKey::Id(id) => self.rows.get_by_id(*id).await,
            UserKey::Login(login) => {
                let sql = format!(
                    "SELECT {} FROM {} WHERE login = $1",
                    User::SELECT_COLUMNS,
                    User::TABLE
                );
                sqlx::query_as::<_, User>(&sql)
                    .bind(login)
                    .fetch_optional(self.pool)
                    .await?
                    .ok_or(RepositoryError::NotFound)
            }
        }
    }

    /// List users, searching login and names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_list(&self, query: &ListQuery) -> Result<ListResult<User>, RepositoryError> {
        self.rows.get_list(query).await
    }

    /// Get a user together with their stored PHC password hash.
    ///
    /// Only the login flow should call this.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored hash is empty.
    pub async fn get_password_hash(
        &self,
        login: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {}, password_hash FROM {} WHERE login = $1",
            User::SELECT_COLUMNS,
            User::TABLE
        );

        let row = sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(login)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) if r.password_hash.is_empty() => Err(RepositoryError::DataCorruption(
                format!("user {} has no password hash", r.user.user_id),
            )),
            Some(r) => Ok(Some((r.user, r.password_hash))),
            None => Ok(None),
        }
    }
}
