//! Signed access tokens (HS256 JWT).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use retail_core::UserId;

use super::AuthError;
use crate::config::AuthConfig;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user.
    pub sub: UserId,
    /// Issued at (seconds since the epoch).
    pub iat: i64,
    /// Expires at (seconds since the epoch).
    pub exp: i64,
}

/// Mints and verifies access tokens with the configured secret and lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret_key.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: config.token_ttl,
        }
    }

    /// Issue a token for `user_id`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if the token cannot be encoded.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it were `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if the expiry overflows or encoding fails.
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenSigning("token expiry out of range".to_owned()))?;

        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Verify signature and expiry and return the claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExpiredToken` when the token is past `exp`.
    /// Returns `AuthError::InvalidToken` for any other failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::test_config;

    fn service() -> TokenService {
        TokenService::new(&test_config().auth)
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let user_id = UserId::generate();

        let claims = tokens.verify(&tokens.issue(user_id).unwrap()).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 48 * 60 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let issued_at = Utc::now() - chrono::Duration::hours(48) - chrono::Duration::seconds(10);
        let token = tokens.issue_at(UserId::generate(), issued_at).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let tokens = service();
        let mut token = tokens.issue(UserId::generate()).unwrap();
        token.push('x');

        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let mut other_config = test_config().auth;
        other_config.secret_key = SecretString::from("zZ9#qW8@eR7!tY6$uI5%oP4^aS3&dF2*");
        let token = TokenService::new(&other_config)
            .issue(UserId::generate())
            .unwrap();

        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(service().verify("not-a-jwt"), Err(AuthError::InvalidToken)));
        assert!(matches!(service().verify(""), Err(AuthError::InvalidToken)));
    }
}
