//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user id and admin flag. Every token is
//! signed with the one secret from `[auth] jwt_secret`, so rotating that secret
//! invalidates all sessions at once.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Identity decoded from a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub is_admin: bool,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Invalid token")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Issue a token valid from now until now + ttl.
    pub fn issue(&self, user_id: i64, is_admin: bool) -> Result<String, TokenError> {
        self.issue_at(user_id, is_admin, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        is_admin: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            is_admin,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify signature and expiry and return the embedded claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::hours(24))
    }

    #[test]
    fn test_token_carries_identity() {
        let tokens = service();
        let token = tokens.issue(42, true).unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_still_valid_just_before_expiry() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(23) - Duration::minutes(59);
        let token = tokens.issue_at(7, false, issued).unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(24) - Duration::seconds(1);
        let token = tokens.issue_at(7, false, issued).unwrap();

        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = TokenService::new("another-secret", Duration::hours(24));
        let token = other.issue(1, true).unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            service().validate("not.a.token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(service().validate(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let tokens = service();
        let issued = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let token = tokens.issue_at(3, false, issued).unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.expires_at(), Some(issued + Duration::hours(24)));
    }
}
