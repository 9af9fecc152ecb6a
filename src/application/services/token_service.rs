//! Signed session tokens (JWT, HS256).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Session, TokenPair};
use crate::error::AppError;

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub token_type: TokenKind,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and verifies session tokens.
///
/// The signing key is fixed at construction and never changes afterwards, so
/// the service is shared across requests without synchronization.
///
/// A token is valid from its issue time until its expiry; there is no
/// revocation, so a refresh token stays usable until it expires even after it
/// has been exchanged.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// - `secret` - symmetric HMAC key
    /// - `access_ttl` - access token lifetime (15 minutes by default)
    /// - `refresh_ttl` - refresh token lifetime (7 days by default)
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issues an access token valid for the access TTL.
    pub fn issue_access(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        self.issue(TokenKind::Access, user_id, username, Utc::now())
    }

    /// Issues a refresh token valid for the refresh TTL.
    pub fn issue_refresh(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        self.issue(TokenKind::Refresh, user_id, username, Utc::now())
    }

    /// Issues an access and a refresh token for the same session.
    pub fn issue_pair(&self, user_id: i64, username: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access(user_id, username)?,
            refresh_token: self.issue_refresh(user_id, username)?,
        })
    }

    /// Verifies a token of the expected kind and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the token is malformed, has a bad
    /// signature, is expired or not yet valid, or is of another kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Session, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::invalid_token(e.to_string()))?;

        if data.claims.token_type != expected {
            return Err(AppError::invalid_token("unexpected token type"));
        }

        Ok(Session {
            user_id: data.claims.user_id,
            username: data.claims.username,
        })
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The presented refresh token is not invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the refresh token does not verify.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let session = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue_pair(session.user_id, &session.username)
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: i64,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal("Invalid token lifetime", json!({ "reason": e.to_string() })))?;

        let claims = Claims {
            user_id,
            username: username.to_string(),
            token_type: kind,
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
    const REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    fn create_test_service() -> TokenService {
        TokenService::new("test-jwt-secret", ACCESS_TTL, REFRESH_TTL)
    }

    #[test]
    fn test_access_token_verifies_immediately() {
        let service = create_test_service();
        let token = service.issue_access(1, "alice").unwrap();

        let session = service.verify(&token, TokenKind::Access).unwrap();

        assert_eq!(session.user_id, 1);
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn test_refresh_token_verifies_immediately() {
        let service = create_test_service();
        let token = service.issue_refresh(2, "bob").unwrap();

        let session = service.verify(&token, TokenKind::Refresh).unwrap();

        assert_eq!(session.user_id, 2);
        assert_eq!(session.username, "bob");
    }

    #[test]
    fn test_access_token_lifetime() {
        let service = create_test_service();
        let now = Utc::now();
        let token = service.issue(TokenKind::Access, 1, "alice", now).unwrap();

        let claims = decode::<Claims>(&token, &service.decoding_key, &service.validation)
            .unwrap()
            .claims;

        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let service = create_test_service();
        let token = service
            .issue(TokenKind::Refresh, 1, "alice", Utc::now())
            .unwrap();

        let claims = decode::<Claims>(&token, &service.decoding_key, &service.validation)
            .unwrap()
            .claims;

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let service = create_test_service();
        let issued_at = Utc::now() - chrono::Duration::minutes(16);
        let token = service
            .issue(TokenKind::Access, 1, "alice", issued_at)
            .unwrap();

        let result = service.verify(&token, TokenKind::Access);

        assert!(matches!(result, Err(AppError::InvalidToken { .. })));
    }

    #[test]
    fn test_not_yet_valid_token_rejected() {
        let service = create_test_service();
        let issued_at = Utc::now() + chrono::Duration::hours(1);
        let token = service
            .issue(TokenKind::Access, 1, "alice", issued_at)
            .unwrap();

        let result = service.verify(&token, TokenKind::Access);

        assert!(matches!(result, Err(AppError::InvalidToken { .. })));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = create_test_service();
        let other = TokenService::new("another-secret", ACCESS_TTL, REFRESH_TTL);

        let token = other.issue_access(1, "alice").unwrap();

        assert!(matches!(
            service.verify(&token, TokenKind::Access),
            Err(AppError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = create_test_service();

        for token in ["", "not-a-jwt", "invalid.token.here"] {
            assert!(matches!(
                service.verify(token, TokenKind::Access),
                Err(AppError::InvalidToken { .. })
            ));
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_test_service();
        let mut token = service.issue_access(1, "alice").unwrap();
        token.push('x');

        assert!(service.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_token_kinds_not_interchangeable() {
        let service = create_test_service();
        let access = service.issue_access(1, "alice").unwrap();
        let refresh = service.issue_refresh(1, "alice").unwrap();

        assert!(service.verify(&access, TokenKind::Refresh).is_err());
        assert!(service.verify(&refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn test_refresh_issues_new_pair() {
        let service = create_test_service();
        let old_refresh = service.issue_refresh(5, "carol").unwrap();

        let pair = service.refresh(&old_refresh).unwrap();

        assert_ne!(pair.refresh_token, old_refresh);
        let session = service.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(session.user_id, 5);
        assert_eq!(session.username, "carol");
    }

    #[test]
    fn test_refresh_token_remains_valid_after_use() {
        let service = create_test_service();
        let refresh = service.issue_refresh(5, "carol").unwrap();

        service.refresh(&refresh).unwrap();

        assert!(service.refresh(&refresh).is_ok());
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let service = create_test_service();
        let access = service.issue_access(5, "carol").unwrap();

        assert!(matches!(
            service.refresh(&access),
            Err(AppError::InvalidToken { .. })
        ));
    }
}
