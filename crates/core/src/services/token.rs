//! Bearer token issuance and verification.

use chrono::Utc;
use grievance_common::{AppError, AppResult};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the account email.
    pub sub: String,
    /// Stored role string, e.g. `ROLE_CITIZEN`.
    pub role: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Whether the token holder is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "ROLE_ADMIN"
    }

    /// Whether the token holder is an officer.
    #[must_use]
    pub fn is_officer(&self) -> bool {
        self.role == "ROLE_OFFICER"
    }
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a token for an account.
    pub fn issue(&self, email: &str, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("test-secret", 24);
        let token = service.issue("alice@example.com", "ROLE_CITIZEN").unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.role, "ROLE_CITIZEN");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenService::new("secret-a", 24);
        let verifier = TokenService::new("secret-b", 24);

        let token = issuer.issue("alice@example.com", "ROLE_CITIZEN").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = TokenService::new("test-secret", -1);
        let token = service.issue("alice@example.com", "ROLE_CITIZEN").unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = TokenService::new("test-secret", 24);
        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_role_predicates() {
        let service = TokenService::new("test-secret", 24);
        let token = service.issue("root@example.com", "ROLE_ADMIN").unwrap();
        let claims = service.verify(&token).unwrap();

        assert!(claims.is_admin());
        assert!(!claims.is_officer());
    }
}
