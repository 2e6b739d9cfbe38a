//! JWT token verification.
//!
//! Tokens are issued by the identity service; this service only
//! verifies them against the shared secret.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_security(config: &SecurityConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// customer, driver or admin
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Verify and decode a JWT token. Expiry and issuer are checked by
/// the validation.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Errors that can occur during authentication
#[derive(Debug, Clone)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InsufficientPermissions,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "Missing authentication token"),
            Self::InvalidToken => write!(f, "Invalid authentication token"),
            Self::InsufficientPermissions => write!(f, "Insufficient permissions"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            issuer: "petrotap-identity".to_string(),
        }
    }

    fn token_for(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(role: &str, exp_offset: i64, iss: &str) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "user-1".to_string(),
            role: role.to_string(),
            exp: now + exp_offset,
            iat: now,
            iss: iss.to_string(),
        }
    }

    #[test]
    fn valid_token_round_trips() {
        let cfg = config();
        let token = token_for(&claims("driver", 3600, &cfg.issuer), &cfg.secret);
        let decoded = verify_token(&token, &cfg).unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.role, "driver");
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config();
        let token = token_for(&claims("customer", -3600, &cfg.issuer), &cfg.secret);
        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let cfg = config();
        let token = token_for(&claims("customer", 3600, "someone-else"), &cfg.secret);
        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cfg = config();
        let token = token_for(&claims("admin", 3600, &cfg.issuer), "other-secret");
        assert!(verify_token(&token, &cfg).is_err());
    }
}
