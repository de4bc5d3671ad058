//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs bound to an identity string (the user's email).

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::error::TokenError;

/// Access token claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token is bound to.
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub fresh: bool,
}

/// Signs and verifies access tokens with a shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(config.secret.expose_secret().as_bytes(), config.ttl)
    }

    /// Issue an access token for `identity`.
    pub fn issue(&self, identity: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: identity.to_string(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
            fresh: false,
        };
        self.sign(&claims)
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        if data.claims.token_type != "access" {
            return Err(TokenError::Invalid("not an access token".to_string()));
        }
        Ok(data.claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", Duration::from_secs(900))
    }

    #[test]
    fn issued_token_verifies_with_identity() {
        let issuer = issuer();
        let token = issuer.issue("sample@test.com").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "sample@test.com");
        assert_eq!(claims.token_type, "access");
        assert!(!claims.fresh);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn each_token_has_a_unique_id() {
        let issuer = issuer();
        let a = issuer.verify(&issuer.issue("a@b.c").unwrap()).unwrap();
        let b = issuer.verify(&issuer.issue("a@b.c").unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let foreign = TokenIssuer::new(b"other-secret", Duration::from_secs(900));
        let token = foreign.issue("sample@test.com").unwrap();

        let err = issuer().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let token = issuer
            .sign(&Claims {
                sub: "sample@test.com".into(),
                iat: now - 1000,
                nbf: now - 1000,
                exp: now - 100,
                jti: Uuid::new_v4().to_string(),
                token_type: "access".into(),
                fresh: false,
            })
            .unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn non_access_token_is_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let token = issuer
            .sign(&Claims {
                sub: "sample@test.com".into(),
                iat: now,
                nbf: now,
                exp: now + 60,
                jti: Uuid::new_v4().to_string(),
                token_type: "refresh".into(),
                fresh: false,
            })
            .unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            issuer().verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }
}
