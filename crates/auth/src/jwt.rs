//! HS256 bearer-token validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::{JwtClaims, TokenValidationError, validate_claims};

/// Decodes and validates a bearer token into claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// Shared-secret (HS256) validator.
///
/// Signature checking is delegated to `jsonwebtoken`; the time window is
/// checked by [`validate_claims`] because the claims carry RFC 3339
/// timestamps rather than the registered numeric `exp`/`iat`.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use skillgate_core::UserId;

    use crate::Role;

    fn mint(secret: &[u8], claims: &JwtClaims) -> String {
        encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn sample_claims() -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: UserId::new(11),
            role: Some(Role::CentreAdmin),
            roles: vec![],
            issued_at: now - Duration::seconds(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn accepts_token_signed_with_same_secret() {
        let claims = sample_claims();
        let token = mint(b"secret", &claims);
        let decoded = Hs256JwtValidator::new(b"secret".to_vec())
            .validate(&token, Utc::now())
            .unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = mint(b"other", &sample_claims());
        let err = Hs256JwtValidator::new(b"secret".to_vec())
            .validate(&token, Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = sample_claims();
        claims.issued_at = Utc::now() - Duration::hours(2);
        claims.expires_at = Utc::now() - Duration::hours(1);
        let token = mint(b"secret", &claims);
        let err = Hs256JwtValidator::new(b"secret".to_vec())
            .validate(&token, Utc::now())
            .unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
    }
}
