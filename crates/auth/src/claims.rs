use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skillgate_core::UserId;

use crate::{Principal, Role};

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims expected once a token has been decoded and its
/// signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user id of the principal.
    pub sub: UserId,

    /// Single-role representation (preferred when present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Multi-role representation; the first entry is the effective role.
    #[serde(default)]
    pub roles: Vec<Role>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    /// Build the request principal. The organisation context is attached
    /// separately because it comes from the request, not the token.
    pub fn to_principal(&self) -> Principal {
        Principal {
            user_id: self.sub,
            role: self.role.clone(),
            roles: self.roles.clone(),
            organisation_context: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate JWT claims against `now`.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(3),
            role: None,
            roles: vec![Role::OrganisationAdmin],
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_claims_inside_window() {
        let now = Utc::now();
        assert!(validate_claims(&claims(now, Duration::minutes(5)), now).is_ok());
    }

    #[test]
    fn rejects_expired_and_future_tokens() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(10), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));

        let c = claims(now + Duration::minutes(1), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, Duration::zero());
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn principal_keeps_both_role_shapes() {
        let c = claims(Utc::now(), Duration::minutes(1));
        let p = c.to_principal();
        assert_eq!(p.user_id, UserId::new(3));
        assert_eq!(p.resolved_role(), Some(&Role::OrganisationAdmin));
        assert_eq!(p.organisation_context, None);
    }
}
