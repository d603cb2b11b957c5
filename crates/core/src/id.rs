//! Strongly-typed identifiers for the tenancy graph.
//!
//! Every persisted row is keyed by a database-assigned integer. Wrapping each
//! key in its own type keeps an organisation id from ever being compared to a
//! centre id by accident.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an organisation (root tenancy unit).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganisationId(i64);

/// Identifier of a centre (belongs to exactly one organisation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CentreId(i64);

/// Identifier of a user account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

/// Identifier of an account-manager identity row (distinct from the user id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountManagerId(i64);

/// Identifier of a learner record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(i64);

/// Identifier of an employer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployerId(i64);

/// Identifier of a CPD (continuing professional development) entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CpdEntryId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_int_newtype!(OrganisationId, "OrganisationId");
impl_int_newtype!(CentreId, "CentreId");
impl_int_newtype!(UserId, "UserId");
impl_int_newtype!(AccountManagerId, "AccountManagerId");
impl_int_newtype!(LearnerId, "LearnerId");
impl_int_newtype!(EmployerId, "EmployerId");
impl_int_newtype!(CpdEntryId, "CpdEntryId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_integers() {
        let id: OrganisationId = " 42 ".parse().unwrap();
        assert_eq!(id, OrganisationId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "abc".parse::<CentreId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("CentreId")));
    }

    #[test]
    fn serialises_transparently() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
