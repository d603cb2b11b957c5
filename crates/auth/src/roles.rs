use core::str::FromStr;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// Role held by a user of the platform.
///
/// Only the administrative roles drive scope resolution; every other role
/// (including names this build does not know) takes the default
/// organisation-membership branch. Unknown names are preserved verbatim so
/// they round-trip through tokens unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    MasterAdmin,
    AccountManager,
    OrganisationAdmin,
    CentreAdmin,
    Admin,
    Trainer,
    Employer,
    Learner,
    Iqa,
    Liqa,
    Eqa,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::MasterAdmin => "MasterAdmin",
            Role::AccountManager => "AccountManager",
            Role::OrganisationAdmin => "OrganisationAdmin",
            Role::CentreAdmin => "CentreAdmin",
            Role::Admin => "Admin",
            Role::Trainer => "Trainer",
            Role::Employer => "Employer",
            Role::Learner => "Learner",
            Role::Iqa => "IQA",
            Role::Liqa => "LIQA",
            Role::Eqa => "EQA",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MasterAdmin" => Role::MasterAdmin,
            "AccountManager" => Role::AccountManager,
            "OrganisationAdmin" => Role::OrganisationAdmin,
            "CentreAdmin" => Role::CentreAdmin,
            "Admin" => Role::Admin,
            "Trainer" => Role::Trainer,
            "Employer" => Role::Employer,
            "Learner" => Role::Learner,
            "IQA" => Role::Iqa,
            "LIQA" => Role::Liqa,
            "EQA" => Role::Eqa,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s.to_string()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_map_to_variants() {
        assert_eq!(Role::from("CentreAdmin".to_string()), Role::CentreAdmin);
        assert_eq!(Role::from("IQA".to_string()), Role::Iqa);
    }

    #[test]
    fn unknown_names_round_trip() {
        let role: Role = serde_json::from_str("\"Auditor\"").unwrap();
        assert_eq!(role, Role::Other("Auditor".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Auditor\"");
    }

    #[test]
    fn serialises_with_canonical_spelling() {
        assert_eq!(serde_json::to_string(&Role::Liqa).unwrap(), "\"LIQA\"");
    }
}
