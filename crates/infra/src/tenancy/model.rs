//! Rows of the tenancy graph.
//!
//! These are owned by the CRUD side of the platform; scope resolution only
//! ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillgate_auth::Role;
use skillgate_core::{
    AccountManagerId, CentreId, CpdEntryId, DomainError, EmployerId, Entity, LearnerId,
    OrganisationId, UserId,
};

use crate::query::{Column, Row, ScopeTarget};

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle status shared by organisations and centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TenancyStatus {
    #[default]
    Active,
    Suspended,
}

impl TenancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenancyStatus::Active => "active",
            TenancyStatus::Suspended => "suspended",
        }
    }
}

pub type OrganisationStatus = TenancyStatus;
pub type CentreStatus = TenancyStatus;

impl core::str::FromStr for TenancyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TenancyStatus::Active),
            "suspended" => Ok(TenancyStatus::Suspended),
            other => Err(DomainError::validation(format!("unknown status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl core::str::FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(DomainError::validation(format!("unknown user status '{other}'"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tenancy units
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: OrganisationId,
    pub name: String,
    #[serde(default)]
    pub status: OrganisationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A centre belongs to exactly one organisation; `organisation_id` does not
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centre {
    pub id: CentreId,
    pub name: String,
    pub organisation_id: OrganisationId,
    #[serde(default)]
    pub status: CentreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Centre {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Grants
// ─────────────────────────────────────────────────────────────────────────────

/// Organisation membership grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOrganisation {
    pub user_id: UserId,
    pub organisation_id: OrganisationId,
}

/// Centre assignment grant (the `centre_admins` relation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCentre {
    pub user_id: UserId,
    pub centre_id: CentreId,
}

/// Identity row of a user acting as an account manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountManager {
    pub id: AccountManagerId,
    pub user_id: UserId,
}

/// Account-manager grant; disjoint from [`UserOrganisation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountManagerOrganisation {
    pub account_manager_id: AccountManagerId,
    pub organisation_id: OrganisationId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scoped consumers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub learner_id: LearnerId,
    pub user_id: UserId,
    #[serde(default)]
    pub organisation_id: Option<OrganisationId>,
    #[serde(default)]
    pub centre_id: Option<CentreId>,
    #[serde(default)]
    pub employer_id: Option<EmployerId>,
}

/// Trainer assignment of a learner (the `user_course` relation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCourse {
    pub learner_id: LearnerId,
    pub trainer_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub employer_id: EmployerId,
    pub organisation_id: OrganisationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpdEntry {
    pub id: CpdEntryId,
    pub user_id: UserId,
    pub activity: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity / Row / ScopeTarget
// ─────────────────────────────────────────────────────────────────────────────

impl Entity for Organisation {
    type Id = OrganisationId;
    fn id(&self) -> OrganisationId {
        self.id
    }
}

impl Entity for Centre {
    type Id = CentreId;
    fn id(&self) -> CentreId {
        self.id
    }
}

impl Entity for User {
    type Id = UserId;
    fn id(&self) -> UserId {
        self.user_id
    }
}

impl Entity for Learner {
    type Id = LearnerId;
    fn id(&self) -> LearnerId {
        self.learner_id
    }
}

impl Entity for Employer {
    type Id = EmployerId;
    fn id(&self) -> EmployerId {
        self.employer_id
    }
}

impl Entity for CpdEntry {
    type Id = CpdEntryId;
    fn id(&self) -> CpdEntryId {
        self.id
    }
}

impl Row for Organisation {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "id" => Some(self.id.get()),
            _ => None,
        }
    }
}

impl Row for Centre {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "id" => Some(self.id.get()),
            "organisation_id" => Some(self.organisation_id.get()),
            _ => None,
        }
    }
}

impl Row for User {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "user_id" => Some(self.user_id.get()),
            _ => None,
        }
    }
}

impl Row for Learner {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "learner_id" => Some(self.learner_id.get()),
            "user_id" => Some(self.user_id.get()),
            "organisation_id" => self.organisation_id.map(|id| id.get()),
            "centre_id" => self.centre_id.map(|id| id.get()),
            "employer_id" => self.employer_id.map(|id| id.get()),
            _ => None,
        }
    }
}

impl Row for Employer {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "employer_id" => Some(self.employer_id.get()),
            "organisation_id" => Some(self.organisation_id.get()),
            _ => None,
        }
    }
}

impl Row for CpdEntry {
    fn column_value(&self, column: &str) -> Option<i64> {
        match column {
            "id" => Some(self.id.get()),
            "user_id" => Some(self.user_id.get()),
            _ => None,
        }
    }
}

impl ScopeTarget for Organisation {
    const ALIAS: &'static str = "organisation";

    fn organisation_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "id"))
    }

    fn centre_column() -> Option<Column> {
        None
    }
}

impl ScopeTarget for Centre {
    const ALIAS: &'static str = "centre";

    fn centre_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "id"))
    }
}

impl ScopeTarget for User {
    const ALIAS: &'static str = "usr";

    fn organisation_column() -> Option<Column> {
        None
    }

    fn centre_column() -> Option<Column> {
        None
    }

    fn user_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "user_id"))
    }
}

impl ScopeTarget for Learner {
    const ALIAS: &'static str = "learner";

    fn user_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "user_id"))
    }
}

impl ScopeTarget for Employer {
    const ALIAS: &'static str = "employer";

    fn centre_column() -> Option<Column> {
        None
    }
}

impl ScopeTarget for CpdEntry {
    const ALIAS: &'static str = "cpd";

    fn organisation_column() -> Option<Column> {
        None
    }

    fn centre_column() -> Option<Column> {
        None
    }

    fn user_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "user_id"))
    }
}
