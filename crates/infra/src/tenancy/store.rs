use skillgate_core::{AccountManagerId, CentreId, EmployerId, OrganisationId, UserId};

use crate::query::Filter;

use super::model::{Centre, CpdEntry, Employer, Learner, Organisation, User};

/// Failure to read the tenancy graph.
///
/// This is the "resolution could not complete" outcome. It is never folded
/// into an empty or unrestricted scope.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("malformed row in {operation}: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("tenancy store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only view over the tenancy graph used by scope resolution.
///
/// Every call reads current state; implementations must not cache between
/// calls. Id lists are returned de-duplicated and in ascending order.
#[async_trait::async_trait]
pub trait TenancyStore: Send + Sync {
    /// True when a non-deleted organisation with this id exists.
    async fn organisation_exists(&self, id: OrganisationId) -> StoreResult<bool>;

    async fn account_manager_for_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<AccountManagerId>>;

    async fn account_manager_organisation_ids(
        &self,
        account_manager_id: AccountManagerId,
    ) -> StoreResult<Vec<OrganisationId>>;

    async fn user_organisation_ids(&self, user_id: UserId) -> StoreResult<Vec<OrganisationId>>;

    /// Centre ids from the user's `UserCentre` rows, verbatim.
    async fn user_centre_ids(&self, user_id: UserId) -> StoreResult<Vec<CentreId>>;

    /// Distinct owning organisations of the given non-deleted centres.
    async fn organisation_ids_of_centres(
        &self,
        centre_ids: &[CentreId],
    ) -> StoreResult<Vec<OrganisationId>>;

    /// Non-deleted centres owned by any of the given organisations.
    async fn live_centre_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<CentreId>>;

    async fn user_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<UserId>>;

    async fn user_ids_in_centres(&self, centre_ids: &[CentreId]) -> StoreResult<Vec<UserId>>;

    async fn organisation(&self, id: OrganisationId) -> StoreResult<Option<Organisation>>;

    async fn centre(&self, id: CentreId) -> StoreResult<Option<Centre>>;

    async fn employer(&self, id: EmployerId) -> StoreResult<Option<Employer>>;

    // Scoped listings. Soft-deleted rows are never returned.

    async fn list_organisations(&self, filter: &Filter) -> StoreResult<Vec<Organisation>>;

    async fn list_centres(&self, filter: &Filter) -> StoreResult<Vec<Centre>>;

    async fn list_users(&self, filter: &Filter) -> StoreResult<Vec<User>>;

    async fn list_learners(&self, filter: &Filter) -> StoreResult<Vec<Learner>>;

    async fn list_employers(&self, filter: &Filter) -> StoreResult<Vec<Employer>>;

    async fn list_cpd_entries(&self, filter: &Filter) -> StoreResult<Vec<CpdEntry>>;
}
