//! Single-resource gates and tenancy placement checks.

use tracing::{debug, instrument};

use skillgate_auth::{Principal, Role};
use skillgate_core::{CentreId, EmployerId, OrganisationId, UserId};
use skillgate_infra::{StoreResult, TenancyStore};

use crate::error::{ScopeError, ScopeResult};
use crate::resolver::ScopeResolver;

/// Organisation an endpoint must be pinned to.
///
/// A MasterAdmin has to select one explicitly; no organisation is ever
/// picked on its behalf. Other roles return `None` because their grants
/// already scope them.
pub fn required_organisation_id(principal: &Principal) -> ScopeResult<Option<OrganisationId>> {
    match principal.resolved_role() {
        Some(Role::MasterAdmin) => principal
            .organisation_context
            .map(Some)
            .ok_or(ScopeError::OrganisationContextRequired),
        _ => Ok(None),
    }
}

impl<S: TenancyStore + ?Sized> ScopeResolver<S> {
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id), err)]
    pub async fn can_access_organisation(
        &self,
        principal: &Principal,
        organisation_id: OrganisationId,
    ) -> StoreResult<bool> {
        let allowed = self.organisation_ids(principal).await?.allows(organisation_id);
        debug!(%organisation_id, allowed, "organisation access check");
        Ok(allowed)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.user_id), err)]
    pub async fn can_access_centre(
        &self,
        principal: &Principal,
        centre_id: CentreId,
    ) -> StoreResult<bool> {
        let allowed = self.centre_ids(principal).await?.allows(centre_id);
        debug!(%centre_id, allowed, "centre access check");
        Ok(allowed)
    }

    /// True when the centre exists and belongs to the organisation.
    pub async fn validate_centre_organisation(
        &self,
        centre_id: CentreId,
        organisation_id: OrganisationId,
    ) -> StoreResult<bool> {
        Ok(self
            .store()
            .centre(centre_id)
            .await?
            .is_some_and(|c| c.organisation_id == organisation_id))
    }

    /// True when the employer exists and belongs to the organisation.
    pub async fn validate_employer_organisation(
        &self,
        employer_id: EmployerId,
        organisation_id: OrganisationId,
    ) -> StoreResult<bool> {
        Ok(self
            .store()
            .employer(employer_id)
            .await?
            .is_some_and(|e| e.organisation_id == organisation_id))
    }

    /// A learner's centre and employer must both sit in its organisation.
    pub async fn validate_learner_placement(
        &self,
        organisation_id: OrganisationId,
        centre_id: CentreId,
        employer_id: EmployerId,
    ) -> ScopeResult<()> {
        if !self
            .validate_centre_organisation(centre_id, organisation_id)
            .await?
        {
            return Err(ScopeError::CentreOutsideOrganisation {
                centre_id,
                organisation_id,
            });
        }
        if !self
            .validate_employer_organisation(employer_id, organisation_id)
            .await?
        {
            return Err(ScopeError::EmployerOutsideOrganisation {
                employer_id,
                organisation_id,
            });
        }
        Ok(())
    }

    pub async fn user_organisation_ids(&self, user_id: UserId) -> StoreResult<Vec<OrganisationId>> {
        self.store().user_organisation_ids(user_id).await
    }

    /// A user belongs to at most one organisation. Assigning the
    /// organisation it already has is accepted.
    pub async fn ensure_single_organisation(
        &self,
        user_id: UserId,
        organisation_id: OrganisationId,
    ) -> ScopeResult<()> {
        let existing = self.user_organisation_ids(user_id).await?;
        match existing.first() {
            None => Ok(()),
            Some(_) if existing.contains(&organisation_id) => Ok(()),
            Some(other) => Err(ScopeError::AlreadyInOtherOrganisation {
                user_id,
                existing: *other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgate_core::UserId;

    #[test]
    fn master_admin_must_select_an_organisation() {
        let master = Principal::new(UserId::new(1)).with_role(Role::MasterAdmin);
        assert!(matches!(
            required_organisation_id(&master),
            Err(ScopeError::OrganisationContextRequired)
        ));

        let pinned = master.with_organisation_context(Some(OrganisationId::new(3)));
        assert_eq!(required_organisation_id(&pinned).unwrap(), Some(OrganisationId::new(3)));
    }

    #[test]
    fn scoped_roles_need_no_selection() {
        let admin = Principal::new(UserId::new(2))
            .with_role(Role::OrganisationAdmin)
            .with_organisation_context(Some(OrganisationId::new(3)));
        assert_eq!(required_organisation_id(&admin).unwrap(), None);
        assert_eq!(required_organisation_id(&Principal::new(UserId::new(3))).unwrap(), None);
    }
}
