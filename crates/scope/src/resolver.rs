//! Role-driven scope resolution over the tenancy graph.
//!
//! Every call reads the store afresh; nothing is memoised between calls,
//! so two resolutions in the same request may issue the same reads twice.
//! A store failure is returned as an error and never degrades into a
//! scope.

use std::sync::Arc;

use tracing::{debug, instrument};

use skillgate_auth::{Principal, Role};
use skillgate_core::{CentreId, OrganisationId, UserId};
use skillgate_infra::{StoreResult, TenancyStore};

use crate::scope::{PeerScope, Scope};

pub struct ScopeResolver<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ScopeResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TenancyStore + ?Sized> ScopeResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Organisations the principal may see.
    #[instrument(
        skip(self, principal),
        fields(user_id = %principal.user_id, role = ?principal.resolved_role()),
        err
    )]
    pub async fn organisation_ids(
        &self,
        principal: &Principal,
    ) -> StoreResult<Scope<OrganisationId>> {
        let scope = match principal.resolved_role() {
            Some(Role::MasterAdmin) => match principal.organisation_context {
                None => Scope::All,
                Some(ctx) => {
                    if self.store.organisation_exists(ctx).await? {
                        Scope::only([ctx])
                    } else {
                        Scope::Empty
                    }
                }
            },
            Some(Role::AccountManager) => {
                match self.store.account_manager_for_user(principal.user_id).await? {
                    Some(am) => Scope::only(self.store.account_manager_organisation_ids(am).await?),
                    None => Scope::Empty,
                }
            }
            Some(Role::CentreAdmin) => {
                let centres = self.store.user_centre_ids(principal.user_id).await?;
                if centres.is_empty() {
                    // Organisation-wide fallback; still empty without membership.
                    Scope::only(self.store.user_organisation_ids(principal.user_id).await?)
                } else {
                    Scope::only(self.store.organisation_ids_of_centres(&centres).await?)
                }
            }
            role => {
                if role.is_none() {
                    debug!("no role resolved; using organisation membership");
                }
                Scope::only(self.store.user_organisation_ids(principal.user_id).await?)
            }
        };

        debug!(kind = scope.kind(), count = ?scope.len(), "resolved organisation scope");
        Ok(scope)
    }

    /// Centres the principal may see.
    ///
    /// Explicit `UserCentre` rows win and are never broadened to sibling
    /// centres; otherwise every live centre of the accessible organisations.
    #[instrument(
        skip(self, principal),
        fields(user_id = %principal.user_id, role = ?principal.resolved_role()),
        err
    )]
    pub async fn centre_ids(&self, principal: &Principal) -> StoreResult<Scope<CentreId>> {
        let scope = if matches!(principal.resolved_role(), Some(Role::MasterAdmin)) {
            match principal.organisation_context {
                None => Scope::All,
                Some(ctx) => {
                    Scope::only(self.store.live_centre_ids_in_organisations(&[ctx]).await?)
                }
            }
        } else {
            let explicit = self.store.user_centre_ids(principal.user_id).await?;
            if !explicit.is_empty() {
                Scope::only(explicit)
            } else {
                match self.organisation_ids(principal).await? {
                    Scope::All => Scope::All,
                    Scope::Empty => Scope::Empty,
                    Scope::Only(orgs) => {
                        let orgs: Vec<_> = orgs.into_iter().collect();
                        Scope::only(self.store.live_centre_ids_in_organisations(&orgs).await?)
                    }
                }
            }
        };

        debug!(kind = scope.kind(), count = ?scope.len(), "resolved centre scope");
        Ok(scope)
    }

    /// Users the principal may see.
    #[instrument(
        skip(self, principal),
        fields(user_id = %principal.user_id, role = ?principal.resolved_role()),
        err
    )]
    pub async fn user_ids(&self, principal: &Principal) -> StoreResult<Scope<UserId>> {
        let scope = match principal.resolved_role() {
            Some(Role::MasterAdmin) if principal.organisation_context.is_none() => Scope::All,
            Some(Role::CentreAdmin) => match self.centre_peer_user_ids(principal).await? {
                PeerScope::Peers(peers) => peers,
                PeerScope::Unrestricted => Scope::All,
                PeerScope::NotCentreScoped => self.organisation_user_ids(principal).await?,
            },
            _ => self.organisation_user_ids(principal).await?,
        };

        debug!(kind = scope.kind(), count = ?scope.len(), "resolved user scope");
        Ok(scope)
    }

    /// Everyone who shares one of the principal's centre assignments,
    /// the principal included.
    #[instrument(
        skip(self, principal),
        fields(user_id = %principal.user_id, role = ?principal.resolved_role()),
        err
    )]
    pub async fn centre_peer_user_ids(&self, principal: &Principal) -> StoreResult<PeerScope> {
        if matches!(principal.resolved_role(), Some(Role::MasterAdmin)) {
            return Ok(PeerScope::Unrestricted);
        }

        let centres = self.store.user_centre_ids(principal.user_id).await?;
        let peers = if centres.is_empty() {
            PeerScope::NotCentreScoped
        } else {
            PeerScope::Peers(Scope::only(self.store.user_ids_in_centres(&centres).await?))
        };

        debug!(kind = peers.kind(), "resolved centre peers");
        Ok(peers)
    }

    async fn organisation_user_ids(&self, principal: &Principal) -> StoreResult<Scope<UserId>> {
        Ok(match self.organisation_ids(principal).await? {
            Scope::All => Scope::All,
            Scope::Empty => Scope::Empty,
            Scope::Only(orgs) => {
                let orgs: Vec<_> = orgs.into_iter().collect();
                Scope::only(self.store.user_ids_in_organisations(&orgs).await?)
            }
        })
    }
}
