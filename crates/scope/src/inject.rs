//! Injects resolved scopes into listing filters.
//!
//! Injection only adds predicates. An unrestricted scope adds nothing, an
//! empty scope adds `FALSE`, a restricted scope adds a membership test. When
//! a restricted principal hits an entity that lacks the column needed to
//! express its scope, `FALSE` is added instead of silently skipping.

use skillgate_auth::{Principal, Role};
use skillgate_infra::tenancy::Learner;
use skillgate_infra::{
    Column, FilterSink, Membership, Predicate, ScopeTarget, StoreResult, TenancyStore,
};

use crate::error::ScopeResult;
use crate::resolver::ScopeResolver;
use crate::scope::{PeerScope, Scope};

/// Where the centre dimension of an entity lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CentreColumn {
    /// The entity's own centre column, if it has one.
    #[default]
    Default,
    Custom(Column),
    /// The entity has no centre dimension.
    Disabled,
}

/// Column overrides for [`ScopeResolver::apply_scope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOptions {
    pub organisation_column: Option<Column>,
    pub centre_column: CentreColumn,
    /// Only ever filter on the organisation column (employers, payments).
    pub organisation_only: bool,
}

impl ScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn organisation_column(mut self, column: Column) -> Self {
        self.organisation_column = Some(column);
        self
    }

    pub fn centre_column(mut self, column: Column) -> Self {
        self.centre_column = CentreColumn::Custom(column);
        self
    }

    pub fn without_centre(mut self) -> Self {
        self.centre_column = CentreColumn::Disabled;
        self
    }

    pub fn organisation_only(mut self) -> Self {
        self.organisation_only = true;
        self
    }

    fn resolve(
        &self,
        default_organisation: Option<Column>,
        default_centre: Option<Column>,
    ) -> (Option<Column>, Option<Column>) {
        let organisation = self.organisation_column.clone().or(default_organisation);
        let centre = if self.organisation_only {
            None
        } else {
            match &self.centre_column {
                CentreColumn::Default => default_centre,
                CentreColumn::Custom(column) => Some(column.clone()),
                CentreColumn::Disabled => None,
            }
        };
        (organisation, centre)
    }
}

fn add<F: FilterSink + ?Sized>(sink: &mut F, predicate: Option<Predicate>) {
    if let Some(predicate) = predicate {
        sink.and_where(predicate);
    }
}

/// Restrict `column` to `scope`, failing closed when the column is missing.
fn restrict<Id, F>(sink: &mut F, scope: &Scope<Id>, column: Option<Column>)
where
    Id: Ord + Copy + Into<i64>,
    F: FilterSink + ?Sized,
{
    match column {
        Some(column) => add(sink, scope.to_predicate(column)),
        None if scope.is_all() => {}
        None => sink.and_where(Predicate::AlwaysFalse),
    }
}

fn unrestricted_master(principal: &Principal) -> bool {
    matches!(principal.resolved_role(), Some(Role::MasterAdmin))
        && principal.organisation_context.is_none()
}

impl<S: TenancyStore + ?Sized> ScopeResolver<S> {
    /// Scope a listing of `T` by the principal's organisations, or by its
    /// centres for a CentreAdmin when `T` has a centre dimension.
    pub async fn apply_scope<T, F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        options: &ScopeOptions,
    ) -> StoreResult<()>
    where
        T: ScopeTarget,
        F: FilterSink + Send + ?Sized,
    {
        let (organisation, centre) = options.resolve(T::organisation_column(), T::centre_column());
        self.apply_scope_columns(sink, principal, organisation, centre).await
    }

    /// [`apply_scope`](Self::apply_scope) for an entity known only by its
    /// query alias; defaults are `<alias>.organisation_id` and
    /// `<alias>.centre_id`. The alias may come from runtime input and is
    /// validated before anything is resolved.
    pub async fn apply_scope_aliased<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        alias: &str,
        options: &ScopeOptions,
    ) -> ScopeResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        let (organisation, centre) = options.resolve(
            Some(Column::bare("organisation_id").with_alias(alias)?),
            Some(Column::bare("centre_id").with_alias(alias)?),
        );
        self.apply_scope_columns(sink, principal, organisation, centre).await?;
        Ok(())
    }

    async fn apply_scope_columns<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        organisation: Option<Column>,
        centre: Option<Column>,
    ) -> StoreResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        if unrestricted_master(principal) {
            return Ok(());
        }

        match (principal.resolved_role(), centre) {
            (Some(Role::CentreAdmin), Some(centre)) => {
                let centres = self.centre_ids(principal).await?;
                restrict(sink, &centres, Some(centre));
            }
            _ => {
                let organisations = self.organisation_ids(principal).await?;
                restrict(sink, &organisations, organisation);
            }
        }
        Ok(())
    }

    /// Scope an entity owned by a user (`cpd.user_id`, `risk_rating.trainer_id`).
    pub async fn apply_user_scoped_filter<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        user_column: Column,
    ) -> StoreResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        let users = self.user_ids(principal).await?;
        restrict(sink, &users, Some(user_column));
        Ok(())
    }

    /// Scope a learner listing.
    ///
    /// Administrative roles scope by the learner's own organisation and
    /// centre columns. Every other role reaches learners through their
    /// user's organisation membership and, when centre scoped, only those
    /// taught by someone sharing one of the principal's centres.
    pub async fn apply_learner_scope<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        alias: &str,
    ) -> ScopeResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        let user_column = Column::bare("user_id").with_alias(alias)?;
        let learner_column = Column::bare("learner_id").with_alias(alias)?;

        if unrestricted_master(principal) {
            return Ok(());
        }

        if matches!(
            principal.resolved_role(),
            Some(Role::OrganisationAdmin | Role::AccountManager | Role::CentreAdmin)
        ) {
            return self
                .apply_scope_aliased(sink, principal, alias, &ScopeOptions::new())
                .await;
        }

        let organisations: Vec<_> = match self.organisation_ids(principal).await? {
            Scope::All => return Ok(()),
            Scope::Empty => {
                sink.and_where(Predicate::AlwaysFalse);
                return Ok(());
            }
            Scope::Only(ids) => ids.into_iter().collect(),
        };
        sink.and_where(Predicate::in_subquery(
            user_column,
            Membership::UsersInOrganisations(organisations),
        ));

        match self.centre_peer_user_ids(principal).await? {
            PeerScope::Peers(Scope::Only(peers)) => sink.and_where(Predicate::in_subquery(
                learner_column,
                Membership::LearnersOfTrainers(peers.into_iter().collect()),
            )),
            PeerScope::Peers(Scope::Empty) => sink.and_where(Predicate::AlwaysFalse),
            PeerScope::Peers(Scope::All)
            | PeerScope::Unrestricted
            | PeerScope::NotCentreScoped => {}
        }
        Ok(())
    }

    /// [`apply_learner_scope`](Self::apply_learner_scope) under the default
    /// `learner` alias.
    pub async fn apply_default_learner_scope<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
    ) -> ScopeResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        self.apply_learner_scope(sink, principal, Learner::ALIAS).await
    }

    /// Scope the user list itself.
    ///
    /// A CentreAdmin sees users that share one of its accessible centres;
    /// everyone else sees users linked to an accessible organisation.
    pub async fn apply_user_list_scope<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        user_column: Column,
    ) -> StoreResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        if unrestricted_master(principal) {
            return Ok(());
        }

        if matches!(principal.resolved_role(), Some(Role::CentreAdmin)) {
            match self.centre_ids(principal).await? {
                Scope::Only(centres) => sink.and_where(Predicate::in_subquery(
                    user_column,
                    Membership::UsersInCentres(centres.into_iter().collect()),
                )),
                Scope::All | Scope::Empty => sink.and_where(Predicate::AlwaysFalse),
            }
            return Ok(());
        }

        match self.organisation_ids(principal).await? {
            Scope::All => {}
            Scope::Empty => sink.and_where(Predicate::AlwaysFalse),
            Scope::Only(orgs) => sink.and_where(Predicate::in_subquery(
                user_column,
                Membership::UsersInOrganisations(orgs.into_iter().collect()),
            )),
        }
        Ok(())
    }

    /// Organisation layer only, against an explicit column.
    pub async fn apply_organisation_filter<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        column: Column,
    ) -> StoreResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        let organisations = self.organisation_ids(principal).await?;
        restrict(sink, &organisations, Some(column));
        Ok(())
    }

    /// Centre layer only, against an explicit column.
    pub async fn apply_centre_filter<F>(
        &self,
        sink: &mut F,
        principal: &Principal,
        column: Column,
    ) -> StoreResult<()>
    where
        F: FilterSink + Send + ?Sized,
    {
        let centres = self.centre_ids(principal).await?;
        restrict(sink, &centres, Some(column));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organisation_only_drops_the_centre_column() {
        let options = ScopeOptions::new().organisation_only();
        let (org, centre) = options.resolve(
            Some(Column::new("employer", "organisation_id")),
            Some(Column::new("employer", "centre_id")),
        );
        assert_eq!(org, Some(Column::new("employer", "organisation_id")));
        assert_eq!(centre, None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let options = ScopeOptions::new()
            .organisation_column(Column::new("centre", "organisation_id"))
            .centre_column(Column::new("centre", "id"));
        let (org, centre) = options.resolve(None, None);
        assert_eq!(org, Some(Column::new("centre", "organisation_id")));
        assert_eq!(centre, Some(Column::new("centre", "id")));

        let (_, centre) = ScopeOptions::new()
            .without_centre()
            .resolve(None, Some(Column::new("learner", "centre_id")));
        assert_eq!(centre, None);
    }
}
