use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillgate_core::{AccountManagerId, CentreId, EmployerId, OrganisationId, UserId};

use crate::query::{Filter, LinkSource, Membership};

use super::model::{
    AccountManager, AccountManagerOrganisation, Centre, CpdEntry, Employer, Learner,
    Organisation, User, UserCentre, UserCourse, UserOrganisation,
};
use super::store::{StoreError, StoreResult, TenancyStore};

/// Complete contents of a tenancy graph.
///
/// Used as the in-memory store's state and as the JSON seed format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenancySnapshot {
    pub organisations: Vec<Organisation>,
    pub centres: Vec<Centre>,
    pub users: Vec<User>,
    pub user_organisations: Vec<UserOrganisation>,
    pub user_centres: Vec<UserCentre>,
    pub account_managers: Vec<AccountManager>,
    pub account_manager_organisations: Vec<AccountManagerOrganisation>,
    pub learners: Vec<Learner>,
    pub user_courses: Vec<UserCourse>,
    pub employers: Vec<Employer>,
    pub cpd_entries: Vec<CpdEntry>,
}

impl TenancySnapshot {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(std::io::Error::from)
    }

    fn live_centre(&self, id: CentreId) -> Option<&Centre> {
        self.centres.iter().find(|c| c.id == id && c.is_live())
    }
}

impl LinkSource for TenancySnapshot {
    fn members(&self, source: &Membership) -> BTreeSet<i64> {
        match source {
            Membership::UsersInOrganisations(orgs) => self
                .user_organisations
                .iter()
                .filter(|link| orgs.contains(&link.organisation_id))
                .map(|link| link.user_id.get())
                .collect(),
            Membership::UsersInCentres(centres) => self
                .user_centres
                .iter()
                .filter(|link| centres.contains(&link.centre_id))
                .map(|link| link.user_id.get())
                .collect(),
            Membership::LearnersOfTrainers(trainers) => self
                .user_courses
                .iter()
                .filter(|course| trainers.contains(&course.trainer_id))
                .map(|course| course.learner_id.get())
                .collect(),
        }
    }
}

fn sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    items.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

fn push_unique<T: PartialEq>(rows: &mut Vec<T>, row: T) {
    if !rows.contains(&row) {
        rows.push(row);
    }
}

/// Tenancy store held in process memory.
///
/// Intended for tests/dev. Injected filters are evaluated row by row, so
/// listings behave like the Postgres store without a database.
#[derive(Debug, Default)]
pub struct InMemoryTenancyStore {
    inner: RwLock<TenancySnapshot>,
}

impl InMemoryTenancyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: TenancySnapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, TenancySnapshot>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TenancySnapshot>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    // Seeding. These stand in for the CRUD side of the platform.

    pub fn insert_organisation(&self, organisation: Organisation) -> StoreResult<()> {
        let mut g = self.write()?;
        g.organisations.retain(|o| o.id != organisation.id);
        g.organisations.push(organisation);
        Ok(())
    }

    pub fn insert_centre(&self, centre: Centre) -> StoreResult<()> {
        let mut g = self.write()?;
        g.centres.retain(|c| c.id != centre.id);
        g.centres.push(centre);
        Ok(())
    }

    pub fn soft_delete_centre(&self, id: CentreId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut g = self.write()?;
        match g.centres.iter_mut().find(|c| c.id == id) {
            Some(centre) => {
                centre.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut g = self.write()?;
        g.users.retain(|u| u.user_id != user.user_id);
        g.users.push(user);
        Ok(())
    }

    pub fn link_user_organisation(
        &self,
        user_id: UserId,
        organisation_id: OrganisationId,
    ) -> StoreResult<()> {
        push_unique(
            &mut self.write()?.user_organisations,
            UserOrganisation {
                user_id,
                organisation_id,
            },
        );
        Ok(())
    }

    pub fn link_user_centre(&self, user_id: UserId, centre_id: CentreId) -> StoreResult<()> {
        push_unique(
            &mut self.write()?.user_centres,
            UserCentre { user_id, centre_id },
        );
        Ok(())
    }

    pub fn insert_account_manager(&self, account_manager: AccountManager) -> StoreResult<()> {
        let mut g = self.write()?;
        g.account_managers.retain(|am| am.id != account_manager.id);
        g.account_managers.push(account_manager);
        Ok(())
    }

    pub fn link_account_manager_organisation(
        &self,
        account_manager_id: AccountManagerId,
        organisation_id: OrganisationId,
    ) -> StoreResult<()> {
        push_unique(
            &mut self.write()?.account_manager_organisations,
            AccountManagerOrganisation {
                account_manager_id,
                organisation_id,
            },
        );
        Ok(())
    }

    pub fn insert_learner(&self, learner: Learner) -> StoreResult<()> {
        let mut g = self.write()?;
        g.learners.retain(|l| l.learner_id != learner.learner_id);
        g.learners.push(learner);
        Ok(())
    }

    pub fn assign_trainer(&self, course: UserCourse) -> StoreResult<()> {
        push_unique(&mut self.write()?.user_courses, course);
        Ok(())
    }

    pub fn insert_employer(&self, employer: Employer) -> StoreResult<()> {
        let mut g = self.write()?;
        g.employers.retain(|e| e.employer_id != employer.employer_id);
        g.employers.push(employer);
        Ok(())
    }

    pub fn insert_cpd_entry(&self, entry: CpdEntry) -> StoreResult<()> {
        let mut g = self.write()?;
        g.cpd_entries.retain(|e| e.id != entry.id);
        g.cpd_entries.push(entry);
        Ok(())
    }
}

#[async_trait::async_trait]
impl TenancyStore for InMemoryTenancyStore {
    async fn organisation_exists(&self, id: OrganisationId) -> StoreResult<bool> {
        let g = self.read()?;
        Ok(g.organisations
            .iter()
            .any(|o| o.id == id && o.deleted_at.is_none()))
    }

    async fn account_manager_for_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<AccountManagerId>> {
        let g = self.read()?;
        Ok(g.account_managers
            .iter()
            .find(|am| am.user_id == user_id)
            .map(|am| am.id))
    }

    async fn account_manager_organisation_ids(
        &self,
        account_manager_id: AccountManagerId,
    ) -> StoreResult<Vec<OrganisationId>> {
        let g = self.read()?;
        Ok(sorted(
            g.account_manager_organisations
                .iter()
                .filter(|link| link.account_manager_id == account_manager_id)
                .map(|link| link.organisation_id),
        ))
    }

    async fn user_organisation_ids(&self, user_id: UserId) -> StoreResult<Vec<OrganisationId>> {
        let g = self.read()?;
        Ok(sorted(
            g.user_organisations
                .iter()
                .filter(|link| link.user_id == user_id)
                .map(|link| link.organisation_id),
        ))
    }

    async fn user_centre_ids(&self, user_id: UserId) -> StoreResult<Vec<CentreId>> {
        let g = self.read()?;
        Ok(sorted(
            g.user_centres
                .iter()
                .filter(|link| link.user_id == user_id)
                .map(|link| link.centre_id),
        ))
    }

    async fn organisation_ids_of_centres(
        &self,
        centre_ids: &[CentreId],
    ) -> StoreResult<Vec<OrganisationId>> {
        let g = self.read()?;
        Ok(sorted(
            centre_ids
                .iter()
                .filter_map(|id| g.live_centre(*id))
                .map(|c| c.organisation_id),
        ))
    }

    async fn live_centre_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<CentreId>> {
        let g = self.read()?;
        Ok(sorted(
            g.centres
                .iter()
                .filter(|c| c.is_live() && organisation_ids.contains(&c.organisation_id))
                .map(|c| c.id),
        ))
    }

    async fn user_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<UserId>> {
        let g = self.read()?;
        Ok(sorted(
            g.user_organisations
                .iter()
                .filter(|link| organisation_ids.contains(&link.organisation_id))
                .map(|link| link.user_id),
        ))
    }

    async fn user_ids_in_centres(&self, centre_ids: &[CentreId]) -> StoreResult<Vec<UserId>> {
        let g = self.read()?;
        Ok(sorted(
            g.user_centres
                .iter()
                .filter(|link| centre_ids.contains(&link.centre_id))
                .map(|link| link.user_id),
        ))
    }

    async fn organisation(&self, id: OrganisationId) -> StoreResult<Option<Organisation>> {
        let g = self.read()?;
        Ok(g.organisations
            .iter()
            .find(|o| o.id == id && o.deleted_at.is_none())
            .cloned())
    }

    async fn centre(&self, id: CentreId) -> StoreResult<Option<Centre>> {
        let g = self.read()?;
        Ok(g.live_centre(id).cloned())
    }

    async fn employer(&self, id: EmployerId) -> StoreResult<Option<Employer>> {
        let g = self.read()?;
        Ok(g.employers.iter().find(|e| e.employer_id == id).cloned())
    }

    async fn list_organisations(&self, filter: &Filter) -> StoreResult<Vec<Organisation>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .organisations
            .iter()
            .filter(|o| o.deleted_at.is_none() && filter.matches(*o, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn list_centres(&self, filter: &Filter) -> StoreResult<Vec<Centre>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .centres
            .iter()
            .filter(|c| c.is_live() && filter.matches(*c, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    async fn list_users(&self, filter: &Filter) -> StoreResult<Vec<User>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .users
            .iter()
            .filter(|u| u.deleted_at.is_none() && filter.matches(*u, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|u| u.user_id);
        Ok(rows)
    }

    async fn list_learners(&self, filter: &Filter) -> StoreResult<Vec<Learner>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .learners
            .iter()
            .filter(|l| filter.matches(*l, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|l| l.learner_id);
        Ok(rows)
    }

    async fn list_employers(&self, filter: &Filter) -> StoreResult<Vec<Employer>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .employers
            .iter()
            .filter(|e| filter.matches(*e, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.employer_id);
        Ok(rows)
    }

    async fn list_cpd_entries(&self, filter: &Filter) -> StoreResult<Vec<CpdEntry>> {
        let g = self.read()?;
        let mut rows: Vec<_> = g
            .cpd_entries
            .iter()
            .filter(|e| filter.matches(*e, &*g))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Column, FilterSink, Predicate};
    use crate::tenancy::model::TenancyStatus;

    fn centre(id: i64, org: i64) -> Centre {
        Centre {
            id: CentreId::new(id),
            name: format!("Centre {id}"),
            organisation_id: OrganisationId::new(org),
            status: TenancyStatus::Active,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn soft_deleted_centres_leave_fallbacks_and_derivation() {
        let store = InMemoryTenancyStore::new();
        store.insert_centre(centre(20, 5)).unwrap();
        store.insert_centre(centre(21, 5)).unwrap();
        store.insert_centre(centre(22, 6)).unwrap();
        store.soft_delete_centre(CentreId::new(22), Utc::now()).unwrap();

        let live = store
            .live_centre_ids_in_organisations(&[OrganisationId::new(5), OrganisationId::new(6)])
            .await
            .unwrap();
        assert_eq!(live, vec![CentreId::new(20), CentreId::new(21)]);

        let orgs = store
            .organisation_ids_of_centres(&[CentreId::new(21), CentreId::new(22)])
            .await
            .unwrap();
        assert_eq!(orgs, vec![OrganisationId::new(5)]);
    }

    #[tokio::test]
    async fn grants_are_deduplicated() {
        let store = InMemoryTenancyStore::new();
        store.link_user_centre(UserId::new(1), CentreId::new(11)).unwrap();
        store.link_user_centre(UserId::new(1), CentreId::new(11)).unwrap();
        store.link_user_centre(UserId::new(2), CentreId::new(11)).unwrap();

        assert_eq!(
            store.user_centre_ids(UserId::new(1)).await.unwrap(),
            vec![CentreId::new(11)]
        );
        assert_eq!(
            store.user_ids_in_centres(&[CentreId::new(11)]).await.unwrap(),
            vec![UserId::new(1), UserId::new(2)]
        );
    }

    #[tokio::test]
    async fn listings_evaluate_injected_filters() {
        let store = InMemoryTenancyStore::new();
        store.insert_centre(centre(1, 1)).unwrap();
        store.insert_centre(centre(2, 2)).unwrap();

        let mut filter = Filter::new();
        filter.and_where(Predicate::is_in(
            Column::new("centre", "organisation_id"),
            [OrganisationId::new(1)],
        ));
        let rows = store.list_centres(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, CentreId::new(1));

        filter.and_where(Predicate::AlwaysFalse);
        assert!(store.list_centres(&filter).await.unwrap().is_empty());
    }

    #[test]
    fn snapshot_parses_with_missing_tables() {
        let snapshot = TenancySnapshot::from_json_str(
            r#"{"organisations":[{"id":1,"name":"Acme"}],"user_organisations":[{"user_id":4,"organisation_id":1}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.organisations.len(), 1);
        assert!(snapshot.centres.is_empty());
        assert_eq!(snapshot.user_organisations[0].user_id, UserId::new(4));
    }
}
