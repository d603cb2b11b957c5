//! Postgres-backed tenancy store.
//!
//! Reads the tables owned by the CRUD side of the platform. Scoped listings
//! start from `WHERE <alias>.deleted_at IS NULL` (where the table is soft
//! deleted) and append the injected [`Filter`] with bound parameters, so a
//! filter can never change the shape of the query.
//!
//! Membership restrictions are rendered as `IN (SELECT ...)` subqueries
//! rather than joins, which keeps one output row per entity.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use skillgate_auth::Role;
use skillgate_core::{
    AccountManagerId, CentreId, CpdEntryId, EmployerId, LearnerId, OrganisationId, UserId,
};

use crate::query::Filter;

use super::model::{Centre, CpdEntry, Employer, Learner, Organisation, User};
use super::store::{StoreError, StoreResult, TenancyStore};

#[derive(Debug, Clone)]
pub struct PostgresTenancyStore {
    pool: Arc<PgPool>,
}

impl PostgresTenancyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn ids(
        &self,
        operation: &'static str,
        sql: &'static str,
        values: Vec<i64>,
    ) -> StoreResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(values)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }

    async fn fetch_filtered<T>(
        &self,
        operation: &'static str,
        base: &'static str,
        order_by: &'static str,
        filter: &Filter,
        decode: fn(&PgRow) -> Result<T, sqlx::Error>,
    ) -> StoreResult<Vec<T>> {
        let mut qb = QueryBuilder::<Postgres>::new(base);
        filter.push_and(&mut qb);
        qb.push(" ORDER BY ");
        qb.push(order_by);

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        rows.iter()
            .map(|row| {
                decode(row).map_err(|e| StoreError::Decode {
                    operation,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

fn raw<T: Copy + Into<i64>>(ids: &[T]) -> Vec<i64> {
    ids.iter().map(|id| (*id).into()).collect()
}

fn typed<T: From<i64>>(ids: Vec<i64>) -> Vec<T> {
    ids.into_iter().map(T::from).collect()
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => StoreError::Decode {
            operation,
            message: err.to_string(),
        },
        sqlx::Error::Database(db_err) => StoreError::Database {
            operation,
            message: db_err.message().to_string(),
        },
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}

fn parse_status<T: core::str::FromStr>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;
    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_organisation(row: &PgRow) -> Result<Organisation, sqlx::Error> {
    Ok(Organisation {
        id: OrganisationId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        status: parse_status(row, "status")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}

fn decode_centre(row: &PgRow) -> Result<Centre, sqlx::Error> {
    Ok(Centre {
        id: CentreId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        organisation_id: OrganisationId::new(row.try_get("organisation_id")?),
        status: parse_status(row, "status")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}

fn decode_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let roles: Vec<String> = row.try_get("roles")?;
    Ok(User {
        user_id: UserId::new(row.try_get("user_id")?),
        roles: roles.into_iter().map(Role::from).collect(),
        status: parse_status(row, "status")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}

fn decode_learner(row: &PgRow) -> Result<Learner, sqlx::Error> {
    Ok(Learner {
        learner_id: LearnerId::new(row.try_get("learner_id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        organisation_id: row
            .try_get::<Option<i64>, _>("organisation_id")?
            .map(OrganisationId::new),
        centre_id: row.try_get::<Option<i64>, _>("centre_id")?.map(CentreId::new),
        employer_id: row
            .try_get::<Option<i64>, _>("employer_id")?
            .map(EmployerId::new),
    })
}

fn decode_employer(row: &PgRow) -> Result<Employer, sqlx::Error> {
    Ok(Employer {
        employer_id: EmployerId::new(row.try_get("employer_id")?),
        organisation_id: OrganisationId::new(row.try_get("organisation_id")?),
        name: row.try_get("name")?,
    })
}

fn decode_cpd_entry(row: &PgRow) -> Result<CpdEntry, sqlx::Error> {
    Ok(CpdEntry {
        id: CpdEntryId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        activity: row.try_get("activity")?,
    })
}

#[async_trait::async_trait]
impl TenancyStore for PostgresTenancyStore {
    #[instrument(skip(self), fields(organisation_id = %id), err)]
    async fn organisation_exists(&self, id: OrganisationId) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organisations WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id.get())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("organisation_exists", e))
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn account_manager_for_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<AccountManagerId>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM account_managers WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("account_manager_for_user", e))?;
        Ok(id.map(AccountManagerId::new))
    }

    #[instrument(skip(self), fields(account_manager_id = %account_manager_id), err)]
    async fn account_manager_organisation_ids(
        &self,
        account_manager_id: AccountManagerId,
    ) -> StoreResult<Vec<OrganisationId>> {
        let ids = self
            .ids(
                "account_manager_organisation_ids",
                "SELECT DISTINCT organisation_id FROM account_manager_organisations \
                 WHERE account_manager_id = ANY($1) ORDER BY organisation_id",
                vec![account_manager_id.get()],
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn user_organisation_ids(&self, user_id: UserId) -> StoreResult<Vec<OrganisationId>> {
        let ids = self
            .ids(
                "user_organisation_ids",
                "SELECT DISTINCT organisation_id FROM user_organisations \
                 WHERE user_id = ANY($1) ORDER BY organisation_id",
                vec![user_id.get()],
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn user_centre_ids(&self, user_id: UserId) -> StoreResult<Vec<CentreId>> {
        let ids = self
            .ids(
                "user_centre_ids",
                "SELECT DISTINCT centre_id FROM user_centres \
                 WHERE user_id = ANY($1) ORDER BY centre_id",
                vec![user_id.get()],
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self, centre_ids), fields(centres = centre_ids.len()), err)]
    async fn organisation_ids_of_centres(
        &self,
        centre_ids: &[CentreId],
    ) -> StoreResult<Vec<OrganisationId>> {
        if centre_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self
            .ids(
                "organisation_ids_of_centres",
                "SELECT DISTINCT organisation_id FROM centres \
                 WHERE id = ANY($1) AND deleted_at IS NULL ORDER BY organisation_id",
                raw(centre_ids),
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self, organisation_ids), fields(organisations = organisation_ids.len()), err)]
    async fn live_centre_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<CentreId>> {
        if organisation_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self
            .ids(
                "live_centre_ids_in_organisations",
                "SELECT id FROM centres \
                 WHERE organisation_id = ANY($1) AND deleted_at IS NULL ORDER BY id",
                raw(organisation_ids),
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self, organisation_ids), fields(organisations = organisation_ids.len()), err)]
    async fn user_ids_in_organisations(
        &self,
        organisation_ids: &[OrganisationId],
    ) -> StoreResult<Vec<UserId>> {
        if organisation_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self
            .ids(
                "user_ids_in_organisations",
                "SELECT DISTINCT user_id FROM user_organisations \
                 WHERE organisation_id = ANY($1) ORDER BY user_id",
                raw(organisation_ids),
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self, centre_ids), fields(centres = centre_ids.len()), err)]
    async fn user_ids_in_centres(&self, centre_ids: &[CentreId]) -> StoreResult<Vec<UserId>> {
        if centre_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self
            .ids(
                "user_ids_in_centres",
                "SELECT DISTINCT user_id FROM user_centres \
                 WHERE centre_id = ANY($1) ORDER BY user_id",
                raw(centre_ids),
            )
            .await?;
        Ok(typed(ids))
    }

    #[instrument(skip(self), fields(organisation_id = %id), err)]
    async fn organisation(&self, id: OrganisationId) -> StoreResult<Option<Organisation>> {
        let row = sqlx::query(
            "SELECT id, name, status, deleted_at FROM organisations \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("organisation", e))?;

        row.as_ref()
            .map(decode_organisation)
            .transpose()
            .map_err(|e| map_sqlx_error("organisation", e))
    }

    #[instrument(skip(self), fields(centre_id = %id), err)]
    async fn centre(&self, id: CentreId) -> StoreResult<Option<Centre>> {
        let row = sqlx::query(
            "SELECT id, name, organisation_id, status, deleted_at FROM centres \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("centre", e))?;

        row.as_ref()
            .map(decode_centre)
            .transpose()
            .map_err(|e| map_sqlx_error("centre", e))
    }

    #[instrument(skip(self), fields(employer_id = %id), err)]
    async fn employer(&self, id: EmployerId) -> StoreResult<Option<Employer>> {
        let row = sqlx::query(
            "SELECT employer_id, organisation_id, name FROM employer WHERE employer_id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("employer", e))?;

        row.as_ref()
            .map(decode_employer)
            .transpose()
            .map_err(|e| map_sqlx_error("employer", e))
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_organisations(&self, filter: &Filter) -> StoreResult<Vec<Organisation>> {
        self.fetch_filtered(
            "list_organisations",
            "SELECT organisation.id, organisation.name, organisation.status, organisation.deleted_at \
             FROM organisations organisation WHERE organisation.deleted_at IS NULL",
            "organisation.id",
            filter,
            decode_organisation,
        )
        .await
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_centres(&self, filter: &Filter) -> StoreResult<Vec<Centre>> {
        self.fetch_filtered(
            "list_centres",
            "SELECT centre.id, centre.name, centre.organisation_id, centre.status, centre.deleted_at \
             FROM centres centre WHERE centre.deleted_at IS NULL",
            "centre.id",
            filter,
            decode_centre,
        )
        .await
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_users(&self, filter: &Filter) -> StoreResult<Vec<User>> {
        self.fetch_filtered(
            "list_users",
            "SELECT usr.user_id, usr.roles, usr.status, usr.deleted_at \
             FROM users usr WHERE usr.deleted_at IS NULL",
            "usr.user_id",
            filter,
            decode_user,
        )
        .await
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_learners(&self, filter: &Filter) -> StoreResult<Vec<Learner>> {
        self.fetch_filtered(
            "list_learners",
            "SELECT learner.learner_id, learner.user_id, learner.organisation_id, \
             learner.centre_id, learner.employer_id \
             FROM learner learner WHERE TRUE",
            "learner.learner_id",
            filter,
            decode_learner,
        )
        .await
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_employers(&self, filter: &Filter) -> StoreResult<Vec<Employer>> {
        self.fetch_filtered(
            "list_employers",
            "SELECT employer.employer_id, employer.organisation_id, employer.name \
             FROM employer employer WHERE TRUE",
            "employer.employer_id",
            filter,
            decode_employer,
        )
        .await
    }

    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()), err)]
    async fn list_cpd_entries(&self, filter: &Filter) -> StoreResult<Vec<CpdEntry>> {
        self.fetch_filtered(
            "list_cpd_entries",
            "SELECT cpd.id, cpd.user_id, cpd.activity FROM cpd cpd WHERE TRUE",
            "cpd.id",
            filter,
            decode_cpd_entry,
        )
        .await
    }
}
