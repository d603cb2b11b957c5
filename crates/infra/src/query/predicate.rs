//! Typed filter predicates.
//!
//! A predicate is data, not SQL text: it is rendered with bound parameters by
//! [`crate::query::Filter::push_and`] and evaluated directly by the in-memory
//! store, so both backends agree on what a scope admits.

use std::collections::BTreeSet;

use skillgate_core::{CentreId, OrganisationId, UserId};

use super::Column;

/// A link-table lookup usable as the right-hand side of `column IN (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// `user_id` of every `user_organisations` row for these organisations.
    UsersInOrganisations(Vec<OrganisationId>),
    /// `user_id` of every `user_centres` row for these centres.
    UsersInCentres(Vec<CentreId>),
    /// `learner_id` of every `user_course` row taught by these trainers.
    LearnersOfTrainers(Vec<UserId>),
}

impl Membership {
    /// `(select column, table with alias, filtered column, bound values)`.
    pub(crate) fn sql_parts(&self) -> (&'static str, &'static str, &'static str, Vec<i64>) {
        match self {
            Membership::UsersInOrganisations(ids) => (
                "uo.user_id",
                "user_organisations uo",
                "uo.organisation_id",
                ids.iter().map(|id| id.get()).collect(),
            ),
            Membership::UsersInCentres(ids) => (
                "uc.user_id",
                "user_centres uc",
                "uc.centre_id",
                ids.iter().map(|id| id.get()).collect(),
            ),
            Membership::LearnersOfTrainers(ids) => (
                "ucr.learner_id",
                "user_course ucr",
                "ucr.trainer_id",
                ids.iter().map(|id| id.get()).collect(),
            ),
        }
    }
}

/// Resolves [`Membership`] lookups for in-memory evaluation.
pub trait LinkSource {
    fn members(&self, source: &Membership) -> BTreeSet<i64>;
}

/// A row that can be tested against predicates by column name.
///
/// `None` means SQL `NULL`: it never satisfies a membership test.
pub trait Row {
    fn column_value(&self, column: &str) -> Option<i64>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches nothing (`FALSE`).
    AlwaysFalse,
    In { column: Column, values: Vec<i64> },
    InSubquery { column: Column, source: Membership },
}

impl Predicate {
    /// `column IN values`; an empty set collapses to [`Predicate::AlwaysFalse`].
    pub fn is_in<I, V>(column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<i64>,
    {
        let values: Vec<i64> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            Predicate::AlwaysFalse
        } else {
            Predicate::In { column, values }
        }
    }

    pub fn in_subquery(column: Column, source: Membership) -> Self {
        Predicate::InSubquery { column, source }
    }

    pub fn is_always_false(&self) -> bool {
        matches!(self, Predicate::AlwaysFalse)
    }

    pub fn matches<R, L>(&self, row: &R, links: &L) -> bool
    where
        R: Row + ?Sized,
        L: LinkSource + ?Sized,
    {
        match self {
            Predicate::AlwaysFalse => false,
            Predicate::In { column, values } => row
                .column_value(column.name())
                .is_some_and(|v| values.contains(&v)),
            Predicate::InSubquery { column, source } => match row.column_value(column.name()) {
                Some(v) => links.members(source).contains(&v),
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapRow(HashMap<&'static str, i64>);

    impl Row for MapRow {
        fn column_value(&self, column: &str) -> Option<i64> {
            self.0.get(column).copied()
        }
    }

    struct Links;

    impl LinkSource for Links {
        fn members(&self, source: &Membership) -> BTreeSet<i64> {
            match source {
                Membership::UsersInOrganisations(_) => [10, 11].into_iter().collect(),
                _ => BTreeSet::new(),
            }
        }
    }

    fn row(pairs: &[(&'static str, i64)]) -> MapRow {
        MapRow(pairs.iter().copied().collect())
    }

    #[test]
    fn empty_membership_collapses_to_false() {
        let p = Predicate::is_in(Column::bare("organisation_id"), Vec::<OrganisationId>::new());
        assert!(p.is_always_false());
        assert!(!p.matches(&row(&[("organisation_id", 1)]), &Links));
    }

    #[test]
    fn membership_ignores_alias_and_rejects_null() {
        let p =
            Predicate::is_in(Column::new("centre", "organisation_id"), [OrganisationId::new(1)]);
        assert!(p.matches(&row(&[("organisation_id", 1)]), &Links));
        assert!(!p.matches(&row(&[("organisation_id", 2)]), &Links));
        assert!(!p.matches(&row(&[]), &Links));
    }

    #[test]
    fn subquery_uses_link_source() {
        let p = Predicate::in_subquery(
            Column::new("learner", "user_id"),
            Membership::UsersInOrganisations(vec![OrganisationId::new(1)]),
        );
        assert!(p.matches(&row(&[("user_id", 10)]), &Links));
        assert!(!p.matches(&row(&[("user_id", 12)]), &Links));
    }
}
