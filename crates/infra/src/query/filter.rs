use sqlx::{Postgres, QueryBuilder};

use super::{LinkSource, Predicate, Row};

/// Anything a scope can be injected into.
///
/// Injection only ever narrows: predicates are AND-ed onto whatever the
/// caller already has.
pub trait FilterSink {
    fn and_where(&mut self, predicate: Predicate);
}

/// A conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// No predicate was added: every row passes.
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Some predicate can never hold: no row passes.
    pub fn is_always_false(&self) -> bool {
        self.predicates.iter().any(Predicate::is_always_false)
    }

    pub fn matches<R, L>(&self, row: &R, links: &L) -> bool
    where
        R: Row + ?Sized,
        L: LinkSource + ?Sized,
    {
        self.predicates.iter().all(|p| p.matches(row, links))
    }

    /// Append ` AND <predicate>` for every predicate.
    ///
    /// The builder must already contain a `WHERE` clause.
    pub fn push_and(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for predicate in &self.predicates {
            qb.push(" AND ");
            push_predicate(qb, predicate);
        }
    }
}

impl FilterSink for Filter {
    fn and_where(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::AlwaysFalse => {
            qb.push("FALSE");
        }
        Predicate::In { column, values } => {
            qb.push(column.qualified());
            qb.push(" = ANY(");
            qb.push_bind(values.clone());
            qb.push(")");
        }
        Predicate::InSubquery { column, source } => {
            let (select, from, filtered, values) = source.sql_parts();
            qb.push(column.qualified());
            qb.push(format!(" IN (SELECT {select} FROM {from} WHERE {filtered} = ANY("));
            qb.push_bind(values);
            qb.push("))");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgate_core::{CentreId, OrganisationId};

    use crate::query::{Column, Membership};

    fn render(filter: &Filter) -> String {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT centre.id FROM centres centre WHERE TRUE");
        filter.push_and(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn unfiltered_renders_nothing() {
        let filter = Filter::new();
        assert!(filter.is_unfiltered());
        assert_eq!(render(&filter), "SELECT centre.id FROM centres centre WHERE TRUE");
    }

    #[test]
    fn renders_bound_membership_tests() {
        let mut filter = Filter::new();
        filter.and_where(Predicate::is_in(
            Column::new("centre", "organisation_id"),
            [OrganisationId::new(1)],
        ));
        filter.and_where(Predicate::in_subquery(
            Column::new("centre", "id"),
            Membership::UsersInCentres(vec![CentreId::new(3)]),
        ));

        assert_eq!(
            render(&filter),
            "SELECT centre.id FROM centres centre WHERE TRUE \
             AND centre.organisation_id = ANY($1) \
             AND centre.id IN (SELECT uc.user_id FROM user_centres uc WHERE uc.centre_id = ANY($2))"
        );
    }

    #[test]
    fn always_false_is_detected_and_rendered() {
        let mut filter = Filter::new();
        filter.and_where(Predicate::AlwaysFalse);
        assert!(filter.is_always_false());
        assert!(render(&filter).ends_with("AND FALSE"));
    }
}
