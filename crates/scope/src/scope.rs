//! Resolved access scopes.
//!
//! A scope is one of three things and they must never be confused: every id
//! ([`Scope::All`]), no id at all ([`Scope::Empty`]), or exactly a set of ids
//! ([`Scope::Only`]). On the wire they serialise as `null`, `[]` and
//! `[ids...]`.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use skillgate_core::UserId;
use skillgate_infra::{Column, Predicate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope<Id> {
    /// Unrestricted.
    All,
    /// No access to anything.
    Empty,
    /// Exactly these ids. Never empty.
    Only(BTreeSet<Id>),
}

impl<Id: Ord + Copy> Scope<Id> {
    /// Build a restricted scope; an empty iterator yields [`Scope::Empty`].
    pub fn only(ids: impl IntoIterator<Item = Id>) -> Self {
        let ids: BTreeSet<Id> = ids.into_iter().collect();
        if ids.is_empty() {
            Scope::Empty
        } else {
            Scope::Only(ids)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Empty)
    }

    pub fn allows(&self, id: Id) -> bool {
        match self {
            Scope::All => true,
            Scope::Empty => false,
            Scope::Only(ids) => ids.contains(&id),
        }
    }

    /// The explicit ids, or `None` when unrestricted.
    pub fn ids(&self) -> Option<Vec<Id>> {
        match self {
            Scope::All => None,
            Scope::Empty => Some(Vec::new()),
            Scope::Only(ids) => Some(ids.iter().copied().collect()),
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Scope::All => None,
            Scope::Empty => Some(0),
            Scope::Only(ids) => Some(ids.len()),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Empty => "none",
            Scope::Only(_) => "restricted",
        }
    }
}

impl<Id: Ord + Copy + Into<i64>> Scope<Id> {
    /// Predicate restricting `column` to this scope; `None` adds no filter.
    pub fn to_predicate(&self, column: Column) -> Option<Predicate> {
        match self {
            Scope::All => None,
            Scope::Empty => Some(Predicate::AlwaysFalse),
            Scope::Only(ids) => Some(Predicate::is_in(column, ids.iter().copied())),
        }
    }
}

impl<Id: Serialize> Serialize for Scope<Id> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scope::All => serializer.serialize_none(),
            Scope::Empty => serializer.serialize_seq(Some(0))?.end(),
            Scope::Only(ids) => {
                let mut seq = serializer.serialize_seq(Some(ids.len()))?;
                for id in ids {
                    seq.serialize_element(id)?;
                }
                seq.end()
            }
        }
    }
}

/// Users sharing a principal's centre assignments.
///
/// Kept apart from [`Scope`] because "not centre scoped" is not the same as
/// "unrestricted": it only means no centre-level restriction is layered on
/// top of whatever organisation filter already applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerScope {
    /// MasterAdmin.
    Unrestricted,
    /// The principal has no `UserCentre` rows.
    NotCentreScoped,
    Peers(Scope<UserId>),
}

impl PeerScope {
    pub fn kind(&self) -> &'static str {
        match self {
            PeerScope::Unrestricted => "unrestricted",
            PeerScope::NotCentreScoped => "not_centre_scoped",
            PeerScope::Peers(_) => "peers",
        }
    }
}

impl Serialize for PeerScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeerScope::Unrestricted | PeerScope::NotCentreScoped => serializer.serialize_none(),
            PeerScope::Peers(scope) => scope.serialize(serializer),
        }
    }
}
