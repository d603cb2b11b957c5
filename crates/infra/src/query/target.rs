use super::Column;

/// An entity that scope filters can be injected into.
///
/// Declares the alias queries use for it and which columns carry its organisation / centre / owning-user dimension. `None` means
/// the entity has no such dimension.
pub trait ScopeTarget {
    const ALIAS: &'static str;

    fn organisation_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "organisation_id"))
    }

    fn centre_column() -> Option<Column> {
        Some(Column::new(Self::ALIAS, "centre_id"))
    }

    fn user_column() -> Option<Column> {
        None
    }
}
