use skillgate_core::{CentreId, DomainError, EmployerId, OrganisationId, UserId};
use skillgate_infra::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// The tenancy graph could not be read; the scope is unknown.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A scope column or alias is not a valid identifier.
    #[error("invalid scope column: {0}")]
    InvalidColumn(#[from] DomainError),

    #[error("an organisation must be selected for this request")]
    OrganisationContextRequired,

    #[error("centre {centre_id} does not belong to organisation {organisation_id}")]
    CentreOutsideOrganisation {
        centre_id: CentreId,
        organisation_id: OrganisationId,
    },

    #[error("employer {employer_id} does not belong to organisation {organisation_id}")]
    EmployerOutsideOrganisation {
        employer_id: EmployerId,
        organisation_id: OrganisationId,
    },

    #[error("user {user_id} already belongs to organisation {existing}")]
    AlreadyInOtherOrganisation {
        user_id: UserId,
        existing: OrganisationId,
    },
}

pub type ScopeResult<T> = Result<T, ScopeError>;
