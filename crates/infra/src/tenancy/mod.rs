//! The tenancy graph: organisations, centres, users and the grants between
//! them, plus the stores that read it.

pub mod in_memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use in_memory::{InMemoryTenancyStore, TenancySnapshot};
pub use model::{
    AccountManager, AccountManagerOrganisation, Centre, CentreStatus, CpdEntry, Employer, Learner,
    Organisation, OrganisationStatus, TenancyStatus, User, UserCentre, UserCourse,
    UserOrganisation, UserStatus,
};
pub use postgres::PostgresTenancyStore;
pub use store::{StoreError, StoreResult, TenancyStore};
