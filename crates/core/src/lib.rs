//! `skillgate-core` — identifiers and error primitives shared by every crate.
//!
//! Pure types only; no storage or transport concerns.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{
    AccountManagerId, CentreId, CpdEntryId, EmployerId, LearnerId, OrganisationId, UserId,
};
