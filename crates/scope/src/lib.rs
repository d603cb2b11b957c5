//! `skillgate-scope` — who may see which organisations, centres and users.
//!
//! [`ScopeResolver`] turns a [`Principal`](skillgate_auth::Principal) into
//! [`Scope`]s by reading the tenancy graph, injects them into listing
//! filters, and answers single-resource access checks.

pub mod access;
pub mod error;
pub mod inject;
pub mod resolver;
pub mod scope;


pub use access::required_organisation_id;
pub use error::{ScopeError, ScopeResult};
pub use inject::{CentreColumn, ScopeOptions};
pub use resolver::ScopeResolver;
pub use scope::{PeerScope, Scope};
