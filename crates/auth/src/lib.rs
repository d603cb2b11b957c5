//! `skillgate-auth` — principals, roles and bearer-token validation.
//!
//! Decoupled from HTTP and storage: the API layer turns a token into a
//! [`Principal`], and everything downstream reads the role through
//! [`resolve_role`].

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::{Principal, resolve_role};
pub use roles::Role;
